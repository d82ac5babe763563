//! Domain layer for the ATOM episodic memory core.
//!
//! This module contains pure business models and the port traits that
//! infrastructure adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
