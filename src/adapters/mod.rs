//! Infrastructure adapters implementing the domain ports.

pub mod llm;
pub mod memory;
pub mod sqlite;
