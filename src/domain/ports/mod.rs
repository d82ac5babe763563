//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that infrastructure adapters must implement:
//! - `EventStore`: ordered, agent-scoped access to interaction events
//! - `TraceStore`: queryable access to execution traces by agent set
//! - `LlmClient`: outbound text generation for reflection
//!
//! These contracts keep the domain independent of persistence technology
//! and LLM vendor.

pub mod event_store;
pub mod llm_client;
pub mod trace_store;

pub use event_store::EventStore;
pub use llm_client::{GenerationOptions, LlmClient, LlmError};
pub use trace_store::TraceStore;
