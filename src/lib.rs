//! ATOM Memory - Episodic Memory Segmentation and Group Reflection
//!
//! This crate is the memory core of the ATOM agent platform: it partitions
//! raw agent interaction streams into bounded episodes and periodically
//! reflects over pools of execution traces to produce improvement
//! directives.
//!
//! # Architecture
//!
//! The crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Pure business models, errors, and port
//!   traits for collaborators (event store, trace store, LLM client)
//! - **Service Layer** (`services`): Segmentation, domain registry, quality
//!   gate, signal extraction, and reflection orchestration
//! - **Adapters** (`adapters`): SQLite stores, the Anthropic LLM client,
//!   and in-memory/mock implementations for tests
//! - **Infrastructure** (`infrastructure`): Configuration loading and
//!   logging setup
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use atom_memory::adapters::llm::AnthropicClient;
//! use atom_memory::adapters::sqlite::{create_pool, SqliteTraceStore};
//! use atom_memory::services::GroupReflectionService;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = create_pool("sqlite:.atom/memory.db", None).await?;
//!     let service = GroupReflectionService::new(
//!         Arc::new(SqliteTraceStore::new(pool)),
//!         Arc::new(AnthropicClient::new(Default::default())),
//!     );
//!     let agents = vec!["agent-1".to_string(), "agent-2".to_string()];
//!     let pool = service.gather_group_experience_pool(&agents, Some("finance")).await?;
//!     let directives = service.reflect_and_generate_directives(&pool, 5).await;
//!     println!("{directives:#?}");
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    aggregate_feedback_score, BoundaryTrigger, DomainProfile, Episode, EpisodeStatus,
    ExecutionTrace, FeedbackSignal, InteractionEvent, SignalKind, ToolUse,
};
pub use domain::ports::{EventStore, GenerationOptions, LlmClient, LlmError, TraceStore};
pub use infrastructure::config::{ConfigError, ConfigLoader, MemoryConfig};
pub use infrastructure::logging::{init_logging, LogFormat, LoggingConfig};
pub use services::{
    DomainProfileRegistry, EpisodeSegmentationService, ExperiencePool, GroupReflectionService,
    QualityGate, ReflectionConfig, SegmentationConfig, BASE_QUALITY_THRESHOLD,
};
