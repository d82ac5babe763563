//! Domain errors for the episodic memory core.

use thiserror::Error;
use uuid::Uuid;

/// Domain-level errors surfaced by segmentation and reflection.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Episode not found: {0}")]
    EpisodeNotFound(Uuid),

    #[error("Trace not found: {0}")]
    TraceNotFound(Uuid),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Events out of order for agent {agent_id}: event {event_id} precedes its predecessor")]
    EventsOutOfOrder { agent_id: String, event_id: Uuid },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
