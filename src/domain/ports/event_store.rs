//! Event store port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::InteractionEvent;

/// Ordered, agent-scoped access to recorded interaction events.
///
/// Implementations must return events sorted by timestamp ascending; the
/// segmenter rejects out-of-order streams rather than reordering them.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Fetch all events for one agent, oldest first.
    async fn events_for_agent(&self, agent_id: &str) -> DomainResult<Vec<InteractionEvent>>;

    /// Record a new event.
    async fn record(&self, event: &InteractionEvent) -> DomainResult<()>;
}
