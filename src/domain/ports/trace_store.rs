//! Trace store port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::ExecutionTrace;

/// Queryable source of execution traces.
///
/// Reads are non-locking and scoped per call; concurrent reflection cycles
/// over overlapping agent sets are safe.
#[async_trait]
pub trait TraceStore: Send + Sync {
    /// Fetch the most recent traces for the given agents, newest first,
    /// capped at `limit`.
    async fn traces_for_agents(
        &self,
        agent_ids: &[String],
        limit: usize,
    ) -> DomainResult<Vec<ExecutionTrace>>;

    /// Record a completed trace.
    async fn record(&self, trace: &ExecutionTrace) -> DomainResult<()>;
}
