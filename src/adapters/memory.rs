//! In-memory event and trace stores.
//!
//! Backing storage for tests and small deployments where SQLite is
//! overkill. Events are kept sorted by timestamp on insert.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ExecutionTrace, InteractionEvent};
use crate::domain::ports::{EventStore, TraceStore};

/// Event store backed by a sorted in-memory vec.
#[derive(Default)]
pub struct InMemoryEventStore {
    events: RwLock<Vec<InteractionEvent>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn events_for_agent(&self, agent_id: &str) -> DomainResult<Vec<InteractionEvent>> {
        let events = self.events.read().await;
        Ok(events
            .iter()
            .filter(|e| e.agent_id == agent_id)
            .cloned()
            .collect())
    }

    async fn record(&self, event: &InteractionEvent) -> DomainResult<()> {
        event.validate().map_err(DomainError::ValidationFailed)?;
        let mut events = self.events.write().await;
        let position = events.partition_point(|e| e.timestamp <= event.timestamp);
        events.insert(position, event.clone());
        Ok(())
    }
}

/// Trace store backed by an in-memory vec.
#[derive(Default)]
pub struct InMemoryTraceStore {
    traces: RwLock<Vec<ExecutionTrace>>,
}

impl InMemoryTraceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded traces.
    pub async fn len(&self) -> usize {
        self.traces.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.traces.read().await.is_empty()
    }
}

#[async_trait]
impl TraceStore for InMemoryTraceStore {
    async fn traces_for_agents(
        &self,
        agent_ids: &[String],
        limit: usize,
    ) -> DomainResult<Vec<ExecutionTrace>> {
        let traces = self.traces.read().await;
        let mut matched: Vec<ExecutionTrace> = traces
            .iter()
            .filter(|t| agent_ids.contains(&t.agent_id))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        matched.truncate(limit);
        Ok(matched)
    }

    async fn record(&self, trace: &ExecutionTrace) -> DomainResult<()> {
        trace.validate().map_err(DomainError::ValidationFailed)?;
        self.traces.write().await.push(trace.clone());
        Ok(())
    }
}
