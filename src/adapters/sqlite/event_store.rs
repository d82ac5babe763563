//! SQLite implementation of the EventStore.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::InteractionEvent;
use crate::domain::ports::EventStore;

#[derive(Clone)]
pub struct SqliteEventStore {
    pool: SqlitePool,
}

impl SqliteEventStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn event_from_row(row: &SqliteRow) -> DomainResult<InteractionEvent> {
    let id: String = row.try_get("id")?;
    let timestamp: String = row.try_get("timestamp")?;
    Ok(InteractionEvent {
        id: Uuid::parse_str(&id)
            .map_err(|e| DomainError::ValidationFailed(format!("bad event id {id}: {e}")))?,
        agent_id: row.try_get("agent_id")?,
        timestamp: DateTime::parse_from_rfc3339(&timestamp)
            .map_err(|e| DomainError::ValidationFailed(format!("bad event timestamp: {e}")))?
            .with_timezone(&Utc),
        content: row.try_get("content")?,
        topic: row.try_get("topic")?,
        task_complete: row.try_get::<i64, _>("task_complete")? != 0,
    })
}

#[async_trait]
impl EventStore for SqliteEventStore {
    async fn events_for_agent(&self, agent_id: &str) -> DomainResult<Vec<InteractionEvent>> {
        let rows = sqlx::query(
            "SELECT id, agent_id, timestamp, content, topic, task_complete
             FROM interaction_events
             WHERE agent_id = ?
             ORDER BY timestamp ASC",
        )
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(event_from_row).collect()
    }

    async fn record(&self, event: &InteractionEvent) -> DomainResult<()> {
        event.validate().map_err(DomainError::ValidationFailed)?;

        sqlx::query(
            "INSERT INTO interaction_events (id, agent_id, timestamp, content, topic, task_complete)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(event.id.to_string())
        .bind(&event.agent_id)
        .bind(event.timestamp.to_rfc3339())
        .bind(&event.content)
        .bind(&event.topic)
        .bind(i64::from(event.task_complete))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
