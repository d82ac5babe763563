//! SQLite implementation of the TraceStore.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ExecutionTrace, ToolUse};
use crate::domain::ports::TraceStore;

#[derive(Clone)]
pub struct SqliteTraceStore {
    pool: SqlitePool,
}

impl SqliteTraceStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn trace_from_row(row: &SqliteRow) -> DomainResult<ExecutionTrace> {
    let id: String = row.try_get("id")?;
    let completed_at: String = row.try_get("completed_at")?;
    let tool_uses_json: String = row.try_get("tool_uses")?;
    let tool_uses: Vec<ToolUse> = serde_json::from_str(&tool_uses_json)?;

    Ok(ExecutionTrace {
        id: Uuid::parse_str(&id)
            .map_err(|e| DomainError::ValidationFailed(format!("bad trace id {id}: {e}")))?,
        agent_id: row.try_get("agent_id")?,
        benchmark_score: row.try_get("benchmark_score")?,
        benchmark_passed: row.try_get::<i64, _>("benchmark_passed")? != 0,
        is_high_quality: row.try_get::<i64, _>("is_high_quality")? != 0,
        patch: row.try_get("patch")?,
        task_log: row.try_get("task_log")?,
        tool_uses,
        evolving_requirements: row.try_get("evolving_requirements")?,
        completed_at: DateTime::parse_from_rfc3339(&completed_at)
            .map_err(|e| DomainError::ValidationFailed(format!("bad trace timestamp: {e}")))?
            .with_timezone(&Utc),
    })
}

#[async_trait]
impl TraceStore for SqliteTraceStore {
    async fn traces_for_agents(
        &self,
        agent_ids: &[String],
        limit: usize,
    ) -> DomainResult<Vec<ExecutionTrace>> {
        if agent_ids.is_empty() {
            return Ok(Vec::new());
        }

        // sqlx has no array binding for sqlite; expand placeholders.
        let placeholders = vec!["?"; agent_ids.len()].join(", ");
        let sql = format!(
            "SELECT id, agent_id, benchmark_score, benchmark_passed, is_high_quality,
                    patch, task_log, tool_uses, evolving_requirements, completed_at
             FROM execution_traces
             WHERE agent_id IN ({placeholders})
             ORDER BY completed_at DESC
             LIMIT ?"
        );

        let mut query = sqlx::query(&sql);
        for agent_id in agent_ids {
            query = query.bind(agent_id);
        }
        query = query.bind(i64::try_from(limit).unwrap_or(i64::MAX));

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(trace_from_row).collect()
    }

    async fn record(&self, trace: &ExecutionTrace) -> DomainResult<()> {
        trace.validate().map_err(DomainError::ValidationFailed)?;
        let tool_uses_json = serde_json::to_string(&trace.tool_uses)?;

        sqlx::query(
            "INSERT INTO execution_traces
             (id, agent_id, benchmark_score, benchmark_passed, is_high_quality,
              patch, task_log, tool_uses, evolving_requirements, completed_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(trace.id.to_string())
        .bind(&trace.agent_id)
        .bind(trace.benchmark_score)
        .bind(i64::from(trace.benchmark_passed))
        .bind(i64::from(trace.is_high_quality))
        .bind(&trace.patch)
        .bind(&trace.task_log)
        .bind(&tool_uses_json)
        .bind(&trace.evolving_requirements)
        .bind(trace.completed_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
