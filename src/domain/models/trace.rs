//! Execution trace domain model.
//!
//! A trace is the recorded outcome of one completed agent run: its
//! benchmark result, quality flag, resulting patch, task log, and tool-use
//! records. Traces are produced by the execution subsystem and are
//! read-only to the reflection service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One tool invocation within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolUse {
    /// Tool name (e.g. "apply_patch", "send_invoice")
    pub tool: String,
    /// Whether the invocation succeeded
    pub success: bool,
}

impl ToolUse {
    pub fn new(tool: impl Into<String>, success: bool) -> Self {
        Self {
            tool: tool.into(),
            success,
        }
    }
}

/// The recorded outcome of one completed agent run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionTrace {
    /// Unique identifier
    pub id: Uuid,
    /// Agent that produced this run
    pub agent_id: String,
    /// Benchmark score in [0, 1]
    pub benchmark_score: f64,
    /// Whether the run passed its benchmark
    pub benchmark_passed: bool,
    /// Human or automated quality judgement; an absolute veto in the
    /// quality gate when false
    pub is_high_quality: bool,
    /// Resulting patch/diff text, if the run produced one
    pub patch: Option<String>,
    /// Free-text task log
    pub task_log: String,
    /// Tool invocations during the run
    pub tool_uses: Vec<ToolUse>,
    /// Free-text notes about requirements that shifted mid-run
    pub evolving_requirements: Option<String>,
    /// When the run finished
    pub completed_at: DateTime<Utc>,
}

impl ExecutionTrace {
    /// Create a trace with the given score and quality flag; remaining
    /// fields start empty.
    pub fn new(agent_id: impl Into<String>, benchmark_score: f64, is_high_quality: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            agent_id: agent_id.into(),
            benchmark_score,
            benchmark_passed: benchmark_score >= 0.5,
            is_high_quality,
            patch: None,
            task_log: String::new(),
            tool_uses: Vec::new(),
            evolving_requirements: None,
            completed_at: Utc::now(),
        }
    }

    pub fn with_patch(mut self, patch: impl Into<String>) -> Self {
        self.patch = Some(patch.into());
        self
    }

    pub fn with_task_log(mut self, log: impl Into<String>) -> Self {
        self.task_log = log.into();
        self
    }

    pub fn with_tool_use(mut self, tool: impl Into<String>, success: bool) -> Self {
        self.tool_uses.push(ToolUse::new(tool, success));
        self
    }

    pub fn with_evolving_requirements(mut self, notes: impl Into<String>) -> Self {
        self.evolving_requirements = Some(notes.into());
        self
    }

    /// Validate the trace for ingestion.
    pub fn validate(&self) -> Result<(), String> {
        if self.agent_id.trim().is_empty() {
            return Err("trace agent_id cannot be empty".to_string());
        }
        if !(0.0..=1.0).contains(&self.benchmark_score) {
            return Err(format!(
                "benchmark_score {} outside [0, 1]",
                self.benchmark_score
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let trace = ExecutionTrace::new("agent-7", 0.72, true)
            .with_patch("--- a/ledger.rs\n+++ b/ledger.rs")
            .with_task_log("reconciled 40 accounts")
            .with_tool_use("post_journal", true)
            .with_evolving_requirements("client now wants multi-currency");

        assert!(trace.benchmark_passed);
        assert_eq!(trace.tool_uses.len(), 1);
        assert!(trace.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_score() {
        let trace = ExecutionTrace::new("agent-7", 1.5, true);
        assert!(trace.validate().is_err());
    }
}
