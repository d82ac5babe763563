//! Interaction event domain model.
//!
//! Events are the raw input of episodic memory: one timestamped interaction
//! unit (message, tool call, canvas action, feedback) belonging to a single
//! agent. Events are immutable once recorded; the segmenter never mutates
//! them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single timestamped interaction unit in an agent's event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    /// Unique identifier
    pub id: Uuid,
    /// Owning agent
    pub agent_id: String,
    /// When the interaction occurred
    pub timestamp: DateTime<Utc>,
    /// Free-text content
    pub content: String,
    /// Optional topic label
    pub topic: Option<String>,
    /// Set when this event marks the completion of a task
    pub task_complete: bool,
}

impl InteractionEvent {
    /// Create a new event for an agent at the given timestamp.
    pub fn new(
        agent_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            agent_id: agent_id.into(),
            timestamp,
            content: content.into(),
            topic: None,
            task_complete: false,
        }
    }

    /// Set the topic label.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Mark this event as a task-completion marker.
    pub fn completing(mut self) -> Self {
        self.task_complete = true;
        self
    }

    /// Validate the event for ingestion.
    ///
    /// Malformed events fail fast here rather than being silently skipped,
    /// which would violate the no-event-lost segmentation invariant.
    pub fn validate(&self) -> Result<(), String> {
        if self.agent_id.trim().is_empty() {
            return Err("event agent_id cannot be empty".to_string());
        }
        if self.id.is_nil() {
            return Err("event id cannot be nil".to_string());
        }
        Ok(())
    }
}

/// One piece of user feedback attached to an episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FeedbackSignal {
    /// Explicit positive feedback, contributes +1.0
    ThumbsUp,
    /// Explicit negative feedback, contributes -1.0
    ThumbsDown,
    /// Numeric rating on a 1-5 scale, contributes (r - 3) / 2
    Rating(u8),
}

impl FeedbackSignal {
    /// Per-record contribution to the aggregate score.
    ///
    /// Returns `Err` for ratings outside the 1-5 scale.
    pub fn score(&self) -> Result<f64, String> {
        match self {
            Self::ThumbsUp => Ok(1.0),
            Self::ThumbsDown => Ok(-1.0),
            Self::Rating(r) => {
                if !(1..=5).contains(r) {
                    return Err(format!("rating {r} outside 1-5 scale"));
                }
                Ok((f64::from(*r) - 3.0) / 2.0)
            }
        }
    }
}

/// Mean of per-record feedback contributions.
///
/// An empty list yields `None` — absence of feedback, not a neutral score.
pub fn aggregate_feedback_score(signals: &[FeedbackSignal]) -> Result<Option<f64>, String> {
    if signals.is_empty() {
        return Ok(None);
    }
    let mut total = 0.0;
    for signal in signals {
        total += signal.score()?;
    }
    #[allow(clippy::cast_precision_loss)]
    Ok(Some(total / signals.len() as f64))
}
