//! Episode domain model.
//!
//! An episode is a contiguous, non-overlapping span of one agent's
//! interaction events — the unit of episodic memory. Episodes for a single
//! agent are chronologically ordered, their time ranges never overlap, and
//! every recorded event belongs to exactly one episode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use super::event::{aggregate_feedback_score, FeedbackSignal, InteractionEvent};

/// Episode lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeStatus {
    /// Still accumulating events
    Open,
    /// Closed by a boundary trigger
    Completed,
}

/// Which boundary trigger closed an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryTrigger {
    /// Elapsed-time gap between consecutive events exceeded the threshold
    TimeGap,
    /// Consecutive events carried different topic labels
    TopicShift,
    /// An event carried the task-completion flag
    TaskComplete,
    /// End of the input stream
    StreamEnd,
}

impl BoundaryTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TimeGap => "time_gap",
            Self::TopicShift => "topic_shift",
            Self::TaskComplete => "task_complete",
            Self::StreamEnd => "stream_end",
        }
    }
}

/// A bounded span of one agent's events, with enrichment fields populated
/// by downstream scoring and linking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    /// Unique identifier
    pub id: Uuid,
    /// Owning agent
    pub agent_id: String,
    /// Timestamp of the first member event
    pub start_time: DateTime<Utc>,
    /// Timestamp of the last member event (always >= start_time)
    pub end_time: DateTime<Utc>,
    /// Member events, in timestamp order
    pub events: Vec<InteractionEvent>,
    /// Look-back context carried over from the previous episode.
    ///
    /// Non-authoritative: these events are members of the *previous*
    /// episode and are never counted as members here.
    #[serde(default)]
    pub context: Vec<InteractionEvent>,
    /// Lifecycle status
    pub status: EpisodeStatus,
    /// The trigger that closed this episode
    pub boundary: BoundaryTrigger,
    /// Topic labels observed among member events
    #[serde(default)]
    pub topics: BTreeSet<String>,
    /// Named entities extracted by downstream enrichment
    #[serde(default)]
    pub entities: BTreeSet<String>,
    /// Importance score assigned by downstream scoring
    pub importance: f32,
    /// Agent maturity level at creation time
    pub maturity_level: u32,
    /// Number of human interventions during the span
    pub human_intervention_count: u32,
    /// Constitutional compliance score
    pub constitutional_score: f32,
    /// Decay score used by retention (eviction itself is external)
    pub decay_score: f32,
    /// Times this episode has been recalled
    pub access_count: u32,
    /// Linked canvas-interaction ids
    #[serde(default)]
    pub canvas_ids: Vec<Uuid>,
    /// Linked feedback record ids
    #[serde(default)]
    pub feedback_ids: Vec<Uuid>,
    /// Aggregate feedback score; `None` until feedback is linked
    pub feedback_score: Option<f64>,
}

impl Episode {
    /// Create a completed episode from an ordered, non-empty run of events.
    ///
    /// Returns `Err` on an empty run — the minimum episode length is one
    /// event.
    pub fn from_events(
        agent_id: impl Into<String>,
        events: Vec<InteractionEvent>,
        boundary: BoundaryTrigger,
    ) -> Result<Self, String> {
        let first = events
            .first()
            .ok_or_else(|| "episode requires at least one event".to_string())?;
        let last = events.last().unwrap_or(first);

        let topics = events
            .iter()
            .filter_map(|e| e.topic.clone())
            .collect::<BTreeSet<_>>();

        Ok(Self {
            id: Uuid::new_v4(),
            agent_id: agent_id.into(),
            start_time: first.timestamp,
            end_time: last.timestamp,
            status: EpisodeStatus::Completed,
            boundary,
            topics,
            entities: BTreeSet::new(),
            importance: 0.0,
            maturity_level: 0,
            human_intervention_count: 0,
            constitutional_score: 0.0,
            decay_score: 1.0,
            access_count: 0,
            canvas_ids: Vec::new(),
            feedback_ids: Vec::new(),
            feedback_score: None,
            context: Vec::new(),
            events,
        })
    }

    /// Attach look-back context from the previous episode.
    pub fn with_context(mut self, context: Vec<InteractionEvent>) -> Self {
        self.context = context;
        self
    }

    /// Number of member events (context excluded).
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Span duration.
    pub fn duration(&self) -> chrono::Duration {
        self.end_time - self.start_time
    }

    /// Record a recall of this episode.
    pub fn record_access(&mut self) {
        self.access_count += 1;
    }

    /// Link a canvas interaction.
    pub fn link_canvas(&mut self, canvas_id: Uuid) {
        self.canvas_ids.push(canvas_id);
    }

    /// Link feedback records and recompute the aggregate score over all
    /// signals seen so far plus the new batch.
    pub fn apply_feedback(
        &mut self,
        ids: &[Uuid],
        signals: &[FeedbackSignal],
    ) -> Result<(), String> {
        self.feedback_ids.extend_from_slice(ids);
        self.feedback_score = aggregate_feedback_score(signals)?;
        Ok(())
    }

    /// Whether this episode's time range overlaps another's.
    pub fn overlaps(&self, other: &Episode) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, minute, 0).unwrap()
    }

    #[test]
    fn test_from_events_sets_span_and_topics() {
        let events = vec![
            InteractionEvent::new("a1", at(0), "x").with_topic("billing"),
            InteractionEvent::new("a1", at(5), "y").with_topic("billing"),
        ];
        let episode = Episode::from_events("a1", events, BoundaryTrigger::StreamEnd).unwrap();
        assert_eq!(episode.start_time, at(0));
        assert_eq!(episode.end_time, at(5));
        assert!(episode.end_time >= episode.start_time);
        assert!(episode.topics.contains("billing"));
        assert_eq!(episode.status, EpisodeStatus::Completed);
    }

    #[test]
    fn test_empty_run_rejected() {
        assert!(Episode::from_events("a1", vec![], BoundaryTrigger::StreamEnd).is_err());
    }

    #[test]
    fn test_apply_feedback_recomputes_score() {
        let events = vec![InteractionEvent::new("a1", at(0), "x")];
        let mut episode = Episode::from_events("a1", events, BoundaryTrigger::StreamEnd).unwrap();
        assert_eq!(episode.feedback_score, None);

        episode
            .apply_feedback(
                &[Uuid::new_v4()],
                &[FeedbackSignal::ThumbsUp, FeedbackSignal::Rating(3)],
            )
            .unwrap();
        assert_eq!(episode.feedback_score, Some(0.5));
        assert_eq!(episode.feedback_ids.len(), 1);
    }

    #[test]
    fn test_overlap_detection() {
        let a = Episode::from_events(
            "a1",
            vec![
                InteractionEvent::new("a1", at(0), "x"),
                InteractionEvent::new("a1", at(10), "y"),
            ],
            BoundaryTrigger::StreamEnd,
        )
        .unwrap();
        let b = Episode::from_events(
            "a1",
            vec![
                InteractionEvent::new("a1", at(11), "z"),
                InteractionEvent::new("a1", at(20), "w"),
            ],
            BoundaryTrigger::StreamEnd,
        )
        .unwrap();
        assert!(!a.overlaps(&b));
    }
}
