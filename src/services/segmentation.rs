//! Episode segmentation service.
//!
//! Partitions one agent's ordered event stream into bounded episodes using
//! three independent boundary triggers: elapsed-time gaps, topic shifts,
//! and task-completion markers. Pure in-memory computation; the only I/O
//! lives behind the `EventStore` port.

use chrono::Duration;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{BoundaryTrigger, Episode, InteractionEvent};
use crate::domain::ports::EventStore;

/// Tunables for episode boundary detection.
#[derive(Debug, Clone)]
pub struct SegmentationConfig {
    /// Close the current episode when the gap between consecutive events
    /// strictly exceeds this duration. A gap exactly at the threshold does
    /// not split.
    pub max_gap: Duration,
    /// How many trailing events of the previous episode are carried into
    /// the next episode as non-authoritative look-back context.
    pub context_window: usize,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            max_gap: Duration::hours(4),
            context_window: 5,
        }
    }
}

/// Stateless segmenter over agent event streams.
///
/// Holds no mutable state across calls; safe to share between tasks.
#[derive(Debug, Clone, Default)]
pub struct EpisodeSegmentationService {
    config: SegmentationConfig,
}

impl EpisodeSegmentationService {
    pub fn new(config: SegmentationConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(SegmentationConfig::default())
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Partition an ordered event stream into episodes.
    ///
    /// The union of episode members equals the input exactly: no event is
    /// dropped and none is duplicated. Episodes are chronologically
    /// non-decreasing and never overlap. An empty input yields zero
    /// episodes; a single event yields one single-event episode.
    ///
    /// # Errors
    /// - `ValidationFailed` for malformed events or an agent-id mismatch
    /// - `EventsOutOfOrder` when timestamps are not non-decreasing
    pub fn segment(
        &self,
        agent_id: &str,
        events: &[InteractionEvent],
    ) -> DomainResult<Vec<Episode>> {
        self.validate_stream(agent_id, events)?;

        let mut episodes: Vec<Episode> = Vec::new();
        let mut run: Vec<InteractionEvent> = Vec::new();
        // Last topic label seen in the current run; unlabelled events
        // never change it.
        let mut run_label: Option<String> = None;

        for event in events {
            if let Some(prev) = run.last() {
                if let Some(trigger) = self.boundary_before(prev, event, run_label.as_deref()) {
                    Self::close_run(
                        agent_id,
                        &mut run,
                        trigger,
                        &mut episodes,
                        self.config.context_window,
                    )?;
                    run_label = None;
                }
            }

            if let Some(topic) = &event.topic {
                run_label = Some(topic.clone());
            }
            run.push(event.clone());

            // Completion closes the episode with the marker event inside it,
            // so a completed segment's last event always carries the flag.
            if event.task_complete {
                Self::close_run(
                    agent_id,
                    &mut run,
                    BoundaryTrigger::TaskComplete,
                    &mut episodes,
                    self.config.context_window,
                )?;
                run_label = None;
            }
        }

        if !run.is_empty() {
            Self::close_run(
                agent_id,
                &mut run,
                BoundaryTrigger::StreamEnd,
                &mut episodes,
                self.config.context_window,
            )?;
        }

        tracing::debug!(
            agent_id,
            event_count = events.len(),
            episode_count = episodes.len(),
            "segmented event stream"
        );

        Ok(episodes)
    }

    /// Fetch an agent's events through the store and segment them.
    pub async fn segment_from_store(
        &self,
        store: &dyn EventStore,
        agent_id: &str,
    ) -> DomainResult<Vec<Episode>> {
        let events = store.events_for_agent(agent_id).await?;
        self.segment(agent_id, &events)
    }

    /// Which trigger, if any, closes the current episode before `next`.
    ///
    /// `run_label` is the last topic label seen in the current run. An
    /// unlabelled event carries no topic opinion and joins the segment;
    /// only two differing labels constitute a shift.
    fn boundary_before(
        &self,
        prev: &InteractionEvent,
        next: &InteractionEvent,
        run_label: Option<&str>,
    ) -> Option<BoundaryTrigger> {
        if next.timestamp - prev.timestamp > self.config.max_gap {
            return Some(BoundaryTrigger::TimeGap);
        }
        if let (Some(current), Some(incoming)) = (run_label, next.topic.as_deref()) {
            if current != incoming {
                return Some(BoundaryTrigger::TopicShift);
            }
        }
        None
    }

    fn close_run(
        agent_id: &str,
        run: &mut Vec<InteractionEvent>,
        trigger: BoundaryTrigger,
        episodes: &mut Vec<Episode>,
        context_window: usize,
    ) -> DomainResult<()> {
        let members = std::mem::take(run);
        let context = episodes.last().map_or_else(Vec::new, |prev| {
            let tail_start = prev.events.len().saturating_sub(context_window);
            prev.events[tail_start..].to_vec()
        });

        let episode = Episode::from_events(agent_id, members, trigger)
            .map_err(DomainError::ValidationFailed)?
            .with_context(context);

        tracing::debug!(
            agent_id,
            boundary = episode.boundary.as_str(),
            members = episode.len(),
            "closed episode"
        );
        episodes.push(episode);
        Ok(())
    }

    fn validate_stream(&self, agent_id: &str, events: &[InteractionEvent]) -> DomainResult<()> {
        let mut prev_ts = None;
        for event in events {
            event.validate().map_err(DomainError::ValidationFailed)?;
            if event.agent_id != agent_id {
                return Err(DomainError::ValidationFailed(format!(
                    "event {} belongs to agent {}, expected {}",
                    event.id, event.agent_id, agent_id
                )));
            }
            if let Some(prev) = prev_ts {
                if event.timestamp < prev {
                    return Err(DomainError::EventsOutOfOrder {
                        agent_id: agent_id.to_string(),
                        event_id: event.id,
                    });
                }
            }
            prev_ts = Some(event.timestamp);
        }
        Ok(())
    }
}
