//! Property tests for the segmentation invariants: exact partition,
//! chronological ordering, and topic homogeneity hold for arbitrary
//! event streams.

use atom_memory::domain::models::InteractionEvent;
use atom_memory::services::EpisodeSegmentationService;
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

/// (gap to previous event in minutes, topic index, task_complete)
fn event_stream() -> impl Strategy<Value = Vec<(u16, Option<u8>, bool)>> {
    prop::collection::vec(
        (0u16..600, prop::option::of(0u8..3), prop::bool::ANY),
        0..40,
    )
}

fn materialize(raw: &[(u16, Option<u8>, bool)]) -> Vec<InteractionEvent> {
    let base = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
    let mut timestamp = base;
    raw.iter()
        .map(|(gap, topic, complete)| {
            timestamp += Duration::minutes(i64::from(*gap));
            let mut event = InteractionEvent::new("agent-p", timestamp, "event");
            if let Some(t) = topic {
                event = event.with_topic(format!("topic-{t}"));
            }
            if *complete {
                event = event.completing();
            }
            event
        })
        .collect()
}

proptest! {
    #[test]
    fn partition_is_complete_and_exact(raw in event_stream()) {
        let events = materialize(&raw);
        let service = EpisodeSegmentationService::with_defaults();
        let episodes = service.segment("agent-p", &events).unwrap();

        let recovered: Vec<_> = episodes
            .iter()
            .flat_map(|e| e.events.iter().map(|ev| ev.id))
            .collect();
        let input_ids: Vec<_> = events.iter().map(|e| e.id).collect();
        prop_assert_eq!(recovered, input_ids);
    }

    #[test]
    fn episodes_are_chronologically_ordered(raw in event_stream()) {
        let events = materialize(&raw);
        let service = EpisodeSegmentationService::with_defaults();
        let episodes = service.segment("agent-p", &events).unwrap();

        for episode in &episodes {
            prop_assert!(episode.end_time >= episode.start_time);
        }
        for pair in episodes.windows(2) {
            prop_assert!(pair[0].end_time <= pair[1].start_time);
        }
    }

    #[test]
    fn labelled_members_share_one_topic(raw in event_stream()) {
        let events = materialize(&raw);
        let service = EpisodeSegmentationService::with_defaults();
        let episodes = service.segment("agent-p", &events).unwrap();

        // Unlabelled events join whatever segment is open, so homogeneity
        // is over labelled members only.
        for episode in &episodes {
            let labels: std::collections::BTreeSet<_> = episode
                .events
                .iter()
                .filter_map(|e| e.topic.as_deref())
                .collect();
            prop_assert!(labels.len() <= 1);
        }
    }

    #[test]
    fn completion_markers_only_close_segments(raw in event_stream()) {
        let events = materialize(&raw);
        let service = EpisodeSegmentationService::with_defaults();
        let episodes = service.segment("agent-p", &events).unwrap();

        for episode in &episodes {
            // A completion flag anywhere but the tail would mean the
            // episode failed to close on it.
            for event in &episode.events[..episode.events.len() - 1] {
                prop_assert!(!event.task_complete);
            }
        }
    }
}
