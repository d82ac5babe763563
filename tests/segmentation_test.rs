use atom_memory::adapters::memory::InMemoryEventStore;
use atom_memory::domain::models::{BoundaryTrigger, InteractionEvent};
use atom_memory::domain::ports::EventStore;
use atom_memory::services::{EpisodeSegmentationService, SegmentationConfig};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

fn event_at(minutes: i64) -> InteractionEvent {
    InteractionEvent::new("agent-1", base() + Duration::minutes(minutes), "message")
}

#[test]
fn time_gap_boundary_is_exact() {
    let service = EpisodeSegmentationService::with_defaults();

    // Exactly 4h: no split.
    let at_threshold = [event_at(0), event_at(4 * 60)];
    assert_eq!(service.segment("agent-1", &at_threshold).unwrap().len(), 1);

    // 4h 1min: split.
    let over_threshold = [event_at(0), event_at(4 * 60 + 1)];
    let episodes = service.segment("agent-1", &over_threshold).unwrap();
    assert_eq!(episodes.len(), 2);
    assert_eq!(episodes[0].boundary, BoundaryTrigger::TimeGap);

    // 3h 59min: no split.
    let under_threshold = [event_at(0), event_at(4 * 60 - 1)];
    assert_eq!(service.segment("agent-1", &under_threshold).unwrap().len(), 1);
}

#[test]
fn mixed_triggers_produce_exact_partition() {
    let service = EpisodeSegmentationService::with_defaults();
    let events = [
        event_at(0).with_topic("standup"),
        event_at(5).with_topic("standup"),
        event_at(10).with_topic("deploy"),
        event_at(15).with_topic("deploy").completing(),
        event_at(20).with_topic("deploy"),
        event_at(20 + 5 * 60).with_topic("deploy"),
    ];

    let episodes = service.segment("agent-1", &events).unwrap();
    assert_eq!(episodes.len(), 4);
    assert_eq!(episodes[0].boundary, BoundaryTrigger::TopicShift);
    assert_eq!(episodes[1].boundary, BoundaryTrigger::TaskComplete);
    assert_eq!(episodes[2].boundary, BoundaryTrigger::TimeGap);
    assert_eq!(episodes[3].boundary, BoundaryTrigger::StreamEnd);

    // No loss, no duplication, order preserved.
    let recovered: Vec<_> = episodes
        .iter()
        .flat_map(|e| e.events.iter().map(|ev| ev.id))
        .collect();
    let input_ids: Vec<_> = events.iter().map(|e| e.id).collect();
    assert_eq!(recovered, input_ids);

    // Chronological non-overlap.
    for pair in episodes.windows(2) {
        assert!(pair[0].end_time <= pair[1].start_time);
    }
}

#[test]
fn unlabelled_event_before_labelled_one_does_not_split() {
    let service = EpisodeSegmentationService::with_defaults();
    let events = [
        event_at(0),
        event_at(1).with_topic("billing"),
        event_at(2),
        event_at(3).with_topic("billing"),
    ];
    let episodes = service.segment("agent-1", &events).unwrap();
    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].len(), 4);
    assert!(episodes[0].topics.contains("billing"));
}

#[test]
fn completion_flag_sits_only_on_segment_tail() {
    let service = EpisodeSegmentationService::with_defaults();
    let events = [
        event_at(0),
        event_at(1).completing(),
        event_at(2),
        event_at(3).completing(),
    ];
    let episodes = service.segment("agent-1", &events).unwrap();
    assert_eq!(episodes.len(), 2);
    for episode in &episodes {
        assert!(episode.events.last().unwrap().task_complete);
        let flagged = episode.events.iter().filter(|e| e.task_complete).count();
        assert_eq!(flagged, 1);
    }
}

#[test]
fn context_carry_respects_window_and_membership() {
    let service = EpisodeSegmentationService::new(SegmentationConfig {
        max_gap: Duration::hours(4),
        context_window: 3,
    });
    let events: Vec<_> = (0..6)
        .map(|i| {
            let event = event_at(i);
            if i == 3 { event.completing() } else { event }
        })
        .collect();

    let episodes = service.segment("agent-1", &events).unwrap();
    assert_eq!(episodes.len(), 2);
    assert!(episodes[0].context.is_empty());
    assert_eq!(episodes[1].context.len(), 3);

    // Context events are members of the prior episode, not this one.
    for ctx in &episodes[1].context {
        assert!(episodes[0].events.iter().any(|e| e.id == ctx.id));
        assert!(!episodes[1].events.iter().any(|e| e.id == ctx.id));
    }
}

#[tokio::test]
async fn segment_from_store_round_trip() {
    let store = InMemoryEventStore::new();
    for minutes in [0, 10, 20, 600] {
        store.record(&event_at(minutes)).await.unwrap();
    }

    let service = EpisodeSegmentationService::with_defaults();
    let episodes = service.segment_from_store(&store, "agent-1").await.unwrap();
    assert_eq!(episodes.len(), 2);
    assert_eq!(episodes[0].len(), 3);
    assert_eq!(episodes[1].len(), 1);
}
