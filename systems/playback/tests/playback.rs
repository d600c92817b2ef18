use std::time::Duration;

use quakewave_core::RawEvent;
use quakewave_system_playback::{PlaybackError, PlaybackScheduler};

fn quake(timestamp_ms: i64) -> RawEvent {
    RawEvent::new(timestamp_ms, Some(4.5), 142.0, 38.0)
}

#[test]
fn single_event_is_admitted_on_first_poll() {
    let mut scheduler =
        PlaybackScheduler::new(vec![quake(1_000)], 1.0, Duration::ZERO).expect("scheduler");

    assert_eq!(scheduler.clock().previous_event_timestamp(), 1_000);
    let admitted = scheduler.poll(Duration::ZERO).expect("zero wait admits immediately");
    assert_eq!(admitted.timestamp_ms(), 1_000);
    assert!(scheduler.is_exhausted());
    assert_eq!(scheduler.poll(Duration::from_secs(60)), None);
}

#[test]
fn minute_gap_waits_sixty_millis_at_divisor_one_thousand() {
    let mut scheduler = PlaybackScheduler::new(vec![quake(1_000), quake(61_000)], 1_000.0, Duration::ZERO)
        .expect("scheduler");

    assert!(scheduler.poll(Duration::ZERO).is_some(), "first event admitted");
    for millis in [1, 16, 32, 59] {
        assert_eq!(
            scheduler.poll(Duration::from_millis(millis)),
            None,
            "second event admitted too early at {millis}ms"
        );
    }
    let second = scheduler
        .poll(Duration::from_millis(60))
        .expect("second event admitted once the scaled gap elapsed");
    assert_eq!(second.timestamp_ms(), 61_000);
}

#[test]
fn empty_feed_is_rejected() {
    assert_eq!(
        PlaybackScheduler::new(Vec::new(), 1.0, Duration::ZERO).err(),
        Some(PlaybackError::EmptyFeed)
    );
}

#[test]
fn reverse_chronological_feed_is_replayed_oldest_first() {
    let mut scheduler = PlaybackScheduler::new(
        vec![quake(30_000), quake(20_000), quake(10_000)],
        1.0,
        Duration::ZERO,
    )
    .expect("scheduler");

    let mut admitted = Vec::new();
    let mut now = Duration::ZERO;
    while !scheduler.is_exhausted() {
        if let Some(event) = scheduler.poll(now) {
            admitted.push(event.timestamp_ms());
        }
        now += Duration::from_millis(500);
    }

    assert_eq!(admitted, vec![10_000, 20_000, 30_000]);
}

#[test]
fn admissions_respect_scaled_gaps() {
    let timestamps: Vec<i64> = vec![0, 5_000, 5_000, 12_500, 90_000, 91_000, 400_000];
    let divisor = 250.0;
    let events = timestamps.iter().copied().map(quake).collect();
    let mut scheduler = PlaybackScheduler::new(events, divisor, Duration::ZERO).expect("scheduler");

    let frame = Duration::from_micros(16_667);
    let mut now = Duration::ZERO;
    let mut admissions: Vec<(i64, Duration)> = Vec::new();
    while !scheduler.is_exhausted() {
        if let Some(event) = scheduler.poll(now) {
            admissions.push((event.timestamp_ms(), now));
        }
        now += frame;
    }

    assert_eq!(
        admissions.iter().map(|(timestamp, _)| *timestamp).collect::<Vec<_>>(),
        timestamps
    );
    for pair in admissions.windows(2) {
        let (previous_ts, previous_at) = pair[0];
        let (next_ts, next_at) = pair[1];
        let required = (next_ts - previous_ts) as f64 / divisor;
        let observed = (next_at - previous_at).as_micros() as f64 / 1_000.0;
        assert!(
            observed >= required,
            "event at {next_ts} admitted after {observed}ms, required {required}ms"
        );
    }
}

#[test]
fn events_sharing_a_timestamp_are_admitted_back_to_back() {
    let mut scheduler =
        PlaybackScheduler::new(vec![quake(2_000), quake(2_000)], 1.0, Duration::ZERO)
            .expect("scheduler");
    assert!(scheduler.poll(Duration::ZERO).is_some());
    assert!(
        scheduler.poll(Duration::ZERO).is_some(),
        "identical timestamps owe no wait"
    );
}

#[test]
fn extend_appends_only_newer_events() {
    let mut scheduler =
        PlaybackScheduler::new(vec![quake(1_000), quake(2_000)], 1.0, Duration::ZERO)
            .expect("scheduler");
    assert!(scheduler.poll(Duration::ZERO).is_some());
    assert!(scheduler.poll(Duration::from_secs(1)).is_some());
    assert!(scheduler.is_exhausted());

    let appended = scheduler.extend(vec![quake(4_000), quake(2_000), quake(1_500), quake(3_000)]);
    assert_eq!(appended, 2);
    assert!(!scheduler.is_exhausted(), "refresh reactivates the scheduler");
    assert_eq!(scheduler.remaining(), 2);
    assert_eq!(scheduler.total_events(), 4);
    assert_eq!(scheduler.clock().previous_event_timestamp(), 2_000);

    assert_eq!(scheduler.poll(Duration::from_millis(1_999)), None);
    assert_eq!(
        scheduler.poll(Duration::from_secs(2)).map(|event| event.timestamp_ms()),
        Some(3_000)
    );
}
