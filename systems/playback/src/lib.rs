#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Playback scheduling that maps feed timestamps onto a replay timeline.
//!
//! Real-world gaps between consecutive events are divided by a speed divisor,
//! so a divisor of `1000` replays a minute of recorded activity in sixty
//! milliseconds of wall-clock time. At most one event is admitted per poll.

use std::time::Duration;

use quakewave_core::RawEvent;
use tracing::debug;

/// Reasons a scheduler cannot be constructed.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PlaybackError {
    /// The feed contained no events to replay.
    #[error("feed contained no events")]
    EmptyFeed,
    /// The speed divisor was zero, negative or not a finite number.
    #[error("speed divisor must be a positive finite number, got {0}")]
    InvalidSpeedDivisor(f64),
}

/// Replay state shared by every admission decision.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackClock {
    speed_divisor: f64,
    previous_event_timestamp: i64,
    wall_clock_anchor: Duration,
    next_feed_index: usize,
}

impl PlaybackClock {
    /// Factor by which real-world gaps are compressed.
    #[must_use]
    pub const fn speed_divisor(&self) -> f64 {
        self.speed_divisor
    }

    /// Timestamp of the most recently admitted event (or the first queued one).
    #[must_use]
    pub const fn previous_event_timestamp(&self) -> i64 {
        self.previous_event_timestamp
    }

    /// Wall-clock time of the last admission (or of scheduler start).
    #[must_use]
    pub const fn wall_clock_anchor(&self) -> Duration {
        self.wall_clock_anchor
    }

    /// Index of the next event awaiting admission.
    #[must_use]
    pub const fn next_feed_index(&self) -> usize {
        self.next_feed_index
    }

    /// Replay delay, in milliseconds, owed before an event at `timestamp_ms`.
    ///
    /// Out-of-order timestamps produce a negative wait and are therefore
    /// admitted on the next poll; they are passed through, not corrected.
    /// The queue is kept sorted, so `poll` never meets one in practice.
    #[must_use]
    pub fn wait_millis(&self, timestamp_ms: i64) -> f64 {
        (timestamp_ms - self.previous_event_timestamp) as f64 / self.speed_divisor
    }
}

/// Computes the divisor that replays `span_millis` of history in `replay_millis`.
#[must_use]
pub fn range_speed_divisor(span_millis: i64, replay_millis: f64) -> f64 {
    let replay_millis = if replay_millis.is_finite() {
        replay_millis.max(1.0)
    } else {
        1.0
    };
    (span_millis as f64 / replay_millis).max(1.0)
}

/// Gates admission of queued feed events by scaled elapsed time.
#[derive(Clone, Debug)]
pub struct PlaybackScheduler {
    queue: Vec<RawEvent>,
    clock: PlaybackClock,
}

impl PlaybackScheduler {
    /// Creates a scheduler that starts its replay timeline at `started_at`.
    ///
    /// Feeds may arrive in any storage order; events are sorted ascending by
    /// timestamp before scheduling.
    pub fn new(
        mut events: Vec<RawEvent>,
        speed_divisor: f64,
        started_at: Duration,
    ) -> Result<Self, PlaybackError> {
        if !(speed_divisor.is_finite() && speed_divisor > 0.0) {
            return Err(PlaybackError::InvalidSpeedDivisor(speed_divisor));
        }

        events.sort_by_key(RawEvent::timestamp_ms);
        let previous_event_timestamp = events
            .first()
            .map(RawEvent::timestamp_ms)
            .ok_or(PlaybackError::EmptyFeed)?;

        Ok(Self {
            clock: PlaybackClock {
                speed_divisor,
                previous_event_timestamp,
                wall_clock_anchor: started_at,
                next_feed_index: 0,
            },
            queue: events,
        })
    }

    /// Admits the next queued event if enough wall-clock time has elapsed.
    pub fn poll(&mut self, now: Duration) -> Option<RawEvent> {
        let next = *self.queue.get(self.clock.next_feed_index)?;
        let wait = self.clock.wait_millis(next.timestamp_ms());
        let elapsed = now.saturating_sub(self.clock.wall_clock_anchor).as_micros() as f64 / 1_000.0;
        if elapsed < wait {
            return None;
        }

        debug!(
            index = self.clock.next_feed_index,
            timestamp_ms = next.timestamp_ms(),
            wait_ms = wait,
            "admitting feed event"
        );
        self.clock.previous_event_timestamp = next.timestamp_ms();
        self.clock.wall_clock_anchor = now;
        self.clock.next_feed_index += 1;
        Some(next)
    }

    /// Appends events newer than anything already queued.
    ///
    /// Admitted events and the replay clock are left untouched; an exhausted
    /// scheduler becomes active again when something is appended. Returns the
    /// number of events appended.
    pub fn extend<I>(&mut self, fresh: I) -> usize
    where
        I: IntoIterator<Item = RawEvent>,
    {
        let newest = self.newest_timestamp();
        let mut appended: Vec<RawEvent> = fresh
            .into_iter()
            .filter(|event| newest.map_or(true, |newest| event.timestamp_ms() > newest))
            .collect();
        appended.sort_by_key(RawEvent::timestamp_ms);
        appended.dedup();

        let count = appended.len();
        self.queue.extend(appended);
        count
    }

    /// Reports whether every queued event has been admitted.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.clock.next_feed_index >= self.queue.len()
    }

    /// Number of events still awaiting admission.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len().saturating_sub(self.clock.next_feed_index)
    }

    /// Total number of events known to the scheduler.
    #[must_use]
    pub fn total_events(&self) -> usize {
        self.queue.len()
    }

    /// Read-only view of the replay clock.
    #[must_use]
    pub const fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    fn newest_timestamp(&self) -> Option<i64> {
        self.queue.iter().map(RawEvent::timestamp_ms).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_divisor_replays_range_in_target_window() {
        let day = 86_400_000;
        assert_eq!(range_speed_divisor(day, 5_000.0), 17_280.0);
        assert_eq!(range_speed_divisor(1_000, 5_000.0), 1.0);
        assert_eq!(range_speed_divisor(day, f64::NAN), day as f64);
    }

    #[test]
    fn event_older_than_the_previous_admission_passes_straight_through() {
        let mut scheduler = PlaybackScheduler::new(
            vec![RawEvent::new(5_000, Some(3.0), 0.0, 0.0)],
            1.0,
            Duration::ZERO,
        )
        .expect("scheduler");
        assert!(scheduler.poll(Duration::ZERO).is_some());

        let older = RawEvent::new(1_000, Some(2.0), 0.0, 0.0);
        scheduler.queue.push(older);
        assert_eq!(scheduler.clock().wait_millis(1_000), -4_000.0);
        assert!(scheduler.clock().wait_millis(1_000) < 0.0);

        assert_eq!(scheduler.poll(Duration::ZERO), Some(older));
        assert_eq!(scheduler.clock().previous_event_timestamp(), 1_000);
        assert!(scheduler.is_exhausted());
    }

    #[test]
    fn rejects_non_positive_divisors() {
        let events = vec![RawEvent::new(0, None, 0.0, 0.0)];
        assert_eq!(
            PlaybackScheduler::new(events.clone(), 0.0, Duration::ZERO).err(),
            Some(PlaybackError::InvalidSpeedDivisor(0.0))
        );
        assert!(PlaybackScheduler::new(events, f64::INFINITY, Duration::ZERO).is_err());
    }
}
