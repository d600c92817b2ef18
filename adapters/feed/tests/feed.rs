use std::{path::PathBuf, time::Duration};

use quakewave_core::{Command, FeedError, FeedPurpose, FeedQuery, FeedTicket, RawEvent};
use quakewave_feed::{decode, BackupFeed, EventFeed, FeedRouter, FeedWorker};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

struct Offline;

impl EventFeed for Offline {
    fn fetch(&self, _query: &FeedQuery) -> Result<Vec<RawEvent>, FeedError> {
        Err(FeedError::Unavailable("offline".to_owned()))
    }
}

#[test]
fn backup_fixture_keeps_storage_order_and_skips_incomplete_features() {
    let events = BackupFeed::new(fixture("week.geojson"))
        .fetch(&FeedQuery::Backup)
        .expect("fixture loads");

    let timestamps: Vec<i64> = events.iter().map(RawEvent::timestamp_ms).collect();
    assert_eq!(
        timestamps,
        vec![1_700_000_300_000, 1_700_000_100_000, 1_700_000_200_000]
    );
    assert_eq!(events[2].reported_magnitude(), None);
    assert_eq!(events[2].magnitude(), 0.0);
    assert_eq!(events[0].longitude(), 178.41);
    assert_eq!(events[0].latitude(), -25.02);
}

#[test]
fn missing_backup_file_is_unavailable() {
    let outcome = BackupFeed::new(fixture("does-not-exist.geojson")).fetch(&FeedQuery::Backup);
    assert!(matches!(outcome, Err(FeedError::Unavailable(message)) if message.contains("does-not-exist")));
}

#[test]
fn truncated_payloads_are_malformed() {
    assert!(matches!(
        decode(r#"{"features": [{"properties": {"time": 1}"#),
        Err(FeedError::Malformed(_))
    ));
}

#[test]
fn worker_returns_tagged_replies() {
    let router = FeedRouter::new(Offline, BackupFeed::new(fixture("week.geojson")));
    let worker = FeedWorker::spawn(router).expect("worker spawns");
    let backup_ticket = FeedTicket::new(3, FeedPurpose::Initial);
    let live_ticket = FeedTicket::new(4, FeedPurpose::Refresh);

    worker
        .request(backup_ticket, FeedQuery::Backup)
        .expect("request queued");
    worker
        .request(live_ticket, FeedQuery::Live)
        .expect("request queued");

    let first = worker
        .recv_timeout(Duration::from_secs(10))
        .expect("backup reply");
    assert_eq!(first.ticket, backup_ticket);
    assert_eq!(first.outcome.as_ref().map(Vec::len), Ok(3));

    let second = worker
        .recv_timeout(Duration::from_secs(10))
        .expect("live reply");
    assert_eq!(second.ticket, live_ticket);
    assert_eq!(
        second.clone().into_command(),
        Command::DeliverFeed {
            ticket: live_ticket,
            outcome: Err(FeedError::Unavailable("offline".to_owned())),
        }
    );
    assert!(worker.try_recv().is_none());
}
