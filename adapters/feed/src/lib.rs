#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Earthquake feed adapters.
//!
//! Feeds answer [`FeedQuery`] values with decoded [`RawEvent`] lists. The
//! engine never calls a feed directly: the adapter layer hands requests to a
//! [`FeedWorker`], which fetches on a background thread and returns tagged
//! outcomes that are delivered back to the engine on a later frame.

mod backup;
mod geojson;
mod usgs;
mod worker;

use quakewave_core::{FeedError, FeedQuery, RawEvent};

pub use backup::BackupFeed;
pub use geojson::decode;
pub use usgs::{UsgsFeed, DEFAULT_BASE_URL};
pub use worker::{FeedReply, FeedWorker};

/// Source of earthquake records.
pub trait EventFeed {
    /// Fetches every event matching `query`.
    fn fetch(&self, query: &FeedQuery) -> Result<Vec<RawEvent>, FeedError>;
}

impl<F> EventFeed for Box<F>
where
    F: EventFeed + ?Sized,
{
    fn fetch(&self, query: &FeedQuery) -> Result<Vec<RawEvent>, FeedError> {
        (**self).fetch(query)
    }
}

/// Dispatches backup queries to a local dataset and everything else upstream.
#[derive(Debug)]
pub struct FeedRouter<R, B> {
    remote: R,
    backup: B,
}

impl<R, B> FeedRouter<R, B> {
    /// Creates a router over the provided feeds.
    #[must_use]
    pub const fn new(remote: R, backup: B) -> Self {
        Self { remote, backup }
    }
}

impl<R, B> EventFeed for FeedRouter<R, B>
where
    R: EventFeed,
    B: EventFeed,
{
    fn fetch(&self, query: &FeedQuery) -> Result<Vec<RawEvent>, FeedError> {
        match query {
            FeedQuery::Backup => self.backup.fetch(query),
            FeedQuery::Live | FeedQuery::PastDays(_) | FeedQuery::Range(_) => {
                self.remote.fetch(query)
            }
        }
    }
}
