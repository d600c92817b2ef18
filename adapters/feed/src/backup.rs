use std::{fs, path::PathBuf};

use quakewave_core::{FeedError, FeedQuery, RawEvent};
use tracing::info;

use crate::{geojson, EventFeed};

/// Serves the bundled dataset from a local GeoJSON file.
#[derive(Clone, Debug)]
pub struct BackupFeed {
    path: PathBuf,
}

impl BackupFeed {
    /// Creates a feed reading from `path` on every fetch.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EventFeed for BackupFeed {
    fn fetch(&self, _query: &FeedQuery) -> Result<Vec<RawEvent>, FeedError> {
        let payload = fs::read_to_string(&self.path).map_err(|error| {
            FeedError::Unavailable(format!("{}: {error}", self.path.display()))
        })?;
        let events = geojson::decode(&payload)?;
        info!(path = %self.path.display(), events = events.len(), "backup dataset loaded");
        Ok(events)
    }
}
