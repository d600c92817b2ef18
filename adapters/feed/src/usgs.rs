use std::time::Duration;

use quakewave_core::{FeedError, FeedQuery, RawEvent};
use tracing::{debug, info};

use crate::{geojson, EventFeed};

/// Host serving both the summary feeds and the FDSN query endpoint.
pub const DEFAULT_BASE_URL: &str = "https://earthquake.usgs.gov";

const SUMMARY_PATH: &str = "earthquakes/feed/v1.0/summary";
const QUERY_PATH: &str = "fdsnws/event/1/query";

/// Fetches events from the USGS earthquake service over HTTP.
#[derive(Clone, Debug)]
pub struct UsgsFeed {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl UsgsFeed {
    /// Creates a feed whose requests give up after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { http, base_url })
    }

    /// URL answering `query`, or `None` for queries served elsewhere.
    #[must_use]
    pub fn url_for(&self, query: &FeedQuery) -> Option<String> {
        let base = &self.base_url;
        match query {
            FeedQuery::Live => Some(format!("{base}/{SUMMARY_PATH}/all_hour.geojson")),
            FeedQuery::PastDays(days) => {
                let window = match days {
                    0 | 1 => "all_day",
                    2..=7 => "all_week",
                    _ => "all_month",
                };
                Some(format!("{base}/{SUMMARY_PATH}/{window}.geojson"))
            }
            FeedQuery::Range(range) => {
                let end = range.end().next_day()?;
                Some(format!(
                    "{base}/{QUERY_PATH}?format=geojson&starttime={}&endtime={end}",
                    range.start(),
                ))
            }
            FeedQuery::Backup => None,
        }
    }
}

impl EventFeed for UsgsFeed {
    fn fetch(&self, query: &FeedQuery) -> Result<Vec<RawEvent>, FeedError> {
        let url = self.url_for(query).ok_or_else(|| {
            FeedError::Unavailable(format!("{query:?} is not served by the USGS feed"))
        })?;
        debug!(%url, "requesting feed");

        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|error| FeedError::Unavailable(error.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Unavailable(format!("{url} answered {status}")));
        }
        let body = response
            .text()
            .map_err(|error| FeedError::Unavailable(error.to_string()))?;

        let events = geojson::decode(&body)?;
        info!(%url, events = events.len(), "feed fetched");
        Ok(events)
    }
}
