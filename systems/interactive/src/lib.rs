#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns pointer gestures into synthetic earthquake records.

use std::time::Duration;

use quakewave_core::{Projection, RawEvent, ScreenPoint};
use serde::Deserialize;

/// Configuration parameters required to construct the interactive system.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Press duration that adds one unit of magnitude.
    pub millis_per_magnitude: f32,
    /// Largest magnitude a gesture may produce.
    pub max_magnitude: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            millis_per_magnitude: 250.0,
            max_magnitude: 10.0,
        }
    }
}

/// Maps press duration to magnitude and pointer position to coordinates.
#[derive(Clone, Copy, Debug, Default)]
pub struct Interactive {
    config: Config,
}

impl Interactive {
    /// Creates a new interactive system using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Magnitude produced by holding the pointer down for `held`.
    #[must_use]
    pub fn magnitude_for(&self, held: Duration) -> f32 {
        if !(self.config.millis_per_magnitude > 0.0) {
            return self.config.max_magnitude.max(0.0);
        }
        let held_ms = held.as_secs_f32() * 1_000.0;
        (held_ms / self.config.millis_per_magnitude).clamp(0.0, self.config.max_magnitude.max(0.0))
    }

    /// Builds the record for a gesture released at `pointer_up`.
    ///
    /// A release reported before the press counts as an instantaneous tap.
    /// The record is stamped with the release time so it sorts after every
    /// previously synthesised event.
    #[must_use]
    pub fn synthesize(
        &self,
        pointer_down: Duration,
        pointer_up: Duration,
        pointer: ScreenPoint,
        projection: &Projection,
    ) -> RawEvent {
        let magnitude = self.magnitude_for(pointer_up.saturating_sub(pointer_down));
        let (longitude, latitude) = projection.unproject(pointer);
        let timestamp_ms = i64::try_from(pointer_up.as_millis()).unwrap_or(i64::MAX);
        RawEvent::new(timestamp_ms, Some(magnitude), longitude, latitude)
    }
}
