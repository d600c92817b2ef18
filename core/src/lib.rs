#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Quakewave engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative simulation engine, and pure systems. Adapters submit
//! [`Command`] values describing desired mutations, the engine executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what changed. Feed fetching happens outside the engine: the
//! engine asks for data with [`Event::FeedRequested`] and receives the outcome
//! through [`Command::DeliverFeed`].

mod calendar;
mod projection;
mod terrain;

use std::{fmt, time::Duration};

pub use calendar::{CalendarDate, DateRange, DateRangeError, MAX_YEAR, MIN_YEAR};
pub use projection::{
    Projection, LATITUDE_NORTH, LATITUDE_SOUTH, LONGITUDE_EAST, LONGITUDE_WEST,
};
pub use terrain::{Surface, Terrain, TerrainError, TerrainGrid};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Quakewave: the planet's tremors, replayed.";

/// Number of days covered by the past-month feed.
pub const PAST_MONTH_DAYS: u32 = 30;

/// Describes the top-level presentation mode of the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Replays the live hourly feed and refreshes it periodically.
    Realtime,
    /// Replays every event recorded over the past month.
    PastMonth,
    /// Replays an explicit, user-selected date range.
    FreeRange,
    /// Admits synthetic events from pointer gestures instead of a feed.
    Interactive,
    /// Replays the static backup dataset shipped with the application.
    Backup,
}

impl Mode {
    /// Reports whether the mode admits events through a playback scheduler.
    #[must_use]
    pub const fn is_scheduled(self) -> bool {
        !matches!(self, Self::Interactive)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Realtime => "realtime",
            Self::PastMonth => "past-month",
            Self::FreeRange => "free-range",
            Self::Interactive => "interactive",
            Self::Backup => "backup",
        };
        f.write_str(label)
    }
}

/// External trigger requesting a transition into a mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModeTrigger {
    /// Switch to the realtime feed.
    Realtime,
    /// Switch to the past-month feed.
    PastMonth,
    /// Switch to a free date range.
    FreeRange {
        /// Inclusive range of days to replay.
        range: DateRange,
    },
    /// Switch to pointer-driven synthesis.
    Interactive,
    /// Switch to the bundled backup dataset.
    Backup,
}

impl ModeTrigger {
    /// Mode activated by the trigger.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        match self {
            Self::Realtime => Mode::Realtime,
            Self::PastMonth => Mode::PastMonth,
            Self::FreeRange { .. } => Mode::FreeRange,
            Self::Interactive => Mode::Interactive,
            Self::Backup => Mode::Backup,
        }
    }

    /// Feed query that provides the events for the triggered mode, if any.
    #[must_use]
    pub const fn feed_query(&self) -> Option<FeedQuery> {
        match self {
            Self::Realtime => Some(FeedQuery::Live),
            Self::PastMonth => Some(FeedQuery::PastDays(PAST_MONTH_DAYS)),
            Self::FreeRange { range } => Some(FeedQuery::Range(*range)),
            Self::Interactive => None,
            Self::Backup => Some(FeedQuery::Backup),
        }
    }
}

/// Query understood by event feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeedQuery {
    /// Events recorded during the last hour.
    Live,
    /// Events recorded during the trailing number of days.
    PastDays(u32),
    /// Events recorded within the inclusive date range.
    Range(DateRange),
    /// Events stored in the local backup dataset.
    Backup,
}

/// Reason a fetch was issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeedPurpose {
    /// First fetch performed when entering a mode.
    Initial,
    /// Scheduled refresh of an already playing realtime feed.
    Refresh,
}

/// Tag attached to every fetch so stale results can be recognised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FeedTicket {
    generation: u64,
    purpose: FeedPurpose,
}

impl FeedTicket {
    /// Creates a ticket for the provided engine generation.
    #[must_use]
    pub const fn new(generation: u64, purpose: FeedPurpose) -> Self {
        Self {
            generation,
            purpose,
        }
    }

    /// Engine generation that issued the fetch.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Reason the fetch was issued.
    #[must_use]
    pub const fn purpose(&self) -> FeedPurpose {
        self.purpose
    }
}

/// Failures reported by event feeds.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    /// The feed could not be reached or read.
    #[error("feed unavailable: {0}")]
    Unavailable(String),
    /// The feed answered with a payload that could not be decoded.
    #[error("feed payload malformed: {0}")]
    Malformed(String),
}

/// Reason the engine entered its error substate.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FailureReason {
    /// The feed could not be fetched or decoded.
    #[error("earthquake feed unavailable ({0})")]
    FeedUnavailable(String),
    /// The feed answered successfully but contained no events.
    #[error("no earthquakes recorded for the selected period")]
    EmptyFeed,
}

impl From<FeedError> for FailureReason {
    fn from(error: FeedError) -> Self {
        Self::FeedUnavailable(error.to_string())
    }
}

/// Unique identifier assigned to an admitted event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuakeId(u32);

impl QuakeId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable earthquake record produced by an event feed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawEvent {
    timestamp_ms: i64,
    magnitude: Option<f32>,
    longitude: f32,
    latitude: f32,
}

impl RawEvent {
    /// Creates a new record.
    #[must_use]
    pub const fn new(timestamp_ms: i64, magnitude: Option<f32>, longitude: f32, latitude: f32) -> Self {
        Self {
            timestamp_ms,
            magnitude,
            longitude,
            latitude,
        }
    }

    /// Origin time in milliseconds since the Unix epoch (UTC).
    #[must_use]
    pub const fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    /// Magnitude of the event, treating a missing value as zero.
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        self.magnitude.unwrap_or(0.0)
    }

    /// Magnitude exactly as reported by the feed.
    #[must_use]
    pub const fn reported_magnitude(&self) -> Option<f32> {
        self.magnitude
    }

    /// Longitude of the epicenter in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f32 {
        self.longitude
    }

    /// Latitude of the epicenter in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f32 {
        self.latitude
    }
}

/// Position expressed in screen pixels, `y` growing downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPoint {
    x: f32,
    y: f32,
}

impl ScreenPoint {
    /// Creates a new screen-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }
}

/// User-tunable scalars altering wave width and motion amplitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mood {
    /// Multiplier applied to the random walk amplitude on land.
    pub land_randomness: f32,
    /// Multiplier applied to the noise frequency sampled over water.
    pub water_noise: f32,
    /// Multiplier applied to the initial width and epicenter diameter.
    pub width: f32,
}

impl Mood {
    /// Mood that leaves every tuned value untouched.
    pub const NEUTRAL: Self = Self {
        land_randomness: 1.0,
        water_noise: 1.0,
        width: 1.0,
    };
}

impl Default for Mood {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Commands that express all permissible engine mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resets the engine into the mode selected by the trigger.
    SwitchMode {
        /// External trigger describing the requested mode.
        trigger: ModeTrigger,
    },
    /// Advances the simulation by exactly one frame.
    Tick {
        /// Monotonic wall-clock time elapsed since the adapter started.
        now: Duration,
    },
    /// Hands the outcome of a previously requested fetch to the engine.
    DeliverFeed {
        /// Ticket issued alongside the originating [`Event::FeedRequested`].
        ticket: FeedTicket,
        /// Events returned by the feed or the failure it reported.
        outcome: Result<Vec<RawEvent>, FeedError>,
    },
    /// Admits a synthetic event derived from a pointer gesture.
    SynthesizeEvent {
        /// Wall-clock time the pointer was pressed.
        pointer_down: Duration,
        /// Wall-clock time the pointer was released.
        pointer_up: Duration,
        /// Screen position of the gesture.
        pointer: ScreenPoint,
    },
    /// Replaces the mood parameters used for newly admitted events and motion.
    SetMood {
        /// Mood to activate.
        mood: Mood,
    },
}

/// Events broadcast by the engine after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that the engine reset itself into a new mode.
    ModeChanged {
        /// Mode that became active.
        mode: Mode,
    },
    /// Asks the adapter layer to fetch events on the engine's behalf.
    FeedRequested {
        /// Ticket that must accompany the delivered outcome.
        ticket: FeedTicket,
        /// Query describing the events to fetch.
        query: FeedQuery,
    },
    /// Reports that a delivered outcome belonged to a superseded generation.
    FeedDiscarded {
        /// Ticket carried by the stale outcome.
        ticket: FeedTicket,
    },
    /// Reports that playback could not start and ticking is suspended.
    PlaybackFailed {
        /// User-visible reason for the failure.
        reason: FailureReason,
    },
    /// Confirms that a feed was accepted and playback began.
    PlaybackStarted {
        /// Number of events queued for admission.
        events: usize,
    },
    /// Confirms that a new event entered the live set.
    EventAdmitted {
        /// Identifier assigned to the admitted event.
        id: QuakeId,
        /// Origin time of the admitted event.
        timestamp_ms: i64,
    },
    /// Reports that every queued event has been admitted.
    PlaybackExhausted,
    /// Reports that a realtime refresh appended newly discovered events.
    FeedRefreshed {
        /// Number of events appended to the playback queue.
        appended: usize,
    },
    /// Indicates that the simulation advanced by one frame.
    TimeAdvanced {
        /// Wall-clock time of the frame.
        now: Duration,
    },
    /// Confirms that new mood parameters are active.
    MoodChanged {
        /// Mood that became active.
        mood: Mood,
    },
    /// Reports that a mood change was refused outside interactive mode.
    MoodRejected {
        /// Mode that was active when the request arrived, if any.
        mode: Option<Mode>,
    },
    /// Reports that a synthesis request was refused outside interactive mode.
    SynthesisRejected {
        /// Mode that was active when the request arrived, if any.
        mode: Option<Mode>,
    },
}
