use quakewave_core::{Mood, QuakeId, RawEvent, ScreenPoint, Terrain, TerrainGrid};

use crate::WaveTuning;

/// Horizontal direction a wave travels in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Heading {
    /// Travels toward decreasing `x`.
    West,
    /// Travels toward increasing `x`.
    East,
}

impl Heading {
    /// Horizontal displacement applied every tick.
    #[must_use]
    pub const fn step(self) -> f32 {
        match self {
            Self::West => -1.0,
            Self::East => 1.0,
        }
    }
}

/// One of the two point trackers emitted by an event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wave {
    pub(crate) heading: Heading,
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) terrain: Terrain,
}

impl Wave {
    fn launch(heading: Heading, epicenter: ScreenPoint, terrain: Terrain) -> Self {
        Self {
            heading,
            x: epicenter.x(),
            y: epicenter.y(),
            terrain,
        }
    }

    /// Direction the wave travels in.
    #[must_use]
    pub const fn heading(&self) -> Heading {
        self.heading
    }

    /// Current screen position.
    #[must_use]
    pub const fn position(&self) -> ScreenPoint {
        ScreenPoint::new(self.x, self.y)
    }

    /// Terrain observed under the wave on its most recent tick.
    #[must_use]
    pub const fn terrain(&self) -> Terrain {
        self.terrain
    }
}

/// Live, simulated state of one admitted earthquake.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveEvent {
    id: QuakeId,
    timestamp_ms: i64,
    magnitude: f32,
    epicenter: ScreenPoint,
    epicenter_diameter: f32,
    pub(crate) wave_width: f32,
    pub(crate) waves: [Wave; 2],
    is_most_recent: bool,
}

impl WaveEvent {
    /// Creates the live state for an event admitted at `epicenter`.
    ///
    /// Both waves start on the epicenter and the event starts out as the most
    /// recent one; callers demote the previous holder of that flag.
    #[must_use]
    pub fn admit(
        id: QuakeId,
        event: &RawEvent,
        epicenter: ScreenPoint,
        terrain: &TerrainGrid,
        tuning: &WaveTuning,
        mood: Mood,
    ) -> Self {
        let magnitude = event.magnitude();
        let here = terrain.classify(epicenter.x(), epicenter.y());
        Self {
            id,
            timestamp_ms: event.timestamp_ms(),
            magnitude,
            epicenter,
            epicenter_diameter: non_negative(magnitude * tuning.diameter_per_magnitude * mood.width),
            wave_width: non_negative(magnitude * tuning.width_per_magnitude * mood.width),
            waves: [
                Wave::launch(Heading::West, epicenter, here),
                Wave::launch(Heading::East, epicenter, here),
            ],
            is_most_recent: true,
        }
    }

    /// Identifier assigned at admission.
    #[must_use]
    pub const fn id(&self) -> QuakeId {
        self.id
    }

    /// Origin time of the underlying record.
    #[must_use]
    pub const fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    /// Magnitude of the underlying record, missing values read as zero.
    #[must_use]
    pub const fn magnitude(&self) -> f32 {
        self.magnitude
    }

    /// Projected epicenter, fixed for the life of the event.
    #[must_use]
    pub const fn epicenter(&self) -> ScreenPoint {
        self.epicenter
    }

    /// Diameter of the epicenter marker.
    #[must_use]
    pub const fn epicenter_diameter(&self) -> f32 {
        self.epicenter_diameter
    }

    /// Width shared by both waves; zero once fully decayed.
    #[must_use]
    pub const fn wave_width(&self) -> f32 {
        self.wave_width
    }

    /// Both waves, westbound first.
    #[must_use]
    pub const fn waves(&self) -> &[Wave; 2] {
        &self.waves
    }

    /// Wave travelling in the requested direction.
    #[must_use]
    pub fn wave(&self, heading: Heading) -> &Wave {
        match heading {
            Heading::West => &self.waves[0],
            Heading::East => &self.waves[1],
        }
    }

    /// Reports whether the wave should be drawn this frame.
    #[must_use]
    pub fn is_wave_visible(&self, heading: Heading) -> bool {
        self.wave(heading).terrain != Terrain::OutOfBounds && self.wave_width > 0.0
    }

    /// Reports whether the waves have decayed to nothing.
    #[must_use]
    pub fn is_faded(&self) -> bool {
        self.wave_width <= 0.0
    }

    /// Reports whether this is the newest admitted event.
    #[must_use]
    pub const fn is_most_recent(&self) -> bool {
        self.is_most_recent
    }

    /// Clears the most-recent flag once a newer event has been admitted.
    pub fn demote(&mut self) {
        self.is_most_recent = false;
    }
}

fn non_negative(value: f32) -> f32 {
    if value > 0.0 {
        value
    } else {
        0.0
    }
}
