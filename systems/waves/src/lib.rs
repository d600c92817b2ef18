#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-frame wave motion for admitted earthquakes.
//!
//! Every event emits two waves that leave the epicenter in opposite horizontal
//! directions at one pixel per tick. Their vertical motion depends on the
//! terrain under each wave: a bounded random step over land, a drift sampled
//! from a smooth noise field over water, and nothing at all once the wave has
//! crossed the horizontal screen edges. Both waves share a width that decays
//! by a fixed amount per tick until it snaps to zero.

mod event;
mod field;

use quakewave_core::{Mood, Terrain, TerrainGrid};
use rand::Rng;
use serde::Deserialize;
use tracing::warn;

pub use event::{Heading, Wave, WaveEvent};
pub use field::NoiseField;

/// Tunable constants of the wave motion model.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// Maximum vertical step, in pixels, taken per tick over land.
    pub land_randomness: f32,
    /// Spatial frequency at which the water noise field is sampled.
    pub noise_scale: f32,
    /// Constant subtracted from every water noise sample.
    pub noise_offset: f32,
    /// Width removed from every event per tick.
    pub decay_rate: f32,
    /// Epicenter marker diameter per unit of magnitude.
    pub diameter_per_magnitude: f32,
    /// Initial wave width per unit of magnitude.
    pub width_per_magnitude: f32,
    /// Seed of the water noise field.
    pub noise_seed: u32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            land_randomness: 1.0,
            noise_scale: 0.01,
            noise_offset: 0.4,
            decay_rate: 0.001,
            diameter_per_magnitude: 4.0,
            width_per_magnitude: 0.5,
            noise_seed: 0,
        }
    }
}

/// Advances admitted events by one frame at a time.
#[derive(Clone, Debug)]
pub struct WaveSimulation {
    tuning: WaveTuning,
    field: NoiseField,
}

impl Default for WaveSimulation {
    fn default() -> Self {
        Self::new(WaveTuning::default())
    }
}

impl WaveSimulation {
    /// Creates a simulation using the provided tuning.
    ///
    /// A decay rate that is not strictly positive would keep faded waves alive
    /// forever, so it falls back to the default rate.
    #[must_use]
    pub fn new(mut tuning: WaveTuning) -> Self {
        if !(tuning.decay_rate.is_finite() && tuning.decay_rate > 0.0) {
            let fallback = WaveTuning::default().decay_rate;
            warn!(
                configured = tuning.decay_rate,
                fallback, "decay rate must be positive; using default"
            );
            tuning.decay_rate = fallback;
        }
        let field = NoiseField::new(tuning.noise_seed);
        Self { tuning, field }
    }

    /// Tuning applied by the simulation.
    #[must_use]
    pub const fn tuning(&self) -> &WaveTuning {
        &self.tuning
    }

    /// Advances `event` by exactly one frame.
    ///
    /// Each wave first records the terrain under its current position, then
    /// moves one pixel along its heading, then moves vertically according to
    /// the recorded terrain. Width decays once per call, shared by both waves.
    pub fn tick<R>(&self, event: &mut WaveEvent, terrain: &TerrainGrid, mood: Mood, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for wave in &mut event.waves {
            self.advance_wave(wave, terrain, mood, rng);
        }
        event.wave_width = self.decay(event.wave_width);
    }

    fn advance_wave<R>(&self, wave: &mut Wave, terrain: &TerrainGrid, mood: Mood, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        wave.terrain = terrain.classify(wave.x, wave.y);
        wave.x += wave.heading.step();

        match wave.terrain {
            Terrain::OutOfBounds => {}
            Terrain::Land => {
                let amplitude = self.tuning.land_randomness * mood.land_randomness;
                if amplitude.is_finite() && amplitude > 0.0 {
                    wave.y += rng.gen_range(-amplitude..=amplitude);
                }
            }
            Terrain::Water => {
                let frequency = f64::from(self.tuning.noise_scale * mood.water_noise);
                let sample = self
                    .field
                    .sample(f64::from(wave.x) * frequency, f64::from(wave.y) * frequency);
                wave.y += sample - self.tuning.noise_offset;
            }
        }
    }

    fn decay(&self, width: f32) -> f32 {
        let decay_rate = self.tuning.decay_rate;
        let width = width - decay_rate;
        if width <= decay_rate {
            0.0
        } else {
            width
        }
    }
}
