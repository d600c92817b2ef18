#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Quakewave adapters.
//!
//! The engine's live events are converted into a declarative [`Scene`] once
//! per frame. Backends only ever see the scene, never the engine.

mod recorder;

use anyhow::Result as AnyResult;
use glam::Vec2;
use quakewave_core::{FailureReason, Mode, ScreenPoint};
use quakewave_system_waves::WaveEvent;

pub use recorder::{rasterize, FrameRecorder};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Fill of every epicenter marker.
pub const EPICENTER_COLOR: Color = Color::new(0.86, 0.24, 0.18, 0.55);

/// Fill of every visible wave.
pub const WAVE_COLOR: Color = Color::new(0.98, 0.82, 0.35, 0.9);

/// Lightening applied to the most recently admitted event.
const HIGHLIGHT_AMOUNT: f32 = 0.5;

/// Circle drawn at an event's epicenter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpicenterMarker {
    /// Center of the marker in screen pixels.
    pub center: Vec2,
    /// Diameter of the marker in screen pixels.
    pub diameter: f32,
    /// Whether the marker belongs to the most recently admitted event.
    pub highlighted: bool,
    /// Fill colour.
    pub color: Color,
}

/// Disc drawn at the head of a visible wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveDisc {
    /// Center of the disc in screen pixels.
    pub center: Vec2,
    /// Diameter of the disc, equal to the event's current wave width.
    pub diameter: f32,
    /// Fill colour.
    pub color: Color,
}

/// Declarative description of one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Width of the frame in pixels.
    pub width: u32,
    /// Height of the frame in pixels.
    pub height: u32,
    /// Epicenter markers, oldest event first.
    pub markers: Vec<EpicenterMarker>,
    /// Visible waves, oldest event first.
    pub waves: Vec<WaveDisc>,
    /// Active mode, if one has been selected.
    pub mode: Option<Mode>,
    /// Message shown instead of the animation when playback failed.
    pub status: Option<String>,
}

impl Scene {
    /// Builds the scene for the provided live events.
    ///
    /// Every event contributes its epicenter marker; only waves that are
    /// currently visible contribute a disc.
    #[must_use]
    pub fn from_live_events(events: &[WaveEvent], width: u32, height: u32) -> Self {
        let mut markers = Vec::with_capacity(events.len());
        let mut waves = Vec::with_capacity(events.len() * 2);

        for event in events {
            let color = if event.is_most_recent() {
                EPICENTER_COLOR.lighten(HIGHLIGHT_AMOUNT)
            } else {
                EPICENTER_COLOR
            };
            markers.push(EpicenterMarker {
                center: to_vec2(event.epicenter()),
                diameter: event.epicenter_diameter(),
                highlighted: event.is_most_recent(),
                color,
            });

            for wave in event.waves() {
                if event.is_wave_visible(wave.heading()) {
                    waves.push(WaveDisc {
                        center: to_vec2(wave.position()),
                        diameter: event.wave_width(),
                        color: WAVE_COLOR,
                    });
                }
            }
        }

        Self {
            width,
            height,
            markers,
            waves,
            mode: None,
            status: None,
        }
    }

    /// Tags the scene with the active mode.
    #[must_use]
    pub fn with_mode(mut self, mode: Option<Mode>) -> Self {
        self.mode = mode;
        self
    }

    /// Shows the user-visible text of `failure`, if any.
    #[must_use]
    pub fn with_failure(mut self, failure: Option<&FailureReason>) -> Self {
        self.status = failure.map(ToString::to_string);
        self
    }
}

fn to_vec2(point: ScreenPoint) -> Vec2 {
    Vec2::new(point.x(), point.y())
}

/// Rendering backend capable of presenting scenes.
pub trait RenderingBackend {
    /// Presents one frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

impl<B> RenderingBackend for Box<B>
where
    B: RenderingBackend + ?Sized,
{
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        (**self).present(scene)
    }
}

/// Backend that only reports scene statistics through `tracing`.
#[derive(Debug, Default)]
pub struct TraceBackend {
    frames: u64,
}

impl TraceBackend {
    /// Number of frames presented so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderingBackend for TraceBackend {
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        self.frames += 1;
        match &scene.status {
            Some(status) => tracing::debug!(frame = self.frames, %status, "frame"),
            None => tracing::debug!(
                frame = self.frames,
                markers = scene.markers.len(),
                waves = scene.waves.len(),
                "frame"
            ),
        }
        Ok(())
    }
}
