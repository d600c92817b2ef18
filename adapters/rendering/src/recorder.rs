use std::{fs, path::PathBuf};

use anyhow::{Context, Result as AnyResult};
use glam::Vec2;
use image::{Rgba, RgbaImage};
use tracing::{debug, info};

use crate::{Color, RenderingBackend, Scene};

const BLANK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Dims the backdrop while a failure message is shown.
const FAILURE_DIM: f32 = 0.6;

/// Rasterises `scene` on top of `backdrop`.
///
/// A backdrop whose dimensions differ from the scene is ignored.
#[must_use]
pub fn rasterize(scene: &Scene, backdrop: Option<&RgbaImage>) -> RgbaImage {
    let mut frame = match backdrop {
        Some(backdrop) if backdrop.dimensions() == (scene.width, scene.height) => backdrop.clone(),
        _ => RgbaImage::from_pixel(scene.width, scene.height, BLANK),
    };

    if scene.status.is_some() {
        let shade = Color::new(0.0, 0.0, 0.0, FAILURE_DIM);
        for pixel in frame.pixels_mut() {
            blend(pixel, shade);
        }
        return frame;
    }

    for marker in &scene.markers {
        fill_disc(&mut frame, marker.center, marker.diameter, marker.color);
    }
    for wave in &scene.waves {
        fill_disc(&mut frame, wave.center, wave.diameter, wave.color);
    }
    frame
}

fn fill_disc(frame: &mut RgbaImage, center: Vec2, diameter: f32, color: Color) {
    let radius = diameter * 0.5;
    if !(radius > 0.0) {
        return;
    }
    let (width, height) = frame.dimensions();
    let min = (center - Vec2::splat(radius)).floor().max(Vec2::ZERO);
    let max = (center + Vec2::splat(radius))
        .ceil()
        .min(Vec2::new(width as f32, height as f32));
    if min.x >= max.x || min.y >= max.y {
        return;
    }

    for row in min.y as u32..max.y as u32 {
        for column in min.x as u32..max.x as u32 {
            let pixel_center = Vec2::new(column as f32 + 0.5, row as f32 + 0.5);
            if pixel_center.distance_squared(center) <= radius * radius {
                blend(frame.get_pixel_mut(column, row), color);
            }
        }
    }
}

fn blend(pixel: &mut Rgba<u8>, color: Color) {
    let alpha = color.alpha.clamp(0.0, 1.0);
    let channels = [color.red, color.green, color.blue];
    for (channel, source) in pixel.0.iter_mut().zip(channels) {
        let target = f32::from(*channel) / 255.0;
        let mixed = target + (source.clamp(0.0, 1.0) - target) * alpha;
        *channel = (mixed * 255.0).round() as u8;
    }
}

/// Backend that writes every presented frame as a numbered PNG file.
#[derive(Debug)]
pub struct FrameRecorder {
    directory: PathBuf,
    backdrop: Option<RgbaImage>,
    frames: u64,
}

impl FrameRecorder {
    /// Creates a recorder writing into `directory`, creating it if needed.
    pub fn new(directory: impl Into<PathBuf>, backdrop: Option<RgbaImage>) -> AnyResult<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory)
            .with_context(|| format!("failed to create {}", directory.display()))?;
        info!(directory = %directory.display(), "recording frames");
        Ok(Self {
            directory,
            backdrop,
            frames: 0,
        })
    }

    /// Number of frames written so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderingBackend for FrameRecorder {
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        let frame = rasterize(scene, self.backdrop.as_ref());
        let path = self
            .directory
            .join(format!("frame_{:06}.png", self.frames));
        frame
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        debug!(path = %path.display(), "frame written");
        self.frames += 1;
        Ok(())
    }
}
