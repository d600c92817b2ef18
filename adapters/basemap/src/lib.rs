#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Background world map loading.
//!
//! The basemap is a raster whose pure black pixels mark land. It is resized
//! once to the screen dimensions and classified into a [`TerrainGrid`]; the
//! resized pixels double as the backdrop of recorded frames.

use std::path::Path;

use anyhow::{Context, Result};
use image::{imageops::FilterType, DynamicImage, Rgba, RgbaImage};
use quakewave_core::{Surface, TerrainGrid};
use tracing::info;

/// Colour of pixels classified as land.
pub const LAND_SENTINEL: [u8; 3] = [0, 0, 0];

/// Backdrop painted when no map is configured.
pub const OPEN_WATER: Rgba<u8> = Rgba([18, 42, 78, 255]);

/// Resized map pixels together with their land/water classification.
#[derive(Clone, Debug)]
pub struct Basemap {
    pixels: RgbaImage,
    terrain: TerrainGrid,
}

impl Basemap {
    /// Loads and classifies the image stored at `path`.
    pub fn load(path: &Path, width: u32, height: u32) -> Result<Self> {
        let image = image::open(path)
            .with_context(|| format!("failed to open basemap {}", path.display()))?;
        let basemap = Self::from_image(&image, width, height)
            .with_context(|| format!("failed to classify basemap {}", path.display()))?;
        info!(
            path = %path.display(),
            width,
            height,
            "basemap loaded"
        );
        Ok(basemap)
    }

    /// Resizes `image` with nearest-neighbour sampling and classifies it.
    pub fn from_image(image: &DynamicImage, width: u32, height: u32) -> Result<Self> {
        let pixels = image.resize_exact(width, height, FilterType::Nearest).to_rgba8();
        let terrain = TerrainGrid::from_fn(width, height, |column, row| {
            classify(*pixels.get_pixel(column, row))
        })?;
        Ok(Self { pixels, terrain })
    }

    /// Map without any land, used when no basemap is configured.
    pub fn open_water(width: u32, height: u32) -> Result<Self> {
        let terrain = TerrainGrid::uniform(width, height, Surface::Water)?;
        let pixels = RgbaImage::from_pixel(width, height, OPEN_WATER);
        Ok(Self { pixels, terrain })
    }

    /// Resized map pixels.
    #[must_use]
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Land/water classification of the map.
    #[must_use]
    pub fn terrain(&self) -> &TerrainGrid {
        &self.terrain
    }

    /// Splits the basemap into its pixels and classification.
    #[must_use]
    pub fn into_parts(self) -> (RgbaImage, TerrainGrid) {
        (self.pixels, self.terrain)
    }
}

/// Loads only the land/water classification of the image at `path`.
pub fn load_terrain(path: &Path, width: u32, height: u32) -> Result<TerrainGrid> {
    Basemap::load(path, width, height).map(|basemap| basemap.terrain)
}

fn classify(pixel: Rgba<u8>) -> Surface {
    let Rgba([red, green, blue, _]) = pixel;
    if [red, green, blue] == LAND_SENTINEL {
        Surface::Land
    } else {
        Surface::Water
    }
}
