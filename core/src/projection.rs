//! Affine mapping between geographic coordinates and screen pixels.
//!
//! The longitude window is shifted east by ten degrees because the background
//! map is centred on the Pacific. Both axes extrapolate linearly outside their
//! declared domain; nothing is clamped here.

use crate::ScreenPoint;

/// Longitude mapped onto the left screen edge.
pub const LONGITUDE_WEST: f32 = -170.0;
/// Longitude mapped onto the right screen edge.
pub const LONGITUDE_EAST: f32 = 190.0;
/// Latitude mapped onto the bottom screen edge.
pub const LATITUDE_SOUTH: f32 = -55.0;
/// Latitude mapped onto the top screen edge.
pub const LATITUDE_NORTH: f32 = 83.0;

/// Projection onto a screen of fixed pixel dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    width: f32,
    height: f32,
}

impl Projection {
    /// Creates a projection for a screen of the provided size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }

    /// Screen width in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Screen height in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Projects a longitude/latitude pair onto the screen.
    #[must_use]
    pub fn project(&self, longitude: f32, latitude: f32) -> ScreenPoint {
        ScreenPoint::new(
            remap(longitude, LONGITUDE_WEST, LONGITUDE_EAST, 0.0, self.width),
            remap(latitude, LATITUDE_SOUTH, LATITUDE_NORTH, self.height, 0.0),
        )
    }

    /// Recovers the longitude/latitude pair projected onto `point`.
    #[must_use]
    pub fn unproject(&self, point: ScreenPoint) -> (f32, f32) {
        (
            remap(point.x(), 0.0, self.width, LONGITUDE_WEST, LONGITUDE_EAST),
            remap(point.y(), self.height, 0.0, LATITUDE_SOUTH, LATITUDE_NORTH),
        )
    }
}

fn remap(value: f32, from_low: f32, from_high: f32, to_low: f32, to_high: f32) -> f32 {
    let span = from_high - from_low;
    if span == 0.0 {
        return to_low;
    }
    to_low + (value - from_low) * (to_high - to_low) / span
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn window_corners_map_to_screen_corners() {
        let projection = Projection::new(1_440, 690);
        let top_left = projection.project(LONGITUDE_WEST, LATITUDE_NORTH);
        assert_close(top_left.x(), 0.0);
        assert_close(top_left.y(), 0.0);

        let bottom_right = projection.project(LONGITUDE_EAST, LATITUDE_SOUTH);
        assert_close(bottom_right.x(), 1_440.0);
        assert_close(bottom_right.y(), 690.0);
    }

    #[test]
    fn western_dateline_extrapolates_off_screen() {
        let projection = Projection::new(360, 138);
        let point = projection.project(-180.0, 0.0);
        assert_close(point.x(), -10.0);
        assert_close(point.y(), 83.0);
    }

    #[test]
    fn unproject_inverts_project() {
        let projection = Projection::new(1_200, 600);
        let point = projection.project(139.7, 35.6);
        let (longitude, latitude) = projection.unproject(point);
        assert_close(longitude, 139.7);
        assert_close(latitude, 35.6);
    }
}
