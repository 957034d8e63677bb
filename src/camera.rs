//! Yaw-and-height camera.
//!
//! The public [`Camera`] speaks ordinary degrees. Internally the renderer keeps
//! the facing angle in screen-column units: one unit is the angle spanned by a
//! single column (60° / 320), so a full turn is 1920 units and a column index
//! doubles as an angular offset without conversion.

use crate::heightmap::{TILE_ORIGIN, TILE_SIZE};
use crate::render::tables::{ANGLE_OF_VIEW, CANVAS_WIDTH, FULL_CIRCLE};

/// Lowest camera height the ray-length table covers.
pub const MIN_CAMERA_HEIGHT: i32 = 200;
/// Highest camera height the ray-length table covers.
pub const MAX_CAMERA_HEIGHT: i32 = 300;
/// Height the camera starts at.
pub const DEFAULT_CAMERA_HEIGHT: i32 = 225;

/// Camera position and heading as exchanged with callers.
///
/// `angle` is in degrees; `x` and `z` are world coordinates where the primary
/// tile spans 1024..=2047, and `y` is the eye height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Camera {
    pub angle: i32,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Default for Camera {
    fn default() -> Self {
        let centre = TILE_ORIGIN + TILE_SIZE as i32 / 2;
        Self {
            angle: 0,
            x: centre,
            y: DEFAULT_CAMERA_HEIGHT,
            z: centre,
        }
    }
}

/// Camera as the renderer stores it, with the angle in column units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ViewPoint {
    pub angle: usize,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ViewPoint {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            angle: degrees_to_units(camera.angle),
            x: camera.x,
            y: camera.y,
            z: camera.z,
        }
    }

    pub fn to_camera(self) -> Camera {
        Camera {
            angle: units_to_degrees(self.angle),
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }
}

/// Converts degrees to column units.
///
/// Negative angles fold through their absolute value, so -10° maps to the same
/// heading as 10°.
pub fn degrees_to_units(degrees: i32) -> usize {
    let folded = degrees.unsigned_abs() % 360;
    let units = (folded as f32 / ANGLE_OF_VIEW as f32 * CANVAS_WIDTH as f32) as usize;
    units % FULL_CIRCLE
}

/// Converts column units back to whole degrees in 0..360.
pub fn units_to_degrees(units: usize) -> i32 {
    let degrees = (units as f32 / FULL_CIRCLE as f32 * 360.0).round() as i32;
    degrees % 360
}
