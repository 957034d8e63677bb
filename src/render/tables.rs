//! Precomputed trigonometry and perspective tables.
//!
//! Every per-frame sine, cosine and perspective division is replaced by a
//! lookup into one of these tables, built once when a renderer is created.
//!
//! # Angular unit
//!
//! One unit is the angle covered by a single screen column:
//! `ANGLE_OF_VIEW / CANVAS_WIDTH` = 0.1875°. A full turn is therefore
//! [`FULL_CIRCLE`] = 1920 units and half the field of view is
//! [`HALF_FIELD_OF_VIEW`] = 160 units.

use log::info;

use crate::camera::{MAX_CAMERA_HEIGHT, MIN_CAMERA_HEIGHT};

pub const CANVAS_WIDTH: usize = 320;
pub const CANVAS_HEIGHT: usize = 200;
/// Horizontal field of view in degrees.
pub const ANGLE_OF_VIEW: usize = 60;
pub const FULL_CIRCLE: usize = 360 * CANVAS_WIDTH / ANGLE_OF_VIEW;
pub const HALF_FIELD_OF_VIEW: usize = 30 * CANVAS_WIDTH / ANGLE_OF_VIEW;
/// Degrees per angular unit.
pub const ANGULAR_INCREMENT: f32 = ANGLE_OF_VIEW as f32 / CANVAS_WIDTH as f32;
/// Distance from the eye to the projection plane.
pub const DISTANCE: f32 = 75.0;
/// Vertical exaggeration applied to terrain heights.
pub const SCALE_FACTOR: f32 = 35.0;
/// Last row the ray-length table covers; rows past the canvas bottom are
/// marched so that near terrain can still occlude.
pub const MAXIMUM_ROW: usize = CANVAS_HEIGHT + CANVAS_HEIGHT / 2 + 1;

/// Value stored for the leftmost ray, whose distortion would otherwise come
/// from the very edge of the fan.
pub const LEFT_EDGE_DISTORTION: f32 = 2.0;
/// Stand-in for `1 / cos` when the cosine vanishes.
const NEAR_RIGHT_ANGLE_DISTORTION: f32 = 1.0e6;

const ROWS: usize = MAXIMUM_ROW + 1;
const HEIGHTS: usize = (MAX_CAMERA_HEIGHT - MIN_CAMERA_HEIGHT + 1) as usize;
const HEIGHT_STRIDE: usize = ROWS * CANVAS_WIDTH;

/// The sine, cosine, inverse-distortion and ray-length tables.
pub struct LookupTables {
    sine: Vec<f32>,
    cosine: Vec<f32>,
    inverse_distortion: Vec<f32>,
    /// Indexed by `(height - 200) * HEIGHT_STRIDE + row * CANVAS_WIDTH + ray`.
    ray_length: Vec<f32>,
}

impl Default for LookupTables {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupTables {
    pub fn new() -> Self {
        let (sine, cosine) = build_sine_and_cosine();
        let inverse_distortion = build_inverse_distortion();
        let ray_length = build_ray_length(&inverse_distortion, DISTANCE);

        info!(
            "lookup tables built: {} angles, {} rays, {} ray lengths",
            sine.len(),
            inverse_distortion.len(),
            ray_length.len()
        );

        Self {
            sine,
            cosine,
            inverse_distortion,
            ray_length,
        }
    }

    #[inline]
    pub fn sine(&self, angle: usize) -> f32 {
        self.sine[angle]
    }

    #[inline]
    pub fn cosine(&self, angle: usize) -> f32 {
        self.cosine[angle]
    }

    #[inline]
    pub fn inverse_distortion(&self, ray: usize) -> f32 {
        self.inverse_distortion[ray]
    }

    /// Ground distance travelled by the ray for column `ray` that lands on
    /// screen row `row`, seen from a camera at `height`.
    ///
    /// # Panics
    /// Panics if `height` is outside 200..=300, `row` exceeds
    /// [`MAXIMUM_ROW`] or `ray` is not a canvas column.
    #[inline]
    pub fn ray_length(&self, height: i32, row: usize, ray: usize) -> f32 {
        debug_assert!((MIN_CAMERA_HEIGHT..=MAX_CAMERA_HEIGHT).contains(&height));
        debug_assert!(row <= MAXIMUM_ROW && ray < CANVAS_WIDTH);
        let bucket = (height - MIN_CAMERA_HEIGHT) as usize;
        self.ray_length[bucket * HEIGHT_STRIDE + row * CANVAS_WIDTH + ray]
    }

    /// The ray lengths for one camera height, row-major by `row * 320 + ray`.
    #[inline]
    pub(crate) fn ray_lengths_for(&self, height: i32) -> &[f32] {
        let start = (height - MIN_CAMERA_HEIGHT) as usize * HEIGHT_STRIDE;
        &self.ray_length[start..start + HEIGHT_STRIDE]
    }
}

#[inline]
fn units_to_radians(units: usize) -> f32 {
    (units as f32 * ANGULAR_INCREMENT).to_radians()
}

fn build_sine_and_cosine() -> (Vec<f32>, Vec<f32>) {
    (0..FULL_CIRCLE)
        .map(|angle| {
            let radians = units_to_radians(angle);
            (radians.sin(), radians.cos())
        })
        .unzip()
}

/// `1 / cos` of each ray's offset from the centre column, undoing the fan's
/// fisheye so the ground plane projects flat.
fn build_inverse_distortion() -> Vec<f32> {
    let mut table = vec![0.0; 2 * HALF_FIELD_OF_VIEW];

    for offset in 0..HALF_FIELD_OF_VIEW {
        let cosine = units_to_radians(offset).cos();
        let inverse = if cosine.abs() > f32::EPSILON {
            1.0 / cosine
        } else {
            NEAR_RIGHT_ANGLE_DISTORTION
        };

        table[HALF_FIELD_OF_VIEW + offset] = inverse;
        table[HALF_FIELD_OF_VIEW - offset] = inverse;
    }

    table[0] = LEFT_EDGE_DISTORTION;
    table[HALF_FIELD_OF_VIEW] = 1.0;
    table
}

fn build_ray_length(inverse_distortion: &[f32], distance: f32) -> Vec<f32> {
    let mut table = vec![0.0; HEIGHTS * HEIGHT_STRIDE];

    for (bucket, heights) in table.chunks_exact_mut(HEIGHT_STRIDE).enumerate() {
        let height = (MIN_CAMERA_HEIGHT + bucket as i32) as f32;

        for row in 0..ROWS {
            // Screen rows count down from the bottom edge for the projection
            let inverted_row = (CANVAS_HEIGHT - 1) as f32 - row as f32;
            let ground = distance * height / (height - inverted_row);

            let lengths = &mut heights[row * CANVAS_WIDTH..(row + 1) * CANVAS_WIDTH];
            for (ray, length) in lengths.iter_mut().enumerate() {
                *length = inverse_distortion[ray] * ground;
            }
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shared_tables;
    use approx::assert_relative_eq;

    #[test]
    fn angular_constants() {
        assert_eq!(FULL_CIRCLE, 1920);
        assert_eq!(HALF_FIELD_OF_VIEW, 160);
        assert_eq!(MAXIMUM_ROW, 301);
        assert_relative_eq!(ANGULAR_INCREMENT, 0.1875);
    }

    #[test]
    fn trig_tables_cover_the_circle() {
        let t = shared_tables();
        assert_relative_eq!(t.sine(0), 0.0);
        assert_relative_eq!(t.cosine(0), 1.0);
        assert_relative_eq!(t.sine(480), 1.0, epsilon = 1e-6);
        assert_relative_eq!(t.cosine(960), -1.0, epsilon = 1e-6);
        assert_relative_eq!(t.sine(1440), -1.0, epsilon = 1e-6);
    }

    #[test]
    fn inverse_distortion_sentinels() {
        let t = shared_tables();
        assert_eq!(t.inverse_distortion(HALF_FIELD_OF_VIEW), 1.0);
        assert_eq!(t.inverse_distortion(0), LEFT_EDGE_DISTORTION);
    }

    #[test]
    fn inverse_distortion_is_symmetric_and_grows_outward() {
        let t = shared_tables();
        for offset in 1..HALF_FIELD_OF_VIEW {
            let left = t.inverse_distortion(HALF_FIELD_OF_VIEW - offset);
            let right = t.inverse_distortion(HALF_FIELD_OF_VIEW + offset);
            assert_eq!(left, right);
            assert!(right >= t.inverse_distortion(HALF_FIELD_OF_VIEW + offset - 1));
            assert!(right.is_finite());
        }
        // Edge of the fan is ~30 degrees off-centre
        assert_relative_eq!(
            t.inverse_distortion(319),
            1.0 / (159.0f32 * 0.1875).to_radians().cos(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn ray_length_matches_projection_formula() {
        let t = shared_tables();
        // Camera at 250, centre column, row 149 -> inverted row 50
        assert_relative_eq!(t.ray_length(250, 149, 160), 75.0 * 250.0 / 200.0);
        assert_relative_eq!(
            t.ray_length(200, 0, 10),
            t.inverse_distortion(10) * 75.0 * 200.0,
            max_relative = 1e-6
        );
    }

    #[test]
    fn ray_length_decreases_toward_the_bottom_rows() {
        let t = shared_tables();
        for height in (MIN_CAMERA_HEIGHT..=MAX_CAMERA_HEIGHT).step_by(10) {
            for ray in (1..CANVAS_WIDTH).step_by(37) {
                for row in 1..=MAXIMUM_ROW {
                    let farther = t.ray_length(height, row - 1, ray);
                    let nearer = t.ray_length(height, row, ray);
                    assert!(nearer > 0.0);
                    assert!(
                        nearer < farther,
                        "height {height}, ray {ray}, row {row}: {nearer} >= {farther}"
                    );
                }
            }
        }
    }

    #[test]
    fn per_height_slice_lines_up_with_lookup() {
        let t = shared_tables();
        let slice = t.ray_lengths_for(275);
        assert_eq!(slice.len(), ROWS * CANVAS_WIDTH);
        assert_eq!(slice[42 * CANVAS_WIDTH + 7], t.ray_length(275, 42, 7));
    }
}
