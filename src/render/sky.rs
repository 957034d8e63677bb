//! Panoramic sky band.
//!
//! The sky is a 1920x100 panorama, one pixel per angular unit, so the slice
//! drawn for a heading starts at the angle of the leftmost screen column. The
//! band's height shrinks as the camera rises, since the horizon moves up the
//! screen with it.

use crate::camera::{ViewPoint, MIN_CAMERA_HEIGHT};
use crate::colors::{alpha_blend, from_pixel, SKY_FALLBACK};
use crate::surface::Surface;

use super::framebuffer::FrameBuffer;
use super::tables::{CANVAS_HEIGHT, CANVAS_WIDTH, FULL_CIRCLE, HALF_FIELD_OF_VIEW};

pub const SKY_WIDTH: u32 = FULL_CIRCLE as u32;
pub const SKY_HEIGHT: u32 = 100;

/// Geometry of the sky slice drawn for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkyBand {
    /// Panorama column shown at screen column 0.
    pub offset: usize,
    /// Screen rows covered, starting at row 0.
    pub height: usize,
    /// Panorama row shown at screen row 0.
    pub source_row: usize,
}

impl SkyBand {
    pub(crate) fn for_view(view: &ViewPoint) -> Self {
        let horizon = (CANVAS_HEIGHT as i32 >> 1) - (view.y - CANVAS_HEIGHT as i32);
        Self {
            offset: leftmost_angle(view.angle),
            height: horizon.clamp(0, SKY_HEIGHT as i32) as usize,
            source_row: (view.y - MIN_CAMERA_HEIGHT).max(0) as usize,
        }
    }
}

/// Angle of screen column 0 for a camera facing `angle`.
#[inline]
pub(crate) fn leftmost_angle(angle: usize) -> usize {
    (angle + FULL_CIRCLE - HALF_FIELD_OF_VIEW) % FULL_CIRCLE
}

/// Sky colour reflected at screen column `x`, panorama row `y` (clamped).
#[inline]
pub(crate) fn reflected_sky(sky: Option<&Surface>, view_angle: usize, x: usize, y: i32) -> u32 {
    match sky {
        Some(sky) => {
            let y = y.clamp(0, SKY_HEIGHT as i32 - 1) as usize;
            let u = (leftmost_angle(view_angle) + x) % SKY_WIDTH as usize;
            from_pixel(sky.pixel(u, y))
        }
        None => SKY_FALLBACK,
    }
}

/// Draws the sky band, fogged toward the horizon when `fog` carries a colour.
pub(crate) fn render_sky(
    sky: Option<&Surface>,
    band: SkyBand,
    fog: Option<u32>,
    fb: &mut FrameBuffer,
) {
    match sky {
        Some(sky) => {
            // The slice may run off the panorama's right edge: draw the
            // tail first, then the wrapped head
            let tail = (SKY_WIDTH as usize - band.offset).min(CANVAS_WIDTH);
            for y in 0..band.height {
                let sy = band.source_row + y;
                for x in 0..tail {
                    let color = from_pixel(sky.pixel(band.offset + x, sy));
                    fb.set_pixel(x as i32, y as i32, color);
                }
                for x in tail..CANVAS_WIDTH {
                    let color = from_pixel(sky.pixel(x - tail, sy));
                    fb.set_pixel(x as i32, y as i32, color);
                }
            }
        }
        None => fb.fill_rows(0..band.height, SKY_FALLBACK),
    }

    if let Some(fog) = fog {
        for y in 0..band.height {
            let alpha = fog_alpha(band.height, y);
            for x in 0..CANVAS_WIDTH as i32 {
                if let Some(pixel) = fb.get_pixel(x, y as i32) {
                    fb.set_pixel(x, y as i32, alpha_blend(pixel, fog, alpha));
                }
            }
        }
    }
}

/// Weight of the sky colour on row `y` of a band `height` rows tall; the
/// remainder goes to the fog colour.
#[inline]
fn fog_alpha(height: usize, y: usize) -> i32 {
    let depth = SKY_HEIGHT as i32 - height as i32 + y as i32;
    255 - (255.0f32 / 100.0 * depth as f32) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{pack_color, unpack_color};

    fn view(angle: usize, y: i32) -> ViewPoint {
        ViewPoint {
            angle,
            x: 1536,
            y,
            z: 1536,
        }
    }

    /// Panorama whose red channel encodes the column and blue the row.
    fn coded_sky() -> Surface {
        let mut sky = Surface::new(SKY_WIDTH, SKY_HEIGHT, 4).unwrap();
        for y in 0..SKY_HEIGHT as i32 {
            for x in 0..SKY_WIDTH as i32 {
                sky.put_pixel(x, y, 0xff00_0000 | (((x % 256) as u32) << 16) | y as u32);
            }
        }
        sky
    }

    #[test]
    fn band_geometry_follows_camera() {
        let band = SkyBand::for_view(&view(0, 225));
        assert_eq!(band.offset, FULL_CIRCLE - 160);
        assert_eq!(band.height, 75);
        assert_eq!(band.source_row, 25);

        let band = SkyBand::for_view(&view(500, 200));
        assert_eq!(band.offset, 340);
        assert_eq!(band.height, 100);
        assert_eq!(band.source_row, 0);

        assert_eq!(SkyBand::for_view(&view(0, 300)).height, 0);
    }

    #[test]
    fn sky_wraps_across_the_panorama_seam() {
        let sky = coded_sky();
        let mut surface = Surface::new(320, 200, 4).unwrap();
        let band = SkyBand::for_view(&view(0, 250));
        {
            let mut fb = FrameBuffer::new(&mut surface);
            render_sky(Some(&sky), band, None, &mut fb);
        }

        // Column 0 shows panorama column 1760; column 160 wraps to 0
        let (r, _, b) = unpack_color(from_pixel(surface.get_pixel(0, 0).unwrap()));
        assert_eq!((r as usize, b as usize), (1760 % 256, 50));
        let (r, _, _) = unpack_color(from_pixel(surface.get_pixel(160, 3).unwrap()));
        assert_eq!(r, 0);
        let (r, _, b) = unpack_color(from_pixel(surface.get_pixel(319, 49).unwrap()));
        assert_eq!((r, b), (159, 99));
        // Below the band is untouched
        assert_eq!(surface.get_pixel(10, 50), Some(0));
    }

    #[test]
    fn unbound_sky_draws_fallback_colour() {
        let mut surface = Surface::new(320, 200, 4).unwrap();
        {
            let mut fb = FrameBuffer::new(&mut surface);
            render_sky(None, SkyBand::for_view(&view(0, 280)), None, &mut fb);
        }
        assert_eq!(from_pixel(surface.get_pixel(100, 19).unwrap()), SKY_FALLBACK);
        assert_eq!(surface.get_pixel(100, 20), Some(0));
    }

    #[test]
    fn fog_ramps_toward_the_horizon() {
        let sky_color = pack_color(0, 0, 255);
        let fog = pack_color(255, 255, 0);
        let sky = Surface::filled(SKY_WIDTH, SKY_HEIGHT, 0xff00_00ff);
        let mut surface = Surface::new(320, 200, 4).unwrap();
        let band = SkyBand::for_view(&view(0, 225));
        {
            let mut fb = FrameBuffer::new(&mut surface);
            render_sky(Some(&sky), band, Some(fog), &mut fb);
        }

        let red_at = |y: i32| unpack_color(from_pixel(surface.get_pixel(40, y).unwrap())).0;
        for y in 1..band.height as i32 {
            assert!(red_at(y) >= red_at(y - 1));
        }

        let near_horizon = from_pixel(surface.get_pixel(40, band.height as i32 - 1).unwrap());
        assert_ne!(near_horizon, sky_color);
        assert_ne!(near_horizon, fog);
        let (r, g, b) = unpack_color(near_horizon);
        assert!(r > 0 && r < 255 && g > 0 && g < 255 && b < 255);
    }

    #[test]
    fn reflection_lookup_clamps_rows() {
        let sky = coded_sky();
        let top = reflected_sky(Some(&sky), 160, 5, -40);
        let bottom = reflected_sky(Some(&sky), 160, 5, 500);
        assert_eq!(unpack_color(top), (5, 0, 0));
        assert_eq!(unpack_color(bottom), (5, 0, 99));
        assert_eq!(reflected_sky(None, 0, 0, 0), SKY_FALLBACK);
    }
}
