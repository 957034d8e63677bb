//! Vertical smoothing pass.

use crate::colors::{alpha_blend, from_pixel, to_pixel};
use crate::surface::Surface;

use super::framebuffer::FrameBuffer;

/// Blend factor used when smoothing is enabled.
pub const DEFAULT_SMOOTH_FACTOR: f32 = 0.5;

/// Shifts the frame up by `factor` of a pixel, resampling each row as a blend
/// of itself and the row below. The bottom row has no neighbour and is kept.
///
/// `scratch` must match the frame's layout; it holds the unsmoothed copy.
pub(crate) fn smooth(fb: &mut FrameBuffer, scratch: &mut Surface, factor: f32) {
    scratch.copy_from(fb.surface());

    let alpha = ((1.0 - factor.clamp(0.0, 1.0)) * 255.0) as i32;
    let width = scratch.width() as usize;
    let height = scratch.height() as usize;
    let surface = fb.surface_mut();

    for y in 0..height.saturating_sub(1) {
        for x in 0..width {
            let upper = from_pixel(scratch.pixel(x, y));
            let lower = from_pixel(scratch.pixel(x, y + 1));
            surface.set(x, y, to_pixel(alpha_blend(upper, lower, alpha)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{pack_color, unpack_color};

    #[test]
    fn rows_blend_with_the_row_below() {
        let mut surface = Surface::new(3, 3, 4).unwrap();
        let mut scratch = surface.same_format();
        {
            let mut fb = FrameBuffer::new(&mut surface);
            fb.fill_rows(0..1, pack_color(200, 0, 0));
            fb.fill_rows(1..2, pack_color(0, 200, 0));
            fb.fill_rows(2..3, pack_color(0, 0, 200));
            smooth(&mut fb, &mut scratch, DEFAULT_SMOOTH_FACTOR);
        }

        let at = |y| unpack_color(from_pixel(surface.get_pixel(1, y).unwrap()));
        let (r, g, b) = at(0);
        assert!(r > 90 && r < 110 && g > 90 && g < 110 && b == 0);
        let (r, g, b) = at(1);
        assert!(r == 0 && g > 90 && g < 110 && b > 90 && b < 110);
        assert_eq!(at(2), (0, 0, 200));
    }

    #[test]
    fn zero_factor_leaves_frame_unchanged() {
        let mut surface = Surface::new(2, 4, 4).unwrap();
        for y in 0..4 {
            for x in 0..2 {
                surface.put_pixel(x, y, 0xff00_0000 | (y as u32 * 50) << 16 | x as u32);
            }
        }
        let before = surface.clone();
        let mut scratch = surface.same_format();
        {
            let mut fb = FrameBuffer::new(&mut surface);
            smooth(&mut fb, &mut scratch, 0.0);
        }
        assert_eq!(surface, before);
    }
}
