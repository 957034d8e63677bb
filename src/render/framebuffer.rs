//! Frame buffer view used by the render passes.
//!
//! Wraps the caller's [`Surface`] and speaks RGBA colours, converting to and
//! from the surface's packed pixels. All writes are clipped to the surface.

use std::ops::Range;

use crate::colors::{from_pixel, to_pixel};
use crate::surface::Surface;

/// A borrowed view of the surface being rendered into.
///
/// This is a borrowed view, not an owning type; the renderer creates one per
/// frame for the passes to share.
pub struct FrameBuffer<'a> {
    surface: &'a mut Surface,
}

impl<'a> FrameBuffer<'a> {
    pub fn new(surface: &'a mut Surface) -> Self {
        Self { surface }
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    /// Set a pixel without blending. Silently ignores out-of-bounds coordinates.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        self.surface.put_pixel(x, y, to_pixel(color));
    }

    /// Get the RGBA colour at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.surface.get_pixel(x, y).map(from_pixel)
    }

    /// Fills columns `columns` over rows `top..=bottom`, clipped to the surface.
    #[inline]
    pub fn fill_span(&mut self, columns: Range<usize>, top: i32, bottom: i32, color: u32) {
        let top = top.max(0);
        let bottom = bottom.min(self.surface.height() as i32 - 1);
        if top > bottom {
            return;
        }

        let x_end = columns.end.min(self.surface.width() as usize);
        let pixel = to_pixel(color);
        for y in top as usize..=bottom as usize {
            for x in columns.start..x_end {
                self.surface.set(x, y, pixel);
            }
        }
    }

    /// Fills whole rows, clipped to the surface.
    pub fn fill_rows(&mut self, rows: Range<usize>, color: u32) {
        let width = self.surface.width() as usize;
        if rows.start >= rows.end {
            return;
        }
        self.fill_span(0..width, rows.start as i32, rows.end as i32 - 1, color);
    }

    pub(crate) fn surface(&self) -> &Surface {
        &*self.surface
    }

    pub(crate) fn surface_mut(&mut self) -> &mut Surface {
        &mut *self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::pack_color;

    #[test]
    fn spans_are_clipped_to_the_surface() {
        let mut surface = Surface::new(4, 4, 4).unwrap();
        let red = pack_color(255, 0, 0);
        {
            let mut fb = FrameBuffer::new(&mut surface);
            fb.fill_span(2..6, -3, 1, red);
            fb.fill_span(0..1, 3, 10, red);
            fb.fill_span(0..4, 5, 9, red);
        }

        assert_eq!(surface.get_pixel(2, 0), Some(0xffff0000));
        assert_eq!(surface.get_pixel(3, 1), Some(0xffff0000));
        assert_eq!(surface.get_pixel(1, 1), Some(0));
        assert_eq!(surface.get_pixel(0, 3), Some(0xffff0000));
        assert_eq!(surface.get_pixel(0, 2), Some(0));
    }

    #[test]
    fn inverted_span_draws_nothing() {
        let mut surface = Surface::new(2, 2, 4).unwrap();
        let mut fb = FrameBuffer::new(&mut surface);
        fb.fill_span(0..2, 1, 0, pack_color(1, 2, 3));
        assert!(fb.surface().as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn colours_round_trip_through_the_view() {
        let mut surface = Surface::new(2, 2, 4).unwrap();
        let mut fb = FrameBuffer::new(&mut surface);
        let color = pack_color(0x11, 0x22, 0x33);
        fb.set_pixel(1, 0, color);
        fb.fill_rows(1..2, color);
        assert_eq!(fb.get_pixel(1, 0), Some(color));
        assert_eq!(fb.get_pixel(0, 1), Some(color));
        assert_eq!(fb.get_pixel(0, 0), Some(pack_color(0, 0, 0)));
    }
}
