//! Generic packed-pixel surfaces.
//!
//! A [`Surface`] is a row-major byte buffer with a configurable pixel size of
//! 1, 2, 3 or 4 bytes. Multi-byte pixels are stored little-endian, so a 4-byte
//! surface holds ARGB8888 pixels in the byte order SDL streaming textures
//! expect on little-endian hosts.

use std::path::Path;

use crate::error::{Error, Result};

/// An owned pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    pitch: usize,
    bytes_per_pixel: u8,
}

impl Surface {
    /// Creates a zero-filled surface.
    pub fn new(width: u32, height: u32, bytes_per_pixel: u8) -> Result<Self> {
        if !(1..=4).contains(&bytes_per_pixel) {
            return Err(Error::InvalidBytesPerPixel(bytes_per_pixel));
        }
        let pitch = width as usize * bytes_per_pixel as usize;
        Ok(Self {
            pixels: vec![0; pitch * height as usize],
            width,
            height,
            pitch,
            bytes_per_pixel,
        })
    }

    /// Creates a 4-byte surface filled with a single ARGB pixel value.
    pub fn filled(width: u32, height: u32, pixel: u32) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..width as usize * height as usize {
            pixels.extend_from_slice(&pixel.to_le_bytes());
        }
        Self {
            pixels,
            width,
            height,
            pitch: width as usize * 4,
            bytes_per_pixel: 4,
        }
    }

    /// Loads an image file (PNG, JPG, ...) into a 4-byte ARGB surface.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let img = image::open(path)?.to_rgba8();
        Ok(Self::from_rgba_image(&img))
    }

    /// Converts a decoded RGBA image into a 4-byte ARGB surface.
    pub fn from_rgba_image(img: &image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let mut surface = Self::filled(width, height, 0);
        for (x, y, p) in img.enumerate_pixels() {
            let [r, g, b, a] = p.0;
            let argb = ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32);
            surface.put_pixel(x as i32, y as i32, argb);
        }
        surface
    }

    /// Copies the surface into an RGBA image, treating pixels as ARGB.
    ///
    /// Alpha is forced opaque since rendered frames carry no coverage.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            let p = self.pixel(x as usize, y as usize);
            image::Rgba([(p >> 16) as u8, (p >> 8) as u8, p as u8, 0xff])
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn bytes_per_pixel(&self) -> u8 {
        self.bytes_per_pixel
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Get the pixel at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        if self.in_bounds(x, y) {
            Some(self.pixel(x as usize, y as usize))
        } else {
            None
        }
    }

    /// Set the pixel at (x, y). Silently ignores out-of-bounds coordinates.
    ///
    /// Bytes beyond the surface's pixel size are discarded.
    #[inline]
    pub fn put_pixel(&mut self, x: i32, y: i32, color: u32) {
        if self.in_bounds(x, y) {
            self.set(x as usize, y as usize, color);
        }
    }

    /// Reads a pixel the caller has already bounds-checked.
    #[inline]
    pub(crate) fn pixel(&self, x: usize, y: usize) -> u32 {
        debug_assert!(x < self.width as usize && y < self.height as usize);
        let bpp = self.bytes_per_pixel as usize;
        let offset = y * self.pitch + x * bpp;
        let data = &self.pixels[offset..offset + bpp];

        match *data {
            [a] => a as u32,
            [a, b] => u16::from_le_bytes([a, b]) as u32,
            [a, b, c] => u32::from_le_bytes([a, b, c, 0]),
            [a, b, c, d] => u32::from_le_bytes([a, b, c, d]),
            _ => unreachable!("bytes-per-pixel validated at construction"),
        }
    }

    #[inline]
    pub(crate) fn set(&mut self, x: usize, y: usize, color: u32) {
        debug_assert!(x < self.width as usize && y < self.height as usize);
        let bpp = self.bytes_per_pixel as usize;
        let offset = y * self.pitch + x * bpp;
        self.pixels[offset..offset + bpp].copy_from_slice(&color.to_le_bytes()[..bpp]);
    }

    /// Copies every pixel from `other`, which must share this surface's layout.
    pub(crate) fn copy_from(&mut self, other: &Surface) {
        debug_assert_eq!(self.pixels.len(), other.pixels.len());
        self.pixels.copy_from_slice(&other.pixels);
    }

    /// Returns an empty surface with the same dimensions and pixel size.
    pub(crate) fn same_format(&self) -> Surface {
        Surface {
            pixels: vec![0; self.pixels.len()],
            width: self.width,
            height: self.height,
            pitch: self.pitch,
            bytes_per_pixel: self.bytes_per_pixel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unsupported_pixel_sizes() {
        assert!(matches!(
            Surface::new(4, 4, 0),
            Err(Error::InvalidBytesPerPixel(0))
        ));
        assert!(matches!(
            Surface::new(4, 4, 5),
            Err(Error::InvalidBytesPerPixel(5))
        ));
    }

    #[test]
    fn get_put_per_pixel_size() {
        let cases = [(1u8, 0xab), (2, 0xabcd), (3, 0xabcdef), (4, 0x12abcdef)];
        for (bpp, color) in cases {
            let mut surface = Surface::new(8, 4, bpp).unwrap();
            surface.put_pixel(5, 2, color);
            assert_eq!(surface.get_pixel(5, 2), Some(color), "bpp {bpp}");
            assert_eq!(surface.get_pixel(4, 2), Some(0));
            assert_eq!(surface.pitch(), 8 * bpp as usize);
        }
    }

    #[test]
    fn narrow_surfaces_truncate_wide_colors() {
        let mut surface = Surface::new(2, 2, 2).unwrap();
        surface.put_pixel(0, 0, 0xff12_3456);
        assert_eq!(surface.get_pixel(0, 0), Some(0x3456));

        let mut surface = Surface::new(2, 2, 3).unwrap();
        surface.put_pixel(1, 1, 0xff12_3456);
        assert_eq!(surface.get_pixel(1, 1), Some(0x12_3456));
    }

    #[test]
    fn three_byte_pixels_are_little_endian() {
        let mut surface = Surface::new(1, 1, 3).unwrap();
        surface.put_pixel(0, 0, 0x00_1122_33);
        assert_eq!(surface.as_bytes(), &[0x33, 0x22, 0x11]);
    }

    #[test]
    fn out_of_bounds_access_is_ignored() {
        let mut surface = Surface::new(3, 3, 4).unwrap();
        surface.put_pixel(-1, 0, 0xffffffff);
        surface.put_pixel(3, 0, 0xffffffff);
        surface.put_pixel(0, 3, 0xffffffff);
        assert!(surface.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(surface.get_pixel(-1, 0), None);
        assert_eq!(surface.get_pixel(0, 3), None);
    }

    #[test]
    fn rgba_image_round_trip_keeps_colour() {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]));
        let surface = Surface::from_rgba_image(&img);
        assert_eq!(surface.get_pixel(1, 1), Some(0xff0a141e));
        assert_eq!(surface.to_rgba_image().get_pixel(0, 1).0, [10, 20, 30, 255]);
    }
}
