//! Heightfield store and texture-map compositor.
//!
//! The [`Compositor`] ingests a greyscale heightmap image into a primary and an
//! out-of-bounds [`Heightmap`], and can build a texture map by stamping
//! height-keyed tile textures over the terrain.

use log::debug;

use crate::error::{Error, Result};
use crate::heightmap::{Heightmap, TILE_SIZE};
use crate::surface::Surface;

/// Edge length of a height-band texture.
pub const TEXTURE_SIZE: u32 = 256;
/// Height assigned to the darkest visible mask pixel.
const MASK_BASE_HEIGHT: f32 = 192.0;

pub struct Compositor {
    heightmap: Heightmap,
    out_of_bounds_heightmap: Heightmap,
    textures: Vec<Option<Surface>>,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    pub fn new() -> Self {
        Self {
            heightmap: Heightmap::default(),
            out_of_bounds_heightmap: Heightmap::default(),
            textures: vec![None; 256],
        }
    }

    /// Ingests a 1024x1024 greyscale image.
    ///
    /// The low byte of each pixel becomes the height sample. The result is
    /// written to both the primary and the out-of-bounds heightmap.
    pub fn set_heightmap(&mut self, source: &Surface) -> Result<&mut Self> {
        let expected = (TILE_SIZE as u32, TILE_SIZE as u32);
        if source.dimensions() != expected {
            return Err(Error::dimensions(
                "heightmap source",
                expected,
                source.dimensions(),
            ));
        }

        self.heightmap = Heightmap::from_fn(|x, y| (source.pixel(x, y) & 0xff) as u8);
        self.out_of_bounds_heightmap = self.heightmap.clone();

        debug!("heightmap ingested, heightmap[42] = {}", self.heightmap.get(42, 0));
        Ok(self)
    }

    pub fn heightmap(&self) -> &Heightmap {
        &self.heightmap
    }

    pub fn out_of_bounds_heightmap(&self) -> &Heightmap {
        &self.out_of_bounds_heightmap
    }

    pub fn heightmap_mut(&mut self) -> &mut Heightmap {
        &mut self.heightmap
    }

    pub fn out_of_bounds_heightmap_mut(&mut self) -> &mut Heightmap {
        &mut self.out_of_bounds_heightmap
    }

    /// Registers the tile texture applied to terrain at `height`.
    ///
    /// Replaces any texture already registered for that height.
    pub fn add_texture(&mut self, height: u8, texture: Surface) -> Result<&mut Self> {
        let expected = (TEXTURE_SIZE, TEXTURE_SIZE);
        if texture.dimensions() != expected {
            return Err(Error::dimensions("texture", expected, texture.dimensions()));
        }
        self.textures[height as usize] = Some(texture);
        Ok(self)
    }

    /// Stamps a 2.5D mask into the primary heightmap at (x, y).
    ///
    /// Every visible mask pixel raises its cell to `192 + value * scale_factor`,
    /// saturating at 255. Cells falling outside the grid are skipped.
    ///
    /// A 4-byte mask is ARGB: pixels with zero alpha are skipped and the red
    /// channel is the value. A 3-byte mask is opaque RGB read by its red
    /// channel; 1- and 2-byte masks are opaque greyscale read by the low byte.
    pub fn put_mask(&mut self, mask: &Surface, x: i32, y: i32, scale_factor: f32) -> &mut Self {
        for my in 0..mask.height() as usize {
            for mx in 0..mask.width() as usize {
                let Some(value) = mask_value(mask.bytes_per_pixel(), mask.pixel(mx, my)) else {
                    continue;
                };

                let tx = x + mx as i32;
                let ty = y + my as i32;
                if tx < 0 || ty < 0 || tx >= TILE_SIZE as i32 || ty >= TILE_SIZE as i32 {
                    continue;
                }

                let height =
                    (MASK_BASE_HEIGHT + value as f32 * scale_factor).clamp(0.0, 255.0) as u8;
                self.heightmap.set(tx as usize, ty as usize, height);
            }
        }
        self
    }

    /// Paints `texturemap` from the registered height-band textures.
    ///
    /// Heights without their own texture use the nearest texture registered
    /// above them, so a texture at height 255 is required.
    pub fn composite(&self, texturemap: &mut Surface) -> Result<()> {
        let expected = (TILE_SIZE as u32, TILE_SIZE as u32);
        if texturemap.dimensions() != expected {
            return Err(Error::dimensions(
                "texturemap",
                expected,
                texturemap.dimensions(),
            ));
        }

        let mut bands: Vec<&Surface> = Vec::with_capacity(256);
        let mut current = self.textures[255].as_ref().ok_or(Error::MissingBaseTexture)?;
        for slot in self.textures.iter().rev() {
            if let Some(texture) = slot {
                current = texture;
            }
            bands.push(current);
        }
        bands.reverse();

        let mask = TEXTURE_SIZE as usize - 1;
        for y in 0..TILE_SIZE {
            for x in 0..TILE_SIZE {
                let texture = bands[self.heightmap.get(x, y) as usize];
                let texel = texture.pixel(x & mask, y & mask);
                texturemap.set(x, y, 0xff00_0000 | (texel & 0x00ff_ffff));
            }
        }

        debug!(
            "composited texturemap from {} height bands",
            self.textures.iter().filter(|t| t.is_some()).count()
        );
        Ok(())
    }
}

/// Height value carried by a mask pixel, or `None` when it is transparent.
#[inline]
fn mask_value(bytes_per_pixel: u8, pixel: u32) -> Option<u8> {
    match bytes_per_pixel {
        4 if pixel >> 24 == 0 => None,
        3 | 4 => Some((pixel >> 16) as u8),
        _ => Some(pixel as u8),
    }
}
