//! The [`Renderer`] facade.
//!
//! Owns the lookup tables and the capability flags, borrows the caller's
//! framebuffer and assets, and runs the frame passes on [`Renderer::render`].
//! Every binding and setting is validated when it is made; the frame passes
//! trust what they are given.

use std::sync::Arc;

use log::debug;

use crate::camera::{Camera, ViewPoint, MAX_CAMERA_HEIGHT, MIN_CAMERA_HEIGHT};
use crate::colors::{parse_hex_color, unpack_color, DEFAULT_FOG, GREY};
use crate::config::RendererConfig;
use crate::error::{Error, Result};
use crate::heightmap::{Heightmap, TILE_MASK, TILE_ORIGIN, TILE_SIZE};
use crate::surface::Surface;

use super::framebuffer::FrameBuffer;
use super::options::{Capability, Quality};
use super::scan::{render_front_to_back, TerrainScene};
use super::sky::{render_sky, SkyBand, SKY_HEIGHT, SKY_WIDTH};
use super::smooth::{smooth, DEFAULT_SMOOTH_FACTOR};
use super::tables::{LookupTables, CANVAS_HEIGHT, CANVAS_WIDTH};

/// Water height set when reflections are first enabled.
pub const DEFAULT_WATER_HEIGHT: u8 = 64;

/// Rows painted grey before the sky, between a short sky band and the terrain.
const HORIZON_BAND: std::ops::Range<usize> = 100..125;

const TEXTURE_DIMENSIONS: (u32, u32) = (TILE_SIZE as u32, TILE_SIZE as u32);
const FRAMEBUFFER_DIMENSIONS: (u32, u32) = (CANVAS_WIDTH as u32, CANVAS_HEIGHT as u32);

/// Voxel-space terrain renderer drawing into a 320x200 framebuffer.
///
/// Assets are borrowed for the renderer's lifetime `'a`, so they cannot be
/// dropped or mutated while bound.
pub struct Renderer<'a> {
    tables: Arc<LookupTables>,
    framebuffer: &'a mut Surface,
    scratch: Surface,
    view: ViewPoint,

    heightmap: Option<&'a Heightmap>,
    out_of_bounds_heightmap: Option<&'a Heightmap>,
    texturemap: Option<&'a Surface>,
    out_of_bounds_texturemap: Option<&'a Surface>,
    sky: Option<&'a Surface>,

    fog: bool,
    fog_color: u32,
    quality: Quality,
    smooth: Option<f32>,
    water_height: Option<u8>,
    trace: bool,
}

impl<'a> Renderer<'a> {
    /// Creates a renderer with freshly built lookup tables.
    ///
    /// Fails unless `framebuffer` is a 320x200 surface with 4-byte pixels.
    pub fn new(framebuffer: &'a mut Surface) -> Result<Self> {
        Self::with_tables(framebuffer, Arc::new(LookupTables::new()))
    }

    /// Creates a renderer sharing already built lookup tables.
    pub fn with_tables(framebuffer: &'a mut Surface, tables: Arc<LookupTables>) -> Result<Self> {
        if framebuffer.dimensions() != FRAMEBUFFER_DIMENSIONS {
            return Err(Error::dimensions(
                "framebuffer",
                FRAMEBUFFER_DIMENSIONS,
                framebuffer.dimensions(),
            ));
        }
        if framebuffer.bytes_per_pixel() != 4 {
            return Err(Error::InvalidBytesPerPixel(framebuffer.bytes_per_pixel()));
        }

        let scratch = framebuffer.same_format();
        Ok(Self {
            tables,
            framebuffer,
            scratch,
            view: ViewPoint::from_camera(&Camera::default()),
            heightmap: None,
            out_of_bounds_heightmap: None,
            texturemap: None,
            out_of_bounds_texturemap: None,
            sky: None,
            fog: false,
            fog_color: DEFAULT_FOG,
            quality: Quality::default(),
            smooth: None,
            water_height: None,
            trace: false,
        })
    }

    /// Creates a renderer and applies `config`, failing on the first setting
    /// the matching setter would reject.
    pub fn with_config(framebuffer: &'a mut Surface, config: &RendererConfig) -> Result<Self> {
        let mut renderer = Self::new(framebuffer)?;
        renderer.apply(config)?;
        Ok(renderer)
    }

    fn apply(&mut self, config: &RendererConfig) -> Result<()> {
        self.trace = config.trace;
        self.set_quality(config.quality);
        self.set_camera(&config.camera)?;

        if let Some(color) = &config.fog_color {
            self.enable(Capability::Fog);
            self.set_fog_color(color)?;
        }
        if let Some(water) = config.water_height {
            self.enable(Capability::ReflectionMap);
            self.set_water_height(water as i32)?;
        }
        if config.smooth {
            self.enable(Capability::Smooth);
        }
        Ok(())
    }

    pub fn enable(&mut self, capability: Capability) {
        match capability {
            Capability::Fog => self.fog = true,
            Capability::ReflectionMap => self.water_height = Some(DEFAULT_WATER_HEIGHT),
            Capability::Smooth => {
                self.smooth.get_or_insert(DEFAULT_SMOOTH_FACTOR);
            }
        }
        if self.trace {
            debug!("enabled {capability}");
        }
    }

    pub fn disable(&mut self, capability: Capability) {
        match capability {
            Capability::Fog => self.fog = false,
            Capability::ReflectionMap => self.water_height = None,
            Capability::Smooth => self.smooth = None,
        }
        if self.trace {
            debug!("disabled {capability}");
        }
    }

    pub fn is_enabled(&self, capability: Capability) -> bool {
        match capability {
            Capability::Fog => self.fog,
            Capability::ReflectionMap => self.water_height.is_some(),
            Capability::Smooth => self.smooth.is_some(),
        }
    }

    /// Current camera, with the heading in degrees.
    pub fn camera(&self) -> Camera {
        self.view.to_camera()
    }

    /// Moves the camera. The heading is folded into 0..360 degrees; the height
    /// must lie in 200..=300.
    pub fn set_camera(&mut self, camera: &Camera) -> Result<()> {
        if !(MIN_CAMERA_HEIGHT..=MAX_CAMERA_HEIGHT).contains(&camera.y) {
            return Err(Error::CameraHeight(camera.y));
        }
        self.view = ViewPoint::from_camera(camera);
        if self.trace {
            debug!(
                "camera: angle {} units, position ({}, {}, {})",
                self.view.angle, self.view.x, self.view.y, self.view.z
            );
        }
        Ok(())
    }

    /// Height of the primary heightmap at world coordinates inside the
    /// primary tile.
    pub fn get_height(&self, x: i32, z: i32) -> Result<u8> {
        let max = TILE_ORIGIN + TILE_SIZE as i32 - 1;
        if !(TILE_ORIGIN..=max).contains(&x) {
            return Err(Error::out_of_range("x coordinate", x, TILE_ORIGIN, max));
        }
        if !(TILE_ORIGIN..=max).contains(&z) {
            return Err(Error::out_of_range("z coordinate", z, TILE_ORIGIN, max));
        }
        let heightmap = self.heightmap.ok_or(Error::NotBound("heightmap"))?;
        Ok(heightmap.get((x & TILE_MASK) as usize, (z & TILE_MASK) as usize))
    }

    /// Sets the fog colour from a `#rrggbb` string. Fog must be enabled.
    pub fn set_fog_color(&mut self, color: &str) -> Result<()> {
        if !self.fog {
            return Err(Error::CapabilityNotEnabled(Capability::Fog));
        }
        self.fog_color =
            parse_hex_color(color).ok_or_else(|| Error::InvalidFogColor(color.to_string()))?;
        if self.trace {
            let (r, g, b) = unpack_color(self.fog_color);
            debug!("fog color: ({r}, {g}, {b})");
        }
        Ok(())
    }

    /// Fog colour as packed RGBA (`0xRRGGBBAA`).
    pub fn fog_color(&self) -> u32 {
        self.fog_color
    }

    pub fn set_heightmap(&mut self, heightmap: &'a Heightmap) {
        self.heightmap = Some(heightmap);
    }

    /// Heightmap sampled beyond the primary tile. Falls back to the primary
    /// heightmap while unbound.
    pub fn set_out_of_bounds_heightmap(&mut self, heightmap: &'a Heightmap) {
        self.out_of_bounds_heightmap = Some(heightmap);
    }

    /// Binds the 1024x1024 texture map draped over the primary tile.
    pub fn set_texturemap(&mut self, texturemap: &'a Surface) -> Result<()> {
        check_dimensions("texture map", texturemap, TEXTURE_DIMENSIONS)?;
        self.texturemap = Some(texturemap);
        Ok(())
    }

    pub fn texturemap(&self) -> Option<&'a Surface> {
        self.texturemap
    }

    pub fn set_out_of_bounds_texturemap(&mut self, texturemap: &'a Surface) -> Result<()> {
        check_dimensions("out-of-bounds texture map", texturemap, TEXTURE_DIMENSIONS)?;
        self.out_of_bounds_texturemap = Some(texturemap);
        Ok(())
    }

    /// Binds the 1920x100 sky panorama.
    pub fn set_sky(&mut self, sky: &'a Surface) -> Result<()> {
        check_dimensions("sky", sky, (SKY_WIDTH, SKY_HEIGHT))?;
        self.sky = Some(sky);
        Ok(())
    }

    pub fn set_quality(&mut self, quality: Quality) {
        self.quality = quality;
        if self.trace {
            debug!("quality: {quality} (stride {})", quality.stride());
        }
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Sets the height below which terrain turns to water. Reflections must
    /// be enabled.
    pub fn set_water_height(&mut self, height: i32) -> Result<()> {
        if self.water_height.is_none() {
            return Err(Error::CapabilityNotEnabled(Capability::ReflectionMap));
        }
        let height = u8::try_from(height)
            .map_err(|_| Error::out_of_range("water height", height, 0, u8::MAX as i32))?;
        self.water_height = Some(height);
        Ok(())
    }

    pub fn water_height(&self) -> Option<u8> {
        self.water_height
    }

    /// Billboard sprites are not supported.
    pub fn add_sprite(&mut self, _sprite: &'a Surface, _x: i32, _z: i32) -> Result<()> {
        Err(Error::NotImplemented("sprites"))
    }

    /// Painter's-order rendering is not supported; [`Renderer::render`]
    /// scans front to back.
    pub fn render_back_to_front(&mut self) -> Result<()> {
        Err(Error::NotImplemented("back-to-front rendering"))
    }

    /// Logs renderer events at debug level.
    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    pub fn tables(&self) -> &Arc<LookupTables> {
        &self.tables
    }

    /// The frame drawn by the last [`Renderer::render`].
    pub fn framebuffer(&self) -> &Surface {
        &*self.framebuffer
    }

    /// Draws one frame into the framebuffer.
    pub fn render(&mut self) {
        let band = SkyBand::for_view(&self.view);
        let fog = self.fog.then_some(self.fog_color);
        if self.trace {
            debug!(
                "frame: sky offset {}, height {}, source row {}, stride {}",
                band.offset,
                band.height,
                band.source_row,
                self.quality.stride()
            );
        }

        let mut fb = FrameBuffer::new(&mut *self.framebuffer);
        fb.fill_rows(HORIZON_BAND, GREY);
        render_sky(self.sky, band, fog, &mut fb);

        let scene = TerrainScene {
            tables: &self.tables,
            view: self.view,
            heightmap: self.heightmap,
            out_of_bounds_heightmap: self.out_of_bounds_heightmap,
            texturemap: self.texturemap,
            out_of_bounds_texturemap: self.out_of_bounds_texturemap,
            sky: self.sky,
            fog,
            water_height: self.water_height,
        };
        render_front_to_back(&scene, self.quality.stride(), &mut fb);

        if let Some(factor) = self.smooth {
            smooth(&mut fb, &mut self.scratch, factor);
        }
    }
}

fn check_dimensions(what: &'static str, surface: &Surface, expected: (u32, u32)) -> Result<()> {
    if surface.dimensions() == expected {
        Ok(())
    } else {
        Err(Error::dimensions(what, expected, surface.dimensions()))
    }
}
