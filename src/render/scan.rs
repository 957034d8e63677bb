//! Front-to-back terrain scan.
//!
//! Each sampled screen column casts one ray across the heightfield. Rows are
//! visited from the bottom of the screen (nearest ground) up to row 0 (the
//! farthest), and a terrain sample only becomes visible if its projected top
//! rises above everything already drawn in that column. `previous_top` is the
//! whole visibility state: no depth buffer is needed.

use crate::camera::ViewPoint;
use crate::colors::{alpha_blend, from_pixel, OUT_OF_BOUNDS_FALLBACK, TEXTURE_FALLBACK};
use crate::heightmap::{in_primary_tile, Heightmap, TILE_MASK};
use crate::surface::Surface;

use super::framebuffer::FrameBuffer;
use super::sky::{leftmost_angle, reflected_sky};
use super::tables::{
    LookupTables, CANVAS_HEIGHT, CANVAS_WIDTH, FULL_CIRCLE, MAXIMUM_ROW, SCALE_FACTOR,
};

/// Last framebuffer row terrain may cover.
const LAST_ROW: i32 = CANVAS_HEIGHT as i32 - 1;

/// A vertical run of pixels drawn for one terrain sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub top: i32,
    pub bottom: i32,
    pub color: u32,
}

/// Everything the scan reads while rendering a frame.
pub(crate) struct TerrainScene<'s> {
    pub tables: &'s LookupTables,
    pub view: ViewPoint,
    pub heightmap: Option<&'s Heightmap>,
    pub out_of_bounds_heightmap: Option<&'s Heightmap>,
    pub texturemap: Option<&'s Surface>,
    pub out_of_bounds_texturemap: Option<&'s Surface>,
    pub sky: Option<&'s Surface>,
    pub fog: Option<u32>,
    pub water_height: Option<u8>,
}

/// Screen row where ground at height zero meets the horizon.
#[inline]
pub(crate) fn horizon_row(camera_height: i32) -> i32 {
    (CANVAS_HEIGHT as i32 >> 1) - (camera_height - CANVAS_HEIGHT as i32)
}

/// Projected top of a terrain sample of `height` lying `ray_length` away.
#[inline]
pub(crate) fn span_top(horizon: i32, row: usize, height: i32, ray_length: f32) -> i32 {
    let scale = (height as f32 * SCALE_FACTOR / (ray_length + 1.0)) as i32;
    horizon + row as i32 - scale
}

impl<'s> TerrainScene<'s> {
    /// Marches the ray for screen column `ray`, reporting each visible span
    /// in scan order.
    pub fn march_column(&self, ray: usize, mut emit: impl FnMut(Span)) {
        let angle = (leftmost_angle(self.view.angle) + ray) % FULL_CIRCLE;
        let cosine = self.tables.cosine(angle);
        let sine = self.tables.sine(angle);
        let lengths = self.tables.ray_lengths_for(self.view.y);
        let horizon = horizon_row(self.view.y);

        let mut previous_top = MAXIMUM_ROW as i32;

        for row in (0..=MAXIMUM_ROW).rev() {
            let ray_length = lengths[row * CANVAS_WIDTH + ray];

            let world_x = (self.view.x as f32 + ray_length * cosine) as i32;
            let world_z = (self.view.z as f32 + ray_length * sine) as i32;
            let u = world_x & TILE_MASK;
            let v = world_z & TILE_MASK;
            let inside = in_primary_tile(world_x, world_z);

            let sampled = self.height_at(inside, u, v);
            let height = match self.water_height {
                Some(water) if inside && sampled < water as i32 => water as i32,
                _ => sampled,
            };

            let top = span_top(horizon, row, height, ray_length);
            if top >= previous_top {
                // Hidden behind a nearer span
                continue;
            }

            // Extend down to the nearer span so no gap opens between them
            let bottom = previous_top.min(LAST_ROW);
            previous_top = top;

            let color = self.resolve_color(inside, u, v, sampled, row, top, ray);
            emit(Span { top, bottom, color });
        }
    }

    #[inline]
    fn height_at(&self, inside: bool, u: i32, v: i32) -> i32 {
        let map = if inside {
            self.heightmap
        } else {
            self.out_of_bounds_heightmap.or(self.heightmap)
        };
        map.map_or(0, |m| m.sample(u, v) as i32)
    }

    #[allow(clippy::too_many_arguments)]
    #[inline]
    fn resolve_color(
        &self,
        inside: bool,
        u: i32,
        v: i32,
        height: i32,
        row: usize,
        top: i32,
        ray: usize,
    ) -> u32 {
        let texel = if !inside {
            sample(self.out_of_bounds_texturemap, u, v, OUT_OF_BOUNDS_FALLBACK)
        } else {
            let texel = sample(self.texturemap, u, v, TEXTURE_FALLBACK);
            match self.water_height {
                Some(water) if height < water as i32 => {
                    let water = water as i32;
                    let reflection =
                        reflected_sky(self.sky, self.view.angle, ray, CANVAS_HEIGHT as i32 - top);
                    // Shallows show the terrain; deep water mirrors the sky
                    let alpha = ((water - height) as f32 / water as f32 * 255.0 * 2.0) as i32;
                    alpha_blend(reflection, texel, alpha)
                }
                _ => texel,
            }
        };

        match self.fog {
            Some(fog) => alpha_blend(texel, fog, (row as f32 / 100.0 * 255.0) as i32),
            None => texel,
        }
    }
}

#[inline]
fn sample(map: Option<&Surface>, u: i32, v: i32, fallback: u32) -> u32 {
    match map {
        Some(map) => from_pixel(map.pixel(u as usize, v as usize)),
        None => fallback,
    }
}

/// Renders the terrain into `fb`, casting one ray every `stride` columns.
///
/// Each span covers `stride` columns. The first ray also covers the columns
/// to its left, since no ray is cast for column 0.
pub(crate) fn render_front_to_back(scene: &TerrainScene, stride: usize, fb: &mut FrameBuffer) {
    for ray in (stride..CANVAS_WIDTH).step_by(stride) {
        let columns = if ray == stride {
            ray - stride..ray + stride
        } else {
            ray..ray + stride
        };
        scene.march_column(ray, |span| {
            fb.fill_span(columns.clone(), span.top, span.bottom, span.color);
        });
    }
}
