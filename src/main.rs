use std::error::Error;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::GrayImage;
use log::{info, warn};

use voxscape::colors::{pack_color, to_pixel};
use voxscape::compositor::TEXTURE_SIZE;
use voxscape::heightmap::TILE_SIZE;
use voxscape::render::{SKY_HEIGHT, SKY_WIDTH};
use voxscape::window::{FrameLimiter, Window, WindowEvent, WINDOW_SCALE};
use voxscape::{Capability, Compositor, Quality, Renderer, RendererConfig, Surface};

const HEIGHTMAP_PATH: &str = "assets/heightmap.png";
const TEXTUREMAP_PATH: &str = "assets/texturemap.png";
const SKY_PATH: &str = "assets/sky.png";

/// Heightmap images are authored at a quarter of the tile size.
const UPSAMPLE: u32 = 4;
const BLUR_RADIUS: i32 = 2;

struct Options {
    screenshot: Option<String>,
    config: RendererConfig,
}

fn parse_args() -> Result<Options, Box<dyn Error>> {
    let mut options = Options {
        screenshot: None,
        config: RendererConfig::default().with_fog_color("#d7a67b"),
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut value = || args.next().ok_or_else(|| format!("{arg} needs a value"));
        match arg.as_str() {
            "--screenshot" => options.screenshot = Some(value()?),
            "--quality" => options.config.quality = value()?.parse()?,
            "--fog" => options.config.fog_color = Some(value()?),
            "--no-fog" => options.config.fog_color = None,
            "--water" => options.config.water_height = Some(value()?.parse()?),
            "--smooth" => options.config.smooth = true,
            "--trace" => options.config.trace = true,
            other => return Err(format!("unknown argument '{other}'").into()),
        }
    }
    Ok(options)
}

/// Averages each cell over a (2r+1)x(2r+1) window, clamped at the edges.
fn box_blur(source: &GrayImage, radius: i32) -> GrayImage {
    let (width, height) = source.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let mut sum = 0u32;
        let mut count = 0u32;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let sx = (x as i32 + dx).clamp(0, width as i32 - 1) as u32;
                let sy = (y as i32 + dy).clamp(0, height as i32 - 1) as u32;
                sum += source.get_pixel(sx, sy).0[0] as u32;
                count += 1;
            }
        }
        image::Luma([(sum / count) as u8])
    })
}

/// Rolling hills from summed sine waves, at the authoring resolution.
fn procedural_heights() -> GrayImage {
    let size = TILE_SIZE as u32 / UPSAMPLE;
    GrayImage::from_fn(size, size, |x, y| {
        let fx = x as f32 / size as f32 * std::f32::consts::TAU;
        let fy = y as f32 / size as f32 * std::f32::consts::TAU;
        let h = 0.45 * (fx * 2.0).sin() * (fy * 3.0).cos()
            + 0.30 * (fx * 5.0 + fy * 2.0).sin()
            + 0.15 * (fx * 11.0 - fy * 7.0).cos()
            + 0.10 * (fx * 23.0 + fy * 19.0).sin();
        image::Luma([(110.0 + h * 120.0).clamp(0.0, 255.0) as u8])
    })
}

/// Loads or generates the heightmap and ingests it, upsampled and blurred.
fn build_heightmap(compositor: &mut Compositor) -> voxscape::Result<()> {
    let heights = if Path::new(HEIGHTMAP_PATH).exists() {
        info!("loading {HEIGHTMAP_PATH}");
        image::open(HEIGHTMAP_PATH)?.to_luma8()
    } else {
        warn!("{HEIGHTMAP_PATH} not found, generating terrain");
        procedural_heights()
    };

    let size = TILE_SIZE as u32;
    let heights = if heights.dimensions() == (size, size) {
        heights
    } else {
        imageops::resize(&heights, size, size, FilterType::Nearest)
    };
    let heights = box_blur(&heights, BLUR_RADIUS);

    let mut source = Surface::new(size, size, 4)?;
    for (x, y, p) in heights.enumerate_pixels() {
        let h = p.0[0];
        source.put_pixel(x as i32, y as i32, to_pixel(pack_color(h, h, h)));
    }
    compositor.set_heightmap(&source)?;

    // A plateau stamped near the centre of the tile
    let mut mask = Surface::new(96, 96, 4)?;
    for y in 0..96 {
        for x in 0..96 {
            let d = (((x - 48) * (x - 48) + (y - 48) * (y - 48)) as f32).sqrt();
            if d < 40.0 {
                let red = (255.0 * (1.0 - d / 40.0)) as u32;
                mask.put_pixel(x, y, 0xff00_0000 | red << 16);
            }
        }
    }
    compositor.put_mask(&mask, 560, 400, 0.2);
    Ok(())
}

/// A 256x256 tile of `base` with deterministic speckle.
fn band_texture(base: (u8, u8, u8), seed: u32) -> voxscape::Result<Surface> {
    let mut texture = Surface::new(TEXTURE_SIZE, TEXTURE_SIZE, 4)?;
    for y in 0..TEXTURE_SIZE {
        for x in 0..TEXTURE_SIZE {
            let hash = (x.wrapping_mul(73_856_093) ^ y.wrapping_mul(19_349_663) ^ seed) % 41;
            let shade = |c: u8| (c as i32 + hash as i32 - 20).clamp(0, 255) as u8;
            let color = pack_color(shade(base.0), shade(base.1), shade(base.2));
            texture.put_pixel(x as i32, y as i32, to_pixel(color));
        }
    }
    Ok(texture)
}

fn build_texturemap(compositor: &mut Compositor) -> voxscape::Result<Surface> {
    if Path::new(TEXTUREMAP_PATH).exists() {
        info!("loading {TEXTUREMAP_PATH}");
        return Surface::from_file(TEXTUREMAP_PATH);
    }

    warn!("{TEXTUREMAP_PATH} not found, compositing height bands");
    compositor
        .add_texture(70, band_texture((196, 178, 128), 1)?)?
        .add_texture(140, band_texture((72, 128, 56), 2)?)?
        .add_texture(200, band_texture((110, 96, 80), 3)?)?
        .add_texture(255, band_texture((236, 236, 240), 4)?)?;

    let size = TILE_SIZE as u32;
    let mut texturemap = Surface::new(size, size, 4)?;
    compositor.composite(&mut texturemap)?;
    Ok(texturemap)
}

fn build_sky() -> voxscape::Result<Surface> {
    if Path::new(SKY_PATH).exists() {
        info!("loading {SKY_PATH}");
        return Surface::from_file(SKY_PATH);
    }

    warn!("{SKY_PATH} not found, generating gradient");
    let mut sky = Surface::new(SKY_WIDTH, SKY_HEIGHT, 4)?;
    for y in 0..SKY_HEIGHT {
        let t = y as f32 / SKY_HEIGHT as f32;
        for x in 0..SKY_WIDTH {
            let angle = x as f32 / SKY_WIDTH as f32 * std::f32::consts::TAU;
            let cloud = ((angle * 7.0).sin() * (angle * 3.0 + t * 4.0).cos()).max(0.0) * 60.0;
            let channel = |from: f32, to: f32| (from + (to - from) * t + cloud).min(255.0) as u8;
            let color = pack_color(channel(40.0, 170.0), channel(80.0, 200.0), channel(160.0, 235.0));
            sky.put_pixel(x as i32, y as i32, to_pixel(color));
        }
    }
    Ok(sky)
}

fn next_quality(quality: Quality) -> Quality {
    match quality {
        Quality::Low => Quality::Medium,
        Quality::Medium => Quality::High,
        Quality::High => Quality::Low,
    }
}

fn toggle(renderer: &mut Renderer, capability: Capability) {
    if renderer.is_enabled(capability) {
        renderer.disable(capability);
    } else {
        renderer.enable(capability);
    }
    info!("{capability}: {}", renderer.is_enabled(capability));
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let options = parse_args()?;

    let mut compositor = Compositor::new();
    build_heightmap(&mut compositor)?;
    let texturemap = build_texturemap(&mut compositor)?;
    let sky = build_sky()?;

    let mut frame = Surface::new(320, 200, 4)?;
    let mut renderer = Renderer::with_config(&mut frame, &options.config)?;
    renderer.set_heightmap(compositor.heightmap());
    renderer.set_out_of_bounds_heightmap(compositor.out_of_bounds_heightmap());
    renderer.set_texturemap(&texturemap)?;
    renderer.set_out_of_bounds_texturemap(&texturemap)?;
    renderer.set_sky(&sky)?;

    let mut camera = renderer.camera();
    camera.y = (renderer.get_height(camera.x, camera.z)? as i32 + 100).clamp(200, 300);
    renderer.set_camera(&camera)?;
    info!("camera at {camera:?}");

    if let Some(path) = options.screenshot {
        renderer.render();
        renderer.framebuffer().to_rgba_image().save(&path)?;
        info!("wrote {path}");
        return Ok(());
    }

    let mut window = Window::new("voxscape", WINDOW_SCALE)?;
    let mut limiter = FrameLimiter::new(&window);
    let mut paused = false;

    loop {
        match window.poll_events() {
            WindowEvent::Quit => break,
            WindowEvent::TogglePause => paused = !paused,
            WindowEvent::CycleQuality => {
                let quality = next_quality(renderer.quality());
                renderer.set_quality(quality);
                info!("quality: {quality}");
            }
            WindowEvent::ToggleFog => toggle(&mut renderer, Capability::Fog),
            WindowEvent::ToggleReflections => toggle(&mut renderer, Capability::ReflectionMap),
            WindowEvent::ToggleSmooth => toggle(&mut renderer, Capability::Smooth),
            WindowEvent::None => {}
        }

        if !paused {
            camera.angle = (camera.angle + 1) % 360;
            renderer.set_camera(&camera)?;
        }

        renderer.render();
        window.present(renderer.framebuffer().as_bytes())?;
        limiter.wait_and_get_delta(&window);
    }

    Ok(())
}
