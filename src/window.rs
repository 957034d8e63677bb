//! SDL2 window that shows a 320x200 frame scaled up.

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;

use crate::render::tables::{CANVAS_HEIGHT, CANVAS_WIDTH};

pub const WINDOW_SCALE: u32 = 3;
pub const FPS: u64 = 60;
pub const FRAME_TARGET_TIME: f64 = 1000.0 / FPS as f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    None,
    Quit,
    TogglePause,
    CycleQuality,
    ToggleFog,
    ToggleReflections,
    ToggleSmooth,
}

pub struct FrameLimiter {
    previous_frame_time: u64,
}

impl FrameLimiter {
    pub fn new(window: &Window) -> Self {
        Self {
            previous_frame_time: window.timer().ticks64(),
        }
    }

    /// Sleeps out the rest of the frame budget and returns the milliseconds
    /// elapsed since the previous call.
    pub fn wait_and_get_delta(&mut self, window: &Window) -> u64 {
        let mut current_time = window.timer().ticks64();
        let mut delta_time = current_time - self.previous_frame_time;

        if delta_time < FRAME_TARGET_TIME as u64 {
            let time_to_wait = (FRAME_TARGET_TIME as u64) - delta_time;
            std::thread::sleep(std::time::Duration::from_millis(time_to_wait));
            current_time = window.timer().ticks64();
            delta_time = current_time - self.previous_frame_time;
        }

        self.previous_frame_time = current_time;
        delta_time
    }
}

pub struct Window {
    // Declared before the texture creator so it is dropped first
    texture: sdl2::render::Texture<'static>,
    _texture_creator: Box<sdl2::render::TextureCreator<sdl2::video::WindowContext>>,
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    event_pump: sdl2::EventPump,
    timer_subsystem: sdl2::TimerSubsystem,
}

impl Window {
    /// Opens a window `scale` times the size of the frame.
    pub fn new(title: &str, scale: u32) -> Result<Self, String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;
        let timer_subsystem = sdl_context.timer()?;

        let window = video_subsystem
            .window(
                title,
                CANVAS_WIDTH as u32 * scale,
                CANVAS_HEIGHT as u32 * scale,
            )
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump()?;

        // SAFETY: texture_creator is heap-allocated and lives as long as Window.
        // The texture field is dropped before texture_creator.
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(texture_creator.as_ref() as *const _) };
        let texture = texture_creator_ref
            .create_texture_streaming(
                PixelFormatEnum::ARGB8888,
                CANVAS_WIDTH as u32,
                CANVAS_HEIGHT as u32,
            )
            .map_err(|e| e.to_string())?;

        Ok(Self {
            texture,
            _texture_creator: texture_creator,
            canvas,
            event_pump,
            timer_subsystem,
        })
    }

    pub fn poll_events(&mut self) -> WindowEvent {
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => return WindowEvent::Quit,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match key {
                    Keycode::Space => return WindowEvent::TogglePause,
                    Keycode::Q => return WindowEvent::CycleQuality,
                    Keycode::F => return WindowEvent::ToggleFog,
                    Keycode::R => return WindowEvent::ToggleReflections,
                    Keycode::S => return WindowEvent::ToggleSmooth,
                    _ => {}
                },
                _ => {}
            }
        }
        WindowEvent::None
    }

    /// Uploads an ARGB8888 frame and stretches it over the window.
    pub fn present(&mut self, buffer: &[u8]) -> Result<(), String> {
        self.texture
            .update(None, buffer, CANVAS_WIDTH * 4)
            .map_err(|e| e.to_string())?;

        self.canvas.clear();
        self.canvas.copy(&self.texture, None, None)?;
        self.canvas.present();
        Ok(())
    }

    pub fn timer(&self) -> &sdl2::TimerSubsystem {
        &self.timer_subsystem
    }
}
