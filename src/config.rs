//! Renderer settings applied once at construction.

use crate::camera::Camera;
use crate::render::Quality;

/// Settings for [`Renderer::with_config`](crate::Renderer::with_config).
///
/// Capabilities are enabled by the settings that need them: a fog colour
/// turns fog on and a water height turns reflections on.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    pub quality: Quality,
    /// Fog colour as `#rrggbb`; `None` leaves fog disabled.
    pub fog_color: Option<String>,
    /// Water height; `None` leaves reflections disabled.
    pub water_height: Option<u8>,
    pub smooth: bool,
    /// Log renderer events at debug level.
    pub trace: bool,
    pub camera: Camera,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            quality: Quality::default(),
            fog_color: None,
            water_height: None,
            smooth: false,
            trace: false,
            camera: Camera::default(),
        }
    }
}

impl RendererConfig {
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_fog_color(mut self, color: impl Into<String>) -> Self {
        self.fog_color = Some(color.into());
        self
    }

    pub fn with_water_height(mut self, height: u8) -> Self {
        self.water_height = Some(height);
        self
    }

    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }
}
