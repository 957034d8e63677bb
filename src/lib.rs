//! A CPU voxel-space terrain renderer.
//!
//! Renders a 1024x1024 heightfield into a fixed 320x200 framebuffer by casting
//! one ray per screen column and drawing vertical spans front to back, with a
//! panoramic sky, optional fog, water reflections and vertical smoothing. SDL2
//! is used only by the demo binary for window management and display.
//!
//! # Quick Start
//!
//! ```ignore
//! use voxscape::prelude::*;
//!
//! let mut compositor = Compositor::new();
//! compositor.set_heightmap(&Surface::from_file("assets/heightmap.png")?)?;
//! let texturemap = Surface::from_file("assets/texturemap.png")?;
//!
//! let mut frame = Surface::new(320, 200, 4)?;
//! let mut renderer = Renderer::new(&mut frame)?;
//! renderer.set_heightmap(compositor.heightmap());
//! renderer.set_texturemap(&texturemap)?;
//! renderer.render();
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod colors;
pub mod compositor;
pub mod config;
pub mod error;
pub mod heightmap;
pub mod render;
pub mod surface;
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use camera::Camera;
pub use compositor::Compositor;
pub use config::RendererConfig;
pub use error::{Error, Result};
pub use heightmap::Heightmap;
pub use render::{Capability, LookupTables, Quality, Renderer};
pub use surface::Surface;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use voxscape::prelude::*;
/// ```
pub mod prelude {
    // Assets
    pub use crate::compositor::Compositor;
    pub use crate::heightmap::Heightmap;
    pub use crate::surface::Surface;

    // Rendering
    pub use crate::camera::Camera;
    pub use crate::config::RendererConfig;
    pub use crate::render::{Capability, Quality, Renderer};

    // Errors
    pub use crate::error::{Error, Result};

    // Window & Input
    pub use crate::window::{FrameLimiter, Window, WindowEvent};
}
