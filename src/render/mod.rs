//! Terrain rendering: lookup tables, frame passes and the [`Renderer`] facade.
//!
//! A frame is drawn in four passes over the caller's framebuffer:
//!
//! 1. a grey horizon band, so rows no pass reaches never show a stale frame,
//! 2. the sky panorama slice for the camera's heading,
//! 3. the front-to-back terrain scan,
//! 4. the optional vertical smoothing pass.

mod framebuffer;
mod options;
mod renderer;
mod scan;
mod sky;
mod smooth;
pub mod tables;

pub use framebuffer::FrameBuffer;
pub use options::{Capability, Quality};
pub use renderer::Renderer;
pub use scan::Span;
pub use sky::{SkyBand, SKY_HEIGHT, SKY_WIDTH};
pub use smooth::DEFAULT_SMOOTH_FACTOR;
pub use tables::LookupTables;

#[cfg(test)]
pub(crate) fn shared_tables() -> std::sync::Arc<LookupTables> {
    use std::sync::{Arc, OnceLock};

    static TABLES: OnceLock<Arc<LookupTables>> = OnceLock::new();
    TABLES.get_or_init(|| Arc::new(LookupTables::new())).clone()
}
