//! Error type shared by every fallible operation in the crate.
//!
//! All failures are configuration or precondition errors raised at the point of
//! the offending call. The render loop itself never fails.

use crate::render::Capability;

/// Errors returned by surface, compositor and renderer operations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid bytes-per-pixel: {0} (must be 1, 2, 3 or 4)")]
    InvalidBytesPerPixel(u8),

    #[error("{surface} must be {expected_width}x{expected_height}, got {width}x{height}")]
    Dimensions {
        surface: &'static str,
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },

    #[error("unknown capability '{0}': must be 'fog', 'reflection-map' or 'smooth'")]
    UnknownCapability(String),

    #[error("invalid quality '{0}': must be 'low', 'medium' or 'high'")]
    UnknownQuality(String),

    #[error("invalid fog color '{0}': must be in fully-qualified hexadecimal format (#rrggbb)")]
    InvalidFogColor(String),

    #[error("capability not enabled: {0}")]
    CapabilityNotEnabled(Capability),

    #[error("invalid {what}: {value} (must be in the range {min}..={max})")]
    OutOfRange {
        what: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("camera height {0} is outside the supported range 200..=300")]
    CameraHeight(i32),

    #[error("{0} is not bound")]
    NotBound(&'static str),

    #[error("no texture added at height 255; unable to composite")]
    MissingBaseTexture,

    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    pub(crate) fn dimensions(
        surface: &'static str,
        expected: (u32, u32),
        actual: (u32, u32),
    ) -> Self {
        Error::Dimensions {
            surface,
            expected_width: expected.0,
            expected_height: expected.1,
            width: actual.0,
            height: actual.1,
        }
    }

    pub(crate) fn out_of_range(what: &'static str, value: i32, min: i32, max: i32) -> Self {
        Error::OutOfRange {
            what,
            value,
            min,
            max,
        }
    }
}

/// Result alias for crate operations.
pub type Result<T> = std::result::Result<T, Error>;
