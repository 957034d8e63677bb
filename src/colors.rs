//! Packed colour helpers.
//!
//! Internally every colour is an RGBA `u32` laid out as `0xRRGGBBAA`. Surfaces
//! store pixels as `0xAARRGGBB` (ARGB8888); [`from_pixel`] and [`to_pixel`]
//! convert between the two.

pub const BLACK: u32 = 0x000000ff;
pub const WHITE: u32 = 0xffffffff;
pub const GREY: u32 = 0x7f7f7fff;

/// Used in place of an unbound texture map.
pub const TEXTURE_FALLBACK: u32 = WHITE;
/// Used in place of an unbound out-of-bounds texture map.
pub const OUT_OF_BOUNDS_FALLBACK: u32 = GREY;
/// Used in place of an unbound sky.
pub const SKY_FALLBACK: u32 = 0x6495edff;
/// Fog colour until one is configured.
pub const DEFAULT_FOG: u32 = GREY;

#[inline]
pub fn pack_color(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | 0xff
}

#[inline]
pub fn unpack_color(color: u32) -> (u8, u8, u8) {
    (
        ((color >> 24) & 0xff) as u8,
        ((color >> 16) & 0xff) as u8,
        ((color >> 8) & 0xff) as u8,
    )
}

/// Converts a surface pixel (`0x??RRGGBB`) into an RGBA colour.
#[inline]
pub fn from_pixel(pixel: u32) -> u32 {
    ((pixel & 0x00ff_ffff) << 8) | 0xff
}

/// Converts an RGBA colour into an opaque ARGB surface pixel.
#[inline]
pub fn to_pixel(color: u32) -> u32 {
    0xff00_0000 | ((color >> 8) & 0x00ff_ffff)
}

/// Blends two RGBA colours.
///
/// `alpha` is the weight of `first` in the range 0..=255 (clamped); `second`
/// receives the remainder. The result is always opaque.
#[inline]
pub fn alpha_blend(first: u32, second: u32, alpha: i32) -> u32 {
    let alpha = alpha.clamp(0, 255);
    let normalised = alpha as f32 / 255.0;
    let adjusted = 1.0 - normalised;

    let (r1, g1, b1) = unpack_color(first);
    let (r2, g2, b2) = unpack_color(second);

    let mix = |a: u8, b: u8| -> u8 {
        let mixed = (a as f32 * normalised) as u32 + (b as f32 * adjusted).floor() as u32;
        mixed.min(255) as u8
    };

    pack_color(mix(r1, r2), mix(g1, g2), mix(b1, b2))
}

/// Parses a `#rrggbb` string into an RGBA colour.
pub fn parse_hex_color(css: &str) -> Option<u32> {
    let bytes = css.as_bytes();
    if bytes.len() != 7 || bytes[0] != b'#' || !bytes[1..].iter().all(u8::is_ascii_hexdigit) {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&css[i..i + 2], 16).ok();
    Some(pack_color(channel(1)?, channel(3)?, channel(5)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fog_color() {
        let color = parse_hex_color("#d7a67b").unwrap();
        assert_eq!(unpack_color(color), (0xd7, 0xa6, 0x7b));
        assert_eq!(color & 0xff, 0xff);
    }

    #[test]
    fn rejects_malformed_colors() {
        for bad in ["d7a67b", "#d7a67", "#d7a67bb", "#g7a67b", "#+7a67b", "", "#ffé000"] {
            assert!(parse_hex_color(bad).is_none(), "{bad:?} should be rejected");
        }
        assert!(parse_hex_color("#D7A67B").is_some());
    }

    #[test]
    fn blend_extremes_select_one_color() {
        let red = pack_color(255, 0, 0);
        let blue = pack_color(0, 0, 255);
        assert_eq!(alpha_blend(red, blue, 255), red);
        assert_eq!(alpha_blend(red, blue, 0), blue);
        // Out-of-range alpha is clamped rather than wrapping
        assert_eq!(alpha_blend(red, blue, 1000), red);
        assert_eq!(alpha_blend(red, blue, -5), blue);
    }

    #[test]
    fn blend_midpoint_lies_between() {
        let white = pack_color(200, 200, 200);
        let black = pack_color(0, 0, 0);
        let (r, g, b) = unpack_color(alpha_blend(white, black, 128));
        assert!(r > 0 && r < 200);
        assert_eq!((r, g), (g, b));
    }

    #[test]
    fn pixel_conversion_keeps_rgb() {
        let color = pack_color(0x12, 0x34, 0x56);
        assert_eq!(to_pixel(color), 0xff123456);
        assert_eq!(from_pixel(0xff123456), color);
        assert_eq!(from_pixel(0x00123456), color);
    }
}
