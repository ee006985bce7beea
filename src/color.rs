//! Color helpers.
//!
//! Colors are linear RGB stored in a [`Vec3`], matching how the renderer
//! writes them to an sRGB surface. Hex literals are interpreted as sRGB and
//! converted on the way in.

use glam::Vec3;

/// Convert a `0xRRGGBB` sRGB hex literal into a linear RGB color.
///
/// ```
/// use nocturne::color::hex;
///
/// let white = hex(0xffffff);
/// assert!(white.abs_diff_eq(glam::Vec3::ONE, 1e-5));
/// ```
pub fn hex(rgb: u32) -> Vec3 {
    let r = ((rgb >> 16) & 0xff) as f32 / 255.0;
    let g = ((rgb >> 8) & 0xff) as f32 / 255.0;
    let b = (rgb & 0xff) as f32 / 255.0;
    Vec3::new(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b))
}

/// sRGB transfer function, inverse direction.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Linear interpolation between two colors.
///
/// Written as `a * (1 - t) + b * t` so both endpoints are reproduced exactly:
/// `t = 0` yields `a` and `t = 1` yields `b`.
#[inline]
pub fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_extremes() {
        assert_eq!(hex(0x000000), Vec3::ZERO);
        assert!(hex(0xffffff).abs_diff_eq(Vec3::ONE, 1e-5));
        assert!(hex(0xff0000).abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn test_hex_is_linearized() {
        // 0x80 is ~0.5 in sRGB but ~0.216 in linear space
        let grey = hex(0x808080);
        assert!((grey.x - 0.2158).abs() < 0.001);
        assert_eq!(grey.x, grey.y);
        assert_eq!(grey.y, grey.z);
    }

    #[test]
    fn test_lerp_endpoints_exact() {
        let a = hex(0x8a2be2);
        let b = hex(0x4b0082);
        assert_eq!(lerp(a, b, 0.0), a);
        assert_eq!(lerp(a, b, 1.0), b);
    }

    #[test]
    fn test_lerp_midpoint() {
        let mid = lerp(Vec3::ZERO, Vec3::new(2.0, 4.0, 6.0), 0.5);
        assert_eq!(mid, Vec3::new(1.0, 2.0, 3.0));
    }
}
