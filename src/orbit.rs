//! Orbiting light sources.
//!
//! Each light follows a fixed, phase-shifted periodic path: sine on X and Y,
//! cosine on Z. The path is a pure function of time, so a light's position
//! can be evaluated for any moment without tracking state.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::color::hex;

/// Height around which every light bobs.
pub const BASE_LIGHT_HEIGHT: f32 = 18.0;

/// Per-light constants describing its orbit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitParams {
    pub amp_x: f32,
    pub amp_y: f32,
    pub amp_z: f32,
    pub freq_x: f32,
    pub freq_y: f32,
    pub freq_z: f32,
    pub phase_x: f32,
    pub phase_y: f32,
    pub phase_z: f32,
    /// Multiplier applied to elapsed time before evaluating the path.
    pub speed: f32,
    /// Constant shift along Z.
    pub offset_z: f32,
}

impl OrbitParams {
    /// Position on the path at orbit time `t` (already scaled by `speed`).
    ///
    /// ```text
    /// x = amp_x * sin(freq_x*t + phase_x)
    /// y = base_height + amp_y * sin(freq_y*t + phase_y)
    /// z = amp_z * cos(freq_z*t + phase_z) + offset_z
    /// ```
    #[inline]
    pub fn position(&self, t: f32, base_height: f32) -> Vec3 {
        Vec3::new(
            self.amp_x * (self.freq_x * t + self.phase_x).sin(),
            base_height + self.amp_y * (self.freq_y * t + self.phase_y).sin(),
            self.amp_z * (self.freq_z * t + self.phase_z).cos() + self.offset_z,
        )
    }

    /// Position after `elapsed` seconds of wall time.
    #[inline]
    pub fn position_at(&self, elapsed: f32, base_height: f32) -> Vec3 {
        self.position(elapsed * self.speed, base_height)
    }

    /// Where the light head sits before the first frame.
    pub fn rest_position(&self, base_height: f32) -> Vec3 {
        Vec3::new(self.amp_x, base_height, self.offset_z)
    }
}

/// A light source with its orbit and trail colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightSource {
    /// Color of the glowing head.
    pub color: Vec3,
    pub orbit: OrbitParams,
    /// Trail color at the head end. Defaults to `color`.
    #[serde(default)]
    pub trail_head_color: Option<Vec3>,
    /// Trail color at the tail end. Defaults to black.
    #[serde(default)]
    pub trail_tail_color: Option<Vec3>,
}

impl LightSource {
    /// Light with no explicit trail colors.
    pub fn new(color: Vec3, orbit: OrbitParams) -> Self {
        Self {
            color,
            orbit,
            trail_head_color: None,
            trail_tail_color: None,
        }
    }

    /// Set both trail colors.
    pub fn with_trail_colors(mut self, head: Vec3, tail: Vec3) -> Self {
        self.trail_head_color = Some(head);
        self.trail_tail_color = Some(tail);
        self
    }

    /// Effective trail color at the newest point.
    pub fn head_color(&self) -> Vec3 {
        self.trail_head_color.unwrap_or(self.color)
    }

    /// Effective trail color at the oldest visible point.
    pub fn tail_color(&self) -> Vec3 {
        self.trail_tail_color.unwrap_or(Vec3::ZERO)
    }
}

/// The four lights of the stock scene: violet, green, red and magenta.
pub fn default_light_sources() -> Vec<LightSource> {
    vec![
        LightSource::new(
            hex(0x6a0dad),
            OrbitParams {
                amp_x: 25.0,
                amp_y: 5.0,
                amp_z: 20.0,
                freq_x: 1.0,
                freq_y: 1.5,
                freq_z: 1.2,
                phase_x: 0.0,
                phase_y: PI / 2.0,
                phase_z: 0.0,
                speed: 0.25,
                offset_z: 0.0,
            },
        )
        .with_trail_colors(hex(0x8a2be2), hex(0x4b0082)),
        LightSource::new(
            hex(0x00ff00),
            OrbitParams {
                amp_x: 18.0,
                amp_y: 6.0,
                amp_z: 15.0,
                freq_x: 1.3,
                freq_y: 1.0,
                freq_z: 1.8,
                phase_x: PI / 3.0,
                phase_y: 0.0,
                phase_z: PI,
                speed: 0.35,
                offset_z: 2.0,
            },
        )
        .with_trail_colors(hex(0x32cd32), hex(0x006400)),
        LightSource::new(
            hex(0xff0000),
            OrbitParams {
                amp_x: 12.0,
                amp_y: 4.0,
                amp_z: 10.0,
                freq_x: 2.0,
                freq_y: 2.5,
                freq_z: 1.0,
                phase_x: PI,
                phase_y: PI / 4.0,
                phase_z: PI / 2.0,
                speed: 0.45,
                offset_z: -3.0,
            },
        )
        .with_trail_colors(hex(0xff4500), hex(0x8b0000)),
        LightSource::new(
            hex(0xff00ff),
            OrbitParams {
                amp_x: 10.0,
                amp_y: 5.0,
                amp_z: 10.0,
                freq_x: 1.0,
                freq_y: 1.0,
                freq_z: 2.2,
                phase_x: 0.0,
                phase_y: PI,
                phase_z: PI / 3.0,
                speed: 0.5,
                offset_z: -5.0,
            },
        )
        .with_trail_colors(hex(0xff1493), hex(0x8a2be2)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_orbit() -> OrbitParams {
        OrbitParams {
            amp_x: 2.0,
            amp_y: 3.0,
            amp_z: 4.0,
            freq_x: 1.0,
            freq_y: 1.0,
            freq_z: 1.0,
            phase_x: 0.0,
            phase_y: 0.0,
            phase_z: 0.0,
            speed: 1.0,
            offset_z: 1.5,
        }
    }

    #[test]
    fn test_position_is_pure() {
        let orbit = default_light_sources()[2].orbit;
        let a = orbit.position(3.7, BASE_LIGHT_HEIGHT);
        let b = orbit.position(3.7, BASE_LIGHT_HEIGHT);
        assert_eq!(a, b);
    }

    #[test]
    fn test_position_at_zero() {
        // sin(0) = 0, cos(0) = 1
        let p = flat_orbit().position(0.0, 18.0);
        assert_eq!(p, Vec3::new(0.0, 18.0, 4.0 + 1.5));
    }

    #[test]
    fn test_y_equals_base_height_when_sine_vanishes() {
        let mut orbit = flat_orbit();
        orbit.freq_y = 2.0;
        orbit.phase_y = -1.0;
        // freq_y * 0.5 + phase_y = 0
        let p = orbit.position(0.5, BASE_LIGHT_HEIGHT);
        assert_eq!(p.y, BASE_LIGHT_HEIGHT);
    }

    #[test]
    fn test_speed_scales_time() {
        let mut orbit = flat_orbit();
        orbit.speed = 0.25;
        assert_eq!(orbit.position_at(8.0, 0.0), orbit.position(2.0, 0.0));
    }

    #[test]
    fn test_default_palette() {
        let lights = default_light_sources();
        assert_eq!(lights.len(), 4);
        assert_eq!(lights[0].orbit.speed, 0.25);
        assert_eq!(lights[3].orbit.offset_z, -5.0);
        for light in &lights {
            assert!(light.trail_head_color.is_some());
            assert!(light.trail_tail_color.is_some());
        }
    }

    #[test]
    fn test_trail_color_fallbacks() {
        let light = LightSource::new(Vec3::new(0.2, 0.4, 0.6), flat_orbit());
        assert_eq!(light.head_color(), Vec3::new(0.2, 0.4, 0.6));
        assert_eq!(light.tail_color(), Vec3::ZERO);
    }

    #[test]
    fn test_rest_position() {
        let orbit = flat_orbit();
        assert_eq!(orbit.rest_position(18.0), Vec3::new(2.0, 18.0, 1.5));
    }
}
