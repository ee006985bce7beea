//! Camera on a fixed circular path.

use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// Perspective camera circling the Y axis and always looking at `target`.
///
/// The position is a pure function of elapsed time:
/// `(R cos(ωt), height, R sin(ωt))`.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Radius of the circular path.
    pub path_radius: f32,
    /// Radians per second along the path.
    pub angular_speed: f32,
    pub height: f32,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    position: Vec3,
}

impl Camera {
    /// Create a camera at the start of its path.
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self {
            path_radius: config.path_radius,
            angular_speed: config.angular_speed,
            height: config.height,
            target: Vec3::ZERO,
            fov_y: config.fov_y_degrees.to_radians(),
            aspect: if aspect > 0.0 { aspect } else { 1.0 },
            near: config.near,
            far: config.far,
            position: Vec3::ZERO,
        };
        camera.follow_path(0.0);
        camera
    }

    /// Point on the path at `elapsed` seconds.
    pub fn path_position(&self, elapsed: f32) -> Vec3 {
        let angle = self.angular_speed * elapsed;
        Vec3::new(
            self.path_radius * angle.cos(),
            self.height,
            self.path_radius * angle.sin(),
        )
    }

    /// Move to the path position for `elapsed` seconds.
    pub fn follow_path(&mut self, elapsed: f32) {
        self.position = self.path_position(elapsed);
    }

    /// Current world position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Update the aspect ratio from a surface size. Zero sizes are ignored,
    /// which happens while a window is minimized.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Projection times view.
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraConfig::default(), 16.0 / 9.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_path() {
        let camera = Camera::default();
        assert_eq!(camera.position(), Vec3::new(10.0, 60.0, 0.0));
    }

    #[test]
    fn test_path_stays_on_circle() {
        let mut camera = Camera::default();
        for i in 0..500 {
            let t = i as f32 * 0.37;
            camera.follow_path(t);
            let p = camera.position();
            assert!((p.y - 60.0).abs() < 1e-6);
            assert!(((p.x * p.x + p.z * p.z).sqrt() - 10.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_quarter_turn() {
        let camera = Camera::default();
        let t = std::f32::consts::FRAC_PI_2 / 0.04;
        let p = camera.path_position(t);
        assert!(p.x.abs() < 1e-3);
        assert!((p.z - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_set_aspect_ignores_zero() {
        let mut camera = Camera::default();
        camera.set_aspect(800, 400);
        assert_eq!(camera.aspect, 2.0);
        camera.set_aspect(0, 400);
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let mut camera = Camera::default();
        camera.follow_path(12.0);
        let clip = camera.view_projection() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
