//! Scene state and the per-frame update.
//!
//! [`Scene`] owns everything that is drawn: the camera, the glass cube, the
//! columns, the smoke field and one trail per light. Static geometry is
//! generated once in [`Scene::new`]; [`Scene::step`] advances the animated
//! parts by one frame. The scene never schedules itself; the host calls
//! `step` once per redraw.

use glam::{EulerRot, Mat4, Vec2, Vec3};
use std::f32::consts::TAU;
use tracing::info;

use crate::camera::Camera;
use crate::columns::{place_columns, ColumnLayout};
use crate::config::{CubeConfig, SceneConfig};
use crate::error::ConfigError;
use crate::mesh::Mesh;
use crate::smoke::{generate_smoke, SmokeField};
use crate::spawn::SpawnContext;
use crate::trails::LightTrail;

/// Translucent cube spinning in place above the columns.
#[derive(Debug, Clone)]
pub struct GlassCube {
    pub position: Vec3,
    pub size: f32,
    /// Rotation around X and Y in radians, kept within `[0, τ)`.
    pub rotation: Vec2,
    pub spin_per_frame: Vec2,
    pub color: Vec3,
    pub opacity: f32,
}

impl GlassCube {
    pub fn new(config: &CubeConfig) -> Self {
        Self {
            position: config.position,
            size: config.size,
            rotation: Vec2::ZERO,
            spin_per_frame: Vec2::new(config.spin_per_frame.0, config.spin_per_frame.1),
            color: config.color,
            opacity: config.opacity,
        }
    }

    /// Advance the rotation by one frame's worth of spin.
    pub fn spin(&mut self) {
        self.rotation = Vec2::new(
            (self.rotation.x + self.spin_per_frame.x).rem_euclid(TAU),
            (self.rotation.y + self.spin_per_frame.y).rem_euclid(TAU),
        );
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0)
    }

    /// The cube mesh in world space with its current rotation.
    pub fn world_mesh(&self) -> Mesh {
        let c = self.color;
        Mesh::cuboid(self.size, self.size, self.size, [c.x, c.y, c.z, self.opacity])
            .transformed(self.model_matrix())
    }
}

/// All scene state.
#[derive(Debug, Clone)]
pub struct Scene {
    config: SceneConfig,
    seed: u64,
    pub camera: Camera,
    pub cube: GlassCube,
    pub columns: ColumnLayout,
    pub smoke: SmokeField,
    pub trails: Vec<LightTrail>,
    frame: u64,
}

impl Scene {
    /// Build a scene, seeding placement from `config.seed` or fresh entropy.
    pub fn new(config: SceneConfig, aspect: f32) -> Result<Self, ConfigError> {
        let rng = SpawnContext::new(config.seed);
        Self::with_rng(config, aspect, rng)
    }

    /// Build a scene drawing every random decision from `rng`.
    pub fn with_rng(
        config: SceneConfig,
        aspect: f32,
        mut rng: SpawnContext,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(seed = rng.seed(), "Generating scene");

        let columns = place_columns(&config.columns, &mut rng);
        let smoke = generate_smoke(&config.smoke, &mut rng);
        let trails = config
            .lights
            .iter()
            .map(|light| LightTrail::new(light.clone(), &config.trails))
            .collect();

        info!(
            columns = columns.len(),
            skipped = columns.skipped.len(),
            smoke = smoke.len(),
            lights = config.lights.len(),
            "Scene ready"
        );

        Ok(Self {
            camera: Camera::new(&config.camera, aspect),
            cube: GlassCube::new(&config.cube),
            columns,
            smoke,
            trails,
            seed: rng.seed(),
            config,
            frame: 0,
        })
    }

    /// Advance one frame. `elapsed` is seconds since start, `delta` the
    /// seconds since the previous frame.
    pub fn step(&mut self, delta: f32, elapsed: f32) {
        self.camera.follow_path(elapsed);
        self.cube.spin();
        for trail in &mut self.trails {
            trail.update(delta, elapsed);
        }
        self.frame += 1;
    }

    /// Track a new surface size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
    }

    /// Current head position and color of every light.
    pub fn light_heads(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.trails.iter().map(|t| (t.head(), t.source().color))
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Seed the placement used. Logged at startup so a run can be replayed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Frames stepped so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        Scene::new(SceneConfig::default().with_seed(1), 16.0 / 9.0).expect("valid scene")
    }

    #[test]
    fn test_new_builds_static_geometry() {
        let scene = scene();
        assert!(scene.columns.len() <= 100);
        assert!(!scene.columns.is_empty());
        assert_eq!(scene.smoke.len(), 250);
        assert_eq!(scene.trails.len(), 4);
        assert!(scene.trails.iter().all(|t| t.is_empty()));
        assert_eq!(scene.seed(), 1);
    }

    #[test]
    fn test_step_advances_everything() {
        let mut scene = scene();
        scene.step(1.0 / 60.0, 1.0 / 60.0);
        assert_eq!(scene.frame(), 1);
        assert!(scene.trails.iter().all(|t| t.len() == 1));
        assert_eq!(scene.cube.rotation, Vec2::new(0.005, 0.008));
    }

    #[test]
    fn test_cube_rotation_wraps() {
        let mut cube = GlassCube::new(&CubeConfig::default());
        for _ in 0..10_000 {
            cube.spin();
        }
        assert!(cube.rotation.x >= 0.0 && cube.rotation.x < TAU);
        assert!(cube.rotation.y >= 0.0 && cube.rotation.y < TAU);
        // 10_000 * 0.005 = 50 rad
        assert!((cube.rotation.x - 50.0f32.rem_euclid(TAU)).abs() < 1e-2);
    }

    #[test]
    fn test_cube_world_mesh_centered() {
        let cube = GlassCube::new(&CubeConfig::default());
        let mesh = cube.world_mesh();
        let sum: Vec3 = mesh.vertices.iter().map(|v| Vec3::from(v.position)).sum();
        let center = sum / mesh.vertices.len() as f32;
        assert!(center.abs_diff_eq(Vec3::new(-5.0, 25.0, 10.0), 1e-4));
        assert_eq!(mesh.vertices[0].color[3], 0.25);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut scene = scene();
        scene.resize(1000, 500);
        assert_eq!(scene.camera.aspect, 2.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SceneConfig::default().with_spread_radius(-1.0);
        assert!(Scene::new(config, 1.0).is_err());
    }

    #[test]
    fn test_light_heads_follow_orbits() {
        let mut scene = scene();
        scene.step(0.5, 3.0);
        for (trail, (head, color)) in scene.trails.iter().zip(scene.light_heads()) {
            let expected = trail.source().orbit.position_at(3.0, 18.0);
            assert_eq!(head, expected);
            assert_eq!(color, trail.source().color);
        }
    }
}
