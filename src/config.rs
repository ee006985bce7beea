//! Scene configuration.
//!
//! Every tunable constant of the scene lives here. A [`SceneConfig`] can be
//! built in code with the `with_*` methods or loaded from JSON; missing JSON
//! fields fall back to the stock values.
//!
//! ```ignore
//! let config = SceneConfig::default()
//!     .with_seed(7)
//!     .with_column_count(60)
//!     .with_spread_radius(40.0);
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::color::hex;
use crate::error::ConfigError;
use crate::orbit::{default_light_sources, LightSource, BASE_LIGHT_HEIGHT};

/// Column placement parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// How many columns to attempt.
    pub num_columns: usize,
    /// Radius of the disk the columns must stay inside.
    pub spread_radius: f32,
    /// Minimum center-to-center distance between two columns.
    pub min_distance: f32,
    /// Attempts per column before it is skipped.
    pub max_placement_attempts: u32,
    /// Height range `[min, max)`.
    pub height_range: (f32, f32),
    /// Base edge length range `[min, max)`.
    pub size_range: (f32, f32),
    pub bottom_color: Vec3,
    pub top_color: Vec3,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            num_columns: 100,
            spread_radius: 55.0,
            min_distance: 3.0,
            max_placement_attempts: 100,
            height_range: (1.0, 16.0),
            size_range: (1.0, 3.0),
            bottom_color: hex(0x202020),
            top_color: hex(0xffffff),
        }
    }
}

/// Smoke point cloud parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokeConfig {
    pub num_particles: usize,
    /// Half-width of the box on X and Z.
    pub spread: f32,
    /// Height range `[min, max)`.
    pub height_range: (f32, f32),
    pub color: Vec3,
    /// Sprite size, in the same units as the light heads.
    pub size: f32,
    pub opacity: f32,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            num_particles: 250,
            spread: 55.0,
            height_range: (1.0, 13.0),
            color: hex(0x3366aa),
            size: 30.0,
            opacity: 0.2,
        }
    }
}

/// Light trail parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Maximum number of recorded points per trail.
    pub max_points: usize,
    /// Seconds after which a recorded point is no longer drawn.
    pub fade_duration: f32,
    pub base_light_height: f32,
    /// Sprite size of the glowing light heads.
    pub head_size: f32,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            max_points: crate::trails::TRAIL_MAX_POINTS,
            fade_duration: crate::trails::FADE_DURATION,
            base_light_height: BASE_LIGHT_HEIGHT,
            head_size: 2.5,
        }
    }
}

/// Camera path and projection parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Radius of the circular path around the Y axis.
    pub path_radius: f32,
    /// Angular speed along the path, radians per second.
    pub angular_speed: f32,
    pub height: f32,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            path_radius: 10.0,
            angular_speed: 0.04,
            height: 60.0,
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// The glass cube floating above the columns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubeConfig {
    pub position: Vec3,
    pub size: f32,
    /// Rotation added every frame, radians, around X and Y.
    pub spin_per_frame: (f32, f32),
    pub color: Vec3,
    pub opacity: f32,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(-5.0, 25.0, 10.0),
            size: 5.0,
            spin_per_frame: (0.005, 0.008),
            color: Vec3::ONE,
            opacity: 0.25,
        }
    }
}

/// Background, fog and lights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub background: Vec3,
    pub fog_color: Vec3,
    /// Density of the exponential-squared fog.
    pub fog_density: f32,
    pub ambient_color: Vec3,
    pub ambient_intensity: f32,
    pub directional_color: Vec3,
    pub directional_intensity: f32,
    /// The directional light shines from here towards the origin.
    pub directional_position: Vec3,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            background: Vec3::ZERO,
            fog_color: hex(0x0a0a2a),
            fog_density: 0.015,
            ambient_color: hex(0xaaaaaa),
            ambient_intensity: 1.5,
            directional_color: Vec3::ONE,
            directional_intensity: 0.8,
            directional_position: Vec3::new(10.0, 50.0, 10.0),
        }
    }
}

/// Optional sprite textures. Missing files are tolerated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub smoke_texture: Option<PathBuf>,
    pub flare_texture: Option<PathBuf>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            smoke_texture: Some(PathBuf::from("smoke.png")),
            flare_texture: Some(PathBuf::from("flare.png")),
        }
    }
}

/// Intro overlay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    pub enabled: bool,
    /// Text revealed during the intro.
    pub text: String,
    /// Sound started with the overlay fade. Missing files only warn.
    pub audio: Option<PathBuf>,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            text: "Nocturne".to_string(),
            audio: Some(PathBuf::from("intro.mp3")),
        }
    }
}

/// Complete scene configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for procedural placement. `None` picks a fresh one per run.
    pub seed: Option<u64>,
    pub columns: ColumnConfig,
    pub smoke: SmokeConfig,
    pub trails: TrailConfig,
    pub lights: Vec<LightSource>,
    pub camera: CameraConfig,
    pub cube: CubeConfig,
    pub lighting: LightingConfig,
    pub assets: AssetConfig,
    pub intro: IntroConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: None,
            columns: ColumnConfig::default(),
            smoke: SmokeConfig::default(),
            trails: TrailConfig::default(),
            lights: default_light_sources(),
            camera: CameraConfig::default(),
            cube: CubeConfig::default(),
            lighting: LightingConfig::default(),
            assets: AssetConfig::default(),
            intro: IntroConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Load a configuration from a JSON file and validate it.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Parse a configuration from JSON text and validate it.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the generators cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let columns = &self.columns;
        if !(columns.spread_radius > 0.0) {
            return Err(ConfigError::Invalid("columns.spread_radius must be positive"));
        }
        if !(self.smoke.spread > 0.0) {
            return Err(ConfigError::Invalid("smoke.spread must be positive"));
        }
        if columns.min_distance < 0.0 {
            return Err(ConfigError::Invalid("columns.min_distance must not be negative"));
        }
        if columns.max_placement_attempts == 0 {
            return Err(ConfigError::Invalid("columns.max_placement_attempts must be at least 1"));
        }
        if columns.height_range.0 > columns.height_range.1 || columns.height_range.0 <= 0.0 {
            return Err(ConfigError::Invalid("columns.height_range must be positive and ordered"));
        }
        if columns.size_range.0 > columns.size_range.1 || columns.size_range.0 <= 0.0 {
            return Err(ConfigError::Invalid("columns.size_range must be positive and ordered"));
        }
        if columns.size_range.1 / 2.0 >= columns.spread_radius {
            return Err(ConfigError::Invalid("columns.size_range does not fit inside spread_radius"));
        }
        if self.smoke.height_range.0 > self.smoke.height_range.1 {
            return Err(ConfigError::Invalid("smoke.height_range must be ordered"));
        }
        if self.trails.max_points == 0 {
            return Err(ConfigError::Invalid("trails.max_points must be at least 1"));
        }
        if !(self.trails.fade_duration > 0.0) {
            return Err(ConfigError::Invalid("trails.fade_duration must be positive"));
        }
        if !(self.camera.near > 0.0 && self.camera.far > self.camera.near) {
            return Err(ConfigError::Invalid("camera.near/far must satisfy 0 < near < far"));
        }
        Ok(())
    }

    /// Fix the placement seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set how many columns to attempt.
    pub fn with_column_count(mut self, count: usize) -> Self {
        self.columns.num_columns = count;
        self
    }

    /// Set the radius shared by the column disk and the smoke box.
    pub fn with_spread_radius(mut self, radius: f32) -> Self {
        self.columns.spread_radius = radius;
        self.smoke.spread = radius;
        self
    }

    /// Set the minimum center-to-center column distance.
    pub fn with_min_column_distance(mut self, distance: f32) -> Self {
        self.columns.min_distance = distance;
        self
    }

    /// Set the number of smoke particles.
    pub fn with_smoke_count(mut self, count: usize) -> Self {
        self.smoke.num_particles = count;
        self
    }

    /// Replace the light sources.
    pub fn with_lights(mut self, lights: Vec<LightSource>) -> Self {
        self.lights = lights;
        self
    }

    /// Enable or disable the intro overlay.
    pub fn with_intro(mut self, enabled: bool) -> Self {
        self.intro.enabled = enabled;
        self
    }

    /// Set the intro sound, or `None` for a silent intro.
    pub fn with_intro_audio(mut self, audio: Option<PathBuf>) -> Self {
        self.intro.audio = audio;
        self
    }

    /// Replace the sprite texture paths.
    pub fn with_assets(mut self, assets: AssetConfig) -> Self {
        self.assets = assets;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_values() {
        let config = SceneConfig::default();
        assert_eq!(config.columns.num_columns, 100);
        assert_eq!(config.columns.spread_radius, 55.0);
        assert_eq!(config.columns.min_distance, 3.0);
        assert_eq!(config.columns.max_placement_attempts, 100);
        assert_eq!(config.smoke.num_particles, 250);
        assert_eq!(config.trails.max_points, 150);
        assert_eq!(config.trails.fade_duration, 1.5);
        assert_eq!(config.lights.len(), 4);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SceneConfig::from_json_str(r#"{ "seed": 5, "columns": { "num_columns": 12 } }"#)
            .expect("valid config");
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.columns.num_columns, 12);
        assert_eq!(config.columns.spread_radius, 55.0);
        assert_eq!(config.smoke.num_particles, 250);
    }

    #[test]
    fn test_json_round_trip() {
        let config = SceneConfig::default().with_seed(11).with_column_count(3);
        let json = config.to_json().expect("serializes");
        let back = SceneConfig::from_json_str(&json).expect("parses");
        assert_eq!(back, config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = SceneConfig::default().with_spread_radius(0.0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = SceneConfig::default();
        config.columns.max_placement_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = SceneConfig::default();
        config.trails.fade_duration = 0.0;
        assert!(config.validate().is_err());

        // A negative box would collapse every smoke point onto one corner
        let mut config = SceneConfig::default();
        config.smoke.spread = -20.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = SceneConfig::default();
        config.smoke.spread = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builders() {
        let assets = AssetConfig {
            smoke_texture: None,
            flare_texture: Some(PathBuf::from("glow.png")),
        };
        let config = SceneConfig::default()
            .with_smoke_count(12)
            .with_assets(assets.clone())
            .with_intro_audio(None);
        assert_eq!(config.smoke.num_particles, 12);
        assert_eq!(config.assets, assets);
        assert_eq!(config.intro.audio, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_intro_audio_default_and_json() {
        assert_eq!(
            SceneConfig::default().intro.audio,
            Some(PathBuf::from("intro.mp3"))
        );
        let config = SceneConfig::from_json_str(r#"{ "intro": { "audio": "sounds/night.ogg" } }"#)
            .expect("valid config");
        assert_eq!(config.intro.audio, Some(PathBuf::from("sounds/night.ogg")));
        assert!(config.intro.enabled);

        let config = SceneConfig::from_json_str(r#"{ "intro": { "audio": null } }"#)
            .expect("valid config");
        assert_eq!(config.intro.audio, None);
    }

    #[test]
    fn test_malformed_json() {
        let err = SceneConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_spread_radius_shared() {
        let config = SceneConfig::default().with_spread_radius(30.0);
        assert_eq!(config.columns.spread_radius, 30.0);
        assert_eq!(config.smoke.spread, 30.0);
    }
}
