//! # Nocturne
//!
//! A decorative night scene rendered with wgpu: a spinning glass cube above a
//! field of procedurally placed columns, a drifting smoke cloud, and four
//! lights on looping orbits, each dragging a fading ribbon of color.
//!
//! ## Quick Start
//!
//! ```ignore
//! use nocturne::prelude::*;
//!
//! fn main() -> Result<(), ViewerError> {
//!     Viewer::new(SceneConfig::default().with_seed(42)).run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Static geometry
//!
//! Columns and smoke are generated once when the [`Scene`] is built. Column
//! placement is bounded rejection sampling over a disk (see [`columns`]);
//! every random decision goes through a [`SpawnContext`], so the same seed
//! always yields the same scene.
//!
//! ### Animation
//!
//! [`Scene::step`] advances one frame: the camera moves along its circle,
//! the cube spins, and every [`LightTrail`] records its light's new position
//! and ages the old ones. Trail points older than
//! [`FADE_DURATION`](trails::FADE_DURATION) are not drawn.
//!
//! ```ignore
//! let mut scene = Scene::new(SceneConfig::default().with_seed(1), 16.0 / 9.0)?;
//! let mut time = Time::fixed(1.0 / 60.0);
//! for _ in 0..120 {
//!     let (elapsed, delta) = time.update();
//!     scene.step(delta, elapsed);
//! }
//! ```
//!
//! ### Intro
//!
//! The viewer opens on a black overlay that fades out, then shows the intro
//! text over the scene. See [`intro`] for the timeline. Building with the
//! `audio` feature plays the intro sound through [`audio`].
//!
//! ## Feature Overview
//!
//! | Module | Purpose |
//! |----------|-------|
//! | [`orbit`] | Light sources and their periodic paths |
//! | [`columns`] | Column placement |
//! | [`smoke`] | Smoke point cloud |
//! | [`trails`] | Fading light trails |
//! | [`camera`] | Camera on a circular path |
//! | [`config`] | Every tunable constant, JSON loading |
//! | [`gpu`] | wgpu renderer |

pub mod app;
pub mod assets;
pub mod audio;
pub mod camera;
pub mod color;
pub mod columns;
pub mod config;
pub mod error;
pub mod gpu;
pub mod intro;
pub mod mesh;
pub mod orbit;
pub mod scene;
pub mod smoke;
pub mod spawn;
pub mod text;
pub mod time;
pub mod trails;

pub use bytemuck;
pub use glam::{Vec2, Vec3, Vec4};

pub use app::Viewer;
pub use assets::{load_texture, SceneTextures, TextureData};
pub use audio::load_intro_audio;
#[cfg(feature = "audio")]
pub use audio::FileAudio;
pub use camera::Camera;
pub use columns::{place_columns, Column, ColumnFootprint, ColumnLayout};
pub use config::{
    AssetConfig, CameraConfig, ColumnConfig, CubeConfig, IntroConfig, LightingConfig, SceneConfig,
    SmokeConfig, TrailConfig,
};
pub use error::{AudioError, ConfigError, GpuError, TextureError, ViewerError};
pub use intro::{IntroAudio, IntroEvent, IntroSequence, IntroTimeline, NoAudio};
pub use mesh::{Mesh, MeshVertex};
pub use orbit::{default_light_sources, LightSource, OrbitParams, BASE_LIGHT_HEIGHT};
pub use scene::{GlassCube, Scene};
pub use smoke::{generate_smoke, SmokeField};
pub use spawn::SpawnContext;
pub use text::rasterize_text;
pub use time::Time;
pub use trails::{LightTrail, TrailVertex, FADE_DURATION, TRAIL_MAX_POINTS};

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use nocturne::prelude::*;
/// ```
pub mod prelude {
    pub use crate::app::Viewer;
    pub use crate::config::SceneConfig;
    pub use crate::error::ViewerError;
    pub use crate::intro::{IntroAudio, NoAudio};
    pub use crate::orbit::{LightSource, OrbitParams};
    pub use crate::scene::Scene;
    pub use crate::spawn::SpawnContext;
    pub use crate::time::Time;
    pub use crate::trails::LightTrail;
    pub use crate::{Vec2, Vec3, Vec4};
}
