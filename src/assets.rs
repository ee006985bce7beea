//! Sprite texture loading.
//!
//! Textures are optional decoration. A missing or unreadable file is logged
//! as a warning and the sprite falls back to an untextured soft disc, so the
//! viewer never fails to start because of an asset.
//!
//! # Supported Formats
//!
//! - PNG (recommended)
//! - JPEG

use std::path::Path;
use tracing::{info, warn};

use crate::config::AssetConfig;
use crate::error::TextureError;

/// Decoded RGBA8 pixels ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    /// Raw RGBA pixel data (width * height * 4 bytes).
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl TextureData {
    /// Decode an image file into RGBA8.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Decode an in-memory PNG or JPEG.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TextureError> {
        let img = image::load_from_memory(bytes)?.into_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            data: img.into_raw(),
            width,
            height,
        })
    }

    /// Create a solid color texture (1x1 pixel).
    pub fn solid(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            data: vec![r, g, b, a],
            width: 1,
            height: 1,
        }
    }

    /// The stand-in bound when a sprite has no texture.
    pub fn white() -> Self {
        Self::solid(255, 255, 255, 255)
    }
}

/// Load a texture, logging and returning `None` on failure.
pub fn load_texture<P: AsRef<Path>>(path: P) -> Option<TextureData> {
    let path = path.as_ref();
    match TextureData::from_file(path) {
        Ok(texture) => {
            info!(
                width = texture.width,
                height = texture.height,
                "Loaded texture '{}'",
                path.display()
            );
            Some(texture)
        }
        Err(e) => {
            warn!("Failed to load texture '{}': {}", path.display(), e);
            None
        }
    }
}

/// Optional textures for the two sprite kinds.
#[derive(Debug, Clone, Default)]
pub struct SceneTextures {
    pub smoke: Option<TextureData>,
    /// Glow sprite for the light heads.
    pub flare: Option<TextureData>,
}

impl SceneTextures {
    /// Load every configured texture. Never fails.
    pub fn load(config: &AssetConfig) -> Self {
        Self {
            smoke: config.smoke_texture.as_deref().and_then(load_texture),
            flare: config.flare_texture.as_deref().and_then(load_texture),
        }
    }

    /// No textures at all.
    pub fn none() -> Self {
        Self::default()
    }
}
