//! Renderer and window configuration.
//!
//! [`RendererConfig`] is plain serde data. Every field has a default, so a
//! JSON file only needs to mention what it overrides:
//!
//! ```json
//! { "max_sprites_per_batch": 2000, "clear_color": [0.1, 0.0, 0.2, 1.0] }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Sprites per batch when nothing else is configured.
pub const DEFAULT_MAX_SPRITES_PER_BATCH: usize = 1000;

/// Settings for the sprite renderer and the window it draws into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Capacity of one batch. Drawing more sprites of one texture than this
    /// in a frame starts another batch (and another draw call).
    pub max_sprites_per_batch: usize,
    /// Background color the frame is cleared to, RGBA in [0, 1].
    pub clear_color: [f64; 4],
    /// Nearest-neighbour sampling for sprite textures. Fonts always use
    /// linear filtering.
    pub pixel_art_sampling: bool,
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            max_sprites_per_batch: DEFAULT_MAX_SPRITES_PER_BATCH,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            pixel_art_sampling: true,
            window_title: String::from("vanta"),
            window_width: 800,
            window_height: 600,
        }
    }
}

impl RendererConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject values the renderer can't work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_sprites_per_batch == 0 {
            return Err(ConfigError::Invalid(
                "max_sprites_per_batch must be at least 1".into(),
            ));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window_width, self.window_height
            )));
        }
        if self.clear_color.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(ConfigError::Invalid(format!(
                "clear_color components must be in [0, 1], got {:?}",
                self.clear_color
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = RendererConfig::from_json_str("{}").unwrap();
        assert_eq!(config, RendererConfig::default());
        assert_eq!(config.max_sprites_per_batch, 1000);
    }

    #[test]
    fn partial_override() {
        let config =
            RendererConfig::from_json_str(r#"{ "max_sprites_per_batch": 16, "window_title": "x" }"#)
                .unwrap();
        assert_eq!(config.max_sprites_per_batch, 16);
        assert_eq!(config.window_title, "x");
        assert_eq!(config.window_width, 800);
    }

    #[test]
    fn zero_capacity_rejected() {
        let err = RendererConfig::from_json_str(r#"{ "max_sprites_per_batch": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err}");
    }

    #[test]
    fn out_of_range_clear_color_rejected() {
        let err =
            RendererConfig::from_json_str(r#"{ "clear_color": [2.0, 0.0, 0.0, 1.0] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = RendererConfig::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = RendererConfig::load("/definitely/not/here/vanta.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
