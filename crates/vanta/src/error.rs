//! Error types.
//!
//! Three families, split by *when* they happen:
//!
//! - [`RenderError`]: GPU setup at startup, and per-frame submission.
//! - [`ContentError`]: loading textures, sprite sheets and fonts.
//! - [`ConfigError`]: reading and validating [`RendererConfig`](crate::config::RendererConfig).
//!
//! [`AppError`] wraps all three for [`App::run`](crate::app::App::run),
//! which can fail in any of them during startup.
//!
//! Startup failures abort [`App::run`](crate::app::App::run). Per-frame
//! failures come back from [`SpriteRenderer::end_frame`](crate::render2d::SpriteRenderer::end_frame)
//! and the game loop logs them and keeps going.

use std::fmt;
use std::io;

// ── RenderError ─────────────────────────────────────────────────────────

/// Errors raised by the GPU layer.
#[derive(Debug)]
pub enum RenderError {
    /// The event loop or window could not be created.
    Window(String),
    /// Creating the wgpu surface for the window failed.
    SurfaceCreate(String),
    /// No adapter compatible with the surface.
    AdapterRequest(String),
    /// The adapter refused to hand out a device.
    DeviceRequest(String),
    /// Acquiring or presenting the surface texture failed.
    Surface(wgpu::SurfaceError),
    /// An image could not be read or decoded.
    TextureLoad { key: String, reason: String },
    /// Shader compilation or pipeline validation failed.
    PipelineBuild(String),
    /// `end_frame` without a preceding `begin_frame`.
    FrameNotActive,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Window(e) => write!(f, "window creation failed: {e}"),
            RenderError::SurfaceCreate(e) => write!(f, "surface creation failed: {e}"),
            RenderError::AdapterRequest(e) => write!(f, "no suitable GPU adapter: {e}"),
            RenderError::DeviceRequest(e) => write!(f, "GPU device request failed: {e}"),
            RenderError::Surface(e) => write!(f, "surface error: {e}"),
            RenderError::TextureLoad { key, reason } => {
                write!(f, "failed to load texture '{key}': {reason}")
            }
            RenderError::PipelineBuild(e) => write!(f, "sprite pipeline build failed: {e}"),
            RenderError::FrameNotActive => {
                write!(f, "end_frame called without a matching begin_frame")
            }
        }
    }
}

impl std::error::Error for RenderError {}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(e: wgpu::SurfaceError) -> Self {
        RenderError::Surface(e)
    }
}

// ── ContentError ────────────────────────────────────────────────────────

/// Errors raised while building a [`Content`](crate::content::Content) registry.
#[derive(Debug)]
pub enum ContentError {
    /// A manifest file could not be read.
    Io { path: String, source: io::Error },
    /// A manifest is not well-formed XML.
    Xml(String),
    /// A required element is absent, e.g. `<common>` in a BMFont file.
    MissingElement(&'static str),
    /// A required attribute is absent on an element.
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    /// An attribute that must be numeric isn't.
    InvalidNumber {
        attribute: &'static str,
        value: String,
    },
    /// A sprite sheet references a texture name that was never loaded.
    UnknownTexture(String),
    /// A named sprite or font is not in the registry.
    MissingAsset { kind: &'static str, name: String },
    /// Texture creation failed.
    Render(RenderError),
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::Io { path, source } => write!(f, "failed to read '{path}': {source}"),
            ContentError::Xml(e) => write!(f, "malformed XML: {e}"),
            ContentError::MissingElement(name) => write!(f, "missing <{name}> element"),
            ContentError::MissingAttribute { element, attribute } => {
                write!(f, "<{element}> is missing attribute '{attribute}'")
            }
            ContentError::InvalidNumber { attribute, value } => {
                write!(f, "attribute '{attribute}' is not a number: '{value}'")
            }
            ContentError::UnknownTexture(name) => write!(f, "unknown texture '{name}'"),
            ContentError::MissingAsset { kind, name } => write!(f, "no {kind} named '{name}'"),
            ContentError::Render(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContentError::Io { source, .. } => Some(source),
            ContentError::Render(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderError> for ContentError {
    fn from(e: RenderError) -> Self {
        ContentError::Render(e)
    }
}

impl From<roxmltree::Error> for ContentError {
    fn from(e: roxmltree::Error) -> Self {
        ContentError::Xml(e.to_string())
    }
}

// ── ConfigError ─────────────────────────────────────────────────────────

/// Errors raised while loading a [`RendererConfig`](crate::config::RendererConfig).
#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(serde_json::Error),
    /// The file parsed but a value is out of range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {e}"),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {e}"),
            ConfigError::Invalid(e) => write!(f, "invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

// ── AppError ────────────────────────────────────────────────────────────

/// Startup failure of the game loop.
#[derive(Debug)]
pub enum AppError {
    Render(RenderError),
    Content(ContentError),
    Config(ConfigError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Render(e) => write!(f, "{e}"),
            AppError::Content(e) => write!(f, "content loading failed: {e}"),
            AppError::Config(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Render(e) => Some(e),
            AppError::Content(e) => Some(e),
            AppError::Config(e) => Some(e),
        }
    }
}

impl From<RenderError> for AppError {
    fn from(e: RenderError) -> Self {
        AppError::Render(e)
    }
}

impl From<ContentError> for AppError {
    fn from(e: ContentError) -> Self {
        AppError::Content(e)
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn content_error_chains_to_render_error() {
        let err = ContentError::from(RenderError::TextureLoad {
            key: "ship.png".into(),
            reason: "truncated".into(),
        });
        assert_eq!(err.to_string(), "failed to load texture 'ship.png': truncated");
        assert!(err.source().is_some());
    }

    #[test]
    fn missing_attribute_message() {
        let err = ContentError::MissingAttribute {
            element: "char",
            attribute: "xadvance",
        };
        assert_eq!(err.to_string(), "<char> is missing attribute 'xadvance'");
    }

    #[test]
    fn app_error_wraps_both_families() {
        let err = AppError::from(RenderError::FrameNotActive);
        assert!(matches!(err, AppError::Render(RenderError::FrameNotActive)));
        let err = AppError::from(ContentError::UnknownTexture("sheet".into()));
        assert_eq!(err.to_string(), "content loading failed: unknown texture 'sheet'");
        let err = AppError::from(ConfigError::Invalid("zero".into()));
        assert!(matches!(err, AppError::Config(ConfigError::Invalid(_))));
    }
}
