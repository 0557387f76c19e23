//! # Texture — Image Data on the GPU
//!
//! Game code never touches a `wgpu::Texture` directly. It holds a
//! [`Texture`]: a cheap, clonable descriptor carrying the texture's pixel
//! size, its string key (source path or explicit id) and a small integer
//! [`TextureHandle`]. The handle is what the batcher keys on.
//!
//! ```text
//! TextureStore (wgpu side)
//! ┌───────────────────────────────────────────────┐
//! │ entries: Vec<TextureEntry>                    │
//! │   [0] 1x1 white (default)   ◄── always here   │
//! │   [1] "assets/player.png"                     │
//! │   [2] "assets/sheet.png"                      │
//! │   ...                                         │
//! │                                               │
//! │ cache: (key, sampling) → Texture              │
//! │   ("assets/player.png", Sprite) → Handle(1)   │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## The 1x1 White Default Texture
//!
//! Entry 0 is a single white pixel. Drawing it stretched over a rect with a
//! tint gives a solid-colored rectangle through the same `texture × tint`
//! path as every other sprite.
//!
//! ## Deduplication
//!
//! Textures are cached by key and sampling mode. Loading the same path twice
//! returns the same handle without a second upload. Loading it once as a
//! sprite and once as a font atlas uploads it twice, because the two need
//! different samplers in their bind groups.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::error::RenderError;
use crate::render::GpuContext;

use super::pipeline::SpritePipeline;

/// Index of a texture in its backend's store. Small and dense, so the batcher
/// can key a `Vec` on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub(crate) usize);

impl TextureHandle {
    /// For custom [`SpriteBackend`](super::SpriteBackend)s that hand out their
    /// own handles. Keep them dense: the batcher allocates a slot per index.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

/// A GPU-resident image as seen by game code. Immutable, cheap to clone.
#[derive(Debug, Clone)]
pub struct Texture {
    handle: TextureHandle,
    key: Arc<str>,
    width: u32,
    height: u32,
}

impl Texture {
    pub fn new(handle: TextureHandle, key: impl Into<Arc<str>>, width: u32, height: u32) -> Self {
        Self {
            handle,
            key: key.into(),
            width,
            height,
        }
    }

    pub fn handle(&self) -> TextureHandle {
        self.handle
    }

    /// Source path or explicit id this texture was created under.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl PartialEq for Texture {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for Texture {}

/// Internal entry for a loaded GPU texture.
pub(crate) struct TextureEntry {
    pub bind_group: wgpu::BindGroup,
}

/// Sampling used when a texture is uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Sampling {
    /// The renderer-wide sprite sampler (nearest or linear per config).
    Sprite,
    /// Always linear, for font atlases.
    Linear,
}

/// Uploaded textures by key and sampling mode.
#[derive(Debug, Default)]
struct TextureCache {
    textures: HashMap<(String, Sampling), Texture>,
}

impl TextureCache {
    fn get(&self, key: &str, sampling: Sampling) -> Option<&Texture> {
        self.textures.get(&(key.to_owned(), sampling))
    }

    fn insert(&mut self, key: &str, sampling: Sampling, texture: Texture) {
        if let Some(other) = self.textures.keys().find(|(k, s)| k == key && *s != sampling) {
            log::debug!(
                "texture '{key}' uploaded again with {sampling:?} sampling (already {:?})",
                other.1
            );
        }
        self.textures.insert((key.to_owned(), sampling), texture);
    }
}

/// Stores all loaded GPU textures and their bind groups.
pub(crate) struct TextureStore {
    entries: Vec<TextureEntry>,
    cache: TextureCache,
}

impl TextureStore {
    /// Key of the built-in 1x1 white texture.
    pub const WHITE_KEY: &'static str = "vanta:white";

    /// Create a new store with a 1x1 white default texture at index 0.
    pub fn new(gpu: &GpuContext, pipeline: &SpritePipeline) -> Self {
        let mut store = Self {
            entries: Vec::new(),
            cache: TextureCache::default(),
        };
        store.create_from_rgba(
            gpu,
            pipeline,
            Self::WHITE_KEY,
            1,
            1,
            &[255u8, 255, 255, 255],
            Sampling::Sprite,
        );
        store
    }

    /// The default 1x1 white texture.
    pub fn white(&self) -> Texture {
        Texture::new(TextureHandle(0), Self::WHITE_KEY, 1, 1)
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&TextureEntry> {
        self.entries.get(handle.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Upload raw RGBA8 pixels under `key`. A key already loaded with the
    /// same sampling returns the existing texture untouched.
    pub fn create_from_rgba(
        &mut self,
        gpu: &GpuContext,
        pipeline: &SpritePipeline,
        key: &str,
        width: u32,
        height: u32,
        data: &[u8],
        sampling: Sampling,
    ) -> Texture {
        if let Some(texture) = self.cache.get(key, sampling) {
            return texture.clone();
        }

        let texture = gpu.device.create_texture_with_data(
            &gpu.queue,
            &wgpu::TextureDescriptor {
                label: Some(key),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = match sampling {
            Sampling::Sprite => &pipeline.sampler,
            Sampling::Linear => &pipeline.linear_sampler,
        };
        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(key),
            layout: &pipeline.texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        let handle = TextureHandle(self.entries.len());
        self.entries.push(TextureEntry { bind_group });

        let texture = Texture::new(handle, key, width, height);
        self.cache.insert(key, sampling, texture.clone());
        log::debug!("texture '{key}' uploaded as {handle:?} ({width}x{height})");
        texture
    }

    /// Decode an image file and upload it, keyed by its path.
    pub fn load(
        &mut self,
        gpu: &GpuContext,
        pipeline: &SpritePipeline,
        path: &Path,
        sampling: Sampling,
    ) -> Result<Texture, RenderError> {
        let key = path.to_string_lossy();
        if let Some(texture) = self.cache.get(&key, sampling) {
            return Ok(texture.clone());
        }

        let img = image::open(path)
            .map_err(|e| {
                log::error!("Failed to load image {key}: {e}");
                RenderError::TextureLoad {
                    key: key.to_string(),
                    reason: e.to_string(),
                }
            })?
            .to_rgba8();
        let (width, height) = img.dimensions();

        Ok(self.create_from_rgba(gpu, pipeline, &key, width, height, img.as_raw(), sampling))
    }
}
