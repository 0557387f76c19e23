//! # WgpuBackend — Sprite Batches on a Real GPU
//!
//! Implements [`SpriteBackend`] on top of wgpu.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ WgpuBackend                                                  │
//! │                                                              │
//! │  SpritePipeline   one pipeline, camera uniform (group 0)     │
//! │  TextureStore     texture + sampler bind group per texture   │
//! │                   (group 1)                                  │
//! │  index buffer     static, max_sprites × 6 u32 indices        │
//! │  vertex buffers   grown on request, reused via the pool      │
//! │  commands         draws recorded during end_frame            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Vertex data is uploaded with `queue.write_buffer` as each batch is
//! flushed. The actual render pass is only encoded in [`submit`], which
//! replays the recorded draws into one pass:
//!
//! ```text
//! set_pipeline, set_bind_group(0, camera), set_index_buffer
//! for each draw:
//!     set_bind_group(1, texture)
//!     set_vertex_buffer(0, buffer)
//!     draw_indexed(0..count, 0, 0..1)
//! ```
//!
//! Because the index buffer is shared, one quad's indices are always
//! `4k + [0, 1, 2, 2, 3, 0]` regardless of which vertex buffer is bound.
//!
//! [`submit`]: SpriteBackend::submit

use std::path::Path;

use wgpu::util::DeviceExt;

use crate::config::RendererConfig;
use crate::error::RenderError;
use crate::math::Mat4;
use crate::render::GpuContext;
use crate::render::pass::{ClearColor, FrameTarget};

use super::backend::{SpriteBackend, TextureSource, VertexBufferId, check_rgba_len};
use super::pipeline::SpritePipeline;
use super::texture::{Sampling, Texture, TextureHandle, TextureStore};
use super::vertex::{SpriteVertex, VERTICES_PER_SPRITE, quad_indices};

/// One draw recorded between flush and submit.
#[derive(Debug, Clone, Copy)]
struct DrawCommand {
    texture: TextureHandle,
    buffer: VertexBufferId,
    index_count: u32,
}

/// wgpu implementation of [`SpriteBackend`] and [`TextureSource`].
pub struct WgpuBackend {
    gpu: GpuContext,
    pipeline: SpritePipeline,
    textures: TextureStore,
    vertex_buffers: Vec<wgpu::Buffer>,
    index_buffer: wgpu::Buffer,
    commands: Vec<DrawCommand>,
    clear_color: ClearColor,
    max_sprites_per_batch: usize,
}

impl WgpuBackend {
    /// Build the pipeline, the default white texture and the static index
    /// buffer.
    pub fn new(gpu: GpuContext, config: &RendererConfig) -> Result<Self, RenderError> {
        let pipeline = SpritePipeline::new(&gpu, config.pixel_art_sampling)?;
        let textures = TextureStore::new(&gpu, &pipeline);

        let indices = quad_indices(config.max_sprites_per_batch);
        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("sprite index buffer"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        log::info!(
            "sprite backend ready: {} indices for {} sprites per batch",
            indices.len(),
            config.max_sprites_per_batch
        );

        Ok(Self {
            gpu,
            pipeline,
            textures,
            vertex_buffers: Vec::new(),
            index_buffer,
            commands: Vec::new(),
            clear_color: ClearColor::from(config.clear_color),
            max_sprites_per_batch: config.max_sprites_per_batch,
        })
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    /// Reconfigure the surface for a new window size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    /// The built-in 1x1 white texture, for solid-color rectangles.
    pub fn white_texture(&self) -> Texture {
        self.textures.white()
    }

    pub fn set_clear_color(&mut self, color: ClearColor) {
        self.clear_color = color;
    }

    /// Textures uploaded so far, the white default included.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

impl SpriteBackend for WgpuBackend {
    fn max_sprites_per_batch(&self) -> usize {
        self.max_sprites_per_batch
    }

    fn write_transform(&mut self, projection_view: &Mat4) {
        self.pipeline.write_camera(&self.gpu, projection_view);
    }

    fn create_vertex_buffer(&mut self, max_sprites: usize) -> VertexBufferId {
        let size = max_sprites * VERTICES_PER_SPRITE * std::mem::size_of::<SpriteVertex>();
        let buffer = self.gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sprite vertex buffer"),
            size: size as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        self.vertex_buffers.push(buffer);
        VertexBufferId(self.vertex_buffers.len() - 1)
    }

    fn write_vertex_buffer(&mut self, buffer: VertexBufferId, vertices: &[SpriteVertex]) {
        self.gpu.queue.write_buffer(
            &self.vertex_buffers[buffer.0],
            0,
            bytemuck::cast_slice(vertices),
        );
    }

    fn draw_batch(&mut self, texture: &Texture, buffer: VertexBufferId, index_count: u32) {
        self.commands.push(DrawCommand {
            texture: texture.handle(),
            buffer,
            index_count,
        });
    }

    fn submit(&mut self) -> Result<(), RenderError> {
        let commands = std::mem::take(&mut self.commands);

        let mut frame = match FrameTarget::acquire(&self.gpu) {
            Ok(frame) => frame,
            Err(e) => {
                // Lost/outdated surfaces come back on the next frame.
                if matches!(e, wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) {
                    self.gpu.reconfigure();
                }
                return Err(e.into());
            }
        };

        {
            let mut pass = frame.begin_pass(self.clear_color);
            pass.set_pipeline(&self.pipeline.pipeline);
            pass.set_bind_group(0, &self.pipeline.camera_bind_group, &[]);
            pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            for command in &commands {
                let Some(entry) = self.textures.get(command.texture) else {
                    log::warn!("draw skipped, unknown texture {:?}", command.texture);
                    continue;
                };
                pass.set_bind_group(1, &entry.bind_group, &[]);
                pass.set_vertex_buffer(0, self.vertex_buffers[command.buffer.0].slice(..));
                pass.draw_indexed(0..command.index_count, 0, 0..1);
            }
        }

        frame.present(&self.gpu);
        Ok(())
    }
}

impl TextureSource for WgpuBackend {
    fn load_texture(&mut self, path: &str) -> Result<Texture, RenderError> {
        self.textures
            .load(&self.gpu, &self.pipeline, Path::new(path), Sampling::Sprite)
    }

    fn create_texture(
        &mut self,
        key: &str,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<Texture, RenderError> {
        check_rgba_len(key, width, height, rgba)?;
        Ok(self.textures.create_from_rgba(
            &self.gpu,
            &self.pipeline,
            key,
            width,
            height,
            rgba,
            Sampling::Sprite,
        ))
    }

    fn load_font_texture(&mut self, path: &str) -> Result<Texture, RenderError> {
        self.textures
            .load(&self.gpu, &self.pipeline, Path::new(path), Sampling::Linear)
    }
}
