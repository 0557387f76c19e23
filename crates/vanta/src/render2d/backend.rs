//! The seam between the batcher and a graphics API.
//!
//! [`SpriteBackend`] is everything the batching renderer needs from the GPU:
//!
//! - report how many sprites one batch may hold,
//! - upload one 4×4 projection-view transform per frame,
//! - allocate vertex buffers (each big enough for one full batch) and
//!   overwrite their contents,
//! - draw `index_count` indices from the backend's static quad index buffer
//!   with a given texture bound,
//! - submit the frame.
//!
//! The backend owns its buffers and hands out [`VertexBufferId`]s. Which
//! buffer gets reused when is decided by the renderer's [`BufferPool`], not
//! the backend.

use crate::error::RenderError;
use crate::math::Mat4;

use super::texture::Texture;
use super::vertex::SpriteVertex;

/// Opaque id of a backend-owned vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexBufferId(pub usize);

/// GPU operations used by [`SpriteRenderer`](super::SpriteRenderer).
pub trait SpriteBackend {
    /// Sprites per batch. The renderer sizes its batches from this, so it
    /// must match the quad index buffer the backend draws from.
    fn max_sprites_per_batch(&self) -> usize;

    /// Upload the shared projection-view transform.
    fn write_transform(&mut self, projection_view: &Mat4);

    /// Allocate a vertex buffer able to hold `max_sprites` quads.
    fn create_vertex_buffer(&mut self, max_sprites: usize) -> VertexBufferId;

    /// Overwrite the start of `buffer` with `vertices`.
    fn write_vertex_buffer(&mut self, buffer: VertexBufferId, vertices: &[SpriteVertex]);

    /// Record one indexed draw: bind `texture`, bind `buffer`, draw the first
    /// `index_count` indices of the quad index buffer.
    fn draw_batch(&mut self, texture: &Texture, buffer: VertexBufferId, index_count: u32);

    /// Execute everything recorded since the last submit.
    fn submit(&mut self) -> Result<(), RenderError>;
}

/// Where [`Texture`]s come from when building
/// [`Content`](crate::content::Content).
pub trait TextureSource {
    /// Decode an image file into a texture keyed by its path.
    fn load_texture(&mut self, path: &str) -> Result<Texture, RenderError>;

    /// Upload raw RGBA8 pixels under `key`. `rgba` must hold exactly
    /// `width × height × 4` bytes.
    fn create_texture(
        &mut self,
        key: &str,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<Texture, RenderError>;

    /// Like [`load_texture`](TextureSource::load_texture), but sampled with
    /// linear filtering, for font atlases.
    fn load_font_texture(&mut self, path: &str) -> Result<Texture, RenderError> {
        self.load_texture(path)
    }
}

/// Reject pixel data that does not match `width × height` RGBA8.
pub(crate) fn check_rgba_len(
    key: &str,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> Result<(), RenderError> {
    let expected = width as usize * height as usize * 4;
    if width == 0 || height == 0 || rgba.len() != expected {
        return Err(RenderError::TextureLoad {
            key: key.to_owned(),
            reason: format!(
                "expected {expected} bytes for {width}x{height} RGBA8, got {}",
                rgba.len()
            ),
        });
    }
    Ok(())
}

/// Free list of vertex buffers.
///
/// Buffers are popped at flush time and parked in `in_flight` until the
/// frame is submitted, then all go back to `free` at once. The pool never
/// shrinks.
#[derive(Debug, Default)]
pub(crate) struct BufferPool {
    free: Vec<VertexBufferId>,
    in_flight: Vec<VertexBufferId>,
    allocated: usize,
}

impl BufferPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop a pooled buffer, or allocate a new one when the pool is empty.
    pub fn acquire<B: SpriteBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        max_sprites: usize,
    ) -> VertexBufferId {
        let buffer = match self.free.pop() {
            Some(buffer) => buffer,
            None => {
                self.allocated += 1;
                log::debug!("allocating vertex buffer #{}", self.allocated);
                backend.create_vertex_buffer(max_sprites)
            }
        };
        self.in_flight.push(buffer);
        buffer
    }

    /// Return every buffer used this frame.
    pub fn release_frame(&mut self) {
        self.free.append(&mut self.in_flight);
    }

    /// Total buffers ever allocated.
    pub fn allocated(&self) -> usize {
        self.allocated
    }

    /// Buffers waiting in the pool.
    pub fn available(&self) -> usize {
        self.free.len()
    }
}


#[cfg(test)]
mod tests {
    use super::recording::RecordingBackend;
    use super::*;

    #[test]
    fn pool_allocates_only_when_empty() {
        let mut backend = RecordingBackend::new();
        let mut pool = BufferPool::new();

        let a = pool.acquire(&mut backend, 10);
        let b = pool.acquire(&mut backend, 10);
        assert_ne!(a, b, "no reuse within a frame");
        assert_eq!(pool.allocated(), 2);
        assert_eq!(pool.available(), 0);

        pool.release_frame();
        assert_eq!(pool.available(), 2);

        pool.acquire(&mut backend, 10);
        pool.acquire(&mut backend, 10);
        assert_eq!(pool.allocated(), 2);
        pool.acquire(&mut backend, 10);
        assert_eq!(pool.allocated(), 3);
        assert_eq!(backend.buffers.len(), 3);
    }

    #[test]
    fn rgba_length_is_checked() {
        assert!(check_rgba_len("a", 2, 2, &[0; 16]).is_ok());
        assert!(check_rgba_len("a", 2, 2, &[0; 12]).is_err());
        assert!(check_rgba_len("a", 0, 0, &[]).is_err());
    }
}
