//! Fixed 2D camera.
//!
//! Maps pixel coordinates (origin top-left, +y down) to wgpu clip space
//! (origin center, +y up, depth in [0, 1]). The transform is an orthographic
//! projection over `[0, width] × [height, 0]` composed with a look-at view
//! from `(0, 0, 1)` toward the origin. There is no pan, zoom or rotation.

use crate::math::{Mat4, Vec3};

/// Near/far planes of the orthographic volume. The look-at view puts the
/// sprite plane at view-space z = -1, which lands at depth 0.5.
const Z_NEAR: f32 = 0.0;
const Z_FAR: f32 = 2.0;

#[derive(Debug, Clone)]
pub struct Camera {
    width: f32,
    height: f32,
    projection_view: Mat4,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            width: width as f32,
            height: height as f32,
            projection_view: Mat4::IDENTITY,
        };
        camera.update();
        camera
    }

    /// Change the viewport size. Takes effect on the next [`update`](Camera::update).
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width as f32;
        self.height = height as f32;
    }

    /// Recompute `projection × view`. Called once per frame by the renderer.
    pub fn update(&mut self) {
        let projection =
            Mat4::orthographic_rh(0.0, self.width, self.height, 0.0, Z_NEAR, Z_FAR);
        let view = Mat4::look_at_rh(Vec3::Z, Vec3::ZERO, Vec3::Y);
        self.projection_view = projection * view;
    }

    pub fn projection_view(&self) -> Mat4 {
        self.projection_view
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}
