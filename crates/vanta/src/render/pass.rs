//! Per-frame render target.
//!
//! A [`FrameTarget`] acquires the next surface texture and a command
//! encoder. The sprite backend records its single render pass into it, then
//! [`FrameTarget::present`] submits and flips.

use crate::render::gpu::GpuContext;

/// Background color the frame is cleared to before sprites are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearColor(pub [f64; 4]);

impl Default for ClearColor {
    fn default() -> Self {
        Self([0.0, 0.0, 0.0, 1.0])
    }
}

impl From<[f64; 4]> for ClearColor {
    fn from(rgba: [f64; 4]) -> Self {
        Self(rgba)
    }
}

impl ClearColor {
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.0[0],
            g: self.0[1],
            b: self.0[2],
            a: self.0[3],
        }
    }
}

/// Surface texture plus encoder for one frame.
pub(crate) struct FrameTarget {
    pub encoder: wgpu::CommandEncoder,
    pub view: wgpu::TextureView,
    output: wgpu::SurfaceTexture,
}

impl FrameTarget {
    pub fn acquire(gpu: &GpuContext) -> Result<Self, wgpu::SurfaceError> {
        let output = gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("vanta frame encoder"),
            });
        Ok(Self {
            encoder,
            view,
            output,
        })
    }

    /// Begin the frame's render pass, clearing to `clear`.
    pub fn begin_pass(&mut self, clear: ClearColor) -> wgpu::RenderPass<'_> {
        self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("sprite pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        })
    }

    /// Submit all recorded passes and present.
    pub fn present(self, gpu: &GpuContext) {
        gpu.queue.submit(std::iter::once(self.encoder.finish()));
        self.output.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_color_converts_channels() {
        let c = ClearColor::from([0.1, 0.2, 0.3, 1.0]).to_wgpu();
        assert_eq!((c.r, c.g, c.b, c.a), (0.1, 0.2, 0.3, 1.0));
        assert_eq!(ClearColor::default().0, [0.0, 0.0, 0.0, 1.0]);
    }
}
