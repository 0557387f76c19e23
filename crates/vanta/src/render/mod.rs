//! GPU plumbing shared by the renderers: device/surface setup and the
//! per-frame render target.

pub mod gpu;
pub mod pass;

pub use gpu::GpuContext;
pub use pass::ClearColor;
