mod buffers;
mod canvas;
mod context;
mod render;

pub use buffers::{DotBuffers, DotInstance, ViewParams};
pub use canvas::GpuCanvas;
pub use context::GpuContext;
pub use render::DotPipeline;
