pub mod buffers;
pub mod context;
pub mod pipeline;

pub(crate) use buffers::{DynamicObjectsBuffer, FrameBuffer};
pub(crate) use context::RenderContext;
pub(crate) use pipeline::{BackgroundPipeline, MeshPipeline};
