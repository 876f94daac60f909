pub mod backend;
pub mod color;
pub mod depth;
pub mod gpu;
pub mod headless;
pub mod lights;
pub mod material;
pub mod mesh;
pub mod objects;
pub mod renderer;
pub mod texture;
pub mod uniforms;

mod internal;

pub use backend::{
    DrawingSurface, RenderBackend, RenderError, RendererOptions, ShadowMapType, ToneMapping,
    WindowSize,
};
pub use color::Color;
pub use gpu::{GpuContext, WindowSurface};
pub use headless::{FrameRecord, HeadlessRenderer, HeadlessSurface};
pub use lights::{DirectionalLightData, LightsData, PointLightData};
pub use material::{Material, MaterialFlags, MaterialKind};
pub use mesh::{GpuMesh, Vertex};
pub use objects::RenderObject;
pub use renderer::Renderer;
pub use texture::GpuTexture;
