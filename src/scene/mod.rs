// scene/mod.rs

pub mod builder;
pub mod camera;
pub mod components;
pub mod controls;
pub mod environment;
pub mod scene;
pub mod transform;

mod internal;

// Re-export commonly used types
pub use builder::NodeBuilder;
pub use camera::PerspectiveCamera;
pub use controls::{OrbitControls, PointerButton, PointerEvent};
pub use environment::{Environment, FogExp2};
pub use scene::{Scene, SceneError};
pub use transform::Transform;

pub use components::{
    Children, DirectionalLight, MaterialComponent, MeshComponent, Name, Parent, PointLight,
    Shadows, TransformComponent, Visible, WorldTransform,
};
