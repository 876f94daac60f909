// scene/builder.rs

use glam::Vec3;

use super::components::*;
use super::scene::{Scene, SceneError};
use crate::asset::{Geometry, Handle};
use crate::renderer::Material;
use crate::scene::Transform;

/// Fluent helper for spawning scene nodes.
pub struct NodeBuilder<'s> {
    scene: &'s mut Scene,
    builder: hecs::EntityBuilder,
    transform: Transform,
}

impl<'s> NodeBuilder<'s> {
    pub(crate) fn new(scene: &'s mut Scene) -> Self {
        Self {
            scene,
            builder: hecs::EntityBuilder::new(),
            transform: Transform::IDENTITY,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.builder.add(Name::new(name));
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.translation = position;
        self
    }

    /// Attaches a geometry and a material, making the node a mesh.
    pub fn with_mesh(mut self, geometry: Handle<Geometry>, material: Material) -> Self {
        self.builder.add(MeshComponent(geometry));
        self.builder.add(MaterialComponent(material));
        self.builder.add(Visible(true));
        self
    }

    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.builder.add(Shadows { cast, receive });
        self
    }

    pub fn with_point_light(mut self, light: PointLight) -> Self {
        self.builder.add(light);
        self
    }

    pub fn with_directional_light(mut self, light: DirectionalLight) -> Self {
        self.builder.add(light);
        self
    }

    /// Spawns the node directly under the scene root.
    pub fn spawn(mut self) -> hecs::Entity {
        self.builder.add(TransformComponent(self.transform));
        self.scene.world.spawn(self.builder.build())
    }

    /// Spawns the node as a child of `parent`.
    pub fn spawn_under(self, parent: hecs::Entity) -> Result<hecs::Entity, SceneError> {
        if !self.scene.world.contains(parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        let NodeBuilder {
            scene,
            mut builder,
            transform,
        } = self;
        builder.add(TransformComponent(transform));
        let child = scene.world.spawn(builder.build());
        scene.attach(child, parent)?;
        Ok(child)
    }
}
