use std::fmt;

use hecs::{Entity, World};

use super::builder::NodeBuilder;
use super::components::{Children, MeshComponent, Name, Parent, TransformComponent, WorldTransform};
use super::environment::Environment;
use super::internal::{lights, rendering, transforms};
use crate::asset::{Assets, Geometry, Handle};
use crate::renderer::{LightsData, RenderObject};
use crate::scene::Transform;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    UnknownNode(Entity),
    /// Attaching would make a node its own ancestor.
    Cycle { child: Entity, parent: Entity },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::UnknownNode(entity) => write!(f, "Unknown scene node {:?}", entity),
            SceneError::Cycle { child, parent } => write!(
                f,
                "Attaching {:?} under {:?} would create a cycle",
                child, parent
            ),
        }
    }
}

impl std::error::Error for SceneError {}

/// Scene graph: an implicit root whose direct children are the nodes
/// without a [`Parent`], plus the assets and environment they refer to.
pub struct Scene {
    pub world: World,
    pub assets: Assets,
    environment: Environment,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            assets: Assets::new(),
            environment: Environment::default(),
        }
    }

    pub fn node(&mut self) -> NodeBuilder<'_> {
        NodeBuilder::new(self)
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> Handle<Geometry> {
        self.assets.geometries.insert(geometry)
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    /// Moves `child` under `parent`, detaching it from any previous parent.
    pub fn attach(&mut self, child: Entity, parent: Entity) -> Result<(), SceneError> {
        for entity in [child, parent] {
            if !self.world.contains(entity) {
                return Err(SceneError::UnknownNode(entity));
            }
        }

        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if node == child {
                return Err(SceneError::Cycle { child, parent });
            }
            cursor = self.parent(node);
        }

        self.detach(child);

        if let Err(e) = self.world.insert_one(child, Parent(parent)) {
            log::error!("Failed to set parent of {:?}: {:?}", child, e);
            return Err(SceneError::UnknownNode(child));
        }
        let has_children = match self.world.get::<&mut Children>(parent) {
            Ok(mut children) => {
                children.0.push(child);
                true
            }
            Err(_) => false,
        };
        if !has_children {
            self.world
                .insert_one(parent, Children(vec![child]))
                .map_err(|_| SceneError::UnknownNode(parent))?;
        }
        Ok(())
    }

    /// Makes `child` a direct child of the scene root again.
    pub fn detach(&mut self, child: Entity) {
        let Ok(Parent(old)) = self.world.remove_one::<Parent>(child) else {
            return;
        };
        if let Ok(mut children) = self.world.get::<&mut Children>(old) {
            children.0.retain(|&c| c != child);
        }
    }

    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.world.get::<&Parent>(entity).ok().map(|p| p.0)
    }

    pub fn children(&self, entity: Entity) -> Vec<Entity> {
        self.world
            .get::<&Children>(entity)
            .map(|c| c.0.clone())
            .unwrap_or_default()
    }

    /// Direct children of the scene root.
    pub fn roots(&self) -> Vec<Entity> {
        self.world
            .query::<&TransformComponent>()
            .without::<&Parent>()
            .iter()
            .map(|(entity, _)| entity)
            .collect()
    }

    /// Every node below `entity`, depth first.
    pub fn descendants(&self, entity: Entity) -> Vec<Entity> {
        let mut out = Vec::new();
        let mut stack: Vec<Entity> = self.children(entity).into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).into_iter().rev());
        }
        out
    }

    /// Number of mesh nodes anywhere in the graph.
    pub fn mesh_count(&self) -> usize {
        self.world.query::<&MeshComponent>().iter().count()
    }

    pub fn find_by_name(&self, name: &str) -> Option<Entity> {
        self.world
            .query::<&Name>()
            .iter()
            .find(|(_, n)| n.0 == name)
            .map(|(entity, _)| entity)
    }

    pub fn transform(&self, entity: Entity) -> Option<Transform> {
        self.world.get::<&TransformComponent>(entity).ok().map(|t| t.0)
    }

    /// Runs `f` on the local transform of `entity`. Returns false when the
    /// node does not exist.
    pub fn update_transform(&mut self, entity: Entity, f: impl FnOnce(&mut Transform)) -> bool {
        match self.world.get::<&mut TransformComponent>(entity) {
            Ok(mut t) => {
                f(&mut t.0);
                true
            }
            Err(_) => false,
        }
    }

    /// World transform as of the last [`Scene::update_world_transforms`].
    pub fn world_transform(&self, entity: Entity) -> Option<Transform> {
        self.world.get::<&WorldTransform>(entity).ok().map(|t| t.0)
    }

    pub fn update_world_transforms(&mut self) -> usize {
        transforms::propagate_transforms(&mut self.world)
    }

    pub fn lights(&self) -> LightsData {
        lights::collect_lights(&self.world)
    }

    pub fn has_any_lights(&self) -> bool {
        lights::has_any_lights(&self.world)
    }

    pub fn render_objects(&self) -> Vec<RenderObject> {
        rendering::build_render_objects(&self.world)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Material;
    use glam::Vec3;

    fn boxed(scene: &mut Scene) -> Handle<Geometry> {
        scene.add_geometry(Geometry::cuboid(1.0, 1.0, 1.0))
    }

    #[test]
    fn nested_nodes_are_counted() {
        let mut scene = Scene::new();
        let geometry = boxed(&mut scene);
        let sun = scene.node().with_mesh(geometry, Material::basic(0xffff00)).spawn();
        let earth = scene
            .node()
            .with_mesh(geometry, Material::basic(0x00ffff))
            .spawn_under(sun)
            .unwrap();
        scene
            .node()
            .with_mesh(geometry, Material::basic(0xffffff))
            .spawn_under(earth)
            .unwrap();

        assert_eq!(scene.mesh_count(), 3);
        assert_eq!(scene.roots(), vec![sun]);
        assert_eq!(scene.descendants(sun).len(), 2);
        assert_eq!(scene.parent(earth), Some(sun));
    }

    #[test]
    fn attach_rejects_cycles() {
        let mut scene = Scene::new();
        let a = scene.node().spawn();
        let b = scene.node().spawn_under(a).unwrap();

        assert_eq!(scene.attach(a, b), Err(SceneError::Cycle { child: a, parent: b }));
        assert_eq!(scene.attach(a, a), Err(SceneError::Cycle { child: a, parent: a }));
    }

    #[test]
    fn reattach_moves_child() {
        let mut scene = Scene::new();
        let a = scene.node().spawn();
        let b = scene.node().spawn();
        let c = scene.node().spawn_under(a).unwrap();

        scene.attach(c, b).unwrap();
        assert!(scene.children(a).is_empty());
        assert_eq!(scene.children(b), vec![c]);
    }

    #[test]
    fn spawning_under_despawned_parent_fails() {
        let mut scene = Scene::new();
        let a = scene.node().spawn();
        scene.world.despawn(a).unwrap();
        assert_eq!(
            scene.node().spawn_under(a).unwrap_err(),
            SceneError::UnknownNode(a)
        );
    }

    #[test]
    fn world_transforms_follow_updates() {
        let mut scene = Scene::new();
        let parent = scene.node().with_position(Vec3::new(0.0, 2.0, 0.0)).spawn();
        let child = scene
            .node()
            .with_position(Vec3::new(2.0, 0.0, 0.0))
            .spawn_under(parent)
            .unwrap();

        scene.update_world_transforms();
        assert_eq!(
            scene.world_transform(child).unwrap().translation,
            Vec3::new(2.0, 2.0, 0.0)
        );

        assert!(scene.update_transform(parent, |t| t.translation.y = 3.0));
        scene.update_world_transforms();
        assert_eq!(
            scene.world_transform(child).unwrap().translation,
            Vec3::new(2.0, 3.0, 0.0)
        );
    }

    #[test]
    fn named_nodes_can_be_found() {
        let mut scene = Scene::new();
        let sun = scene.node().with_name("sun").spawn();
        assert_eq!(scene.find_by_name("sun"), Some(sun));
        assert_eq!(scene.find_by_name("pluto"), None);
    }
}
