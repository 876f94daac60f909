use crate::asset::{Geometry, Handle};
use crate::renderer::{Material, RenderObject};
use crate::scene::components::{
    MaterialComponent, MeshComponent, Shadows, TransformComponent, Visible, WorldTransform,
};
use hecs::World;
use rayon::prelude::*;

struct RenderEntity {
    entity: hecs::Entity,
    geometry: Handle<Geometry>,
    material: Material,
    visible: bool,
    transform: glam::Mat4,
    shadows: Shadows,
}

/// Flattens every visible mesh node into a draw record. Nodes whose world
/// transform has not been computed yet fall back to their local transform.
pub(crate) fn build_render_objects(world: &World) -> Vec<RenderObject> {
    let entities: Vec<RenderEntity> = world
        .query::<(
            &MeshComponent,
            &MaterialComponent,
            Option<&Visible>,
            Option<&WorldTransform>,
            Option<&TransformComponent>,
            Option<&Shadows>,
        )>()
        .iter()
        .map(
            |(entity, (mesh, material, visible, world_transform, local, shadows))| RenderEntity {
                entity,
                geometry: mesh.0,
                material: material.0,
                visible: visible.map(|v| v.0).unwrap_or(true),
                transform: world_transform
                    .map(|wt| wt.0)
                    .or_else(|| local.map(|t| t.0))
                    .unwrap_or_default()
                    .matrix(),
                shadows: shadows.copied().unwrap_or_default(),
            },
        )
        .collect();

    entities
        .into_par_iter()
        .filter(|e| e.visible)
        .map(|e| RenderObject {
            entity: e.entity,
            geometry: e.geometry,
            material: e.material,
            normal_matrix: glam::Mat3::from_mat4(e.transform).inverse().transpose(),
            model: e.transform,
            shadows: e.shadows,
        })
        .collect()
}
