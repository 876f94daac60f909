use crate::renderer::{DirectionalLightData, LightsData, PointLightData};
use crate::scene::components::{
    DirectionalLight, PointLight, Shadows, TransformComponent, WorldTransform,
};
use crate::scene::transform::Transform;
use glam::Vec3;
use hecs::World;

/// Gathers every light in the world in world space.
pub(crate) fn collect_lights(world: &World) -> LightsData {
    let mut lights = LightsData::default();

    for (_entity, (light, world_transform, local_transform, shadows)) in world
        .query::<(
            &DirectionalLight,
            Option<&WorldTransform>,
            Option<&TransformComponent>,
            Option<&Shadows>,
        )>()
        .iter()
    {
        let transform = resolve_light_transform(world_transform, local_transform);
        // Directional lights aim from their position at the origin.
        let direction = safe_normalize(-transform.translation, Vec3::NEG_Y);
        lights.add_directional(DirectionalLightData {
            direction,
            color: light.color.to_linear(),
            intensity: light.intensity,
            casts_shadow: shadows.map(|s| s.cast).unwrap_or(false),
        });
    }

    for (_entity, (light, world_transform, local_transform)) in world
        .query::<(&PointLight, Option<&WorldTransform>, Option<&TransformComponent>)>()
        .iter()
    {
        let transform = resolve_light_transform(world_transform, local_transform);
        lights.add_point(PointLightData {
            position: transform.translation,
            color: light.color.to_linear(),
            intensity: light.intensity,
            distance: light.distance,
            decay: light.decay,
        });
    }

    lights
}

pub(crate) fn has_any_lights(world: &World) -> bool {
    world.query::<&DirectionalLight>().iter().next().is_some()
        || world.query::<&PointLight>().iter().next().is_some()
}

fn resolve_light_transform(
    world_transform: Option<&WorldTransform>,
    local_transform: Option<&TransformComponent>,
) -> Transform {
    world_transform
        .map(|wt| wt.0)
        .or_else(|| local_transform.map(|t| t.0))
        .unwrap_or(Transform::IDENTITY)
}

pub(crate) fn safe_normalize(v: Vec3, fallback: Vec3) -> Vec3 {
    v.try_normalize().unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Color;

    #[test]
    fn directional_light_points_at_origin() {
        let mut world = World::new();
        world.spawn((
            DirectionalLight::new(Color::WHITE, 0.2),
            TransformComponent(Transform::from_xyz(0.0, 10.0, 0.0)),
        ));

        let lights = collect_lights(&world);
        assert_eq!(lights.directional_lights().len(), 1);
        assert!(lights.directional_lights()[0]
            .direction
            .abs_diff_eq(Vec3::NEG_Y, 1e-6));
    }

    #[test]
    fn point_light_prefers_world_transform() {
        let mut world = World::new();
        world.spawn((
            PointLight::new(Color::WHITE, 3.0),
            TransformComponent(Transform::from_xyz(1.0, 0.0, 0.0)),
            WorldTransform(Transform::from_xyz(4.0, 2.0, 0.0)),
        ));

        let lights = collect_lights(&world);
        assert_eq!(lights.point_lights()[0].position, Vec3::new(4.0, 2.0, 0.0));
        assert!(has_any_lights(&world));
    }

    #[test]
    fn empty_world_has_no_lights() {
        assert!(!has_any_lights(&World::new()));
    }
}
