use crate::scene::components::{Children, Parent, TransformComponent, WorldTransform};
use crate::scene::transform::Transform;
use hecs::{Entity, World};

/// Recomputes `WorldTransform` for every node reachable from a root.
/// Returns the number of nodes visited.
pub(crate) fn propagate_transforms(world: &mut World) -> usize {
    let roots: Vec<Entity> = world
        .query::<&TransformComponent>()
        .without::<&Parent>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();

    let mut visited = 0;
    let mut stack: Vec<(Entity, Transform)> = roots
        .into_iter()
        .map(|root| (root, Transform::IDENTITY))
        .collect();

    while let Some((entity, parent_world)) = stack.pop() {
        let Ok(local) = world.get::<&TransformComponent>(entity).map(|t| t.0) else {
            log::trace!("Node {:?} has no local transform, skipping subtree", entity);
            continue;
        };
        let world_transform = parent_world.mul_transform(&local);
        visited += 1;

        let updated = match world.get::<&mut WorldTransform>(entity) {
            Ok(mut wt) => {
                wt.0 = world_transform;
                true
            }
            Err(_) => false,
        };
        if !updated {
            if let Err(e) = world.insert_one(entity, WorldTransform(world_transform)) {
                log::error!("Failed to insert WorldTransform for {:?}: {:?}", entity, e);
                continue;
            }
        }

        if let Ok(children) = world.get::<&Children>(entity) {
            stack.extend(children.0.iter().rev().map(|&child| (child, world_transform)));
        }
    }

    visited
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    fn spawn_pair(world: &mut World, parent: Transform, child: Transform) -> (Entity, Entity) {
        let p = world.spawn((TransformComponent(parent),));
        let c = world.spawn((TransformComponent(child), Parent(p)));
        world.insert_one(p, Children(vec![c])).unwrap();
        (p, c)
    }

    #[test]
    fn child_inherits_parent_translation() {
        let mut world = World::new();
        let (_, child) = spawn_pair(
            &mut world,
            Transform::from_xyz(0.0, 2.0, 0.0),
            Transform::from_xyz(2.0, 0.0, 0.0),
        );

        assert_eq!(propagate_transforms(&mut world), 2);
        let wt = world.get::<&WorldTransform>(child).unwrap();
        assert_eq!(wt.0.translation, Vec3::new(2.0, 2.0, 0.0));
    }

    #[test]
    fn child_orbits_with_parent_rotation() {
        let mut world = World::new();
        let (_, child) = spawn_pair(
            &mut world,
            Transform::IDENTITY.with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)),
            Transform::from_xyz(1.0, 0.0, 0.0),
        );

        propagate_transforms(&mut world);
        let wt = world.get::<&WorldTransform>(child).unwrap();
        assert!(wt.0.translation.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5));
    }

    #[test]
    fn three_levels_compose_rotations() {
        let mut world = World::new();
        let (_, mid) = spawn_pair(
            &mut world,
            Transform::IDENTITY.with_rotation(Quat::from_rotation_y(0.3)),
            Transform::from_xyz(2.0, 0.0, 0.0).with_rotation(Quat::from_rotation_y(0.3)),
        );
        let leaf = world.spawn((
            TransformComponent(Transform::from_xyz(1.0, 0.0, 0.0).with_rotation(Quat::from_rotation_y(0.6))),
            Parent(mid),
        ));
        world.insert_one(mid, Children(vec![leaf])).unwrap();

        propagate_transforms(&mut world);
        let wt = world.get::<&WorldTransform>(leaf).unwrap();
        assert!(wt.0.rotation.abs_diff_eq(Quat::from_rotation_y(1.2), 1e-5));
    }

    #[test]
    fn rerun_overwrites_existing_world_transform() {
        let mut world = World::new();
        let (parent, child) = spawn_pair(
            &mut world,
            Transform::IDENTITY,
            Transform::from_xyz(2.0, 0.0, 0.0),
        );
        propagate_transforms(&mut world);

        world.get::<&mut TransformComponent>(parent).unwrap().0.translation = Vec3::X;
        propagate_transforms(&mut world);

        let wt = world.get::<&WorldTransform>(child).unwrap();
        assert_eq!(wt.0.translation, Vec3::new(3.0, 0.0, 0.0));
    }
}
