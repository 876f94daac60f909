use std::f32::consts::PI;

use glam::{Quat, Vec3};
use scene_episodes::renderer::{HeadlessRenderer, HeadlessSurface, Material};
use scene_episodes::scene::{Scene, Transform};
use scene_episodes::{Exercise, ExerciseKind};

const EPS: f32 = 1e-5;

fn same_rotation(a: Quat, b: Quat) -> bool {
    a.abs_diff_eq(b, EPS) || a.abs_diff_eq(-b, EPS)
}

fn ep2(width: u32, height: u32) -> Exercise<HeadlessRenderer> {
    let mut surface = HeadlessSurface::new(width, height);
    let mut exercise = Exercise::new(ExerciseKind::Ep2.episode(), "web/assets");
    exercise.init(&mut surface).unwrap();
    exercise.create().unwrap();
    exercise
}

#[test]
fn ep2_at_800_by_600_has_six_meshes() {
    let exercise = ep2(800, 600);
    let scene = exercise.scene().unwrap();

    assert_eq!(scene.mesh_count(), 6);
    assert_eq!(exercise.camera().unwrap().aspect, 800.0 / 600.0);

    let sun = scene.find_by_name("sun").unwrap();
    let earth = scene.find_by_name("earth").unwrap();
    let moon = scene.find_by_name("moon").unwrap();
    assert_eq!(scene.parent(earth), Some(sun));
    assert_eq!(scene.parent(moon), Some(earth));
    assert_eq!(scene.descendants(sun), vec![earth, moon]);
}

#[test]
fn solar_system_follows_time() {
    let mut exercise = ep2(800, 600);
    exercise.start().unwrap();
    exercise.frame(500.0).unwrap();

    let t = 0.5f32;
    let scene = exercise.scene().unwrap();
    let sun = scene.find_by_name("sun").unwrap();
    let earth = scene.find_by_name("earth").unwrap();
    let moon = scene.find_by_name("moon").unwrap();

    let sun_local = scene.transform(sun).unwrap();
    assert!((sun_local.translation.y - (2.0 + t.sin() * 0.5)).abs() < EPS);
    assert!(same_rotation(sun_local.rotation, Quat::from_rotation_y(t)));

    // Rotations accumulate down the hierarchy: earth t + t, moon t + t + 2t.
    let earth_world = scene.world_transform(earth).unwrap();
    let moon_world = scene.world_transform(moon).unwrap();
    assert!(same_rotation(earth_world.rotation, Quat::from_rotation_y(2.0 * t)));
    assert!(same_rotation(moon_world.rotation, Quat::from_rotation_y(4.0 * t)));
}

#[test]
fn child_world_rotation_composes_parent_and_local() {
    let mut scene = Scene::new();
    let geometry = scene.add_geometry(scene_episodes::asset::Geometry::cuboid(1.0, 1.0, 1.0));
    let parent = scene
        .node()
        .with_mesh(geometry, Material::basic(0xffffff))
        .spawn();
    let child = scene
        .node()
        .with_position(Vec3::X)
        .with_mesh(geometry, Material::basic(0xffffff))
        .spawn_under(parent)
        .unwrap();

    for t in [0.1f32, 0.7, PI / 3.0] {
        scene.update_transform(parent, |tr| tr.set_rotation_y(t));
        scene.update_transform(child, |tr| tr.set_rotation_y(2.0 * t));
        scene.update_world_transforms();

        let world: Transform = scene.world_transform(child).unwrap();
        assert!(same_rotation(world.rotation, Quat::from_rotation_y(3.0 * t)));
    }
}

#[test]
fn identical_timestamps_give_identical_transforms() {
    let timestamps = [0.0, 16.6, 33.3, 1000.0, 2517.25, 9999.9];

    let run = || {
        let mut exercise = ep2(800, 600);
        exercise.start().unwrap();
        for ts in timestamps {
            exercise.frame(ts).unwrap();
        }
        let scene = exercise.scene().unwrap();
        ["box", "plane", "sphere", "sun", "earth", "moon"]
            .into_iter()
            .map(|name| {
                let node = scene.find_by_name(name).unwrap();
                scene.world_transform(node).unwrap()
            })
            .collect::<Vec<_>>()
    };

    let first = run();
    let second = run();
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.translation.to_array(), b.translation.to_array());
        assert_eq!(a.rotation.to_array(), b.rotation.to_array());
        assert_eq!(a.scale.to_array(), b.scale.to_array());
    }
}
