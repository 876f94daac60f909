//! Projection conventions shared by the camera and the shaders.
//!
//! - Right-handed view space (camera looks down -Z).
//! - Clip/NDC depth range is [0, 1] (wgpu). Near -> 0, Far -> 1.
//! - The background pass rebuilds view rays from the inverse view-projection
//!   and samples an equirectangular panorama with `u = atan2(z, x) / 2π + 0.5`,
//!   `v = 0.5 - asin(y) / π` (v = 0 at the top).
use std::f32::consts::PI;

use glam::{Vec2, Vec3, Vec4};
use scene_episodes::scene::PerspectiveCamera;

fn project(camera: &PerspectiveCamera, world: Vec3) -> Vec3 {
    let clip: Vec4 = camera.view_proj() * world.extend(1.0);
    clip.truncate() / clip.w
}

fn unproject(camera: &PerspectiveCamera, ndc: Vec3) -> Vec3 {
    let world = camera.view_proj().inverse() * ndc.extend(1.0);
    world.truncate() / world.w
}

fn equirect_uv(dir: Vec3) -> Vec2 {
    let d = dir.normalize();
    Vec2::new(d.z.atan2(d.x) / (2.0 * PI) + 0.5, 0.5 - d.y.asin() / PI)
}

fn approx_eq3(a: Vec3, b: Vec3, eps: f32) -> bool {
    (a - b).abs().max_element() <= eps
}

fn camera_at(position: Vec3) -> PerspectiveCamera {
    let mut camera = PerspectiveCamera::with_aspect(16.0 / 9.0);
    camera.position = position;
    camera.look_at(Vec3::ZERO);
    camera
}

#[test]
fn look_at_target_lands_in_the_middle_of_the_screen() {
    let camera = camera_at(Vec3::new(3.0, 3.0, 5.0));
    let ndc = project(&camera, Vec3::ZERO);
    assert!(ndc.truncate().abs().max_element() < 1e-5, "ndc {:?}", ndc);
    assert!(ndc.z > 0.0 && ndc.z < 1.0);
}

#[test]
fn near_and_far_planes_map_to_wgpu_depth_range() {
    let camera = camera_at(Vec3::new(0.0, 0.0, 10.0));
    let forward = camera.forward();

    let near = project(&camera, camera.position + forward * camera.near);
    let far = project(&camera, camera.position + forward * camera.far);

    assert!(near.z.abs() < 1e-5, "near -> depth {}", near.z);
    assert!((far.z - 1.0).abs() < 1e-4, "far -> depth {}", far.z);
}

#[test]
fn world_points_round_trip_through_inverse_view_projection() {
    let camera = camera_at(Vec3::new(3.0, 3.0, 3.0));
    let points = [
        Vec3::ZERO,
        Vec3::new(-1.0, 0.5, 0.0),
        Vec3::new(1.0, 0.5, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
    ];

    for &p in &points {
        let ndc = project(&camera, p);
        let back = unproject(&camera, ndc);
        assert!(approx_eq3(back, p, 1e-3), "{:?} -> {:?} -> {:?}", p, ndc, back);
    }
}

#[test]
fn equirect_lookup_orientation() {
    assert!(equirect_uv(Vec3::X).abs_diff_eq(Vec2::new(0.5, 0.5), 1e-6));
    assert!((equirect_uv(Vec3::Y).y - 0.0).abs() < 1e-6);
    assert!((equirect_uv(Vec3::NEG_Y).y - 1.0).abs() < 1e-6);
    assert!(equirect_uv(Vec3::Z).abs_diff_eq(Vec2::new(0.75, 0.5), 1e-6));
}
