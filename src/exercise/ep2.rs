use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};
use hecs::Entity;

use crate::asset::{Geometry, TextureLoader};
use crate::exercise::Episode;
use crate::renderer::Material;
use crate::scene::{Scene, SceneError, Transform};
use crate::time::FrameTime;

/// Unlit primitives plus a sun/earth/moon hierarchy.
#[derive(Debug, Default)]
pub struct Ep2 {
    sun: Option<Entity>,
    earth: Option<Entity>,
    moon: Option<Entity>,
}

impl Ep2 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sun(&self) -> Option<Entity> {
        self.sun
    }

    pub fn earth(&self) -> Option<Entity> {
        self.earth
    }

    pub fn moon(&self) -> Option<Entity> {
        self.moon
    }
}

impl Episode for Ep2 {
    fn name(&self) -> &'static str {
        "EP2"
    }

    fn camera_position(&self) -> Vec3 {
        Vec3::new(3.0, 3.0, 3.0)
    }

    fn create(&mut self, scene: &mut Scene, _loader: &mut TextureLoader) -> Result<(), SceneError> {
        let box_geometry = scene.add_geometry(Geometry::cuboid(1.0, 1.0, 1.0));
        scene
            .node()
            .with_name("box")
            .with_position(Vec3::new(-1.0, 0.5, 0.0))
            .with_mesh(box_geometry, Material::basic(0xff0000))
            .spawn();

        let plane_geometry = scene.add_geometry(Geometry::plane(10.0, 10.0));
        scene
            .node()
            .with_name("plane")
            .with_transform(Transform::IDENTITY.with_rotation(Quat::from_rotation_x(-FRAC_PI_2)))
            .with_mesh(plane_geometry, Material::basic(0x00ff00))
            .spawn();

        let sphere_geometry = scene.add_geometry(Geometry::sphere(0.5));
        scene
            .node()
            .with_name("sphere")
            .with_position(Vec3::new(1.0, 0.5, 0.0))
            .with_mesh(sphere_geometry, Material::basic(0x0000ff))
            .spawn();

        // Solar system
        let sun_geometry = scene.add_geometry(Geometry::sphere(0.5));
        let sun = scene
            .node()
            .with_name("sun")
            .with_position(Vec3::new(0.0, 2.0, 0.0))
            .with_mesh(sun_geometry, Material::basic(0xffff00))
            .spawn();

        let earth_geometry = scene.add_geometry(Geometry::cuboid(0.5, 0.5, 0.5));
        let earth = scene
            .node()
            .with_name("earth")
            .with_position(Vec3::new(2.0, 0.0, 0.0))
            .with_mesh(earth_geometry, Material::basic(0x00ffff))
            .spawn_under(sun)?;

        let moon_geometry = scene.add_geometry(Geometry::cuboid(0.15, 0.15, 0.15));
        let moon = scene
            .node()
            .with_name("moon")
            .with_position(Vec3::new(1.0, 0.0, 0.0))
            .with_mesh(moon_geometry, Material::basic(0xffffff))
            .spawn_under(earth)?;

        self.sun = Some(sun);
        self.earth = Some(earth);
        self.moon = Some(moon);
        Ok(())
    }

    fn update(&mut self, scene: &mut Scene, time: FrameTime) {
        let t = time.time as f32;

        if let Some(sun) = self.sun {
            scene.update_transform(sun, |transform| {
                transform.translation.y = 2.0 + t.sin() * 0.5;
                transform.set_rotation_y(t);
            });
        }
        if let Some(earth) = self.earth {
            scene.update_transform(earth, |transform| transform.set_rotation_y(t));
        }
        if let Some(moon) = self.moon {
            scene.update_transform(moon, |transform| transform.set_rotation_y(t * 2.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built() -> (Scene, Ep2) {
        let mut scene = Scene::new();
        let mut loader = TextureLoader::new("unused");
        let mut ep = Ep2::new();
        ep.create(&mut scene, &mut loader).unwrap();
        (scene, ep)
    }

    #[test]
    fn hierarchy_is_sun_earth_moon() {
        let (scene, ep) = built();
        assert_eq!(scene.mesh_count(), 6);
        assert_eq!(scene.parent(ep.earth().unwrap()), ep.sun());
        assert_eq!(scene.parent(ep.moon().unwrap()), ep.earth());
        assert_eq!(scene.roots().len(), 4);
    }

    #[test]
    fn earth_orbits_with_the_sun() {
        let (mut scene, mut ep) = built();
        ep.update(
            &mut scene,
            FrameTime {
                time: std::f64::consts::FRAC_PI_2,
                delta: 0.0,
            },
        );
        scene.update_world_transforms();

        let sun = scene.world_transform(ep.sun().unwrap()).unwrap();
        let earth = scene.world_transform(ep.earth().unwrap()).unwrap();
        assert!((sun.translation.y - 2.5).abs() < 1e-5);
        // Sun turned a quarter: local +x maps to world -z.
        assert!(earth.translation.abs_diff_eq(Vec3::new(0.0, 2.5, -2.0), 1e-5));
    }
}
