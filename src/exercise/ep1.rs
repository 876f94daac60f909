use glam::Vec3;
use hecs::Entity;

use crate::asset::{Geometry, TextureLoader};
use crate::exercise::Episode;
use crate::renderer::Material;
use crate::scene::{Scene, SceneError};
use crate::time::FrameTime;

/// A single red box that spins and bobs. No controls.
#[derive(Debug, Default)]
pub struct Ep1 {
    cube: Option<Entity>,
}

impl Ep1 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cube(&self) -> Option<Entity> {
        self.cube
    }
}

impl Episode for Ep1 {
    fn name(&self) -> &'static str {
        "EP1"
    }

    fn camera_position(&self) -> Vec3 {
        Vec3::new(3.0, 3.0, 3.0)
    }

    fn wants_controls(&self) -> bool {
        false
    }

    fn create(&mut self, scene: &mut Scene, _loader: &mut TextureLoader) -> Result<(), SceneError> {
        let box_geometry = scene.add_geometry(Geometry::cuboid(1.0, 1.0, 1.0));
        let cube = scene
            .node()
            .with_name("cube")
            .with_mesh(box_geometry, Material::basic(0xff0000))
            .spawn();
        self.cube = Some(cube);
        Ok(())
    }

    fn update(&mut self, scene: &mut Scene, time: FrameTime) {
        let Some(cube) = self.cube else { return };
        let t = time.time as f32;
        scene.update_transform(cube, |transform| {
            transform.set_euler(t, t, 0.0);
            transform.translation.y = t.sin();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::EulerRot;

    #[test]
    fn cube_spins_and_bobs() {
        let mut scene = Scene::new();
        let mut loader = TextureLoader::new("unused");
        let mut ep = Ep1::new();
        ep.create(&mut scene, &mut loader).unwrap();
        assert_eq!(scene.mesh_count(), 1);

        ep.update(&mut scene, FrameTime { time: 0.5, delta: 0.0 });
        let transform = scene.transform(ep.cube().unwrap()).unwrap();
        let (x, y, _) = transform.rotation.to_euler(EulerRot::XYZ);
        assert!((x - 0.5).abs() < 1e-5);
        assert!((y - 0.5).abs() < 1e-5);
        assert!((transform.translation.y - 0.5f32.sin()).abs() < 1e-6);
    }
}
