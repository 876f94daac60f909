use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};

use crate::asset::{Geometry, Handle, Texture, TextureLoader, Wrapping};
use crate::exercise::Episode;
use crate::renderer::{Color, Material, RendererOptions, ShadowMapType, ToneMapping};
use crate::scene::{FogExp2, Scene, SceneError, Transform};
use crate::time::FrameTime;

pub const ENVIRONMENT_HDR: &str = "hdri/env.hdr";
pub const FOG_COLOR: u32 = 0xB69D86;
pub const FOG_DENSITY: f32 = 0.025;
const TILE_REPEAT: f32 = 20.0;

/// Image-based lighting from an HDR panorama, fog, and PBR texture sets.
/// No analytic lights.
#[derive(Debug, Default)]
pub struct Ep4 {
    tmr: f64,
}

impl Ep4 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> f64 {
        self.tmr
    }
}

/// Loads a texture that tiles across large surfaces.
fn load_tile_texture(loader: &mut TextureLoader, scene: &mut Scene, path: &str) -> Handle<Texture> {
    loader.load_with(scene, path, |texture| {
        texture.set_wrapping(Wrapping::Repeat);
        texture.set_repeat(TILE_REPEAT, TILE_REPEAT);
    })
}

fn texture_set(name: &str, map: &str) -> String {
    format!("textures/{}_{}_1k.jpg", name, map)
}

impl Episode for Ep4 {
    fn name(&self) -> &'static str {
        "EP4"
    }

    fn renderer_options(&self) -> RendererOptions {
        RendererOptions::default()
            .with_shadows(ShadowMapType::Pcf)
            .with_tone_mapping(ToneMapping::AcesFilmic)
    }

    fn camera_position(&self) -> Vec3 {
        Vec3::new(3.0, 3.0, 5.0)
    }

    fn create(&mut self, scene: &mut Scene, loader: &mut TextureLoader) -> Result<(), SceneError> {
        loader.load_hdr(scene, ENVIRONMENT_HDR, |scene, handle| {
            let ambient = scene
                .assets
                .textures
                .get(handle)
                .and_then(Texture::image)
                .map(|image| image.mean_rgb())
                .unwrap_or(Vec3::ZERO);
            let environment = scene.environment_mut();
            environment.set_environment_map(Some(handle), ambient);
            environment.set_background(Some(handle));
            environment.set_fog(Some(FogExp2::new(Color::from_hex(FOG_COLOR), FOG_DENSITY)));
            log::info!("Environment ready (ambient {:?})", ambient);
        });

        const FLOOR: &str = "concrete_rock_path";
        let floor_material = Material::standard(0xffffff)
            .with_map(load_tile_texture(loader, scene, &texture_set(FLOOR, "diff")))
            .with_normal_map(load_tile_texture(loader, scene, &texture_set(FLOOR, "nor_gl")))
            .with_ao_map(load_tile_texture(loader, scene, &texture_set(FLOOR, "ao")))
            .with_roughness_map(load_tile_texture(loader, scene, &texture_set(FLOOR, "rough")));
        let plane_geometry = scene.add_geometry(Geometry::plane(200.0, 200.0));
        scene
            .node()
            .with_name("floor")
            .with_transform(Transform::IDENTITY.with_rotation(Quat::from_rotation_x(-FRAC_PI_2)))
            .with_mesh(plane_geometry, floor_material)
            .with_shadows(true, true)
            .spawn();

        const GATE: &str = "wooden_gate";
        let box_material = Material::standard(0xffffff)
            .with_map(loader.load(scene, &texture_set(GATE, "diff")))
            .with_normal_map(loader.load(scene, &texture_set(GATE, "nor_gl")))
            .with_ao_map(loader.load(scene, &texture_set(GATE, "ao")))
            .with_roughness_map(loader.load(scene, &texture_set(GATE, "rough")));
        let box_geometry = scene.add_geometry(Geometry::cuboid(5.0, 1.0, 5.0));
        scene
            .node()
            .with_name("box")
            .with_position(Vec3::new(0.0, 0.5, 0.0))
            .with_mesh(box_geometry, box_material)
            .with_shadows(true, true)
            .spawn();

        const METAL: &str = "rusty_metal_04";
        let ball_material = Material::physical(0x999999)
            .with_map(loader.load(scene, &texture_set(METAL, "diff")))
            .with_normal_map(loader.load(scene, &texture_set(METAL, "nor_gl")))
            .with_ao_map(loader.load(scene, &texture_set(METAL, "ao")))
            .with_metalness_map(loader.load(scene, &texture_set(METAL, "metal")))
            .with_roughness_map(loader.load(scene, &texture_set(METAL, "rough")))
            .with_roughness(0.2);
        let sphere_geometry = scene.add_geometry(Geometry::sphere(0.5));
        scene
            .node()
            .with_name("ball")
            .with_position(Vec3::new(0.0, 1.5, 0.0))
            .with_mesh(sphere_geometry, ball_material)
            .with_shadows(true, true)
            .spawn();

        Ok(())
    }

    fn update(&mut self, _scene: &mut Scene, time: FrameTime) {
        self.tmr += time.delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::TextureState;

    #[test]
    fn registers_every_texture_set_and_the_environment() {
        let mut scene = Scene::new();
        let mut loader = TextureLoader::new("does-not-exist");
        let mut ep = Ep4::new();
        ep.create(&mut scene, &mut loader).unwrap();

        assert_eq!(scene.mesh_count(), 3);
        assert!(!scene.has_any_lights());
        // 4 floor + 4 box + 5 ball + 1 HDR
        assert_eq!(scene.assets.textures.len(), 14);
        assert_eq!(loader.pending(), 14);
        assert!(scene.environment().fog().is_none());
    }

    #[test]
    fn failed_environment_leaves_scene_untouched() {
        let mut scene = Scene::new();
        let mut loader = TextureLoader::new("does-not-exist");
        Ep4::new().create(&mut scene, &mut loader).unwrap();

        loader.finish(&mut scene);
        assert!(scene.environment().background().is_none());
        assert!(scene.environment().fog().is_none());
        assert!(scene
            .assets
            .textures
            .iter()
            .all(|(_, texture)| matches!(texture.state(), TextureState::Failed(_))));
    }

    #[test]
    fn texture_set_paths() {
        assert_eq!(
            texture_set("wooden_gate", "nor_gl"),
            "textures/wooden_gate_nor_gl_1k.jpg"
        );
    }
}
