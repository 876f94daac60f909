use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};
use hecs::Entity;

use crate::asset::{Geometry, TextureLoader};
use crate::exercise::Episode;
use crate::renderer::{Color, Material, RendererOptions, ShadowMapType};
use crate::scene::{DirectionalLight, PointLight, Scene, SceneError, Transform};
use crate::time::FrameTime;

const POINT_LIGHT_ORBIT_RADIUS: f32 = 3.0;
const POINT_LIGHT_HEIGHT: f32 = 2.0;

/// Textured floor, box and metal ball lit by a dim sun and a point light
/// circling the scene.
#[derive(Debug, Default)]
pub struct Ep3 {
    point_light: Option<Entity>,
    tmr: f64,
}

impl Ep3 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point_light(&self) -> Option<Entity> {
        self.point_light
    }

    /// Seconds accumulated from frame deltas.
    pub fn elapsed(&self) -> f64 {
        self.tmr
    }
}

impl Episode for Ep3 {
    fn name(&self) -> &'static str {
        "EP3"
    }

    fn renderer_options(&self) -> RendererOptions {
        RendererOptions::default().with_shadows(ShadowMapType::Pcf)
    }

    fn camera_position(&self) -> Vec3 {
        Vec3::new(3.0, 3.0, 5.0)
    }

    fn create(&mut self, scene: &mut Scene, loader: &mut TextureLoader) -> Result<(), SceneError> {
        scene
            .node()
            .with_name("sun")
            .with_position(Vec3::new(5.0, 10.0, 7.5))
            .with_directional_light(DirectionalLight::new(Color::WHITE, 0.2))
            .with_shadows(true, false)
            .spawn();

        let point_light = scene
            .node()
            .with_name("point light")
            .with_point_light(PointLight::new(Color::WHITE, 3.0))
            .with_shadows(true, false)
            .spawn();
        self.point_light = Some(point_light);

        let floor_texture = loader.load(scene, "/floorTexture.jpg");
        let plane_geometry = scene.add_geometry(Geometry::plane(10.0, 10.0));
        scene
            .node()
            .with_name("floor")
            .with_transform(Transform::IDENTITY.with_rotation(Quat::from_rotation_x(-FRAC_PI_2)))
            .with_mesh(
                plane_geometry,
                Material::standard(0xffffff)
                    .with_map(floor_texture)
                    .with_roughness(0.2),
            )
            .with_shadows(true, true)
            .spawn();

        let box_texture = loader.load(scene, "/boxTexture.jpg");
        let box_geometry = scene.add_geometry(Geometry::cuboid(5.0, 1.0, 5.0));
        scene
            .node()
            .with_name("box")
            .with_position(Vec3::new(0.0, 0.5, 0.0))
            .with_mesh(
                box_geometry,
                Material::standard(0xffffff)
                    .with_map(box_texture)
                    .with_roughness(0.35),
            )
            .with_shadows(true, true)
            .spawn();

        let iron_texture = loader.load(scene, "/ironTexture.jpg");
        let ball_position = Vec3::new(0.0, 1.5, 0.0);
        let sphere_geometry = scene.add_geometry(Geometry::sphere(0.5));
        scene
            .node()
            .with_name("ball")
            .with_position(ball_position)
            .with_mesh(
                sphere_geometry,
                Material::physical(0x999999)
                    .with_map(iron_texture)
                    .with_metalness(0.8)
                    .with_roughness(0.2),
            )
            .with_shadows(true, true)
            .spawn();

        // Glowing marker next to the ball, sharing its geometry.
        scene
            .node()
            .with_name("light ball")
            .with_transform(
                Transform::from_translation(ball_position + Vec3::new(1.5, 0.0, 0.0))
                    .with_scale(Vec3::splat(0.5)),
            )
            .with_mesh(
                sphere_geometry,
                Material::standard(0xffffff).with_emissive(0xffffff, 1.0),
            )
            .spawn();

        Ok(())
    }

    fn update(&mut self, scene: &mut Scene, time: FrameTime) {
        self.tmr += time.delta;
        let Some(light) = self.point_light else { return };

        let tmr = self.tmr as f32;
        scene.update_transform(light, |transform| {
            transform.translation = Vec3::new(
                tmr.sin() * POINT_LIGHT_ORBIT_RADIUS,
                POINT_LIGHT_HEIGHT,
                tmr.cos() * POINT_LIGHT_ORBIT_RADIUS,
            );
        });
    }
}
