// renderer/uniforms.rs
use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec2, Vec3};

use super::lights::{
    DirectionalLightRaw, LightsData, PointLightRaw, MAX_DIRECTIONAL_LIGHTS, MAX_POINT_LIGHTS,
};
use super::{Material, ToneMapping};
use crate::scene::{Environment, PerspectiveCamera};

/// Per-object uniforms live in one buffer at this stride and are selected
/// with a dynamic offset.
pub const OBJECT_UNIFORM_STRIDE: u64 = 256;

/// Group 0: everything that is constant for one frame.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub inverse_view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// rgb ambient radiance, w 1 when an environment map is set.
    pub ambient: [f32; 4],
    /// rgb linear fog colour, w exp2 density (0 = no fog).
    pub fog: [f32; 4],
    /// x tone mapping (0 none, 1 ACES), y encode sRGB in shader,
    /// z directional count, w point count.
    pub params: [f32; 4],
    pub directional: [DirectionalLightRaw; MAX_DIRECTIONAL_LIGHTS],
    pub point: [PointLightRaw; MAX_POINT_LIGHTS],
}

impl FrameUniform {
    pub fn new(
        camera: &PerspectiveCamera,
        environment: &Environment,
        lights: &LightsData,
        tone_mapping: ToneMapping,
        encode_srgb: bool,
    ) -> Self {
        let view_proj = camera.view_proj();
        let mut uniform = Self::zeroed();
        uniform.view_proj = view_proj.to_cols_array_2d();
        uniform.inverse_view_proj = view_proj.inverse().to_cols_array_2d();
        uniform.camera_pos = camera.position.extend(1.0).to_array();

        let has_env = environment.environment_map().is_some();
        uniform.ambient = environment
            .ambient()
            .extend(if has_env { 1.0 } else { 0.0 })
            .to_array();
        if let Some(fog) = environment.fog() {
            uniform.fog = fog.color.to_linear().extend(fog.density).to_array();
        }

        let directional = lights.directional_lights();
        let point = lights.point_lights();
        if directional.len() > MAX_DIRECTIONAL_LIGHTS || point.len() > MAX_POINT_LIGHTS {
            log::warn!(
                "Too many lights ({} directional, {} point); extra lights are ignored",
                directional.len(),
                point.len()
            );
        }
        for (slot, light) in uniform.directional.iter_mut().zip(directional) {
            *slot = DirectionalLightRaw::from_data(light);
        }
        for (slot, light) in uniform.point.iter_mut().zip(point) {
            *slot = PointLightRaw::from_data(light);
        }

        uniform.params = [
            match tone_mapping {
                ToneMapping::None => 0.0,
                ToneMapping::AcesFilmic => 1.0,
            },
            if encode_srgb { 1.0 } else { 0.0 },
            directional.len().min(MAX_DIRECTIONAL_LIGHTS) as f32,
            point.len().min(MAX_POINT_LIGHTS) as f32,
        ];
        uniform
    }
}

/// Group 1: one mesh node.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, Debug, PartialEq)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub base_color: [f32; 4],
    /// rgb emissive radiance (colour times intensity).
    pub emissive: [f32; 4],
    /// x roughness, y metalness.
    pub pbr: [f32; 4],
    /// xy repeat, zw offset.
    pub uv_transform: [f32; 4],
    /// x `MaterialFlags` bits.
    pub flags: [u32; 4],
}

impl ObjectUniform {
    pub fn new(model: Mat4, normal_matrix: Mat3, material: &Material, uv_repeat: Vec2) -> Self {
        let emissive: Vec3 = material.emissive.to_linear() * material.emissive_intensity;
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: Mat4::from_mat3(normal_matrix).to_cols_array_2d(),
            base_color: material.color.to_linear().extend(1.0).to_array(),
            emissive: emissive.extend(0.0).to_array(),
            pbr: [material.roughness, material.metalness, 0.0, 0.0],
            uv_transform: [uv_repeat.x, uv_repeat.y, 0.0, 0.0],
            flags: [material.flags().bits(), 0, 0, 0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{Color, DirectionalLightData, MaterialFlags};
    use crate::scene::FogExp2;

    #[test]
    fn object_uniform_fits_stride() {
        assert!(std::mem::size_of::<ObjectUniform>() as u64 <= OBJECT_UNIFORM_STRIDE);
        assert_eq!(std::mem::size_of::<ObjectUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<FrameUniform>() % 16, 0);
    }

    #[test]
    fn frame_uniform_packs_lights_and_fog() {
        let camera = PerspectiveCamera::with_aspect(1.0);
        let mut environment = Environment::default();
        environment.set_fog(Some(FogExp2::new(Color::WHITE, 0.025)));
        let mut lights = LightsData::default();
        lights.add_directional(DirectionalLightData {
            direction: Vec3::NEG_Y,
            color: Vec3::ONE,
            intensity: 0.2,
            casts_shadow: true,
        });

        let uniform = FrameUniform::new(
            &camera,
            &environment,
            &lights,
            ToneMapping::AcesFilmic,
            false,
        );
        assert_eq!(uniform.fog, [1.0, 1.0, 1.0, 0.025]);
        assert_eq!(uniform.params, [1.0, 0.0, 1.0, 0.0]);
        assert_eq!(uniform.directional[0].color_intensity[3], 0.2);
    }

    #[test]
    fn emissive_is_scaled_by_intensity() {
        let material = Material::standard(0xffffff).with_emissive(0xffffff, 2.0);
        let uniform = ObjectUniform::new(Mat4::IDENTITY, Mat3::IDENTITY, &material, Vec2::ONE);
        assert_eq!(uniform.emissive, [2.0, 2.0, 2.0, 0.0]);
        assert_eq!(uniform.flags[0], MaterialFlags::empty().bits());
    }
}
