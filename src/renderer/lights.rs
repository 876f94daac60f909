use bytemuck::{Pod, Zeroable};
use glam::Vec3;

pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;
pub const MAX_POINT_LIGHTS: usize = 8;

/// World-space directional light, colour already linear.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLightData {
    /// Direction the light travels in.
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub casts_shadow: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLightData {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub distance: f32,
    pub decay: f32,
}

#[derive(Clone, Debug, Default)]
pub struct LightsData {
    directional: Vec<DirectionalLightData>,
    point: Vec<PointLightData>,
}

impl LightsData {
    pub fn add_directional(&mut self, light: DirectionalLightData) {
        self.directional.push(light);
    }

    pub fn add_point(&mut self, light: PointLightData) {
        self.point.push(light);
    }

    pub fn directional_lights(&self) -> &[DirectionalLightData] {
        &self.directional
    }

    pub fn point_lights(&self) -> &[PointLightData] {
        &self.point
    }

    pub fn is_empty(&self) -> bool {
        self.directional.is_empty() && self.point.is_empty()
    }
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, Debug, PartialEq)]
pub struct DirectionalLightRaw {
    pub direction: [f32; 4],
    pub color_intensity: [f32; 4],
}

impl DirectionalLightRaw {
    pub fn from_data(data: &DirectionalLightData) -> Self {
        Self {
            direction: data.direction.extend(0.0).to_array(),
            color_intensity: data.color.extend(data.intensity).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, Debug, PartialEq)]
pub struct PointLightRaw {
    /// xyz position, w cut-off distance (0 = none).
    pub position_distance: [f32; 4],
    /// rgb colour, w intensity.
    pub color_intensity: [f32; 4],
    /// x decay exponent.
    pub params: [f32; 4],
}

impl PointLightRaw {
    pub fn from_data(data: &PointLightData) -> Self {
        Self {
            position_distance: data.position.extend(data.distance).to_array(),
            color_intensity: data.color.extend(data.intensity).to_array(),
            params: [data.decay, 0.0, 0.0, 0.0],
        }
    }
}

/// Physically based attenuation for a point light at `distance`.
pub fn point_attenuation(light: &PointLightData, distance: f32) -> f32 {
    let falloff = 1.0 / distance.max(0.01).powf(light.decay);
    if light.distance > 0.0 {
        let ratio = (distance / light.distance).powi(4);
        falloff * (1.0 - ratio).clamp(0.0, 1.0).powi(2)
    } else {
        falloff
    }
}
