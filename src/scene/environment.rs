use glam::Vec3;

use crate::asset::{Handle, Texture};
use crate::renderer::Color;

/// Exponential-squared distance fog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogExp2 {
    pub color: Color,
    pub density: f32,
}

impl FogExp2 {
    pub fn new(color: Color, density: f32) -> Self {
        Self { color, density }
    }

    /// Blend weight towards the fog colour at `distance` from the camera.
    pub fn factor(&self, distance: f32) -> f32 {
        let d = self.density * distance;
        (1.0 - (-d * d).exp()).clamp(0.0, 1.0)
    }
}

/// Global rendering parameters of a scene: what is behind the geometry,
/// what lights it indirectly, and what it fades into.
///
/// Everything except the clear colour starts out empty; asset completion
/// callbacks fill the rest in once the images arrive.
#[derive(Debug, Clone, Copy)]
pub struct Environment {
    clear_color: Color,
    background: Option<Handle<Texture>>,
    environment_map: Option<Handle<Texture>>,
    ambient: Vec3,
    fog: Option<FogExp2>,
}

impl Environment {
    pub fn new(clear_color: Color) -> Self {
        Self {
            clear_color,
            background: None,
            environment_map: None,
            ambient: Vec3::ZERO,
            fog: None,
        }
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn background(&self) -> Option<Handle<Texture>> {
        self.background
    }

    pub fn set_background(&mut self, texture: Option<Handle<Texture>>) {
        self.background = texture;
    }

    pub fn environment_map(&self) -> Option<Handle<Texture>> {
        self.environment_map
    }

    /// Sets the texture used for image-based ambient light. `ambient` is the
    /// linear radiance it contributes, usually the image's mean colour.
    pub fn set_environment_map(&mut self, texture: Option<Handle<Texture>>, ambient: Vec3) {
        self.environment_map = texture;
        self.ambient = if texture.is_some() { ambient } else { Vec3::ZERO };
    }

    pub fn ambient(&self) -> Vec3 {
        self.ambient
    }

    pub fn fog(&self) -> Option<FogExp2> {
        self.fog
    }

    pub fn set_fog(&mut self, fog: Option<FogExp2>) {
        self.fog = fog;
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(Color::BLACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_inert() {
        let env = Environment::default();
        assert_eq!(env.clear_color(), Color::BLACK);
        assert!(env.background().is_none());
        assert!(env.fog().is_none());
        assert_eq!(env.ambient(), Vec3::ZERO);
    }

    #[test]
    fn fog_factor_grows_with_distance() {
        let fog = FogExp2::new(Color::from_hex(0xB69D86), 0.025);
        assert_eq!(fog.factor(0.0), 0.0);
        assert!(fog.factor(10.0) < fog.factor(40.0));
        assert!((fog.factor(40.0) - (1.0 - (-1.0f32).exp())).abs() < 1e-6);
        assert!(fog.factor(10_000.0) <= 1.0);
    }

    #[test]
    fn clearing_environment_map_drops_ambient() {
        let mut env = Environment::default();
        env.set_environment_map(Some(Handle::new(0)), Vec3::splat(0.5));
        assert_eq!(env.ambient(), Vec3::splat(0.5));
        env.set_environment_map(None, Vec3::splat(0.5));
        assert_eq!(env.ambient(), Vec3::ZERO);
    }
}
