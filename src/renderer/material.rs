// renderer/material.rs

use bitflags::bitflags;

use super::Color;
use crate::asset::{Handle, Texture};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Unlit: the colour (times the colour map) is written as is.
    Basic,
    /// Metal/roughness shading.
    Standard,
    /// Standard plus a metalness map slot.
    Physical,
}

bitflags! {
    /// Which texture slots of a material are populated. Mirrored into the
    /// shader so it knows which samples to use.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MaterialFlags: u32 {
        const COLOR_MAP = 1 << 0;
        const NORMAL_MAP = 1 << 1;
        const AO_MAP = 1 << 2;
        const ROUGHNESS_MAP = 1 << 3;
        const METALNESS_MAP = 1 << 4;
        const UNLIT = 1 << 5;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
    pub emissive: Color,
    pub emissive_intensity: f32,

    pub map: Option<Handle<Texture>>,
    pub normal_map: Option<Handle<Texture>>,
    pub ao_map: Option<Handle<Texture>>,
    pub roughness_map: Option<Handle<Texture>>,
    pub metalness_map: Option<Handle<Texture>>,
}

impl Material {
    fn new(kind: MaterialKind, hex: u32) -> Self {
        Self {
            kind,
            color: Color::from_hex(hex),
            roughness: 1.0,
            metalness: 0.0,
            emissive: Color::BLACK,
            emissive_intensity: 1.0,
            map: None,
            normal_map: None,
            ao_map: None,
            roughness_map: None,
            metalness_map: None,
        }
    }

    pub fn basic(hex: u32) -> Self {
        Self::new(MaterialKind::Basic, hex)
    }

    pub fn standard(hex: u32) -> Self {
        Self::new(MaterialKind::Standard, hex)
    }

    pub fn physical(hex: u32) -> Self {
        Self::new(MaterialKind::Physical, hex)
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    pub fn with_metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness.clamp(0.0, 1.0);
        self
    }

    pub fn with_emissive(mut self, hex: u32, intensity: f32) -> Self {
        self.emissive = Color::from_hex(hex);
        self.emissive_intensity = intensity;
        self
    }

    pub fn with_map(mut self, texture: Handle<Texture>) -> Self {
        self.map = Some(texture);
        self
    }

    pub fn with_normal_map(mut self, texture: Handle<Texture>) -> Self {
        self.normal_map = Some(texture);
        self
    }

    pub fn with_ao_map(mut self, texture: Handle<Texture>) -> Self {
        self.ao_map = Some(texture);
        self
    }

    pub fn with_roughness_map(mut self, texture: Handle<Texture>) -> Self {
        self.roughness_map = Some(texture);
        self
    }

    pub fn with_metalness_map(mut self, texture: Handle<Texture>) -> Self {
        self.metalness_map = Some(texture);
        self
    }

    pub fn is_lit(&self) -> bool {
        self.kind != MaterialKind::Basic
    }

    pub fn flags(&self) -> MaterialFlags {
        let mut flags = MaterialFlags::empty();
        flags.set(MaterialFlags::COLOR_MAP, self.map.is_some());
        flags.set(MaterialFlags::NORMAL_MAP, self.normal_map.is_some());
        flags.set(MaterialFlags::AO_MAP, self.ao_map.is_some());
        flags.set(MaterialFlags::ROUGHNESS_MAP, self.roughness_map.is_some());
        flags.set(MaterialFlags::METALNESS_MAP, self.metalness_map.is_some());
        flags.set(MaterialFlags::UNLIT, !self.is_lit());
        flags
    }

    /// Populated slots in binding order: colour, normal, ao, roughness,
    /// metalness.
    pub fn maps(&self) -> [Option<Handle<Texture>>; 5] {
        [
            self.map,
            self.normal_map,
            self.ao_map,
            self.roughness_map,
            self.metalness_map,
        ]
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::standard(0xffffff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_material_is_unlit() {
        let m = Material::basic(0xff0000);
        assert!(!m.is_lit());
        assert_eq!(m.flags(), MaterialFlags::UNLIT);
        assert_eq!(m.color, Color::rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn standard_defaults_match_a_rough_dielectric() {
        let m = Material::standard(0xffffff);
        assert_eq!(m.roughness, 1.0);
        assert_eq!(m.metalness, 0.0);
        assert_eq!(m.emissive, Color::BLACK);
    }

    #[test]
    fn flags_follow_map_slots() {
        let m = Material::physical(0x999999)
            .with_map(Handle::new(0))
            .with_metalness_map(Handle::new(4))
            .with_roughness(0.2);
        assert_eq!(m.flags(), MaterialFlags::COLOR_MAP | MaterialFlags::METALNESS_MAP);
        assert_eq!(m.maps()[4], Some(Handle::new(4)));
        assert_eq!(m.roughness, 0.2);
    }

    #[test]
    fn factors_are_clamped() {
        let m = Material::standard(0).with_metalness(2.0).with_roughness(-1.0);
        assert_eq!(m.metalness, 1.0);
        assert_eq!(m.roughness, 0.0);
    }
}
