// scene/components.rs
// Plain hecs components; a scene node is an entity carrying a subset of these.

use crate::asset::{Geometry, Handle};
use crate::renderer::{Color, Material};
use crate::scene::Transform;

// ============================================================================
// Core Rendering Components
// ============================================================================

/// Local transform, relative to the parent node (or the scene root).
#[derive(Debug, Clone, Copy)]
pub struct TransformComponent(pub Transform);

/// World-space transform (computed from hierarchy)
#[derive(Debug, Clone, Copy)]
pub struct WorldTransform(pub Transform);

#[derive(Debug, Clone, Copy)]
pub struct MeshComponent(pub Handle<Geometry>);

#[derive(Debug, Clone, Copy)]
pub struct MaterialComponent(pub Material);

#[derive(Debug, Clone, Copy)]
pub struct Visible(pub bool);

impl Default for Visible {
    fn default() -> Self {
        Self(true)
    }
}

/// Shadow participation flags. Recorded for the renderer; nodes without the
/// component neither cast nor receive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shadows {
    pub cast: bool,
    pub receive: bool,
}

impl Shadows {
    pub const BOTH: Self = Self {
        cast: true,
        receive: true,
    };
}

// ============================================================================
// Lighting Components
// ============================================================================

/// Light radiating from the node's world position in every direction.
/// `distance == 0.0` means no cut-off; falloff follows `1 / d^decay`.
#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    pub color: Color,
    pub intensity: f32,
    pub distance: f32,
    pub decay: f32,
}

impl PointLight {
    pub fn new(color: Color, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            distance: 0.0,
            decay: 2.0,
        }
    }
}

/// Parallel light shining from the node's world position towards the origin.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
}

impl DirectionalLight {
    pub fn new(color: Color, intensity: f32) -> Self {
        Self { color, intensity }
    }
}

// ============================================================================
// Utility Components
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

// ============================================================================
// Hierarchy Components
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub hecs::Entity);

#[derive(Debug, Clone, Default)]
pub struct Children(pub Vec<hecs::Entity>);
