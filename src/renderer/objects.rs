use glam::{Mat3, Mat4};

use super::Material;
use crate::asset::{Geometry, Handle};
use crate::scene::Shadows;

/// One mesh node flattened for drawing.
#[derive(Debug, Clone, Copy)]
pub struct RenderObject {
    pub entity: hecs::Entity,
    pub geometry: Handle<Geometry>,
    pub material: Material,
    pub model: Mat4,
    pub normal_matrix: Mat3,
    pub shadows: Shadows,
}
