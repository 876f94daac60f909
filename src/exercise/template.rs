use glam::Vec3;

use crate::asset::TextureLoader;
use crate::exercise::Episode;
use crate::scene::{Scene, SceneError};

/// Starting point for a new episode: camera and controls, empty scene.
#[derive(Debug, Default)]
pub struct Template;

impl Template {
    pub fn new() -> Self {
        Self
    }
}

impl Episode for Template {
    fn name(&self) -> &'static str {
        "Template"
    }

    fn camera_position(&self) -> Vec3 {
        Vec3::new(3.0, 3.0, 3.0)
    }

    fn create(&mut self, _scene: &mut Scene, _loader: &mut TextureLoader) -> Result<(), SceneError> {
        Ok(())
    }
}
