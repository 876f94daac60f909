//! Offscreen renderer that draws nothing but records what it was asked to
//! draw. Used by tests and by runs without a display.

use super::{DrawingSurface, RenderBackend, RenderError, RendererOptions, WindowSize};
use crate::scene::{PerspectiveCamera, Scene};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameRecord {
    pub draws: usize,
    pub lights: usize,
    pub aspect: f32,
    pub size: WindowSize,
}

#[derive(Debug)]
pub struct HeadlessRenderer {
    options: RendererOptions,
    size: WindowSize,
    frames: u64,
    last_frame: Option<FrameRecord>,
}

impl HeadlessRenderer {
    pub fn new(options: RendererOptions, size: WindowSize) -> Self {
        Self {
            options,
            size,
            frames: 0,
            last_frame: None,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_frame(&self) -> Option<FrameRecord> {
        self.last_frame
    }
}

impl RenderBackend for HeadlessRenderer {
    fn options(&self) -> &RendererOptions {
        &self.options
    }

    fn size(&self) -> WindowSize {
        self.size
    }

    fn set_size(&mut self, size: WindowSize) {
        self.size = size;
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RenderError> {
        let lights = scene.lights();
        self.frames += 1;
        self.last_frame = Some(FrameRecord {
            draws: scene.render_objects().len(),
            lights: lights.directional_lights().len() + lights.point_lights().len(),
            aspect: camera.aspect,
            size: self.size,
        });
        Ok(())
    }
}

/// Fixed-size offscreen drawing surface.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    size: WindowSize,
    renderers_created: usize,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: WindowSize::new(width, height),
            renderers_created: 0,
        }
    }

    /// Simulates the window being resized by the platform.
    pub fn set_size(&mut self, size: WindowSize) {
        self.size = size;
    }

    pub fn renderers_created(&self) -> usize {
        self.renderers_created
    }
}

impl DrawingSurface for HeadlessSurface {
    type Backend = HeadlessRenderer;

    fn window_size(&self) -> WindowSize {
        self.size
    }

    fn create_renderer(&mut self, options: &RendererOptions) -> Result<HeadlessRenderer, RenderError> {
        self.renderers_created += 1;
        log::debug!("Created headless renderer #{}", self.renderers_created);
        Ok(HeadlessRenderer::new(*options, self.size))
    }
}
