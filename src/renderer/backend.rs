use std::fmt;

use winit::dpi::PhysicalSize;

use crate::scene::{PerspectiveCamera, Scene};

/// Size of the drawing surface in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<PhysicalSize<u32>> for WindowSize {
    fn from(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

impl From<WindowSize> for PhysicalSize<u32> {
    fn from(size: WindowSize) -> Self {
        PhysicalSize::new(size.width, size.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowMapType {
    Basic,
    #[default]
    Pcf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToneMapping {
    #[default]
    None,
    AcesFilmic,
}

/// Construction-time renderer switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererOptions {
    pub antialias: bool,
    /// `None` disables shadow maps.
    pub shadow_map: Option<ShadowMapType>,
    pub tone_mapping: ToneMapping,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            antialias: true,
            shadow_map: None,
            tone_mapping: ToneMapping::None,
        }
    }
}

impl RendererOptions {
    pub fn with_shadows(mut self, kind: ShadowMapType) -> Self {
        self.shadow_map = Some(kind);
        self
    }

    pub fn with_tone_mapping(mut self, tone_mapping: ToneMapping) -> Self {
        self.tone_mapping = tone_mapping;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    NoAdapter(String),
    Device(String),
    Surface(String),
    /// The surface went away and could not be reconfigured.
    SurfaceLost,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NoAdapter(msg) => write!(f, "No suitable GPU adapter: {}", msg),
            RenderError::Device(msg) => write!(f, "Failed to create GPU device: {}", msg),
            RenderError::Surface(msg) => write!(f, "Surface error: {}", msg),
            RenderError::SurfaceLost => write!(f, "Surface lost"),
        }
    }
}

impl std::error::Error for RenderError {}

/// Draws a scene from a camera into some backing store.
pub trait RenderBackend {
    fn options(&self) -> &RendererOptions;

    fn size(&self) -> WindowSize;

    /// Resizes the backing store. Callers filter out empty sizes.
    fn set_size(&mut self, size: WindowSize);

    /// Issues one draw of `scene` as seen from `camera`.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RenderError>;
}

/// Something a renderer can be bound to: a window, a canvas, or an
/// offscreen target.
pub trait DrawingSurface {
    type Backend: RenderBackend;

    fn window_size(&self) -> WindowSize;

    fn create_renderer(&mut self, options: &RendererOptions) -> Result<Self::Backend, RenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_is_width_over_height() {
        assert_eq!(WindowSize::new(800, 600).aspect(), 800.0 / 600.0);
        assert!(WindowSize::new(0, 600).is_empty());
        assert!(!WindowSize::new(1, 1).is_empty());
    }

    #[test]
    fn default_options_have_no_shadows() {
        let options = RendererOptions::default();
        assert!(options.antialias);
        assert_eq!(options.shadow_map, None);
        let options = options
            .with_shadows(ShadowMapType::Pcf)
            .with_tone_mapping(ToneMapping::AcesFilmic);
        assert_eq!(options.shadow_map, Some(ShadowMapType::Pcf));
        assert_eq!(options.tone_mapping, ToneMapping::AcesFilmic);
    }
}
