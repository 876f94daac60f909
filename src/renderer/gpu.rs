// renderer/gpu.rs
use std::sync::Arc;

use winit::window::Window;

use super::{DrawingSurface, RenderError, Renderer, RendererOptions, WindowSize};
use crate::settings::PresentModeSetting;

/// Adapter, device and queue shared by everything drawn on one surface.
#[derive(Clone)]
pub struct GpuContext {
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    pub async fn new(
        instance: &wgpu::Instance,
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> Result<Self, RenderError> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| RenderError::NoAdapter(e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info());

        // WebGL2 caps lower than the defaults; ask only for what the adapter has.
        let required_limits = if cfg!(target_arch = "wasm32") {
            wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits())
        } else {
            wgpu::Limits::default()
        };

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| RenderError::Device(e.to_string()))?;

        Ok(Self {
            adapter,
            device,
            queue,
        })
    }
}

pub(crate) fn create_instance() -> wgpu::Instance {
    let backends = if cfg!(target_arch = "wasm32") {
        wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL
    } else {
        wgpu::Backends::all()
    };

    wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends,
        ..Default::default()
    })
}

/// A window (on the web: the page's canvas) plus the GPU objects needed to
/// draw into it. The swapchain surface is handed to the first renderer
/// created from it.
pub struct WindowSurface {
    window: Arc<Window>,
    surface: Option<wgpu::Surface<'static>>,
    context: GpuContext,
    present_mode: PresentModeSetting,
}

impl WindowSurface {
    pub async fn new(
        window: Arc<Window>,
        present_mode: PresentModeSetting,
    ) -> Result<Self, RenderError> {
        let instance = create_instance();
        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| RenderError::Surface(e.to_string()))?;
        log::info!("Surface created successfully!");

        let context = GpuContext::new(&instance, Some(&surface)).await?;

        Ok(Self {
            window,
            surface: Some(surface),
            context,
            present_mode,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

impl DrawingSurface for WindowSurface {
    type Backend = Renderer;

    fn window_size(&self) -> WindowSize {
        self.window.inner_size().into()
    }

    fn create_renderer(&mut self, options: &RendererOptions) -> Result<Renderer, RenderError> {
        let surface = self
            .surface
            .take()
            .ok_or_else(|| RenderError::Surface("surface already bound to a renderer".into()))?;
        let size = self.window_size();
        Renderer::new(
            self.context.clone(),
            surface,
            size,
            *options,
            &self.present_mode,
        )
    }
}
