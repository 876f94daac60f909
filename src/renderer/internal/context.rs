use crate::renderer::depth::{Depth, MsaaTarget};
use crate::renderer::gpu::GpuContext;
use crate::renderer::{RenderError, WindowSize};
use crate::settings::PresentModeSetting;

const MSAA_SAMPLES: u32 = 4;

pub(crate) struct RenderContext {
    pub(crate) surface: wgpu::Surface<'static>,
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
    pub(crate) config: wgpu::SurfaceConfiguration,
    pub(crate) size: WindowSize,
    pub(crate) depth: Depth,
    pub(crate) msaa: Option<MsaaTarget>,
    pub(crate) sample_count: u32,
    /// The swapchain format is not sRGB, so shaders encode themselves.
    pub(crate) encode_srgb: bool,
}

impl RenderContext {
    pub(crate) fn new(
        gpu: GpuContext,
        surface: wgpu::Surface<'static>,
        size: WindowSize,
        antialias: bool,
        present_mode: &PresentModeSetting,
    ) -> Result<Self, RenderError> {
        let surface_caps = surface.get_capabilities(&gpu.adapter);
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| RenderError::Surface("surface reports no formats".into()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: present_mode.choose(&surface_caps.present_modes),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&gpu.device, &config);

        let sample_count = if antialias
            && gpu
                .adapter
                .get_texture_format_features(format)
                .flags
                .sample_count_supported(MSAA_SAMPLES)
        {
            MSAA_SAMPLES
        } else {
            1
        };
        log::info!(
            "Surface format {:?}, {}x{}, {} sample(s)",
            format,
            config.width,
            config.height,
            sample_count
        );

        let depth = Depth::new(&gpu.device, size, sample_count);
        let msaa = (sample_count > 1)
            .then(|| MsaaTarget::new(&gpu.device, size, format, sample_count));

        Ok(Self {
            surface,
            device: gpu.device,
            queue: gpu.queue,
            config,
            size,
            depth,
            msaa,
            sample_count,
            encode_srgb: !format.is_srgb(),
        })
    }

    pub(crate) fn resize(&mut self, new_size: WindowSize) {
        if new_size.is_empty() {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.reconfigure();
    }

    pub(crate) fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.depth = Depth::new(&self.device, self.size, self.sample_count);
        if self.sample_count > 1 {
            self.msaa = Some(MsaaTarget::new(
                &self.device,
                self.size,
                self.config.format,
                self.sample_count,
            ));
        }
    }
}
