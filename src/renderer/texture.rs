// renderer/texture.rs

use half::f16;

use crate::asset::{ColorSpace, Texture, TextureImage, Wrapping};

/// A texture resident on the GPU, with the sampler matching its wrapping.
#[derive(Debug)]
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    /// `Texture::version` this copy was made from.
    pub version: u32,
}

struct UploadSource<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    bytes_per_pixel: u32,
    format: wgpu::TextureFormat,
    label: &'a str,
}

impl GpuTexture {
    /// Uploads `texture` if its pixels are ready. `color` selects an sRGB
    /// view for colour data; data maps (normal, roughness, ...) are linear.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture: &Texture,
        color: bool,
    ) -> Option<Self> {
        let image = texture.image()?;
        let (width, height) = image.dimensions();
        let srgb = color && texture.color_space == ColorSpace::Srgb;

        let gpu = match image {
            TextureImage::Rgba8(rgba) => Self::create(
                device,
                queue,
                UploadSource {
                    data: rgba.as_raw(),
                    width,
                    height,
                    bytes_per_pixel: 4,
                    format: if srgb {
                        wgpu::TextureFormat::Rgba8UnormSrgb
                    } else {
                        wgpu::TextureFormat::Rgba8Unorm
                    },
                    label: texture.source(),
                },
                texture,
            ),
            TextureImage::Rgba32F(rgba) => {
                let halves = to_half_floats(rgba.as_raw());
                Self::create(
                    device,
                    queue,
                    UploadSource {
                        data: bytemuck::cast_slice(&halves),
                        width,
                        height,
                        bytes_per_pixel: 8,
                        format: wgpu::TextureFormat::Rgba16Float,
                        label: texture.source(),
                    },
                    texture,
                )
            }
        };
        Some(gpu)
    }

    fn create(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        source: UploadSource<'_>,
        texture: &Texture,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: source.width,
            height: source.height,
            depth_or_array_layers: 1,
        };
        let gpu_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(source.label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: source.format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &gpu_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            source.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(source.bytes_per_pixel * source.width),
                rows_per_image: Some(source.height),
            },
            size,
        );

        let view = gpu_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(source.label),
            address_mode_u: address_mode(texture.wrap_s),
            address_mode_v: address_mode(texture.wrap_t),
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture: gpu_texture,
            view,
            sampler,
            version: texture.version(),
        }
    }

    /// 1x1 opaque white, bound wherever a map is missing or still loading.
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let texture = Texture::from_image(
            "Fallback White",
            TextureImage::Rgba8(image::RgbaImage::from_pixel(1, 1, image::Rgba([255; 4]))),
        );
        Self::create(
            device,
            queue,
            UploadSource {
                data: &[255; 4],
                width: 1,
                height: 1,
                bytes_per_pixel: 4,
                format: wgpu::TextureFormat::Rgba8Unorm,
                label: "Fallback White",
            },
            &texture,
        )
    }
}

pub(crate) fn address_mode(wrapping: Wrapping) -> wgpu::AddressMode {
    match wrapping {
        Wrapping::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        Wrapping::Repeat => wgpu::AddressMode::Repeat,
    }
}

/// Float32 texels narrowed to half precision; Rgba16Float is filterable
/// everywhere while Rgba32Float needs an optional feature.
pub(crate) fn to_half_floats(data: &[f32]) -> Vec<u16> {
    data.iter().map(|&v| f16::from_f32(v).to_bits()).collect()
}
