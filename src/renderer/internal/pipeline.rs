use crate::renderer::depth::DEPTH_FORMAT;
use crate::renderer::mesh::Vertex;

use super::buffers::{DynamicObjectsBuffer, FrameBuffer};
use super::context::RenderContext;

/// Number of texture slots in the material bind group.
pub(crate) const MATERIAL_SLOTS: u32 = 5;

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

/// Layout with `slots` (texture, sampler) pairs at bindings 2i, 2i+1.
fn texture_pairs_layout(device: &wgpu::Device, label: &str, slots: u32) -> wgpu::BindGroupLayout {
    let entries: Vec<wgpu::BindGroupLayoutEntry> = (0..slots)
        .flat_map(|slot| [texture_entry(slot * 2), sampler_entry(slot * 2 + 1)])
        .collect();
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &entries,
    })
}

pub(crate) struct MeshPipeline {
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) material_layout: wgpu::BindGroupLayout,
}

impl MeshPipeline {
    pub(crate) fn new(
        context: &RenderContext,
        frame: &FrameBuffer,
        objects: &DynamicObjectsBuffer,
    ) -> Self {
        let device = &context.device;
        let material_layout = texture_pairs_layout(device, "MaterialBindLayout", MATERIAL_SLOTS);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("MeshShader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shader.wgsl").into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("MeshPipelineLayout"),
            bind_group_layouts: &[&frame.bind_layout, &objects.bind_layout, &material_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("MeshPipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: context.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                front_face: wgpu::FrontFace::Ccw,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
                strip_index_format: None,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: context.sample_count,
                ..Default::default()
            },
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            material_layout,
        }
    }
}

/// Equirectangular sky drawn behind everything else.
pub(crate) struct BackgroundPipeline {
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) texture_layout: wgpu::BindGroupLayout,
}

impl BackgroundPipeline {
    pub(crate) fn new(context: &RenderContext, frame: &FrameBuffer) -> Self {
        let device = &context.device;
        let texture_layout = texture_pairs_layout(device, "BackgroundBindLayout", 1);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("BackgroundShader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../background.wgsl").into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("BackgroundPipelineLayout"),
            bind_group_layouts: &[&frame.bind_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("BackgroundPipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: context.config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: context.sample_count,
                ..Default::default()
            },
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            texture_layout,
        }
    }
}
