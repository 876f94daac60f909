use std::mem;
use std::num::NonZeroU64;

use wgpu::util::DeviceExt;

use crate::renderer::uniforms::{FrameUniform, ObjectUniform, OBJECT_UNIFORM_STRIDE};

use super::context::RenderContext;

pub(crate) struct FrameBuffer {
    pub(crate) buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
    pub(crate) bind_layout: wgpu::BindGroupLayout,
}

impl FrameBuffer {
    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let frame: FrameUniform = bytemuck::Zeroable::zeroed();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("FrameBuffer"),
            contents: bytemuck::bytes_of(&frame),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("FrameBindLayout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(mem::size_of::<FrameUniform>() as u64),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("FrameBindGroup"),
            layout: &bind_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group,
            bind_layout,
        }
    }

    pub(crate) fn update(&self, queue: &wgpu::Queue, frame: &FrameUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(frame));
    }
}

/// One `ObjectUniform` per drawn node, each at its own aligned offset.
pub(crate) struct DynamicObjectsBuffer {
    pub(crate) buffer: wgpu::Buffer,
    pub(crate) capacity: u32,
    pub(crate) stride: u64,
    pub(crate) bind_group: wgpu::BindGroup,
    pub(crate) bind_layout: wgpu::BindGroupLayout,
    scratch: Vec<u8>,
}

impl DynamicObjectsBuffer {
    pub(crate) fn new(device: &wgpu::Device, capacity: u32) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = OBJECT_UNIFORM_STRIDE.max(alignment);

        let bind_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ObjectsBindLayout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(mem::size_of::<ObjectUniform>() as u64),
                },
                count: None,
            }],
        });

        let (buffer, bind_group) = Self::allocate(device, &bind_layout, capacity, stride);

        Self {
            buffer,
            capacity,
            stride,
            bind_group,
            bind_layout,
            scratch: Vec::new(),
        }
    }

    fn allocate(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        capacity: u32,
        stride: u64,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ObjectsBuffer"),
            size: capacity.max(1) as u64 * stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ObjectsBindGroup"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(mem::size_of::<ObjectUniform>() as u64),
                }),
            }],
        });

        (buffer, bind_group)
    }

    /// Writes `objects` and returns the dynamic offset of each, in order.
    pub(crate) fn update(&mut self, context: &RenderContext, objects: &[ObjectUniform]) -> Vec<u32> {
        let required = objects.len() as u32;
        if required > self.capacity {
            self.grow(context, required);
        }

        self.scratch.clear();
        self.scratch.resize(objects.len() * self.stride as usize, 0);
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, object) in objects.iter().enumerate() {
            let start = i * self.stride as usize;
            let bytes = bytemuck::bytes_of(object);
            self.scratch[start..start + bytes.len()].copy_from_slice(bytes);
            offsets.push(start as u32);
        }

        if !self.scratch.is_empty() {
            context.queue.write_buffer(&self.buffer, 0, &self.scratch);
        }
        offsets
    }

    fn grow(&mut self, context: &RenderContext, required: u32) {
        let new_capacity = required.max(self.capacity * 2);
        log::info!(
            "Growing objects buffer: {} -> {}",
            self.capacity,
            new_capacity
        );
        let (buffer, bind_group) =
            Self::allocate(&context.device, &self.bind_layout, new_capacity, self.stride);
        self.buffer = buffer;
        self.bind_group = bind_group;
        self.capacity = new_capacity;
    }
}
