// renderer/renderer.rs
use std::collections::HashMap;

use glam::Vec2;

use crate::asset::{Assets, Geometry, Handle, Texture};
use crate::renderer::internal::pipeline::MATERIAL_SLOTS;
use crate::renderer::internal::{
    BackgroundPipeline, DynamicObjectsBuffer, FrameBuffer, MeshPipeline, RenderContext,
};
use crate::renderer::uniforms::{FrameUniform, ObjectUniform};
use crate::renderer::{
    GpuContext, GpuMesh, GpuTexture, Material, RenderBackend, RenderError, RendererOptions,
    WindowSize,
};
use crate::scene::{PerspectiveCamera, Scene};
use crate::settings::PresentModeSetting;

const INITIAL_OBJECTS_CAPACITY: u32 = 64;

/// Identifies one GPU copy of a texture: asset index, colour (sRGB) usage,
/// and the asset version it was uploaded from. `version` is `None` while the
/// texture has no pixels on the GPU (pending or failed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TextureKey {
    index: usize,
    color: bool,
    version: Option<u32>,
}

type MaterialKey = [Option<TextureKey>; MATERIAL_SLOTS as usize];

/// Drops every cached bind group that samples texture `index` in the given
/// colour mode, whatever version it was built against.
fn evict_texture<V>(groups: &mut HashMap<MaterialKey, V>, index: usize, color: bool) {
    groups.retain(|key, _| {
        !key.iter()
            .flatten()
            .any(|k| k.index == index && k.color == color)
    });
}

/// Forward renderer drawing a [`Scene`] into a window surface.
pub struct Renderer {
    options: RendererOptions,
    context: RenderContext,
    frame_buffer: FrameBuffer,
    objects: DynamicObjectsBuffer,
    mesh_pipeline: MeshPipeline,
    background_pipeline: BackgroundPipeline,
    fallback: GpuTexture,
    meshes: HashMap<usize, GpuMesh>,
    textures: HashMap<(usize, bool), GpuTexture>,
    material_groups: HashMap<MaterialKey, wgpu::BindGroup>,
    background: Option<(TextureKey, wgpu::BindGroup)>,
}

impl Renderer {
    pub fn new(
        gpu: GpuContext,
        surface: wgpu::Surface<'static>,
        size: WindowSize,
        options: RendererOptions,
        present_mode: &PresentModeSetting,
    ) -> Result<Self, RenderError> {
        let context = RenderContext::new(gpu, surface, size, options.antialias, present_mode)?;
        let frame_buffer = FrameBuffer::new(&context.device);
        let objects = DynamicObjectsBuffer::new(&context.device, INITIAL_OBJECTS_CAPACITY);
        let mesh_pipeline = MeshPipeline::new(&context, &frame_buffer, &objects);
        let background_pipeline = BackgroundPipeline::new(&context, &frame_buffer);
        let fallback = GpuTexture::white(&context.device, &context.queue);

        if options.shadow_map.is_some() {
            log::info!("Shadow maps requested; shadow flags are recorded but not rasterised");
        }

        Ok(Self {
            options,
            context,
            frame_buffer,
            objects,
            mesh_pipeline,
            background_pipeline,
            fallback,
            meshes: HashMap::new(),
            textures: HashMap::new(),
            material_groups: HashMap::new(),
            background: None,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.context.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.context.queue
    }

    pub fn sample_count(&self) -> u32 {
        self.context.sample_count
    }

    fn ensure_mesh(&mut self, assets: &Assets, handle: Handle<Geometry>) -> bool {
        if self.meshes.contains_key(&handle.index()) {
            return true;
        }
        let Some(geometry) = assets.geometries.get(handle) else {
            log::warn!("Skipping node with unknown geometry {:?}", handle);
            return false;
        };
        let label = format!("Geometry {}", handle.index());
        self.meshes
            .insert(handle.index(), GpuMesh::upload(&self.context.device, geometry, &label));
        true
    }

    /// Uploads (or re-uploads) a texture when its pixels changed. Returns
    /// `None` while it is pending or after it failed.
    fn ensure_texture(
        &mut self,
        assets: &Assets,
        handle: Handle<Texture>,
        color: bool,
    ) -> Option<TextureKey> {
        let texture = assets.textures.get(handle)?;
        let slot = (handle.index(), color);
        let version = texture.version();

        let resident = self
            .textures
            .get(&slot)
            .map(|gpu| gpu.version == version)
            .unwrap_or(false);
        if !resident {
            let gpu = GpuTexture::upload(&self.context.device, &self.context.queue, texture, color)?;
            log::debug!("Uploaded texture {} (version {})", texture.source(), version);
            self.textures.insert(slot, gpu);
            evict_texture(&mut self.material_groups, slot.0, slot.1);
        }

        Some(TextureKey {
            index: handle.index(),
            color,
            version: Some(version),
        })
    }

    fn prepare_material(&mut self, assets: &Assets, material: &Material) -> MaterialKey {
        let mut key: MaterialKey = [None; MATERIAL_SLOTS as usize];
        for (slot, map) in material.maps().into_iter().enumerate() {
            // Only the colour map holds colour data.
            let color = slot == 0;
            // Maps without pixels still name their texture so the group is
            // evicted once the upload lands.
            key[slot] = map.map(|handle| {
                self.ensure_texture(assets, handle, color)
                    .unwrap_or(TextureKey {
                        index: handle.index(),
                        color,
                        version: None,
                    })
            });
        }

        if !self.material_groups.contains_key(&key) {
            let views: Vec<&GpuTexture> = key
                .iter()
                .map(|k| {
                    k.filter(|k| k.version.is_some())
                        .and_then(|k| self.textures.get(&(k.index, k.color)))
                        .unwrap_or(&self.fallback)
                })
                .collect();
            let entries: Vec<wgpu::BindGroupEntry> = views
                .iter()
                .enumerate()
                .flat_map(|(slot, gpu)| {
                    [
                        wgpu::BindGroupEntry {
                            binding: slot as u32 * 2,
                            resource: wgpu::BindingResource::TextureView(&gpu.view),
                        },
                        wgpu::BindGroupEntry {
                            binding: slot as u32 * 2 + 1,
                            resource: wgpu::BindingResource::Sampler(&gpu.sampler),
                        },
                    ]
                })
                .collect();
            let group = self
                .context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("MaterialBindGroup"),
                    layout: &self.mesh_pipeline.material_layout,
                    entries: &entries,
                });
            self.material_groups.insert(key, group);
        }
        key
    }

    fn prepare_background(&mut self, assets: &Assets, handle: Option<Handle<Texture>>) -> bool {
        let Some(handle) = handle else {
            return false;
        };
        let Some(key) = self.ensure_texture(assets, handle, false) else {
            return false;
        };
        if matches!(&self.background, Some((current, _)) if *current == key) {
            return true;
        }
        let Some(gpu) = self.textures.get(&(key.index, key.color)) else {
            return false;
        };
        let group = self
            .context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("BackgroundBindGroup"),
                layout: &self.background_pipeline.texture_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&gpu.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&gpu.sampler),
                    },
                ],
            });
        self.background = Some((key, group));
        true
    }

    fn clear_color(&self, scene: &Scene) -> wgpu::Color {
        let color = scene.environment().clear_color();
        if self.context.encode_srgb {
            wgpu::Color {
                r: color.0.x as f64,
                g: color.0.y as f64,
                b: color.0.z as f64,
                a: 1.0,
            }
        } else {
            color.to_wgpu()
        }
    }
}

/// Texture repeat is taken from the first populated map, the way a single
/// UV transform is shared by all maps of a material.
fn uv_repeat(assets: &Assets, material: &Material) -> Vec2 {
    material
        .maps()
        .into_iter()
        .flatten()
        .find_map(|handle| assets.textures.get(handle))
        .map(|texture| texture.repeat)
        .unwrap_or(Vec2::ONE)
}

impl RenderBackend for Renderer {
    fn options(&self) -> &RendererOptions {
        &self.options
    }

    fn size(&self) -> WindowSize {
        self.context.size
    }

    fn set_size(&mut self, size: WindowSize) {
        self.context.resize(size);
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RenderError> {
        let frame = match self.context.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.context.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timeout, skipping frame");
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::SurfaceLost),
            Err(e) => return Err(RenderError::Surface(e.to_string())),
        };

        let render_objects = scene.render_objects();
        let mut draws = Vec::with_capacity(render_objects.len());
        let mut uniforms = Vec::with_capacity(render_objects.len());
        for object in &render_objects {
            if !self.ensure_mesh(&scene.assets, object.geometry) {
                continue;
            }
            let key = self.prepare_material(&scene.assets, &object.material);
            uniforms.push(ObjectUniform::new(
                object.model,
                object.normal_matrix,
                &object.material,
                uv_repeat(&scene.assets, &object.material),
            ));
            draws.push((object.geometry.index(), key));
        }
        let offsets = self.objects.update(&self.context, &uniforms);

        let has_background = self.prepare_background(&scene.assets, scene.environment().background());
        let lights = scene.lights();
        self.frame_buffer.update(
            &self.context.queue,
            &FrameUniform::new(
                camera,
                scene.environment(),
                &lights,
                self.options.tone_mapping,
                self.context.encode_srgb,
            ),
        );

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let (target, resolve_target) = match &self.context.msaa {
            Some(msaa) => (&msaa.view, Some(&view)),
            None => (&view, None),
        };
        let clear = self.clear_color(scene);

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("MainPass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.context.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if has_background {
                if let Some((_, group)) = &self.background {
                    pass.set_pipeline(&self.background_pipeline.pipeline);
                    pass.set_bind_group(0, &self.frame_buffer.bind_group, &[]);
                    pass.set_bind_group(1, group, &[]);
                    pass.draw(0..3, 0..1);
                }
            }

            pass.set_pipeline(&self.mesh_pipeline.pipeline);
            pass.set_bind_group(0, &self.frame_buffer.bind_group, &[]);
            for ((geometry, key), offset) in draws.iter().zip(&offsets) {
                let (Some(mesh), Some(group)) =
                    (self.meshes.get(geometry), self.material_groups.get(key))
                else {
                    continue;
                };
                pass.set_bind_group(1, &self.objects.bind_group, &[*offset]);
                pass.set_bind_group(2, group, &[]);
                mesh.draw(&mut pass);
            }
        }

        self.context.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_with(slot: usize, texture: TextureKey) -> MaterialKey {
        let mut key: MaterialKey = [None; MATERIAL_SLOTS as usize];
        key[slot] = Some(texture);
        key
    }

    #[test]
    fn upload_evicts_groups_built_while_pending() {
        let pending = TextureKey {
            index: 3,
            color: true,
            version: None,
        };
        let other = TextureKey {
            index: 4,
            color: true,
            version: Some(1),
        };
        let mut groups = HashMap::new();
        groups.insert(key_with(0, pending), "pending");
        groups.insert(key_with(0, other), "other");

        evict_texture(&mut groups, 3, true);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups.get(&key_with(0, other)), Some(&"other"));
    }

    #[test]
    fn eviction_respects_colour_mode() {
        let linear = TextureKey {
            index: 7,
            color: false,
            version: Some(2),
        };
        let mut groups = HashMap::new();
        groups.insert(key_with(1, linear), ());

        evict_texture(&mut groups, 7, true);
        assert_eq!(groups.len(), 1);

        evict_texture(&mut groups, 7, false);
        assert!(groups.is_empty());
    }
}
