//! WGPU-based forward renderer for the scene editor
//!
//! The renderer is a thin collaborator: each frame it reads the live slice
//! of the scene store plus the camera matrices and draws every object with
//! its resolved mesh, texture and lighting products. Meshes and textures are
//! uploaded to the GPU lazily, the first frame an object references them.

use std::{iter, sync::Arc};

use cgmath::Vector4;
use log::error;
use wgpu::util::DeviceExt;
use wgpu::TextureFormat;

use crate::{
    assets::AssetLibrary,
    editor::{camera::OrbitCamera, store::SceneStore, SceneObject},
};

use super::{texture::TextureResource, vertex::Vertex3D};

/// Dynamic-offset stride for per-object uniforms; covers the minimum
/// uniform-buffer offset alignment on all supported adapters.
const OBJECT_STRIDE: u64 = 256;

const MAX_DRAWN_OBJECTS: u64 = crate::editor::MAX_OBJECTS as u64;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct GlobalUniforms {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    light_position: [[f32; 4]; 3],
    light_color: [[f32; 4]; 3],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ObjectUniforms {
    model: [[f32; 4]; 4],
    ambient_product: [f32; 4],
    diffuse_product: [f32; 4],
    specular_product: [f32; 4],
    params: [f32; 4],
}

impl ObjectUniforms {
    fn from_object(object: &SceneObject) -> Self {
        let rgb = object.lit_rgb();
        let product = |k: f32| [k * rgb.x, k * rgb.y, k * rgb.z, 1.0];
        Self {
            model: object.model_matrix().into(),
            ambient_product: product(object.ambient),
            diffuse_product: product(object.diffuse),
            specular_product: product(object.specular),
            params: [object.shine, object.tex_scale, 0.0, 0.0],
        }
    }
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct GpuTexture {
    // Kept alive on behalf of the bind group.
    _resource: TextureResource,
    bind_group: wgpu::BindGroup,
}

/// Core rendering engine managing GPU resources and draw calls.
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    depth_texture: TextureResource,

    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    objects_buffer: wgpu::Buffer,
    objects_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,

    gpu_meshes: Vec<Option<GpuMesh>>,
    gpu_textures: Vec<Option<GpuTexture>>,
}

impl RenderEngine {
    /// Creates a render engine for the given window surface.
    ///
    /// # Panics
    ///
    /// Panics if no compatible wgpu adapter or device is available.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> RenderEngine {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window).unwrap();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to request adapter!");

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096, // Allow higher resolutions on native
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .expect("Failed to request a device!");

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = TextureResource::create_depth_texture(&device, &config, "depth");

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let objects_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ObjectUniforms>() as u64
                    ),
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Globals Buffer"),
            size: std::mem::size_of::<GlobalUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let objects_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Object Buffer"),
            size: OBJECT_STRIDE * MAX_DRAWN_OBJECTS,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let objects_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object Bind Group"),
            layout: &objects_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &objects_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ObjectUniforms>() as u64),
                }),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene_shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&globals_layout, &objects_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex3D::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // The ground square is viewed from both sides.
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: TextureResource::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        RenderEngine {
            surface,
            device: device.into(),
            queue: queue.into(),
            config,
            format,
            depth_texture,
            pipeline,
            globals_buffer,
            globals_bind_group,
            objects_buffer,
            objects_bind_group,
            texture_layout,
            gpu_meshes: Vec::new(),
            gpu_textures: Vec::new(),
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.format
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth");
    }

    /// Draws the live slice of the store, then an optional UI overlay pass.
    pub fn render_frame<F>(
        &mut self,
        store: &SceneStore,
        camera: &OrbitCamera,
        assets: &AssetLibrary,
        ui_callback: Option<F>,
    ) where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(err) => {
                error!("dropping frame: {err}");
                return;
            }
        };
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.upload_globals(store, camera);

        let objects = store.live();
        for (index, object) in objects.iter().enumerate().take(MAX_DRAWN_OBJECTS as usize) {
            self.ensure_mesh(object.mesh_id, assets);
            self.ensure_texture(object.tex_id, assets);
            self.queue.write_buffer(
                &self.objects_buffer,
                index as u64 * OBJECT_STRIDE,
                bytemuck::bytes_of(&ObjectUniforms::from_object(object)),
            );
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.globals_bind_group, &[]);

            for (index, object) in objects.iter().enumerate().take(MAX_DRAWN_OBJECTS as usize) {
                let Some(mesh) = self.gpu_meshes.get(object.mesh_id).and_then(Option::as_ref)
                else {
                    continue;
                };
                let Some(texture) = self
                    .gpu_textures
                    .get(object.tex_id)
                    .and_then(Option::as_ref)
                else {
                    continue;
                };

                let offset = (index as u64 * OBJECT_STRIDE) as u32;
                render_pass.set_bind_group(1, &self.objects_bind_group, &[offset]);
                render_pass.set_bind_group(2, &texture.bind_group, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(&self.device, &self.queue, &mut encoder, &surface_view);
        }

        self.queue.submit(iter::once(encoder.finish()));
        surface_texture.present();
    }

    fn upload_globals(&self, store: &SceneStore, camera: &OrbitCamera) {
        let view = camera.view_matrix();

        let mut light_position = [[0.0f32; 4]; 3];
        let mut light_color = [[0.0f32; 4]; 3];
        for slot in 0..3 {
            if let Some(light) = store.object(slot + 1) {
                let position = view
                    * Vector4::new(light.position.x, light.position.y, light.position.z, 1.0);
                light_position[slot] = [position.x, position.y, position.z, 0.0];
                light_color[slot] = [light.rgb.x, light.rgb.y, light.rgb.z, light.brightness];
            }
        }

        let globals = GlobalUniforms {
            view: view.into(),
            proj: camera.projection_matrix().into(),
            light_position,
            light_color,
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
    }

    fn ensure_mesh(&mut self, mesh_id: usize, assets: &AssetLibrary) {
        if self.gpu_meshes.len() <= mesh_id {
            self.gpu_meshes.resize_with(mesh_id + 1, || None);
        }
        if self.gpu_meshes[mesh_id].is_some() {
            return;
        }
        let Some(asset) = assets.mesh(mesh_id) else {
            return;
        };

        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Vertices", asset.name)),
                contents: bytemuck::cast_slice(&asset.geometry.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Indices", asset.name)),
                contents: bytemuck::cast_slice(&asset.geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        self.gpu_meshes[mesh_id] = Some(GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: asset.geometry.indices.len() as u32,
        });
    }

    fn ensure_texture(&mut self, tex_id: usize, assets: &AssetLibrary) {
        if self.gpu_textures.len() <= tex_id {
            self.gpu_textures.resize_with(tex_id + 1, || None);
        }
        if self.gpu_textures[tex_id].is_some() {
            return;
        }
        let Some(asset) = assets.texture(tex_id) else {
            return;
        };

        let resource = TextureResource::from_asset(&self.device, &self.queue, asset);
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} Bind Group", asset.name)),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&resource.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&resource.sampler),
                },
            ],
        });

        self.gpu_textures[tex_id] = Some(GpuTexture {
            _resource: resource,
            bind_group,
        });
    }
}
