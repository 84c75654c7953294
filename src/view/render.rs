use wgpu::*;
use wgpu::util::DeviceExt;

use crate::config::ThrowConfig;
use crate::controller::{FrameView, SceneRenderer};
use crate::model::{geometry, Fixture};
use super::gpu_init::GpuContext;
use super::mesh::{srgb_to_linear, Instance, Mesh, MeshBuffer, Vertex};

pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

const BALL_WIDTH_SEGMENTS: u32 = 20;
const BALL_HEIGHT_SEGMENTS: u32 = 20;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    pub sun_dir: [f32; 3],
    pub sun_intensity: f32,
    pub ambient: f32,
    pub _pad1: f32,
    pub _pad2: f32,
    pub _pad3: f32,
}

impl Default for LightingUniform {
    /// White light straight down at 0.7 plus ambient 0.7
    fn default() -> Self {
        Self {
            sun_dir: [0.0, 1.0, 0.0],
            sun_intensity: 0.7,
            ambient: 0.7,
            _pad1: 0.0,
            _pad2: 0.0,
            _pad3: 0.0,
        }
    }
}

// Shared graphics setup used by native and web
pub struct CameraResources {
    pub camera_buffer: wgpu::Buffer,
    pub lighting_buffer: wgpu::Buffer,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub camera_bind_group: wgpu::BindGroup,
}

pub fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> (wgpu::Texture, wgpu::TextureView) {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d { width: width.max(1), height: height.max(1), depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
    (depth_texture, depth_view)
}

pub fn create_camera_resources(device: &wgpu::Device) -> CameraResources {
    let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("camera_buffer"),
        size: std::mem::size_of::<CameraUniform>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let lighting_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("lighting_buffer"),
        contents: bytemuck::bytes_of(&LightingUniform::default()),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let uniform = |binding, visibility| wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    };
    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("camera_bind_group_layout"),
        entries: &[
            uniform(0, wgpu::ShaderStages::VERTEX),
            uniform(1, wgpu::ShaderStages::FRAGMENT),
        ],
    });

    let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("camera_bind_group"),
        layout: &bind_group_layout,
        entries: &[
            wgpu::BindGroupEntry { binding: 0, resource: camera_buffer.as_entire_binding() },
            wgpu::BindGroupEntry { binding: 1, resource: lighting_buffer.as_entire_binding() },
        ],
    });

    CameraResources { camera_buffer, lighting_buffer, bind_group_layout, camera_bind_group }
}

pub fn create_mesh_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("mesh_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("mesh_pipeline_layout"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("mesh_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout(), Instance::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState { format, blend: Some(wgpu::BlendState::REPLACE), write_mask: wgpu::ColorWrites::ALL })],
            compilation_options: Default::default(),
        }),
        // the torus is seen from both sides
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
        multiview: None,
        cache: None,
    })
}

/// One static mesh with its model matrix baked into a single instance
struct FixtureBatch {
    mesh: MeshBuffer,
    instance: wgpu::Buffer,
}

/// Growable per-ball instance buffer
struct BallInstances {
    buffer: wgpu::Buffer,
    capacity: usize,
    scratch: Vec<Instance>,
}

impl BallInstances {
    fn new(device: &Device, capacity: usize) -> Self {
        Self {
            buffer: Self::allocate(device, capacity),
            capacity,
            scratch: Vec::with_capacity(capacity),
        }
    }

    fn allocate(device: &Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ball_instances"),
            size: (capacity.max(1) * std::mem::size_of::<Instance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Upload one matrix per ball; returns the instance count
    fn write(&mut self, device: &Device, queue: &Queue, view: &FrameView<'_>) -> u32 {
        self.scratch.clear();
        self.scratch
            .extend(view.balls.iter().map(|b| Instance::from_matrix(b.transform.matrix())));
        if self.scratch.is_empty() {
            return 0;
        }
        if self.scratch.len() > self.capacity {
            self.capacity = self.scratch.len().next_power_of_two();
            self.buffer = Self::allocate(device, self.capacity);
            tracing::debug!("ball instance buffer grown to {}", self.capacity);
        }
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&self.scratch));
        self.scratch.len() as u32
    }
}

/// egui output waiting to be painted over the next frame
struct PendingUi {
    primitives: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    pixels_per_point: f32,
}

/// Owns the surface and every GPU resource needed to draw the court, balls and overlay
pub struct Renderer {
    pub gpu: GpuContext,
    camera: CameraResources,
    pipeline: RenderPipeline,
    depth_view: TextureView,
    fixtures: Vec<FixtureBatch>,
    ball_mesh: MeshBuffer,
    balls: BallInstances,
    egui_renderer: egui_wgpu::Renderer,
    pending_ui: Option<PendingUi>,
}

impl Renderer {
    pub fn new(gpu: GpuContext, fixtures: &[Fixture], throw: &ThrowConfig) -> Self {
        let device = gpu.device.as_ref();
        let camera = create_camera_resources(device);
        let pipeline = create_mesh_pipeline(device, gpu.format, &camera.bind_group_layout);
        let (_, depth_view) = create_depth_texture(device, gpu.config.width, gpu.config.height);

        let fixtures = fixtures
            .iter()
            .map(|f| {
                let mesh = Mesh::from_soup(&f.visual.triangles(), f.color, f.lit).upload(device);
                let model = glam::Mat4::from_rotation_translation(f.rotation, f.position);
                let instance = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("fixture_instance"),
                    contents: bytemuck::bytes_of(&Instance::from_matrix(model)),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                FixtureBatch { mesh, instance }
            })
            .collect::<Vec<_>>();

        let ball_soup = geometry::sphere(throw.ball_radius, BALL_WIDTH_SEGMENTS, BALL_HEIGHT_SEGMENTS);
        let ball_mesh = Mesh::from_soup(&ball_soup, throw.ball_color, true).upload(device);
        let balls = BallInstances::new(device, 16);

        let egui_renderer = egui_wgpu::Renderer::new(device, gpu.format, egui_wgpu::RendererOptions::default());

        tracing::info!(
            "renderer ready: {} fixtures, surface {}x{} {:?}",
            fixtures.len(),
            gpu.config.width,
            gpu.config.height,
            gpu.format
        );

        Self {
            gpu,
            camera,
            pipeline,
            depth_view,
            fixtures,
            ball_mesh,
            balls,
            egui_renderer,
            pending_ui: None,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.gpu.config.width, self.gpu.config.height)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if (width.max(1), height.max(1)) == self.size() {
            return;
        }
        self.gpu.resize(width, height);
        let (_, depth_view) = create_depth_texture(&self.gpu.device, width, height);
        self.depth_view = depth_view;
        tracing::debug!("surface resized to {}x{}", width, height);
    }

    /// Queue tessellated egui output for the next `draw_frame`
    pub fn set_ui(&mut self, primitives: Vec<egui::ClippedPrimitive>, textures_delta: egui::TexturesDelta, pixels_per_point: f32) {
        self.pending_ui = Some(PendingUi { primitives, textures_delta, pixels_per_point });
    }

    pub fn draw_frame(&mut self, view: &FrameView<'_>) -> std::result::Result<(), SurfaceError> {
        let device = self.gpu.device.clone();
        let queue = self.gpu.queue.clone();

        let frame = self.gpu.surface.get_current_texture()?;
        let target = frame.texture.create_view(&TextureViewDescriptor::default());

        let cam = CameraUniform { view_proj: view.camera.view_proj().to_cols_array_2d() };
        queue.write_buffer(&self.camera.camera_buffer, 0, bytemuck::bytes_of(&cam));
        let ball_count = self.balls.write(&device, &queue, view);

        let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("encoder"),
        });

        let [r, g, b] = view.clear_color.map(|c| srgb_to_linear(c) as f64);
        {
            let mut rp = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(Color { r, g, b, a: 1.0 }),
                        store: StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            rp.set_pipeline(&self.pipeline);
            rp.set_bind_group(0, &self.camera.camera_bind_group, &[]);

            for batch in &self.fixtures {
                if batch.mesh.index_count == 0 {
                    continue;
                }
                rp.set_vertex_buffer(0, batch.mesh.vertex_buffer.slice(..));
                rp.set_vertex_buffer(1, batch.instance.slice(..));
                rp.set_index_buffer(batch.mesh.index_buffer.slice(..), IndexFormat::Uint32);
                rp.draw_indexed(0..batch.mesh.index_count, 0, 0..1);
            }

            if ball_count > 0 {
                rp.set_vertex_buffer(0, self.ball_mesh.vertex_buffer.slice(..));
                rp.set_vertex_buffer(1, self.balls.buffer.slice(..));
                rp.set_index_buffer(self.ball_mesh.index_buffer.slice(..), IndexFormat::Uint32);
                rp.draw_indexed(0..self.ball_mesh.index_count, 0, 0..ball_count);
            }
        }

        if let Some(ui) = self.pending_ui.take() {
            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [self.gpu.config.width, self.gpu.config.height],
                pixels_per_point: ui.pixels_per_point,
            };

            // Upload egui textures
            for (id, image_delta) in &ui.textures_delta.set {
                self.egui_renderer.update_texture(&device, &queue, *id, image_delta);
            }
            self.egui_renderer
                .update_buffers(&device, &queue, &mut encoder, &ui.primitives, &screen_descriptor);

            {
                let egui_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                    label: Some("egui_render_pass"),
                    color_attachments: &[Some(RenderPassColorAttachment {
                        view: &target,
                        resolve_target: None,
                        ops: Operations {
                            load: LoadOp::Load,
                            store: StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
                self.egui_renderer
                    .render(&mut egui_pass.forget_lifetime(), &ui.primitives, &screen_descriptor);
            }

            for id in &ui.textures_delta.free {
                self.egui_renderer.free_texture(id);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl SceneRenderer for Renderer {
    fn render(&mut self, view: &FrameView<'_>) {
        match self.draw_frame(view) {
            Ok(()) => {}
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                tracing::warn!("surface lost, reconfiguring");
                self.gpu.reconfigure();
            }
            Err(SurfaceError::OutOfMemory) => tracing::error!("surface out of memory, frame dropped"),
            Err(e) => tracing::warn!("frame skipped: {e:?}"),
        }
    }
}
