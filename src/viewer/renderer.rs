use anyhow::{anyhow, Context};
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

use super::camera::OrbitCamera;
use super::geometry::{self, LineVertex, MeshVertex};
use super::lighting::{EnvironmentLight, SceneUniform};
use crate::mesh::Mesh;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Everything the scene pass needs besides the camera
#[derive(Debug, Clone, Copy)]
pub struct FrameSettings {
    pub background: [f32; 4],
    pub model_color: [f32; 4],
    pub light: EnvironmentLight,
    pub show_axes: bool,
    pub show_outline: bool,
}

/// Map a quality level to the closest supported MSAA sample count
///
/// Quality 0 disables multisampling. Ties go to the lower count.
pub fn nearest_sample_count(quality: u32, supported: &[u32]) -> u32 {
    if quality <= 1 {
        return 1;
    }
    supported
        .iter()
        .copied()
        .min_by_key(|&count| (count.abs_diff(quality), count))
        .unwrap_or(1)
}

/// Vertex and index buffers for the current mesh
struct GpuGeometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    outline_vertex_buffer: wgpu::Buffer,
    outline_index_buffer: wgpu::Buffer,
    outline_index_count: u32,
    axes_buffer: wgpu::Buffer,
    axes_vertex_count: u32,
}

impl GpuGeometry {
    fn new(device: &wgpu::Device, mesh: &Mesh) -> Self {
        let vertices = geometry::mesh_vertices(mesh);
        let indices = geometry::triangle_indices(mesh);
        let (outline_vertices, outline_indices) = geometry::outline(mesh);
        let axis_length = mesh
            .bounds()
            .map(|b| b.max_extent())
            .filter(|&e| e > 0.0)
            .unwrap_or(1.0);
        let axes = geometry::axes(glam::DVec3::ZERO, axis_length);

        let vertex_buffer = |label, contents: &[u8]| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu::BufferUsages::VERTEX,
            })
        };
        let index_buffer = |label, contents: &[u8]| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu::BufferUsages::INDEX,
            })
        };

        Self {
            vertex_buffer: vertex_buffer("Mesh Vertices", bytemuck::cast_slice(&vertices)),
            index_buffer: index_buffer("Mesh Indices", bytemuck::cast_slice(&indices)),
            index_count: indices.len() as u32,
            outline_vertex_buffer: vertex_buffer(
                "Outline Vertices",
                bytemuck::cast_slice(&outline_vertices),
            ),
            outline_index_buffer: index_buffer(
                "Outline Indices",
                bytemuck::cast_slice(&outline_indices),
            ),
            outline_index_count: outline_indices.len() as u32,
            axes_buffer: vertex_buffer("Axes Vertices", bytemuck::cast_slice(&axes)),
            axes_vertex_count: axes.len() as u32,
        }
    }
}

/// Pipelines that depend on the sample count
struct Pipelines {
    mesh: wgpu::RenderPipeline,
    outline: wgpu::RenderPipeline,
    axes: wgpu::RenderPipeline,
}

/// Multisampled color and depth attachments
struct RenderTargets {
    msaa: Option<wgpu::TextureView>,
    depth: wgpu::TextureView,
}

/// Forward renderer for one mesh plus the egui overlay
pub struct MeshRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    supported_samples: Vec<u32>,
    sample_count: u32,
    shader: wgpu::ShaderModule,
    pipeline_layout: wgpu::PipelineLayout,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    pipelines: Pipelines,
    targets: RenderTargets,
    geometry: GpuGeometry,
    egui_renderer: egui_wgpu::Renderer,
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,
}

impl MeshRenderer {
    pub async fn new(window: Arc<Window>, mesh: &Mesh, quality: u32) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;
        let adapter = Self::request_adapter(&instance, &surface).await?;
        let (device, queue) = Self::request_device(&adapter).await?;

        let config = Self::create_surface_config(&surface, &adapter, size);
        surface.configure(&device, &config);

        let color_samples = adapter
            .get_texture_format_features(config.format)
            .flags
            .supported_sample_counts();
        let depth_samples = adapter
            .get_texture_format_features(DEPTH_FORMAT)
            .flags
            .supported_sample_counts();
        let supported_samples: Vec<u32> = color_samples
            .into_iter()
            .filter(|c| depth_samples.contains(c))
            .collect();
        let sample_count = nearest_sample_count(quality, &supported_samples);
        log::info!(
            "MSAA: quality {} -> {} samples (supported {:?})",
            quality,
            sample_count,
            supported_samples
        );

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Viewer Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("viewer.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniform Buffer"),
            size: std::mem::size_of::<SceneUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
            label: Some("scene_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("scene_bind_group"),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Viewer Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipelines =
            Self::create_pipelines(&device, &shader, &pipeline_layout, config.format, sample_count);
        let targets = Self::create_targets(&device, &config, sample_count);
        let geometry = GpuGeometry::new(&device, mesh);

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &device,
            config.format,
            egui_wgpu::RendererOptions::default(),
        );

        Ok(Self {
            device,
            queue,
            surface,
            config,
            supported_samples,
            sample_count,
            shader,
            pipeline_layout,
            uniform_buffer,
            bind_group,
            pipelines,
            targets,
            geometry,
            egui_renderer,
            egui_state,
            egui_ctx,
        })
    }

    async fn request_adapter(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'_>,
    ) -> Result<wgpu::Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| "Failed to find appropriate adapter".into())
    }

    async fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue)> {
        adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .map_err(|e| e.into())
    }

    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> wgpu::SurfaceConfiguration {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }

    fn create_pipelines(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        layout: &wgpu::PipelineLayout,
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Pipelines {
        let pipeline = |label: &str,
                        vs: &str,
                        fs: &str,
                        buffer: wgpu::VertexBufferLayout<'static>,
                        topology: wgpu::PrimitiveTopology,
                        depth_test: bool| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some(vs),
                    buffers: &[buffer],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some(fs),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: depth_test,
                    depth_compare: if depth_test {
                        wgpu::CompareFunction::Less
                    } else {
                        wgpu::CompareFunction::Always
                    },
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState {
                    count: sample_count,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            })
        };

        Pipelines {
            mesh: pipeline(
                "Mesh Pipeline",
                "vs_mesh",
                "fs_mesh",
                MeshVertex::layout(),
                wgpu::PrimitiveTopology::TriangleList,
                true,
            ),
            outline: pipeline(
                "Outline Pipeline",
                "vs_line",
                "fs_line",
                LineVertex::layout(),
                wgpu::PrimitiveTopology::LineList,
                false,
            ),
            axes: pipeline(
                "Axes Pipeline",
                "vs_line",
                "fs_line",
                LineVertex::layout(),
                wgpu::PrimitiveTopology::LineList,
                true,
            ),
        }
    }

    fn create_targets(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        sample_count: u32,
    ) -> RenderTargets {
        let size = wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        };
        let texture = |label, format| {
            device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some(label),
                    size,
                    mip_level_count: 1,
                    sample_count,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                })
                .create_view(&wgpu::TextureViewDescriptor::default())
        };

        RenderTargets {
            msaa: (sample_count > 1).then(|| texture("MSAA Color", config.format)),
            depth: texture("Depth", DEPTH_FORMAT),
        }
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height as f32
    }

    pub fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
        self.targets = Self::create_targets(&self.device, &self.config, self.sample_count);
    }

    /// Rebuild targets and pipelines for a new quality; returns the sample count
    pub fn set_quality(&mut self, quality: u32) -> u32 {
        let sample_count = nearest_sample_count(quality, &self.supported_samples);
        if sample_count != self.sample_count {
            self.sample_count = sample_count;
            self.pipelines = Self::create_pipelines(
                &self.device,
                &self.shader,
                &self.pipeline_layout,
                self.config.format,
                sample_count,
            );
            self.targets = Self::create_targets(&self.device, &self.config, sample_count);
        }
        log::info!("quality {} -> {} samples", quality, sample_count);
        sample_count
    }

    /// Replace the displayed mesh
    pub fn set_mesh(&mut self, mesh: &Mesh) {
        self.geometry = GpuGeometry::new(&self.device, mesh);
    }

    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.egui_state.on_window_event(window, event).consumed
    }

    pub fn egui_wants_pointer(&self) -> bool {
        self.egui_ctx.wants_pointer_input()
    }

    fn write_uniform(&self, camera: &OrbitCamera, settings: &FrameSettings) {
        let uniform = SceneUniform::new(
            camera.view_proj(self.aspect()),
            camera.eye(),
            settings.model_color,
            &settings.light,
        );
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Record the scene pass, resolving into `target`
    fn encode_scene(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        settings: &FrameSettings,
    ) {
        let [r, g, b, a] = settings.background.map(f64::from);
        let (view, resolve_target) = match &self.targets.msaa {
            Some(msaa) => (msaa, Some(target)),
            None => (target, None),
        };

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.targets.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        render_pass.set_bind_group(0, &self.bind_group, &[]);

        let geometry = &self.geometry;
        if geometry.index_count > 0 {
            render_pass.set_pipeline(&self.pipelines.mesh);
            render_pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
            render_pass.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..geometry.index_count, 0, 0..1);
        }

        if settings.show_axes {
            render_pass.set_pipeline(&self.pipelines.axes);
            render_pass.set_vertex_buffer(0, geometry.axes_buffer.slice(..));
            render_pass.draw(0..geometry.axes_vertex_count, 0..1);
        }

        // Drawn last so it stays on top of the mesh
        if settings.show_outline && geometry.outline_index_count > 0 {
            render_pass.set_pipeline(&self.pipelines.outline);
            render_pass.set_vertex_buffer(0, geometry.outline_vertex_buffer.slice(..));
            render_pass.set_index_buffer(
                geometry.outline_index_buffer.slice(..),
                wgpu::IndexFormat::Uint32,
            );
            render_pass.draw_indexed(0..geometry.outline_index_count, 0, 0..1);
        }
    }

    pub fn render(
        &mut self,
        window: &Window,
        camera: &OrbitCamera,
        settings: &FrameSettings,
        run_ui: impl FnMut(&egui::Context),
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        self.write_uniform(camera, settings);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Encoder"),
            });

        self.encode_scene(&mut encoder, &view, settings);

        // egui pass - UI overlay
        let raw_input = self.egui_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, run_ui);

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, self.egui_ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            // SAFETY: egui-wgpu requires a 'static render pass; the pass is
            // dropped at the end of this scope, before the encoder is used again.
            let render_pass_static = unsafe {
                std::mem::transmute::<&mut wgpu::RenderPass<'_>, &mut wgpu::RenderPass<'static>>(
                    &mut render_pass,
                )
            };

            self.egui_renderer
                .render(render_pass_static, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Render the scene without UI into an RGBA image
    pub fn capture(
        &mut self,
        camera: &OrbitCamera,
        settings: &FrameSettings,
    ) -> anyhow::Result<image::RgbaImage> {
        self.write_uniform(camera, settings);
        let (width, height) = self.size();

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Screenshot Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.config.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let unpadded_row = 4 * width;
        let padded_row = unpadded_row.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
            * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let staging_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Screenshot Staging Buffer"),
            size: (padded_row * height) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Screenshot Encoder"),
            });
        self.encode_scene(&mut encoder, &view, settings);
        encoder.copy_texture_to_buffer(
            texture.as_image_copy(),
            wgpu::TexelCopyBufferInfo {
                buffer: &staging_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = staging_buffer.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            sender.send(result).ok();
        });

        self.device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .ok();

        receiver
            .recv()
            .context("Channel closed before receiving result")?
            .map_err(|e| anyhow!("Buffer mapping failed: {:?}", e))?;

        let pixels = {
            let data = buffer_slice.get_mapped_range();
            unpad_rows(&data, padded_row as usize, unpadded_row as usize, is_bgra(self.config.format))
        };
        staging_buffer.unmap();

        image::RgbaImage::from_raw(width, height, pixels)
            .context("Screenshot buffer has the wrong size")
    }
}

fn is_bgra(format: wgpu::TextureFormat) -> bool {
    matches!(
        format,
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
    )
}

/// Strip row padding and convert BGRA to RGBA when needed
fn unpad_rows(data: &[u8], padded_row: usize, unpadded_row: usize, bgra: bool) -> Vec<u8> {
    let mut pixels: Vec<u8> = data
        .chunks(padded_row)
        .flat_map(|row| &row[..unpadded_row])
        .copied()
        .collect();
    if bgra {
        pixels.chunks_exact_mut(4).for_each(|px| px.swap(0, 2));
    }
    pixels
}
