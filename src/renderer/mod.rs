pub mod draw;
pub mod pipeline;
pub mod text;
pub mod texture;

use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use draw::{DrawList, Layer, TextureKey, Vertex};
use pipeline::{SpritePipeline, create_sprite_pipeline};
use texture::GpuTexture;

use crate::camera::CameraUniform;
use crate::error::RenderError;
use crate::resources::Resources;

const CLEAR_COLOR: wgpu::Color = wgpu::Color { r: 0.05, g: 0.05, b: 0.08, a: 1.0 };

struct Camera {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl Camera {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str, uniform: CameraUniform) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }

    fn write(&self, queue: &wgpu::Queue, uniform: CameraUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(std::slice::from_ref(&uniform)));
    }
}

pub struct Renderer {
    pub window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: SpritePipeline,
    /// Fixed layout-pixel projection for `Layer::Screen`.
    screen_camera: Camera,
    /// Follows the draw list's world view for `Layer::World`.
    world_camera: Camera,
    /// One bind group per texture and font atlas, plus `Solid`.
    bind_groups: HashMap<TextureKey, wgpu::BindGroup>,
}

impl Renderer {
    /// Opens the GPU, configures the surface and uploads every texture and
    /// font atlas held by `resources`.
    pub async fn new(window: Arc<Window>, resources: &Resources) -> Result<Self, RenderError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(Arc::clone(&window))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await?;
        log::info!("using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter.request_device(&wgpu::DeviceDescriptor::default()).await?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(RenderError::NoSurfaceFormat)?;
        let alpha_mode = caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipeline = create_sprite_pipeline(&device, format);
        let layout = &pipeline.camera_bind_group_layout;
        let screen_camera = Camera::new(
            &device,
            layout,
            "screen_camera",
            CameraUniform::screen(config.width as f32, config.height as f32),
        );
        let world_camera = Camera::new(
            &device,
            layout,
            "world_camera",
            CameraUniform::screen(config.width as f32, config.height as f32),
        );

        let mut bind_groups = HashMap::new();
        let mut upload = |key: TextureKey, label: &str, gpu: GpuTexture| {
            let group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &pipeline.texture_bind_group_layout,
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
            bind_groups.insert(key, group);
        };

        for (id, tex) in resources.textures() {
            upload(TextureKey::Texture(id), id.name(), GpuTexture::from_image(&device, &queue, id.name(), tex.image()));
        }
        for (id, font) in resources.fonts() {
            upload(TextureKey::Font(id), id.name(), GpuTexture::from_image(&device, &queue, id.name(), &font.image));
        }
        upload(TextureKey::Solid, "solid", GpuTexture::white(&device, &queue));
        log::debug!("uploaded {} textures", bind_groups.len());

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            pipeline,
            screen_camera,
            world_camera,
            bind_groups,
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Render one frame.
    ///
    /// All batches share one vertex buffer and are drawn in list order.
    /// The screen layer is projected in layout pixels, so the UI keeps its
    /// layout when the window is resized; the world layer uses the list's
    /// world view.
    pub fn render(&mut self, list: &DrawList) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let screen = list.screen_size();
        self.screen_camera.write(&self.queue, CameraUniform::screen(screen.x, screen.y));
        self.world_camera.write(&self.queue, list.world_view().uniform());

        let mut vertices: Vec<Vertex> = Vec::with_capacity(list.vertex_count());
        let mut ranges: Vec<(Layer, TextureKey, Range<u32>)> = Vec::with_capacity(list.batches().len());
        for batch in list.batches() {
            let start = vertices.len() as u32;
            vertices.extend_from_slice(&batch.vertices);
            ranges.push((batch.layer, batch.key, start..vertices.len() as u32));
        }

        let vertex_buffer = (!vertices.is_empty()).then(|| {
            self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("frame_vertex_buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("frame") });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(vbuf) = &vertex_buffer {
                pass.set_pipeline(&self.pipeline.render_pipeline);
                pass.set_vertex_buffer(0, vbuf.slice(..));

                for (layer, key, range) in ranges {
                    let Some(texture) = self.bind_groups.get(&key) else {
                        log::warn!("no GPU texture for {key:?}; batch skipped");
                        continue;
                    };
                    let camera = match layer {
                        Layer::World => &self.world_camera,
                        Layer::Screen => &self.screen_camera,
                    };
                    pass.set_bind_group(0, &camera.bind_group, &[]);
                    pass.set_bind_group(1, texture, &[]);
                    pass.draw(range, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
