//! wgpu renderer for the scene.
//!
//! One render pass per frame draws, in order: the columns, the trails, the
//! glass cube, the smoke sprites, the light heads and finally the intro
//! overlay with its caption. Static geometry (columns, smoke) is uploaded
//! once; the cube, the light heads and the trails are rewritten every frame.

mod meshes;
mod overlay;
pub mod shaders;
mod sprites;
mod trails;

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use tracing::info;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::assets::SceneTextures;
use crate::error::GpuError;
use crate::scene::Scene;

use meshes::MeshRenderer;
use overlay::OverlayRenderer;
pub use sprites::PointInstance;
use sprites::SpriteRenderer;
use trails::TrailRenderer;

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// How a translucent pipeline combines with what is already drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Regular alpha blending.
    Alpha,
    /// Color is added on top, so overlapping sprites glow.
    Additive,
}

pub(crate) fn blend_mode_to_state(mode: BlendMode) -> wgpu::BlendState {
    match mode {
        BlendMode::Alpha => wgpu::BlendState::ALPHA_BLENDING,
        BlendMode::Additive => wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        },
    }
}

/// Uniform block shared by every shader (group 0, binding 0).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    pub ambient: [f32; 4],
    pub light_direction: [f32; 4],
    pub light_color: [f32; 4],
    pub fog: [f32; 4],
    /// `[aspect, overlay_opacity, 0, 0]`
    pub params: [f32; 4],
}

impl SceneUniforms {
    /// Uniform values for the current state of `scene`.
    pub fn from_scene(scene: &Scene, overlay_opacity: f32) -> Self {
        let lighting = &scene.config().lighting;
        let camera = &scene.camera;
        let ambient = lighting.ambient_color * lighting.ambient_intensity;
        let direction = lighting.directional_position.normalize_or_zero();

        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_position: camera.position().extend(1.0).to_array(),
            ambient: ambient.extend(1.0).to_array(),
            light_direction: direction.extend(lighting.directional_intensity).to_array(),
            light_color: lighting.directional_color.extend(1.0).to_array(),
            fog: lighting.fog_color.extend(lighting.fog_density).to_array(),
            params: [camera.aspect, overlay_opacity.clamp(0.0, 1.0), 0.0, 0.0],
        }
    }
}

/// Layout of the scene uniform bind group, shared by every pipeline.
pub(crate) fn scene_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Scene Uniform Bind Group Layout"),
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
    })
}

/// Depth state for a pipeline drawing into the shared depth buffer.
pub(crate) fn depth_state(write: bool, compare: wgpu::CompareFunction) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: compare,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Owns the surface, the device and every pipeline.
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    depth_texture: wgpu::TextureView,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    meshes: MeshRenderer,
    sprites: SpriteRenderer,
    trails: TrailRenderer,
    overlay: OverlayRenderer,
    clear_color: wgpu::Color,
}

impl Renderer {
    /// Set up the GPU for `window` and upload the static parts of `scene`.
    pub async fn new(
        window: Arc<Window>,
        scene: &Scene,
        textures: &SceneTextures,
    ) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        info!(adapter = %adapter.get_info().name, "Using GPU adapter");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::SurfaceUnsupported)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);

        let uniforms = SceneUniforms::from_scene(scene, 1.0);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = scene_bind_group_layout(&device);
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Uniform Bind Group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let meshes = MeshRenderer::new(&device, &uniform_layout, surface_format, scene);
        let sprites =
            SpriteRenderer::new(&device, &queue, &uniform_layout, surface_format, scene, textures);
        let trails = TrailRenderer::new(&device, &uniform_layout, surface_format, scene);
        let intro = &scene.config().intro;
        let caption = intro.enabled.then_some(intro.text.as_str());
        let overlay =
            OverlayRenderer::new(&device, &queue, &uniform_layout, surface_format, caption);

        let background = scene.config().lighting.background;
        let clear_color = wgpu::Color {
            r: background.x as f64,
            g: background.y as f64,
            b: background.z as f64,
            a: 1.0,
        };

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            uniform_buffer,
            uniform_bind_group,
            meshes,
            sprites,
            trails,
            overlay,
            clear_color,
        })
    }

    /// Reconfigure the surface and depth buffer. Zero sizes are ignored.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = create_depth_texture(&self.device, &self.config);
        }
    }

    /// Reconfigure the surface at its current size, after it was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        winit::dpi::PhysicalSize::new(self.config.width, self.config.height)
    }

    /// Upload this frame's dynamic data and draw.
    ///
    /// `overlay_opacity` and `caption_opacity` come from the intro; both are
    /// zero once it has finished.
    pub fn render(
        &mut self,
        scene: &Scene,
        overlay_opacity: f32,
        caption_opacity: f32,
    ) -> Result<(), wgpu::SurfaceError> {
        let uniforms = SceneUniforms::from_scene(scene, overlay_opacity);
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        self.meshes.update(&self.queue, scene);
        self.sprites.update(&self.queue, scene);
        self.trails.update(&self.queue, scene);
        self.overlay
            .update(&self.queue, scene.camera.aspect, caption_opacity);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            // Opaque first, then translucent back to front by kind
            self.meshes.draw_columns(&mut render_pass);
            self.trails.draw(&mut render_pass);
            self.meshes.draw_cube(&mut render_pass);
            self.sprites.draw(&mut render_pass);
            self.overlay
                .draw(&mut render_pass, overlay_opacity, caption_opacity);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

pub(crate) fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
