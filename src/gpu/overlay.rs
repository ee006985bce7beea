//! Intro overlay: the fullscreen black fade and the centered caption.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::sprites::upload_texture;
use super::{blend_mode_to_state, depth_state, shaders, BlendMode};
use crate::text::{rasterize_text, LINE_ADVANCE};

/// Half height of a one-line caption, in clip units.
pub const CAPTION_LINE_HALF_HEIGHT: f32 = 0.06;
/// Widest the caption may get, in clip units from the center.
const CAPTION_MAX_HALF_WIDTH: f32 = 0.9;

/// Clip-space half extents of a `width` x `height` pixel caption bitmap.
///
/// The caption keeps its pixel aspect on any surface and is shrunk as a
/// whole when it would not fit across the screen.
pub fn caption_half_extents(width: u32, height: u32, aspect: f32) -> [f32; 2] {
    let lines = (height.saturating_sub(1) / LINE_ADVANCE).max(1) as f32;
    let mut half_h = CAPTION_LINE_HALF_HEIGHT * lines;
    let mut half_w = half_h * width as f32 / height.max(1) as f32 / aspect.max(1e-4);
    if half_w > CAPTION_MAX_HALF_WIDTH {
        let shrink = CAPTION_MAX_HALF_WIDTH / half_w;
        half_w *= shrink;
        half_h *= shrink;
    }
    [half_w, half_h]
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct CaptionUniforms {
    /// `[half_width, half_height, opacity, 0]`
    rect: [f32; 4],
}

struct Caption {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    size: (u32, u32),
}

impl Caption {
    fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        uniform_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
        text: &str,
    ) -> Self {
        let bitmap = rasterize_text(text);
        let view = upload_texture(device, queue, &bitmap, "Caption Texture");

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Caption Uniform Buffer"),
            contents: bytemuck::bytes_of(&CaptionUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        // Nearest keeps the bitmap glyphs crisp when scaled up
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Caption Sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Caption Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Caption Bind Group"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Caption Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::caption_shader().into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Caption Pipeline Layout"),
            bind_group_layouts: &[uniform_layout, &layout],
            push_constant_ranges: &[],
        });
        let pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            "Caption Pipeline",
        );

        Self {
            pipeline,
            uniform_buffer,
            bind_group,
            size: (bitmap.width, bitmap.height),
        }
    }
}

/// Pipelines for everything the intro draws on top of the scene.
pub struct OverlayRenderer {
    pipeline: wgpu::RenderPipeline,
    caption: Option<Caption>,
}

impl OverlayRenderer {
    /// `caption` is the intro text, or `None` when the intro is off.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        uniform_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
        caption: Option<&str>,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Overlay Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::overlay_shader().into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Overlay Pipeline Layout"),
            bind_group_layouts: &[uniform_layout],
            push_constant_ranges: &[],
        });

        let pipeline =
            create_pipeline(device, &layout, &shader, surface_format, "Overlay Pipeline");

        let caption = caption
            .filter(|text| !text.trim().is_empty())
            .map(|text| Caption::new(device, queue, uniform_layout, surface_format, text));

        Self { pipeline, caption }
    }

    /// Place the caption for the current surface aspect and set its opacity.
    pub fn update(&self, queue: &wgpu::Queue, aspect: f32, caption_opacity: f32) {
        if let Some(caption) = &self.caption {
            let [half_w, half_h] = caption_half_extents(caption.size.0, caption.size.1, aspect);
            let uniforms = CaptionUniforms {
                rect: [half_w, half_h, caption_opacity.clamp(0.0, 1.0), 0.0],
            };
            queue.write_buffer(&caption.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        }
    }

    /// Draw the black overlay, then the caption, skipping whichever is
    /// fully transparent.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, opacity: f32, caption_opacity: f32) {
        if opacity > 0.0 {
            pass.set_pipeline(&self.pipeline);
            pass.draw(0..3, 0..1);
        }
        if let Some(caption) = self.caption.as_ref().filter(|_| caption_opacity > 0.0) {
            pass.set_pipeline(&caption.pipeline);
            pass.set_bind_group(1, &caption.bind_group, &[]);
            pass.draw(0..6, 0..1);
        }
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(blend_mode_to_state(BlendMode::Alpha)),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        // Covers everything regardless of depth
        depth_stencil: Some(depth_state(false, wgpu::CompareFunction::Always)),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_uniform_size() {
        assert_eq!(std::mem::size_of::<CaptionUniforms>(), 16);
    }

    #[test]
    fn test_caption_keeps_pixel_aspect() {
        let bitmap = rasterize_text("Night");
        let [w, h] = caption_half_extents(bitmap.width, bitmap.height, 16.0 / 9.0);
        assert!((h - CAPTION_LINE_HALF_HEIGHT).abs() < 1e-6);
        // Undo the aspect correction to compare in pixel units
        let ratio = w * (16.0 / 9.0) / h;
        assert!((ratio - bitmap.width as f32 / bitmap.height as f32).abs() < 1e-4);
    }

    #[test]
    fn test_long_caption_fits_on_screen() {
        let bitmap = rasterize_text(&"NOCTURNE ".repeat(12));
        let [w, h] = caption_half_extents(bitmap.width, bitmap.height, 1.0);
        assert!(w <= CAPTION_MAX_HALF_WIDTH + 1e-6);
        assert!(h < CAPTION_LINE_HALF_HEIGHT);
    }

    #[test]
    fn test_two_lines_are_taller() {
        let one = rasterize_text("AB");
        let two = rasterize_text("AB\nCD");
        let [_, h1] = caption_half_extents(one.width, one.height, 1.0);
        let [_, h2] = caption_half_extents(two.width, two.height, 1.0);
        assert!(h2 > h1);
    }
}
