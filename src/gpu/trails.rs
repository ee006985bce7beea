//! Light trail rendering.
//!
//! Each trail gets its own vertex buffer sized for the full history. Every
//! frame the visible prefix is copied in and drawn as one line strip; points
//! past the visible length are never read.

use super::{depth_state, shaders};
use crate::scene::Scene;
use crate::trails::TrailVertex;

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

struct TrailBuffer {
    buffer: wgpu::Buffer,
    visible_len: u32,
}

/// GPU resources for trail rendering.
pub struct TrailRenderer {
    pipeline: wgpu::RenderPipeline,
    buffers: Vec<TrailBuffer>,
}

impl TrailRenderer {
    pub fn new(
        device: &wgpu::Device,
        uniform_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
        scene: &Scene,
    ) -> Self {
        let buffers = scene
            .trails
            .iter()
            .enumerate()
            .map(|(i, trail)| {
                let size = trail.max_points() * std::mem::size_of::<TrailVertex>();
                TrailBuffer {
                    buffer: device.create_buffer(&wgpu::BufferDescriptor {
                        label: Some(&format!("Trail Buffer {i}")),
                        size: size as wgpu::BufferAddress,
                        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                        mapped_at_creation: false,
                    }),
                    visible_len: 0,
                }
            })
            .collect();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Trail Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::trail_shader().into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Trail Pipeline Layout"),
            bind_group_layouts: &[uniform_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Trail Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<TrailVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &VERTEX_ATTRIBUTES,
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(depth_state(true, wgpu::CompareFunction::Less)),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self { pipeline, buffers }
    }

    /// Copy every trail's visible prefix to its buffer.
    pub fn update(&mut self, queue: &wgpu::Queue, scene: &Scene) {
        for (gpu, trail) in self.buffers.iter_mut().zip(&scene.trails) {
            let visible = trail.visible_points();
            if !visible.is_empty() {
                queue.write_buffer(&gpu.buffer, 0, bytemuck::cast_slice(visible));
            }
            gpu.visible_len = visible.len() as u32;
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        for gpu in &self.buffers {
            // A strip needs two points to show anything
            if gpu.visible_len < 2 {
                continue;
            }
            pass.set_vertex_buffer(0, gpu.buffer.slice(..));
            pass.draw(0..gpu.visible_len, 0..1);
        }
    }
}
