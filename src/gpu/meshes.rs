//! Lit triangle meshes: the static columns and the spinning glass cube.

use wgpu::util::DeviceExt;

use super::{blend_mode_to_state, depth_state, shaders, BlendMode};
use crate::mesh::{Mesh, MeshVertex};
use crate::scene::Scene;

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x4];

struct MeshBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    fn new(device: &wgpu::Device, mesh: &Mesh, label: &str, dynamic: bool) -> Self {
        let mut vertex_usage = wgpu::BufferUsages::VERTEX;
        if dynamic {
            vertex_usage |= wgpu::BufferUsages::COPY_DST;
        }
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: vertex_usage,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>, pipeline: &wgpu::RenderPipeline) {
        if self.index_count == 0 {
            return;
        }
        pass.set_pipeline(pipeline);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Pipelines and buffers for every triangle mesh in the scene.
pub struct MeshRenderer {
    solid_pipeline: wgpu::RenderPipeline,
    glass_pipeline: wgpu::RenderPipeline,
    columns: MeshBuffers,
    cube: MeshBuffers,
}

impl MeshRenderer {
    pub fn new(
        device: &wgpu::Device,
        uniform_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
        scene: &Scene,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::mesh_shader().into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[uniform_layout],
            push_constant_ranges: &[],
        });

        let solid_pipeline = create_pipeline(
            device,
            &layout,
            &shader,
            surface_format,
            "Column Pipeline",
            None,
            Some(wgpu::Face::Back),
            true,
        );
        // The cube is seen through, so both faces draw and depth is left alone
        let glass_pipeline = create_pipeline(
            device,
            &layout,
            &shader,
            surface_format,
            "Glass Pipeline",
            Some(blend_mode_to_state(BlendMode::Alpha)),
            None,
            false,
        );

        let columns = MeshBuffers::new(device, &scene.columns.merged_mesh(), "Column", false);
        let cube = MeshBuffers::new(device, &scene.cube.world_mesh(), "Cube", true);

        Self {
            solid_pipeline,
            glass_pipeline,
            columns,
            cube,
        }
    }

    /// Rewrite the cube vertices with its current rotation.
    pub fn update(&mut self, queue: &wgpu::Queue, scene: &Scene) {
        let mesh = scene.cube.world_mesh();
        queue.write_buffer(&self.cube.vertex_buffer, 0, bytemuck::cast_slice(&mesh.vertices));
    }

    pub fn draw_columns(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.columns.draw(pass, &self.solid_pipeline);
    }

    pub fn draw_cube(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.cube.draw(pass, &self.glass_pipeline);
    }
}

#[allow(clippy::too_many_arguments)]
fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    label: &str,
    blend: Option<wgpu::BlendState>,
    cull_mode: Option<wgpu::Face>,
    depth_write: bool,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &VERTEX_ATTRIBUTES,
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(depth_state(depth_write, wgpu::CompareFunction::Less)),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
