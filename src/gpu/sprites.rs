//! Camera-facing point sprites for the smoke and the light heads.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use wgpu::util::DeviceExt;

use super::{blend_mode_to_state, depth_state, shaders, BlendMode};
use crate::assets::{SceneTextures, TextureData};
use crate::scene::Scene;

/// One sprite instance.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    pub position: [f32; 3],
    /// Size in world units at unit clip depth.
    pub size: f32,
    /// Linear RGB plus opacity.
    pub color: [f32; 4],
}

impl PointInstance {
    pub fn new(position: Vec3, size: f32, color: Vec3, opacity: f32) -> Self {
        Self {
            position: position.to_array(),
            size,
            color: [color.x, color.y, color.z, opacity],
        }
    }
}

/// Smoke instances, built once.
pub fn smoke_instances(scene: &Scene) -> Vec<PointInstance> {
    let smoke = &scene.smoke;
    smoke
        .points
        .iter()
        .map(|&p| PointInstance::new(p, smoke.size, smoke.color, smoke.opacity))
        .collect()
}

/// Light head instances for the current frame.
pub fn head_instances(scene: &Scene) -> Vec<PointInstance> {
    let size = scene.config().trails.head_size;
    scene
        .light_heads()
        .map(|(position, color)| PointInstance::new(position, size, color, 1.0))
        .collect()
}

const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32, 2 => Float32x4];

/// A set of instances sharing one texture and one pipeline.
struct SpriteBatch {
    instance_buffer: wgpu::Buffer,
    count: u32,
    bind_group: wgpu::BindGroup,
}

impl SpriteBatch {
    fn draw(&self, pass: &mut wgpu::RenderPass<'_>, pipeline: &wgpu::RenderPipeline) {
        if self.count == 0 {
            return;
        }
        pass.set_pipeline(pipeline);
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
        pass.draw(0..6, 0..self.count);
    }
}

pub struct SpriteRenderer {
    alpha_pipeline: wgpu::RenderPipeline,
    additive_pipeline: wgpu::RenderPipeline,
    smoke: SpriteBatch,
    heads: SpriteBatch,
}

impl SpriteRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        uniform_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
        scene: &Scene,
        textures: &SceneTextures,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sprite Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::sprite_shader().into()),
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Sprite Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
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

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sprite Pipeline Layout"),
            bind_group_layouts: &[uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let alpha_pipeline =
            create_pipeline(device, &layout, &shader, surface_format, BlendMode::Alpha);
        let additive_pipeline =
            create_pipeline(device, &layout, &shader, surface_format, BlendMode::Additive);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Sprite Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let white = TextureData::white();
        let smoke_view = upload_texture(
            device,
            queue,
            textures.smoke.as_ref().unwrap_or(&white),
            "Smoke Texture",
        );
        let flare_view = upload_texture(
            device,
            queue,
            textures.flare.as_ref().unwrap_or(&white),
            "Flare Texture",
        );

        let smoke = create_batch(
            device,
            &texture_layout,
            &sampler,
            &smoke_view,
            &smoke_instances(scene),
            scene.smoke.len(),
            "Smoke",
        );
        let heads = create_batch(
            device,
            &texture_layout,
            &sampler,
            &flare_view,
            &head_instances(scene),
            scene.trails.len(),
            "Light Head",
        );

        Self {
            alpha_pipeline,
            additive_pipeline,
            smoke,
            heads,
        }
    }

    /// Move the light heads. Smoke never changes.
    pub fn update(&mut self, queue: &wgpu::Queue, scene: &Scene) {
        let heads = head_instances(scene);
        if !heads.is_empty() {
            queue.write_buffer(&self.heads.instance_buffer, 0, bytemuck::cast_slice(&heads));
        }
        self.heads.count = heads.len() as u32;
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.smoke.draw(pass, &self.alpha_pipeline);
        self.heads.draw(pass, &self.additive_pipeline);
    }
}

fn create_batch(
    device: &wgpu::Device,
    texture_layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    view: &wgpu::TextureView,
    instances: &[PointInstance],
    capacity: usize,
    label: &str,
) -> SpriteBatch {
    let mut contents = vec![PointInstance::zeroed(); capacity.max(1)];
    contents[..instances.len()].copy_from_slice(instances);

    let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{label} Instance Buffer")),
        contents: bytemuck::cast_slice(&contents),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{label} Texture Bind Group")),
        layout: texture_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    SpriteBatch {
        instance_buffer,
        count: instances.len() as u32,
        bind_group,
    }
}

pub(super) fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    data: &TextureData,
    label: &str,
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: data.width,
        height: data.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &data.data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(data.width * 4),
            rows_per_image: Some(data.height),
        },
        size,
    );

    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    blend_mode: BlendMode,
) -> wgpu::RenderPipeline {
    let label = match blend_mode {
        BlendMode::Alpha => "Sprite Pipeline (alpha)",
        BlendMode::Additive => "Sprite Pipeline (additive)",
    };
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<PointInstance>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &INSTANCE_ATTRIBUTES,
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(blend_mode_to_state(blend_mode)),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        // Sprites test against the columns but never occlude each other
        depth_stencil: Some(depth_state(false, wgpu::CompareFunction::Less)),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;

    fn scene() -> Scene {
        Scene::new(SceneConfig::default().with_seed(5).with_column_count(4), 1.5)
            .expect("valid scene")
    }

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<PointInstance>(), 32);
    }

    #[test]
    fn test_smoke_instances_match_field() {
        let scene = scene();
        let instances = smoke_instances(&scene);
        assert_eq!(instances.len(), 250);
        assert_eq!(instances[0].size, 30.0);
        assert_eq!(instances[0].color[3], 0.2);
        assert_eq!(instances[0].position, scene.smoke.points[0].to_array());
    }

    #[test]
    fn test_head_instances_follow_lights() {
        let mut scene = scene();
        scene.step(0.1, 2.0);
        let heads = head_instances(&scene);
        assert_eq!(heads.len(), 4);
        for (instance, trail) in heads.iter().zip(&scene.trails) {
            assert_eq!(instance.position, trail.head().to_array());
            assert_eq!(instance.size, 2.5);
            assert_eq!(instance.color[3], 1.0);
        }
    }
}
