//! WGSL sources for every render pipeline.
//!
//! All shaders share the scene uniform block and the fog helper from
//! [`PRELUDE`]; each `*_shader()` function returns a complete module.

/// Scene uniforms and exponential-squared fog. Must match
/// [`SceneUniforms`](super::SceneUniforms) field for field.
pub const PRELUDE: &str = r#"
struct SceneUniforms {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    // rgb = ambient color * intensity
    ambient: vec4<f32>,
    // xyz = unit vector towards the light, w = intensity
    light_direction: vec4<f32>,
    light_color: vec4<f32>,
    // rgb = fog color, w = density
    fog: vec4<f32>,
    // x = aspect, y = overlay opacity
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> scene: SceneUniforms;

fn apply_fog(color: vec3<f32>, world_position: vec3<f32>) -> vec3<f32> {
    let dist = distance(world_position, scene.camera_position.xyz);
    let density = scene.fog.w;
    let factor = 1.0 - exp(-density * density * dist * dist);
    return mix(color, scene.fog.rgb, clamp(factor, 0.0, 1.0));
}
"#;

const MESH_BODY: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = scene.view_proj * vec4<f32>(in.position, 1.0);
    out.world_position = in.position;
    out.normal = in.normal;
    out.color = in.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.normal);
    let diffuse = max(dot(n, scene.light_direction.xyz), 0.0) * scene.light_direction.w;
    let lit = in.color.rgb * (scene.ambient.rgb + scene.light_color.rgb * diffuse);
    return vec4<f32>(apply_fog(lit, in.world_position), in.color.a);
}
"#;

const SPRITE_BODY: &str = r#"
@group(1) @binding(0)
var sprite_texture: texture_2d<f32>;
@group(1) @binding(1)
var sprite_sampler: sampler;

struct InstanceInput {
    @location(0) position: vec3<f32>,
    @location(1) size: f32,
    @location(2) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec4<f32>,
    @location(2) world_position: vec3<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32, instance: InstanceInput) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let quad = corners[vertex_index];

    // Offsetting in clip space keeps the sprite facing the camera and
    // shrinks it with distance.
    var clip = scene.view_proj * vec4<f32>(instance.position, 1.0);
    let aspect = max(scene.params.x, 0.0001);
    clip.x += quad.x * 0.5 * instance.size / aspect;
    clip.y += quad.y * 0.5 * instance.size;

    var out: VertexOutput;
    out.clip_position = clip;
    out.uv = vec2<f32>(quad.x * 0.5 + 0.5, 0.5 - quad.y * 0.5);
    out.color = instance.color;
    out.world_position = instance.position;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let tex = textureSample(sprite_texture, sprite_sampler, in.uv);
    let d = length(in.uv * 2.0 - vec2<f32>(1.0, 1.0));
    let mask = 1.0 - smoothstep(0.6, 1.0, d);
    let rgb = apply_fog(in.color.rgb * tex.rgb, in.world_position);
    return vec4<f32>(rgb, in.color.a * tex.a * mask);
}
"#;

const TRAIL_BODY: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) world_position: vec3<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = scene.view_proj * vec4<f32>(in.position, 1.0);
    out.color = in.color;
    out.world_position = in.position;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(apply_fog(in.color, in.world_position), 1.0);
}
"#;

const OVERLAY_BODY: &str = r#"
@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> @builtin(position) vec4<f32> {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );
    return vec4<f32>(positions[vertex_index], 0.0, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(0.0, 0.0, 0.0, clamp(scene.params.y, 0.0, 1.0));
}
"#;

const CAPTION_BODY: &str = r#"
// xy = half extents in clip space, z = opacity
struct CaptionUniforms {
    rect: vec4<f32>,
};

@group(1) @binding(0)
var<uniform> caption: CaptionUniforms;
@group(1) @binding(1)
var caption_texture: texture_2d<f32>;
@group(1) @binding(2)
var caption_sampler: sampler;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let quad = corners[vertex_index];

    var out: VertexOutput;
    out.clip_position = vec4<f32>(quad * caption.rect.xy, 0.0, 1.0);
    out.uv = vec2<f32>(quad.x * 0.5 + 0.5, 0.5 - quad.y * 0.5);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let tex = textureSample(caption_texture, caption_sampler, in.uv);
    return vec4<f32>(tex.rgb, tex.a * clamp(caption.rect.z, 0.0, 1.0));
}
"#;

fn with_prelude(body: &str) -> String {
    format!("{PRELUDE}\n{body}")
}

/// Lit, vertex-colored triangle meshes (columns and glass cube).
pub fn mesh_shader() -> String {
    with_prelude(MESH_BODY)
}

/// Camera-facing instanced quads (smoke and light heads).
pub fn sprite_shader() -> String {
    with_prelude(SPRITE_BODY)
}

/// Vertex-colored line strips for the light trails.
pub fn trail_shader() -> String {
    with_prelude(TRAIL_BODY)
}

/// Fullscreen black overlay used by the intro.
pub fn overlay_shader() -> String {
    with_prelude(OVERLAY_BODY)
}

/// Centered intro caption drawn from a bitmap texture.
pub fn caption_shader() -> String {
    with_prelude(CAPTION_BODY)
}

/// Every shader with a label, for validation and pipeline creation.
pub fn all_shaders() -> Vec<(&'static str, String)> {
    vec![
        ("mesh", mesh_shader()),
        ("sprite", sprite_shader()),
        ("trail", trail_shader()),
        ("overlay", overlay_shader()),
        ("caption", caption_shader()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_shader_has_entry_points() {
        for (name, src) in all_shaders() {
            assert!(src.contains("fn vs_main"), "{} lacks vs_main", name);
            assert!(src.contains("fn fs_main"), "{} lacks fs_main", name);
            assert!(src.contains("struct SceneUniforms"), "{} lacks uniforms", name);
        }
    }
}
