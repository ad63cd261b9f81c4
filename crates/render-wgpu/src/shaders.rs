/// WGSL shader for the instanced cube pass.
///
/// The fragment stage reproduces the fixed blend of the demo's material
/// model: `(1 - w) * base_color + w * texture`, with the texture chosen
/// per instance (0 = dirt, 1 = wall). Both textures are sampled
/// unconditionally to keep control flow uniform.
pub const CUBE_SHADER: &str = r#"
struct Uniforms {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(1) @binding(0)
var t_dirt: texture_2d<f32>;
@group(1) @binding(1)
var t_wall: texture_2d<f32>;
@group(1) @binding(2)
var samp: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
    @location(7) material: vec2<f32>, // x = tex weight, y = tex selector
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec4<f32>,
    @location(2) material: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );

    var out: VertexOutput;
    out.clip_position = uniforms.proj * uniforms.view * model * vec4<f32>(vertex.position, 1.0);
    out.uv = vertex.uv;
    out.color = instance.color;
    out.material = instance.material;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let dirt = textureSample(t_dirt, samp, in.uv);
    let wall = textureSample(t_wall, samp, in.uv);
    let tex = select(dirt, wall, in.material.y > 0.5);
    let w = in.material.x;
    return (1.0 - w) * in.color + w * tex;
}
"#;
