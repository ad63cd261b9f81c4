use voxrelic_common::Color;
use voxrelic_math::Mat4;

/// Selector into the small fixed set of bound textures.
///
/// The texture provider binds dirt to unit 0 and wall to unit 1 before the
/// first frame renders; core logic only ever names textures through this
/// enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureId {
    Dirt,
    Wall,
}

impl TextureId {
    /// The texture unit this selector is bound to.
    pub fn index(self) -> u32 {
        match self {
            TextureId::Dirt => 0,
            TextureId::Wall => 1,
        }
    }
}

/// One draw, fully parameterized by value.
///
/// `tex_weight` blends between the base color and the sampled texture:
/// 0 is solid color, 1 is fully textured, anything between is the linear
/// mix `(1 - w) * color + w * tex`.
#[derive(Debug, Clone, Copy)]
pub struct DrawCall {
    pub model: Mat4,
    pub color: Color,
    pub tex_weight: f32,
    pub texture: TextureId,
}

/// Renderer-agnostic seam. A renderer consumes the per-frame view and
/// projection matrices plus the frame's draw calls and produces output.
pub trait Renderer {
    type Output;

    fn render(&self, view: &Mat4, proj: &Mat4, calls: &[DrawCall]) -> Self::Output;
}

/// Text backend: summarizes a frame as a human-readable string.
///
/// Used by the CLI and tests to exercise the full draw path without a GPU.
#[derive(Debug, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, view: &Mat4, proj: &Mat4, calls: &[DrawCall]) -> String {
        let dirt = calls.iter().filter(|c| c.texture == TextureId::Dirt).count();
        let wall = calls.iter().filter(|c| c.texture == TextureId::Wall).count();
        let solid = calls.iter().filter(|c| c.tex_weight == 0.0).count();

        let mut out = String::new();
        out.push_str(&format!("draws: {} (dirt: {dirt}, wall: {wall}, solid: {solid})\n", calls.len()));
        out.push_str(&format!(
            "view translation: ({:.2}, {:.2}, {:.2})\n",
            view.m[12], view.m[13], view.m[14]
        ));
        out.push_str(&format!("proj focal: ({:.3}, {:.3})\n", proj.m[0], proj.m[5]));
        out
    }
}
