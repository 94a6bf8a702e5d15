//! Text material utilities
//!
//! Helpers for building the material parameters text renderers hand to the
//! host. Text can be drawn with two kinds of material:
//! - **Basic**: textured, alpha-tested, double-sided; the host picks a
//!   distance-field shading function for SDF/MSDF atlases
//! - **Shader**: a user shader that receives the same uniforms plus `time`

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use super::color::Color;
use super::font_table::{FontTable, RenderingMode};
use super::options::{EffectiveOptions, EffectiveShadow};
use crate::render::TextureHandle;

/// Alpha cutoff for basic text materials
pub const ALPHA_TEST: f32 = 0.1;

/// Kind of material object the host creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    /// Built-in textured material
    #[default]
    Basic,
    /// User shader
    Shader,
}

/// User shader reference and its static uniforms
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShaderParams {
    /// Host identifier of the shader asset
    pub shader_id: String,
    /// Extra float uniforms
    pub uniforms: BTreeMap<String, f32>,
}

impl ShaderParams {
    /// Reference a shader without extra uniforms
    pub fn new(shader_id: impl Into<String>) -> Self {
        Self { shader_id: shader_id.into(), uniforms: BTreeMap::new() }
    }
}

/// Uniforms and render state of a text material
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialParams {
    /// Tint
    pub color: Color,
    /// Opacity in the 0.0-1.0 range
    pub opacity: f32,
    /// Atlas texture; absent while the font image is still loading
    pub texture: Option<TextureHandle>,
    /// How the atlas must be sampled
    pub rendering_mode: RenderingMode,
    /// Fragments below this alpha are discarded
    pub alpha_test: f32,
    /// Draw back faces too
    pub double_sided: bool,
    /// Needs alpha blending
    pub transparent: bool,
    /// Seconds since the renderer started, for time-varying shaders
    pub time: f32,
    /// User shader, for [`MaterialKind::Shader`]
    pub shader: Option<ShaderParams>,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            opacity: 1.0,
            texture: None,
            rendering_mode: RenderingMode::Bitmap,
            alpha_test: ALPHA_TEST,
            double_sided: true,
            transparent: false,
            time: 0.0,
            shader: None,
        }
    }
}

impl MaterialParams {
    /// Parameters for the main text material
    pub fn text(font: &FontTable, options: &EffectiveOptions, shader: Option<&ShaderParams>, time: f32) -> Self {
        Self::tinted(font, options.color, options.opacity, shader, time)
    }

    /// Parameters for the drop shadow material
    ///
    /// The shadow follows the text's opacity so fading text fades its shadow.
    pub fn shadow(
        font: &FontTable,
        shadow: &EffectiveShadow,
        opacity: f32,
        shader: Option<&ShaderParams>,
        time: f32,
    ) -> Self {
        Self::tinted(font, shadow.color, opacity, shader, time)
    }

    fn tinted(font: &FontTable, color: Color, opacity: f32, shader: Option<&ShaderParams>, time: f32) -> Self {
        Self {
            color,
            opacity,
            texture: font.texture(),
            rendering_mode: font.rendering_mode(),
            transparent: opacity < 1.0,
            time,
            shader: shader.cloned(),
            ..Self::default()
        }
    }
}

/// Identity of a material object
///
/// Uniform changes update a material in place; a different variant needs a
/// new material object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialVariant {
    /// Material kind
    pub kind: MaterialKind,
    /// Atlas sampling mode
    pub rendering_mode: RenderingMode,
    /// Shader asset, for shader materials
    pub shader_id: Option<String>,
}

impl MaterialVariant {
    /// Variant needed to draw `font` with the given material choice
    pub fn for_font(font: &FontTable, kind: MaterialKind, shader: Option<&ShaderParams>) -> Self {
        Self {
            kind,
            rendering_mode: font.rendering_mode(),
            shader_id: match kind {
                MaterialKind::Basic => None,
                MaterialKind::Shader => shader.map(|s| s.shader_id.clone()),
            },
        }
    }
}
