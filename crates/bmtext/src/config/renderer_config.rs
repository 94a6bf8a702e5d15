//! Per-renderer configuration
//!
//! The stored form of a text component: which font asset to draw with, the
//! text itself and its layout options. Older files without a format version
//! are upgraded by [`TextRendererConfig::migrate`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::render::RenderHost;
use crate::text::{
    Alignment, Color, DropShadow, FontTable, LayoutOptions, MaterialKind, ShaderParams,
    TextRenderer, VerticalAlignment,
};

/// Format version written by this crate
pub const CURRENT_FORMAT_VERSION: u32 = 1;

/// Stored configuration of one text renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextRendererConfig {
    /// Format version; absent in files written before versioning
    #[serde(default)]
    pub format_version: Option<u32>,
    /// Font asset resolved by the host
    pub font_asset_id: Option<String>,
    /// Text to draw
    pub text: String,
    /// Horizontal alignment
    pub alignment: Alignment,
    /// Vertical alignment
    pub vertical_alignment: VerticalAlignment,
    /// Character spacing override
    pub character_spacing: Option<f32>,
    /// Line spacing override
    pub line_spacing: Option<f32>,
    /// Color override as `rrggbb`
    pub color: Option<String>,
    /// Opacity override
    pub opacity: Option<f32>,
    /// Drop shadow
    pub drop_shadow: Option<DropShadow>,
    /// Material used to draw the text
    pub material_kind: MaterialKind,
    /// Shader asset for [`MaterialKind::Shader`]
    pub shader_asset_id: Option<String>,
}

impl Default for TextRendererConfig {
    fn default() -> Self {
        Self {
            format_version: Some(CURRENT_FORMAT_VERSION),
            font_asset_id: None,
            text: "Text".to_string(),
            alignment: Alignment::Center,
            vertical_alignment: VerticalAlignment::Center,
            character_spacing: None,
            line_spacing: None,
            color: None,
            opacity: None,
            drop_shadow: None,
            material_kind: MaterialKind::Basic,
            shader_asset_id: None,
        }
    }
}

impl Config for TextRendererConfig {}

impl TextRendererConfig {
    /// Upgrade to the current format version
    ///
    /// Returns whether anything changed.
    pub fn migrate(&mut self) -> bool {
        match self.format_version {
            Some(_) => false,
            None => {
                log::debug!("Migrating text renderer config to version {}", CURRENT_FORMAT_VERSION);
                self.format_version = Some(CURRENT_FORMAT_VERSION);
                true
            }
        }
    }

    /// Check values a renderer would otherwise silently fall back on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(version) = self.format_version {
            if version > CURRENT_FORMAT_VERSION {
                return Err(ConfigError::Invalid {
                    field: "format_version",
                    reason: format!("version {version} is newer than {CURRENT_FORMAT_VERSION}"),
                });
            }
        }
        if let Some(color) = &self.color {
            Color::from_hex(color).map_err(|e| ConfigError::Invalid { field: "color", reason: e.to_string() })?;
        }
        if let Some(shadow) = &self.drop_shadow {
            Color::from_hex(&shadow.color)
                .map_err(|e| ConfigError::Invalid { field: "drop_shadow.color", reason: e.to_string() })?;
        }
        if let Some(opacity) = self.opacity {
            if !(0.0..=1.0).contains(&opacity) {
                return Err(ConfigError::Invalid {
                    field: "opacity",
                    reason: format!("{opacity} is outside 0.0-1.0"),
                });
            }
        }
        if self.material_kind == MaterialKind::Shader && self.shader_asset_id.is_none() {
            return Err(ConfigError::Invalid {
                field: "shader_asset_id",
                reason: "shader materials need a shader asset".to_string(),
            });
        }
        Ok(())
    }

    /// Layout options described by this config
    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            alignment: self.alignment,
            vertical_alignment: self.vertical_alignment,
            character_spacing: self.character_spacing,
            line_spacing: self.line_spacing,
            color: self.color.clone(),
            opacity: self.opacity,
            drop_shadow: self.drop_shadow.clone(),
        }
    }

    /// Shader reference for shader materials
    pub fn shader_params(&self) -> Option<ShaderParams> {
        match self.material_kind {
            MaterialKind::Basic => None,
            MaterialKind::Shader => self.shader_asset_id.as_deref().map(ShaderParams::new),
        }
    }

    /// Push this config into a renderer
    ///
    /// `font` is the table the host resolved from
    /// [`font_asset_id`](Self::font_asset_id); `None` leaves the renderer idle
    /// until a font arrives. Nothing is rebuilt until the renderer syncs.
    pub fn apply<H: RenderHost>(&self, renderer: &mut TextRenderer<H>, font: Option<Arc<FontTable>>) {
        renderer.set_font(font, self.material_kind, self.shader_params());
        renderer.set_options(self.layout_options());
        renderer.set_text(self.text.as_str());
    }
}
