//! Font table for bitmap font text rendering
//!
//! This module holds the immutable per-font data produced from a parsed BMFont
//! descriptor: glyph metrics indexed by character code, sparse kerning pairs,
//! common metrics, and the defaults that layout options fall back to.
//!
//! Parsing the binary/XML/text BMFont formats happens upstream; this module
//! starts from a [`FontDescriptor`], which is a plain serde structure.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

use super::color::{Color, ColorError};
use crate::config::Config;
use crate::render::TextureHandle;

/// Result type for font operations
pub type FontResult<T> = Result<T, FontError>;

/// Errors that can occur while building a font table
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// Atlas dimensions are zero, so UVs cannot be normalized
    #[error("Invalid atlas dimensions {0}x{1}")]
    InvalidAtlas(u32, u32),

    /// Pixels per unit must be a positive finite number
    #[error("Invalid pixels per unit: {0}")]
    InvalidPixelsPerUnit(f32),

    /// The default font color could not be parsed
    #[error("Invalid default color: {0}")]
    InvalidColor(#[from] ColorError),
}

/// Shading function a font atlas requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderingMode {
    /// Plain coverage bitmap
    #[default]
    Bitmap,
    /// Single-channel signed distance field
    Sdf,
    /// Multi-channel signed distance field
    Msdf,
}

impl RenderingMode {
    /// Whether the atlas stores distance values instead of coverage
    pub const fn is_distance_field(self) -> bool {
        matches!(self, Self::Sdf | Self::Msdf)
    }
}

/// Metrics of one glyph in the atlas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphMetric {
    /// Character code
    pub id: u32,
    /// Atlas rectangle left edge in pixels
    pub x: u32,
    /// Atlas rectangle top edge in pixels
    pub y: u32,
    /// Atlas rectangle width in pixels
    pub width: u32,
    /// Atlas rectangle height in pixels
    pub height: u32,
    /// Horizontal render offset from the cursor
    pub xoff: i32,
    /// Vertical render offset from the line top
    pub yoff: i32,
    /// Horizontal advance before spacing
    pub xadv: i32,
}

/// Advance adjustment between two consecutive character codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KerningPair {
    /// Preceding character code
    pub first: u32,
    /// Following character code
    pub second: u32,
    /// Adjustment added to the cursor before the second glyph
    pub amount: i32,
}

/// Metrics shared by every glyph of a font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommonMetrics {
    /// Distance between two consecutive lines
    pub line_height: u32,
    /// Distance from the line top to the baseline
    pub base: u32,
    /// Atlas texture width in pixels
    #[serde(alias = "scale_w")]
    pub atlas_width: u32,
    /// Atlas texture height in pixels
    #[serde(alias = "scale_h")]
    pub atlas_height: u32,
}

/// Parsed BMFont descriptor plus the per-font defaults the asset carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontDescriptor {
    /// Common metrics block
    pub common: CommonMetrics,
    /// Glyph metrics
    pub chars: Vec<GlyphMetric>,
    /// Kerning pairs
    pub kernings: Vec<KerningPair>,
    /// Glyph pixels per world unit
    pub pixels_per_unit: f32,
    /// Default text color as `rrggbb`
    pub color: String,
    /// Default opacity, `None` means fully opaque
    pub opacity: Option<f32>,
    /// Default extra advance between characters
    pub character_spacing: f32,
    /// Default extra distance between lines
    pub line_spacing: f32,
    /// Atlas shading mode
    pub rendering_mode: RenderingMode,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            common: CommonMetrics::default(),
            chars: Vec::new(),
            kernings: Vec::new(),
            pixels_per_unit: 20.0,
            color: "ffffff".to_string(),
            opacity: None,
            character_spacing: 0.0,
            line_spacing: 0.0,
            rendering_mode: RenderingMode::Bitmap,
        }
    }
}

impl Config for FontDescriptor {}

/// Immutable glyph and kerning tables for one font
///
/// A font table is read-only once built and is meant to be shared between
/// many renderers through an `Arc`.
#[derive(Debug, Clone)]
pub struct FontTable {
    common: CommonMetrics,
    glyphs: HashMap<u32, GlyphMetric>,
    kernings: HashMap<(u32, u32), i32>,
    default_color: Color,
    default_opacity: Option<f32>,
    default_character_spacing: f32,
    default_line_spacing: f32,
    pixels_per_unit: f32,
    rendering_mode: RenderingMode,
    texture: Option<TextureHandle>,
}

impl FontTable {
    /// Build a font table from a parsed descriptor
    ///
    /// Duplicate glyph ids or kerning pairs keep the last entry.
    pub fn from_descriptor(descriptor: &FontDescriptor) -> FontResult<Self> {
        let common = descriptor.common;
        if common.atlas_width == 0 || common.atlas_height == 0 {
            return Err(FontError::InvalidAtlas(common.atlas_width, common.atlas_height));
        }
        if !(descriptor.pixels_per_unit.is_finite() && descriptor.pixels_per_unit > 0.0) {
            return Err(FontError::InvalidPixelsPerUnit(descriptor.pixels_per_unit));
        }
        let default_color = Color::from_hex(&descriptor.color)?;

        let glyphs: HashMap<u32, GlyphMetric> = descriptor
            .chars
            .iter()
            .map(|glyph| (glyph.id, *glyph))
            .collect();
        let kernings: HashMap<(u32, u32), i32> = descriptor
            .kernings
            .iter()
            .map(|pair| ((pair.first, pair.second), pair.amount))
            .collect();

        if glyphs.len() != descriptor.chars.len() {
            log::debug!(
                "Font descriptor has {} duplicate glyph ids",
                descriptor.chars.len() - glyphs.len()
            );
        }

        log::info!(
            "Built font table: {} glyphs, {} kerning pairs, atlas {}x{}, {:?}",
            glyphs.len(),
            kernings.len(),
            common.atlas_width,
            common.atlas_height,
            descriptor.rendering_mode
        );

        Ok(Self {
            common,
            glyphs,
            kernings,
            default_color,
            default_opacity: descriptor.opacity,
            default_character_spacing: descriptor.character_spacing,
            default_line_spacing: descriptor.line_spacing,
            pixels_per_unit: descriptor.pixels_per_unit,
            rendering_mode: descriptor.rendering_mode,
            texture: None,
        })
    }

    /// Attach the atlas texture supplied by the font asset
    #[must_use]
    pub fn with_texture(mut self, texture: TextureHandle) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Get glyph metrics for a character code
    pub fn lookup_glyph(&self, code: u32) -> Option<&GlyphMetric> {
        self.glyphs.get(&code)
    }

    /// Get the kerning adjustment between two character codes, 0 when absent
    pub fn lookup_kerning(&self, prev_code: u32, code: u32) -> i32 {
        self.kernings.get(&(prev_code, code)).copied().unwrap_or(0)
    }

    /// Common metrics block
    pub const fn common(&self) -> &CommonMetrics {
        &self.common
    }

    /// Distance between two consecutive lines, before extra line spacing
    pub fn line_height(&self) -> f32 {
        self.common.line_height as f32
    }

    /// Atlas dimensions in pixels
    pub const fn atlas_dimensions(&self) -> (u32, u32) {
        (self.common.atlas_width, self.common.atlas_height)
    }

    /// Number of glyphs in the table
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Default text color
    pub const fn default_color(&self) -> Color {
        self.default_color
    }

    /// Default opacity, `None` when the font does not specify one
    pub const fn default_opacity(&self) -> Option<f32> {
        self.default_opacity
    }

    /// Default extra advance between characters
    pub const fn default_character_spacing(&self) -> f32 {
        self.default_character_spacing
    }

    /// Default extra distance between lines
    pub const fn default_line_spacing(&self) -> f32 {
        self.default_line_spacing
    }

    /// Glyph pixels per world unit
    pub const fn pixels_per_unit(&self) -> f32 {
        self.pixels_per_unit
    }

    /// Atlas shading mode
    pub const fn rendering_mode(&self) -> RenderingMode {
        self.rendering_mode
    }

    /// Atlas texture, if the asset has finished loading one
    pub const fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> FontDescriptor {
        FontDescriptor {
            common: CommonMetrics { line_height: 20, base: 16, atlas_width: 128, atlas_height: 64 },
            chars: vec![
                GlyphMetric { id: 65, x: 0, y: 0, width: 8, height: 16, xoff: 0, yoff: 16, xadv: 10 },
                GlyphMetric { id: 86, x: 8, y: 0, width: 8, height: 16, xoff: 1, yoff: 16, xadv: 10 },
            ],
            kernings: vec![KerningPair { first: 65, second: 86, amount: -2 }],
            ..FontDescriptor::default()
        }
    }

    #[test]
    fn test_lookup_glyph_and_kerning() {
        let font = FontTable::from_descriptor(&descriptor()).unwrap();

        assert_eq!(font.glyph_count(), 2);
        assert_eq!(font.lookup_glyph(65).map(|g| g.xadv), Some(10));
        assert!(font.lookup_glyph(66).is_none());

        assert_eq!(font.lookup_kerning(65, 86), -2);
        // Kerning is ordered
        assert_eq!(font.lookup_kerning(86, 65), 0);
        assert_eq!(font.lookup_kerning(0, 65), 0);
    }

    #[test]
    fn test_descriptor_defaults_flow_into_table() {
        let font = FontTable::from_descriptor(&descriptor()).unwrap();

        assert_eq!(font.default_color(), Color::WHITE);
        assert_eq!(font.default_opacity(), None);
        assert_eq!(font.pixels_per_unit(), 20.0);
        assert_eq!(font.rendering_mode(), RenderingMode::Bitmap);
        assert!(font.texture().is_none());

        let font = font.with_texture(TextureHandle(7));
        assert_eq!(font.texture(), Some(TextureHandle(7)));
    }

    #[test]
    fn test_invalid_descriptors() {
        let mut d = descriptor();
        d.common.atlas_width = 0;
        assert!(matches!(FontTable::from_descriptor(&d), Err(FontError::InvalidAtlas(0, 64))));

        let mut d = descriptor();
        d.pixels_per_unit = 0.0;
        assert!(matches!(FontTable::from_descriptor(&d), Err(FontError::InvalidPixelsPerUnit(_))));

        let mut d = descriptor();
        d.color = "white".to_string();
        assert!(matches!(FontTable::from_descriptor(&d), Err(FontError::InvalidColor(_))));
    }

    #[test]
    fn test_descriptor_from_ron_accepts_bmfont_names() {
        let ron = r#"(
            common: (line_height: 32, base: 26, scale_w: 256, scale_h: 256),
            chars: [(id: 65, x: 0, y: 0, width: 10, height: 20, xoff: 0, yoff: 6, xadv: 12)],
            rendering_mode: msdf,
        )"#;
        let d = FontDescriptor::from_ron_str(ron).unwrap();

        assert_eq!(d.common.atlas_width, 256);
        assert_eq!(d.pixels_per_unit, 20.0);
        assert_eq!(d.rendering_mode, RenderingMode::Msdf);
        assert!(d.rendering_mode.is_distance_field());
    }
}
