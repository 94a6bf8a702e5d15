//! Layout options and their resolution against font defaults
//!
//! Every optional field of [`LayoutOptions`] falls back to the font table's
//! default when it is unset. That precedence lives in one place,
//! [`LayoutOptions::resolve`], and everything downstream works on the
//! resulting [`EffectiveOptions`].

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::font_table::FontTable;

/// Horizontal alignment of each line relative to the origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Lines start at x = 0
    Left,
    /// Lines are centered on x = 0
    #[default]
    Center,
    /// Lines end at x = 0
    Right,
}

/// Vertical alignment of the text block relative to the origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    /// Block hangs below y = 0
    Top,
    /// Block is centered on y = 0
    #[default]
    Center,
    /// Block sits above y = 0
    Bottom,
}

/// Drop shadow drawn behind the text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropShadow {
    /// Shadow color as `rrggbb`
    pub color: String,
    /// Horizontal offset in glyph pixels
    pub offset_x: f32,
    /// Vertical offset in glyph pixels, positive moves the shadow up
    pub offset_y: f32,
}

impl Default for DropShadow {
    fn default() -> Self {
        Self {
            color: "000000".to_string(),
            offset_x: 1.0,
            offset_y: -1.0,
        }
    }
}

/// User-facing layout options
///
/// Unset numeric and color fields are not zero: they take the font's
/// defaults when resolved.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Horizontal alignment
    pub alignment: Alignment,
    /// Vertical alignment
    pub vertical_alignment: VerticalAlignment,
    /// Extra advance between characters
    pub character_spacing: Option<f32>,
    /// Extra distance between lines
    pub line_spacing: Option<f32>,
    /// Text color as `rrggbb`
    pub color: Option<String>,
    /// Text opacity in the 0.0-1.0 range
    pub opacity: Option<f32>,
    /// Optional drop shadow
    pub drop_shadow: Option<DropShadow>,
}

/// Drop shadow with its color parsed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveShadow {
    /// Shadow tint
    pub color: Color,
    /// Horizontal offset in glyph pixels
    pub offset_x: f32,
    /// Vertical offset in glyph pixels
    pub offset_y: f32,
}

/// Layout options with every fallback applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveOptions {
    /// Horizontal alignment
    pub alignment: Alignment,
    /// Vertical alignment
    pub vertical_alignment: VerticalAlignment,
    /// Extra advance between characters
    pub character_spacing: f32,
    /// Extra distance between lines
    pub line_spacing: f32,
    /// Text tint
    pub color: Color,
    /// Opacity clamped to 0.0-1.0
    pub opacity: f32,
    /// Drop shadow, if any
    pub drop_shadow: Option<EffectiveShadow>,
}

impl LayoutOptions {
    /// Set the horizontal alignment
    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set the vertical alignment
    #[must_use]
    pub fn with_vertical_alignment(mut self, vertical_alignment: VerticalAlignment) -> Self {
        self.vertical_alignment = vertical_alignment;
        self
    }

    /// Override the font's character spacing
    #[must_use]
    pub fn with_character_spacing(mut self, spacing: f32) -> Self {
        self.character_spacing = Some(spacing);
        self
    }

    /// Override the font's line spacing
    #[must_use]
    pub fn with_line_spacing(mut self, spacing: f32) -> Self {
        self.line_spacing = Some(spacing);
        self
    }

    /// Resolve unset fields against a font's defaults
    ///
    /// An unparsable color is logged and replaced by the font default; a
    /// layout never fails because of option values.
    pub fn resolve(&self, font: &FontTable) -> EffectiveOptions {
        let color = match self.color.as_deref() {
            Some(hex) => Color::from_hex(hex).unwrap_or_else(|e| {
                log::warn!("Ignoring text color: {}", e);
                font.default_color()
            }),
            None => font.default_color(),
        };

        let opacity = self
            .opacity
            .or_else(|| font.default_opacity())
            .unwrap_or(1.0)
            .clamp(0.0, 1.0);

        let drop_shadow = self.drop_shadow.as_ref().map(|shadow| EffectiveShadow {
            color: Color::from_hex(&shadow.color).unwrap_or_else(|e| {
                log::warn!("Ignoring drop shadow color: {}", e);
                Color::BLACK
            }),
            offset_x: shadow.offset_x,
            offset_y: shadow.offset_y,
        });

        EffectiveOptions {
            alignment: self.alignment,
            vertical_alignment: self.vertical_alignment,
            character_spacing: self
                .character_spacing
                .unwrap_or_else(|| font.default_character_spacing()),
            line_spacing: self.line_spacing.unwrap_or_else(|| font.default_line_spacing()),
            color,
            opacity,
            drop_shadow,
        }
    }
}
