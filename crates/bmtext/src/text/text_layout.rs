//! Text layout engine
//!
//! Converts text strings into positioned glyph quads. Handles line splitting,
//! kerning-aware advance accumulation, and horizontal/vertical alignment.
//!
//! # Layout Coordinate System
//!
//! - Origin (0, 0) is the alignment anchor of the text block
//! - +X axis points right
//! - +Y axis points up; each line starts `line_height + line_spacing` below
//!   the previous one and glyph tops sit `yoff` below the line's cursor
//! - UVs are normalized to the atlas with V flipped (atlas rows are stored
//!   top-down, rendering samples bottom-up)

use super::font_table::{FontTable, GlyphMetric};
use super::options::{Alignment, EffectiveOptions, VerticalAlignment};
use crate::foundation::math::{Vec2, Vec3};

/// Index pattern of one quad: two triangles over vertices 0-1-2 and 0-2-3
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Vertices per glyph quad
pub const VERTICES_PER_QUAD: usize = 4;

/// Indices per glyph quad
pub const INDICES_PER_QUAD: usize = QUAD_INDICES.len();

/// One positioned glyph
///
/// Vertex order is top-left, top-right, bottom-right, bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphQuad {
    /// Character code this quad renders
    pub code: u32,
    /// Object-space corner positions
    pub positions: [Vec3; 4],
    /// Atlas UVs matching `positions`
    pub uvs: [Vec2; 4],
}

impl GlyphQuad {
    /// Top edge of the quad
    pub fn top(&self) -> f32 {
        self.positions[0].y
    }

    /// Left edge of the quad
    pub fn left(&self) -> f32 {
        self.positions[0].x
    }
}

/// Bounding box for text layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBounds {
    /// Minimum X coordinate
    pub min_x: f32,
    /// Minimum Y coordinate
    pub min_y: f32,
    /// Maximum X coordinate
    pub max_x: f32,
    /// Maximum Y coordinate
    pub max_y: f32,
}

impl TextBounds {
    /// Calculate width of bounding box
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Calculate height of bounding box
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// Output of a layout pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    /// Quads in text order, skipping newlines and unknown characters
    pub quads: Vec<GlyphQuad>,
    /// Advance width of each line, in line order
    pub line_widths: Vec<f32>,
    /// Height of the whole block
    pub block_height: f32,
}

impl LayoutResult {
    /// Number of quads that will be drawn
    pub fn visible_glyph_count(&self) -> usize {
        self.quads.len()
    }

    /// Whether nothing is drawn
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Bounding box of every quad corner, `None` when nothing is drawn
    pub fn bounds(&self) -> Option<TextBounds> {
        let mut corners = self.quads.iter().flat_map(|quad| quad.positions.iter());
        let first = corners.next()?;
        let init = TextBounds { min_x: first.x, min_y: first.y, max_x: first.x, max_y: first.y };

        Some(corners.fold(init, |b, p| TextBounds {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }
}

/// Text layout engine over one font table
///
/// Layout is a pure function of the text, the font and the resolved options;
/// the engine keeps no state between calls.
///
/// # Example
///
/// ```
/// use bmtext::testing;
/// use bmtext::text::{LayoutOptions, TextLayout};
///
/// let font = testing::example_font();
/// let options = LayoutOptions::default().resolve(&font);
/// let result = TextLayout::new(&font).layout("A\nA", &options);
/// assert_eq!(result.visible_glyph_count(), 2);
/// ```
pub struct TextLayout<'a> {
    font: &'a FontTable,
}

impl<'a> TextLayout<'a> {
    /// Create a layout engine reading from `font`
    pub const fn new(font: &'a FontTable) -> Self {
        Self { font }
    }

    /// Lay out `text` into positioned quads
    pub fn layout(&self, text: &str, options: &EffectiveOptions) -> LayoutResult {
        if text.is_empty() {
            return LayoutResult::default();
        }

        let line_height = self.font.line_height();
        let line_advance = line_height + options.line_spacing;
        let lines: Vec<&str> = text.split('\n').collect();
        let line_count = lines.len();
        let block_height = block_height(line_count, line_height, options.line_spacing);

        let start_y = match options.vertical_alignment {
            VerticalAlignment::Top => 0.0,
            VerticalAlignment::Center => block_height / 2.0,
            VerticalAlignment::Bottom => block_height,
        };

        let mut quads = Vec::with_capacity(text.len());
        let mut line_widths = Vec::with_capacity(line_count);

        for (line_index, line) in lines.iter().enumerate() {
            let width = self.line_width(line, options.character_spacing);
            let mut cursor_x = match options.alignment {
                Alignment::Left => 0.0,
                Alignment::Center => -width / 2.0,
                Alignment::Right => -width,
            };
            let cursor_y = (line_index as f32).mul_add(-line_advance, start_y);

            for (glyph, kerning) in self.line_glyphs(line) {
                cursor_x += kerning as f32;
                quads.push(self.glyph_quad(cursor_x, cursor_y, glyph));
                cursor_x += glyph.xadv as f32 + options.character_spacing;
            }

            line_widths.push(width);
        }

        log::trace!(
            "Laid out {} glyphs on {} lines, block height {}",
            quads.len(),
            line_count,
            block_height
        );

        LayoutResult { quads, line_widths, block_height }
    }

    /// Total advance of one line, including trailing character spacing
    pub fn line_width(&self, line: &str, character_spacing: f32) -> f32 {
        self.line_glyphs(line)
            .map(|(glyph, kerning)| kerning as f32 + glyph.xadv as f32 + character_spacing)
            .sum()
    }

    /// Resolvable glyphs of a line paired with the kerning applied before each
    ///
    /// The kerning context is the previous resolvable code on the same line;
    /// an unknown character neither emits a glyph nor resets the context.
    fn line_glyphs<'l>(&'l self, line: &'l str) -> impl Iterator<Item = (&'a GlyphMetric, i32)> + 'l {
        let font = self.font;
        line.chars().scan(None, move |prev: &mut Option<u32>, ch| {
            let code = u32::from(ch);
            let Some(glyph) = font.lookup_glyph(code) else {
                return Some(None);
            };
            let kerning = prev.map_or(0, |p| font.lookup_kerning(p, code));
            *prev = Some(code);
            Some(Some((glyph, kerning)))
        })
        .flatten()
    }

    /// Create a single quad for a glyph
    fn glyph_quad(&self, cursor_x: f32, cursor_y: f32, glyph: &GlyphMetric) -> GlyphQuad {
        let (atlas_width, atlas_height) = self.font.atlas_dimensions();

        let x_min = cursor_x + glyph.xoff as f32;
        let x_max = x_min + glyph.width as f32;
        let y_top = cursor_y - glyph.yoff as f32;
        let y_bottom = y_top - glyph.height as f32;

        let u_min = glyph.x as f32 / atlas_width as f32;
        let u_max = u_min + glyph.width as f32 / atlas_width as f32;
        let v_top = glyph.y as f32 / atlas_height as f32;
        let v_bottom = v_top + glyph.height as f32 / atlas_height as f32;

        GlyphQuad {
            code: glyph.id,
            positions: [
                Vec3::new(x_min, y_top, 0.0),
                Vec3::new(x_max, y_top, 0.0),
                Vec3::new(x_max, y_bottom, 0.0),
                Vec3::new(x_min, y_bottom, 0.0),
            ],
            uvs: [
                Vec2::new(u_min, 1.0 - v_top),
                Vec2::new(u_max, 1.0 - v_top),
                Vec2::new(u_max, 1.0 - v_bottom),
                Vec2::new(u_min, 1.0 - v_bottom),
            ],
        }
    }
}

/// Height of a block of `line_count` lines
///
/// Spacing only separates lines, so the last line adds none.
pub fn block_height(line_count: usize, line_height: f32, line_spacing: f32) -> f32 {
    if line_count == 0 {
        return 0.0;
    }
    let lines = line_count as f32;
    lines.mul_add(line_height, (lines - 1.0) * line_spacing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use crate::text::LayoutOptions;
    use approx::assert_relative_eq;

    fn top_left() -> LayoutOptions {
        LayoutOptions::default()
            .with_alignment(Alignment::Left)
            .with_vertical_alignment(VerticalAlignment::Top)
            .with_character_spacing(0.0)
            .with_line_spacing(0.0)
    }

    #[test]
    fn test_two_line_example() {
        let font = testing::example_font();
        let options = top_left().resolve(&font);

        let result = TextLayout::new(&font).layout("A\nA", &options);

        assert_eq!(result.visible_glyph_count(), 2);
        assert_relative_eq!(result.quads[0].top(), -16.0);
        assert_relative_eq!(result.quads[1].top(), -36.0);
        assert_relative_eq!(result.quads[0].left(), 0.0);
        assert_relative_eq!(result.quads[1].left(), 0.0);
        assert_eq!(result.line_widths, vec![10.0, 10.0]);
    }

    #[test]
    fn test_empty_text() {
        let font = testing::example_font();
        let result = TextLayout::new(&font).layout("", &top_left().resolve(&font));

        assert_eq!(result.visible_glyph_count(), 0);
        assert!(result.quads.is_empty());
        assert!(result.line_widths.is_empty());
        assert_eq!(result.block_height, 0.0);
        assert!(result.bounds().is_none());
    }

    #[test]
    fn test_unknown_characters_are_dropped() {
        let font = testing::example_font();
        let options = top_left().resolve(&font);
        let layout = TextLayout::new(&font);

        let result = layout.layout("é?!", &options);
        assert_eq!(result.visible_glyph_count(), 0);

        // Unknown characters contribute no width either
        let result = layout.layout("AéA", &options);
        assert_eq!(result.visible_glyph_count(), 2);
        assert_relative_eq!(result.quads[1].left(), 10.0);
        assert_eq!(result.line_widths, vec![20.0]);
    }

    #[test]
    fn test_quad_geometry_and_flipped_uvs() {
        let font = testing::example_font();
        let result = TextLayout::new(&font).layout("A", &top_left().resolve(&font));
        let quad = &result.quads[0];

        assert_eq!(quad.code, u32::from('A'));
        assert_eq!(quad.positions[0], Vec3::new(0.0, -16.0, 0.0));
        assert_eq!(quad.positions[1], Vec3::new(8.0, -16.0, 0.0));
        assert_eq!(quad.positions[2], Vec3::new(8.0, -32.0, 0.0));
        assert_eq!(quad.positions[3], Vec3::new(0.0, -32.0, 0.0));

        // 'A' sits at (8, 0) in a 64x64 atlas
        assert_relative_eq!(quad.uvs[0], Vec2::new(0.125, 1.0));
        assert_relative_eq!(quad.uvs[1], Vec2::new(0.25, 1.0));
        assert_relative_eq!(quad.uvs[2], Vec2::new(0.25, 0.75));
        assert_relative_eq!(quad.uvs[3], Vec2::new(0.125, 0.75));
    }

    #[test]
    fn test_kerning_applies_between_resolvable_neighbours() {
        let font = testing::kerned_font();
        let options = top_left().resolve(&font);
        let layout = TextLayout::new(&font);

        // A-V kerns by -2
        let result = layout.layout("AV", &options);
        assert_relative_eq!(result.quads[1].left(), 8.0);
        assert_eq!(result.line_widths, vec![18.0]);

        // An unknown character between them keeps the kerning context
        let result = layout.layout("A\u{1F600}V", &options);
        assert_eq!(result.visible_glyph_count(), 2);
        assert_relative_eq!(result.quads[1].left(), 8.0);

        // A newline resets it
        let result = layout.layout("A\nV", &options);
        assert_relative_eq!(result.quads[1].left(), 0.0);
    }

    #[test]
    fn test_kerning_is_ordered() {
        let font = testing::kerned_font();
        let result = TextLayout::new(&font).layout("VA", &top_left().resolve(&font));

        // V-A kerns by -3
        assert_relative_eq!(result.quads[1].left(), 7.0);
    }

    #[test]
    fn test_center_alignment_is_symmetric() {
        let font = testing::monospace_font(10, 20);
        let options = LayoutOptions::default()
            .with_alignment(Alignment::Center)
            .with_character_spacing(0.0)
            .resolve(&font);

        let result = TextLayout::new(&font).layout("HELLO", &options);
        let bounds = result.bounds().unwrap();

        assert_relative_eq!(bounds.min_x, -25.0);
        assert_relative_eq!(bounds.max_x, 25.0);
        for (left, right) in result.quads.iter().zip(result.quads.iter().rev()) {
            assert_relative_eq!(left.positions[0].x, -right.positions[1].x, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_right_alignment_per_line() {
        let font = testing::monospace_font(10, 20);
        let options = top_left().with_alignment(Alignment::Right).resolve(&font);

        let result = TextLayout::new(&font).layout("AB\nABCD", &options);

        assert_eq!(result.line_widths, vec![20.0, 40.0]);
        assert_relative_eq!(result.quads[0].left(), -20.0);
        assert_relative_eq!(result.quads[2].left(), -40.0);
        assert_relative_eq!(result.quads[5].positions[1].x, 0.0);
    }

    #[test]
    fn test_character_spacing_widens_lines() {
        let font = testing::monospace_font(10, 20);
        let options = top_left().with_character_spacing(3.0).resolve(&font);

        let result = TextLayout::new(&font).layout("ABC", &options);

        assert_eq!(result.line_widths, vec![39.0]);
        assert_relative_eq!(result.quads[1].left(), 13.0);
        assert_relative_eq!(result.quads[2].left(), 26.0);
    }

    #[test]
    fn test_block_height_excludes_trailing_spacing() {
        assert_eq!(block_height(0, 20.0, 5.0), 0.0);
        assert_eq!(block_height(1, 20.0, 5.0), 20.0);
        assert_eq!(block_height(3, 20.0, 5.0), 70.0);

        let font = testing::monospace_font(10, 20);
        let options = top_left().with_line_spacing(5.0).resolve(&font);
        let layout = TextLayout::new(&font);

        assert_eq!(layout.layout("A", &options).block_height, 20.0);
        assert_eq!(layout.layout("A\nA\nA", &options).block_height, 70.0);
    }

    #[test]
    fn test_vertical_alignment_offsets() {
        let font = testing::monospace_font(10, 20);
        let layout = TextLayout::new(&font);
        let text = "A\nA";
        // Monospace glyphs hang 4px below the line cursor
        let first_top = |valign| {
            let options = top_left()
                .with_line_spacing(10.0)
                .with_vertical_alignment(valign)
                .resolve(&font);
            layout.layout(text, &options).quads[0].top()
        };

        // Block height is 20 + 10 + 20
        assert_relative_eq!(first_top(VerticalAlignment::Top), -4.0);
        assert_relative_eq!(first_top(VerticalAlignment::Center), 21.0);
        assert_relative_eq!(first_top(VerticalAlignment::Bottom), 46.0);
    }

    #[test]
    fn test_consecutive_newlines_make_empty_lines() {
        let font = testing::example_font();
        let options = top_left().resolve(&font);

        let result = TextLayout::new(&font).layout("A\n\nA", &options);

        assert_eq!(result.visible_glyph_count(), 2);
        assert_eq!(result.line_widths, vec![10.0, 0.0, 10.0]);
        assert_eq!(result.block_height, 60.0);
        assert_relative_eq!(result.quads[1].top(), -56.0);
    }

    #[test]
    fn test_line_count_drives_widths_and_centering() {
        let font = testing::example_font();
        let options = LayoutOptions::default()
            .with_alignment(Alignment::Left)
            .with_vertical_alignment(VerticalAlignment::Center)
            .resolve(&font);

        let result = TextLayout::new(&font).layout("A\nA\n\nA", &options);

        assert_eq!(result.line_widths.len(), 4);
        assert_eq!(result.block_height, 80.0);
        assert_relative_eq!(result.quads[0].top(), 24.0);
        assert_relative_eq!(result.quads[2].top(), -36.0);
    }

    #[test]
    fn test_trailing_newline_counts_as_a_line() {
        let font = testing::example_font();
        let result = TextLayout::new(&font).layout("A\n", &top_left().resolve(&font));

        assert_eq!(result.visible_glyph_count(), 1);
        assert_eq!(result.line_widths.len(), 2);
        assert_eq!(result.block_height, 40.0);
    }

    #[test]
    fn test_quad_order_follows_text() {
        let font = testing::monospace_font(10, 20);
        let options = LayoutOptions::default().resolve(&font);

        let result = TextLayout::new(&font).layout("ab\ncd\u{7f}e", &options);
        let codes: Vec<u32> = result.quads.iter().map(|q| q.code).collect();

        assert_eq!(codes, "abcde".chars().map(u32::from).collect::<Vec<_>>());
    }

    #[test]
    fn test_layout_is_idempotent() {
        let font = testing::kerned_font();
        let options = LayoutOptions::default().resolve(&font);
        let layout = TextLayout::new(&font);

        let first = layout.layout("AVA\nWAV", &options);
        let second = layout.layout("AVA\nWAV", &options);

        assert_eq!(first, second);
    }

    #[test]
    fn test_unset_spacing_matches_explicit_default() {
        let font = testing::spaced_font(2.0, 6.0);
        let layout = TextLayout::new(&font);
        let text = "AB\nCD";

        let implicit = layout.layout(text, &LayoutOptions::default().resolve(&font));
        let explicit = layout.layout(
            text,
            &LayoutOptions::default()
                .with_character_spacing(2.0)
                .with_line_spacing(6.0)
                .resolve(&font),
        );
        let zeroed = layout.layout(
            text,
            &LayoutOptions::default()
                .with_character_spacing(0.0)
                .with_line_spacing(0.0)
                .resolve(&font),
        );

        assert_eq!(implicit, explicit);
        assert_ne!(implicit, zeroed);
    }
}
