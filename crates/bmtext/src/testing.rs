//! Synthetic fonts for tests, doc examples and the demo
//!
//! These build small in-memory font tables so layout can be exercised
//! without any font assets on disk.

use std::sync::Arc;

use crate::text::{CommonMetrics, FontDescriptor, FontTable, GlyphMetric, KerningPair};

/// Glyphs per atlas row in the generated fonts
const GLYPHS_PER_ROW: u32 = 16;

/// Font with a single 'A' glyph: 8x16 at (8, 0) in a 64x64 atlas, advance 10,
/// `yoff` 16 and line height 20
pub fn example_descriptor() -> FontDescriptor {
    FontDescriptor {
        common: CommonMetrics { line_height: 20, base: 16, atlas_width: 64, atlas_height: 64 },
        chars: vec![GlyphMetric {
            id: u32::from('A'),
            x: 8,
            y: 0,
            width: 8,
            height: 16,
            xoff: 0,
            yoff: 16,
            xadv: 10,
        }],
        ..FontDescriptor::default()
    }
}

/// Monospace font covering printable ASCII
///
/// Every glyph is `advance` wide with no horizontal offset, 16 tall, and
/// hangs 4 below the line cursor.
///
/// # Panics
///
/// Panics if `advance` is zero, which would give an empty atlas.
pub fn monospace_descriptor(advance: u32, line_height: u32) -> FontDescriptor {
    assert!(advance > 0, "monospace font needs a non-zero advance");
    let chars = (32u32..=126)
        .enumerate()
        .map(|(slot, id)| {
            let slot = slot as u32;
            GlyphMetric {
                id,
                x: (slot % GLYPHS_PER_ROW) * advance,
                y: (slot / GLYPHS_PER_ROW) * 16,
                width: advance,
                height: 16,
                xoff: 0,
                yoff: 4,
                xadv: advance as i32,
            }
        })
        .collect();

    FontDescriptor {
        common: CommonMetrics {
            line_height,
            base: 16,
            atlas_width: GLYPHS_PER_ROW * advance,
            atlas_height: 128,
        },
        chars,
        ..FontDescriptor::default()
    }
}

/// Font with 'A', 'V' and 'W' (advance 10) and kerning pairs
/// A-V = -2, V-A = -3, W-A = -1
pub fn kerned_descriptor() -> FontDescriptor {
    let glyph = |id: char, x: u32| GlyphMetric {
        id: u32::from(id),
        x,
        y: 0,
        width: 10,
        height: 16,
        xoff: 0,
        yoff: 4,
        xadv: 10,
    };
    let pair = |first: char, second: char, amount: i32| KerningPair {
        first: u32::from(first),
        second: u32::from(second),
        amount,
    };

    FontDescriptor {
        common: CommonMetrics { line_height: 20, base: 16, atlas_width: 64, atlas_height: 32 },
        chars: vec![glyph('A', 0), glyph('V', 10), glyph('W', 20)],
        kernings: vec![pair('A', 'V', -2), pair('V', 'A', -3), pair('W', 'A', -1)],
        ..FontDescriptor::default()
    }
}

/// # Panics
///
/// Panics if the descriptor is rejected; the generated descriptors never are.
fn build(descriptor: &FontDescriptor) -> Arc<FontTable> {
    match FontTable::from_descriptor(descriptor) {
        Ok(font) => Arc::new(font),
        Err(e) => panic!("synthetic font descriptor rejected: {e}"),
    }
}

/// Built [`example_descriptor`]
pub fn example_font() -> Arc<FontTable> {
    build(&example_descriptor())
}

/// Built [`monospace_descriptor`]
///
/// # Panics
///
/// Panics if `advance` is zero.
pub fn monospace_font(advance: u32, line_height: u32) -> Arc<FontTable> {
    build(&monospace_descriptor(advance, line_height))
}

/// Built [`kerned_descriptor`]
pub fn kerned_font() -> Arc<FontTable> {
    build(&kerned_descriptor())
}

/// Monospace font (advance 10, line height 20) with default spacings
pub fn spaced_font(character_spacing: f32, line_spacing: f32) -> Arc<FontTable> {
    build(&FontDescriptor {
        character_spacing,
        line_spacing,
        ..monospace_descriptor(10, 20)
    })
}
