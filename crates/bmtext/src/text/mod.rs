//! Text rendering system
//!
//! Font tables, text layout, glyph mesh buffers and the renderer state
//! machine that ties them to a host engine.
//!
//! # Architecture
//!
//! - [`FontTable`]: Immutable glyph metrics and kerning for one font
//! - [`TextLayout`]: Converts strings to positioned glyph quads
//! - [`MeshBufferManager`]: Power-of-two glyph buffers on the host
//! - [`TextRenderer`]: Dirty-flag state machine with one sync point per frame
//!
//! # Example
//!
//! ```
//! use bmtext::render::HeadlessHost;
//! use bmtext::testing;
//! use bmtext::text::{LayoutOptions, MaterialKind, TextRenderer};
//!
//! let mut renderer = TextRenderer::new(HeadlessHost::new());
//! renderer.set_font(Some(testing::monospace_font(10, 20)), MaterialKind::Basic, None);
//! renderer.set_text("Hello World");
//! renderer.set_options(LayoutOptions::default());
//!
//! // Nothing is rebuilt until the frame's sync point
//! renderer.update(1.0 / 60.0);
//! assert_eq!(renderer.visible_glyph_count(), 11);
//! ```

mod color;
mod font_table;
mod mesh_buffer;
mod options;
mod text_layout;
mod text_material;
mod text_renderer;

pub use color::{Color, ColorError};
pub use font_table::{
    CommonMetrics, FontDescriptor, FontError, FontResult, FontTable, GlyphMetric, KerningPair,
    RenderingMode,
};
pub use mesh_buffer::{MeshBufferManager, MeshBuffers};
pub use options::{
    Alignment, DropShadow, EffectiveOptions, EffectiveShadow, LayoutOptions, VerticalAlignment,
};
pub use text_layout::{
    block_height, GlyphQuad, LayoutResult, TextBounds, TextLayout, INDICES_PER_QUAD,
    QUAD_INDICES, VERTICES_PER_QUAD,
};
pub use text_material::{MaterialKind, MaterialParams, MaterialVariant, ShaderParams, ALPHA_TEST};
pub use text_renderer::{DirtyFlags, SyncStats, TextRenderer, SHADOW_DEPTH_OFFSET};
