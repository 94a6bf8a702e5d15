//! # bmtext
//!
//! Bitmap font text for engine plugins: glyph layout, glyph meshes and the
//! per-component render state that keeps them in sync.
//!
//! ## Features
//!
//! - **Font tables**: glyph and kerning lookup built from BMFont metrics
//! - **Layout**: multi-line text with alignment, spacing and kerning, as quads
//! - **Mesh buffers**: power-of-two glyph buffers that grow and never shrink
//! - **Render state**: dirty-flag setters coalesced into one sync per frame
//! - **Host interface**: buffers, materials and scene access behind a trait
//!
//! ## Quick Start
//!
//! ```rust
//! use bmtext::prelude::*;
//!
//! let mut renderer = TextRenderer::new(HeadlessHost::new());
//! renderer.set_font(Some(bmtext::testing::example_font()), MaterialKind::Basic, None);
//! renderer.set_text("AA\nA");
//!
//! // Per frame
//! renderer.update(1.0 / 60.0);
//!
//! assert_eq!(renderer.visible_glyph_count(), 3);
//! assert_eq!(renderer.capacity(), 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod render;
pub mod testing;
pub mod text;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, TextRendererConfig},
        foundation::math::{Vec2, Vec3},
        render::{HeadlessHost, RenderHost, Renderable, RenderableId, TextureHandle},
        text::{
            Alignment, Color, DropShadow, FontDescriptor, FontError, FontTable, LayoutOptions,
            LayoutResult, MaterialKind, RenderingMode, ShaderParams, TextBounds, TextLayout,
            TextRenderer, VerticalAlignment,
        },
    };
}
