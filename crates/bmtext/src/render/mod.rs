//! Host rendering interface
//!
//! The capability trait text renderers draw through, its handle types, and a
//! headless implementation that keeps everything in memory.

mod headless;
mod host;

pub use headless::{HeadlessBuffer, HeadlessHost, HeadlessMaterial, HostStats};
pub use host::{
    BufferHandle, BufferKind, MaterialHandle, RenderHost, Renderable, RenderableId, TextureHandle,
};
