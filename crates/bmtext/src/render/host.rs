//! Host rendering capabilities
//!
//! Text renderers never talk to a graphics API directly. Everything they need
//! from the host engine (buffers, materials, scene attachment) goes through
//! [`RenderHost`], which is injected when a renderer is constructed.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::math::Vec3;
use crate::text::{MaterialKind, MaterialParams};

/// Opaque texture handle supplied by the font asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Handle to a host-allocated vertex or index buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// Handle to a host-allocated material object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u64);

/// Identifier of a drawable in the host scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderableId(pub u64);

static NEXT_RENDERABLE_ID: AtomicU64 = AtomicU64::new(1);

impl RenderableId {
    /// Allocate a process-unique renderable id
    pub fn next() -> Self {
        Self(NEXT_RENDERABLE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Contents of a glyph buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// `vec3<f32>` positions, four per glyph
    Position,
    /// `vec2<f32>` texture coordinates, four per glyph
    Uv,
    /// `u32` triangle indices, six per glyph
    Index,
}

impl BufferKind {
    /// Scalar components stored per glyph slot
    pub const fn components_per_glyph(self) -> usize {
        match self {
            Self::Position => 3 * 4,
            Self::Uv => 2 * 4,
            Self::Index => 6,
        }
    }

    /// Bytes needed per glyph slot
    pub const fn bytes_per_glyph(self) -> usize {
        // f32 and u32 are both four bytes
        self.components_per_glyph() * 4
    }
}

/// A drawable the host adds to its scene
#[derive(Debug, Clone, PartialEq)]
pub struct Renderable {
    /// Scene key; attaching the same id again refreshes it
    pub id: RenderableId,
    /// Position buffer
    pub positions: BufferHandle,
    /// UV buffer
    pub uvs: BufferHandle,
    /// Index buffer
    pub indices: BufferHandle,
    /// Material used for drawing
    pub material: MaterialHandle,
    /// Number of leading indices to draw
    pub index_count: u32,
    /// Translation in world units, applied after scaling
    pub offset: Vec3,
    /// Uniform scale from glyph pixels to world units
    pub scale: f32,
    /// Whether the host should draw it
    pub visible: bool,
}

/// Capabilities a text renderer consumes from the host engine
pub trait RenderHost {
    /// Allocate a buffer large enough for `capacity` glyphs
    fn allocate_buffer(&mut self, kind: BufferKind, capacity: usize) -> BufferHandle;

    /// Overwrite the start of a buffer with `data`
    fn write_buffer(&mut self, buffer: BufferHandle, data: &[u8]);

    /// Free a buffer
    fn release_buffer(&mut self, buffer: BufferHandle);

    /// Create a material object
    fn create_material(&mut self, kind: MaterialKind, params: &MaterialParams) -> MaterialHandle;

    /// Update uniforms of an existing material
    fn update_material(&mut self, material: MaterialHandle, params: &MaterialParams);

    /// Free a material
    fn release_material(&mut self, material: MaterialHandle);

    /// Add a drawable to the scene, or refresh it if already attached
    fn attach(&mut self, renderable: &Renderable);

    /// Remove a drawable from the scene; unknown ids are ignored
    fn detach(&mut self, id: RenderableId);
}

impl<H: RenderHost + ?Sized> RenderHost for &mut H {
    fn allocate_buffer(&mut self, kind: BufferKind, capacity: usize) -> BufferHandle {
        (**self).allocate_buffer(kind, capacity)
    }

    fn write_buffer(&mut self, buffer: BufferHandle, data: &[u8]) {
        (**self).write_buffer(buffer, data);
    }

    fn release_buffer(&mut self, buffer: BufferHandle) {
        (**self).release_buffer(buffer);
    }

    fn create_material(&mut self, kind: MaterialKind, params: &MaterialParams) -> MaterialHandle {
        (**self).create_material(kind, params)
    }

    fn update_material(&mut self, material: MaterialHandle, params: &MaterialParams) {
        (**self).update_material(material, params);
    }

    fn release_material(&mut self, material: MaterialHandle) {
        (**self).release_material(material);
    }

    fn attach(&mut self, renderable: &Renderable) {
        (**self).attach(renderable);
    }

    fn detach(&mut self, id: RenderableId) {
        (**self).detach(id);
    }
}
