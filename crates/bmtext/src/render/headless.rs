//! Headless render host
//!
//! Keeps buffers and materials in CPU memory and records what is attached to
//! the scene. Useful for tests, tools and servers that need glyph geometry
//! without a GPU.

use std::collections::HashMap;

use slotmap::{DefaultKey, Key, KeyData, SlotMap};

use super::host::{
    BufferHandle, BufferKind, MaterialHandle, RenderHost, Renderable, RenderableId,
};
use crate::text::{MaterialKind, MaterialParams};

/// CPU copy of a host buffer
#[derive(Debug, Clone)]
pub struct HeadlessBuffer {
    /// What the buffer stores
    pub kind: BufferKind,
    /// Capacity in glyphs
    pub capacity: usize,
    /// Raw contents
    pub data: Vec<u8>,
}

/// CPU copy of a material object
#[derive(Debug, Clone)]
pub struct HeadlessMaterial {
    /// Material variant
    pub kind: MaterialKind,
    /// Latest uniforms
    pub params: MaterialParams,
}

/// Operation counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostStats {
    /// Buffers allocated
    pub buffers_allocated: usize,
    /// Buffers released
    pub buffers_released: usize,
    /// Buffer writes
    pub buffer_writes: usize,
    /// Materials created
    pub materials_created: usize,
    /// Material uniform updates
    pub materials_updated: usize,
    /// Materials released
    pub materials_released: usize,
}

/// Render host that keeps everything in memory
#[derive(Debug, Default)]
pub struct HeadlessHost {
    buffers: SlotMap<DefaultKey, HeadlessBuffer>,
    materials: SlotMap<DefaultKey, HeadlessMaterial>,
    scene: HashMap<RenderableId, Renderable>,
    stats: HostStats,
}

fn key_of(raw: u64) -> DefaultKey {
    DefaultKey::from(KeyData::from_ffi(raw))
}

impl HeadlessHost {
    /// Create an empty host
    pub fn new() -> Self {
        Self::default()
    }

    /// Operation counters so far
    pub const fn stats(&self) -> HostStats {
        self.stats
    }

    /// Number of buffers currently allocated
    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    /// Number of materials currently alive
    pub fn live_materials(&self) -> usize {
        self.materials.len()
    }

    /// Look up a live buffer
    pub fn buffer(&self, handle: BufferHandle) -> Option<&HeadlessBuffer> {
        self.buffers.get(key_of(handle.0))
    }

    /// Contents of a position or UV buffer as floats
    pub fn buffer_f32(&self, handle: BufferHandle) -> Option<Vec<f32>> {
        self.buffer(handle)
            .map(|buffer| buffer.data.chunks_exact(4).map(bytemuck::pod_read_unaligned).collect())
    }

    /// Contents of an index buffer
    pub fn buffer_u32(&self, handle: BufferHandle) -> Option<Vec<u32>> {
        self.buffer(handle)
            .map(|buffer| buffer.data.chunks_exact(4).map(bytemuck::pod_read_unaligned).collect())
    }

    /// Look up a live material
    pub fn material(&self, handle: MaterialHandle) -> Option<&HeadlessMaterial> {
        self.materials.get(key_of(handle.0))
    }

    /// Renderable attached under `id`
    pub fn attached(&self, id: RenderableId) -> Option<&Renderable> {
        self.scene.get(&id)
    }

    /// Number of attached renderables
    pub fn attached_count(&self) -> usize {
        self.scene.len()
    }

    /// Attached renderables in no particular order
    pub fn scene(&self) -> impl Iterator<Item = &Renderable> {
        self.scene.values()
    }
}

impl RenderHost for HeadlessHost {
    fn allocate_buffer(&mut self, kind: BufferKind, capacity: usize) -> BufferHandle {
        let data = vec![0u8; capacity * kind.bytes_per_glyph()];
        let key = self.buffers.insert(HeadlessBuffer { kind, capacity, data });
        self.stats.buffers_allocated += 1;
        BufferHandle(key.data().as_ffi())
    }

    fn write_buffer(&mut self, buffer: BufferHandle, data: &[u8]) {
        let Some(target) = self.buffers.get_mut(key_of(buffer.0)) else {
            log::warn!("Write to unknown buffer {:?}", buffer);
            return;
        };
        if data.len() > target.data.len() {
            log::error!(
                "Write of {} bytes overflows {:?} buffer of {} bytes",
                data.len(),
                target.kind,
                target.data.len()
            );
            return;
        }
        target.data[..data.len()].copy_from_slice(data);
        self.stats.buffer_writes += 1;
    }

    fn release_buffer(&mut self, buffer: BufferHandle) {
        if self.buffers.remove(key_of(buffer.0)).is_some() {
            self.stats.buffers_released += 1;
        } else {
            log::warn!("Release of unknown buffer {:?}", buffer);
        }
    }

    fn create_material(&mut self, kind: MaterialKind, params: &MaterialParams) -> MaterialHandle {
        let key = self.materials.insert(HeadlessMaterial { kind, params: params.clone() });
        self.stats.materials_created += 1;
        MaterialHandle(key.data().as_ffi())
    }

    fn update_material(&mut self, material: MaterialHandle, params: &MaterialParams) {
        if let Some(target) = self.materials.get_mut(key_of(material.0)) {
            target.params = params.clone();
            self.stats.materials_updated += 1;
        } else {
            log::warn!("Update of unknown material {:?}", material);
        }
    }

    fn release_material(&mut self, material: MaterialHandle) {
        if self.materials.remove(key_of(material.0)).is_some() {
            self.stats.materials_released += 1;
        } else {
            log::warn!("Release of unknown material {:?}", material);
        }
    }

    fn attach(&mut self, renderable: &Renderable) {
        self.scene.insert(renderable.id, renderable.clone());
    }

    fn detach(&mut self, id: RenderableId) {
        self.scene.remove(&id);
    }
}
