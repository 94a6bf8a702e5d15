//! Glyph mesh buffers
//!
//! Owns the position/UV/index buffers of one text renderer. Capacity is
//! counted in glyph slots, is always a power of two, and only ever grows:
//! when a layout needs more slots the old buffers are released and a fresh
//! set is allocated before anything is written.
//!
//! The index buffer only depends on capacity, so it is filled once per
//! allocation. Layouts rewrite the position and UV prefix and move the
//! active range.

use std::ops::Range;

use super::text_layout::{LayoutResult, INDICES_PER_QUAD, QUAD_INDICES, VERTICES_PER_QUAD};
use crate::foundation::math::ceil_power_of_two;
use crate::render::{BufferHandle, BufferKind, RenderHost};

/// Handles of one allocated buffer set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshBuffers {
    /// Positions, `vec3<f32>` per vertex
    pub positions: BufferHandle,
    /// Texture coordinates, `vec2<f32>` per vertex
    pub uvs: BufferHandle,
    /// Triangle indices
    pub indices: BufferHandle,
}

/// Growable glyph buffer set
#[derive(Debug, Default)]
pub struct MeshBufferManager {
    capacity: usize,
    buffers: Option<MeshBuffers>,
    positions: Vec<f32>,
    uvs: Vec<f32>,
    glyph_codes: Vec<u32>,
    active_glyphs: usize,
}

impl MeshBufferManager {
    /// Create a manager with no buffers allocated
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocated capacity in glyphs
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current buffer set, if any has been allocated
    pub const fn buffers(&self) -> Option<MeshBuffers> {
        self.buffers
    }

    /// Glyphs written by the last layout
    pub const fn active_glyph_count(&self) -> usize {
        self.active_glyphs
    }

    /// Index range to draw
    pub const fn active_range(&self) -> Range<usize> {
        0..self.active_glyphs * INDICES_PER_QUAD
    }

    /// Character code of each active glyph slot
    pub fn glyph_codes(&self) -> &[u32] {
        &self.glyph_codes[..self.active_glyphs]
    }

    /// Staged positions of the active glyphs
    pub fn positions(&self) -> &[f32] {
        &self.positions[..self.active_glyphs * VERTICES_PER_QUAD * 3]
    }

    /// Staged UVs of the active glyphs
    pub fn uvs(&self) -> &[f32] {
        &self.uvs[..self.active_glyphs * VERTICES_PER_QUAD * 2]
    }

    /// Make room for at least `glyphs` glyphs
    ///
    /// Returns whether the buffers were reallocated.
    pub fn ensure_capacity<H: RenderHost>(&mut self, host: &mut H, glyphs: usize) -> bool {
        let required = ceil_power_of_two(glyphs);
        if required <= self.capacity {
            return false;
        }

        let previous = self.capacity;
        self.release(host);

        let buffers = MeshBuffers {
            positions: host.allocate_buffer(BufferKind::Position, required),
            uvs: host.allocate_buffer(BufferKind::Uv, required),
            indices: host.allocate_buffer(BufferKind::Index, required),
        };

        let indices: Vec<u32> = (0..required)
            .flat_map(|slot| {
                let base = slot * VERTICES_PER_QUAD;
                QUAD_INDICES
                    .iter()
                    .map(move |i| u32::try_from(base).map_or(u32::MAX, |base| base + i))
            })
            .collect();
        host.write_buffer(buffers.indices, bytemuck::cast_slice(&indices));

        self.positions = vec![0.0; required * BufferKind::Position.components_per_glyph()];
        self.uvs = vec![0.0; required * BufferKind::Uv.components_per_glyph()];
        self.glyph_codes = vec![0; required];
        self.buffers = Some(buffers);
        self.capacity = required;

        log::debug!("Glyph buffers grown from {} to {} slots", previous, required);
        true
    }

    /// Write a layout into the buffers
    ///
    /// An empty layout only resets the active range; it never allocates.
    /// Returns whether the buffers were reallocated.
    pub fn write<H: RenderHost>(&mut self, host: &mut H, layout: &LayoutResult) -> bool {
        let count = layout.visible_glyph_count();
        self.active_glyphs = 0;
        if count == 0 {
            return false;
        }

        let reallocated = self.ensure_capacity(host, count);

        for (slot, quad) in layout.quads.iter().enumerate() {
            let p = slot * BufferKind::Position.components_per_glyph();
            for (corner, position) in quad.positions.iter().enumerate() {
                self.positions[p + corner * 3..p + corner * 3 + 3]
                    .copy_from_slice(position.as_slice());
            }

            let u = slot * BufferKind::Uv.components_per_glyph();
            for (corner, uv) in quad.uvs.iter().enumerate() {
                self.uvs[u + corner * 2..u + corner * 2 + 2].copy_from_slice(uv.as_slice());
            }

            self.glyph_codes[slot] = quad.code;
        }
        self.active_glyphs = count;

        if let Some(buffers) = self.buffers {
            host.write_buffer(buffers.positions, bytemuck::cast_slice(self.positions()));
            host.write_buffer(buffers.uvs, bytemuck::cast_slice(self.uvs()));
        }

        reallocated
    }

    /// Draw nothing until the next write; capacity and buffers are kept
    pub fn clear_active(&mut self) {
        self.active_glyphs = 0;
    }

    /// Release every buffer; capacity drops back to zero
    pub fn release<H: RenderHost>(&mut self, host: &mut H) {
        if let Some(buffers) = self.buffers.take() {
            host.release_buffer(buffers.positions);
            host.release_buffer(buffers.uvs);
            host.release_buffer(buffers.indices);
        }
        self.capacity = 0;
        self.active_glyphs = 0;
    }
}
