//! Text renderer state machine
//!
//! A [`TextRenderer`] is the per-component piece of a bitmap text plugin.
//! Setters only record what changed in a set of [`DirtyFlags`]; the actual
//! work (layout, buffer writes, material updates, scene attachment) happens
//! at a single sync point per frame. Any number of setter calls between two
//! sync points costs at most one layout and one material update.
//!
//! Missing fonts or text are a normal idle state: the renderer detaches its
//! drawables and waits.

use std::sync::Arc;

use bitflags::bitflags;

use super::font_table::FontTable;
use super::mesh_buffer::MeshBufferManager;
use super::options::{DropShadow, EffectiveOptions, LayoutOptions};
use super::text_layout::{LayoutResult, TextBounds, TextLayout, INDICES_PER_QUAD};
use super::text_material::{MaterialKind, MaterialParams, MaterialVariant, ShaderParams};
use crate::foundation::math::Vec3;
use crate::render::{MaterialHandle, RenderHost, Renderable, RenderableId};

/// How far behind the text the drop shadow is drawn, in world units
pub const SHADOW_DEPTH_OFFSET: f32 = 0.01;

bitflags! {
    /// Rebuilds pending for the next sync point
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DirtyFlags: u8 {
        /// Re-run layout and rewrite the glyph buffers
        const MESH = 1 << 0;
        /// Push color, opacity and texture uniforms
        const MATERIAL = 1 << 1;
        /// Create, update or remove the drop shadow
        const SHADOW = 1 << 2;
        /// Recreate material objects for a new variant
        const MATERIAL_SWAP = 1 << 3;
    }
}

/// Work done by a renderer so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Sync points that had pending work
    pub syncs: usize,
    /// Layout passes
    pub layouts: usize,
    /// Main material creations and uniform updates
    pub material_updates: usize,
    /// Material objects recreated for a variant change
    pub material_swaps: usize,
}

#[derive(Debug)]
struct BoundMaterial {
    handle: MaterialHandle,
    variant: MaterialVariant,
}

/// Bitmap font text renderer bound to a host
///
/// # Example
///
/// ```
/// use bmtext::render::HeadlessHost;
/// use bmtext::testing;
/// use bmtext::text::{MaterialKind, TextRenderer};
///
/// let mut host = HeadlessHost::new();
/// {
///     let mut renderer = TextRenderer::new(&mut host);
///     renderer.set_font(Some(testing::example_font()), MaterialKind::Basic, None);
///     renderer.set_text("AAA");
///
///     // Read bounds before the next frame tick
///     renderer.force_sync();
///     assert!(renderer.bounds().is_some());
/// }
/// // Dropping the renderer released everything it created
/// assert_eq!(host.live_buffers(), 0);
/// assert_eq!(host.attached_count(), 0);
/// ```
pub struct TextRenderer<H: RenderHost> {
    host: H,
    text: Option<String>,
    font: Option<Arc<FontTable>>,
    material_kind: MaterialKind,
    shader: Option<ShaderParams>,
    options: LayoutOptions,
    dirty: DirtyFlags,
    mesh: MeshBufferManager,
    material: Option<BoundMaterial>,
    shadow_material: Option<MaterialHandle>,
    text_id: RenderableId,
    shadow_id: RenderableId,
    text_renderable: Option<Renderable>,
    shadow_renderable: Option<Renderable>,
    layer_active: bool,
    elapsed: f32,
    layout: LayoutResult,
    stats: SyncStats,
    destroyed: bool,
}

impl<H: RenderHost> TextRenderer<H> {
    /// Create an idle renderer drawing through `host`
    pub fn new(host: H) -> Self {
        Self {
            host,
            text: None,
            font: None,
            material_kind: MaterialKind::Basic,
            shader: None,
            options: LayoutOptions::default(),
            dirty: DirtyFlags::empty(),
            mesh: MeshBufferManager::new(),
            material: None,
            shadow_material: None,
            text_id: RenderableId::next(),
            shadow_id: RenderableId::next(),
            text_renderable: None,
            shadow_renderable: None,
            layer_active: true,
            elapsed: 0.0,
            layout: LayoutResult::default(),
            stats: SyncStats::default(),
            destroyed: false,
        }
    }

    /// The injected host
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the injected host
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Current text
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Current font
    pub const fn font(&self) -> Option<&Arc<FontTable>> {
        self.font.as_ref()
    }

    /// Current layout options
    pub const fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Rebuilds pending for the next sync point
    pub const fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    /// Glyph buffers
    pub const fn mesh(&self) -> &MeshBufferManager {
        &self.mesh
    }

    /// Allocated glyph capacity
    pub const fn capacity(&self) -> usize {
        self.mesh.capacity()
    }

    /// Glyphs drawn since the last sync
    pub const fn visible_glyph_count(&self) -> usize {
        self.mesh.active_glyph_count()
    }

    /// Result of the last layout pass
    pub const fn layout(&self) -> &LayoutResult {
        &self.layout
    }

    /// Bounds of the last layout in glyph pixels, before the world scale
    pub fn bounds(&self) -> Option<TextBounds> {
        self.layout.bounds()
    }

    /// Scene id of the text drawable
    pub const fn text_renderable_id(&self) -> RenderableId {
        self.text_id
    }

    /// Scene id of the drop shadow drawable
    pub const fn shadow_renderable_id(&self) -> RenderableId {
        self.shadow_id
    }

    /// Whether the text drawable is in the scene
    pub const fn is_attached(&self) -> bool {
        self.text_renderable.is_some()
    }

    /// Seconds accumulated by [`update`](Self::update)
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Work done so far
    pub const fn stats(&self) -> SyncStats {
        self.stats
    }

    /// Whether [`destroy`](Self::destroy) has run
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn mark(&mut self, flags: DirtyFlags) -> bool {
        if self.destroyed {
            log::debug!("Ignoring change on destroyed text renderer");
            return false;
        }
        self.dirty |= flags;
        true
    }

    /// Replace the text
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.text.as_deref() == Some(text.as_str()) {
            return;
        }
        if self.mark(DirtyFlags::MESH) {
            self.text = Some(text);
        }
    }

    /// Remove the text; the renderer goes idle at the next sync
    pub fn clear_text(&mut self) {
        if self.mark(DirtyFlags::MESH) {
            self.text = None;
        }
    }

    /// Replace the font and the material used to draw it
    ///
    /// A new font changes UVs and default colors, so it always rebuilds the
    /// mesh and the materials. A different material variant recreates the
    /// material objects instead of updating them.
    pub fn set_font(&mut self, font: Option<Arc<FontTable>>, kind: MaterialKind, shader: Option<ShaderParams>) {
        let mut flags = DirtyFlags::MESH | DirtyFlags::MATERIAL | DirtyFlags::SHADOW;
        if let (Some(font), Some(bound)) = (&font, &self.material) {
            if bound.variant != MaterialVariant::for_font(font, kind, shader.as_ref()) {
                flags |= DirtyFlags::MATERIAL_SWAP;
            }
        }

        if self.mark(flags) {
            self.font = font;
            self.material_kind = kind;
            self.shader = shader;
        }
    }

    /// Replace all layout options
    pub fn set_options(&mut self, options: LayoutOptions) {
        if self.mark(DirtyFlags::MESH | DirtyFlags::MATERIAL | DirtyFlags::SHADOW) {
            self.options = options;
        }
    }

    /// Override the font color, `None` restores the font default
    pub fn set_color(&mut self, color: Option<String>) {
        if self.mark(DirtyFlags::MATERIAL) {
            self.options.color = color;
        }
    }

    /// Override the font opacity, `None` restores the font default
    pub fn set_opacity(&mut self, opacity: Option<f32>) {
        if self.mark(DirtyFlags::MATERIAL | DirtyFlags::SHADOW) {
            self.options.opacity = opacity;
        }
    }

    /// Add, change or remove the drop shadow
    pub fn set_drop_shadow(&mut self, shadow: Option<DropShadow>) {
        if self.mark(DirtyFlags::SHADOW) {
            self.options.drop_shadow = shadow;
        }
    }

    /// Show or hide the drawables without rebuilding anything
    pub fn set_layer_active(&mut self, active: bool) {
        if self.destroyed {
            return;
        }
        self.layer_active = active;
        for renderable in [&mut self.text_renderable, &mut self.shadow_renderable]
            .into_iter()
            .flatten()
        {
            renderable.visible = active;
            self.host.attach(renderable);
        }
    }

    /// Per-frame callback: advance the clock, then sync
    ///
    /// Shader materials get the accumulated time as a uniform every frame.
    pub fn update(&mut self, delta_time: f32) -> bool {
        if self.destroyed {
            return false;
        }
        self.elapsed += delta_time;
        if self.material_kind == MaterialKind::Shader && self.material.is_some() {
            self.dirty |= DirtyFlags::MATERIAL;
        }
        self.sync()
    }

    /// Run pending rebuilds now instead of waiting for the next frame
    pub fn force_sync(&mut self) -> bool {
        self.sync()
    }

    /// Apply every pending change and clear the dirty flags
    ///
    /// Returns whether there was anything to do.
    pub fn sync(&mut self) -> bool {
        if self.destroyed || self.dirty.is_empty() {
            return false;
        }
        let dirty = std::mem::replace(&mut self.dirty, DirtyFlags::empty());
        self.stats.syncs += 1;

        let Some(font) = self.font.clone() else {
            log::trace!("Text renderer has no font, staying hidden");
            self.layout = LayoutResult::default();
            self.mesh.clear_active();
            self.hide();
            return true;
        };
        let effective = self.options.resolve(&font);

        if dirty.contains(DirtyFlags::MATERIAL_SWAP) {
            self.swap_materials(&font);
        }
        self.sync_material(&font, &effective, dirty);
        self.sync_shadow_material(&font, &effective, dirty);
        if dirty.contains(DirtyFlags::MESH) {
            self.rebuild_mesh(&font, &effective);
        }
        self.submit(&font, &effective);
        true
    }

    fn swap_materials(&mut self, font: &FontTable) {
        let desired = MaterialVariant::for_font(font, self.material_kind, self.shader.as_ref());
        if self.material.as_ref().is_some_and(|bound| bound.variant != desired) {
            log::debug!("Recreating text materials for {:?}", desired);
            self.release_materials();
            self.stats.material_swaps += 1;
        }
    }

    fn sync_material(&mut self, font: &FontTable, effective: &EffectiveOptions, dirty: DirtyFlags) {
        let params = MaterialParams::text(font, effective, self.shader.as_ref(), self.elapsed);

        if let Some(bound) = &self.material {
            if dirty.contains(DirtyFlags::MATERIAL) {
                self.host.update_material(bound.handle, &params);
                self.stats.material_updates += 1;
            }
        } else {
            let variant = MaterialVariant::for_font(font, self.material_kind, self.shader.as_ref());
            let handle = self.host.create_material(self.material_kind, &params);
            self.material = Some(BoundMaterial { handle, variant });
            self.stats.material_updates += 1;
        }
    }

    fn sync_shadow_material(&mut self, font: &FontTable, effective: &EffectiveOptions, dirty: DirtyFlags) {
        let Some(shadow) = effective.drop_shadow else {
            if let Some(handle) = self.shadow_material.take() {
                self.detach_shadow();
                self.host.release_material(handle);
            }
            return;
        };

        let params = MaterialParams::shadow(font, &shadow, effective.opacity, self.shader.as_ref(), self.elapsed);
        if let Some(handle) = self.shadow_material {
            if dirty.intersects(DirtyFlags::SHADOW | DirtyFlags::MATERIAL) {
                self.host.update_material(handle, &params);
            }
        } else {
            self.shadow_material = Some(self.host.create_material(self.material_kind, &params));
        }
    }

    fn rebuild_mesh(&mut self, font: &FontTable, effective: &EffectiveOptions) {
        let text = self.text.as_deref().unwrap_or("");
        self.layout = TextLayout::new(font).layout(text, effective);
        let reallocated = self.mesh.write(&mut self.host, &self.layout);
        self.stats.layouts += 1;

        log::debug!(
            "Rebuilt text mesh: {} glyphs in {} slots{}",
            self.layout.visible_glyph_count(),
            self.mesh.capacity(),
            if reallocated { " (reallocated)" } else { "" }
        );
    }

    fn submit(&mut self, font: &FontTable, effective: &EffectiveOptions) {
        let count = self.mesh.active_glyph_count();
        let (Some(buffers), Some(material)) = (self.mesh.buffers(), self.material.as_ref().map(|b| b.handle)) else {
            self.hide();
            return;
        };
        if count == 0 {
            self.hide();
            return;
        }

        let scale = 1.0 / font.pixels_per_unit();
        let text = Renderable {
            id: self.text_id,
            positions: buffers.positions,
            uvs: buffers.uvs,
            indices: buffers.indices,
            material,
            index_count: u32::try_from(count * INDICES_PER_QUAD).unwrap_or(u32::MAX),
            offset: Vec3::zeros(),
            scale,
            visible: self.layer_active,
        };

        match (effective.drop_shadow, self.shadow_material) {
            (Some(shadow), Some(shadow_material)) => {
                let shadow = Renderable {
                    id: self.shadow_id,
                    material: shadow_material,
                    offset: Vec3::new(shadow.offset_x * scale, shadow.offset_y * scale, -SHADOW_DEPTH_OFFSET),
                    ..text.clone()
                };
                self.host.attach(&shadow);
                self.shadow_renderable = Some(shadow);
            }
            _ => self.detach_shadow(),
        }

        self.host.attach(&text);
        self.text_renderable = Some(text);
    }

    fn detach_shadow(&mut self) {
        if self.shadow_renderable.take().is_some() {
            self.host.detach(self.shadow_id);
        }
    }

    fn hide(&mut self) {
        if self.text_renderable.take().is_some() {
            self.host.detach(self.text_id);
        }
        self.detach_shadow();
    }

    fn release_materials(&mut self) {
        if let Some(bound) = self.material.take() {
            self.host.release_material(bound.handle);
        }
        if let Some(handle) = self.shadow_material.take() {
            self.host.release_material(handle);
        }
    }

    /// Detach and release everything this renderer created
    ///
    /// The renderer is inert afterwards: setters and sync do nothing. Dropping
    /// a renderer destroys it as well.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.hide();
        self.release_materials();
        self.mesh.release(&mut self.host);
        self.layout = LayoutResult::default();
        self.dirty = DirtyFlags::empty();
        self.destroyed = true;
        log::debug!("Text renderer {:?} destroyed", self.text_id);
    }
}

impl<H: RenderHost> Drop for TextRenderer<H> {
    fn drop(&mut self) {
        self.destroy();
    }
}
