//! Renderer behavior against the headless host

use std::sync::Arc;

use bmtext::config::{Config, TextRendererConfig};
use bmtext::foundation::math::ceil_power_of_two;
use bmtext::render::{HeadlessHost, RenderHost, TextureHandle};
use bmtext::testing;
use bmtext::text::{
    DropShadow, FontDescriptor, FontTable, LayoutOptions, MaterialKind, RenderingMode, TextRenderer,
};

#[test]
fn growing_text_reallocates_and_releases_old_buffers_once() {
    let mut host = HeadlessHost::new();
    {
        let mut renderer = TextRenderer::new(&mut host);
        renderer.set_font(Some(testing::monospace_font(10, 20)), MaterialKind::Basic, None);

        renderer.set_text("abc");
        renderer.update(0.016);
        assert_eq!(renderer.capacity(), 4);

        renderer.set_text("abcde");
        renderer.update(0.016);
        assert_eq!(renderer.capacity(), 8);

        let stats = renderer.host().stats();
        assert_eq!(stats.buffers_allocated, 6);
        assert_eq!(stats.buffers_released, 3);
        assert_eq!(renderer.host().live_buffers(), 3);
    }
    // Dropped renderer gave everything back
    assert_eq!(host.live_buffers(), 0);
    assert_eq!(host.live_materials(), 0);
    assert_eq!(host.attached_count(), 0);
}

#[test]
fn capacity_is_monotonic_over_a_session() {
    let mut renderer = TextRenderer::new(HeadlessHost::new());
    renderer.set_font(Some(testing::monospace_font(8, 16)), MaterialKind::Basic, None);

    let mut high_water = 0;
    for text in ["a", "abcdefghi", "", "ab", "abcdefghijklmnopq", "abc"] {
        renderer.set_text(text);
        renderer.update(0.016);

        let glyphs = text.chars().count();
        high_water = high_water.max(glyphs);
        assert!(renderer.capacity() >= glyphs);
        assert_eq!(renderer.capacity(), ceil_power_of_two(high_water));
        assert_eq!(renderer.visible_glyph_count(), glyphs);
    }
}

#[test]
fn drawn_range_covers_only_visible_glyphs() {
    let mut renderer = TextRenderer::new(HeadlessHost::new());
    renderer.set_font(Some(testing::monospace_font(10, 20)), MaterialKind::Basic, None);
    renderer.set_text("abcdefghij");
    renderer.update(0.016);
    renderer.set_text("xyz");
    renderer.update(0.016);

    let attached = renderer.host().attached(renderer.text_renderable_id()).unwrap();
    assert_eq!(attached.index_count, 18);
    assert_eq!(renderer.mesh().active_range(), 0..18);
    assert_eq!(renderer.capacity(), 16);
}

#[test]
fn one_font_shared_by_many_renderers() {
    let font = testing::monospace_font(10, 20);
    let mut host = HeadlessHost::new();

    let mut renderers: Vec<_> = ["one", "two", "three"]
        .iter()
        .map(|text| {
            let mut renderer = TextRenderer::new(HeadlessHost::new());
            renderer.set_font(Some(Arc::clone(&font)), MaterialKind::Basic, None);
            renderer.set_text(*text);
            renderer
        })
        .collect();
    for renderer in &mut renderers {
        renderer.update(0.016);
    }

    let counts: Vec<_> = renderers.iter().map(TextRenderer::visible_glyph_count).collect();
    assert_eq!(counts, vec![3, 3, 5]);
    assert_eq!(Arc::strong_count(&font), 4);

    drop(renderers);
    assert_eq!(Arc::strong_count(&font), 1);

    // The borrowed form works for a caller-owned host too
    let mut renderer = TextRenderer::new(&mut host);
    renderer.set_font(Some(font), MaterialKind::Basic, None);
    renderer.set_text("four");
    assert!(renderer.force_sync());
    assert_eq!(renderer.visible_glyph_count(), 4);
}

#[test]
fn texture_reference_reaches_the_material() {
    let font = FontTable::from_descriptor(&testing::monospace_descriptor(10, 20))
        .unwrap()
        .with_texture(TextureHandle(7));
    let mut renderer = TextRenderer::new(HeadlessHost::new());
    renderer.set_font(Some(Arc::new(font)), MaterialKind::Basic, None);
    renderer.set_text("tex");
    renderer.update(0.016);

    let material = renderer.host().attached(renderer.text_renderable_id()).unwrap().material;
    assert_eq!(renderer.host().material(material).unwrap().params.texture, Some(TextureHandle(7)));
}

#[test]
fn msdf_font_with_shadow_swaps_both_materials() {
    let mut renderer = TextRenderer::new(HeadlessHost::new());
    renderer.set_font(Some(testing::monospace_font(10, 20)), MaterialKind::Basic, None);
    renderer.set_drop_shadow(Some(DropShadow::default()));
    renderer.set_text("shadow");
    renderer.update(0.016);
    assert_eq!(renderer.host().live_materials(), 2);

    let msdf = FontTable::from_descriptor(&FontDescriptor {
        rendering_mode: RenderingMode::Msdf,
        ..testing::monospace_descriptor(10, 20)
    })
    .unwrap();
    renderer.set_font(Some(Arc::new(msdf)), MaterialKind::Basic, None);
    renderer.update(0.016);

    let host = renderer.host();
    assert_eq!(host.live_materials(), 2);
    assert_eq!(host.stats().materials_released, 2);
    assert_eq!(host.stats().materials_created, 4);
    for renderable in host.scene() {
        let material = host.material(renderable.material).unwrap();
        assert_eq!(material.params.rendering_mode, RenderingMode::Msdf);
    }
    assert_eq!(host.attached_count(), 2);
}

#[test]
fn config_file_drives_a_renderer() {
    let dir = std::env::temp_dir().join(format!("bmtext-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("label.ron");
    let path = path.to_str().unwrap();

    let config = TextRendererConfig {
        text: "Saved\nLabel".to_string(),
        color: Some("00ff00".to_string()),
        ..Default::default()
    };
    config.save_to_file(path).unwrap();
    let loaded = TextRendererConfig::load_from_file(path).unwrap();
    assert_eq!(loaded, config);

    let mut renderer = TextRenderer::new(HeadlessHost::new());
    loaded.apply(&mut renderer, Some(testing::monospace_font(10, 20)));
    renderer.update(0.016);
    assert_eq!(renderer.visible_glyph_count(), 10);
    assert_eq!(renderer.options(), &loaded.layout_options());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn options_survive_font_reload() {
    let mut renderer = TextRenderer::new(HeadlessHost::new());
    renderer.set_options(LayoutOptions { opacity: Some(0.3), ..LayoutOptions::default() });
    renderer.set_text("fade");
    renderer.update(0.016);
    assert!(!renderer.is_attached());

    renderer.set_font(Some(testing::monospace_font(10, 20)), MaterialKind::Basic, None);
    renderer.update(0.016);

    let host = renderer.host();
    let material = host.attached(renderer.text_renderable_id()).unwrap().material;
    let params = &host.material(material).unwrap().params;
    assert_eq!(params.opacity, 0.3);
    assert!(params.transparent);
}

#[test]
fn host_trait_objects_can_be_driven_directly() {
    let mut host = HeadlessHost::new();
    let dynamic: &mut dyn RenderHost = &mut host;
    let mut renderer = TextRenderer::new(dynamic);
    renderer.set_font(Some(testing::example_font()), MaterialKind::Basic, None);
    renderer.set_text("AAAAA");
    renderer.force_sync();
    assert_eq!(renderer.capacity(), 8);
}
