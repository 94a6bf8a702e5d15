//! Text demo application
//!
//! Loads a font descriptor and a renderer config from disk, drives a text
//! renderer against the headless host for a few frames and logs the glyph
//! layout each frame produces.

use std::path::Path;
use std::sync::Arc;

use bmtext::config::{Config, ConfigError, TextRendererConfig};
use bmtext::foundation::logging;
use bmtext::render::HeadlessHost;
use bmtext::testing;
use bmtext::text::{FontDescriptor, FontError, FontTable, TextRenderer};
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_PATH: &str = "resources/demo.ron";

/// Demo settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct DemoConfig {
    /// Default log filter when `RUST_LOG` is unset
    log_level: String,
    /// Frames to simulate
    frames: u32,
    /// Seconds per simulated frame
    frame_time: f32,
    /// Font descriptor, TOML or RON
    font_path: String,
    /// Renderer config, TOML or RON
    renderer_config_path: String,
    /// Text set before each frame; the renderer config text is used when empty
    frame_texts: Vec<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            frames: 3,
            frame_time: 1.0 / 60.0,
            font_path: "resources/fonts/mono.ron".to_string(),
            renderer_config_path: "resources/label.toml".to_string(),
            frame_texts: Vec::new(),
        }
    }
}

impl Config for DemoConfig {}

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Font error: {0}")]
    Font(#[from] FontError),
}

struct DemoApp {
    config: DemoConfig,
    renderer: TextRenderer<HeadlessHost>,
}

impl DemoApp {
    fn new(config: DemoConfig) -> Self {
        Self { config, renderer: TextRenderer::new(HeadlessHost::new()) }
    }

    fn load_font(&self) -> Result<Arc<FontTable>, DemoError> {
        let descriptor = if Path::new(&self.config.font_path).exists() {
            FontDescriptor::load_from_file(&self.config.font_path)?
        } else {
            // Fallback to a generated font so the demo runs from anywhere
            log::warn!("Font '{}' not found, using generated monospace font", self.config.font_path);
            testing::monospace_descriptor(10, 20)
        };

        let font = FontTable::from_descriptor(&descriptor)?;
        Ok(Arc::new(font))
    }

    fn load_renderer_config(&self) -> Result<TextRendererConfig, DemoError> {
        let path = &self.config.renderer_config_path;
        if !Path::new(path).exists() {
            log::warn!("Renderer config '{}' not found, using defaults", path);
            return Ok(TextRendererConfig::default());
        }

        let mut config = TextRendererConfig::load_from_file(path)?;
        if config.migrate() {
            log::info!("Renderer config '{}' upgraded to the current format", path);
        }
        config.validate()?;
        Ok(config)
    }

    fn initialize(&mut self) -> Result<(), DemoError> {
        log::info!("Initializing text demo...");
        let font = self.load_font()?;
        let renderer_config = self.load_renderer_config()?;

        log::info!(
            "Font ready: {} glyphs, line height {}, {:?}",
            font.glyph_count(),
            font.line_height(),
            font.rendering_mode()
        );
        renderer_config.apply(&mut self.renderer, Some(font));
        Ok(())
    }

    fn run(&mut self) -> Result<(), DemoError> {
        self.initialize()?;

        for frame in 0..self.config.frames {
            if let Some(text) = self.config.frame_texts.get(frame as usize) {
                self.renderer.set_text(text.as_str());
            }
            self.renderer.update(self.config.frame_time);
            self.report(frame);
        }

        let stats = self.renderer.stats();
        log::info!(
            "Done: {} syncs, {} layouts, {} material updates, {} material swaps",
            stats.syncs,
            stats.layouts,
            stats.material_updates,
            stats.material_swaps
        );

        self.renderer.destroy();
        let host = self.renderer.host();
        log::info!(
            "Host after destroy: {} buffers, {} materials, {} attached",
            host.live_buffers(),
            host.live_materials(),
            host.attached_count()
        );
        Ok(())
    }

    fn report(&self, frame: u32) {
        let layout = self.renderer.layout();
        log::info!(
            "Frame {}: {} glyphs in {} slots, {} lines",
            frame,
            self.renderer.visible_glyph_count(),
            self.renderer.capacity(),
            layout.line_widths.len()
        );

        if let Some(bounds) = self.renderer.bounds() {
            log::info!(
                "  bounds ({:.1}, {:.1}) - ({:.1}, {:.1}), {:.1} x {:.1} px",
                bounds.min_x,
                bounds.min_y,
                bounds.max_x,
                bounds.max_y,
                bounds.width(),
                bounds.height()
            );
        }
        for (line, width) in layout.line_widths.iter().enumerate() {
            log::debug!("  line {}: width {:.1}", line, width);
        }
        for quad in &layout.quads {
            log::trace!(
                "  {:?} at ({:.1}, {:.1})",
                char::from_u32(quad.code).unwrap_or(char::REPLACEMENT_CHARACTER),
                quad.left(),
                quad.top()
            );
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = if Path::new(&config_path).exists() {
        DemoConfig::load_from_file(&config_path)?
    } else {
        DemoConfig::default()
    };

    logging::init_with_level(&config.log_level);
    log::info!("Starting text demo with {:?}", config_path);

    let mut app = DemoApp::new(config);
    app.run()?;

    log::info!("Text demo finished");
    Ok(())
}
