//! Editor configuration: engine tunables, colors, and canvas size.

use poly_core::EngineConfig;
use poly_render::{CanvasConfig, Palette};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EditorConfig {
    pub engine: EngineConfig,
    pub palette: Palette,
    pub canvas: CanvasConfig,
}

impl EditorConfig {
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_canvas(mut self, canvas: CanvasConfig) -> Self {
        self.canvas = canvas;
        self
    }
}
