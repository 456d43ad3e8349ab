pub mod canvas;
pub mod color;
pub mod paint;

pub use canvas::{Canvas, CanvasConfig, Framebuffer, Label};
pub use color::Color;
pub use paint::{Palette, paint_polygon, paint_polygons};
