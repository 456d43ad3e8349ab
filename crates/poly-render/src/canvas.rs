//! Drawing sink.
//!
//! The painter only needs two primitives from its host: set one pixel and
//! draw a short text label. Lines are rasterized on top of `set_pixel`.
//! [`Framebuffer`] is an in-memory sink for headless use and tests.

use crate::color::Color;
use poly_core::Point2d;

/// Host drawing surface.
pub trait Canvas {
    fn set_pixel(&mut self, x: i64, y: i64, color: Color);

    fn draw_text(&mut self, x: i64, y: i64, text: &str, size: u32, color: Color);

    /// Bresenham line from `from` to `to`, both endpoints included.
    fn draw_line(&mut self, from: Point2d, to: Point2d, color: Color) {
        let (mut x, mut y) = (from.x.round() as i64, from.y.round() as i64);
        let (x1, y1) = (to.x.round() as i64, to.y.round() as i64);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

/// A text label placed on a [`Framebuffer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub x: i64,
    pub y: i64,
    pub text: String,
    pub size: u32,
    pub color: Color,
}

/// Canvas configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Pixel grid plus the labels drawn on it. Writes outside the grid are
/// dropped.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Option<Color>>,
    labels: Vec<Label>,
}

impl Framebuffer {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            pixels: vec![None; config.width as usize * config.height as usize],
            labels: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self) {
        self.pixels.fill(None);
        self.labels.clear();
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        (x < self.width as usize && y < self.height as usize).then(|| y * self.width as usize + x)
    }

    pub fn pixel(&self, x: i64, y: i64) -> Option<Color> {
        self.offset(x, y).and_then(|i| self.pixels[i])
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn lit_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| p.is_some()).count()
    }

    /// Text rendering of the grid, one row per line: `.` for background,
    /// `o` for vertex-colored pixels, `#` for everything else, with label
    /// text written over the row it sits on.
    pub fn to_ascii(&self, vertex_color: Color) -> String {
        let w = self.width as usize;
        let mut rows: Vec<Vec<char>> = self
            .pixels
            .chunks(w.max(1))
            .map(|row| {
                row.iter()
                    .map(|p| match p {
                        None => '.',
                        Some(c) if *c == vertex_color => 'o',
                        Some(_) => '#',
                    })
                    .collect()
            })
            .collect();
        for label in &self.labels {
            let Some(row) = usize::try_from(label.y).ok().and_then(|y| rows.get_mut(y)) else {
                continue;
            };
            for (i, ch) in label.text.chars().enumerate() {
                if let Ok(x) = usize::try_from(label.x + i as i64)
                    && let Some(cell) = row.get_mut(x)
                {
                    *cell = ch;
                }
            }
        }
        let mut out = String::with_capacity(rows.len() * (w + 1));
        for row in rows {
            out.extend(row);
            out.push('\n');
        }
        out
    }
}

impl Canvas for Framebuffer {
    fn set_pixel(&mut self, x: i64, y: i64, color: Color) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i] = Some(color);
        }
    }

    fn draw_text(&mut self, x: i64, y: i64, text: &str, size: u32, color: Color) {
        self.labels.push(Label {
            x,
            y,
            text: text.to_owned(),
            size,
            color,
        });
    }
}
