//! Polygon → canvas drawing commands.
//!
//! Walks the ring once and emits, per edge: the edge line, a marker on
//! each endpoint, and a label such as `⊥3` at the midpoint when the edge
//! carries a constraint.

use crate::canvas::Canvas;
use crate::color::Color;
use poly_core::{Edge, EdgeId, Polygon};

/// Colors and sizes used by the painter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub edge: Color,
    pub vertex: Color,
    pub label: Color,
    /// Drawn instead of `edge` on a ring flagged incorrect.
    pub incorrect: Color,
    pub label_size: u32,
    /// Label offset from the edge midpoint, in pixels.
    pub label_offset: (i64, i64),
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            edge: Color::BLACK,
            vertex: Color::BLUE,
            label: Color::RED,
            incorrect: Color::RED,
            label_size: 12,
            label_offset: (4, -4),
        }
    }
}

/// Paint every polygon in order.
pub fn paint_polygons<'a, C, I>(canvas: &mut C, polygons: I, palette: &Palette)
where
    C: Canvas + ?Sized,
    I: IntoIterator<Item = &'a Polygon>,
{
    for polygon in polygons {
        paint_polygon(canvas, polygon, palette);
    }
}

/// Paint one polygon: edges first, then vertex markers on top.
pub fn paint_polygon<C: Canvas + ?Sized>(canvas: &mut C, polygon: &Polygon, palette: &Palette) {
    let color = if polygon.is_correct() {
        palette.edge
    } else {
        palette.incorrect
    };
    for (id, edge) in polygon.edges() {
        canvas.draw_line(edge.begin(), edge.end(), color);
        paint_label(canvas, id, edge, palette);
    }
    for (_, edge) in polygon.edges() {
        paint_vertex(canvas, edge, palette);
    }
}

fn paint_vertex<C: Canvas + ?Sized>(canvas: &mut C, edge: &Edge, palette: &Palette) {
    for p in [edge.begin(), edge.end()] {
        canvas.set_pixel(p.x.round() as i64, p.y.round() as i64, palette.vertex);
    }
}

fn paint_label<C: Canvas + ?Sized>(canvas: &mut C, id: EdgeId, edge: &Edge, palette: &Palette) {
    let Some(constraint) = edge.constraint() else {
        return;
    };
    let text = format!("{}{}", constraint.kind.symbol(), constraint.id);
    let mid = edge.midpoint();
    let (x, y) = (
        mid.x.round() as i64 + palette.label_offset.0,
        mid.y.round() as i64 + palette.label_offset.1,
    );
    log::trace!("LABEL {id} {text:?} at ({x}, {y})");
    canvas.draw_text(x, y, &text, palette.label_size, palette.label);
}
