/// What a double-click (or drag) means right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Drag vertices, edges, or (with Control) whole polygons.
    #[default]
    Free,
    /// Double-click an edge to split it at its midpoint.
    CreateVertex,
    /// Three double-clicks place a new triangle.
    CreatePolygon,
    /// Double-click a vertex to remove it, or an edge to drop its constraint.
    Delete,
    /// Double-click two edges to make them perpendicular.
    SetPerpendicular,
    /// Double-click two edges to give them equal length.
    SetEqualLength,
}

impl Mode {
    /// Status line shown by the host.
    pub fn title(self) -> &'static str {
        match self {
            Mode::Free => "Free mode",
            Mode::CreateVertex => "Vertex creation mode",
            Mode::CreatePolygon => "Polygon creation mode",
            Mode::Delete => "Vertex deletion mode",
            Mode::SetPerpendicular => "Adding perpendicular constraint",
            Mode::SetEqualLength => "Adding equal length constraint",
        }
    }

    /// Double-clicks this mode collects before it acts.
    pub fn clicks_needed(self) -> usize {
        match self {
            Mode::Free => 0,
            Mode::CreateVertex | Mode::Delete => 1,
            Mode::SetPerpendicular | Mode::SetEqualLength => 2,
            Mode::CreatePolygon => 3,
        }
    }
}
