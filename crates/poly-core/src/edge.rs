//! One side of a polygon.
//!
//! Edges live in the polygon's arena and link to their ring neighbours by
//! [`EdgeId`]. The `end` of an edge coincides with the `begin` of its `next`
//! whenever no propagation is in flight.

use crate::config::EngineConfig;
use crate::id::ConstraintId;
use crate::point::{Point2d, distance_to_segment_squared};
use std::fmt;

/// Stable handle of an edge inside its polygon's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// The partner edge stays at a right angle to this one.
    Perpendicular,
    /// The partner edge keeps the same length as this one.
    EqualLength,
}

impl ConstraintKind {
    /// Glyph drawn next to the constraint label.
    pub fn symbol(self) -> &'static str {
        match self {
            ConstraintKind::Perpendicular => "⊥",
            ConstraintKind::EqualLength => "=",
        }
    }
}

/// A constraint as seen from one side of the pair.
///
/// Both partners carry a mirror image: same `kind`, same `id`, and each
/// names the other as `partner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub partner: EdgeId,
    pub id: ConstraintId,
}

/// Which endpoint of an edge an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Begin,
    End,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Begin => Side::End,
            Side::End => Side::Begin,
        }
    }
}

/// The part of an edge currently held by the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Grab {
    #[default]
    None,
    Begin,
    End,
    Body,
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub(crate) begin: Point2d,
    pub(crate) end: Point2d,
    pub(crate) next: EdgeId,
    pub(crate) prev: EdgeId,
    pub(crate) constraint: Option<Constraint>,
    pub(crate) grab: Grab,
    pub(crate) correct: bool,
}

impl Edge {
    /// A lone edge: both links point back at itself.
    pub(crate) fn new(id: EdgeId, begin: Point2d, end: Point2d) -> Self {
        Self {
            begin,
            end,
            next: id,
            prev: id,
            constraint: None,
            grab: Grab::None,
            correct: true,
        }
    }

    pub fn begin(&self) -> Point2d {
        self.begin
    }

    pub fn end(&self) -> Point2d {
        self.end
    }

    pub fn next(&self) -> EdgeId {
        self.next
    }

    pub fn prev(&self) -> EdgeId {
        self.prev
    }

    pub fn constraint(&self) -> Option<Constraint> {
        self.constraint
    }

    pub fn grab(&self) -> Grab {
        self.grab
    }

    /// False once a propagation chain gave up on this ring.
    pub fn is_correct(&self) -> bool {
        self.correct
    }

    /// Vector from `begin` to `end`.
    pub fn direction(&self) -> Point2d {
        self.end - self.begin
    }

    pub fn length(&self) -> f64 {
        self.direction().length()
    }

    pub fn midpoint(&self) -> Point2d {
        self.begin.midpoint(self.end)
    }

    pub fn point(&self, side: Side) -> Point2d {
        match side {
            Side::Begin => self.begin,
            Side::End => self.end,
        }
    }

    pub(crate) fn set_point(&mut self, side: Side, to: Point2d) {
        match side {
            Side::Begin => self.begin = to,
            Side::End => self.end = to,
        }
    }

    /// The ring neighbour sharing the vertex at `side`.
    pub fn neighbor(&self, side: Side) -> EdgeId {
        match side {
            Side::Begin => self.prev,
            Side::End => self.next,
        }
    }

    pub(crate) fn translate(&mut self, delta: Point2d) {
        self.begin += delta;
        self.end += delta;
    }

    pub fn distance_squared_to(&self, point: Point2d) -> f64 {
        distance_to_segment_squared(self.begin, self.end, point)
    }

    /// Classify a click against this edge: vertices first, then the body.
    pub fn hit_test(&self, point: Point2d, config: &EngineConfig) -> Grab {
        if point.distance_squared(self.begin) < config.vertex_hit_sq {
            Grab::Begin
        } else if point.distance_squared(self.end) < config.vertex_hit_sq {
            Grab::End
        } else if self.distance_squared_to(point) < config.edge_hit_sq {
            Grab::Body
        } else {
            Grab::None
        }
    }
}
