//! Recoverable edit failures.
//!
//! None of these are fatal: the caller shows a hint (or nothing) and the
//! polygon is left exactly as it was before the call.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditError {
    /// No vertex, edge, or grab near the given point.
    #[error("nothing to edit at this position")]
    Miss,
    #[error("edge already carries a constraint")]
    AlreadyConstrained,
    #[error("an edge cannot be constrained to itself")]
    SameEdge,
    /// The requested geometry collapses an edge to a point.
    #[error("edit would produce a degenerate edge")]
    Degenerate,
    /// Propagation ran out of budget; the ring was rolled back.
    #[error("could not satisfy constraints, try again")]
    Unsatisfiable,
    #[error("a polygon needs at least 3 vertices")]
    VertexFloor,
}
