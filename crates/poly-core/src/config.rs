//! Engine tunables.

/// Hit thresholds and the propagation budget policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// A click within this squared distance of a vertex grabs the vertex.
    pub vertex_hit_sq: f64,
    /// A click within this squared distance of an edge body grabs the edge.
    pub edge_hit_sq: f64,
    /// Hops allowed per vertex for one gesture. The budget for a gesture is
    /// `budget_per_vertex * vertex_count`.
    pub budget_per_vertex: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            vertex_hit_sq: 6.0,
            edge_hit_sq: 6.0,
            budget_per_vertex: 3,
        }
    }
}

impl EngineConfig {
    pub fn budget_for(&self, vertex_count: usize) -> i32 {
        self.budget_per_vertex
            .saturating_mul(i32::try_from(vertex_count).unwrap_or(i32::MAX))
    }
}
