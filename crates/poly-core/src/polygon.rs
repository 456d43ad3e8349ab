//! Polygon: owns the edge ring and exposes every user-facing edit.
//!
//! Each edit either commits a consistent ring or leaves the polygon as it
//! was. Geometry-only edits (drags, constraint fitting) roll back from a
//! snapshot of the per-edge state when propagation stalls or settles on a
//! ring that breaks a constraint; topology edits (split, vertex removal)
//! cannot fail after they start mutating.

use crate::config::EngineConfig;
use crate::edge::{Constraint, ConstraintKind, Edge, EdgeId, Grab, Side};
use crate::error::EditError;
use crate::id::{ConstraintId, IdAllocator};
use crate::point::{EPSILON, Point2d};
use crate::ring::{Ring, RingIter};
use crate::solver::Step;

/// What [`Polygon::remove`] took away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Removal {
    /// A vertex at this position was removed; two edges became one.
    Vertex(Point2d),
    /// The constraint with this id was dropped from the pair.
    Constraint(ConstraintId),
}

/// Per-edge mutable state captured before a geometry edit.
#[derive(Debug, Clone)]
pub(crate) struct Snapshot {
    entries: Vec<(EdgeId, SavedEdge)>,
}

#[derive(Debug, Clone, Copy)]
struct SavedEdge {
    begin: Point2d,
    end: Point2d,
    constraint: Option<Constraint>,
}

#[derive(Debug, Clone)]
pub struct Polygon {
    ring: Ring,
    vertex_count: usize,
    config: EngineConfig,
}

impl Polygon {
    /// A triangle `p1 → p2 → p3`.
    pub fn create(p1: Point2d, p2: Point2d, p3: Point2d) -> Self {
        Self {
            ring: Ring::from_vertices(&[p1, p2, p3]),
            vertex_count: 3,
            config: EngineConfig::default(),
        }
    }

    /// A closed polygon through `vertices` in order.
    pub fn from_vertices(vertices: &[Point2d]) -> Result<Self, EditError> {
        if vertices.len() < 3 {
            return Err(EditError::VertexFloor);
        }
        Ok(Self {
            ring: Ring::from_vertices(vertices),
            vertex_count: vertices.len(),
            config: EngineConfig::default(),
        })
    }

    /// Heptagon with preset constraints: an adjacent perpendicular pair, a
    /// perpendicular pair three edges apart, and an equal-length pair.
    pub fn sample(ids: &mut IdAllocator) -> Result<Self, EditError> {
        let mut polygon = Self::from_vertices(&[
            Point2d::new(50.0, 150.0),
            Point2d::new(300.0, 150.0),
            Point2d::new(300.0, 250.0),
            Point2d::new(400.0, 300.0),
            Point2d::new(300.0, 400.0),
            Point2d::new(150.0, 400.0),
            Point2d::new(50.0, 300.0),
        ])?;
        let edges = polygon.ring.ids();
        polygon.set_perpendicular_edges(edges[0], edges[1], ids)?;
        polygon.set_perpendicular_edges(edges[3], edges[5], ids)?;
        polygon.set_equal_length_edges(edges[4], edges[6], ids)?;
        Ok(polygon)
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn head(&self) -> EdgeId {
        self.ring.head()
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.ring.get(id)
    }

    /// Edges in ring order, starting at the head.
    pub fn edges(&self) -> RingIter<'_> {
        self.ring.iter()
    }

    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.ring.ids()
    }

    /// Vertices in ring order: the `begin` of every edge.
    pub fn vertices(&self) -> Vec<Point2d> {
        self.edges().map(|(_, edge)| edge.begin()).collect()
    }

    /// Every edge ends where its successor begins.
    pub fn is_closed(&self) -> bool {
        self.ring.len() == self.vertex_count
            && self
                .edges()
                .all(|(_, edge)| self.ring[edge.next()].begin() == edge.end())
    }

    pub fn is_correct(&self) -> bool {
        self.ring.is_correct()
    }

    /// The edge currently held by the pointer.
    pub fn grabbed(&self) -> Option<EdgeId> {
        self.edges()
            .find(|(_, edge)| edge.grab() != Grab::None)
            .map(|(id, _)| id)
    }

    /// Nearest edge body within the edge hit threshold of `point`.
    pub fn edge_at(&self, point: Point2d) -> Option<EdgeId> {
        self.edges()
            .map(|(id, edge)| (id, edge.distance_squared_to(point)))
            .filter(|(_, d)| *d < self.config.edge_hit_sq)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    pub fn contains_vertex(&self, point: Point2d) -> bool {
        self.vertex_at(point).is_some()
    }

    /// First edge in ring order with an endpoint near `point`.
    fn vertex_at(&self, point: Point2d) -> Option<(EdgeId, Side)> {
        let threshold = self.config.vertex_hit_sq;
        self.edges().find_map(|(id, edge)| {
            if edge.end().distance_squared(point) < threshold {
                Some((id, Side::End))
            } else if edge.begin().distance_squared(point) < threshold {
                Some((id, Side::Begin))
            } else {
                None
            }
        })
    }

    /// Constraint ids held by this polygon, one per pair.
    pub fn constraint_ids(&self) -> Vec<ConstraintId> {
        let mut ids: Vec<ConstraintId> = self
            .edges()
            .filter_map(|(_, edge)| edge.constraint().map(|c| c.id))
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Return every constraint id of this polygon to `ids`. Call when the
    /// polygon leaves its collection.
    pub fn release_ids(&self, ids: &mut IdAllocator) {
        for id in self.constraint_ids() {
            ids.release(id);
        }
    }

    // ─── Pointer interaction ─────────────────────────────────────────────

    /// Offer a click to the edges in ring order; the first edge that hits
    /// takes the grab and every other edge lets go.
    pub fn on_mouse_down(&mut self, point: Point2d) -> bool {
        let mut claimed = false;
        for id in self.ring.ids() {
            let grab = if claimed {
                Grab::None
            } else {
                self.ring[id].hit_test(point, &self.config)
            };
            claimed |= grab != Grab::None;
            self.ring[id].grab = grab;
        }
        if claimed {
            log::trace!("grabbed {:?} at {point}", self.grabbed());
        }
        claimed
    }

    pub fn on_mouse_up(&mut self) {
        self.reset_interaction();
    }

    /// Drop any grab state (mode switch, pointer release).
    pub fn reset_interaction(&mut self) {
        for id in self.ring.ids() {
            self.ring[id].grab = Grab::None;
        }
    }

    /// Drag whatever is grabbed by `current - previous`.
    ///
    /// Returns `Ok(false)` when nothing is grabbed and `Ok(true)` once the
    /// move is committed (a zero delta counts as committed). With
    /// `move_whole` the entire polygon is translated without propagation.
    /// If the constraints cannot follow, the ring is restored and
    /// [`EditError::Unsatisfiable`] is returned.
    pub fn on_mouse_move(
        &mut self,
        current: Point2d,
        previous: Point2d,
        move_whole: bool,
    ) -> Result<bool, EditError> {
        let Some(id) = self.grabbed() else {
            return Ok(false);
        };
        let delta = current - previous;
        if delta.is_zero() {
            return Ok(true);
        }
        if move_whole {
            self.translate(delta);
            return Ok(true);
        }
        let budget = self.budget();
        self.drag(id, delta, budget)?;
        Ok(true)
    }

    /// Propagation budget for one gesture on this polygon.
    pub fn budget(&self) -> i32 {
        self.config.budget_for(self.vertex_count)
    }

    /// Move the grabbed part of `id` by `delta` with the given hop budget.
    pub fn drag(&mut self, id: EdgeId, delta: Point2d, budget: i32) -> Result<(), EditError> {
        let edge = self.ring.get(id).ok_or(EditError::Miss)?;
        let seeds: Vec<Step> = match edge.grab() {
            Grab::None => return Err(EditError::Miss),
            Grab::Begin => vec![Step::set_begin(id, edge.begin() + delta, budget)],
            Grab::End => vec![Step::set_end(id, edge.end() + delta, budget)],
            Grab::Body => {
                let (prev, next) = (edge.prev(), edge.next());
                let (begin, end) = (edge.begin() + delta, edge.end() + delta);
                let snapshot = self.snapshot();
                self.ring[id].translate(delta);
                let seeds = [
                    Step::set_end(prev, begin, budget - 1),
                    Step::set_begin(next, end, budget - 1),
                ];
                return self.commit_or_restore(snapshot, seeds);
            }
        };
        let snapshot = self.snapshot();
        self.commit_or_restore(snapshot, seeds)
    }

    /// Translate every edge by `delta`. Relative geometry is untouched, so
    /// no constraint needs revisiting.
    pub fn translate(&mut self, delta: Point2d) {
        for id in self.ring.ids() {
            self.ring[id].translate(delta);
        }
    }

    // ─── Topology edits ──────────────────────────────────────────────────

    /// Split the first edge (in ring order) whose body is near `point` at its
    /// midpoint. The split edge loses its constraint. Returns the new edge.
    pub fn add_vertex(
        &mut self,
        point: Point2d,
        ids: &mut IdAllocator,
    ) -> Result<EdgeId, EditError> {
        let threshold = self.config.edge_hit_sq;
        let id = self
            .edges()
            .find(|(_, edge)| edge.distance_squared_to(point) < threshold)
            .map(|(id, _)| id)
            .ok_or(EditError::Miss)?;
        self.remove_constraint(id, ids);
        let edge = &self.ring[id];
        let (mid, end) = (edge.midpoint(), edge.end());
        let added = self.ring.insert_after(id, mid, end);
        self.ring[id].end = mid;
        self.vertex_count += 1;
        log::debug!("split {id} at {mid}, new edge {added}");
        Ok(added)
    }

    /// Remove the vertex near `point`, or failing that the constraint of the
    /// edge under `point`.
    ///
    /// A triangle keeps all its vertices: [`EditError::VertexFloor`] is
    /// returned and nothing changes.
    pub fn remove(&mut self, point: Point2d, ids: &mut IdAllocator) -> Result<Removal, EditError> {
        if let Some((id, side)) = self.vertex_at(point) {
            if self.vertex_count <= 3 {
                return Err(EditError::VertexFloor);
            }
            let removed_at = self.ring[id].point(side);
            self.remove_vertex(id, side, ids);
            return Ok(Removal::Vertex(removed_at));
        }
        let id = self.edge_at(point).ok_or(EditError::Miss)?;
        let constraint = self.ring[id].constraint().ok_or(EditError::Miss)?;
        self.remove_constraint(id, ids);
        Ok(Removal::Constraint(constraint.id))
    }

    /// Collapse the vertex at `side` of `id` by merging `id` with the
    /// neighbour across it.
    fn remove_vertex(&mut self, id: EdgeId, side: Side, ids: &mut IdAllocator) {
        let victim = self.ring[id].neighbor(side);
        self.remove_constraint(id, ids);
        self.remove_constraint(victim, ids);
        let Some(removed) = self.ring.unlink(victim) else {
            return;
        };
        let reach = removed.point(side);
        self.ring[id].set_point(side, reach);
        self.vertex_count -= 1;
        // The new neighbour already starts at `reach`; both merged edges lost
        // their constraints, so nothing else has to follow.
        log::debug!("removed vertex between {id} and {victim}");
    }

    // ─── Constraints ─────────────────────────────────────────────────────

    /// Constrain the edges nearest `p1` and `p2` to stay perpendicular.
    pub fn set_perpendicular(
        &mut self,
        p1: Point2d,
        p2: Point2d,
        ids: &mut IdAllocator,
    ) -> Result<ConstraintId, EditError> {
        let (a, b) = self.resolve_pair(p1, p2)?;
        self.set_perpendicular_edges(a, b, ids)
    }

    /// Constrain the edges nearest `p1` and `p2` to keep equal lengths.
    pub fn set_equal_length(
        &mut self,
        p1: Point2d,
        p2: Point2d,
        ids: &mut IdAllocator,
    ) -> Result<ConstraintId, EditError> {
        let (a, b) = self.resolve_pair(p1, p2)?;
        self.set_equal_length_edges(a, b, ids)
    }

    fn resolve_pair(&self, p1: Point2d, p2: Point2d) -> Result<(EdgeId, EdgeId), EditError> {
        let a = self.edge_at(p1).ok_or(EditError::Miss)?;
        let b = self.edge_at(p2).ok_or(EditError::Miss)?;
        Ok((a, b))
    }

    fn check_pair(&self, a: EdgeId, b: EdgeId) -> Result<(), EditError> {
        let (ea, eb) = (
            self.ring.get(a).ok_or(EditError::Miss)?,
            self.ring.get(b).ok_or(EditError::Miss)?,
        );
        if a == b {
            return Err(EditError::SameEdge);
        }
        if ea.constraint().is_some() || eb.constraint().is_some() {
            return Err(EditError::AlreadyConstrained);
        }
        Ok(())
    }

    /// Make `b` perpendicular to `a` and keep it so.
    ///
    /// Adjacent edges meet again on the circle whose diameter joins their
    /// far endpoints (any point on it sees that diameter at a right angle),
    /// at the point closest to the current shared vertex. A distant `b` is
    /// turned to a right angle with `a` and reconciled with its neighbour.
    pub fn set_perpendicular_edges(
        &mut self,
        a: EdgeId,
        b: EdgeId,
        ids: &mut IdAllocator,
    ) -> Result<ConstraintId, EditError> {
        self.check_pair(a, b)?;
        let snapshot = self.snapshot();

        let adjacent = if self.ring[a].next() == b {
            Some((a, b))
        } else if self.ring[b].next() == a {
            Some((b, a))
        } else {
            None
        };

        let seeds: Vec<Step> = match adjacent {
            Some((first, second)) => {
                let far_a = self.ring[first].begin();
                let far_b = self.ring[second].end();
                let shared = self.ring[first].end();
                let center = far_a.midpoint(far_b);
                let radius = far_a.distance(far_b) / 2.0;
                if radius < EPSILON {
                    return Err(EditError::Degenerate);
                }
                let toward = (shared - center)
                    .normalized()
                    .or_else(|| (far_b - far_a).perp().normalized())
                    .ok_or(EditError::Degenerate)?;
                let corner = center + toward * radius;
                if corner == far_a || corner == far_b {
                    return Err(EditError::Degenerate);
                }
                self.ring[first].end = corner;
                self.ring[second].begin = corner;
                Vec::new()
            }
            None => {
                let budget = self.budget();
                let side = self.perpendicular_side(b);
                self.ring
                    .align_perpendicular(b, a, side, budget)
                    .ok_or(EditError::Degenerate)?
                    .into_vec()
            }
        };

        let id = self.link(a, b, ConstraintKind::Perpendicular, ids);
        if let Err(err) = self.commit_or_restore(snapshot, seeds) {
            ids.release(id);
            return Err(err);
        }
        log::debug!("{a} ⊥ {b} as constraint {id}");
        Ok(id)
    }

    /// Prefer turning `edge` around its begin; fall back to its end when
    /// only the predecessor is free to absorb the change.
    fn perpendicular_side(&self, edge: EdgeId) -> Side {
        let e = &self.ring[edge];
        let next_free = self.ring[e.next()].constraint().is_none();
        let prev_free = self.ring[e.prev()].constraint().is_none();
        if !next_free && prev_free {
            Side::Begin
        } else {
            Side::End
        }
    }

    /// Stretch `b` to the length of `a` and keep the two equal.
    pub fn set_equal_length_edges(
        &mut self,
        a: EdgeId,
        b: EdgeId,
        ids: &mut IdAllocator,
    ) -> Result<ConstraintId, EditError> {
        self.check_pair(a, b)?;
        let length = self.ring[a].length();
        if length < EPSILON || self.ring[b].length() < EPSILON {
            return Err(EditError::Degenerate);
        }
        let snapshot = self.snapshot();
        let budget = self.budget();
        // Keep the vertex `b` shares with `a` still; stretch from the far end.
        let seed = if self.ring[b].next() == a {
            Step::length_by_begin(b, a, budget)
        } else {
            Step::length_by_end(b, a, budget)
        };

        let id = self.link(a, b, ConstraintKind::EqualLength, ids);
        if let Err(err) = self.commit_or_restore(snapshot, [seed]) {
            ids.release(id);
            return Err(err);
        }
        log::debug!("{a} = {b} as constraint {id}");
        Ok(id)
    }

    fn link(
        &mut self,
        a: EdgeId,
        b: EdgeId,
        kind: ConstraintKind,
        ids: &mut IdAllocator,
    ) -> ConstraintId {
        let id = ids.allocate();
        self.ring[a].constraint = Some(Constraint {
            kind,
            partner: b,
            id,
        });
        self.ring[b].constraint = Some(Constraint {
            kind,
            partner: a,
            id,
        });
        id
    }

    /// Drop the constraint of `id` from both partners. Idempotent.
    pub fn remove_constraint(&mut self, id: EdgeId, ids: &mut IdAllocator) {
        let Some(constraint) = self.ring.get(id).and_then(Edge::constraint) else {
            return;
        };
        ids.release(constraint.id);
        self.ring[id].constraint = None;
        if let Some(partner) = self.ring.get(constraint.partner)
            && partner.constraint().is_some_and(|c| c.partner == id)
        {
            self.ring[constraint.partner].constraint = None;
        }
        log::debug!("constraint {} removed from {id}", constraint.id);
    }

    // ─── Transactions ────────────────────────────────────────────────────

    /// Capture the per-edge state a geometry edit may touch.
    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            entries: self
                .edges()
                .map(|(id, edge)| {
                    (
                        id,
                        SavedEdge {
                            begin: edge.begin,
                            end: edge.end,
                            constraint: edge.constraint,
                        },
                    )
                })
                .collect(),
        }
    }

    /// Put back the state captured by `snapshot` and clear the incorrect
    /// flag. Edges unlinked since the snapshot are skipped.
    pub(crate) fn restore(&mut self, snapshot: Snapshot) {
        for (id, saved) in snapshot.entries {
            let Some(edge) = self.ring.get_mut(id) else {
                continue;
            };
            edge.begin = saved.begin;
            edge.end = saved.end;
            edge.constraint = saved.constraint;
            edge.correct = true;
        }
    }

    fn commit_or_restore<I>(&mut self, snapshot: Snapshot, seeds: I) -> Result<(), EditError>
    where
        I: IntoIterator<Item = Step>,
        I::IntoIter: DoubleEndedIterator,
    {
        let settled = self.ring.propagate(seeds);
        if settled && self.is_closed() && self.ring.constraints_hold() {
            return Ok(());
        }
        if settled {
            log::warn!("ring settled with a broken constraint; rolling back");
        } else {
            log::warn!("constraints could not follow; rolling back");
        }
        self.restore(snapshot);
        Err(EditError::Unsatisfiable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn p(x: f64, y: f64) -> Point2d {
        Point2d::new(x, y)
    }

    fn triangle() -> Polygon {
        Polygon::create(p(0.0, 0.0), p(10.0, 0.0), p(5.0, 10.0))
    }

    fn square() -> Polygon {
        Polygon::from_vertices(&[p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)]).unwrap()
    }

    #[test]
    fn create_builds_closed_triangle() {
        let poly = triangle();
        assert_eq!(poly.vertex_count(), 3);
        assert_eq!(poly.vertices(), vec![p(0.0, 0.0), p(10.0, 0.0), p(5.0, 10.0)]);
        assert!(poly.is_closed());
    }

    #[test]
    fn too_few_vertices_rejected() {
        assert_eq!(
            Polygon::from_vertices(&[p(0.0, 0.0), p(1.0, 1.0)]).unwrap_err(),
            EditError::VertexFloor
        );
    }

    #[test]
    fn first_edge_in_ring_order_claims_shared_vertex() {
        let mut poly = square();
        assert!(poly.on_mouse_down(p(10.0, 0.5)));
        let grabbed = poly.grabbed().unwrap();
        assert_eq!(grabbed, poly.head());
        assert_eq!(poly.edge(grabbed).unwrap().grab(), Grab::End);
        assert_eq!(poly.edges().filter(|(_, e)| e.grab() != Grab::None).count(), 1);

        poly.on_mouse_up();
        assert_eq!(poly.grabbed(), None);
    }

    #[test]
    fn click_on_empty_space_misses() {
        let mut poly = square();
        assert!(!poly.on_mouse_down(p(5.0, 5.0)));
        assert_eq!(poly.on_mouse_move(p(6.0, 6.0), p(5.0, 5.0), false), Ok(false));
    }

    #[test]
    fn zero_delta_is_handled_without_change() {
        let mut poly = square();
        poly.on_mouse_down(p(0.0, 0.0));
        let before = poly.vertices();
        assert_eq!(poly.on_mouse_move(p(0.0, 0.0), p(0.0, 0.0), false), Ok(true));
        assert_eq!(poly.vertices(), before);
    }

    #[test]
    fn vertex_drag_moves_shared_corner() {
        let mut poly = square();
        poly.on_mouse_down(p(10.0, 10.0));
        assert_eq!(poly.on_mouse_move(p(13.0, 12.0), p(10.0, 10.0), false), Ok(true));
        assert_eq!(
            poly.vertices(),
            vec![p(0.0, 0.0), p(10.0, 0.0), p(13.0, 12.0), p(0.0, 10.0)]
        );
        assert!(poly.is_closed());
    }

    #[test]
    fn body_drag_translates_edge() {
        let mut poly = square();
        poly.on_mouse_down(p(5.0, 0.0));
        poly.on_mouse_move(p(5.0, -3.0), p(5.0, 0.0), false).unwrap();
        assert_eq!(
            poly.vertices(),
            vec![p(0.0, -3.0), p(10.0, -3.0), p(10.0, 10.0), p(0.0, 10.0)]
        );
        assert!(poly.is_closed());
    }

    #[test]
    fn whole_polygon_drag_translates_everything() {
        let mut poly = square();
        poly.on_mouse_down(p(5.0, 0.0));
        poly.on_mouse_move(p(7.0, 1.0), p(5.0, 0.0), true).unwrap();
        assert_eq!(
            poly.vertices(),
            vec![p(2.0, 1.0), p(12.0, 1.0), p(12.0, 11.0), p(2.0, 11.0)]
        );
    }

    #[test]
    fn split_inserts_midpoint() {
        let mut poly = square();
        let mut ids = IdAllocator::new();
        let added = poly.add_vertex(p(3.0, 0.5), &mut ids).unwrap();
        assert_eq!(poly.vertex_count(), 5);
        assert_eq!(poly.edge(added).unwrap().begin(), p(5.0, 0.0));
        assert_eq!(poly.edge(added).unwrap().end(), p(10.0, 0.0));
        assert!(poly.is_closed());
        assert_eq!(poly.add_vertex(p(5.0, 5.0), &mut ids), Err(EditError::Miss));
    }

    #[test]
    fn split_clears_constraint() {
        let mut poly = square();
        let mut ids = IdAllocator::new();
        let [e0, e1, ..] = poly.edge_ids()[..] else {
            unreachable!()
        };
        poly.set_perpendicular_edges(e0, e1, &mut ids).unwrap();
        poly.add_vertex(p(5.0, 0.0), &mut ids).unwrap();
        assert_eq!(poly.edge(e0).unwrap().constraint(), None);
        assert_eq!(poly.edge(e1).unwrap().constraint(), None);
        assert_eq!(ids.in_use(), 0);
    }

    #[test]
    fn triangle_keeps_its_vertices() {
        let mut poly = triangle();
        let mut ids = IdAllocator::new();
        assert_eq!(poly.remove(p(10.0, 0.0), &mut ids), Err(EditError::VertexFloor));
        assert_eq!(poly.vertex_count(), 3);
        assert_eq!(poly.vertices(), vec![p(0.0, 0.0), p(10.0, 0.0), p(5.0, 10.0)]);
    }

    #[test]
    fn remove_vertex_merges_edges() {
        let mut poly = square();
        let mut ids = IdAllocator::new();
        assert_eq!(
            poly.remove(p(10.0, 10.0), &mut ids),
            Ok(Removal::Vertex(p(10.0, 10.0)))
        );
        assert_eq!(poly.vertex_count(), 3);
        assert_eq!(poly.vertices(), vec![p(0.0, 0.0), p(10.0, 0.0), p(0.0, 10.0)]);
        assert!(poly.is_closed());
    }

    #[test]
    fn removed_vertex_takes_neighbor_not_clicked_edge() {
        let mut poly = square();
        let mut ids = IdAllocator::new();
        let head = poly.head();
        // (10, 0) is the end of the head edge; the head's successor goes.
        poly.remove(p(10.0, 0.0), &mut ids).unwrap();
        assert_eq!(poly.head(), head);
        // (0, 0) is the begin of the head edge; its predecessor goes.
        let mut poly = square();
        poly.remove(p(0.0, 0.0), &mut ids).unwrap();
        assert_eq!(poly.vertices().len(), 3);
        assert!(poly.edge(poly.head()).is_some());
        assert!(poly.is_closed());
    }

    #[test]
    fn remove_on_edge_body_drops_constraint_only() {
        let mut poly = square();
        let mut ids = IdAllocator::new();
        let [e0, e1, ..] = poly.edge_ids()[..] else {
            unreachable!()
        };
        let id = poly.set_equal_length_edges(e0, e1, &mut ids).unwrap();
        assert_eq!(poly.remove(p(5.0, 0.0), &mut ids), Ok(Removal::Constraint(id)));
        assert_eq!(poly.vertex_count(), 4);
        assert_eq!(poly.edge(e1).unwrap().constraint(), None);
        assert!(!ids.is_allocated(id));
        assert_eq!(poly.remove(p(5.0, 0.0), &mut ids), Err(EditError::Miss));
    }

    #[test]
    fn constraint_rejections() {
        let mut poly = square();
        let mut ids = IdAllocator::new();
        let [e0, e1, e2, _] = poly.edge_ids()[..] else {
            unreachable!()
        };
        assert_eq!(
            poly.set_perpendicular_edges(e0, e0, &mut ids),
            Err(EditError::SameEdge)
        );
        poly.set_perpendicular_edges(e0, e1, &mut ids).unwrap();
        assert_eq!(
            poly.set_equal_length_edges(e1, e2, &mut ids),
            Err(EditError::AlreadyConstrained)
        );
        assert_eq!(
            poly.set_perpendicular(p(5.0, 0.0), p(50.0, 50.0), &mut ids),
            Err(EditError::Miss)
        );
        assert_eq!(ids.in_use(), 1);
    }

    #[test]
    fn remove_constraint_is_idempotent() {
        let mut poly = square();
        let mut ids = IdAllocator::new();
        let [e0, e1, ..] = poly.edge_ids()[..] else {
            unreachable!()
        };
        poly.set_perpendicular_edges(e0, e1, &mut ids).unwrap();
        poly.remove_constraint(e1, &mut ids);
        poly.remove_constraint(e1, &mut ids);
        poly.remove_constraint(e0, &mut ids);
        assert_eq!(poly.edge(e0).unwrap().constraint(), None);
        assert_eq!(ids.in_use(), 0);
    }

    #[test]
    fn snapshot_restore_is_exact() {
        let mut poly = square();
        let snapshot = poly.snapshot();
        let before = poly.vertices();
        poly.translate(p(3.0, 3.0));
        poly.restore(snapshot);
        assert_eq!(poly.vertices(), before);
    }

    #[test]
    fn restore_skips_unlinked_edges() {
        let mut poly = square();
        let mut ids = IdAllocator::new();
        let [e0, ..] = poly.edge_ids()[..] else {
            unreachable!()
        };
        let snapshot = poly.snapshot();
        poly.translate(p(1.0, 1.0));
        poly.remove(p(11.0, 11.0), &mut ids).unwrap();
        poly.restore(snapshot);
        assert_eq!(poly.vertex_count(), 3);
        assert_eq!(poly.edge(e0).unwrap().begin(), p(0.0, 0.0));
    }

    #[test]
    fn removing_vertex_keeps_distant_constraints() {
        let mut ids = IdAllocator::new();
        let mut poly = Polygon::sample(&mut ids).unwrap();
        // (300, 250) joins e1 and e2: e0 ⊥ e1 goes, e3 ⊥ e5 and e4 = e6 stay.
        assert_eq!(
            poly.remove(p(300.0, 250.0), &mut ids),
            Ok(Removal::Vertex(p(300.0, 250.0)))
        );
        assert_eq!(poly.vertex_count(), 6);
        assert!(poly.is_closed());
        assert!(poly.is_correct());
        assert!(poly.ring.constraints_hold());
        assert_eq!(ids.in_use(), 2);
        assert_eq!(
            poly.vertices(),
            vec![
                p(50.0, 150.0),
                p(300.0, 150.0),
                p(400.0, 300.0),
                p(300.0, 400.0),
                p(150.0, 400.0),
                p(50.0, 300.0),
            ]
        );
    }

    #[test]
    fn clone_is_independent_and_keeps_pairs() {
        let mut poly = square();
        let mut ids = IdAllocator::new();
        let [e0, _, e2, _] = poly.edge_ids()[..] else {
            unreachable!()
        };
        poly.set_equal_length_edges(e0, e2, &mut ids).unwrap();
        let copy = poly.clone();
        poly.translate(p(1.0, 0.0));
        assert_eq!(copy.vertices()[0], p(0.0, 0.0));
        let c = copy.edge(e0).unwrap().constraint().unwrap();
        assert_eq!(c.partner, e2);
        assert_eq!(copy.edge(e2).unwrap().constraint().unwrap().partner, e0);
    }

    #[test]
    fn sample_carries_three_constraints() {
        let mut ids = IdAllocator::new();
        let poly = Polygon::sample(&mut ids).unwrap();
        assert_eq!(poly.vertex_count(), 7);
        assert_eq!(
            poly.constraint_ids(),
            vec![ConstraintId(0), ConstraintId(1), ConstraintId(2)]
        );
        assert!(poly.is_closed());
        // Preset geometry already satisfies its constraints.
        assert_eq!(poly.vertices()[0], p(50.0, 150.0));
        assert_eq!(poly.vertices()[4], p(300.0, 400.0));

        poly.release_ids(&mut ids);
        assert_eq!(ids.in_use(), 0);
    }
}
