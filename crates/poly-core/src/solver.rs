//! Constraint propagation over the edge ring.
//!
//! Moving an endpoint may drag the neighbouring edge along, which in turn
//! may have to re-fit its constraint partner, and so on around the ring.
//! Every hop carries a budget that shrinks by one per hop; a hop that would
//! change geometry with a negative budget marks the whole ring incorrect
//! and abandons the pass.
//!
//! The hops are kept on an explicit stack and processed depth first, so a
//! step's follow-ups run (together with everything they trigger) before the
//! steps queued after it.
//!
//! ## Per-constraint rules
//!
//! | Moved edge | Partner adjacent | Partner elsewhere in the ring |
//! |------------|------------------|-------------------------------|
//! | unconstrained | — | — |
//! | perpendicular | partner swings around the shared vertex | edge keeps its direction: the drag is split into an along-edge part (changes length) and an across part (shifts the far endpoint) |
//! | equal length | partner re-stretched from the shared vertex | partner re-stretched from its far end |

use crate::edge::{ConstraintKind, EdgeId, Side};
use crate::point::{
    EPSILON, Point2d, approx_eq, circle_intersections, closest_to, line_intersection,
};
use crate::ring::Ring;
use smallvec::{SmallVec, smallvec};

/// One unit of propagation work.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Step {
    /// Move the endpoint at `side` to `to`, honouring the edge's constraint.
    Move {
        edge: EdgeId,
        side: Side,
        to: Point2d,
        budget: i32,
    },
    /// Re-stretch the edge to the length `reference` has when the step runs,
    /// by moving the endpoint at `side` along the current direction; the
    /// other endpoint stays put.
    Stretch {
        edge: EdgeId,
        side: Side,
        reference: EdgeId,
        budget: i32,
    },
}

impl Step {
    pub(crate) fn set_begin(edge: EdgeId, to: Point2d, budget: i32) -> Self {
        Step::Move {
            edge,
            side: Side::Begin,
            to,
            budget,
        }
    }

    pub(crate) fn set_end(edge: EdgeId, to: Point2d, budget: i32) -> Self {
        Step::Move {
            edge,
            side: Side::End,
            to,
            budget,
        }
    }

    pub(crate) fn length_by_begin(edge: EdgeId, reference: EdgeId, budget: i32) -> Self {
        Step::Stretch {
            edge,
            side: Side::Begin,
            reference,
            budget,
        }
    }

    pub(crate) fn length_by_end(edge: EdgeId, reference: EdgeId, budget: i32) -> Self {
        Step::Stretch {
            edge,
            side: Side::End,
            reference,
            budget,
        }
    }
}

type FollowUps = SmallVec<[Step; 2]>;

/// Why a step could not be carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stall {
    /// Budget ran out before the ring settled.
    Exhausted,
    /// An edge shrank to a point and has no direction left to work with.
    Degenerate,
}

impl Ring {
    /// Run `seeds` (first seed first) to completion.
    ///
    /// Returns `false` when the pass gave up; the ring is then flagged
    /// incorrect and its geometry is half-updated, so the caller must roll
    /// back.
    pub(crate) fn propagate<I>(&mut self, seeds: I) -> bool
    where
        I: IntoIterator<Item = Step>,
        I::IntoIter: DoubleEndedIterator,
    {
        let mut stack: SmallVec<[Step; 16]> = seeds.into_iter().rev().collect();
        let mut hops = 0usize;
        while let Some(step) = stack.pop() {
            hops += 1;
            match self.apply(step) {
                Ok(follow_ups) => stack.extend(follow_ups.into_iter().rev()),
                Err(stall) => {
                    log::debug!("propagation stalled after {hops} hops: {stall:?} at {step:?}");
                    let origin = match step {
                        Step::Move { edge, .. } | Step::Stretch { edge, .. } => edge,
                    };
                    self.set_incorrect(origin);
                    return false;
                }
            }
        }
        log::trace!("propagation settled after {hops} hops");
        true
    }

    /// Flood the incorrect flag around the ring starting at `from`.
    pub(crate) fn set_incorrect(&mut self, from: EdgeId) {
        let mut pending: SmallVec<[EdgeId; 8]> = smallvec![from];
        while let Some(id) = pending.pop() {
            let edge = &mut self[id];
            if !edge.correct {
                continue;
            }
            edge.correct = false;
            pending.push(edge.next);
            pending.push(edge.prev);
        }
    }

    pub(crate) fn is_correct(&self) -> bool {
        self.iter().all(|(_, edge)| edge.correct)
    }

    /// Every constrained pair meets its relation within tolerance.
    pub(crate) fn constraints_hold(&self) -> bool {
        self.iter().all(|(_, edge)| {
            let Some(c) = edge.constraint else {
                return true;
            };
            let Some(partner) = self.get(c.partner) else {
                return false;
            };
            match c.kind {
                ConstraintKind::Perpendicular => {
                    match (edge.direction().normalized(), partner.direction().normalized()) {
                        (Some(a), Some(b)) => a.dot(b).abs() < EPSILON,
                        _ => false,
                    }
                }
                ConstraintKind::EqualLength => approx_eq(edge.length(), partner.length()),
            }
        })
    }

    fn apply(&mut self, step: Step) -> Result<FollowUps, Stall> {
        match step {
            Step::Move {
                edge,
                side,
                to,
                budget,
            } => {
                if self[edge].point(side) == to {
                    return Ok(FollowUps::new());
                }
                if budget < 0 {
                    return Err(Stall::Exhausted);
                }
                match self[edge].constraint {
                    None => {
                        self[edge].set_point(side, to);
                        let neighbor = self[edge].neighbor(side);
                        Ok(smallvec![Step::Move {
                            edge: neighbor,
                            side: side.opposite(),
                            to,
                            budget: budget - 1,
                        }])
                    }
                    Some(c) => match c.kind {
                        ConstraintKind::Perpendicular => {
                            self.move_perpendicular(edge, c.partner, side, to, budget)
                        }
                        ConstraintKind::EqualLength => {
                            self.move_equal_length(edge, c.partner, side, to, budget)
                        }
                    },
                }
            }
            Step::Stretch {
                edge,
                side,
                reference,
                budget,
            } => {
                let length = self[reference].length();
                if approx_eq(self[edge].length(), length) {
                    return Ok(FollowUps::new());
                }
                if budget < 0 {
                    return Err(Stall::Exhausted);
                }
                self.stretch(edge, side, length, budget)
            }
        }
    }

    /// Which side of `edge` is shared with `partner`, if they are adjacent.
    pub(crate) fn shared_side(&self, edge: EdgeId, partner: EdgeId) -> Option<Side> {
        let e = &self[edge];
        if e.prev == partner {
            Some(Side::Begin)
        } else if e.next == partner {
            Some(Side::End)
        } else {
            None
        }
    }

    fn move_perpendicular(
        &mut self,
        edge: EdgeId,
        partner: EdgeId,
        side: Side,
        to: Point2d,
        budget: i32,
    ) -> Result<FollowUps, Stall> {
        let mut follow_ups = FollowUps::new();
        match self.shared_side(edge, partner) {
            Some(shared) => {
                self[edge].set_point(side, to);
                if side != shared {
                    follow_ups.push(Step::Move {
                        edge: self[edge].neighbor(side),
                        side: side.opposite(),
                        to,
                        budget: budget - 1,
                    });
                }
                let far = self.swing_partner(edge, partner, shared)?;
                follow_ups.push(Step::Move {
                    edge: self[partner].neighbor(shared),
                    side: shared.opposite(),
                    to: far,
                    budget: budget - 1,
                });
            }
            None => {
                let e = &self[edge];
                let other = side.opposite();
                let delta = to - e.point(side);
                let along = delta.project_onto(e.direction()).ok_or(Stall::Degenerate)?;
                let other_to = e.point(other) + (delta - along);
                let (near, far) = (e.neighbor(side), e.neighbor(other));

                let e = &mut self[edge];
                e.set_point(side, to);
                e.set_point(other, other_to);
                if e.direction().normalized().is_none() {
                    return Err(Stall::Degenerate);
                }
                follow_ups.push(Step::Move {
                    edge: near,
                    side: other,
                    to,
                    budget: budget - 1,
                });
                follow_ups.push(Step::Move {
                    edge: far,
                    side,
                    to: other_to,
                    budget: budget - 1,
                });
            }
        }
        Ok(follow_ups)
    }

    /// Re-seat an adjacent perpendicular `partner` so it leaves the shared
    /// vertex at a right angle to `edge`, keeping its length and the side it
    /// points to. Returns the partner's new far endpoint.
    fn swing_partner(
        &mut self,
        edge: EdgeId,
        partner: EdgeId,
        shared: Side,
    ) -> Result<Point2d, Stall> {
        let pivot = self[edge].point(shared);
        let normal = self[edge]
            .direction()
            .perp()
            .normalized()
            .ok_or(Stall::Degenerate)?;
        let p = &self[partner];
        let arm = p.point(shared) - p.point(shared.opposite());
        let normal = if normal.dot(arm) < 0.0 { -normal } else { normal };
        let far = pivot + normal * arm.length();

        let p = &mut self[partner];
        p.set_point(shared.opposite(), pivot);
        p.set_point(shared, far);
        Ok(far)
    }

    fn move_equal_length(
        &mut self,
        edge: EdgeId,
        partner: EdgeId,
        side: Side,
        to: Point2d,
        budget: i32,
    ) -> Result<FollowUps, Stall> {
        self[edge].set_point(side, to);
        let mut follow_ups = FollowUps::new();
        match self.shared_side(edge, partner) {
            // The partner shares the vertex that just moved.
            Some(shared) if shared == side => {
                self[partner].set_point(side.opposite(), to);
                follow_ups.push(Step::Stretch {
                    edge: partner,
                    side,
                    reference: edge,
                    budget: budget - 1,
                });
            }
            // The partner hangs off the unmoved end.
            Some(shared) => {
                follow_ups.push(Step::Move {
                    edge: self[edge].neighbor(side),
                    side: side.opposite(),
                    to,
                    budget: budget - 1,
                });
                follow_ups.push(Step::Stretch {
                    edge: partner,
                    side: shared,
                    reference: edge,
                    budget: budget - 1,
                });
            }
            None => {
                follow_ups.push(Step::Move {
                    edge: self[edge].neighbor(side),
                    side: side.opposite(),
                    to,
                    budget: budget - 1,
                });
                follow_ups.push(Step::Stretch {
                    edge: partner,
                    side,
                    reference: edge,
                    budget: budget - 1,
                });
            }
        }
        Ok(follow_ups)
    }

    fn stretch(
        &mut self,
        edge: EdgeId,
        side: Side,
        length: f64,
        budget: i32,
    ) -> Result<FollowUps, Stall> {
        let e = &self[edge];
        let fixed = e.point(side.opposite());
        let unit = (e.point(side) - fixed)
            .normalized()
            .ok_or(Stall::Degenerate)?;
        let target = fixed + unit * length;
        let neighbor_id = e.neighbor(side);
        let neighbor = &self[neighbor_id];

        // An equal-length neighbour must keep its own length too: meet it
        // where both circles cross instead of dragging it along.
        if let Some(c) = neighbor.constraint
            && c.kind == ConstraintKind::EqualLength
        {
            let far = neighbor.point(side);
            let radius = if c.partner == edge {
                length
            } else {
                neighbor.length()
            };
            if let Some(candidates) = circle_intersections(fixed, length, far, radius) {
                let meet = closest_to(target, candidates);
                self[edge].set_point(side, meet);
                self[neighbor_id].set_point(side.opposite(), meet);
                return Ok(FollowUps::new());
            }
        }

        self[edge].set_point(side, target);
        Ok(smallvec![Step::Move {
            edge: neighbor_id,
            side: side.opposite(),
            to: target,
            budget: budget - 1,
        }])
    }

    /// Turn `target` to a right angle with `reference` by moving its `side`
    /// endpoint, then reconcile with the neighbour across that endpoint.
    ///
    /// A free neighbour is met where its line crosses the rotated edge, so it
    /// keeps its direction. A constrained neighbour, or one whose line runs
    /// parallel, gets the rotated endpoint pushed to it instead.
    pub(crate) fn align_perpendicular(
        &mut self,
        target: EdgeId,
        reference: EdgeId,
        side: Side,
        budget: i32,
    ) -> Option<SmallVec<[Step; 1]>> {
        let normal = self[reference].direction().perp().normalized()?;
        let t = &self[target];
        let fixed = t.point(side.opposite());
        let arm = t.point(side) - fixed;
        let normal = if normal.dot(arm) < 0.0 { -normal } else { normal };
        let neighbor_id = t.neighbor(side);
        let neighbor = &self[neighbor_id];

        if neighbor.constraint.is_none() && neighbor_id != reference {
            let far = neighbor.point(side);
            let heading = neighbor.point(side.opposite()) - far;
            if let Some(meet) = line_intersection(fixed, normal, far, heading)
                && (meet - fixed).dot(normal) > EPSILON
                && meet != far
            {
                self[target].set_point(side, meet);
                self[neighbor_id].set_point(side.opposite(), meet);
                return Some(SmallVec::new());
            }
        }

        let to = fixed + normal * arm.length();
        self[target].set_point(side, to);
        Some(smallvec![Step::Move {
            edge: neighbor_id,
            side: side.opposite(),
            to,
            budget: budget - 1,
        }])
    }
}
