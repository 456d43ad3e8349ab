//! Arena-backed circular doubly-linked list of edges.
//!
//! Slots are never reused, so an `EdgeId` stays valid for the lifetime of
//! the edge and snapshots keyed by id survive a propagation pass untouched.

use crate::edge::{Edge, EdgeId};
use crate::point::Point2d;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone)]
pub(crate) struct Ring {
    slots: Vec<Option<Edge>>,
    head: EdgeId,
    len: usize,
}

impl Ring {
    /// Closed ring through `vertices`; edge `i` runs from vertex `i` to `i + 1`.
    /// `vertices` must not be empty.
    pub(crate) fn from_vertices(vertices: &[Point2d]) -> Self {
        let n = vertices.len();
        let slots = (0..n)
            .map(|i| {
                let mut edge = Edge::new(EdgeId(i), vertices[i], vertices[(i + 1) % n]);
                edge.next = EdgeId((i + 1) % n);
                edge.prev = EdgeId((i + n - 1) % n);
                Some(edge)
            })
            .collect();
        Self {
            slots,
            head: EdgeId(0),
            len: n,
        }
    }

    pub(crate) fn head(&self) -> EdgeId {
        self.head
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn get(&self, id: EdgeId) -> Option<&Edge> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Edge ids in ring order starting at the head.
    pub(crate) fn ids(&self) -> Vec<EdgeId> {
        self.iter().map(|(id, _)| id).collect()
    }

    pub(crate) fn iter(&self) -> RingIter<'_> {
        RingIter {
            ring: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Link a new edge `begin`–`end` right after `at`.
    pub(crate) fn insert_after(&mut self, at: EdgeId, begin: Point2d, end: Point2d) -> EdgeId {
        let id = EdgeId(self.slots.len());
        let next = self[at].next;
        let mut edge = Edge::new(id, begin, end);
        edge.prev = at;
        edge.next = next;
        self.slots.push(Some(edge));
        self[at].next = id;
        self[next].prev = id;
        self.len += 1;
        id
    }

    /// Splice `id` out of the ring and hand it back. The head moves on to
    /// the successor when the head itself is removed.
    pub(crate) fn unlink(&mut self, id: EdgeId) -> Option<Edge> {
        let edge = self.slots.get_mut(id.0)?.take()?;
        self[edge.prev].next = edge.next;
        self[edge.next].prev = edge.prev;
        if self.head == id {
            self.head = edge.next;
        }
        self.len -= 1;
        Some(edge)
    }
}

impl Index<EdgeId> for Ring {
    type Output = Edge;

    fn index(&self, id: EdgeId) -> &Edge {
        match self.get(id) {
            Some(edge) => edge,
            None => panic!("dangling edge handle {id}"),
        }
    }
}

impl IndexMut<EdgeId> for Ring {
    fn index_mut(&mut self, id: EdgeId) -> &mut Edge {
        match self.slots.get_mut(id.0).and_then(Option::as_mut) {
            Some(edge) => edge,
            None => panic!("dangling edge handle {id}"),
        }
    }
}

pub struct RingIter<'a> {
    ring: &'a Ring,
    cursor: EdgeId,
    remaining: usize,
}

impl<'a> Iterator for RingIter<'a> {
    type Item = (EdgeId, &'a Edge);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.cursor;
        let edge = self.ring.get(id)?;
        self.cursor = edge.next;
        self.remaining -= 1;
        Some((id, edge))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
