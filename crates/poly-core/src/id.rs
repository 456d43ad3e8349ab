use std::collections::BTreeSet;
use std::fmt;

/// Label shared by the two edges of one constraint pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(pub u32);

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out the smallest unused id and takes ids back when a constraint
/// is removed, so on-screen labels stay small and deterministic.
///
/// One allocator is shared by every polygon in a collection; the owner
/// threads it through the constraint operations.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    used: BTreeSet<u32>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Smallest non-negative id not currently in use.
    pub fn allocate(&mut self) -> ConstraintId {
        // `used` iterates in ascending order: the first gap is the answer.
        let mut candidate = 0;
        for &id in &self.used {
            if id != candidate {
                break;
            }
            candidate += 1;
        }
        self.used.insert(candidate);
        log::trace!("allocated constraint id {candidate}");
        ConstraintId(candidate)
    }

    /// Return `id` to the free pool. Releasing an unknown id is a no-op.
    pub fn release(&mut self, id: ConstraintId) {
        if self.used.remove(&id.0) {
            log::trace!("released constraint id {}", id.0);
        }
    }

    pub fn is_allocated(&self, id: ConstraintId) -> bool {
        self.used.contains(&id.0)
    }

    pub fn in_use(&self) -> usize {
        self.used.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_ascending_from_zero() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate(), ConstraintId(0));
        assert_eq!(ids.allocate(), ConstraintId(1));
        assert_eq!(ids.allocate(), ConstraintId(2));
    }

    #[test]
    fn reuses_lowest_free_slot() {
        let mut ids = IdAllocator::new();
        let _a = ids.allocate();
        let b = ids.allocate();
        let _c = ids.allocate();
        ids.release(b);
        assert_eq!(ids.allocate(), ConstraintId(1));
        assert_eq!(ids.allocate(), ConstraintId(3));
    }

    #[test]
    fn release_unknown_is_noop() {
        let mut ids = IdAllocator::new();
        ids.release(ConstraintId(7));
        assert_eq!(ids.in_use(), 0);
        assert_eq!(ids.allocate(), ConstraintId(0));
    }
}
