//! Branch target buffer (BTB) implementation.

use std::collections::VecDeque;
use tracing::debug;

/// Maximum number of entries in the [BranchTargetBuffer].
pub const BTB_CAPACITY: usize = 16;

/// How the [BranchTargetBuffer] treats an update for an address which is
/// already cached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BtbPolicy {
    /// Always append a new entry. Duplicate addresses may coexist, and a
    /// lookup returns the oldest of them.
    Fifo,

    /// Drop any existing entry for the address before appending, so each
    /// address is cached at most once and holds its newest target.
    #[default]
    MoveToNewest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BtbEntry {
    /// Program counter of the branch
    pub pc: usize,
    /// Cached target address for this branch
    pub tgt: usize,
}
impl BtbEntry {
    pub fn new(pc: usize, tgt: usize) -> Self {
        Self { pc, tgt }
    }

    pub fn target(&self) -> usize { self.tgt }
}

/// A fully-associative BTB with FIFO replacement.
#[derive(Clone, Debug)]
pub struct BranchTargetBuffer {
    policy: BtbPolicy,
    data: VecDeque<BtbEntry>,
}
impl BranchTargetBuffer {
    pub fn new(policy: BtbPolicy) -> Self {
        Self {
            policy,
            data: VecDeque::with_capacity(BTB_CAPACITY),
        }
    }

    /// Return the cached target for `pc`, if any.
    pub fn lookup(&self, pc: usize) -> Option<usize> {
        self.data.iter()
            .find(|e| e.pc == pc)
            .map(|e| e.target())
    }

    /// Record `tgt` as the target of the branch at `pc`, evicting the oldest
    /// entry if the buffer is full.
    pub fn update(&mut self, pc: usize, tgt: usize) {
        if self.policy == BtbPolicy::MoveToNewest {
            self.data.retain(|e| e.pc != pc);
        }
        if self.data.len() >= BTB_CAPACITY {
            if let Some(old) = self.data.pop_front() {
                debug!(pc = old.pc, tgt = old.tgt, "btb evict");
            }
        }
        self.data.push_back(BtbEntry::new(pc, tgt));
    }

    pub fn capacity(&self) -> usize { BTB_CAPACITY }
    pub fn len(&self) -> usize { self.data.len() }
    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    /// Iterate over entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &BtbEntry> {
        self.data.iter()
    }

    pub fn reset(&mut self) {
        self.data.clear();
    }
}

impl Default for BranchTargetBuffer {
    fn default() -> Self { Self::new(BtbPolicy::default()) }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lookup_miss_on_empty() {
        let btb = BranchTargetBuffer::default();
        assert!(btb.is_empty());
        assert_eq!(btb.lookup(12), None);
    }

    #[test]
    fn evicts_oldest_when_full() {
        for policy in [BtbPolicy::Fifo, BtbPolicy::MoveToNewest] {
            let mut btb = BranchTargetBuffer::new(policy);
            for pc in 0..17 {
                btb.update(pc, pc + 100);
            }
            assert_eq!(btb.len(), btb.capacity());
            assert_eq!(btb.lookup(0), None);
            assert!((1..17).all(|pc| btb.lookup(pc) == Some(pc + 100)));
        }
    }

    #[test]
    fn fifo_keeps_duplicates() {
        let mut btb = BranchTargetBuffer::new(BtbPolicy::Fifo);
        btb.update(12, 20);
        btb.update(12, 24);
        assert_eq!(btb.len(), 2);
        // The oldest duplicate shadows the newer one
        assert_eq!(btb.lookup(12), Some(20));
    }

    #[test]
    fn move_to_newest_replaces() {
        let mut btb = BranchTargetBuffer::new(BtbPolicy::MoveToNewest);
        btb.update(12, 20);
        btb.update(3, 30);
        btb.update(12, 24);
        assert_eq!(btb.len(), 2);
        assert_eq!(btb.lookup(12), Some(24));
        let order: Vec<usize> = btb.iter().map(|e| e.pc).collect();
        assert_eq!(order, vec![3, 12]);
    }

    #[test]
    fn zero_target_is_cached() {
        let mut btb = BranchTargetBuffer::default();
        btb.update(5, 0);
        assert_eq!(btb.lookup(5), Some(0));
        btb.reset();
        assert_eq!(btb.lookup(5), None);
    }
}
