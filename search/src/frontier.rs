//! Best-first frontier.
//!
//! Entries carry only the node id; the arena owns the states. Pop order is a
//! pure function of the push sequence because the key ends in the insertion
//! sequence number.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::node::FrontierKey;

/// Priority queue of pending node ids, O(log n) push and pop.
///
/// `BinaryHeap` is a max-heap; `Reverse` turns it into lowest-key-first. The
/// node id never breaks a tie since `seq` is unique.
#[derive(Debug, Default)]
pub struct BestFirstFrontier {
    heap: BinaryHeap<Reverse<(FrontierKey, u64)>>,
    high_water: u64,
}

impl BestFirstFrontier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: FrontierKey, node_id: u64) {
        self.heap.push(Reverse((key, node_id)));
        self.high_water = self.high_water.max(self.heap.len() as u64);
    }

    /// Pop the best (lowest metric, then oldest) entry.
    #[must_use]
    pub fn pop(&mut self) -> Option<(FrontierKey, u64)> {
        self.heap.pop().map(|Reverse(entry)| entry)
    }

    /// Key of the entry `pop` would return next.
    #[must_use]
    pub fn peek_key(&self) -> Option<FrontierKey> {
        self.heap.peek().map(|Reverse((key, _))| *key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Largest size the frontier has reached.
    #[must_use]
    pub fn high_water(&self) -> u64 {
        self.high_water
    }
}
