//! Visited history and per-expansion exclusion.
//!
//! A state enters the history the moment it is first produced as a
//! candidate. While its node waits on the frontier the identity is *queued*
//! and a strictly shorter route may still replace that node; once popped it
//! is *settled* and every later route to it is dropped. The history only
//! grows and is scoped to the search that owns it.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Membership test handed to a world's neighbor generator.
///
/// Worlds omit any successor for which `excludes` returns `true`.
pub trait Exclusion<S> {
    /// Whether `state` must not be produced as a successor.
    fn excludes(&self, state: &S) -> bool;
}

/// Exclusion that admits every state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExclusion;

impl<S> Exclusion<S> for NoExclusion {
    fn excludes(&self, _state: &S) -> bool {
        false
    }
}

impl<S: Eq + Hash> Exclusion<S> for HashSet<S> {
    fn excludes(&self, state: &S) -> bool {
        self.contains(state)
    }
}

/// How the history stands on a freshly generated state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Never seen.
    New,
    /// Waiting on the frontier as this node.
    Queued(u64),
    /// Popped, or inherited from an earlier invocation.
    Settled,
}

/// Canonical-identity history of one search.
///
/// Owned, so a caller can move it from one search invocation into the next
/// instead of sharing ambient mutable state.
#[derive(Debug, Clone)]
pub struct VisitedSet<S> {
    /// `Some(node_id)` while queued, `None` once settled.
    seen: HashMap<S, Option<u64>>,
}

impl<S: Clone + Eq + Hash> VisitedSet<S> {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            seen: HashMap::new(),
        }
    }

    /// Record `state` as settled. Returns `false` if its identity was
    /// already present.
    pub fn insert(&mut self, state: &S) -> bool {
        if self.seen.contains_key(state) {
            return false;
        }
        self.seen.insert(state.clone(), None);
        true
    }

    /// Whether the identity of `state` has been recorded.
    #[must_use]
    pub fn contains(&self, state: &S) -> bool {
        self.seen.contains_key(state)
    }

    #[must_use]
    pub fn admission(&self, state: &S) -> Admission {
        match self.seen.get(state) {
            None => Admission::New,
            Some(Some(node_id)) => Admission::Queued(*node_id),
            Some(None) => Admission::Settled,
        }
    }

    /// Record `state` as queued under `node_id`, replacing any queued node.
    pub fn queue(&mut self, state: &S, node_id: u64) {
        if let Some(slot) = self.seen.get_mut(state) {
            *slot = Some(node_id);
        } else {
            self.seen.insert(state.clone(), Some(node_id));
        }
    }

    /// Settle the identity of a popped node.
    ///
    /// Returns `false` when `node_id` is not the node queued for `state`,
    /// i.e. a shorter route replaced it after it was pushed.
    pub fn settle(&mut self, state: &S, node_id: u64) -> bool {
        match self.seen.get_mut(state) {
            Some(slot) if *slot == Some(node_id) => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    /// Settle every identity, detaching the history from node ids.
    pub fn settle_all(&mut self) {
        for slot in self.seen.values_mut() {
            *slot = None;
        }
    }

    /// Merge a whole layer into the history at once.
    ///
    /// Returns the number of identities that were new.
    pub fn extend_layer<'a, I>(&mut self, layer: I) -> usize
    where
        I: IntoIterator<Item = &'a S>,
        S: 'a,
    {
        layer
            .into_iter()
            .filter(|state| self.insert(state))
            .count()
    }

    /// Number of distinct identities recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Iterate over recorded identities (arbitrary order).
    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.seen.keys()
    }
}

impl<S: Clone + Eq + Hash> Default for VisitedSet<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Excludes settled identities only; queued ones are still offered so the
/// engine can keep the shorter route.
impl<S: Clone + Eq + Hash> Exclusion<S> for VisitedSet<S> {
    fn excludes(&self, state: &S) -> bool {
        self.admission(state) == Admission::Settled
    }
}
