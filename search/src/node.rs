//! Search nodes, the frontier ordering key, and the node arena.

use crate::error::SearchError;

/// An immutable node in the search tree.
///
/// Bookkeeping fields (`node_id`, `parent_id`, `depth`, `metric`) are not part
/// of the state's canonical identity; only `state` is deduplicated.
#[derive(Debug, Clone)]
pub struct SearchNode<S> {
    /// Monotonic insertion sequence number, also the arena index.
    pub node_id: u64,
    /// Predecessor (`None` for the root).
    pub parent_id: Option<u64>,
    /// The world snapshot at this node.
    pub state: S,
    /// Number of transitions from the root along the predecessor chain.
    pub depth: u32,
    /// Frontier ordering value computed when the node was created.
    pub metric: i64,
}

impl<S> SearchNode<S> {
    /// The frontier key for this node.
    #[must_use]
    pub fn key(&self) -> FrontierKey {
        FrontierKey {
            metric: self.metric,
            seq: self.node_id,
        }
    }
}

/// The frontier ordering key: `(metric, seq)`.
///
/// Lower metric first, then older insertion sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontierKey {
    pub metric: i64,
    pub seq: u64,
}

impl PartialOrd for FrontierKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.metric
            .cmp(&other.metric)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Owner of every node created during one search.
///
/// Predecessor links are ids into this arena, so the tree is acyclic by
/// construction and is dropped in bulk with the arena.
#[derive(Debug, Clone)]
pub struct NodeArena<S> {
    nodes: Vec<SearchNode<S>>,
}

impl<S> NodeArena<S> {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Allocate a node and return its id.
    pub fn alloc(&mut self, parent_id: Option<u64>, state: S, depth: u32, metric: i64) -> u64 {
        let node_id = self.nodes.len() as u64;
        self.nodes.push(SearchNode {
            node_id,
            parent_id,
            state,
            depth,
            metric,
        });
        node_id
    }

    /// Look up a node by id.
    #[must_use]
    pub fn get(&self, node_id: u64) -> Option<&SearchNode<S>> {
        usize::try_from(node_id)
            .ok()
            .and_then(|idx| self.nodes.get(idx))
    }

    /// Look up a node by id, failing with [`SearchError::UnknownNode`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UnknownNode`] if `node_id` was never allocated.
    pub fn node(&self, node_id: u64) -> Result<&SearchNode<S>, SearchError> {
        self.get(node_id)
            .ok_or(SearchError::UnknownNode { node_id })
    }

    /// Number of nodes allocated.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node has been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = &SearchNode<S>> {
        self.nodes.iter()
    }

    /// Ids from the root to `node_id`, inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UnknownNode`] if `node_id` (or any ancestor) is
    /// not in this arena.
    pub fn reconstruct_path(&self, node_id: u64) -> Result<Vec<u64>, SearchError> {
        let mut path = Vec::new();
        let mut current = Some(node_id);

        while let Some(id) = current {
            path.push(id);
            current = self.node(id)?.parent_id;
        }

        path.reverse();
        Ok(path)
    }

    /// States from the root to `node_id`, inclusive. The move count is
    /// `len() - 1`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UnknownNode`] if `node_id` is not in this arena.
    pub fn path_states(&self, node_id: u64) -> Result<Vec<S>, SearchError>
    where
        S: Clone,
    {
        self.reconstruct_path(node_id)?
            .into_iter()
            .map(|id| self.node(id).map(|n| n.state.clone()))
            .collect()
    }
}

impl<S> Default for NodeArena<S> {
    fn default() -> Self {
        Self::new()
    }
}
