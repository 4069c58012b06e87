//! Search counters and the expansion trace.
//!
//! The trace is the ordered list of expanded node ids. Two runs with the same
//! inputs must produce byte-identical traces, which is checked by comparing
//! [`ExpansionTrace::digest`] values in-process and across processes.

use sha2::{Digest, Sha256};

/// Domain prefix for expansion trace hashing.
pub const DOMAIN_EXPANSION_TRACE: &[u8] = b"WAYMARK::EXPANSION_TRACE::V1\0";

/// Aggregate counters for one search invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes handed to the neighbor generator.
    pub expansions: u64,
    /// Successors returned by the neighbor generator.
    pub candidates_generated: u64,
    /// Successors dropped because their identity was already in history.
    pub duplicates_suppressed: u64,
    /// Successors that replaced a queued node with a shorter route.
    pub paths_improved: u64,
    /// Successors dropped by the depth cutoff.
    pub depth_limited: u64,
    /// Expanded nodes that produced no new node.
    pub dead_ends: u64,
    /// Distinct identities in history when the search stopped.
    pub states_seen: u64,
    /// Largest frontier (or layer) size observed.
    pub frontier_high_water: u64,
    /// Layers swept (layered engine only).
    pub layers: u64,
    /// Deepest node created.
    pub max_depth: u32,
}

impl SearchStats {
    /// Render as a JSON object (keys sorted).
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "candidates_generated": self.candidates_generated,
            "dead_ends": self.dead_ends,
            "depth_limited": self.depth_limited,
            "duplicates_suppressed": self.duplicates_suppressed,
            "expansions": self.expansions,
            "frontier_high_water": self.frontier_high_water,
            "layers": self.layers,
            "max_depth": self.max_depth,
            "paths_improved": self.paths_improved,
            "states_seen": self.states_seen,
        })
    }
}

/// Ordered record of expanded node ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionTrace {
    expanded: Vec<u64>,
}

impl ExpansionTrace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, node_id: u64) {
        self.expanded.push(node_id);
    }

    /// Expanded node ids in expansion order.
    #[must_use]
    pub fn expanded(&self) -> &[u64] {
        &self.expanded
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    /// Serialize the trace to compact JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if serialization fails.
    pub fn to_canonical_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&serde_json::json!({ "expanded": self.expanded }))
    }

    /// `"sha256:<hex>"` over the domain prefix and the little-endian ids.
    #[must_use]
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(DOMAIN_EXPANSION_TRACE);
        for id in &self.expanded {
            hasher.update(id.to_le_bytes());
        }
        format!("sha256:{}", hex::encode(hasher.finalize()))
    }
}
