//! Typed search errors.
//!
//! `SearchError` represents failures that abort a search. Normal terminations
//! (goal reached, frontier exhausted, budget exceeded, cancellation) are not
//! errors: they are expressed via [`crate::search::TerminationReason`] inside
//! a successful [`crate::search::SearchResult`].

use std::fmt;

/// Callback in which a world panicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanicStage {
    /// `SearchWorld::expand()` panicked.
    Expand,
    /// `SearchWorld::is_goal()` panicked.
    IsGoal,
}

impl fmt::Display for PanicStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expand => f.write_str("expand"),
            Self::IsGoal => f.write_str("is_goal"),
        }
    }
}

/// Typed failure for a search invocation.
///
/// No partial path is ever returned alongside an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The policy failed pre-flight validation. No search steps were taken.
    InvalidPolicy { detail: String },
    /// The world's neighbor generator reported a structural invariant
    /// violation while expanding `node_id`.
    InvalidState {
        world_id: String,
        node_id: u64,
        detail: String,
    },
    /// A world callback panicked; the panic was caught and the search aborted.
    WorldPanicked {
        world_id: String,
        stage: PanicStage,
        node_id: u64,
    },
    /// A node id that does not belong to this search was requested.
    UnknownNode { node_id: u64 },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPolicy { detail } => write!(f, "invalid search policy: {detail}"),
            Self::InvalidState {
                world_id,
                node_id,
                detail,
            } => write!(
                f,
                "world {world_id} produced an invalid state while expanding node {node_id}: {detail}"
            ),
            Self::WorldPanicked {
                world_id,
                stage,
                node_id,
            } => write!(
                f,
                "world {world_id} panicked in {stage} at node {node_id}"
            ),
            Self::UnknownNode { node_id } => write!(f, "unknown node id {node_id}"),
        }
    }
}

impl std::error::Error for SearchError {}
