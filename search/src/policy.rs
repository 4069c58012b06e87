//! Search policy types.

use std::time::Duration;

use crate::error::SearchError;

/// Budget and scheduling configuration for one search invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPolicy {
    /// Hard cap on node expansions (pops that reach the neighbor generator).
    pub max_expansions: u64,
    /// Depth cutoff. Successors deeper than this are skipped.
    pub max_depth: u32,
    /// Wall-clock budget, checked between pops (best-first) or between
    /// layers (layered).
    pub time_budget: Option<Duration>,
    /// How a layered search expands each layer. Ignored by best-first.
    pub scheduler: LayerScheduler,
}

impl SearchPolicy {
    /// Reject values no search can run under.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] if `max_expansions` is zero or
    /// a parallel scheduler asks for zero threads.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_expansions == 0 {
            return Err(SearchError::InvalidPolicy {
                detail: "max_expansions must be at least 1".into(),
            });
        }
        if let LayerScheduler::Parallel { threads: Some(0) } = self.scheduler {
            return Err(SearchError::InvalidPolicy {
                detail: "parallel scheduler needs at least one thread".into(),
            });
        }
        Ok(())
    }

    /// Default policy with a depth cutoff.
    #[must_use]
    pub fn with_max_depth(max_depth: u32) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            max_expansions: u64::MAX,
            max_depth: u32::MAX,
            time_budget: None,
            scheduler: LayerScheduler::Sequential,
        }
    }
}

/// Scheduling of one layer in the layered engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayerScheduler {
    /// Expand layer members one after another on the calling thread.
    #[default]
    Sequential,
    /// Expand layer members on a rayon worker pool. `None` uses the global
    /// pool; `Some(n)` builds a dedicated pool of `n` threads.
    Parallel { threads: Option<usize> },
}
