//! Test-time admissibility check.
//!
//! A non-admissible heuristic never fails a search; it just returns a longer
//! path than necessary. This module runs the same world under the [`Dijkstra`]
//! baseline and a candidate metric and compares the path lengths.

use std::fmt;

use crate::contract::SearchWorld;
use crate::error::SearchError;
use crate::metric::{Dijkstra, Metric};
use crate::policy::SearchPolicy;
use crate::search::search;

/// Outcome of comparing a candidate metric against the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissibilityVerdict {
    /// Both metrics found goals at the same depth.
    Optimal,
    /// The candidate's first goal is deeper than the baseline's.
    NonAdmissibleHeuristicDetected {
        baseline_moves: u32,
        candidate_moves: u32,
    },
    /// At least one side stopped without a goal (budget, no path).
    Inconclusive,
}

impl fmt::Display for AdmissibilityVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Optimal => f.write_str("optimal"),
            Self::NonAdmissibleHeuristicDetected {
                baseline_moves,
                candidate_moves,
            } => write!(
                f,
                "non-admissible heuristic detected: {candidate_moves} moves vs baseline {baseline_moves}"
            ),
            Self::Inconclusive => f.write_str("inconclusive"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissibilityReport {
    pub verdict: AdmissibilityVerdict,
    pub baseline_moves: Option<u32>,
    pub candidate_moves: Option<u32>,
    pub baseline_expansions: u64,
    pub candidate_expansions: u64,
}

impl AdmissibilityReport {
    #[must_use]
    pub fn is_optimal(&self) -> bool {
        self.verdict == AdmissibilityVerdict::Optimal
    }
}

/// Search `root` twice, once with [`Dijkstra`] and once with `candidate`.
///
/// # Errors
///
/// Propagates any [`SearchError`] from either run.
pub fn check_admissibility<W, M>(
    root: &W::State,
    world: &W,
    candidate: &M,
    policy: &SearchPolicy,
) -> Result<AdmissibilityReport, SearchError>
where
    W: SearchWorld,
    M: Metric<W::State>,
{
    let baseline = search(root.clone(), world, &Dijkstra, policy)?;
    let checked = search(root.clone(), world, candidate, policy)?;

    let baseline_moves = baseline.move_count();
    let candidate_moves = checked.move_count();
    let verdict = match (baseline_moves, candidate_moves) {
        (Some(b), Some(c)) if c > b => AdmissibilityVerdict::NonAdmissibleHeuristicDetected {
            baseline_moves: b,
            candidate_moves: c,
        },
        (Some(b), Some(c)) if c == b => AdmissibilityVerdict::Optimal,
        _ => AdmissibilityVerdict::Inconclusive,
    };

    if let AdmissibilityVerdict::NonAdmissibleHeuristicDetected { .. } = verdict {
        log::warn!("{}: {verdict}", world.world_id());
    }

    Ok(AdmissibilityReport {
        verdict,
        baseline_moves,
        candidate_moves,
        baseline_expansions: baseline.stats.expansions,
        candidate_expansions: checked.stats.expansions,
    })
}
