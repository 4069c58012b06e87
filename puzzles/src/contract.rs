//! Shared types for the puzzle worlds: errors, metric choice, solutions.

use std::fmt;
use std::str::FromStr;

use waymark_search::error::SearchError;
use waymark_search::search::SearchResult;
use waymark_search::transcript::SearchStats;

/// Error raised while parsing or solving a puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    /// Puzzle input could not be parsed. `line` is 1-based.
    Parse { line: usize, detail: String },
    /// Input parsed but describes an impossible or unsupported setup.
    Invalid { detail: String },
    /// The engine aborted.
    Search(SearchError),
    /// The search stopped without reaching a goal.
    NoSolution {
        puzzle: &'static str,
        termination: &'static str,
    },
}

impl PuzzleError {
    pub(crate) fn parse(line: usize, detail: impl Into<String>) -> Self {
        Self::Parse {
            line,
            detail: detail.into(),
        }
    }

    pub(crate) fn invalid(detail: impl Into<String>) -> Self {
        Self::Invalid {
            detail: detail.into(),
        }
    }
}

impl fmt::Display for PuzzleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { line, detail } => write!(f, "parse error on line {line}: {detail}"),
            Self::Invalid { detail } => write!(f, "invalid puzzle: {detail}"),
            Self::Search(e) => write!(f, "search failed: {e}"),
            Self::NoSolution {
                puzzle,
                termination,
            } => write!(f, "{puzzle}: no solution ({termination})"),
        }
    }
}

impl std::error::Error for PuzzleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Search(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SearchError> for PuzzleError {
    fn from(e: SearchError) -> Self {
        Self::Search(e)
    }
}

/// Which frontier ordering a puzzle uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricChoice {
    /// Path length only.
    Dijkstra,
    /// Path length plus the puzzle's heuristic.
    AStar,
}

impl MetricChoice {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dijkstra => "dijkstra",
            Self::AStar => "astar",
        }
    }
}

impl FromStr for MetricChoice {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dijkstra" => Ok(Self::Dijkstra),
            "astar" | "a*" => Ok(Self::AStar),
            other => Err(PuzzleError::invalid(format!("unknown metric {other:?}"))),
        }
    }
}

/// A goal path plus the counters of the search that found it.
#[derive(Debug, Clone)]
pub struct Solution<S> {
    /// Root to goal, inclusive.
    pub path: Vec<S>,
    pub stats: SearchStats,
    pub trace_digest: String,
}

impl<S> Solution<S> {
    /// Transitions on the path.
    #[must_use]
    pub fn moves(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Turn a finished search into a [`Solution`], or `NoSolution` if it stopped
/// without a goal.
///
/// # Errors
///
/// Returns [`PuzzleError::NoSolution`] when no goal was reached.
pub fn solution_from<S: Clone>(
    puzzle: &'static str,
    result: &SearchResult<S>,
) -> Result<Solution<S>, PuzzleError> {
    match result.path() {
        Some(path) => Ok(Solution {
            path,
            stats: result.stats.clone(),
            trace_digest: result.trace.digest(),
        }),
        None => Err(PuzzleError::NoSolution {
            puzzle,
            termination: result.termination.as_str(),
        }),
    }
}
