//! `CubicleMaze`: an unbounded office grid whose walls come from a
//! favourite number.
//!
//! `(x, y)` (both non-negative) is open iff `x² + 3x + 2xy + y + y² + fav`
//! has an even number of set bits. The walk starts at `(1, 1)` and moves in
//! the four cardinal directions.

use std::collections::HashSet;

use waymark_search::contract::{SearchWorld, WorldError};
use waymark_search::metric::{manhattan, AStar, Dijkstra, Metric};
use waymark_search::policy::SearchPolicy;
use waymark_search::search::{search, Searcher, TerminationReason};
use waymark_search::transcript::SearchStats;
use waymark_search::visited::Exclusion;

use crate::contract::{solution_from, MetricChoice, PuzzleError, Solution};

pub type Position = (i64, i64);

pub const START: Position = (1, 1);

const DIRECTIONS: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CubicleMaze {
    favourite: u64,
}

impl CubicleMaze {
    #[must_use]
    pub fn new(favourite: u64) -> Self {
        Self { favourite }
    }

    /// The puzzle input is just the favourite number.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::Parse`] if the input is not a non-negative
    /// integer.
    pub fn parse(input: &str) -> Result<Self, PuzzleError> {
        let text = input.trim();
        text.parse()
            .map(Self::new)
            .map_err(|e| PuzzleError::parse(1, format!("favourite number {text:?}: {e}")))
    }

    #[must_use]
    pub fn favourite(&self) -> u64 {
        self.favourite
    }

    /// Negative coordinates, and cells whose formula value does not fit in
    /// 128 bits, are walls.
    #[must_use]
    pub fn is_open(&self, (x, y): Position) -> bool {
        let (Ok(x), Ok(y)) = (u128::try_from(x), u128::try_from(y)) else {
            return false;
        };
        // Each product fits: x and y are below 2^63.
        [3 * x, 2 * x * y, y, y * y, u128::from(self.favourite)]
            .into_iter()
            .try_fold(x * x, u128::checked_add)
            .is_some_and(|v| v.count_ones() % 2 == 0)
    }

    /// Header row of column digits, then one row per `y` with `#` walls, `.`
    /// open cells, and `O` for cells in `overlay`.
    #[must_use]
    pub fn render(&self, width: i64, height: i64, overlay: Option<&HashSet<Position>>) -> Vec<String> {
        let mut lines = Vec::new();
        let header: String = (0..width).map(digit).collect();
        lines.push(format!("  {header}"));
        for y in 0..height {
            let row: String = (0..width)
                .map(|x| {
                    if overlay.is_some_and(|o| o.contains(&(x, y))) {
                        'O'
                    } else if self.is_open((x, y)) {
                        '.'
                    } else {
                        '#'
                    }
                })
                .collect();
            lines.push(format!("{} {row}", digit(y)));
        }
        lines
    }

    /// Shortest walk from [`START`] to `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::Invalid`] if `destination` is a wall and
    /// [`PuzzleError::NoSolution`] if it cannot be reached under `policy`.
    pub fn shortest_path(
        &self,
        destination: Position,
        metric: MetricChoice,
        policy: &SearchPolicy,
    ) -> Result<Solution<Position>, PuzzleError> {
        if !self.is_open(destination) {
            return Err(PuzzleError::invalid(format!("destination {destination:?} is a wall")));
        }
        let world = CubicleWalk {
            maze: *self,
            target: Some(destination),
        };
        let metric: Box<dyn Metric<Position>> = match metric {
            MetricChoice::Dijkstra => Box::new(Dijkstra),
            MetricChoice::AStar => Box::new(AStar::new(move |p: &Position| manhattan(*p, destination))),
        };
        let result = search(START, &world, &metric, policy)?;
        solution_from("cubicle_maze", &result)
    }

    /// Every cell reachable from [`START`] in at most `steps` moves.
    ///
    /// Runs Dijkstra until the first node at depth `steps` is popped; by then
    /// every shallower node has been expanded.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::Search`] if the engine aborts.
    pub fn reachable_within(&self, steps: u32, policy: &SearchPolicy) -> Result<Reachable, PuzzleError> {
        let world = CubicleWalk {
            maze: *self,
            target: None,
        };
        let mut searcher = Searcher::new(START, &world, &Dijkstra, policy)?;
        let termination = searcher.run_until(|node| node.depth >= steps)?;
        match termination {
            TerminationReason::Halted { .. } | TerminationReason::FrontierExhausted => {}
            other => {
                return Err(PuzzleError::NoSolution {
                    puzzle: "cubicle_maze",
                    termination: other.as_str(),
                })
            }
        }

        let mut positions: Vec<Position> = searcher.visited().iter().copied().collect();
        positions.sort_unstable();
        Ok(Reachable {
            positions,
            stats: searcher.stats(),
        })
    }
}

fn digit(n: i64) -> char {
    char::from_digit((n % 10) as u32, 10).unwrap_or('?')
}

/// Result of [`CubicleMaze::reachable_within`].
#[derive(Debug, Clone)]
pub struct Reachable {
    /// Sorted, start included.
    pub positions: Vec<Position>,
    pub stats: SearchStats,
}

impl Reachable {
    #[must_use]
    pub fn count(&self) -> usize {
        self.positions.len()
    }
}

/// Walk through a [`CubicleMaze`], optionally towards a target.
#[derive(Debug, Clone, Copy)]
pub struct CubicleWalk {
    pub maze: CubicleMaze,
    /// `None` never reaches a goal.
    pub target: Option<Position>,
}

impl SearchWorld for CubicleWalk {
    type State = Position;

    fn world_id(&self) -> &str {
        "cubicle_maze"
    }

    fn expand(&self, &(x, y): &Position, exclusion: &dyn Exclusion<Position>) -> Result<Vec<Position>, WorldError> {
        Ok(DIRECTIONS
            .iter()
            .filter_map(|&(dx, dy)| Some((x.checked_add(dx)?, y.checked_add(dy)?)))
            .filter(|&p| self.maze.is_open(p) && !exclusion.excludes(&p))
            .collect())
    }

    fn is_goal(&self, state: &Position) -> bool {
        self.target == Some(*state)
    }
}
