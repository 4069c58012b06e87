//! `DuctMaze`: visit every numbered spot of an air-duct map.
//!
//! The map is a block of equal-width lines: `#` is a wall, digits `0`-`9`
//! are waypoints (`0` is the start), anything else is open floor. A state is
//! the current cell plus the bitmask of waypoints not yet visited.

use std::collections::HashSet;

use waymark_search::contract::{SearchWorld, WorldError};
use waymark_search::metric::{AStar, Dijkstra, Heuristic};
use waymark_search::policy::SearchPolicy;
use waymark_search::search::search;
use waymark_search::visited::Exclusion;

use crate::contract::{solution_from, MetricChoice, PuzzleError, Solution};

pub type Cell = (usize, usize);

const MOVES: [(isize, isize); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DuctState {
    pub pos: Cell,
    /// Bit `n` set while waypoint `n` is still to be visited.
    pub remaining: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuctGoal {
    /// Every waypoint visited, ending anywhere.
    VisitAll,
    /// Every waypoint visited, then back on waypoint `0`.
    VisitAllAndReturn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuctMaze {
    width: usize,
    height: usize,
    walls: Vec<bool>,
    /// Indexed by waypoint digit.
    waypoints: Vec<Option<Cell>>,
}

impl DuctMaze {
    /// # Errors
    ///
    /// Returns [`PuzzleError::Parse`] for non-ASCII or ragged lines or a
    /// repeated digit, and [`PuzzleError::Invalid`] for a map without
    /// waypoint `0`.
    pub fn parse(input: &str) -> Result<Self, PuzzleError> {
        let lines: Vec<&str> = input.lines().map(str::trim_end).filter(|l| !l.is_empty()).collect();
        let width = lines.first().map_or(0, |l| l.len());
        let mut walls = Vec::with_capacity(width.saturating_mul(lines.len()));
        let mut waypoints: Vec<Option<Cell>> = vec![None; 10];

        for (y, line) in lines.iter().enumerate() {
            if !line.is_ascii() {
                return Err(PuzzleError::parse(y + 1, "map must be ASCII"));
            }
            if line.len() != width {
                return Err(PuzzleError::parse(
                    y + 1,
                    format!("line is {} wide, expected {width}", line.len()),
                ));
            }
            for (x, c) in line.bytes().enumerate() {
                walls.push(c == b'#');
                if let Some(n) = char::from(c).to_digit(10) {
                    let slot = &mut waypoints[n as usize];
                    if slot.replace((x, y)).is_some() {
                        return Err(PuzzleError::parse(y + 1, format!("waypoint {n} appears twice")));
                    }
                }
            }
        }
        if waypoints[0].is_none() {
            return Err(PuzzleError::invalid("no start waypoint 0"));
        }

        Ok(Self {
            width,
            height: lines.len(),
            walls,
            waypoints,
        })
    }

    #[must_use]
    pub fn waypoint(&self, n: usize) -> Option<Cell> {
        self.waypoints.get(n).copied().flatten()
    }

    fn start(&self) -> Cell {
        self.waypoint(0).unwrap_or_default()
    }

    fn bit_at(&self, cell: Cell) -> u16 {
        self.waypoints
            .iter()
            .position(|w| *w == Some(cell))
            .map_or(0, |n| 1 << n)
    }

    fn is_open(&self, (x, y): Cell) -> bool {
        x < self.width && y < self.height && !self.walls[y * self.width + x]
    }

    #[must_use]
    pub fn start_state(&self) -> DuctState {
        let all = self
            .waypoints
            .iter()
            .enumerate()
            .filter(|(_, w)| w.is_some())
            .fold(0u16, |acc, (n, _)| acc | 1 << n);
        let pos = self.start();
        DuctState {
            pos,
            remaining: all & !self.bit_at(pos),
        }
    }

    /// The map with `o` on every non-waypoint cell of `path`.
    #[must_use]
    pub fn render(&self, path: &[DuctState]) -> Vec<String> {
        let trail: HashSet<Cell> = path.iter().map(|s| s.pos).collect();
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| {
                        if let Some(n) = self.waypoints.iter().position(|w| *w == Some((x, y))) {
                            char::from_digit(n as u32, 10).unwrap_or('?')
                        } else if self.walls[y * self.width + x] {
                            '#'
                        } else if trail.contains(&(x, y)) {
                            'o'
                        } else {
                            '.'
                        }
                    })
                    .collect::<String>()
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DuctWorld<'a> {
    maze: &'a DuctMaze,
    goal: DuctGoal,
}

impl<'a> DuctWorld<'a> {
    #[must_use]
    pub fn new(maze: &'a DuctMaze, goal: DuctGoal) -> Self {
        Self { maze, goal }
    }
}

impl SearchWorld for DuctWorld<'_> {
    type State = DuctState;

    fn world_id(&self) -> &str {
        "duct_maze"
    }

    fn expand(&self, state: &DuctState, exclusion: &dyn Exclusion<DuctState>) -> Result<Vec<DuctState>, WorldError> {
        let (x, y) = state.pos;
        let mut next = Vec::new();
        for (dx, dy) in MOVES {
            let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy)) else {
                continue;
            };
            if !self.maze.is_open((nx, ny)) {
                continue;
            }
            let moved = DuctState {
                pos: (nx, ny),
                remaining: state.remaining & !self.maze.bit_at((nx, ny)),
            };
            if !exclusion.excludes(&moved) {
                next.push(moved);
            }
        }
        Ok(next)
    }

    fn is_goal(&self, state: &DuctState) -> bool {
        state.remaining == 0
            && match self.goal {
                DuctGoal::VisitAll => true,
                DuctGoal::VisitAllAndReturn => state.pos == self.maze.start(),
            }
    }
}

/// Farthest remaining waypoint (plus its distance home when returning).
#[derive(Debug, Clone, Copy)]
pub struct DuctHeuristic<'a> {
    maze: &'a DuctMaze,
    goal: DuctGoal,
}

impl<'a> DuctHeuristic<'a> {
    #[must_use]
    pub fn new(maze: &'a DuctMaze, goal: DuctGoal) -> Self {
        Self { maze, goal }
    }
}

fn distance(a: Cell, b: Cell) -> i64 {
    i64::try_from(a.0.abs_diff(b.0) + a.1.abs_diff(b.1)).unwrap_or(i64::MAX)
}

impl Heuristic<DuctState> for DuctHeuristic<'_> {
    fn estimate(&self, state: &DuctState) -> i64 {
        let home = self.maze.start();
        let returning = self.goal == DuctGoal::VisitAllAndReturn;
        let farthest = self
            .maze
            .waypoints
            .iter()
            .enumerate()
            .filter(|(n, _)| state.remaining & (1 << n) != 0)
            .filter_map(|(_, w)| *w)
            .map(|w| distance(state.pos, w) + if returning { distance(w, home) } else { 0 })
            .max();
        match farthest {
            Some(d) => d,
            None if returning => distance(state.pos, home),
            None => 0,
        }
    }
}

/// Shortest walk satisfying `goal`.
///
/// # Errors
///
/// Returns [`PuzzleError::NoSolution`] if some waypoint is walled off.
pub fn solve(
    maze: &DuctMaze,
    goal: DuctGoal,
    metric: MetricChoice,
    policy: &SearchPolicy,
) -> Result<Solution<DuctState>, PuzzleError> {
    let world = DuctWorld::new(maze, goal);
    let root = maze.start_state();
    let result = match metric {
        MetricChoice::Dijkstra => search(root, &world, &Dijkstra, policy)?,
        MetricChoice::AStar => search(root, &world, &AStar::new(DuctHeuristic::new(maze, goal)), policy)?,
    };
    solution_from("duct_maze", &result)
}
