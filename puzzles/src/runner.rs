//! Puzzle runner: raw input text in, answers and counters out.
//!
//! # Pipeline
//!
//! ```text
//! PuzzleKind::from_str() → parse input → build world → search → PuzzleReport
//! ```

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use waymark_search::policy::SearchPolicy;
use waymark_search::transcript::SearchStats;

use crate::contract::{MetricChoice, PuzzleError};
use crate::worlds::cubicle_maze::{self, CubicleMaze};
use crate::worlds::duct_maze::{self, DuctGoal, DuctMaze};
use crate::worlds::elevator::{self, ElevatorHeuristic, ElevatorLayout};
use crate::worlds::storage_grid::{self, SlidingDataHeuristic, StorageGrid};
use crate::worlds::vault_doors::VaultDoors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PuzzleKind {
    Elevator,
    CubicleMaze,
    VaultDoors,
    StorageGrid,
    DuctMaze,
}

impl PuzzleKind {
    pub const ALL: [Self; 5] = [
        Self::Elevator,
        Self::CubicleMaze,
        Self::VaultDoors,
        Self::StorageGrid,
        Self::DuctMaze,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Elevator => "elevator",
            Self::CubicleMaze => "cubicle_maze",
            Self::VaultDoors => "vault_doors",
            Self::StorageGrid => "storage_grid",
            Self::DuctMaze => "duct_maze",
        }
    }

    /// Advent of Code 2016 day the puzzle comes from.
    #[must_use]
    pub fn day(self) -> u8 {
        match self {
            Self::Elevator => 11,
            Self::CubicleMaze => 13,
            Self::VaultDoors => 17,
            Self::StorageGrid => 22,
            Self::DuctMaze => 24,
        }
    }

    /// Ordering used when the caller does not choose one.
    #[must_use]
    pub fn default_metric(self) -> MetricChoice {
        match self {
            Self::Elevator | Self::DuctMaze => MetricChoice::Dijkstra,
            Self::CubicleMaze | Self::VaultDoors | Self::StorageGrid => MetricChoice::AStar,
        }
    }
}

impl fmt::Display for PuzzleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PuzzleKind {
    type Err = PuzzleError;

    /// Accepts the world name (`-` or `_`) or `dayNN`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted || format!("day{}", k.day()) == wanted)
            .ok_or_else(|| PuzzleError::invalid(format!("unknown puzzle {s:?}")))
    }
}

/// Everything a run can be tuned with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// `None` uses the puzzle default. For the elevator, `None` also selects
    /// the layered engine.
    pub metric: Option<MetricChoice>,
    pub policy: SearchPolicy,
    /// Overrides the input text for the cubicle maze.
    pub favourite: Option<u64>,
    pub destination: cubicle_maze::Position,
    /// Step limit for the cubicle reachability count.
    pub reach_steps: u32,
    /// Element pairs added to the elevator's ground floor.
    pub extra_pairs: Vec<String>,
    pub elevator_heuristic: ElevatorHeuristic,
    pub storage_heuristic: SlidingDataHeuristic,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            metric: None,
            policy: SearchPolicy::default(),
            favourite: None,
            destination: (31, 39),
            reach_steps: 50,
            extra_pairs: Vec::new(),
            elevator_heuristic: ElevatorHeuristic::default(),
            storage_heuristic: SlidingDataHeuristic::default(),
        }
    }
}

impl RunConfig {
    fn metric_for(&self, kind: PuzzleKind) -> MetricChoice {
        self.metric.unwrap_or_else(|| kind.default_metric())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub label: &'static str,
    pub value: String,
    pub stats: Option<SearchStats>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleReport {
    pub kind: PuzzleKind,
    pub answers: Vec<Answer>,
    /// Human-readable picture of the puzzle, possibly with a route drawn in.
    pub diagram: Vec<String>,
}

impl PuzzleReport {
    fn new(kind: PuzzleKind) -> Self {
        Self {
            kind,
            answers: Vec::new(),
            diagram: Vec::new(),
        }
    }

    fn push(&mut self, label: &'static str, value: impl ToString, stats: Option<SearchStats>) {
        self.answers.push(Answer {
            label,
            value: value.to_string(),
            stats,
        });
    }

    #[must_use]
    pub fn answer(&self, label: &str) -> Option<&str> {
        self.answers
            .iter()
            .find(|a| a.label == label)
            .map(|a| a.value.as_str())
    }

    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        let answers: serde_json::Map<String, serde_json::Value> = self
            .answers
            .iter()
            .map(|a| (a.label.to_string(), serde_json::Value::from(a.value.clone())))
            .collect();
        let stats: serde_json::Map<String, serde_json::Value> = self
            .answers
            .iter()
            .filter_map(|a| a.stats.as_ref().map(|s| (a.label.to_string(), s.to_json_value())))
            .collect();
        serde_json::json!({
            "answers": answers,
            "puzzle": self.kind.as_str(),
            "stats": stats,
        })
    }
}

/// Solve `kind` for `input`.
///
/// # Errors
///
/// Any [`PuzzleError`] from parsing or solving.
pub fn run_puzzle(kind: PuzzleKind, input: &str, config: &RunConfig) -> Result<PuzzleReport, PuzzleError> {
    config.policy.validate()?;
    log::info!("running {kind} (day {})", kind.day());

    match kind {
        PuzzleKind::Elevator => run_elevator(input, config),
        PuzzleKind::CubicleMaze => run_cubicle_maze(input, config),
        PuzzleKind::VaultDoors => run_vault_doors(input, config),
        PuzzleKind::StorageGrid => run_storage_grid(input, config),
        PuzzleKind::DuctMaze => run_duct_maze(input, config),
    }
}

fn run_elevator(input: &str, config: &RunConfig) -> Result<PuzzleReport, PuzzleError> {
    let mut layout = ElevatorLayout::parse(input)?;
    for element in &config.extra_pairs {
        layout = layout.with_pair_on_ground(element)?;
    }
    let solution = elevator::solve(&layout, config.metric, config.elevator_heuristic, &config.policy)?;

    let mut report = PuzzleReport::new(PuzzleKind::Elevator);
    report.diagram = layout.render(&layout.initial_state());
    report.push("moves", solution.moves(), Some(solution.stats));
    Ok(report)
}

fn run_cubicle_maze(input: &str, config: &RunConfig) -> Result<PuzzleReport, PuzzleError> {
    let maze = match config.favourite {
        Some(favourite) => CubicleMaze::new(favourite),
        None => CubicleMaze::parse(input)?,
    };
    let metric = config.metric_for(PuzzleKind::CubicleMaze);
    let route = maze.shortest_path(config.destination, metric, &config.policy)?;
    let reachable = maze.reachable_within(config.reach_steps, &config.policy)?;

    let mut report = PuzzleReport::new(PuzzleKind::CubicleMaze);
    let width = route.path.iter().map(|p| p.0).max().unwrap_or(0).saturating_add(2);
    let height = route.path.iter().map(|p| p.1).max().unwrap_or(0).saturating_add(2);
    let overlay: HashSet<cubicle_maze::Position> = route.path.iter().copied().collect();
    report.diagram = maze.render(width, height, Some(&overlay));
    report.push("steps", route.moves(), Some(route.stats));
    report.push("reachable", reachable.count(), Some(reachable.stats));
    Ok(report)
}

fn run_vault_doors(input: &str, config: &RunConfig) -> Result<PuzzleReport, PuzzleError> {
    let vault = VaultDoors::parse(input)?;
    let metric = config.metric_for(PuzzleKind::VaultDoors);
    let shortest = vault.shortest_path(metric, &config.policy)?;
    let longest = vault.longest_path(metric, &config.policy)?;

    let mut report = PuzzleReport::new(PuzzleKind::VaultDoors);
    report.push("shortest", shortest, None);
    report.push("longest", longest.route.len(), Some(longest.stats));
    Ok(report)
}

fn run_storage_grid(input: &str, config: &RunConfig) -> Result<PuzzleReport, PuzzleError> {
    let nodes = storage_grid::parse_df(input)?;
    let grid = StorageGrid::from_nodes(&nodes)?;

    let mut report = PuzzleReport::new(PuzzleKind::StorageGrid);
    report.push("viable_pairs", storage_grid::count_viable_pairs(&nodes), None);
    report.diagram = grid.initial_state()?.render();

    if !storage_grid::is_sliding_block_like(&nodes) {
        log::warn!("storage grid is not a sliding-block layout; skipping the move count");
        return Ok(report);
    }
    let metric = config.metric_for(PuzzleKind::StorageGrid);
    let solution = storage_grid::solve(&grid, metric, config.storage_heuristic, &config.policy)?;
    report.push("moves", solution.moves(), Some(solution.stats));
    Ok(report)
}

fn run_duct_maze(input: &str, config: &RunConfig) -> Result<PuzzleReport, PuzzleError> {
    let maze = DuctMaze::parse(input)?;
    let metric = config.metric_for(PuzzleKind::DuctMaze);
    let visit = duct_maze::solve(&maze, DuctGoal::VisitAll, metric, &config.policy)?;
    let round_trip = duct_maze::solve(&maze, DuctGoal::VisitAllAndReturn, metric, &config.policy)?;

    let mut report = PuzzleReport::new(PuzzleKind::DuctMaze);
    report.diagram = maze.render(&visit.path);
    report.push("visit_all", visit.moves(), Some(visit.stats));
    report.push("round_trip", round_trip.moves(), Some(round_trip.stats));
    Ok(report)
}
