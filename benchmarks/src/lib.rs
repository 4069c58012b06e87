//! Shared regimes for the waymark benchmark suites.

use waymark_puzzles::contract::{MetricChoice, PuzzleError};
use waymark_puzzles::runner::{run_puzzle, PuzzleKind, PuzzleReport, RunConfig};
use waymark_search::contract::FnWorld;
use waymark_search::policy::{LayerScheduler, SearchPolicy};

const ELEVATOR_FIVE_PAIRS: &str = "\
The first floor contains a promethium generator and a promethium-compatible microchip.
The second floor contains a cobalt generator, a curium generator, a ruthenium generator, and a plutonium generator.
The third floor contains a cobalt-compatible microchip, a curium-compatible microchip, a ruthenium-compatible microchip, and a plutonium-compatible microchip.
The fourth floor contains nothing relevant.
";

const DUCT_EXAMPLE: &str = "\
###########
#0.1.....2#
#.#######.#
#4.......3#
###########
";

/// One puzzle run with fixed input and configuration.
pub struct Regime {
    pub name: &'static str,
    pub kind: PuzzleKind,
    pub input: &'static str,
    pub config: RunConfig,
}

impl Regime {
    /// # Errors
    ///
    /// Whatever [`run_puzzle`] returns.
    pub fn run(&self) -> Result<PuzzleReport, PuzzleError> {
        run_puzzle(self.kind, self.input, &self.config)
    }
}

fn with_metric(metric: Option<MetricChoice>) -> RunConfig {
    RunConfig {
        metric,
        ..RunConfig::default()
    }
}

fn with_scheduler(scheduler: LayerScheduler) -> RunConfig {
    RunConfig {
        policy: SearchPolicy {
            scheduler,
            ..SearchPolicy::default()
        },
        ..RunConfig::default()
    }
}

/// Elevator runs comparing the layered schedulers with best-first.
#[must_use]
pub fn elevator_regimes() -> Vec<Regime> {
    let regime = |name, config| Regime {
        name,
        kind: PuzzleKind::Elevator,
        input: ELEVATOR_FIVE_PAIRS,
        config,
    };
    vec![
        regime("layered_sequential", with_scheduler(LayerScheduler::Sequential)),
        regime("layered_parallel", with_scheduler(LayerScheduler::Parallel { threads: None })),
        regime("astar", with_metric(Some(MetricChoice::AStar))),
        regime("dijkstra", with_metric(Some(MetricChoice::Dijkstra))),
    ]
}

/// One run per remaining puzzle, with its default ordering.
#[must_use]
pub fn puzzle_regimes() -> Vec<Regime> {
    vec![
        Regime {
            name: "cubicle_maze",
            kind: PuzzleKind::CubicleMaze,
            input: "1358",
            config: RunConfig::default(),
        },
        Regime {
            name: "vault_doors",
            kind: PuzzleKind::VaultDoors,
            input: "ihgpwlah",
            config: RunConfig::default(),
        },
        Regime {
            name: "duct_maze",
            kind: PuzzleKind::DuctMaze,
            input: DUCT_EXAMPLE,
            config: RunConfig::default(),
        },
        Regime {
            name: "duct_maze_astar",
            kind: PuzzleKind::DuctMaze,
            input: DUCT_EXAMPLE,
            config: with_metric(Some(MetricChoice::AStar)),
        },
    ]
}

/// Open `size` x `size` grid with the goal in the far corner.
#[must_use]
pub fn open_grid(
    size: i64,
) -> FnWorld<(i64, i64), impl Fn(&(i64, i64)) -> Vec<(i64, i64)> + Sync, impl Fn(&(i64, i64)) -> bool + Sync> {
    let inside = move |(x, y): (i64, i64)| (0..size).contains(&x) && (0..size).contains(&y);
    FnWorld::new(
        "open_grid",
        move |&(x, y): &(i64, i64)| {
            [(x + 1, y), (x, y + 1), (x - 1, y), (x, y - 1)]
                .into_iter()
                .filter(|&c| inside(c))
                .collect()
        },
        move |&c: &(i64, i64)| c == (size - 1, size - 1),
    )
}
