//! End-to-end puzzle answers through the runner and the world APIs.

use lock_tests::fixtures;
use waymark_puzzles::contract::{MetricChoice, PuzzleError};
use waymark_puzzles::runner::{run_puzzle, PuzzleKind, RunConfig};
use waymark_puzzles::worlds::elevator::{self, ElevatorHeuristic, ElevatorLayout};
use waymark_puzzles::worlds::storage_grid::{SlidingDataHeuristic, StorageGrid, StorageWorld};
use waymark_search::diagnostics::{check_admissibility, AdmissibilityVerdict};
use waymark_search::metric::AStar;
use waymark_search::policy::{LayerScheduler, SearchPolicy};

fn run(kind: PuzzleKind, input: &str, config: &RunConfig) -> Vec<(String, String)> {
    run_puzzle(kind, input, config)
        .unwrap()
        .answers
        .into_iter()
        .map(|a| (a.label.to_string(), a.value))
        .collect()
}

fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[test]
fn elevator_example() {
    let answers = run(PuzzleKind::Elevator, fixtures::ELEVATOR_EXAMPLE, &RunConfig::default());
    assert_eq!(answers, pairs(&[("moves", "11")]));
}

#[test]
fn elevator_five_pairs_layered_and_astar() {
    let layout = ElevatorLayout::parse(fixtures::ELEVATOR_FIVE_PAIRS).unwrap();
    let policy = SearchPolicy::default();
    let heuristic = ElevatorHeuristic::default();

    let layered = elevator::solve(&layout, None, heuristic, &policy).unwrap();
    let astar = elevator::solve(&layout, Some(MetricChoice::AStar), heuristic, &policy).unwrap();
    assert_eq!(layered.moves(), 33);
    assert_eq!(astar.moves(), 33);
}

#[test]
fn elevator_five_pairs_on_a_worker_pool() {
    let config = RunConfig {
        policy: SearchPolicy {
            scheduler: LayerScheduler::Parallel { threads: Some(4) },
            ..SearchPolicy::default()
        },
        ..RunConfig::default()
    };
    let report = run_puzzle(PuzzleKind::Elevator, fixtures::ELEVATOR_FIVE_PAIRS, &config).unwrap();
    assert_eq!(report.answer("moves"), Some("33"));
    assert_eq!(report.diagram.len(), 4);
}

#[test]
fn cubicle_example_and_input() {
    let example = RunConfig {
        destination: (7, 4),
        ..RunConfig::default()
    };
    assert_eq!(
        run(PuzzleKind::CubicleMaze, fixtures::CUBICLE_EXAMPLE, &example),
        pairs(&[("steps", "11"), ("reachable", "151")])
    );
    assert_eq!(
        run(PuzzleKind::CubicleMaze, fixtures::CUBICLE_INPUT, &RunConfig::default()),
        pairs(&[("steps", "96"), ("reachable", "141")])
    );
}

#[test]
fn cubicle_metrics_agree() {
    for metric in [MetricChoice::Dijkstra, MetricChoice::AStar] {
        let config = RunConfig {
            metric: Some(metric),
            ..RunConfig::default()
        };
        let report = run_puzzle(PuzzleKind::CubicleMaze, fixtures::CUBICLE_INPUT, &config).unwrap();
        assert_eq!(report.answer("steps"), Some("96"), "{metric:?}");
    }
}

#[test]
fn vault_passcodes() {
    for (passcode, shortest, longest) in [
        ("ihgpwlah", "DDRRRD", "370"),
        ("kglvqrro", "DDUDRLRRUDRD", "492"),
    ] {
        assert_eq!(
            run(PuzzleKind::VaultDoors, passcode, &RunConfig::default()),
            pairs(&[("shortest", shortest), ("longest", longest)])
        );
    }
}

#[test]
fn vault_without_a_route_reports_no_solution() {
    let err = run_puzzle(PuzzleKind::VaultDoors, "hijkl", &RunConfig::default()).unwrap_err();
    assert_eq!(
        err,
        PuzzleError::NoSolution {
            puzzle: "vault_doors",
            termination: "frontier_exhausted"
        }
    );
}

#[test]
fn storage_example() {
    assert_eq!(
        run(PuzzleKind::StorageGrid, fixtures::STORAGE_EXAMPLE, &RunConfig::default()),
        pairs(&[("viable_pairs", "7"), ("moves", "7")])
    );
}

#[test]
fn storage_heuristic_holds_up_against_dijkstra() {
    let grid = StorageGrid::parse(fixtures::STORAGE_EXAMPLE).unwrap();
    let world = StorageWorld::new(&grid);
    let root = grid.initial_state().unwrap();
    for factor in [3, 5] {
        let metric = AStar::new(SlidingDataHeuristic::new(factor).unwrap());
        let report = check_admissibility(&root, &world, &metric, &SearchPolicy::default()).unwrap();
        assert_eq!(report.verdict, AdmissibilityVerdict::Optimal, "factor {factor}");
        assert_eq!(report.baseline_moves, Some(7));
    }
}

#[test]
fn duct_example() {
    assert_eq!(
        run(PuzzleKind::DuctMaze, fixtures::DUCT_EXAMPLE, &RunConfig::default()),
        pairs(&[("visit_all", "14"), ("round_trip", "20")])
    );
}

#[test]
fn every_kind_rejects_garbage() {
    for kind in PuzzleKind::ALL {
        let input = match kind {
            PuzzleKind::VaultDoors => "",
            _ => "not a puzzle\n",
        };
        let err = run_puzzle(kind, input, &RunConfig::default()).unwrap_err();
        assert!(
            matches!(err, PuzzleError::Parse { .. } | PuzzleError::Invalid { .. }),
            "{kind}: {err:?}"
        );
    }
}
