//! In-process determinism of the expansion trace.

use lock_tests::fixtures;
use lock_tests::grid_world::{GridWorld, START};
use waymark_puzzles::worlds::elevator::{ElevatorLayout, ElevatorWorld};
use waymark_search::layered::search_layered;
use waymark_search::metric::{manhattan, AStar, Dijkstra};
use waymark_search::policy::{LayerScheduler, SearchPolicy};
use waymark_search::search::{search, Searcher, Step};

fn goal_heuristic(world: &GridWorld) -> AStar<impl Fn(&(i64, i64)) -> i64> {
    let goal = world.goal().expect("pinned grid has a goal");
    AStar::new(move |c: &(i64, i64)| manhattan(*c, goal))
}

#[test]
fn repeated_runs_produce_identical_traces() {
    let world = GridWorld::pinned();
    let metric = goal_heuristic(&world);
    let policy = SearchPolicy::default();

    let first = search(START, &world, &metric, &policy).unwrap();
    let first_bytes = first.trace.to_canonical_json_bytes().unwrap();
    for _ in 1..10 {
        let other = search(START, &world, &metric, &policy).unwrap();
        assert_eq!(first_bytes, other.trace.to_canonical_json_bytes().unwrap());
        assert_eq!(first.stats, other.stats);
        assert_eq!(first.path(), other.path());
    }
}

#[test]
fn digest_is_prefixed_sha256() {
    let world = GridWorld::pinned();
    let result = search(START, &world, &Dijkstra, &SearchPolicy::default()).unwrap();
    let digest = result.trace.digest();
    let hex = digest.strip_prefix("sha256:").expect("sha256: prefix");
    assert_eq!(hex.len(), 64);
    assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn stepping_matches_running() {
    let world = GridWorld::pinned();
    let metric = goal_heuristic(&world);
    let policy = SearchPolicy::default();
    let whole = search(START, &world, &metric, &policy).unwrap();

    let mut searcher = Searcher::new(START, &world, &metric, &policy).unwrap();
    let goal = loop {
        match searcher.step().unwrap() {
            Step::Expanded { .. } => {}
            Step::GoalReached { node_id } => break node_id,
            other => panic!("unexpected step {other:?}"),
        }
    };
    assert_eq!(Some(goal), whole.goal_node_id());
    assert_eq!(searcher.trace(), &whole.trace);
}

#[test]
fn metrics_leave_distinct_traces() {
    let world = GridWorld::pinned();
    let policy = SearchPolicy::default();
    let dijkstra = search(START, &world, &Dijkstra, &policy).unwrap();
    let astar = search(START, &world, &goal_heuristic(&world), &policy).unwrap();

    assert_eq!(dijkstra.move_count(), Some(22));
    assert_eq!(astar.move_count(), Some(22));
    assert!(astar.stats.expansions < dijkstra.stats.expansions);
    assert_ne!(astar.trace.digest(), dijkstra.trace.digest());
}

#[test]
fn layered_trace_ignores_the_scheduler() {
    let layout = ElevatorLayout::parse(fixtures::ELEVATOR_EXAMPLE).unwrap();
    let world = ElevatorWorld::new(&layout);
    let root = layout.initial_state();

    let sequential = search_layered(root, &world, &SearchPolicy::default()).unwrap();
    for threads in [None, Some(1), Some(4)] {
        let policy = SearchPolicy {
            scheduler: LayerScheduler::Parallel { threads },
            ..SearchPolicy::default()
        };
        let parallel = search_layered(root, &world, &policy).unwrap();
        assert_eq!(parallel.trace, sequential.trace, "threads={threads:?}");
        assert_eq!(parallel.stats, sequential.stats, "threads={threads:?}");
        assert_eq!(parallel.move_count(), Some(11));
    }
}
