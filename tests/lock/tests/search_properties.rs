//! Property tests over random grids, checked against a breadth-first oracle.

use std::collections::HashSet;

use lock_tests::grid_world::{Cell, GridWorld, START};
use proptest::prelude::*;
use waymark_search::layered::search_layered;
use waymark_search::metric::{manhattan, AStar, Dijkstra};
use waymark_search::policy::{LayerScheduler, SearchPolicy};
use waymark_search::search::{search, TerminationReason};

fn grid() -> impl Strategy<Value = GridWorld> {
    (2i64..9, 2i64..9).prop_flat_map(|(w, h)| {
        let cells = usize::try_from(w * h).unwrap();
        (
            proptest::collection::vec(proptest::bool::weighted(0.3), cells),
            0..w,
            0..h,
        )
            .prop_map(move |(mask, gx, gy)| GridWorld::from_mask(w, h, &mask).with_goal((gx, gy)))
    })
}

fn astar_for(world: &GridWorld) -> AStar<impl Fn(&Cell) -> i64> {
    let goal = world.goal().unwrap();
    AStar::new(move |c: &Cell| manhattan(*c, goal))
}

proptest! {
    #[test]
    fn dijkstra_matches_breadth_first_distance(world in grid()) {
        let expected = world.distances(START).get(&world.goal().unwrap()).copied();
        let result = search(START, &world, &Dijkstra, &SearchPolicy::default()).unwrap();
        prop_assert_eq!(result.move_count(), expected);
        if expected.is_none() {
            prop_assert_eq!(result.termination, TerminationReason::FrontierExhausted);
        }
    }

    #[test]
    fn admissible_astar_matches_dijkstra(world in grid()) {
        let policy = SearchPolicy::default();
        let dijkstra = search(START, &world, &Dijkstra, &policy).unwrap();
        let astar = search(START, &world, &astar_for(&world), &policy).unwrap();
        prop_assert_eq!(astar.move_count(), dijkstra.move_count());
        prop_assert!(astar.stats.expansions <= dijkstra.stats.expansions);
    }

    #[test]
    fn goal_path_is_a_walk_through_open_cells(world in grid()) {
        let result = search(START, &world, &astar_for(&world), &SearchPolicy::default()).unwrap();
        if let Some(path) = result.path() {
            prop_assert_eq!(path.first(), Some(&START));
            prop_assert_eq!(path.last().copied(), world.goal());
            for pair in path.windows(2) {
                prop_assert!(world.is_open(pair[1]));
                prop_assert_eq!(manhattan(pair[0], pair[1]), 1);
            }
            let distinct: HashSet<&Cell> = path.iter().collect();
            prop_assert_eq!(distinct.len(), path.len());
        }
    }

    #[test]
    fn no_state_is_created_twice(world in grid()) {
        let result = search(START, &world, &Dijkstra, &SearchPolicy::default()).unwrap();
        let states: HashSet<Cell> = result.nodes.iter().map(|n| n.state).collect();
        prop_assert_eq!(states.len(), result.nodes.len());
        prop_assert_eq!(result.stats.states_seen, result.nodes.len() as u64);
    }

    #[test]
    fn exhausted_search_sees_the_whole_component(mask in proptest::collection::vec(proptest::bool::weighted(0.3), 36)) {
        let world = GridWorld::from_mask(6, 6, &mask);
        let component = world.distances(START);
        let result = search(START, &world, &Dijkstra, &SearchPolicy::default()).unwrap();
        prop_assert_eq!(result.termination, TerminationReason::FrontierExhausted);
        prop_assert_eq!(result.stats.states_seen, component.len() as u64);
        prop_assert_eq!(result.stats.expansions, component.len() as u64);
    }

    #[test]
    fn layered_agrees_with_best_first(world in grid()) {
        let best_first = search(START, &world, &Dijkstra, &SearchPolicy::default()).unwrap();
        let layered = search_layered(START, &world, &SearchPolicy::default()).unwrap();
        prop_assert_eq!(layered.move_count(), best_first.move_count());

        let parallel_policy = SearchPolicy {
            scheduler: LayerScheduler::Parallel { threads: Some(2) },
            ..SearchPolicy::default()
        };
        let parallel = search_layered(START, &world, &parallel_policy).unwrap();
        prop_assert_eq!(parallel.trace, layered.trace);
    }

    #[test]
    fn expansion_budget_is_never_exceeded(world in grid(), budget in 1u64..20) {
        let policy = SearchPolicy { max_expansions: budget, ..SearchPolicy::default() };
        let result = search(START, &world, &Dijkstra, &policy).unwrap();
        prop_assert!(result.stats.expansions <= budget);
        if result.termination == TerminationReason::ExpansionBudgetExceeded {
            prop_assert_eq!(result.stats.expansions, budget);
        }
    }
}
