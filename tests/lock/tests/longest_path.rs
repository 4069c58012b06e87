//! Longest goal paths found by resuming one search past each goal.

use waymark_puzzles::contract::MetricChoice;
use waymark_puzzles::worlds::vault_doors::{VaultDoors, VAULT};
use waymark_search::metric::Dijkstra;
use waymark_search::policy::SearchPolicy;
use waymark_search::search::{find_longest_path, TerminationReason};

#[test]
fn longest_vault_routes() {
    let policy = SearchPolicy::default();
    for (passcode, expected) in [("ihgpwlah", 370), ("kglvqrro", 492), ("ulqzkmiv", 830)] {
        let longest = VaultDoors::new(passcode)
            .longest_path(MetricChoice::Dijkstra, &policy)
            .unwrap();
        assert_eq!(longest.route.len(), expected, "{passcode}");
    }
}

#[test]
fn longest_route_is_independent_of_the_metric() {
    let vault = VaultDoors::new("kglvqrro");
    let policy = SearchPolicy::default();
    let dijkstra = vault.longest_path(MetricChoice::Dijkstra, &policy).unwrap();
    let astar = vault.longest_path(MetricChoice::AStar, &policy).unwrap();
    assert_eq!(dijkstra.route.len(), astar.route.len());
    assert_eq!(dijkstra.goals_reached, astar.goals_reached);
}

#[test]
fn longest_path_ends_on_exhaustion_at_the_vault() {
    let vault = VaultDoors::new("ihgpwlah");
    let longest = find_longest_path(vault.start(), &vault, &Dijkstra, &SearchPolicy::default()).unwrap();

    assert_eq!(longest.termination, TerminationReason::FrontierExhausted);
    assert_eq!(longest.move_count(), Some(370));
    let path = longest.path.unwrap();
    assert_eq!(path.first(), Some(&vault.start()));
    let last = path.last().unwrap();
    assert_eq!(last.pos, VAULT);
    assert_eq!(last.path.len(), 370);
}

#[test]
fn budget_cuts_the_longest_search_short() {
    let vault = VaultDoors::new("ulqzkmiv");
    let policy = SearchPolicy {
        max_expansions: 200,
        ..SearchPolicy::default()
    };
    let longest = find_longest_path(vault.start(), &vault, &Dijkstra, &policy).unwrap();
    assert_eq!(longest.termination, TerminationReason::ExpansionBudgetExceeded);
    assert!(longest.move_count().unwrap_or(0) < 830);
    assert_eq!(longest.stats.expansions, 200);
}
