//! Cooperative stopping: cancel tokens and wall-clock budgets.

use std::thread;
use std::time::Duration;

use waymark_search::cancel::CancelToken;
use waymark_search::contract::FnWorld;
use waymark_search::layered::search_layered_with_cancel;
use waymark_search::metric::Dijkstra;
use waymark_search::policy::SearchPolicy;
use waymark_search::search::{search, Searcher, TerminationReason};

/// `0 → 1 → 2 → …` with no goal; cancels `token` while expanding `trip`.
fn tripwire_line(
    token: CancelToken,
    trip: u64,
) -> FnWorld<u64, impl Fn(&u64) -> Vec<u64> + Sync, impl Fn(&u64) -> bool + Sync> {
    FnWorld::new(
        "tripwire_line",
        move |n: &u64| {
            if *n == trip {
                token.cancel();
            }
            vec![n + 1]
        },
        |_: &u64| false,
    )
}

#[test]
fn precancelled_search_expands_nothing() {
    let token = CancelToken::new();
    token.cancel();
    let world = tripwire_line(CancelToken::new(), u64::MAX);
    let policy = SearchPolicy::default();

    let mut searcher = Searcher::new(0, &world, &Dijkstra, &policy).unwrap().with_cancel(token);
    assert_eq!(searcher.run().unwrap(), TerminationReason::Cancelled);
    assert_eq!(searcher.stats().expansions, 0);
}

#[test]
fn cancel_takes_effect_at_the_next_pop() {
    let token = CancelToken::new();
    let world = tripwire_line(token.clone(), 5);
    let policy = SearchPolicy::default();

    let mut searcher = Searcher::new(0, &world, &Dijkstra, &policy).unwrap().with_cancel(token);
    let termination = searcher.run().unwrap();
    let result = searcher.finish(termination);

    assert_eq!(result.termination, TerminationReason::Cancelled);
    assert_eq!(result.stats.expansions, 6);
    assert_eq!(result.trace.expanded(), [0, 1, 2, 3, 4, 5]);
    assert!(result.path().is_none());
}

#[test]
fn cancel_takes_effect_at_the_next_layer() {
    let token = CancelToken::new();
    let world = tripwire_line(token.clone(), 3);
    let result = search_layered_with_cancel(0, &world, &SearchPolicy::default(), Some(&token)).unwrap();

    assert_eq!(result.termination, TerminationReason::Cancelled);
    assert_eq!(result.stats.expansions, 4);
    assert_eq!(result.stats.layers, 4);
}

#[test]
fn cancel_from_another_thread() {
    let token = CancelToken::new();
    let world = tripwire_line(CancelToken::new(), u64::MAX);
    let policy = SearchPolicy::default();

    let termination = thread::scope(|scope| {
        let worker = scope.spawn(|| {
            let mut searcher = Searcher::new(0, &world, &Dijkstra, &policy)
                .unwrap()
                .with_cancel(token.clone());
            searcher.run().unwrap()
        });
        thread::sleep(Duration::from_millis(20));
        token.cancel();
        worker.join().unwrap()
    });
    assert_eq!(termination, TerminationReason::Cancelled);
}

#[test]
fn zero_time_budget_stops_before_the_first_pop() {
    let world = tripwire_line(CancelToken::new(), u64::MAX);
    let policy = SearchPolicy {
        time_budget: Some(Duration::ZERO),
        ..SearchPolicy::default()
    };
    let result = search(0, &world, &Dijkstra, &policy).unwrap();
    assert_eq!(result.termination, TerminationReason::DeadlineExceeded);
    assert_eq!(result.stats.expansions, 0);
}
