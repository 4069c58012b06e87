//! Layer-at-a-time search.
//!
//! Valid only when every member of a layer shares the same path length, i.e.
//! the metric is pure path length. Each layer is expanded against a read-only
//! snapshot of the history; the successors are then merged in layer order,
//! deduplicated, and written to the history in one pass before the new layer
//! is goal-tested.
//!
//! The parallel scheduler hands layer members to a rayon pool. It was
//! empirically slower than the sequential sweep on the puzzle worlds (the
//! per-layer merge dominates), so validate it before making it a default.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use rayon::prelude::*;

use crate::cancel::CancelToken;
use crate::contract::{SearchWorld, WorldError};
use crate::error::{PanicStage, SearchError};
use crate::node::NodeArena;
use crate::policy::{LayerScheduler, SearchPolicy};
use crate::search::{SearchResult, TerminationReason};
use crate::transcript::{ExpansionTrace, SearchStats};
use crate::visited::VisitedSet;

/// Run a layered search from `root` to completion.
///
/// # Errors
///
/// Same as [`crate::search::search`]. A dedicated thread pool that fails to
/// build is reported as [`SearchError::InvalidPolicy`].
pub fn search_layered<W>(
    root: W::State,
    world: &W,
    policy: &SearchPolicy,
) -> Result<SearchResult<W::State>, SearchError>
where
    W: SearchWorld + Sync,
    W::State: Send + Sync,
{
    search_layered_with_cancel(root, world, policy, None)
}

/// Like [`search_layered`], observing `cancel` between layers.
///
/// # Errors
///
/// See [`search_layered`].
pub fn search_layered_with_cancel<W>(
    root: W::State,
    world: &W,
    policy: &SearchPolicy,
    cancel: Option<&CancelToken>,
) -> Result<SearchResult<W::State>, SearchError>
where
    W: SearchWorld + Sync,
    W::State: Send + Sync,
{
    policy.validate()?;
    let pool = build_pool(policy.scheduler)?;
    let started = Instant::now();

    let mut nodes = NodeArena::new();
    let mut visited = VisitedSet::new();
    let mut stats = SearchStats::default();
    let mut trace = ExpansionTrace::new();

    visited.insert(&root);
    let root_id = nodes.alloc(None, root, 0, 0);
    let mut layer = vec![root_id];
    let mut depth = 0u32;

    if let Some(node_id) = first_goal(world, &nodes, &layer)? {
        return Ok(finish(
            TerminationReason::GoalReached { node_id },
            nodes,
            &visited,
            stats,
            trace,
        ));
    }

    let termination = loop {
        if layer.is_empty() {
            log::info!(
                "layered search in {} exhausted at depth {depth}",
                world.world_id()
            );
            break TerminationReason::FrontierExhausted;
        }
        if depth >= policy.max_depth {
            log::debug!(
                "depth limit {} reached with nactive={}",
                policy.max_depth,
                layer.len()
            );
            break TerminationReason::FrontierExhausted;
        }
        if cancel.is_some_and(CancelToken::is_cancelled) {
            log::warn!("layered search in {} cancelled at depth {depth}", world.world_id());
            break TerminationReason::Cancelled;
        }
        if policy
            .time_budget
            .is_some_and(|budget| started.elapsed() >= budget)
        {
            log::warn!("layered search in {} ran out of time at depth {depth}", world.world_id());
            break TerminationReason::DeadlineExceeded;
        }
        if stats.expansions >= policy.max_expansions {
            log::warn!(
                "layered search in {} hit the expansion budget at depth {depth}",
                world.world_id()
            );
            break TerminationReason::ExpansionBudgetExceeded;
        }

        log::debug!("nactive={} depth={depth}", layer.len());
        stats.frontier_high_water = stats.frontier_high_water.max(layer.len() as u64);

        let expanded = expand_layer(world, &nodes, &visited, &layer, policy.scheduler, pool.as_ref());
        stats.layers += 1;

        let child_depth = depth + 1;
        let mut next = Vec::new();
        let mut fresh = VisitedSet::new();
        for (&parent_id, children) in layer.iter().zip(expanded) {
            let children = children?;
            stats.expansions += 1;
            stats.candidates_generated += children.len() as u64;
            trace.record(parent_id);

            let mut created = 0usize;
            for child in children {
                if visited.contains(&child) || !fresh.insert(&child) {
                    stats.duplicates_suppressed += 1;
                    continue;
                }
                let child_id = nodes.alloc(Some(parent_id), child, child_depth, i64::from(child_depth));
                next.push(child_id);
                created += 1;
            }
            if created == 0 {
                stats.dead_ends += 1;
            }
        }

        let added = visited.extend_layer(fresh.iter());
        log::trace!("history +{added} at depth {child_depth}");
        if !next.is_empty() {
            stats.max_depth = child_depth;
        }
        depth = child_depth;
        layer = next;

        if let Some(node_id) = first_goal(world, &nodes, &layer)? {
            log::info!(
                "layered search in {} reached goal node {node_id} at depth {depth}",
                world.world_id()
            );
            break TerminationReason::GoalReached { node_id };
        }
    };

    Ok(finish(termination, nodes, &visited, stats, trace))
}

fn finish<S: Clone + Eq + std::hash::Hash>(
    termination: TerminationReason,
    nodes: NodeArena<S>,
    visited: &VisitedSet<S>,
    mut stats: SearchStats,
    trace: ExpansionTrace,
) -> SearchResult<S> {
    stats.states_seen = visited.len() as u64;
    SearchResult {
        termination,
        nodes,
        stats,
        trace,
    }
}

fn build_pool(scheduler: LayerScheduler) -> Result<Option<rayon::ThreadPool>, SearchError> {
    match scheduler {
        LayerScheduler::Parallel {
            threads: Some(threads),
        } => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map(Some)
            .map_err(|e| SearchError::InvalidPolicy {
                detail: format!("cannot build a {threads}-thread pool: {e}"),
            }),
        _ => Ok(None),
    }
}

/// Expand every member of `layer` against the history snapshot. Results are
/// returned in layer order whichever scheduler ran them.
fn expand_layer<W>(
    world: &W,
    nodes: &NodeArena<W::State>,
    history: &VisitedSet<W::State>,
    layer: &[u64],
    scheduler: LayerScheduler,
    pool: Option<&rayon::ThreadPool>,
) -> Vec<Result<Vec<W::State>, SearchError>>
where
    W: SearchWorld + Sync,
    W::State: Send + Sync,
{
    let expand_one = |node_id: &u64| -> Result<Vec<W::State>, SearchError> {
        let node = nodes.node(*node_id)?;
        match catch_unwind(AssertUnwindSafe(|| world.expand(&node.state, history))) {
            Ok(Ok(children)) => Ok(children),
            Ok(Err(WorldError::InvalidState { detail })) => Err(SearchError::InvalidState {
                world_id: world.world_id().to_string(),
                node_id: *node_id,
                detail,
            }),
            Err(_) => Err(SearchError::WorldPanicked {
                world_id: world.world_id().to_string(),
                stage: PanicStage::Expand,
                node_id: *node_id,
            }),
        }
    };

    match (scheduler, pool) {
        (LayerScheduler::Sequential, _) => layer.iter().map(expand_one).collect(),
        (LayerScheduler::Parallel { .. }, Some(pool)) => {
            pool.install(|| layer.par_iter().map(expand_one).collect())
        }
        (LayerScheduler::Parallel { .. }, None) => layer.par_iter().map(expand_one).collect(),
    }
}

fn first_goal<W: SearchWorld>(
    world: &W,
    nodes: &NodeArena<W::State>,
    layer: &[u64],
) -> Result<Option<u64>, SearchError> {
    for &node_id in layer {
        let node = nodes.node(node_id)?;
        let is_goal = catch_unwind(AssertUnwindSafe(|| world.is_goal(&node.state))).map_err(
            |_| SearchError::WorldPanicked {
                world_id: world.world_id().to_string(),
                stage: PanicStage::IsGoal,
                node_id,
            },
        )?;
        if is_goal {
            return Ok(Some(node_id));
        }
    }
    Ok(None)
}
