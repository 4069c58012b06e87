//! Best-first search entry point and expansion loop.
//!
//! Phase machine: `Ready → Expanding → (GoalFound | Exhausted)`. The root is
//! pushed on construction; every step pops the best entry, goal-tests it, and
//! either stops (goal, not expanded) or expands it and pushes every new
//! successor. A successor whose identity is still queued replaces the queued
//! node when it arrives by a strictly shorter route; the replaced entry is
//! skipped when it surfaces. A searcher that stopped on a goal can be
//! resumed: the next `run` keeps popping from the same frontier against the
//! same history.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use crate::cancel::CancelToken;
use crate::contract::{SearchWorld, WorldError};
use crate::error::{PanicStage, SearchError};
use crate::frontier::BestFirstFrontier;
use crate::metric::Metric;
use crate::node::{FrontierKey, NodeArena, SearchNode};
use crate::policy::SearchPolicy;
use crate::transcript::{ExpansionTrace, SearchStats};
use crate::visited::{Admission, VisitedSet};

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// A popped node satisfied the goal predicate.
    GoalReached { node_id: u64 },
    /// Frontier emptied without (further) goals. Not an error.
    FrontierExhausted,
    /// `max_expansions` was hit.
    ExpansionBudgetExceeded,
    /// A caller-supplied halt predicate matched a popped node.
    Halted { node_id: u64 },
    /// The cancel token was set.
    Cancelled,
    /// `time_budget` elapsed.
    DeadlineExceeded,
}

impl TerminationReason {
    /// Stable snake-case tag used in logs and fixture output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoalReached { .. } => "goal_reached",
            Self::FrontierExhausted => "frontier_exhausted",
            Self::ExpansionBudgetExceeded => "expansion_budget_exceeded",
            Self::Halted { .. } => "halted",
            Self::Cancelled => "cancelled",
            Self::DeadlineExceeded => "deadline_exceeded",
        }
    }
}

/// Where the best-first state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Ready,
    Expanding,
    GoalFound,
    Exhausted,
}

/// Outcome of a single [`Searcher::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The popped node was expanded and `children` new nodes were pushed.
    Expanded { node_id: u64, children: usize },
    /// The popped node is a goal. It was not expanded.
    GoalReached { node_id: u64 },
    /// The halt predicate matched the popped node. It was not expanded.
    Halted { node_id: u64 },
    /// Nothing left to pop.
    Exhausted,
}

/// Result of a search execution.
///
/// Check [`SearchResult::is_goal_reached`] or inspect `termination` to
/// determine the outcome. A path is only available for `GoalReached`.
#[derive(Debug)]
pub struct SearchResult<S> {
    pub termination: TerminationReason,
    /// Every node created during search, indexed by `node_id`.
    pub nodes: NodeArena<S>,
    pub stats: SearchStats,
    pub trace: ExpansionTrace,
}

impl<S: Clone> SearchResult<S> {
    /// Returns `true` if the search terminated because a goal was reached.
    #[must_use]
    pub fn is_goal_reached(&self) -> bool {
        matches!(self.termination, TerminationReason::GoalReached { .. })
    }

    #[must_use]
    pub fn goal_node_id(&self) -> Option<u64> {
        match self.termination {
            TerminationReason::GoalReached { node_id } => Some(node_id),
            _ => None,
        }
    }

    /// States from the root to the goal, inclusive.
    #[must_use]
    pub fn path(&self) -> Option<Vec<S>> {
        self.goal_node_id()
            .and_then(|id| self.nodes.path_states(id).ok())
    }

    /// Number of transitions on the goal path.
    #[must_use]
    pub fn move_count(&self) -> Option<u32> {
        self.goal_node_id()
            .and_then(|id| self.nodes.get(id))
            .map(|n| n.depth)
    }
}

/// Steppable best-first engine for one search invocation.
///
/// Owns its arena, frontier and history; nothing is shared between searchers.
pub struct Searcher<'a, W: SearchWorld, M> {
    world: &'a W,
    metric: &'a M,
    policy: &'a SearchPolicy,
    nodes: NodeArena<W::State>,
    frontier: BestFirstFrontier,
    visited: VisitedSet<W::State>,
    stats: SearchStats,
    trace: ExpansionTrace,
    phase: SearchPhase,
    started: Instant,
    cancel: Option<CancelToken>,
}

impl<'a, W, M> Searcher<'a, W, M>
where
    W: SearchWorld,
    M: Metric<W::State>,
{
    /// Validate the policy and push the root.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] if the policy fails validation.
    pub fn new(
        root: W::State,
        world: &'a W,
        metric: &'a M,
        policy: &'a SearchPolicy,
    ) -> Result<Self, SearchError> {
        Self::with_history(root, VisitedSet::new(), world, metric, policy)
    }

    /// Like [`Searcher::new`], continuing from a history produced by an
    /// earlier invocation (see [`Searcher::into_history`]).
    ///
    /// The root is always pushed, even if its identity is already recorded.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] if the policy fails validation.
    pub fn with_history(
        root: W::State,
        history: VisitedSet<W::State>,
        world: &'a W,
        metric: &'a M,
        policy: &'a SearchPolicy,
    ) -> Result<Self, SearchError> {
        policy.validate()?;

        let mut visited = history;
        let mut nodes = NodeArena::new();
        let root_metric = metric.metric(&root, 0);
        visited.queue(&root, 0);
        let root_id = nodes.alloc(None, root, 0, root_metric);

        let mut frontier = BestFirstFrontier::new();
        frontier.push(
            FrontierKey {
                metric: root_metric,
                seq: root_id,
            },
            root_id,
        );

        Ok(Self {
            world,
            metric,
            policy,
            nodes,
            frontier,
            visited,
            stats: SearchStats::default(),
            trace: ExpansionTrace::new(),
            phase: SearchPhase::Ready,
            started: Instant::now(),
            cancel: None,
        })
    }

    /// Observe `token` between pops.
    #[must_use]
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    #[must_use]
    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    #[must_use]
    pub fn nodes(&self) -> &NodeArena<W::State> {
        &self.nodes
    }

    #[must_use]
    pub fn visited(&self) -> &VisitedSet<W::State> {
        &self.visited
    }

    #[must_use]
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Snapshot of the counters so far.
    #[must_use]
    pub fn stats(&self) -> SearchStats {
        SearchStats {
            states_seen: self.visited.len() as u64,
            frontier_high_water: self.frontier.high_water(),
            ..self.stats.clone()
        }
    }

    #[must_use]
    pub fn trace(&self) -> &ExpansionTrace {
        &self.trace
    }

    /// States from the root to `node_id`, inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UnknownNode`] if `node_id` is not in this search.
    pub fn path_to(&self, node_id: u64) -> Result<Vec<W::State>, SearchError> {
        self.nodes.path_states(node_id)
    }

    /// Pop one entry and process it.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidState`] or [`SearchError::WorldPanicked`]
    /// if the world breaks its contract.
    pub fn step(&mut self) -> Result<Step, SearchError> {
        self.step_with(&mut |_| false)
    }

    /// Run until a goal is popped, the frontier empties, or a budget,
    /// deadline or cancellation stops the loop.
    ///
    /// # Errors
    ///
    /// See [`Searcher::step`].
    pub fn run(&mut self) -> Result<TerminationReason, SearchError> {
        self.run_until(|_| false)
    }

    /// Like [`Searcher::run`], also stopping with
    /// [`TerminationReason::Halted`] when `halt` matches a popped node. The
    /// halt test runs before the goal test.
    ///
    /// # Errors
    ///
    /// See [`Searcher::step`].
    pub fn run_until<P>(&mut self, mut halt: P) -> Result<TerminationReason, SearchError>
    where
        P: FnMut(&SearchNode<W::State>) -> bool,
    {
        loop {
            if let Some(reason) = self.interruption() {
                log::warn!(
                    "search in {} stopped: {} after {} expansions",
                    self.world.world_id(),
                    reason.as_str(),
                    self.stats.expansions
                );
                return Ok(reason);
            }

            match self.step_with(&mut halt)? {
                Step::Expanded { .. } => {}
                Step::GoalReached { node_id } => {
                    log::info!(
                        "search in {} reached goal node {node_id} after {} expansions",
                        self.world.world_id(),
                        self.stats.expansions
                    );
                    return Ok(TerminationReason::GoalReached { node_id });
                }
                Step::Halted { node_id } => {
                    return Ok(TerminationReason::Halted { node_id });
                }
                Step::Exhausted => {
                    log::info!(
                        "search in {} exhausted the frontier after {} expansions",
                        self.world.world_id(),
                        self.stats.expansions
                    );
                    return Ok(TerminationReason::FrontierExhausted);
                }
            }
        }
    }

    /// Give up ownership of the history so a later invocation can continue
    /// from it.
    #[must_use]
    pub fn into_history(self) -> VisitedSet<W::State> {
        let mut history = self.visited;
        history.settle_all();
        history
    }

    /// Package the search into a [`SearchResult`].
    #[must_use]
    pub fn finish(self, termination: TerminationReason) -> SearchResult<W::State> {
        let stats = self.stats();
        SearchResult {
            termination,
            nodes: self.nodes,
            stats,
            trace: self.trace,
        }
    }

    fn interruption(&self) -> Option<TerminationReason> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Some(TerminationReason::Cancelled);
        }
        if self
            .policy
            .time_budget
            .is_some_and(|budget| self.started.elapsed() >= budget)
        {
            return Some(TerminationReason::DeadlineExceeded);
        }
        if !self.frontier.is_empty() && self.stats.expansions >= self.policy.max_expansions {
            return Some(TerminationReason::ExpansionBudgetExceeded);
        }
        None
    }

    fn step_with(
        &mut self,
        halt: &mut dyn FnMut(&SearchNode<W::State>) -> bool,
    ) -> Result<Step, SearchError> {
        let world = self.world;
        let (key, node_id) = loop {
            let Some((key, node_id)) = self.frontier.pop() else {
                self.phase = SearchPhase::Exhausted;
                return Ok(Step::Exhausted);
            };
            let node = self.nodes.node(node_id)?;
            if self.visited.settle(&node.state, node_id) {
                break (key, node_id);
            }
            log::trace!("skip replaced node={node_id}");
        };
        self.phase = SearchPhase::Expanding;

        let node = self.nodes.node(node_id)?;
        log::trace!(
            "pop node={node_id} metric={} depth={} frontier={}",
            key.metric,
            node.depth,
            self.frontier.len()
        );

        if halt(node) {
            return Ok(Step::Halted { node_id });
        }

        let is_goal = catch_unwind(AssertUnwindSafe(|| world.is_goal(&node.state))).map_err(
            |_| SearchError::WorldPanicked {
                world_id: world.world_id().to_string(),
                stage: PanicStage::IsGoal,
                node_id,
            },
        )?;
        if is_goal {
            self.phase = SearchPhase::GoalFound;
            return Ok(Step::GoalReached { node_id });
        }

        let depth = node.depth;
        let visited = &self.visited;
        let expanded = catch_unwind(AssertUnwindSafe(|| world.expand(&node.state, visited)));
        let children = match expanded {
            Ok(Ok(children)) => children,
            Ok(Err(WorldError::InvalidState { detail })) => {
                return Err(SearchError::InvalidState {
                    world_id: world.world_id().to_string(),
                    node_id,
                    detail,
                });
            }
            Err(_) => {
                return Err(SearchError::WorldPanicked {
                    world_id: world.world_id().to_string(),
                    stage: PanicStage::Expand,
                    node_id,
                });
            }
        };

        self.stats.expansions += 1;
        self.stats.candidates_generated += children.len() as u64;
        self.trace.record(node_id);

        let child_depth = depth + 1;
        let mut created = 0usize;
        for child in children {
            if child_depth > self.policy.max_depth {
                self.stats.depth_limited += 1;
                continue;
            }
            // Also guards worlds that ignore the exclusion.
            let admitted = match self.visited.admission(&child) {
                Admission::New => true,
                Admission::Queued(queued) => {
                    let shorter = self.nodes.node(queued)?.depth > child_depth;
                    if shorter {
                        self.stats.paths_improved += 1;
                    }
                    shorter
                }
                Admission::Settled => false,
            };
            if !admitted {
                self.stats.duplicates_suppressed += 1;
                continue;
            }
            let metric = self.metric.metric(&child, child_depth);
            self.visited.queue(&child, self.nodes.len() as u64);
            let child_id = self.nodes.alloc(Some(node_id), child, child_depth, metric);
            self.frontier.push(
                FrontierKey {
                    metric,
                    seq: child_id,
                },
                child_id,
            );
            created += 1;
        }

        if created == 0 {
            self.stats.dead_ends += 1;
        } else {
            self.stats.max_depth = self.stats.max_depth.max(child_depth);
        }

        Ok(Step::Expanded {
            node_id,
            children: created,
        })
    }
}

/// Run best-first search from `root` to completion.
///
/// Goal, exhaustion, budget and cancellation terminations all return
/// `Ok(SearchResult)`; check `termination`.
///
/// # Errors
///
/// Returns [`SearchError::InvalidPolicy`] for pre-flight validation failures
/// and [`SearchError::InvalidState`] / [`SearchError::WorldPanicked`] when the
/// world breaks its contract. No partial path is returned with an error.
pub fn search<W, M>(
    root: W::State,
    world: &W,
    metric: &M,
    policy: &SearchPolicy,
) -> Result<SearchResult<W::State>, SearchError>
where
    W: SearchWorld,
    M: Metric<W::State>,
{
    let mut searcher = Searcher::new(root, world, metric, policy)?;
    let termination = searcher.run()?;
    Ok(searcher.finish(termination))
}

/// Result of [`find_longest_path`].
#[derive(Debug, Clone)]
pub struct LongestPath<S> {
    /// Longest goal path seen (root to goal, inclusive), if any goal was
    /// reachable. Ties keep the first one found.
    pub path: Option<Vec<S>>,
    /// Number of goal nodes popped over all invocations.
    pub goals_reached: u64,
    /// What ended the last invocation. `FrontierExhausted` is the normal end.
    pub termination: TerminationReason,
    pub stats: SearchStats,
}

impl<S> LongestPath<S> {
    /// Move count of the longest path.
    #[must_use]
    pub fn move_count(&self) -> Option<usize> {
        self.path.as_ref().map(|p| p.len() - 1)
    }
}

/// Find goals repeatedly without resetting frontier or history, keeping the
/// longest goal path, until the frontier is exhausted.
///
/// Goal nodes are never expanded, so this only terminates for worlds where
/// non-goal expansion eventually dries up.
///
/// # Errors
///
/// See [`search`].
pub fn find_longest_path<W, M>(
    root: W::State,
    world: &W,
    metric: &M,
    policy: &SearchPolicy,
) -> Result<LongestPath<W::State>, SearchError>
where
    W: SearchWorld,
    M: Metric<W::State>,
{
    let mut searcher = Searcher::new(root, world, metric, policy)?;
    let mut longest: Option<(u32, u64)> = None;
    let mut goals_reached = 0u64;

    let termination = loop {
        match searcher.run()? {
            TerminationReason::GoalReached { node_id } => {
                goals_reached += 1;
                let depth = searcher.nodes().node(node_id)?.depth;
                if longest.is_none_or(|(best, _)| depth > best) {
                    longest = Some((depth, node_id));
                }
            }
            other => break other,
        }
    };

    log::info!(
        "longest path search in {} ended ({}): {goals_reached} goals, longest {:?}",
        world.world_id(),
        termination.as_str(),
        longest.map(|(depth, _)| depth)
    );

    let path = longest
        .map(|(_, node_id)| searcher.path_to(node_id))
        .transpose()?;

    Ok(LongestPath {
        path,
        goals_reached,
        termination,
        stats: searcher.stats(),
    })
}
