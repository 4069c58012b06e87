//! Search world contract trait.

use std::fmt;
use std::hash::Hash;

use crate::visited::Exclusion;

/// Failure reported by a world's neighbor generator.
///
/// Illegal transitions (walls, bounds, unsafe configurations) are not errors;
/// the world simply omits them. `InvalidState` is reserved for a state that
/// breaks the world's own structural invariants, which aborts the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    InvalidState { detail: String },
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState { detail } => write!(f, "invalid state: {detail}"),
        }
    }
}

impl std::error::Error for WorldError {}

/// Trait for worlds that support search.
///
/// # Contract
///
/// - `State` equality and hashing define canonical identity. Bookkeeping
///   (depth, predecessor, insertion order) lives in the engine, not in the
///   state.
/// - `expand` returns every state reachable by exactly one legal transition,
///   omitting those for which `exclusion.excludes(..)` is true.
/// - `expand` must be a pure function of `(state, exclusion)`. Output order
///   may vary; the engine's sequence tie-break keeps search order
///   deterministic for a deterministic world.
pub trait SearchWorld {
    /// World snapshot; its `Eq + Hash` is the canonical identity.
    type State: Clone + Eq + Hash;

    /// Unique world identifier used in logs and errors.
    fn world_id(&self) -> &str;

    /// Successors of `state` by one atomic transition.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidState`] if `state` violates a structural
    /// invariant of this world.
    fn expand(
        &self,
        state: &Self::State,
        exclusion: &dyn Exclusion<Self::State>,
    ) -> Result<Vec<Self::State>, WorldError>;

    /// Test whether the given state satisfies the world's goal.
    fn is_goal(&self, state: &Self::State) -> bool;
}

impl<W: SearchWorld + ?Sized> SearchWorld for &W {
    type State = W::State;

    fn world_id(&self) -> &str {
        (**self).world_id()
    }

    fn expand(
        &self,
        state: &Self::State,
        exclusion: &dyn Exclusion<Self::State>,
    ) -> Result<Vec<Self::State>, WorldError> {
        (**self).expand(state, exclusion)
    }

    fn is_goal(&self, state: &Self::State) -> bool {
        (**self).is_goal(state)
    }
}

/// A world assembled from injected closures.
///
/// `neighbors` yields raw successors; exclusion filtering is applied here so
/// the closures stay free of history handling.
pub struct FnWorld<S, N, G> {
    world_id: String,
    neighbors: N,
    goal: G,
    _state: std::marker::PhantomData<fn() -> S>,
}

impl<S, N, G> FnWorld<S, N, G>
where
    S: Clone + Eq + Hash,
    N: Fn(&S) -> Vec<S>,
    G: Fn(&S) -> bool,
{
    pub fn new(world_id: impl Into<String>, neighbors: N, goal: G) -> Self {
        Self {
            world_id: world_id.into(),
            neighbors,
            goal,
            _state: std::marker::PhantomData,
        }
    }
}

impl<S, N, G> SearchWorld for FnWorld<S, N, G>
where
    S: Clone + Eq + Hash,
    N: Fn(&S) -> Vec<S>,
    G: Fn(&S) -> bool,
{
    type State = S;

    fn world_id(&self) -> &str {
        &self.world_id
    }

    fn expand(&self, state: &S, exclusion: &dyn Exclusion<S>) -> Result<Vec<S>, WorldError> {
        let mut next = (self.neighbors)(state);
        next.retain(|s| !exclusion.excludes(s));
        Ok(next)
    }

    fn is_goal(&self, state: &S) -> bool {
        (self.goal)(state)
    }
}
