//! Frontier ordering metrics.
//!
//! A metric maps `(state, path_len)` to an integer; lower pops first. A
//! non-admissible heuristic never crashes the engine, it only yields a longer
//! path. That is caught by comparing against the [`Dijkstra`] baseline (see
//! [`crate::diagnostics`]), not by runtime assertion.

/// Ordering metric for the best-first frontier.
pub trait Metric<S> {
    /// Metric of `state` reached after `path_len` transitions.
    fn metric(&self, state: &S, path_len: u32) -> i64;
}

/// Remaining-distance estimate used by [`AStar`].
///
/// Must never exceed the true remaining cost for the first goal popped to be
/// optimal.
pub trait Heuristic<S> {
    /// Lower-bound estimate of transitions still needed from `state`.
    fn estimate(&self, state: &S) -> i64;
}

impl<S, F> Heuristic<S> for F
where
    F: Fn(&S) -> i64,
{
    fn estimate(&self, state: &S) -> i64 {
        self(state)
    }
}

/// `metric = path_len`. Always admissible.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dijkstra;

impl<S> Metric<S> for Dijkstra {
    fn metric(&self, _state: &S, path_len: u32) -> i64 {
        i64::from(path_len)
    }
}

/// `metric = path_len + heuristic(state)`.
#[derive(Debug, Clone, Copy)]
pub struct AStar<H> {
    pub heuristic: H,
}

impl<H> AStar<H> {
    #[must_use]
    pub fn new(heuristic: H) -> Self {
        Self { heuristic }
    }
}

impl<S, H: Heuristic<S>> Metric<S> for AStar<H> {
    fn metric(&self, state: &S, path_len: u32) -> i64 {
        i64::from(path_len).saturating_add(self.heuristic.estimate(state))
    }
}

/// Metric backed by a closure `Fn(&S, u32) -> i64`.
#[derive(Debug, Clone, Copy)]
pub struct FnMetric<F>(pub F);

impl<S, F> Metric<S> for FnMetric<F>
where
    F: Fn(&S, u32) -> i64,
{
    fn metric(&self, state: &S, path_len: u32) -> i64 {
        (self.0)(state, path_len)
    }
}

impl<S, M: Metric<S> + ?Sized> Metric<S> for &M {
    fn metric(&self, state: &S, path_len: u32) -> i64 {
        (**self).metric(state, path_len)
    }
}

impl<S, M: Metric<S> + ?Sized> Metric<S> for Box<M> {
    fn metric(&self, state: &S, path_len: u32) -> i64 {
        (**self).metric(state, path_len)
    }
}

/// Manhattan distance between two grid points.
#[must_use]
pub fn manhattan(a: (i64, i64), b: (i64, i64)) -> i64 {
    let d = a.0.abs_diff(b.0).saturating_add(a.1.abs_diff(b.1));
    i64::try_from(d).unwrap_or(i64::MAX)
}
