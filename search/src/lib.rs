//! Waymark Search: deterministic best-first and layered search over implicit
//! graphs.
//!
//! This crate knows nothing about puzzles. Worlds plug in through
//! [`contract::SearchWorld`]; ordering comes from a [`metric::Metric`].
//!
//! # Crate dependency graph
//!
//! ```text
//! waymark_search  ←  waymark_puzzles  ←  lock_tests / benchmarks
//! (engine)           (worlds, runner, CLI)
//! ```
//!
//! # Key types
//!
//! - [`search::Searcher`]: steppable best-first engine
//! - [`layered::search_layered`]: layer-at-a-time engine with optional rayon
//!   worker pool
//! - [`node::NodeArena`]: id-indexed node storage with parent links
//! - [`visited::VisitedSet`]: canonical-identity history
//! - [`policy::SearchPolicy`]: budgets and scheduler choice
//! - [`transcript::ExpansionTrace`]: expansion order, digested for
//!   determinism checks

#![forbid(unsafe_code)]

pub mod cancel;
pub mod contract;
pub mod diagnostics;
pub mod error;
pub mod frontier;
pub mod layered;
pub mod metric;
pub mod node;
pub mod policy;
pub mod search;
pub mod transcript;
pub mod visited;
