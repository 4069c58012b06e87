//! Waymark Puzzles: five grid and state-space puzzles solved with
//! `waymark_search`.
//!
//! Each world owns its parser, its transition rules and its renderer; the
//! engine only sees [`waymark_search::contract::SearchWorld`]. The
//! [`runner`] dispatches raw puzzle text to the right world and collects the
//! answers.
//!
//! | Puzzle | World | Engine |
//! |---|---|---|
//! | generators and chips | [`worlds::elevator`] | layered, or best-first with a floor heuristic |
//! | favourite-number office | [`worlds::cubicle_maze`] | A* / Dijkstra, halted Dijkstra for reachability |
//! | hash-gated vault | [`worlds::vault_doors`] | A*, longest path by exhaustion |
//! | storage nodes | [`worlds::storage_grid`] | A* with a scaled data-distance heuristic |
//! | air ducts | [`worlds::duct_maze`] | Dijkstra / A* over position and waypoint mask |

#![forbid(unsafe_code)]

pub mod contract;
pub mod runner;
pub mod worlds;
