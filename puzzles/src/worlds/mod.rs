//! Puzzle worlds built on the search engine.

pub mod cubicle_maze;
pub mod duct_maze;
pub mod elevator;
pub mod storage_grid;
pub mod vault_doors;
