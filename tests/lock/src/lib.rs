//! Shared inputs and helpers for the lock tests and the fixture binary.

pub mod fixtures;
pub mod grid_world;
