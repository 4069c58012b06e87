//! Bounded 4-connected grid used by the property and determinism tests.
//!
//! The start cell `(0, 0)` and the goal cell are always open. A plain
//! breadth-first walk over the same grid serves as the reference answer.

use std::collections::{HashMap, HashSet, VecDeque};

use waymark_search::contract::{SearchWorld, WorldError};
use waymark_search::visited::Exclusion;

pub type Cell = (i64, i64);

pub const START: Cell = (0, 0);

const STEPS: [(i64, i64); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

#[derive(Debug, Clone)]
pub struct GridWorld {
    width: i64,
    height: i64,
    walls: HashSet<Cell>,
    goal: Option<Cell>,
}

impl GridWorld {
    /// `mask[y * width + x]` marks a wall; missing entries are open.
    #[must_use]
    pub fn from_mask(width: i64, height: i64, mask: &[bool]) -> Self {
        let mut walls = HashSet::new();
        for y in 0..height {
            for x in 0..width {
                let index = usize::try_from(y * width + x).unwrap_or(usize::MAX);
                if mask.get(index).copied().unwrap_or(false) {
                    walls.insert((x, y));
                }
            }
        }
        walls.remove(&START);
        Self {
            width,
            height,
            walls,
            goal: None,
        }
    }

    #[must_use]
    pub fn open(width: i64, height: i64) -> Self {
        Self::from_mask(width, height, &[])
    }

    /// 12x12 grid with a fixed scatter of walls, goal in the far corner
    /// 22 moves away.
    #[must_use]
    pub fn pinned() -> Self {
        let mask: Vec<bool> = (0..144u32).map(|i| (i * i * 13 + i * 37) % 17 < 5).collect();
        Self::from_mask(12, 12, &mask).with_goal((11, 11))
    }

    #[must_use]
    pub fn with_goal(mut self, goal: Cell) -> Self {
        self.walls.remove(&goal);
        self.goal = Some(goal);
        self
    }

    #[must_use]
    pub fn goal(&self) -> Option<Cell> {
        self.goal
    }

    #[must_use]
    pub fn is_open(&self, (x, y): Cell) -> bool {
        (0..self.width).contains(&x) && (0..self.height).contains(&y) && !self.walls.contains(&(x, y))
    }

    #[must_use]
    pub fn neighbors(&self, (x, y): Cell) -> Vec<Cell> {
        STEPS
            .iter()
            .map(|(dx, dy)| (x + dx, y + dy))
            .filter(|&c| self.is_open(c))
            .collect()
    }

    /// Breadth-first distances from `from` to every reachable cell.
    #[must_use]
    pub fn distances(&self, from: Cell) -> HashMap<Cell, u32> {
        let mut dist = HashMap::from([(from, 0u32)]);
        let mut queue = VecDeque::from([from]);
        while let Some(cell) = queue.pop_front() {
            let d = dist[&cell];
            for next in self.neighbors(cell) {
                dist.entry(next).or_insert_with(|| {
                    queue.push_back(next);
                    d + 1
                });
            }
        }
        dist
    }
}

impl SearchWorld for GridWorld {
    type State = Cell;

    fn world_id(&self) -> &str {
        "grid_world"
    }

    fn expand(&self, state: &Cell, exclusion: &dyn Exclusion<Cell>) -> Result<Vec<Cell>, WorldError> {
        if !self.is_open(*state) {
            return Err(WorldError::InvalidState {
                detail: format!("{state:?} is not an open cell"),
            });
        }
        Ok(self
            .neighbors(*state)
            .into_iter()
            .filter(|c| !exclusion.excludes(c))
            .collect())
    }

    fn is_goal(&self, state: &Cell) -> bool {
        self.goal == Some(*state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_and_goal_are_forced_open() {
        let world = GridWorld::from_mask(2, 2, &[true, true, true, true]).with_goal((1, 1));
        assert!(world.is_open(START));
        assert!(world.is_open((1, 1)));
        assert!(!world.is_open((1, 0)));
        assert!(world.distances(START).get(&(1, 1)).is_none());
    }

    #[test]
    fn open_grid_distances_are_manhattan() {
        let world = GridWorld::open(4, 3);
        let dist = world.distances(START);
        assert_eq!(dist.len(), 12);
        assert_eq!(dist[&(3, 2)], 5);
    }

    #[test]
    fn pinned_grid_goal_is_reachable() {
        let world = GridWorld::pinned();
        assert_eq!(world.distances(START)[&(11, 11)], 22);
    }
}
