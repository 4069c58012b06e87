//! `StorageGrid`: move the data in the top-right node to the top-left node.
//!
//! Input is `df -h` style output for a grid of storage nodes. A node's whole
//! payload can move to an adjacent node that has room for it. When exactly
//! one node is empty and no two non-empty payloads fit together, the puzzle
//! is a sliding-block puzzle: the only moves shift the empty node around, so
//! the canonical identity of a state is `(data position, empty position)`.

use std::hash::{Hash, Hasher};

use waymark_search::contract::{SearchWorld, WorldError};
use waymark_search::metric::{AStar, Dijkstra, Heuristic};
use waymark_search::policy::SearchPolicy;
use waymark_search::search::search;
use waymark_search::visited::Exclusion;

use crate::contract::{solution_from, MetricChoice, PuzzleError, Solution};

pub type Cell = (usize, usize);

pub const TARGET: Cell = (0, 0);

/// The empty node moves by `(dx, dy)`; its payload source is the opposite
/// neighbour.
const DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridNode {
    pub x: usize,
    pub y: usize,
    pub size: u32,
    pub used: u32,
    pub avail: u32,
}

/// Parse `df` output. The command line and the `Filesystem` header are
/// skipped.
///
/// # Errors
///
/// Returns [`PuzzleError::Parse`] for any other line that is not a
/// `/dev/grid/node-xN-yM` row.
pub fn parse_df(input: &str) -> Result<Vec<GridNode>, PuzzleError> {
    let mut nodes = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with("root@") || line.starts_with("Filesystem") {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [name, size, used, avail, ..] = fields[..] else {
            return Err(PuzzleError::parse(line_no, "expected name, size, used, avail"));
        };
        let (x, y) = name
            .strip_prefix("/dev/grid/node-x")
            .and_then(|rest| rest.split_once("-y"))
            .ok_or_else(|| PuzzleError::parse(line_no, format!("bad node name {name:?}")))?;

        let number = |text: &str| -> Result<u32, PuzzleError> {
            text.trim_end_matches('T')
                .parse()
                .map_err(|e| PuzzleError::parse(line_no, format!("{text:?}: {e}")))
        };
        let coord = |text: &str| -> Result<usize, PuzzleError> {
            text.parse()
                .map_err(|e| PuzzleError::parse(line_no, format!("{text:?}: {e}")))
        };
        nodes.push(GridNode {
            x: coord(x)?,
            y: coord(y)?,
            size: number(size)?,
            used: number(used)?,
            avail: number(avail)?,
        });
    }
    Ok(nodes)
}

/// Ordered pairs `(a, b)`, `a != b`, where `a` is non-empty and its payload
/// fits in `b`'s free space.
#[must_use]
pub fn count_viable_pairs(nodes: &[GridNode]) -> usize {
    let mut avail: Vec<u32> = nodes.iter().map(|n| n.avail).collect();
    avail.sort_unstable();

    nodes
        .iter()
        .filter(|a| a.used > 0)
        .map(|a| {
            let fits = avail.len() - avail.partition_point(|&free| free < a.used);
            // `a` cannot pair with itself.
            if a.avail >= a.used {
                fits - 1
            } else {
                fits
            }
        })
        .sum()
}

/// Exactly one empty node, and the roomiest non-empty node cannot take the
/// smallest non-empty payload.
#[must_use]
pub fn is_sliding_block_like(nodes: &[GridNode]) -> bool {
    let empty = nodes.iter().filter(|n| n.used == 0).count();
    let smallest_payload = nodes.iter().filter(|n| n.used > 0).map(|n| n.used).min();
    let roomiest = nodes.iter().filter(|n| n.used > 0).map(|n| n.avail).max();
    match (smallest_payload, roomiest) {
        (Some(payload), Some(room)) => empty == 1 && room < payload,
        _ => false,
    }
}

/// Dense grid assembled from parsed nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageGrid {
    width: usize,
    height: usize,
    used: Vec<u32>,
    avail: Vec<u32>,
}

impl StorageGrid {
    /// # Errors
    ///
    /// Returns [`PuzzleError::Invalid`] for an empty list, a node listed
    /// twice, or a hole in the grid.
    pub fn from_nodes(nodes: &[GridNode]) -> Result<Self, PuzzleError> {
        let max_x = nodes.iter().map(|n| n.x).max().ok_or_else(|| PuzzleError::invalid("no nodes"))?;
        let max_y = nodes.iter().map(|n| n.y).max().unwrap_or(0);
        // A dense grid lists exactly one node per cell.
        let (width, height) = match (max_x.checked_add(1), max_y.checked_add(1)) {
            (Some(w), Some(h)) if w.checked_mul(h) == Some(nodes.len()) => (w, h),
            _ => {
                return Err(PuzzleError::invalid(format!(
                    "{} nodes cannot fill a grid reaching x{max_x}-y{max_y}",
                    nodes.len()
                )))
            }
        };

        let mut slots: Vec<Option<(u32, u32)>> = vec![None; width * height];
        for node in nodes {
            let slot = &mut slots[node.y * width + node.x];
            if slot.replace((node.used, node.avail)).is_some() {
                return Err(PuzzleError::invalid(format!("node x{}-y{} listed twice", node.x, node.y)));
            }
        }

        let mut used = Vec::with_capacity(slots.len());
        let mut avail = Vec::with_capacity(slots.len());
        for (i, slot) in slots.into_iter().enumerate() {
            let (u, a) = slot.ok_or_else(|| {
                PuzzleError::invalid(format!("node x{}-y{} missing", i % width, i / width))
            })?;
            used.push(u);
            avail.push(a);
        }

        Ok(Self {
            width,
            height,
            used,
            avail,
        })
    }

    /// # Errors
    ///
    /// See [`StorageGrid::from_nodes`] and [`parse_df`].
    pub fn parse(input: &str) -> Result<Self, PuzzleError> {
        Self::from_nodes(&parse_df(input)?)
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Data in the top-right node; the empty slot is the first empty node in
    /// row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::Invalid`] if no node is empty.
    pub fn initial_state(&self) -> Result<GridState, PuzzleError> {
        let zero = self
            .used
            .iter()
            .position(|&u| u == 0)
            .map(|i| (i % self.width, i / self.width))
            .ok_or_else(|| PuzzleError::invalid("no empty node"))?;
        Ok(GridState {
            data: (self.width - 1, 0),
            zero,
            width: self.width,
            used: self.used.clone(),
            avail: self.avail.clone(),
        })
    }
}

/// One arrangement of payloads. Equality and hashing only look at `data` and
/// `zero`.
#[derive(Debug, Clone)]
pub struct GridState {
    pub data: Cell,
    pub zero: Cell,
    width: usize,
    used: Vec<u32>,
    avail: Vec<u32>,
}

impl PartialEq for GridState {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data && self.zero == other.zero
    }
}

impl Eq for GridState {}

impl Hash for GridState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.hash(state);
        self.zero.hash(state);
    }
}

impl GridState {
    fn index(&self, (x, y): Cell) -> usize {
        y * self.width + x
    }

    #[must_use]
    pub fn used_at(&self, cell: Cell) -> u32 {
        self.used[self.index(cell)]
    }

    #[must_use]
    pub fn avail_at(&self, cell: Cell) -> u32 {
        self.avail[self.index(cell)]
    }

    /// `G` for the data, `_` for empty, `#` for payloads too large for the
    /// empty node, `.` otherwise.
    #[must_use]
    pub fn render(&self) -> Vec<String> {
        let room = self.avail_at(self.zero);
        self.used
            .chunks(self.width)
            .enumerate()
            .map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .map(|(x, &used)| {
                        if (x, y) == self.data {
                            'G'
                        } else if used == 0 {
                            '_'
                        } else if used > room {
                            '#'
                        } else {
                            '.'
                        }
                    })
                    .collect::<String>()
            })
            .collect()
    }

    /// Move the payload at `source` into the empty node.
    fn shift_into_zero(&self, source: Cell) -> Self {
        let mut next = self.clone();
        let (from, to) = (self.index(source), self.index(self.zero));
        let payload = next.used[from];
        next.used[to] += payload;
        next.avail[to] -= payload;
        next.used[from] = 0;
        next.avail[from] = next.avail[from].saturating_add(payload);
        if next.data == source {
            next.data = self.zero;
        }
        next.zero = source;
        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageWorld {
    width: usize,
    height: usize,
}

impl StorageWorld {
    #[must_use]
    pub fn new(grid: &StorageGrid) -> Self {
        Self {
            width: grid.width,
            height: grid.height,
        }
    }
}

impl SearchWorld for StorageWorld {
    type State = GridState;

    fn world_id(&self) -> &str {
        "storage_grid"
    }

    fn expand(&self, state: &GridState, exclusion: &dyn Exclusion<GridState>) -> Result<Vec<GridState>, WorldError> {
        if state.used_at(state.zero) != 0 {
            return Err(WorldError::InvalidState {
                detail: format!(
                    "empty slot {:?} holds {}T",
                    state.zero,
                    state.used_at(state.zero)
                ),
            });
        }

        let (zx, zy) = state.zero;
        let mut next = Vec::new();
        for (dx, dy) in DIRECTIONS {
            let (Some(sx), Some(sy)) = (zx.checked_add_signed(-dx), zy.checked_add_signed(-dy)) else {
                continue;
            };
            if sx >= self.width || sy >= self.height {
                continue;
            }
            if state.avail_at(state.zero) < state.used_at((sx, sy)) {
                continue;
            }
            let moved = state.shift_into_zero((sx, sy));
            if !exclusion.excludes(&moved) {
                next.push(moved);
            }
        }
        Ok(next)
    }

    fn is_goal(&self, state: &GridState) -> bool {
        state.data == TARGET
    }
}

/// `factor × |data − target| + |data − empty|`.
///
/// Each step of the data towards the target costs the data move plus
/// bringing the empty node back in front of it. `factor` is a tuning knob,
/// not a proven bound; check it against [`Dijkstra`] before trusting it on a
/// new layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlidingDataHeuristic {
    factor: i64,
}

impl SlidingDataHeuristic {
    /// # Errors
    ///
    /// Returns [`PuzzleError::Invalid`] for a negative `factor`.
    pub fn new(factor: i64) -> Result<Self, PuzzleError> {
        if factor < 0 {
            return Err(PuzzleError::invalid(format!(
                "storage heuristic factor {factor} out of range"
            )));
        }
        Ok(Self { factor })
    }

    #[must_use]
    pub fn factor(&self) -> i64 {
        self.factor
    }
}

impl Default for SlidingDataHeuristic {
    fn default() -> Self {
        Self { factor: 3 }
    }
}

fn distance(a: Cell, b: Cell) -> i64 {
    i64::try_from(a.0.abs_diff(b.0) + a.1.abs_diff(b.1)).unwrap_or(i64::MAX)
}

impl Heuristic<GridState> for SlidingDataHeuristic {
    fn estimate(&self, state: &GridState) -> i64 {
        distance(state.data, TARGET)
            .saturating_mul(self.factor)
            .saturating_add(distance(state.data, state.zero))
    }
}

/// Fewest moves to bring the data to [`TARGET`].
///
/// # Errors
///
/// Returns [`PuzzleError::Invalid`] for a grid without an empty node,
/// [`PuzzleError::Search`] for a corrupt state and
/// [`PuzzleError::NoSolution`] if the data cannot be moved.
pub fn solve(
    grid: &StorageGrid,
    metric: MetricChoice,
    heuristic: SlidingDataHeuristic,
    policy: &SearchPolicy,
) -> Result<Solution<GridState>, PuzzleError> {
    let world = StorageWorld::new(grid);
    let root = grid.initial_state()?;
    let result = match metric {
        MetricChoice::Dijkstra => search(root, &world, &Dijkstra, policy)?,
        MetricChoice::AStar => search(root, &world, &AStar::new(heuristic), policy)?,
    };
    solution_from("storage_grid", &result)
}
