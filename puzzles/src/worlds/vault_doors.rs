//! `VaultDoors`: a 4x4 room grid whose doors depend on the route taken.
//!
//! From room `(x, y)` reached by route `path`, the doors up, down, left and
//! right are open iff the first four hex characters of
//! `md5(passcode + path)` are in `b..=f`, in that order. The vault is the
//! bottom-right room. Because the route is part of the state no two states
//! ever collide, so the history never suppresses anything here.

use md5::{Digest, Md5};

use waymark_search::contract::{SearchWorld, WorldError};
use waymark_search::metric::{AStar, Dijkstra, Metric};
use waymark_search::policy::SearchPolicy;
use waymark_search::search::{find_longest_path, search};
use waymark_search::transcript::SearchStats;
use waymark_search::visited::Exclusion;

use crate::contract::{solution_from, MetricChoice, PuzzleError};

pub const SIZE: u8 = 4;
pub const VAULT: (u8, u8) = (SIZE - 1, SIZE - 1);

/// Direction letter, dx, dy; in hash character order.
const DOORS: [(char, i8, i8); 4] = [('U', 0, -1), ('D', 0, 1), ('L', -1, 0), ('R', 1, 0)];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VaultState {
    pub pos: (u8, u8),
    /// Route so far as `U`/`D`/`L`/`R` letters.
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultDoors {
    passcode: String,
}

impl VaultDoors {
    pub fn new(passcode: impl Into<String>) -> Self {
        Self {
            passcode: passcode.into(),
        }
    }

    /// The puzzle input is the passcode on a single line.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::Parse`] for an empty or non-ASCII passcode.
    pub fn parse(input: &str) -> Result<Self, PuzzleError> {
        let passcode = input.trim();
        if passcode.is_empty() || !passcode.is_ascii() {
            return Err(PuzzleError::parse(1, format!("bad passcode {passcode:?}")));
        }
        Ok(Self::new(passcode))
    }

    #[must_use]
    pub fn start(&self) -> VaultState {
        VaultState {
            pos: (0, 0),
            path: String::new(),
        }
    }

    /// Open flags for up, down, left, right after walking `path`. Walls of
    /// the grid are not considered.
    #[must_use]
    pub fn open_doors(&self, path: &str) -> [bool; 4] {
        let mut hasher = Md5::new();
        hasher.update(self.passcode.as_bytes());
        hasher.update(path.as_bytes());
        let hex = hex::encode(&hasher.finalize()[..2]);

        let mut open = [false; 4];
        for (flag, c) in open.iter_mut().zip(hex.chars()) {
            *flag = matches!(c, 'b'..='f');
        }
        open
    }

    fn metric(choice: MetricChoice) -> Box<dyn Metric<VaultState>> {
        match choice {
            MetricChoice::Dijkstra => Box::new(Dijkstra),
            MetricChoice::AStar => Box::new(AStar::new(|s: &VaultState| {
                i64::from(VAULT.0 - s.pos.0) + i64::from(VAULT.1 - s.pos.1)
            })),
        }
    }

    /// Shortest route to the vault as a letter string.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::NoSolution`] if every route dead-ends.
    pub fn shortest_path(&self, metric: MetricChoice, policy: &SearchPolicy) -> Result<String, PuzzleError> {
        let result = search(self.start(), self, &Self::metric(metric), policy)?;
        let solution = solution_from("vault_doors", &result)?;
        Ok(solution.path.last().map(|s| s.path.clone()).unwrap_or_default())
    }

    /// Length of the longest route that ends in the vault.
    ///
    /// Keeps popping goals from the same search until no route can be
    /// extended any more.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::NoSolution`] if no route reaches the vault.
    pub fn longest_path(&self, metric: MetricChoice, policy: &SearchPolicy) -> Result<LongestRoute, PuzzleError> {
        let longest = find_longest_path(self.start(), self, &Self::metric(metric), policy)?;
        let route = longest
            .path
            .as_ref()
            .and_then(|p| p.last())
            .map(|s| s.path.clone())
            .ok_or(PuzzleError::NoSolution {
                puzzle: "vault_doors",
                termination: longest.termination.as_str(),
            })?;
        Ok(LongestRoute {
            route,
            goals_reached: longest.goals_reached,
            stats: longest.stats,
        })
    }
}

#[derive(Debug, Clone)]
pub struct LongestRoute {
    pub route: String,
    /// Distinct vault arrivals seen along the way.
    pub goals_reached: u64,
    pub stats: SearchStats,
}

impl SearchWorld for VaultDoors {
    type State = VaultState;

    fn world_id(&self) -> &str {
        "vault_doors"
    }

    fn expand(&self, state: &VaultState, exclusion: &dyn Exclusion<VaultState>) -> Result<Vec<VaultState>, WorldError> {
        let open = self.open_doors(&state.path);
        let (x, y) = state.pos;
        let mut next = Vec::new();
        for (&(letter, dx, dy), is_open) in DOORS.iter().zip(open) {
            if !is_open {
                continue;
            }
            let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy)) else {
                continue;
            };
            if nx >= SIZE || ny >= SIZE {
                continue;
            }
            let mut path = String::with_capacity(state.path.len() + 1);
            path.push_str(&state.path);
            path.push(letter);
            let child = VaultState { pos: (nx, ny), path };
            if !exclusion.excludes(&child) {
                next.push(child);
            }
        }
        Ok(next)
    }

    fn is_goal(&self, state: &VaultState) -> bool {
        state.pos == VAULT
    }
}
