//! `Elevator`: generators and microchips carried between four floors.
//!
//! Each element contributes one generator and one compatible chip. The
//! elevator carries one or two items per move, one floor up or down. A floor
//! is unsafe when it holds a chip without its generator while some other
//! generator is present; moves that leave either touched floor unsafe are
//! omitted. The goal is every item on the top floor.
//!
//! Items are bitmasks per floor, so a state is a handful of integers and its
//! derived `Eq + Hash` is the canonical identity.

use waymark_search::contract::{SearchWorld, WorldError};
use waymark_search::layered::search_layered;
use waymark_search::metric::{AStar, Dijkstra, Heuristic};
use waymark_search::policy::SearchPolicy;
use waymark_search::search::search;
use waymark_search::visited::Exclusion;

use crate::contract::{solution_from, MetricChoice, PuzzleError, Solution};

pub const FLOORS: usize = 4;
pub const MAX_ELEMENTS: usize = 16;

const TOP: usize = FLOORS - 1;
const FLOOR_NAMES: [&str; FLOORS] = ["first", "second", "third", "fourth"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElevatorState {
    /// Floor index of the elevator, `0..FLOORS`.
    pub elevator: u8,
    /// Generator bitmask per floor; bit `i` is element `i`.
    pub generators: [u16; FLOORS],
    /// Chip bitmask per floor.
    pub chips: [u16; FLOORS],
}

impl ElevatorState {
    fn floor_is_safe(generators: u16, chips: u16) -> bool {
        generators == 0 || chips & !generators == 0
    }

    #[must_use]
    pub fn is_safe(&self) -> bool {
        (0..FLOORS).all(|f| Self::floor_is_safe(self.generators[f], self.chips[f]))
    }

    /// Sum over all items of the floors still to climb.
    #[must_use]
    pub fn floor_distance_sum(&self) -> i64 {
        (0..FLOORS)
            .map(|f| {
                let items = self.generators[f].count_ones() + self.chips[f].count_ones();
                (TOP - f) as i64 * i64::from(items)
            })
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Item {
    Generator(u16),
    Chip(u16),
}

/// Parsed starting arrangement plus the element names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElevatorLayout {
    elements: Vec<String>,
    initial: ElevatorState,
}

impl ElevatorLayout {
    /// Parse the "The first floor contains a hydrogen generator and a
    /// lithium-compatible microchip." form, one line per floor.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::Parse`] for malformed lines and
    /// [`PuzzleError::Invalid`] when an element lacks its generator or chip.
    pub fn parse(input: &str) -> Result<Self, PuzzleError> {
        let mut elements: Vec<String> = Vec::new();
        let mut initial = ElevatorState {
            elevator: 0,
            generators: [0; FLOORS],
            chips: [0; FLOORS],
        };
        let mut seen_floors = [false; FLOORS];

        for (index, line) in input.lines().enumerate() {
            let line_no = index + 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let words: Vec<String> = line
                .split_whitespace()
                .map(|w| w.trim_matches(|c| c == ',' || c == '.').to_ascii_lowercase())
                .collect();

            let floor_at = words
                .iter()
                .position(|w| w == "floor")
                .filter(|&p| p > 0)
                .ok_or_else(|| PuzzleError::parse(line_no, "expected \"<ordinal> floor\""))?;
            let floor = FLOOR_NAMES
                .iter()
                .position(|name| *name == words[floor_at - 1])
                .ok_or_else(|| {
                    PuzzleError::parse(line_no, format!("unknown floor {:?}", words[floor_at - 1]))
                })?;
            if std::mem::replace(&mut seen_floors[floor], true) {
                return Err(PuzzleError::parse(line_no, format!("{} floor listed twice", FLOOR_NAMES[floor])));
            }
            let contains_at = words
                .iter()
                .position(|w| w == "contains")
                .ok_or_else(|| PuzzleError::parse(line_no, "expected \"contains\""))?;

            let contents = &words[contains_at + 1..];
            for (i, word) in contents.iter().enumerate() {
                let is_generator = word == "generator";
                if !is_generator && word != "microchip" {
                    continue;
                }
                let Some(prev) = i.checked_sub(1).map(|p| &contents[p]) else {
                    return Err(PuzzleError::parse(line_no, format!("{word} without an element")));
                };
                let name = prev.strip_suffix("-compatible").unwrap_or(prev.as_str());
                let bit = element_bit(&mut elements, name)
                    .ok_or_else(|| PuzzleError::invalid(format!("more than {MAX_ELEMENTS} elements")))?;

                let masks = if is_generator {
                    &mut initial.generators
                } else {
                    &mut initial.chips
                };
                if masks.iter().any(|m| m & bit != 0) {
                    return Err(PuzzleError::parse(line_no, format!("{name} {word} listed twice")));
                }
                masks[floor] |= bit;
            }
        }

        let layout = Self { elements, initial };
        layout.check_pairs()?;
        Ok(layout)
    }

    /// Add a generator and chip for `element` on the ground floor.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::Invalid`] if the element already exists or the
    /// element limit is reached.
    pub fn with_pair_on_ground(mut self, element: &str) -> Result<Self, PuzzleError> {
        let name = element.to_ascii_lowercase();
        if self.elements.contains(&name) {
            return Err(PuzzleError::invalid(format!("element {name} already present")));
        }
        let bit = element_bit(&mut self.elements, &name)
            .ok_or_else(|| PuzzleError::invalid(format!("more than {MAX_ELEMENTS} elements")))?;
        self.initial.generators[0] |= bit;
        self.initial.chips[0] |= bit;
        Ok(self)
    }

    #[must_use]
    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    #[must_use]
    pub fn initial_state(&self) -> ElevatorState {
        self.initial
    }

    fn all_mask(&self) -> u16 {
        ((1u32 << self.elements.len()) - 1) as u16
    }

    fn check_pairs(&self) -> Result<(), PuzzleError> {
        let generators = self.initial.generators.iter().fold(0, |acc, m| acc | m);
        let chips = self.initial.chips.iter().fold(0, |acc, m| acc | m);
        for (i, name) in self.elements.iter().enumerate() {
            let bit = 1u16 << i;
            if generators & bit == 0 {
                return Err(PuzzleError::invalid(format!("{name} has no generator")));
            }
            if chips & bit == 0 {
                return Err(PuzzleError::invalid(format!("{name} has no microchip")));
            }
        }
        Ok(())
    }

    /// Floors top-down in the usual diagram form (`F1 E  HG HM .  .`).
    #[must_use]
    pub fn render(&self, state: &ElevatorState) -> Vec<String> {
        (0..FLOORS)
            .rev()
            .map(|f| {
                let elevator = if usize::from(state.elevator) == f { "E " } else { ". " };
                let mut cells = vec![elevator.to_string()];
                for (i, name) in self.elements.iter().enumerate() {
                    let bit = 1u16 << i;
                    let initial = name.chars().next().map_or('?', |c| c.to_ascii_uppercase());
                    for (mask, suffix) in [(state.generators[f], 'G'), (state.chips[f], 'M')] {
                        cells.push(if mask & bit == 0 {
                            ". ".to_string()
                        } else {
                            format!("{initial}{suffix}")
                        });
                    }
                }
                format!("F{} {}", f + 1, cells.join(" ")).trim_end().to_string()
            })
            .collect()
    }
}

fn element_bit(elements: &mut Vec<String>, name: &str) -> Option<u16> {
    let index = match elements.iter().position(|e| e == name) {
        Some(i) => i,
        None if elements.len() < MAX_ELEMENTS => {
            elements.push(name.to_string());
            elements.len() - 1
        }
        None => return None,
    };
    Some(1u16 << index)
}

/// Search world over [`ElevatorState`].
#[derive(Debug, Clone)]
pub struct ElevatorWorld {
    element_count: usize,
    all_mask: u16,
}

impl ElevatorWorld {
    #[must_use]
    pub fn new(layout: &ElevatorLayout) -> Self {
        Self {
            element_count: layout.elements.len(),
            all_mask: layout.all_mask(),
        }
    }

    fn items_on(&self, state: &ElevatorState, floor: usize) -> Vec<Item> {
        let mut items = Vec::new();
        for i in 0..self.element_count {
            let bit = 1u16 << i;
            if state.generators[floor] & bit != 0 {
                items.push(Item::Generator(bit));
            }
            if state.chips[floor] & bit != 0 {
                items.push(Item::Chip(bit));
            }
        }
        items
    }
}

fn carry(state: &ElevatorState, from: usize, to: usize, load: &[Item]) -> ElevatorState {
    let mut next = *state;
    for item in load {
        let (masks, bit) = match *item {
            Item::Generator(bit) => (&mut next.generators, bit),
            Item::Chip(bit) => (&mut next.chips, bit),
        };
        masks[from] &= !bit;
        masks[to] |= bit;
    }
    next.elevator = to as u8;
    next
}

impl SearchWorld for ElevatorWorld {
    type State = ElevatorState;

    fn world_id(&self) -> &str {
        "elevator"
    }

    fn expand(
        &self,
        state: &ElevatorState,
        exclusion: &dyn Exclusion<ElevatorState>,
    ) -> Result<Vec<ElevatorState>, WorldError> {
        let from = usize::from(state.elevator);
        if from >= FLOORS {
            return Err(WorldError::InvalidState {
                detail: format!("elevator on floor {from}"),
            });
        }
        let items = self.items_on(state, from);

        let mut loads: Vec<Vec<Item>> = items.iter().map(|&item| vec![item]).collect();
        for (i, &first) in items.iter().enumerate() {
            for &second in &items[i + 1..] {
                loads.push(vec![first, second]);
            }
        }

        let mut next = Vec::new();
        let targets = [from.checked_add(1).filter(|&t| t < FLOORS), from.checked_sub(1)];
        for to in targets.into_iter().flatten() {
            for load in &loads {
                let moved = carry(state, from, to, load);
                let safe = ElevatorState::floor_is_safe(moved.generators[from], moved.chips[from])
                    && ElevatorState::floor_is_safe(moved.generators[to], moved.chips[to]);
                if safe && !exclusion.excludes(&moved) {
                    next.push(moved);
                }
            }
        }
        Ok(next)
    }

    fn is_goal(&self, state: &ElevatorState) -> bool {
        state.generators[TOP] == self.all_mask && state.chips[TOP] == self.all_mask
    }
}

/// Floor-distance sum scaled by `numerator / denominator`.
///
/// A move carries at most two items one floor, so the default ½ never
/// overestimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElevatorHeuristic {
    numerator: i64,
    denominator: i64,
}

impl ElevatorHeuristic {
    /// # Errors
    ///
    /// Returns [`PuzzleError::Invalid`] unless `numerator >= 0` and
    /// `denominator > 0`.
    pub fn new(numerator: i64, denominator: i64) -> Result<Self, PuzzleError> {
        if numerator < 0 || denominator <= 0 {
            return Err(PuzzleError::invalid(format!(
                "elevator heuristic weight {numerator}/{denominator} out of range"
            )));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }
}

impl Default for ElevatorHeuristic {
    fn default() -> Self {
        Self {
            numerator: 1,
            denominator: 2,
        }
    }
}

impl Heuristic<ElevatorState> for ElevatorHeuristic {
    fn estimate(&self, state: &ElevatorState) -> i64 {
        state.floor_distance_sum() * self.numerator / self.denominator
    }
}

/// Minimum-move solution.
///
/// `metric = None` sweeps layers (sequentially or on a worker pool, per
/// `policy.scheduler`); `Some(..)` runs best-first.
///
/// # Errors
///
/// Returns [`PuzzleError::NoSolution`] if the search stops without a goal
/// and [`PuzzleError::Search`] if it aborts.
pub fn solve(
    layout: &ElevatorLayout,
    metric: Option<MetricChoice>,
    heuristic: ElevatorHeuristic,
    policy: &SearchPolicy,
) -> Result<Solution<ElevatorState>, PuzzleError> {
    let world = ElevatorWorld::new(layout);
    let root = layout.initial_state();
    if !root.is_safe() {
        return Err(PuzzleError::invalid("starting arrangement already fries a chip"));
    }
    let result = match metric {
        None => search_layered(root, &world, policy)?,
        Some(MetricChoice::Dijkstra) => search(root, &world, &Dijkstra, policy)?,
        Some(MetricChoice::AStar) => search(root, &world, &AStar::new(heuristic), policy)?,
    };
    solution_from("elevator", &result)
}
