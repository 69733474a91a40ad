use std::ops::Range;

use itertools::Itertools;

use crate::io::error::{RisqError, Result};
use crate::model::State;

/// Contiguous run of adjacent cells with an assigned state each
///
/// Adjacency is undirected on a homogeneous lattice, so a two-cell pattern and
/// its reverse describe the same event; [`Pattern::canonical`] sorts them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pattern(Vec<State>);

impl Pattern {
    /// Create a pattern from cell states
    ///
    /// # Errors
    ///
    /// Returns [`RisqError::UnsupportedPattern`] for an empty pattern.
    pub fn new(states: Vec<State>) -> Result<Self> {
        if states.is_empty() {
            return Err(RisqError::UnsupportedPattern { length: 0 });
        }
        Ok(Self(states))
    }

    /// Single cell pattern
    pub fn single(state: State) -> Self {
        Self(vec![state])
    }

    /// Two adjacent cells
    pub fn pair(first: State, second: State) -> Self {
        Self(vec![first, second])
    }

    /// Number of cells in the pattern
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; patterns hold at least one cell
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Cell states in order
    pub fn states(&self) -> &[State] {
        &self.0
    }

    /// Sorted form of a two-cell pattern; other lengths are returned unchanged
    #[must_use]
    pub fn canonical(mut self) -> Self {
        if let [first, second] = self.0.as_mut_slice() {
            if second < first {
                std::mem::swap(first, second);
            }
        }
        self
    }

    /// Consecutive `(left, right)` cell pairs
    pub fn adjacent_pairs(&self) -> impl Iterator<Item = (State, State)> + '_ {
        self.0.iter().copied().tuple_windows()
    }

    /// Cells other than the two ends
    pub fn interior(&self) -> &[State] {
        let end = self.0.len().saturating_sub(1);
        self.0.get(1..end).unwrap_or(&[])
    }
}

/// All patterns `(end, m_1, ..., m_gap, end)` with every middle assignment
///
/// Summing their probabilities gives the probability that two cells `gap + 1`
/// steps apart along a line are both in `end`.
pub fn bridges(end: State, gap: usize, states: Range<State>) -> Vec<Pattern> {
    if gap == 0 {
        return vec![Pattern::pair(end, end)];
    }

    (0..gap)
        .map(|_| states.clone())
        .multi_cartesian_product()
        .map(|middle| {
            let mut cells = Vec::with_capacity(gap + 2);
            cells.push(end);
            cells.extend(middle);
            cells.push(end);
            Pattern(cells)
        })
        .collect()
}
