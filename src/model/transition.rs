//! Read-only contract between transition models and estimation methods

use std::ops::Range;

/// Index into the ordered set of cell states
pub type State = usize;

/// Discrete time step; step `t` is the transition from `t - 1` to `t`
pub type Time = usize;

/// Per-step transition probabilities of a homogeneous cellular process
///
/// Implementations must be pure: every call with the same arguments returns the
/// same value. Matrices may depend on time, estimators never assume stationarity.
pub trait TransitionModel {
    /// Number of states a cell can be in
    fn num_states(&self) -> usize;

    /// Number of neighbors of a single cell (4 on a square lattice)
    fn num_neighbors(&self) -> usize;

    /// Probability that a cell in `old` changes to `new` during the step ending at `time`
    fn prob_internal(&self, time: Time, new: State, old: State) -> f64;

    /// Probability that `attacker` overgrows an adjacent `target` during the step ending at `time`
    fn prob_spread(&self, time: Time, attacker: State, target: State) -> f64;

    /// All states in order
    fn states(&self) -> Range<State> {
        0..self.num_states()
    }

    /// The last state in order, computed as a complement by the closure engines
    fn last_state(&self) -> State {
        self.num_states().saturating_sub(1)
    }

    /// State every cell starts in
    fn initial_state(&self) -> State {
        0
    }

    /// Joint probability that adjacent cells hold `pattern` at time 0
    fn prob_initial(&self, pattern: &[State]) -> f64 {
        let initial = self.initial_state();
        if pattern.iter().all(|&state| state == initial) {
            1.0
        } else {
            0.0
        }
    }

    /// Human-readable state labels
    fn labels(&self) -> Vec<String> {
        self.states().map(|state| state.to_string()).collect()
    }

    /// RGBA colors per state, if the model defines them
    fn colors(&self) -> Option<Vec<[u8; 4]>> {
        None
    }
}

impl<M: TransitionModel + ?Sized> TransitionModel for &M {
    fn num_states(&self) -> usize {
        (**self).num_states()
    }

    fn num_neighbors(&self) -> usize {
        (**self).num_neighbors()
    }

    fn prob_internal(&self, time: Time, new: State, old: State) -> f64 {
        (**self).prob_internal(time, new, old)
    }

    fn prob_spread(&self, time: Time, attacker: State, target: State) -> f64 {
        (**self).prob_spread(time, attacker, target)
    }

    fn initial_state(&self) -> State {
        (**self).initial_state()
    }

    fn prob_initial(&self, pattern: &[State]) -> f64 {
        (**self).prob_initial(pattern)
    }

    fn labels(&self) -> Vec<String> {
        (**self).labels()
    }

    fn colors(&self) -> Option<Vec<[u8; 4]>> {
        (**self).colors()
    }
}
