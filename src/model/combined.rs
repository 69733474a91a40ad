//! Time-switched composition of two transition models

use crate::io::error::{Result, invalid_model};
use crate::model::transition::{State, Time, TransitionModel};

/// Uses `special` at the times selected by a predicate and `default` otherwise
///
/// Topology constants, labels and colors come from the default model.
pub struct CombinedModel<D, S, F> {
    default: D,
    special: S,
    special_condition: F,
}

impl<D, S, F> CombinedModel<D, S, F>
where
    D: TransitionModel,
    S: TransitionModel,
    F: Fn(Time) -> bool,
{
    /// Combine two models with the same topology
    ///
    /// # Errors
    ///
    /// Returns an error if the two models disagree on the number of states or
    /// the number of neighbors.
    pub fn new(default: D, special: S, special_condition: F) -> Result<Self> {
        if default.num_states() != special.num_states() {
            return Err(invalid_model(&format!(
                "Combined models disagree on number of states ({} != {})",
                default.num_states(),
                special.num_states()
            )));
        }
        if default.num_neighbors() != special.num_neighbors() {
            return Err(invalid_model(&format!(
                "Combined models disagree on number of neighbors ({} != {})",
                default.num_neighbors(),
                special.num_neighbors()
            )));
        }

        Ok(Self {
            default,
            special,
            special_condition,
        })
    }

    fn is_special(&self, time: Time) -> bool {
        (self.special_condition)(time)
    }
}

impl<D, S, F> TransitionModel for CombinedModel<D, S, F>
where
    D: TransitionModel,
    S: TransitionModel,
    F: Fn(Time) -> bool,
{
    fn num_states(&self) -> usize {
        self.default.num_states()
    }

    fn num_neighbors(&self) -> usize {
        self.default.num_neighbors()
    }

    fn prob_internal(&self, time: Time, new: State, old: State) -> f64 {
        if self.is_special(time) {
            self.special.prob_internal(time, new, old)
        } else {
            self.default.prob_internal(time, new, old)
        }
    }

    fn prob_spread(&self, time: Time, attacker: State, target: State) -> f64 {
        if self.is_special(time) {
            self.special.prob_spread(time, attacker, target)
        } else {
            self.default.prob_spread(time, attacker, target)
        }
    }

    fn initial_state(&self) -> State {
        if self.is_special(0) {
            self.special.initial_state()
        } else {
            self.default.initial_state()
        }
    }

    fn prob_initial(&self, pattern: &[State]) -> f64 {
        if self.is_special(0) {
            self.special.prob_initial(pattern)
        } else {
            self.default.prob_initial(pattern)
        }
    }

    fn labels(&self) -> Vec<String> {
        self.default.labels()
    }

    fn colors(&self) -> Option<Vec<[u8; 4]>> {
        self.default.colors()
    }
}
