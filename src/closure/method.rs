use crate::closure::mean_field::MeanField;
use crate::closure::pair::PairCorrelation;
use crate::io::error::{RisqError, Result};
use crate::model::{State, Time, TransitionModel};

/// Shared output contract of every estimator of per-state cell fractions
///
/// Closure engines and the Monte Carlo baseline implement it alike so their
/// results can be compared side by side.
pub trait Method {
    /// Probability that a cell is in `state` at `time`
    ///
    /// Equivalently the expected number of cells in `state` divided by the
    /// number of cells.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown states or inconsistent probabilities.
    fn probability(&mut self, time: Time, state: State) -> Result<f64>;

    /// Variance of the number of cells in `state` at `time`, divided by the number of cells
    ///
    /// Variance is additive over independent cells, so this stays of order one
    /// whatever the grid size.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown states or inconsistent probabilities.
    fn variance(&mut self, time: Time, state: State) -> Result<f64>;

    /// Label used in reports
    fn name(&self) -> &'static str;
}

/// Largest pattern computed without factorization
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClosureOrder {
    /// Single cells only
    MeanField,
    /// Single cells and adjacent pairs
    Pair,
}

/// Closure engine chosen at construction
pub enum ClosureEngine<M> {
    /// Order-1 closure
    MeanField(MeanField<M>),
    /// Order-2 closure
    Pair(PairCorrelation<M>),
}

impl<M: TransitionModel> ClosureEngine<M> {
    /// Create an engine of the given order bound to `model`
    pub fn new(order: ClosureOrder, model: M) -> Self {
        match order {
            ClosureOrder::MeanField => Self::MeanField(MeanField::new(model)),
            ClosureOrder::Pair => Self::Pair(PairCorrelation::new(model)),
        }
    }

    /// Closure order of this engine
    pub const fn order(&self) -> ClosureOrder {
        match self {
            Self::MeanField(_) => ClosureOrder::MeanField,
            Self::Pair(_) => ClosureOrder::Pair,
        }
    }
}

impl<M: TransitionModel> Method for ClosureEngine<M> {
    fn probability(&mut self, time: Time, state: State) -> Result<f64> {
        match self {
            Self::MeanField(engine) => engine.probability(time, state),
            Self::Pair(engine) => engine.probability(time, state),
        }
    }

    fn variance(&mut self, time: Time, state: State) -> Result<f64> {
        match self {
            Self::MeanField(engine) => engine.variance(time, state),
            Self::Pair(engine) => engine.variance(time, state),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::MeanField(engine) => engine.name(),
            Self::Pair(engine) => engine.name(),
        }
    }
}

/// Reject states outside the model
///
/// # Errors
///
/// Returns [`RisqError::InvalidState`] if `state >= model.num_states()`.
pub fn check_state<M: TransitionModel>(model: &M, state: State) -> Result<()> {
    if state < model.num_states() {
        Ok(())
    } else {
        Err(RisqError::InvalidState {
            state,
            num_states: model.num_states(),
        })
    }
}
