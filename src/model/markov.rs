//! Matrix-backed transition model with construction-time validation

use ndarray::Array2;

use crate::io::configuration::STOCHASTIC_TOLERANCE;
use crate::io::error::{Result, invalid_model};
use crate::model::transition::{State, Time, TransitionModel};

/// Raw inputs for a [`MarkovModel`]
#[derive(Clone, Debug)]
pub struct ModelParameters {
    /// Number of states a cell can be in
    pub num_states: usize,
    /// Number of neighbors of a single cell
    pub num_neighbors: usize,
    /// `probs_internal[[new, old]]`: probability a cell in `old` becomes `new`
    pub probs_internal: Array2<f64>,
    /// `probs_spread[[attacker, target]]`: probability `attacker` overgrows `target`
    pub probs_spread: Array2<f64>,
    /// Optional display labels, one per state
    pub labels: Option<Vec<String>>,
    /// Optional RGBA colors, one per state
    pub colors: Option<Vec<[u8; 4]>>,
}

/// Stationary transition model described by two square matrices
///
/// Columns of the internal matrix are probability distributions, so each
/// column sums to one. The spread matrix has no such constraint.
#[derive(Clone, Debug)]
pub struct MarkovModel {
    num_states: usize,
    num_neighbors: usize,
    probs_internal: Array2<f64>,
    probs_spread: Array2<f64>,
    labels: Vec<String>,
    colors: Option<Vec<[u8; 4]>>,
}

impl MarkovModel {
    /// Build and validate a model
    ///
    /// # Errors
    ///
    /// Returns [`crate::RisqError::InvalidModel`] if:
    /// - `num_states` or `num_neighbors` is zero
    /// - Either matrix is not `num_states x num_states`
    /// - A matrix entry lies outside [0, 1]
    /// - A column of the internal matrix does not sum to 1
    /// - Labels or colors do not have one entry per state
    pub fn new(parameters: ModelParameters) -> Result<Self> {
        let ModelParameters {
            num_states,
            num_neighbors,
            probs_internal,
            probs_spread,
            labels,
            colors,
        } = parameters;

        let labels = labels.unwrap_or_else(|| (0..num_states).map(|i| i.to_string()).collect());

        let model = Self {
            num_states,
            num_neighbors,
            probs_internal,
            probs_spread,
            labels,
            colors,
        };
        model.validate()?;
        Ok(model)
    }

    /// Internal transition matrix
    pub const fn probs_internal(&self) -> &Array2<f64> {
        &self.probs_internal
    }

    /// Spread matrix
    pub const fn probs_spread(&self) -> &Array2<f64> {
        &self.probs_spread
    }

    fn validate(&self) -> Result<()> {
        let n = self.num_states;
        if n == 0 {
            return Err(invalid_model(&"model needs at least one state"));
        }
        if self.num_neighbors == 0 {
            return Err(invalid_model(&"cells need at least one neighbor"));
        }

        for (name, matrix) in [
            ("probs_internal", &self.probs_internal),
            ("probs_spread", &self.probs_spread),
        ] {
            if matrix.dim() != (n, n) {
                return Err(invalid_model(&format!(
                    "`{name}` is expected to be a {n} x {n} matrix (got {} x {})",
                    matrix.nrows(),
                    matrix.ncols()
                )));
            }
            if let Some(((row, col), value)) = matrix
                .indexed_iter()
                .find(|(_, value)| !(0.0..=1.0).contains(*value))
            {
                return Err(invalid_model(&format!(
                    "`{name}` entry ({row}, {col}) = {value} is not a probability"
                )));
            }
        }

        // Markov chain condition: every column is a distribution over new states
        for (i, column) in self.probs_internal.columns().into_iter().enumerate() {
            let sum: f64 = column.sum();
            if (sum - 1.0).abs() >= STOCHASTIC_TOLERANCE {
                return Err(invalid_model(&format!(
                    "Column {} of `probs_internal` should add up to 1.0 (adds up to {sum})",
                    i + 1
                )));
            }
        }

        if self.labels.len() != n {
            return Err(invalid_model(&format!(
                "Number of labels does not match number of states ({} != {n})",
                self.labels.len()
            )));
        }

        if let Some(colors) = &self.colors {
            if colors.len() != n {
                return Err(invalid_model(&format!(
                    "Number of colors does not match number of states ({} != {n})",
                    colors.len()
                )));
            }
        }

        Ok(())
    }
}

impl TransitionModel for MarkovModel {
    fn num_states(&self) -> usize {
        self.num_states
    }

    fn num_neighbors(&self) -> usize {
        self.num_neighbors
    }

    fn prob_internal(&self, _time: Time, new: State, old: State) -> f64 {
        self.probs_internal.get((new, old)).copied().unwrap_or(0.0)
    }

    fn prob_spread(&self, _time: Time, attacker: State, target: State) -> f64 {
        self.probs_spread
            .get((attacker, target))
            .copied()
            .unwrap_or(0.0)
    }

    fn labels(&self) -> Vec<String> {
        self.labels.clone()
    }

    fn colors(&self) -> Option<Vec<[u8; 4]>> {
        self.colors.clone()
    }
}
