//! Single-cell closure: neighbors are drawn independently from the marginal distribution

use ndarray::Array1;

use crate::closure::cache::TimeTable;
use crate::closure::method::{Method, check_state};
use crate::closure::variance::binomial_variance;
use crate::io::error::{Result, computation_error};
use crate::math::probability::checked_probability;
use crate::model::{State, Time, TransitionModel};

/// Mean-field estimator of per-state cell fractions
///
/// Ignores every spatial correlation: a cell's neighbors are assumed to be in
/// state `Z` with the unconditional probability `P(Z)`.
pub struct MeanField<M> {
    model: M,
    table: TimeTable<Array1<f64>>,
}

impl<M: TransitionModel> MeanField<M> {
    /// Create an engine bound to `model` with an empty table
    pub fn new(model: M) -> Self {
        Self {
            model,
            table: TimeTable::new(),
        }
    }

    /// The model this engine evaluates
    pub const fn model(&self) -> &M {
        &self.model
    }

    /// Probability distribution over all states at `time`
    ///
    /// # Errors
    ///
    /// Returns an error if a computed probability is inconsistent.
    pub fn distribution(&mut self, time: Time) -> Result<Array1<f64>> {
        self.ensure_time(time)?;
        self.table
            .get(time)
            .cloned()
            .ok_or_else(|| computation_error("mean-field distribution", &"missing time layer"))
    }

    fn ensure_time(&mut self, time: Time) -> Result<()> {
        let from = self.table.len();
        while self.table.len() <= time {
            let layer = match self.table.latest() {
                None => self.initial_layer()?,
                Some(previous) => self.next_layer(self.table.len(), previous)?,
            };
            self.table.push(layer);
        }
        if self.table.len() > from {
            tracing::debug!(from, to = time, "extended mean-field table");
        }
        Ok(())
    }

    fn initial_layer(&self) -> Result<Array1<f64>> {
        self.model
            .states()
            .map(|x| checked_probability(self.model.prob_initial(&[x]), "initial state", 0))
            .collect::<Result<Vec<_>>>()
            .map(Array1::from_vec)
    }

    fn next_layer(&self, time: Time, previous: &Array1<f64>) -> Result<Array1<f64>> {
        let model = &self.model;
        let neighbors = model.num_neighbors() as i32;
        let last = model.last_state();
        let prob = |state: State| previous.get(state).copied().unwrap_or(0.0);

        let mut layer = Vec::with_capacity(model.num_states());
        for x in model.states().filter(|&x| x != last) {
            let p_x = prob(x);

            let mut p = 0.0;
            for y in model.states() {
                let p_y = prob(y);
                if p_y == 0.0 {
                    continue;
                }

                // Y is overgrown by some neighboring X
                let p_overgrown_by_x =
                    1.0 - (1.0 - p_x * model.prob_spread(time, x, y)).powi(neighbors);
                p += p_y * p_overgrown_by_x;

                // Y keeps its own fate only if no neighbor overgrows it
                let p_not_overgrown: f64 = model
                    .states()
                    .map(|z| prob(z) * (1.0 - model.prob_spread(time, z, y)))
                    .sum();
                let p_not_overgrown_at_all = p_not_overgrown.powi(neighbors);
                p += p_y * p_not_overgrown_at_all * model.prob_internal(time, x, y);
            }

            layer.push(checked_probability(p, "mean-field probability", time)?);
        }

        // Last state as complement keeps the distribution normalized
        let rest: f64 = layer.iter().sum();
        layer.push(checked_probability(1.0 - rest, "mean-field complement", time)?);

        Ok(Array1::from_vec(layer))
    }
}

impl<M: TransitionModel> Method for MeanField<M> {
    fn probability(&mut self, time: Time, state: State) -> Result<f64> {
        check_state(&self.model, state)?;
        self.ensure_time(time)?;
        self.table
            .get(time)
            .and_then(|layer| layer.get(state))
            .copied()
            .ok_or_else(|| computation_error("mean-field probability", &"missing time layer"))
    }

    fn variance(&mut self, time: Time, state: State) -> Result<f64> {
        let p = self.probability(time, state)?;
        Ok(binomial_variance(p))
    }

    fn name(&self) -> &'static str {
        "Single cell"
    }
}
