//! Pair-correlation closure over adjacent cells
//!
//! Single cells and adjacent pairs are computed exactly in terms of each other,
//! one time layer at a time. Longer patterns are approximated by factorizing
//! them into pair and singleton marginals, which discards every correlation
//! beyond nearest neighbors.

use ndarray::{Array1, Array2};

use crate::closure::cache::{CacheStats, PatternCache, PatternKey, TimeTable};
use crate::closure::method::{Method, check_state};
use crate::closure::pattern::Pattern;
use crate::closure::variance::pair_correlation_variance;
use crate::io::configuration::VARIANCE_ORDER;
use crate::io::error::{RisqError, Result, computation_error, invalid_parameter};
use crate::math::probability::{checked_probability, raw_probability};
use crate::model::{State, Time, TransitionModel};

/// Probabilities known at a single time step
///
/// Singletons are checked against the unit interval when computed; pairs and
/// overgrowth stay raw and are checked only when handed out.
#[derive(Debug, Clone)]
struct PairLayer {
    singles: Array1<f64>,
    /// Symmetric; filled from the canonical (sorted) pair
    pairs: Array2<f64>,
    /// Probability of being overgrown by one specific random neighbor during
    /// the step ending at this layer's time; zero for unreachable states
    overgrown: Array1<f64>,
}

impl PairLayer {
    fn single(&self, x: State) -> f64 {
        self.singles.get(x).copied().unwrap_or(0.0)
    }

    fn pair(&self, x: State, y: State) -> f64 {
        self.pairs.get((x.min(y), x.max(y))).copied().unwrap_or(0.0)
    }

    fn overgrown(&self, x: State) -> f64 {
        self.overgrown.get(x).copied().unwrap_or(0.0)
    }

    fn set_pair(&mut self, x: State, y: State, value: f64) {
        if let Some(entry) = self.pairs.get_mut((x, y)) {
            *entry = value;
        }
        if let Some(entry) = self.pairs.get_mut((y, x)) {
            *entry = value;
        }
    }
}

/// Pair-correlation estimator of per-state cell fractions and variances
pub struct PairCorrelation<M> {
    model: M,
    table: TimeTable<PairLayer>,
    long_patterns: PatternCache,
    variance_order: usize,
}

impl<M: TransitionModel> PairCorrelation<M> {
    /// Create an engine bound to `model` with the default variance order
    pub fn new(model: M) -> Self {
        Self::with_variance_order(model, VARIANCE_ORDER)
    }

    /// Create an engine summing `variance_order` neighbor shells in [`Method::variance`]
    pub fn with_variance_order(model: M, variance_order: usize) -> Self {
        Self {
            model,
            table: TimeTable::new(),
            long_patterns: PatternCache::new(),
            variance_order,
        }
    }

    /// The model this engine evaluates
    pub const fn model(&self) -> &M {
        &self.model
    }

    /// Hit/miss statistics of the factorized pattern memo
    pub const fn cache_stats(&self) -> CacheStats {
        self.long_patterns.stats
    }

    /// Joint probability that adjacent cells hold `pattern` at `time`
    ///
    /// Exact (within the closure) for one and two cells; see
    /// [`Self::factorized_probability`] for longer patterns.
    ///
    /// # Errors
    ///
    /// Returns an error for states outside the model or inconsistent probabilities.
    pub fn pattern_probability(&mut self, time: Time, pattern: &Pattern) -> Result<f64> {
        for &state in pattern.states() {
            check_state(&self.model, state)?;
        }

        match *pattern.states() {
            [] => Err(RisqError::UnsupportedPattern { length: 0 }),
            [x] => self.layer(time).map(|layer| layer.single(x)),
            [x, y] => {
                let p = self.layer(time)?.pair(x, y);
                checked_probability(p, "pair probability", time)
            }
            _ => self.factorized_probability(time, pattern),
        }
    }

    /// APPROXIMATION for patterns of three or more cells
    ///
    /// `P(a, b, c, ...) = P(a, b) P(b, c) ... / (P(b) ...)`: product of all
    /// adjacent pair probabilities divided by the interior singleton
    /// probabilities. A zero interior singleton makes the whole pattern
    /// unreachable and yields 0.
    ///
    /// # Errors
    ///
    /// Returns an error for patterns shorter than three cells or inconsistent
    /// probabilities.
    pub fn factorized_probability(&mut self, time: Time, pattern: &Pattern) -> Result<f64> {
        if pattern.len() < 3 {
            return Err(RisqError::UnsupportedPattern {
                length: pattern.len(),
            });
        }

        self.ensure_time(time)?;
        let Self {
            table,
            long_patterns,
            ..
        } = self;
        let layer = table
            .get(time)
            .ok_or_else(|| computation_error("factorized probability", &"missing time layer"))?;

        long_patterns.get_or_try_compute(PatternKey::new(time, pattern.clone()), || {
            let numerator: f64 = pattern
                .adjacent_pairs()
                .map(|(u, v)| layer.pair(u, v))
                .product();
            let denominator: f64 = pattern.interior().iter().map(|&u| layer.single(u)).product();

            if denominator > 0.0 {
                checked_probability(numerator / denominator, "factorized probability", time)
            } else {
                Ok(0.0)
            }
        })
    }

    /// Probability that a cell in `state` at `time - 1` is overgrown by one
    /// specific random neighbor by `time`
    ///
    /// # Errors
    ///
    /// Returns an error if `time` is 0, the state is unknown, or a probability
    /// is inconsistent.
    pub fn probability_overgrown(&mut self, time: Time, state: State) -> Result<f64> {
        check_state(&self.model, state)?;
        if time == 0 {
            return Err(invalid_parameter(
                "time",
                &time,
                &"overgrowth is defined for steps ending at time 1 or later",
            ));
        }
        let p = self.layer(time)?.overgrown(state);
        checked_probability(p, "overgrowth probability", time)
    }

    fn layer(&mut self, time: Time) -> Result<&PairLayer> {
        self.ensure_time(time)?;
        self.table
            .get(time)
            .ok_or_else(|| computation_error("pair probability", &"missing time layer"))
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
            tracing::debug!(from, to = time, "extended pair-correlation table");
        }
        Ok(())
    }

    fn initial_layer(&self) -> Result<PairLayer> {
        let n = self.model.num_states();
        let mut layer = PairLayer {
            singles: Array1::zeros(n),
            pairs: Array2::zeros((n, n)),
            overgrown: Array1::zeros(n),
        };

        for x in self.model.states() {
            let p = checked_probability(self.model.prob_initial(&[x]), "initial state", 0)?;
            if let Some(entry) = layer.singles.get_mut(x) {
                *entry = p;
            }
            for y in x..n {
                let p = checked_probability(self.model.prob_initial(&[x, y]), "initial pair", 0)?;
                layer.set_pair(x, y, p);
            }
        }

        Ok(layer)
    }

    fn next_layer(&self, time: Time, previous: &PairLayer) -> Result<PairLayer> {
        let n = self.model.num_states();
        let last = self.model.last_state();

        let mut layer = PairLayer {
            singles: Array1::zeros(n),
            pairs: Array2::zeros((n, n)),
            overgrown: self.overgrown_layer(time, previous),
        };

        for x in self.model.states().filter(|&x| x != last) {
            let p = self.single_probability(time, x, previous, &layer.overgrown);
            if let Some(entry) = layer.singles.get_mut(x) {
                *entry = checked_probability(p, "single cell probability", time)?;
            }
        }
        let rest: f64 = layer.singles.sum();
        if let Some(entry) = layer.singles.get_mut(last) {
            *entry = checked_probability(1.0 - rest, "single cell complement", time)?;
        }

        for x in self.model.states().filter(|&x| x != last) {
            for y in (x..n).filter(|&y| y != last) {
                let p = self.pair_probability(time, (x, y), previous, &layer.overgrown);
                layer.set_pair(x, y, raw_probability(p, "pair probability", time));
            }
        }

        // Pairs containing the last state as complements of the row sums.
        // (last, last) depends on every (u, last) and comes after them.
        for x in self.model.states() {
            let rest: f64 = self
                .model
                .states()
                .filter(|&u| u != last)
                .map(|u| layer.pair(x, u))
                .sum();
            let p = raw_probability(layer.single(x) - rest, "pair complement", time);
            layer.set_pair(x, last, p);
        }

        Ok(layer)
    }

    fn overgrown_layer(&self, time: Time, previous: &PairLayer) -> Array1<f64> {
        let model = &self.model;
        model
            .states()
            .map(|y| {
                let p_y = previous.single(y);
                if p_y == 0.0 {
                    return 0.0;
                }
                let p_not_overgrown: f64 = model
                    .states()
                    .map(|z| previous.pair(z, y) / p_y * (1.0 - model.prob_spread(time, z, y)))
                    .sum();
                raw_probability(1.0 - p_not_overgrown, "overgrowth probability", time)
            })
            .collect()
    }

    fn single_probability(
        &self,
        time: Time,
        x: State,
        previous: &PairLayer,
        overgrown: &Array1<f64>,
    ) -> f64 {
        let model = &self.model;
        let neighbors = model.num_neighbors() as i32;

        let mut p = 0.0;
        for y in model.states() {
            let p_y = previous.single(y);
            if p_y == 0.0 {
                continue;
            }

            // Y is overgrown by some neighboring X, conditioned on Y
            let p_xy = previous.pair(x, y);
            let p_overgrown_by_x =
                1.0 - (1.0 - p_xy / p_y * model.prob_spread(time, x, y)).powi(neighbors);
            p += p_y * p_overgrown_by_x;

            let p_overgrown = overgrown.get(y).copied().unwrap_or(0.0);
            let p_not_overgrown_at_all = (1.0 - p_overgrown).powi(neighbors);
            p += p_y * p_not_overgrown_at_all * model.prob_internal(time, x, y);
        }
        p
    }

    fn pair_probability(
        &self,
        time: Time,
        (x, y): (State, State),
        previous: &PairLayer,
        overgrown: &Array1<f64>,
    ) -> f64 {
        let model = &self.model;
        // One neighbor of each cell is the other cell of the pair
        let others = model.num_neighbors() as i32 - 1;
        let not_overgrown = |state: State| 1.0 - overgrown.get(state).copied().unwrap_or(0.0);

        let mut p = 0.0;
        for z in model.states() {
            let p_z = previous.single(z);
            if p_z == 0.0 {
                continue;
            }
            for w in model.states() {
                let p_w = previous.single(w);
                if p_w == 0.0 {
                    continue;
                }
                let p_zw = previous.pair(z, w);

                // Z is overgrown by some X among its other neighbors or by W itself
                let spread_xz = model.prob_spread(time, x, z);
                let p_z_by_x = 1.0
                    - (1.0 - previous.pair(x, z) / p_z * spread_xz).powi(others)
                        * if w == x { 1.0 - spread_xz } else { 1.0 };
                let p_z_kept = not_overgrown(z).powi(others) * (1.0 - model.prob_spread(time, w, z));

                // Same for W with Y as attacker
                let spread_yw = model.prob_spread(time, y, w);
                let p_w_by_y = 1.0
                    - (1.0 - previous.pair(y, w) / p_w * spread_yw).powi(others)
                        * if z == y { 1.0 - spread_yw } else { 1.0 };
                let p_w_kept = not_overgrown(w).powi(others) * (1.0 - model.prob_spread(time, z, w));

                p += p_zw
                    * (p_z_by_x + p_z_kept * model.prob_internal(time, x, z))
                    * (p_w_by_y + p_w_kept * model.prob_internal(time, y, w));
            }
        }
        p
    }
}

impl<M: TransitionModel> Method for PairCorrelation<M> {
    fn probability(&mut self, time: Time, state: State) -> Result<f64> {
        self.pattern_probability(time, &Pattern::single(state))
    }

    fn variance(&mut self, time: Time, state: State) -> Result<f64> {
        let p = self.probability(time, state)?;
        let num_states = self.model.num_states();
        let num_neighbors = self.model.num_neighbors();
        let order = self.variance_order;
        pair_correlation_variance(p, state, num_states, num_neighbors, order, |pattern| {
            self.pattern_probability(time, pattern)
        })
    }

    fn name(&self) -> &'static str {
        "Neighboring cells"
    }
}
