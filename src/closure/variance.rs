//! Variance of per-state cell counts, normalized per cell

use crate::closure::pattern::{Pattern, bridges};
use crate::io::error::Result;
use crate::model::State;

/// Variance of a single Bernoulli cell
///
/// The whole variance under the mean-field closure, which treats cells as
/// independent.
pub fn binomial_variance(p: f64) -> f64 {
    p - p * p
}

/// Number of lattice sites at graph distance `distance` from a cell
///
/// Holds for the square lattice (`num_neighbors = 4`): the shell at distance
/// `d` has `4 d` sites. Other lattices need their own shell count.
pub const fn shell_size(distance: usize, num_neighbors: usize) -> usize {
    distance * num_neighbors
}

/// Variance including covariances with the first `order` neighbor shells
///
/// `p - p^2 + sum_k shell_size(k + 1) * (q_k - p^2)` where `q_k` is the
/// probability that a cell `k + 1` steps away along a line is in `state` too,
/// summed over every assignment of the `k` cells in between.
///
/// # Errors
///
/// Propagates errors from `pattern_probability`.
pub fn pair_correlation_variance<F>(
    p: f64,
    state: State,
    num_states: usize,
    num_neighbors: usize,
    order: usize,
    mut pattern_probability: F,
) -> Result<f64>
where
    F: FnMut(&Pattern) -> Result<f64>,
{
    let mut variance = binomial_variance(p);

    for k in 0..order {
        let mut q = 0.0;
        for pattern in bridges(state, k, 0..num_states) {
            q += pattern_probability(&pattern)?;
        }
        variance += shell_size(k + 1, num_neighbors) as f64 * (q - p * p);
    }

    Ok(variance)
}
