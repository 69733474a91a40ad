//! Ready-made models for tumour growth studies

use ndarray::{Array2, array};

use crate::io::error::Result;
use crate::model::markov::{MarkovModel, ModelParameters};

/// Neighbors of a cell on a square lattice
const SQUARE_LATTICE_NEIGHBORS: usize = 4;

/// Healthy cells mutate into cancerous ones, which overgrow healthy neighbors
///
/// States are `H` (healthy) and `C` (cancerous). `C` is absorbing.
///
/// # Errors
///
/// Returns an error if either probability lies outside [0, 1].
pub fn two_state(prob_mutate: f64, prob_spread: f64) -> Result<MarkovModel> {
    let p = prob_mutate;
    let q = prob_spread;

    MarkovModel::new(ModelParameters {
        num_states: 2,
        num_neighbors: SQUARE_LATTICE_NEIGHBORS,
        probs_internal: array![
            [1.0 - p, 0.0], // H
            [p, 1.0],       // C
        ],
        probs_spread: array![
            [0.0, 0.0], // H
            [q, 0.0],   // C
        ],
        labels: Some(vec!["H".to_string(), "C".to_string()]),
        colors: Some(vec![[46, 139, 87, 255], [178, 34, 34, 255]]),
    })
}

/// Six intermediate mutation stages between healthy and cancerous cells
///
/// States are `H, S1..S6, C, D`. Each stage mutates forward with `prob_mutate`
/// and dies with `prob_dying`; dead cells are replaced by healthy ones on the
/// next step. Stage `Sk` overgrows any neighbor with probability `k * prob_spread`.
///
/// # Errors
///
/// Returns an error if the resulting matrices are not valid probabilities,
/// e.g. when `prob_mutate + prob_dying > 1` or `6 * prob_spread > 1`.
pub fn six_mutations(prob_mutate: f64, prob_dying: f64, prob_spread: f64) -> Result<MarkovModel> {
    const NUM_STATES: usize = 9;
    const STAGES: usize = 7; // H and S1..S6
    const CANCER: usize = 7;
    const DEAD: usize = 8;

    let stay = 1.0 - prob_mutate - prob_dying;

    let probs_internal = Array2::from_shape_fn((NUM_STATES, NUM_STATES), |(new, old)| {
        if old < STAGES {
            if new == old {
                stay
            } else if new == old + 1 {
                prob_mutate
            } else if new == DEAD {
                prob_dying
            } else {
                0.0
            }
        } else if old == CANCER {
            if new == CANCER { 1.0 } else { 0.0 }
        } else if new == 0 {
            // Dead cells are revived as healthy ones
            1.0
        } else {
            0.0
        }
    });

    let probs_spread = Array2::from_shape_fn((NUM_STATES, NUM_STATES), |(attacker, _)| {
        if (1..STAGES).contains(&attacker) {
            attacker as f64 * prob_spread
        } else {
            0.0
        }
    });

    let labels = ["H", "S1", "S2", "S3", "S4", "S5", "S6", "C", "D"]
        .iter()
        .map(ToString::to_string)
        .collect();

    let colors = vec![
        [46, 139, 87, 255],
        [154, 205, 50, 255],
        [238, 232, 170, 255],
        [240, 230, 140, 255],
        [255, 215, 0, 255],
        [255, 165, 0, 255],
        [255, 99, 71, 255],
        [178, 34, 34, 255],
        [105, 105, 105, 255],
    ];

    MarkovModel::new(ModelParameters {
        num_states: NUM_STATES,
        num_neighbors: SQUARE_LATTICE_NEIGHBORS,
        probs_internal,
        probs_spread,
        labels: Some(labels),
        colors: Some(colors),
    })
}
