//! Closure approximations for stochastic mutation and overgrowth on cellular grids
//!
//! Cells on an infinite homogeneous lattice change state on their own and are
//! overgrown by their neighbors, both with per-step probabilities. The crate
//! estimates the distribution of the number of cells per state at a given time
//! without simulating the grid, using a single-cell (mean-field) or an
//! adjacent-pair closure, and ships a Monte Carlo simulator as an empirical
//! baseline.

#![forbid(unsafe_code)]

/// Closure engines, patterns and variance estimators
pub mod closure;
/// Input/output operations and error handling
pub mod io;
/// Probability helpers and parameter fitting
pub mod math;
/// Transition models consumed by the estimators
pub mod model;
/// Monte Carlo baseline
pub mod simulation;

pub use closure::{ClosureEngine, ClosureOrder, MeanField, Method, PairCorrelation, Pattern};
pub use io::error::{Result, RisqError};
pub use model::{MarkovModel, ModelParameters, State, Time, TransitionModel};
