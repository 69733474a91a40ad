//! Empirical baseline by direct simulation of finite grids

/// Monte Carlo simulation of a periodic square grid
pub mod monte_carlo;
/// Seeded random choices
pub mod sampler;

pub use monte_carlo::{MonteCarlo2D, MonteCarloConfig};
