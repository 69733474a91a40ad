//! Estimation constants and runtime configuration defaults

// Closure engine settings
/// Number of neighbor shells summed by the pair-correlation variance
pub const VARIANCE_ORDER: usize = 4;

/// Distance outside [0, 1] that is still treated as floating-point noise
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Allowed deviation of an internal-transition column sum from 1
pub const STOCHASTIC_TOLERANCE: f64 = 1e-8;

// Monte Carlo defaults
/// Fixed seed for reproducible simulation
pub const DEFAULT_SEED: u64 = 42;
/// Default number of independent simulation trials
pub const DEFAULT_TRIALS: usize = 100;
/// Default simulated grid width in cells
pub const DEFAULT_GRID_WIDTH: usize = 32;
/// Default simulated grid height in cells
pub const DEFAULT_GRID_HEIGHT: usize = 32;

// Preset defaults
/// Default per-step mutation probability
pub const DEFAULT_PROB_MUTATE: f64 = 0.1;
/// Default per-step overgrowth probability
pub const DEFAULT_PROB_SPREAD: f64 = 0.05;
/// Default per-step dying probability (six mutations preset)
pub const DEFAULT_PROB_DYING: f64 = 0.005;

// Reporting
/// Default time horizon for evolution tables
pub const DEFAULT_HORIZON: usize = 20;
/// Number of time steps per year of age (one step is a month)
pub const STEPS_PER_YEAR: usize = 12;
/// Number of cells in a given state from which a tissue counts as affected
pub const DETECTION_THRESHOLD: f64 = 1.0;
/// Incidence figures are reported per this many individuals
pub const INCIDENCE_SCALE: f64 = 100_000.0;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
