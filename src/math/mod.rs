//! Mathematical utilities for estimation and fitting

/// Parameter fitting by gradient and steepest descent
pub mod optimization;
/// Probability helpers and normal approximations
pub mod probability;
