//! Correlation-closure probability engines

/// Time tables and pattern memoization
pub mod cache;
/// Order-1 closure engine
pub mod mean_field;
/// Shared estimator contract and closure order selection
pub mod method;
/// Order-2 closure engine with factorized long patterns
pub mod pair;
/// Adjacent-cell patterns
pub mod pattern;
/// Variance estimators built on the closure engines
pub mod variance;

pub use mean_field::MeanField;
pub use method::{ClosureEngine, ClosureOrder, Method};
pub use pair::PairCorrelation;
pub use pattern::Pattern;
