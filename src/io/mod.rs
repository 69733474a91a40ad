//! Input/output, configuration and error handling

/// Command-line interface
pub mod cli;
/// Constants and runtime defaults
pub mod configuration;
/// Error type shared by the whole crate
pub mod error;
/// PNG export of simulated grids
pub mod image;
/// Progress bars for long-running loops
pub mod progress;
/// Text and LaTeX reports
pub mod report;
