//! Transition models consumed by the estimation methods
//!
//! This module contains:
//! - The read-only transition model contract
//! - A validated matrix-backed model
//! - Time-switched model composition
//! - Preset models

/// Composition of two models switched by a time predicate
pub mod combined;
/// Matrix-backed stationary model with validation
pub mod markov;
/// Preset healthy/cancerous models
pub mod presets;
/// Transition model trait and core index types
pub mod transition;

pub use markov::{MarkovModel, ModelParameters};
pub use transition::{State, Time, TransitionModel};
