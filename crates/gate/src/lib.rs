//! # Triage Gate
//!
//! Entropy-based precision gate. Scores free-text input for information
//! density and rejects low-density noise before the expensive parts of the
//! pipeline run. The whole crate is pure: no I/O, no randomness, identical
//! input always yields an identical verdict.

mod entropy;
mod gate;

pub use entropy::{mean_and_variance, shannon_entropy, sliding_entropy};
pub use gate::PrecisionGate;
