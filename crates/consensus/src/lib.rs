//! # Triage Consensus
//!
//! Multi-evaluator weighted-consensus engine. Fans out a query to independent
//! scoring capabilities in parallel, reconciles their disagreement through a
//! weighted variance measure, and degrades through a four-tier hierarchical
//! fallback when the disagreement exceeds tolerance.
//!
//! The engine never fails: evaluator errors, timeouts and panics are
//! contained at the capability boundary and treated as "did not respond";
//! fewer than two responses routes the request to human review.

mod capability;
mod engine;
mod fallback;
mod registry;
mod scripted;
mod weights;

pub use capability::Capability;
pub use engine::ConsensusEngine;
pub use fallback::{run_fallback, FallbackOutcome};
pub use registry::EvaluatorRegistry;
pub use scripted::ScriptedEvaluator;
pub use weights::normalized_weights;
