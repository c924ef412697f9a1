//! # Triage Bridge
//!
//! Orchestration layer tying the pipeline together: precision gate, strategy
//! generation, weighted consensus and anchor resolution, run as a linear
//! state machine under a bounded concurrency guard with an append-only audit
//! trail.
//!
//! [`OrchestrationBridge::route`] is the single entry point and never
//! returns an error: rejections, timeouts and component degradations all
//! surface as structured [`RouteOutcome`] values.

mod audit;
mod bridge;
mod error;
mod strategy;

pub use audit::AuditLog;
pub use bridge::{OrchestrationBridge, RouteOutcome, RouteRequest, RouteStatus};
pub use error::{BridgeError, Result};
pub use strategy::{LocalStrategist, Strategist};
