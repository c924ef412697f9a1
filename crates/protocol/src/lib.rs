//! # Triage Protocol
//!
//! Shared data model for the triage decision pipeline: gate verdicts,
//! evaluator responses, consensus results, strategies, anchor candidates and
//! audit records, plus the immutable configuration surface and the single
//! content-addressed identifier utility used by every component.

mod anchor_id;
mod config;
mod error;
mod types;

pub use anchor_id::anchor_id;
pub use config::{
    BridgeConfig, ConsensusConfig, FallbackTierConfig, GateConfig, ResolverConfig, TriageConfig,
};
pub use error::{ConfigError, Result};
pub use types::{
    AnchorCandidate, AuditRecord, ConsensusResult, ConsensusStatus, EvaluatorResponse,
    FallbackTier, GateVerdict, StageCategory, StageEntry, Strategy,
};
