use thiserror::Error;

/// Failure taxonomy of the orchestration bridge.
///
/// None of these escape [`crate::OrchestrationBridge::route`]: interception
/// causes surface as structured outcomes and audit failures are logged. The
/// enum exists so every degraded path has one canonical, greppable phrasing.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Input failed the precision gate. Recoverable by rephrasing.
    #[error("gate rejected input: {0}")]
    GateRejected(String),

    /// Fewer than two evaluators responded; consensus routed to human
    /// review.
    #[error("insufficient evaluator responses, routed to human review")]
    InsufficientEvaluators,

    /// No guard slot became free within the configured wait. Transient.
    #[error("concurrency guard timed out after {0} ms")]
    ConcurrencyTimeout(u64),

    /// No vector index attached; anchor resolution degraded to an empty
    /// candidate list.
    #[error("vector index unavailable, no anchor candidates resolved")]
    ResolverUnavailable,

    #[error("audit sink io failure: {0}")]
    AuditIo(#[from] std::io::Error),

    #[error("audit record serialization failure: {0}")]
    AuditEncode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
