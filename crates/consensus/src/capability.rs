use async_trait::async_trait;
use triage_protocol::EvaluatorResponse;

/// An injected scoring source. The engine does not know whether an
/// implementation calls a network service, a local model, or a stub; it only
/// requires that `score` returns within the configured per-call timeout or be
/// treated as non-responsive.
#[async_trait]
pub trait Capability: Send + Sync {
    /// Stable evaluator identity, used to look up task-type weights.
    fn id(&self) -> &str;

    /// Scores `query`. An `Err` contributes no response; it is never retried
    /// and never counted as a zero score.
    async fn score(&self, query: &str) -> anyhow::Result<EvaluatorResponse>;
}
