use crate::audit::AuditLog;
use crate::error::{BridgeError, Result};
use crate::strategy::{LocalStrategist, Strategist};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::Semaphore;
use triage_consensus::{ConsensusEngine, EvaluatorRegistry};
use triage_gate::PrecisionGate;
use triage_protocol::{
    anchor_id, AnchorCandidate, AuditRecord, ConsensusResult, GateVerdict, Strategy, TriageConfig,
};
use triage_resolver::{AnchorResolver, VectorIndex};

/// One routing request. `query` feeds the gate and the evaluator panel;
/// `intent_summary` feeds anchor resolution.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub origin_tag: String,
    pub task_type: String,
    pub query: String,
    pub intent_summary: String,
    pub top_k: usize,
    pub hard_anchors: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStatus {
    /// The full pipeline ran; downstream fields are populated.
    Completed,
    /// Stopped before the gated body (gate rejection or guard timeout).
    Intercepted,
}

/// Structured result of one bridge invocation. Always returned, never an
/// error: degraded paths surface through `status` and `reason`.
#[derive(Debug, Clone)]
pub struct RouteOutcome {
    pub request_id: String,
    pub status: RouteStatus,
    /// Interception cause, or a note on a degraded completed run.
    pub reason: Option<String>,
    pub verdict: GateVerdict,
    pub strategy: Option<Strategy>,
    pub consensus: Option<ConsensusResult>,
    pub candidates: Vec<AnchorCandidate>,
}

/// Linear pipeline: gate, then strategy generation, consensus and anchor
/// resolution under a bounded concurrency guard.
///
/// The guard is a semaphore sized `max_in_flight`; evaluator fan-out inside
/// the consensus engine is the only intra-request parallelism. Every
/// invocation appends exactly one audit record, on interception paths too.
pub struct OrchestrationBridge {
    gate: PrecisionGate,
    engine: ConsensusEngine,
    registry: EvaluatorRegistry,
    resolver: AnchorResolver,
    strategist: Arc<dyn Strategist>,
    guard: Arc<Semaphore>,
    guard_timeout_ms: u64,
    audit: AuditLog,
}

impl OrchestrationBridge {
    /// Builds the pipeline from one immutable config snapshot. Fails only
    /// when the configured audit sink cannot be opened.
    pub fn new(config: TriageConfig, registry: EvaluatorRegistry) -> Result<Self> {
        let audit = match &config.bridge.audit_path {
            Some(path) => AuditLog::with_sink(path)?,
            None => AuditLog::in_memory(),
        };
        Ok(Self {
            gate: PrecisionGate::new(config.gate),
            engine: ConsensusEngine::new(config.consensus),
            registry,
            resolver: AnchorResolver::new(config.resolver),
            strategist: Arc::new(LocalStrategist),
            guard: Arc::new(Semaphore::new(config.bridge.max_in_flight)),
            guard_timeout_ms: config.bridge.guard_timeout_ms,
            audit,
        })
    }

    pub fn with_strategist(mut self, strategist: Arc<dyn Strategist>) -> Self {
        self.strategist = strategist;
        self
    }

    pub fn with_index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.resolver = self.resolver.with_index(index);
        self
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Routes one request through the pipeline. Infallible by design: every
    /// internal failure mode maps to a structured outcome.
    pub async fn route(&self, request: RouteRequest) -> RouteOutcome {
        let request_id = anchor_id("case", &request.origin_tag, &request.query);
        let verdict = self.gate.evaluate(&request.query);

        if !verdict.passed {
            let detail = verdict
                .reason
                .clone()
                .unwrap_or_else(|| "unspecified".to_string());
            let error = BridgeError::GateRejected(detail);
            return self.intercept(request_id, &request, verdict, error).await;
        }

        let timeout = Duration::from_millis(self.guard_timeout_ms);
        let _permit =
            match tokio::time::timeout(timeout, Arc::clone(&self.guard).acquire_owned()).await {
                Ok(Ok(permit)) => permit,
                // A closed semaphore and an elapsed wait both mean no slot.
                Ok(Err(_)) | Err(_) => {
                    let error = BridgeError::ConcurrencyTimeout(self.guard_timeout_ms);
                    return self.intercept(request_id, &request, verdict, error).await;
                }
            };

        let strategy = match self.strategist.generate(&request.query, &verdict).await {
            Ok(strategy) => strategy,
            Err(error) => {
                log::warn!("strategist failed, using local fallback: {error:#}");
                LocalStrategist.plan(&request.query)
            }
        };

        let consensus = self
            .engine
            .evaluate(
                &request.query,
                &request.task_type,
                self.registry.resolve(&request.task_type),
            )
            .await;
        let candidates = self
            .resolver
            .resolve(&request.intent_summary, request.top_k, &request.hard_anchors)
            .await;

        let reason = if consensus.responses.len() < 2 {
            Some(BridgeError::InsufficientEvaluators.to_string())
        } else if request.top_k > 0 && !self.resolver.has_index() {
            Some(BridgeError::ResolverUnavailable.to_string())
        } else {
            None
        };

        self.record(&request, &verdict, false).await;
        log::info!(
            "route {request_id} completed with consensus status {:?} and {} candidates",
            consensus.status,
            candidates.len()
        );

        RouteOutcome {
            request_id,
            status: RouteStatus::Completed,
            reason,
            verdict,
            strategy: Some(strategy),
            consensus: Some(consensus),
            candidates,
        }
    }

    async fn intercept(
        &self,
        request_id: String,
        request: &RouteRequest,
        verdict: GateVerdict,
        error: BridgeError,
    ) -> RouteOutcome {
        self.record(request, &verdict, true).await;
        log::info!("route {request_id} intercepted: {error}");
        RouteOutcome {
            request_id,
            status: RouteStatus::Intercepted,
            reason: Some(error.to_string()),
            verdict,
            strategy: None,
            consensus: None,
            candidates: Vec::new(),
        }
    }

    async fn record(&self, request: &RouteRequest, verdict: &GateVerdict, intercepted: bool) {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0);
        let record = AuditRecord {
            timestamp_ms,
            intercepted,
            precision_distance: verdict.precision_distance,
            entropy_variance: verdict.entropy_variance,
            origin_tag: request.origin_tag.clone(),
        };
        // An unwritable audit sink must not fail the request itself.
        if let Err(error) = self.audit.append(record).await {
            log::error!("audit append failed: {error}");
        }
    }
}
