use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Outcome of the precision gate for one input text.
///
/// A verdict is a pure function of the input: identical text always yields an
/// identical verdict. It is computed once per request and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateVerdict {
    pub passed: bool,
    /// Information-density distance in `[0, 1]`; lower is more precise.
    pub precision_distance: f64,
    /// Variance of the sliding-window entropy series.
    pub entropy_variance: f64,
    /// Set when the gate fails; names the first check that tripped.
    pub reason: Option<String>,
}

/// One evaluator's assessment of a query. Produced once per evaluator per
/// request; never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorResponse {
    pub evaluator_id: String,
    pub recommendation_text: String,
    /// Self-reported confidence in `[0, 1]`.
    pub confidence: f64,
    pub suggested_asset_id: String,
    /// Alignment score in `[0, 1]`; the input to the variance calculation.
    pub match_score: f64,
    pub safety_flags: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsensusStatus {
    /// Evaluators agree; proceed.
    Consensus,
    /// Minor disagreement; proceed with a review flag.
    SoftConflict,
    /// Major disagreement; hierarchical fallback engaged.
    HardConflict,
    /// Escalated to a human operator.
    HumanReview,
}

/// Tier of the hierarchical fallback state machine. Tiers only advance,
/// broadening match specificity at each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FallbackTier {
    /// Tier 1: exact-spec match.
    ExactSpec,
    /// Tier 2: category-level substitution.
    CategorySwap,
    /// Tier 3: mechanism-level substitution.
    MechanismSub,
    /// Tier 4: broad domain guidance; forces human review when reached
    /// without resolution.
    DomainGuidance,
}

impl FallbackTier {
    pub fn level(self) -> u8 {
        match self {
            FallbackTier::ExactSpec => 1,
            FallbackTier::CategorySwap => 2,
            FallbackTier::MechanismSub => 3,
            FallbackTier::DomainGuidance => 4,
        }
    }

    pub fn next(self) -> Option<FallbackTier> {
        match self {
            FallbackTier::ExactSpec => Some(FallbackTier::CategorySwap),
            FallbackTier::CategorySwap => Some(FallbackTier::MechanismSub),
            FallbackTier::MechanismSub => Some(FallbackTier::DomainGuidance),
            FallbackTier::DomainGuidance => None,
        }
    }
}

/// Result of a weighted multi-evaluator consensus evaluation.
///
/// `consensus_asset_id` is set iff `status` is `Consensus` or `SoftConflict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub status: ConsensusStatus,
    pub weighted_variance: f64,
    /// Inverse disagreement in `[0, 1]`; reporting only, never gates
    /// behavior.
    pub certainty_index: f64,
    pub consensus_asset_id: Option<String>,
    pub consensus_score: f64,
    pub responses: Vec<EvaluatorResponse>,
    pub fallback_tier: Option<FallbackTier>,
    pub conflict_rationale: Option<String>,
    /// Union of the responders' safety flags.
    pub safety_flags: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageCategory {
    Established,
    Frontier,
    Recovery,
}

/// One stage of a strategy. Sequence numbers are strictly increasing and
/// start at 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEntry {
    pub sequence: u32,
    pub category: StageCategory,
    pub label: String,
    pub asset_id: String,
}

/// An ordered multi-stage plan produced by strategy generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub stages: Vec<StageEntry>,
}

impl Strategy {
    /// True when sequence numbers start at 1 and increase strictly.
    pub fn is_well_formed(&self) -> bool {
        self.stages
            .iter()
            .enumerate()
            .all(|(idx, stage)| stage.sequence == idx as u32 + 1)
    }
}

/// One ranked resolution candidate. Candidates carrying a hard anchor are
/// always partitioned ahead of those without one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorCandidate {
    pub asset_id: String,
    pub similarity_score: f32,
    pub has_hard_anchor: bool,
}

/// Append-only audit entry; exactly one per bridge invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    pub intercepted: bool,
    pub precision_distance: f64,
    pub entropy_variance: f64,
    pub origin_tag: String,
}
