use crate::error::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Precision gate thresholds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Sliding-window width, in whitespace tokens.
    pub window_size: usize,
    /// Mean window entropy mapping to `precision_distance = 1.0`.
    pub entropy_norm: f64,
    /// Maximum tolerated variance of the window entropy series.
    pub variance_ceiling: f64,
    /// Maximum tolerated precision distance.
    pub distance_threshold: f64,
    /// Inputs shorter than this many tokens fail outright.
    pub min_tokens: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            window_size: 5,
            entropy_norm: 5.5,
            variance_ceiling: 0.005,
            distance_threshold: 0.79,
            min_tokens: 3,
        }
    }
}

/// One tier of the hierarchical fallback ladder.
#[derive(Debug, Clone, Deserialize)]
pub struct FallbackTierConfig {
    pub label: String,
    /// Minimum anchor confidence for the tier to resolve the conflict.
    pub min_confidence: f64,
}

/// Consensus engine thresholds and per-task-type weight tables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    /// Weighted variance at or below this is full consensus.
    pub conflict_threshold: f64,
    /// Soft conflicts extend to `conflict_threshold * soft_conflict_multiplier`.
    pub soft_conflict_multiplier: f64,
    /// Variance mapping to a certainty index of zero.
    pub v_max: f64,
    pub evaluator_timeout_ms: u64,
    /// Asset id meaning "no match found"; a winner carrying it is downgraded
    /// to a soft conflict instead of being accepted silently.
    pub no_match_sentinel: String,
    /// task type -> evaluator id -> weight. Weights for a task type sum to 1;
    /// evaluator ids absent from the table share the remainder evenly.
    pub weights: HashMap<String, HashMap<String, f64>>,
    /// Exactly four tiers, ordered. Tier 4 never resolves; it escalates.
    pub fallback_tiers: Vec<FallbackTierConfig>,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            conflict_threshold: 0.005,
            soft_conflict_multiplier: 3.0,
            v_max: 0.25,
            evaluator_timeout_ms: 12_000,
            no_match_sentinel: "asset-none".to_string(),
            weights: HashMap::new(),
            fallback_tiers: default_fallback_tiers(),
        }
    }
}

fn default_fallback_tiers() -> Vec<FallbackTierConfig> {
    let tier = |label: &str, min_confidence| FallbackTierConfig {
        label: label.to_string(),
        min_confidence,
    };
    vec![
        tier("exact-spec match", 0.92),
        tier("category-level substitution", 0.80),
        tier("mechanism-level substitution", 0.65),
        tier("broad domain guidance", 0.0),
    ]
}

/// Anchor resolver settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Candidate pool retrieved from the vector index, independent of the
    /// requested top-k.
    pub pool_size: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { pool_size: 100 }
    }
}

/// Orchestration bridge settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Maximum requests inside the gated body at once.
    pub max_in_flight: usize,
    /// How long a request may wait for a guard slot before failing closed.
    pub guard_timeout_ms: u64,
    /// JSON-lines audit sink. `None` keeps records in memory only.
    pub audit_path: Option<PathBuf>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 8,
            guard_timeout_ms: 30_000,
            audit_path: None,
        }
    }
}

/// Full static configuration, loaded once at startup and passed immutably to
/// each component constructor. Nothing reads configuration from process-wide
/// state during request handling.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    pub gate: GateConfig,
    pub consensus: ConsensusConfig,
    pub resolver: ResolverConfig,
    pub bridge: BridgeConfig,
}

impl TriageConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }
}
