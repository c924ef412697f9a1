use crate::entropy::{mean_and_variance, sliding_entropy};
use triage_protocol::{GateConfig, GateVerdict};

/// Entropy-based precision gate.
///
/// Computes a sliding-window entropy series over the input, derives the mean
/// entropy and its variance across windows, and maps the mean to a precision
/// distance in `[0, 1]` (higher entropy, larger distance, less precise).
pub struct PrecisionGate {
    config: GateConfig,
}

impl PrecisionGate {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    /// Scores `text` and returns a gate verdict. Pure and deterministic.
    ///
    /// Checks run in a fixed order and the first failure supplies the
    /// reason:
    /// 1. minimum token count: the distance formula alone does not protect
    ///    against degenerate input (empty text scores distance 0);
    /// 2. variance ceiling: high variance flags unstable, noisy input
    ///    regardless of distance, so it is checked before distance;
    /// 3. distance threshold.
    pub fn evaluate(&self, text: &str) -> GateVerdict {
        let token_count = text.split_whitespace().count();
        let texture = sliding_entropy(text, self.config.window_size);
        let (mean_entropy, entropy_variance) = mean_and_variance(&texture);
        let precision_distance = (mean_entropy / self.config.entropy_norm).clamp(0.0, 1.0);

        let reason = if token_count < self.config.min_tokens {
            Some(format!(
                "input has {token_count} tokens, below the minimum of {}",
                self.config.min_tokens
            ))
        } else if entropy_variance > self.config.variance_ceiling {
            Some(format!(
                "entropy variance {entropy_variance:.6} exceeds ceiling {}",
                self.config.variance_ceiling
            ))
        } else if precision_distance > self.config.distance_threshold {
            Some(format!(
                "precision distance {precision_distance:.4} exceeds threshold {}",
                self.config.distance_threshold
            ))
        } else {
            None
        };

        if let Some(reason) = &reason {
            log::debug!("gate rejected input: {reason}");
        }

        GateVerdict {
            passed: reason.is_none(),
            precision_distance,
            entropy_variance,
            reason,
        }
    }
}
