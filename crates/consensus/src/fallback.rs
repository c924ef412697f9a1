use triage_protocol::{EvaluatorResponse, FallbackTier, FallbackTierConfig};

/// Result of one hierarchical fallback pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackOutcome {
    /// The tier the pass stopped at. Tiers only advance within a pass.
    pub tier: FallbackTier,
    /// False when the pass exhausted tier 4; the caller must escalate to
    /// human review.
    pub resolved: bool,
    /// Human-readable rationale, one clause per tier transition.
    pub rationale: String,
}

fn tier_config(tiers: &[FallbackTierConfig], tier: FallbackTier) -> (String, f64) {
    match tiers.get(tier.level() as usize - 1) {
        Some(entry) => (entry.label.clone(), entry.min_confidence),
        // Misconfigured tier table: treat missing tiers as unresolvable.
        None => (format!("tier {}", tier.level()), f64::INFINITY),
    }
}

/// Runs the four-tier fallback state machine over a hard-conflict response
/// set, strictly advancing tier by tier, never regressing.
///
/// Each transition anchors on the highest-confidence response. A tier
/// resolves when that anchor's confidence meets the tier's configured floor;
/// floors descend across tiers, broadening match specificity at each step.
/// Tier 4 (broad domain guidance) never resolves on its own; reaching it
/// means the conflict goes to a human.
pub fn run_fallback(
    responses: &[EvaluatorResponse],
    tiers: &[FallbackTierConfig],
) -> FallbackOutcome {
    let anchor = responses
        .iter()
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence));
    let Some(anchor) = anchor else {
        return FallbackOutcome {
            tier: FallbackTier::DomainGuidance,
            resolved: false,
            rationale: "no responses to anchor a fallback on".to_string(),
        };
    };

    let mut transitions = Vec::new();
    let mut tier = FallbackTier::ExactSpec;
    loop {
        let (label, floor) = tier_config(tiers, tier);
        if tier != FallbackTier::DomainGuidance && anchor.confidence >= floor {
            transitions.push(format!(
                "{label}: anchoring on {} (confidence {:.2})",
                anchor.evaluator_id, anchor.confidence
            ));
            log::info!(
                "fallback resolved at tier {} via {}",
                tier.level(),
                anchor.evaluator_id
            );
            return FallbackOutcome {
                tier,
                resolved: true,
                rationale: transitions.join("; "),
            };
        }
        transitions.push(format!(
            "{label}: anchor {} below floor {:.2}, widening",
            anchor.evaluator_id, floor
        ));
        match tier.next() {
            Some(next) => tier = next,
            None => {
                transitions.pop();
                transitions.push(format!(
                    "{label}: maximum fallback reached, routing to human review"
                ));
                log::warn!("fallback exhausted all tiers; escalating to human review");
                return FallbackOutcome {
                    tier: FallbackTier::DomainGuidance,
                    resolved: false,
                    rationale: transitions.join("; "),
                };
            }
        }
    }
}
