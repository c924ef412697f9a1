use crate::capability::Capability;
use crate::fallback::run_fallback;
use crate::weights::normalized_weights;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use triage_protocol::{ConsensusConfig, ConsensusResult, ConsensusStatus, EvaluatorResponse};

/// Weighted-consensus engine over a panel of independent evaluators.
pub struct ConsensusEngine {
    config: ConsensusConfig,
}

impl ConsensusEngine {
    pub fn new(config: ConsensusConfig) -> Self {
        Self { config }
    }

    /// Fans `query` out to every evaluator in parallel, joins the responses,
    /// and reconciles them into a single [`ConsensusResult`].
    ///
    /// Evaluators that fail, time out, or panic contribute no response.
    /// Fewer than two responses routes to human review with a variance of
    /// 1.0. This method is infallible: every internal failure mode maps to a
    /// structured result.
    pub async fn evaluate(
        &self,
        query: &str,
        task_type: &str,
        evaluators: &[Arc<dyn Capability>],
    ) -> ConsensusResult {
        let responses = self.collect_responses(query, evaluators).await;
        log::debug!(
            "consensus: {} of {} evaluators responded for task '{task_type}'",
            responses.len(),
            evaluators.len()
        );

        if responses.len() < 2 {
            let rationale = format!(
                "insufficient evaluator responses: {} returned, at least 2 required",
                responses.len()
            );
            return Self::human_review_result(responses, rationale);
        }

        self.reconcile(task_type, responses)
    }

    async fn collect_responses(
        &self,
        query: &str,
        evaluators: &[Arc<dyn Capability>],
    ) -> Vec<EvaluatorResponse> {
        let timeout = Duration::from_millis(self.config.evaluator_timeout_ms);
        let mut handles = Vec::with_capacity(evaluators.len());
        for evaluator in evaluators {
            let evaluator = Arc::clone(evaluator);
            let query = query.to_string();
            handles.push(tokio::spawn(async move {
                let id = evaluator.id().to_string();
                match tokio::time::timeout(timeout, evaluator.score(&query)).await {
                    Ok(Ok(response)) => Some(response),
                    Ok(Err(err)) => {
                        log::warn!("evaluator {id} failed: {err:#}");
                        None
                    }
                    Err(_) => {
                        log::warn!("evaluator {id} timed out after {timeout:?}");
                        None
                    }
                }
            }));
        }

        let mut responses = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(Some(response)) => responses.push(response),
                Ok(None) => {}
                Err(err) => {
                    // A panicking capability is contained here and treated as
                    // non-responsive.
                    log::warn!("evaluator task aborted: {err}");
                }
            }
        }
        responses
    }

    fn reconcile(&self, task_type: &str, responses: Vec<EvaluatorResponse>) -> ConsensusResult {
        let responder_ids: Vec<&str> = responses.iter().map(|r| r.evaluator_id.as_str()).collect();
        let weights = normalized_weights(task_type, &responder_ids, &self.config);
        let weight_of =
            |response: &EvaluatorResponse| weights.get(&response.evaluator_id).copied().unwrap_or(0.0);

        let weighted_mean: f64 = responses
            .iter()
            .map(|r| weight_of(r) * r.match_score)
            .sum();
        let weighted_variance: f64 = responses
            .iter()
            .map(|r| weight_of(r) * (r.match_score - weighted_mean).powi(2))
            .sum();

        let soft_bound = self.config.conflict_threshold * self.config.soft_conflict_multiplier;
        let mut status = if weighted_variance <= self.config.conflict_threshold {
            ConsensusStatus::Consensus
        } else if weighted_variance <= soft_bound {
            ConsensusStatus::SoftConflict
        } else {
            ConsensusStatus::HardConflict
        };

        let certainty_index = (1.0 - weighted_variance / self.config.v_max).clamp(0.0, 1.0);
        let safety_flags: BTreeSet<String> = responses
            .iter()
            .flat_map(|r| r.safety_flags.iter().cloned())
            .collect();

        let mut consensus_asset_id = None;
        let mut consensus_score = 0.0;
        let mut fallback_tier = None;
        let mut conflict_rationale = None;

        match status {
            ConsensusStatus::Consensus | ConsensusStatus::SoftConflict => {
                let winner = responses
                    .iter()
                    .max_by(|a, b| {
                        (a.match_score * weight_of(a)).total_cmp(&(b.match_score * weight_of(b)))
                    })
                    .expect("at least two responses");
                if winner.suggested_asset_id == self.config.no_match_sentinel {
                    // A no-match winner must force a review flag rather than
                    // be accepted silently.
                    status = ConsensusStatus::SoftConflict;
                    conflict_rationale =
                        Some("winning response carries the no-match sentinel".to_string());
                }
                consensus_asset_id = Some(winner.suggested_asset_id.clone());
                consensus_score = weighted_mean;
            }
            ConsensusStatus::HardConflict => {
                let outcome = run_fallback(&responses, &self.config.fallback_tiers);
                if !outcome.resolved {
                    status = ConsensusStatus::HumanReview;
                }
                fallback_tier = Some(outcome.tier);
                conflict_rationale = Some(outcome.rationale);
            }
            ConsensusStatus::HumanReview => unreachable!("classification never yields HumanReview"),
        }

        log::info!(
            "consensus status {:?} (variance {:.6}, certainty {:.4})",
            status,
            weighted_variance,
            certainty_index
        );

        ConsensusResult {
            status,
            weighted_variance,
            certainty_index,
            consensus_asset_id,
            consensus_score,
            responses,
            fallback_tier,
            conflict_rationale,
            safety_flags,
        }
    }

    fn human_review_result(
        responses: Vec<EvaluatorResponse>,
        rationale: String,
    ) -> ConsensusResult {
        let safety_flags = responses
            .iter()
            .flat_map(|r| r.safety_flags.iter().cloned())
            .collect();
        ConsensusResult {
            status: ConsensusStatus::HumanReview,
            weighted_variance: 1.0,
            certainty_index: 0.0,
            consensus_asset_id: None,
            consensus_score: 0.0,
            responses,
            fallback_tier: None,
            conflict_rationale: Some(rationale),
            safety_flags,
        }
    }
}
