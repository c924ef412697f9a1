use crate::capability::Capability;
use anyhow::bail;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::time::Duration;
use triage_protocol::EvaluatorResponse;

/// A capability returning a fixed, scripted response. This is the stand-in
/// for real evaluators in tests and demos: deterministic, with optional
/// latency and failure injection, so the consensus algorithm's correctness
/// stays independent of any specific scoring source.
pub struct ScriptedEvaluator {
    id: String,
    recommendation_text: String,
    confidence: f64,
    suggested_asset_id: String,
    match_score: f64,
    safety_flags: BTreeSet<String>,
    delay: Option<Duration>,
    fail: bool,
}

impl ScriptedEvaluator {
    pub fn new(
        id: impl Into<String>,
        suggested_asset_id: impl Into<String>,
        match_score: f64,
        confidence: f64,
    ) -> Self {
        let id = id.into();
        Self {
            recommendation_text: format!("scripted recommendation from {id}"),
            id,
            confidence,
            suggested_asset_id: suggested_asset_id.into(),
            match_score,
            safety_flags: BTreeSet::new(),
            delay: None,
            fail: false,
        }
    }

    pub fn with_recommendation(mut self, text: impl Into<String>) -> Self {
        self.recommendation_text = text.into();
        self
    }

    pub fn with_safety_flag(mut self, flag: impl Into<String>) -> Self {
        self.safety_flags.insert(flag.into());
        self
    }

    /// Sleeps before responding; with a delay past the engine timeout the
    /// evaluator is treated as non-responsive.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Makes every `score` call fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl Capability for ScriptedEvaluator {
    fn id(&self) -> &str {
        &self.id
    }

    async fn score(&self, _query: &str) -> anyhow::Result<EvaluatorResponse> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            bail!("scripted failure from {}", self.id);
        }
        Ok(EvaluatorResponse {
            evaluator_id: self.id.clone(),
            recommendation_text: self.recommendation_text.clone(),
            confidence: self.confidence,
            suggested_asset_id: self.suggested_asset_id.clone(),
            match_score: self.match_score,
            safety_flags: self.safety_flags.clone(),
        })
    }
}
