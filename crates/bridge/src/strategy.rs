use async_trait::async_trait;
use triage_protocol::{anchor_id, GateVerdict, StageCategory, StageEntry, Strategy};

/// Strategy generation boundary. Implementations may call out to anything;
/// the bridge treats a failure as "use the local fallback", never as a
/// request failure.
#[async_trait]
pub trait Strategist: Send + Sync {
    async fn generate(&self, query: &str, verdict: &GateVerdict) -> anyhow::Result<Strategy>;
}

/// Fixed care-plan skeleton: every generated strategy walks these four
/// stages in order.
const STAGE_TEMPLATE: [(&str, StageCategory); 4] = [
    ("Diagnosis", StageCategory::Established),
    ("Treatment", StageCategory::Frontier),
    ("Recovery", StageCategory::Recovery),
    ("Follow-up", StageCategory::Established),
];

/// Deterministic in-process strategist. Maps the stage template onto the
/// query, deriving each stage's asset identifier from the stage label and
/// the query text so repeated requests produce identical plans.
#[derive(Default, Clone, Copy)]
pub struct LocalStrategist;

impl LocalStrategist {
    pub fn plan(&self, query: &str) -> Strategy {
        let stages = STAGE_TEMPLATE
            .iter()
            .enumerate()
            .map(|(idx, (label, category))| StageEntry {
                sequence: idx as u32 + 1,
                category: *category,
                label: (*label).to_string(),
                asset_id: anchor_id("stage", &label.to_lowercase(), query),
            })
            .collect();
        Strategy { stages }
    }
}

#[async_trait]
impl Strategist for LocalStrategist {
    async fn generate(&self, query: &str, _verdict: &GateVerdict) -> anyhow::Result<Strategy> {
        Ok(self.plan(query))
    }
}
