use crate::capability::Capability;
use std::collections::HashMap;
use std::sync::Arc;

/// Typed evaluator registry: task type to an ordered list of capabilities,
/// resolved once at startup. Replaces ad hoc string-keyed dictionaries; the
/// bridge never selects evaluators dynamically during request handling.
#[derive(Default, Clone)]
pub struct EvaluatorRegistry {
    by_task: HashMap<String, Vec<Arc<dyn Capability>>>,
    default: Vec<Arc<dyn Capability>>,
}

impl EvaluatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the evaluator panel used when a task type has no dedicated entry.
    pub fn with_default(mut self, evaluators: Vec<Arc<dyn Capability>>) -> Self {
        self.default = evaluators;
        self
    }

    /// Registers the ordered evaluator panel for one task type.
    pub fn with_task(
        mut self,
        task_type: impl Into<String>,
        evaluators: Vec<Arc<dyn Capability>>,
    ) -> Self {
        self.by_task.insert(task_type.into(), evaluators);
        self
    }

    /// Resolves the panel for a task type, falling back to the default panel.
    pub fn resolve(&self, task_type: &str) -> &[Arc<dyn Capability>] {
        self.by_task
            .get(task_type)
            .map(Vec::as_slice)
            .unwrap_or(&self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedEvaluator;

    fn evaluator(id: &str) -> Arc<dyn Capability> {
        Arc::new(ScriptedEvaluator::new(id, "asset-x", 0.8, 0.8))
    }

    #[test]
    fn resolves_task_specific_panel() {
        let registry = EvaluatorRegistry::new()
            .with_default(vec![evaluator("general")])
            .with_task("safety", vec![evaluator("safety-a"), evaluator("safety-b")]);

        let panel = registry.resolve("safety");
        assert_eq!(panel.len(), 2);
        assert_eq!(panel[0].id(), "safety-a");
    }

    #[test]
    fn unknown_task_falls_back_to_default() {
        let registry = EvaluatorRegistry::new().with_default(vec![evaluator("general")]);
        let panel = registry.resolve("unheard-of");
        assert_eq!(panel.len(), 1);
        assert_eq!(panel[0].id(), "general");
    }

    #[test]
    fn empty_registry_resolves_to_empty_panel() {
        let registry = EvaluatorRegistry::new();
        assert!(registry.resolve("anything").is_empty());
    }
}
