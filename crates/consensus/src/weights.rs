use std::collections::HashMap;
use triage_protocol::ConsensusConfig;

/// Resolves the effective weight for each responding evaluator.
///
/// The configured weight vector for a task type covers the full evaluator
/// population and sums to 1. Responding evaluators missing from the table
/// share the unassigned remainder evenly. The result is renormalized over the
/// responding subset only, so absent evaluators do not dilute the variance.
pub fn normalized_weights(
    task_type: &str,
    responder_ids: &[&str],
    config: &ConsensusConfig,
) -> HashMap<String, f64> {
    if responder_ids.is_empty() {
        return HashMap::new();
    }

    let empty = HashMap::new();
    let table = config.weights.get(task_type).unwrap_or(&empty);

    let table_total: f64 = table.values().sum();
    let unknown_count = responder_ids
        .iter()
        .filter(|id| !table.contains_key(**id))
        .count();
    let remainder_share = if unknown_count > 0 {
        (1.0 - table_total).max(0.0) / unknown_count as f64
    } else {
        0.0
    };

    let mut raw: HashMap<String, f64> = responder_ids
        .iter()
        .map(|id| {
            let weight = table.get(*id).copied().unwrap_or(remainder_share);
            (id.to_string(), weight)
        })
        .collect();

    let total: f64 = raw.values().sum();
    if total <= f64::EPSILON {
        // Degenerate table (e.g. fully assigned to non-responders): fall back
        // to an even split.
        let even = 1.0 / responder_ids.len() as f64;
        for weight in raw.values_mut() {
            *weight = even;
        }
    } else {
        for weight in raw.values_mut() {
            *weight /= total;
        }
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(task: &str, entries: &[(&str, f64)]) -> ConsensusConfig {
        let mut config = ConsensusConfig::default();
        config.weights.insert(
            task.to_string(),
            entries
                .iter()
                .map(|(id, w)| (id.to_string(), *w))
                .collect(),
        );
        config
    }

    #[test]
    fn known_ids_keep_configured_proportions() {
        let config = config_with(
            "reasoning",
            &[("medical", 0.5), ("logic", 0.3), ("safety", 0.2)],
        );
        let weights = normalized_weights("reasoning", &["medical", "logic", "safety"], &config);
        assert!((weights["medical"] - 0.5).abs() < 1e-12);
        assert!((weights["logic"] - 0.3).abs() < 1e-12);
        assert!((weights["safety"] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn renormalizes_over_responders_only() {
        let config = config_with(
            "reasoning",
            &[("medical", 0.5), ("logic", 0.3), ("safety", 0.2)],
        );
        // safety did not respond; remaining weights rescale to sum 1.
        let weights = normalized_weights("reasoning", &["medical", "logic"], &config);
        assert!((weights["medical"] - 0.625).abs() < 1e-12);
        assert!((weights["logic"] - 0.375).abs() < 1e-12);
    }

    #[test]
    fn unknown_ids_split_the_remainder_evenly() {
        let config = config_with("reasoning", &[("medical", 0.6)]);
        let weights = normalized_weights("reasoning", &["medical", "extra-a", "extra-b"], &config);
        // Remainder 0.4 splits into 0.2 each; already sums to 1.
        assert!((weights["medical"] - 0.6).abs() < 1e-12);
        assert!((weights["extra-a"] - 0.2).abs() < 1e-12);
        assert!((weights["extra-b"] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn unconfigured_task_type_gives_even_split() {
        let config = ConsensusConfig::default();
        let weights = normalized_weights("unknown-task", &["a", "b", "c"], &config);
        for id in ["a", "b", "c"] {
            assert!((weights[id] - 1.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn fully_assigned_table_with_only_unknown_responders_falls_back_to_even() {
        let config = config_with("reasoning", &[("medical", 1.0)]);
        let weights = normalized_weights("reasoning", &["other-a", "other-b"], &config);
        assert!((weights["other-a"] - 0.5).abs() < 1e-12);
        assert!((weights["other-b"] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn weights_always_sum_to_one() {
        let config = config_with("reasoning", &[("medical", 0.7), ("logic", 0.3)]);
        let weights = normalized_weights("reasoning", &["medical", "logic", "extra"], &config);
        let total: f64 = weights.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
