use std::collections::BTreeMap;

/// Shannon entropy in bits over the character distribution of `text`.
///
/// Characters are lowercased and whitespace is ignored, so token separators
/// do not inflate the estimate. Concentrated, repetitive content scores low;
/// diffuse content scores high.
pub fn shannon_entropy(text: &str) -> f64 {
    // BTreeMap keeps iteration order fixed so float summation is
    // bit-for-bit deterministic across calls, as the gate contract requires.
    let mut freq: BTreeMap<char, usize> = BTreeMap::new();
    for ch in text.chars().flat_map(char::to_lowercase) {
        if !ch.is_whitespace() {
            *freq.entry(ch).or_insert(0) += 1;
        }
    }
    let total: usize = freq.values().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let mut entropy = 0.0;
    for &count in freq.values() {
        let p = count as f64 / total;
        entropy -= p * p.log2();
    }
    entropy
}

/// Entropy texture: Shannon entropy of each `window_size`-token sliding
/// window. Inputs shorter than one window produce a single whole-text value.
pub fn sliding_entropy(text: &str, window_size: usize) -> Vec<f64> {
    let window_size = window_size.max(1);
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() < window_size {
        return vec![shannon_entropy(text)];
    }
    tokens
        .windows(window_size)
        .map(|window| shannon_entropy(&window.join(" ")))
        .collect()
}

/// Mean and population variance of an entropy series. Empty input is treated
/// as all zeros.
pub fn mean_and_variance(series: &[f64]) -> (f64, f64) {
    if series.is_empty() {
        return (0.0, 0.0);
    }
    let n = series.len() as f64;
    let mean = series.iter().sum::<f64>() / n;
    let variance = series.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / n;
    (mean, variance)
}
