use crate::index::{IndexHit, VectorIndex};
use std::collections::BTreeSet;
use std::sync::Arc;
use triage_protocol::{AnchorCandidate, ResolverConfig};

/// Maps an intent summary to ranked opaque asset identifiers.
///
/// Retrieval is two-phase: an over-fetched similarity pool from the injected
/// index, then a hard-anchor re-ranking pass. Any candidate whose document
/// contains a requested anchor term outranks every candidate without one,
/// regardless of raw similarity.
pub struct AnchorResolver {
    index: Option<Arc<dyn VectorIndex>>,
    config: ResolverConfig,
}

impl AnchorResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            index: None,
            config,
        }
    }

    pub fn with_index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    /// Resolves an intent summary to at most `top_k` candidates. Degrades to
    /// an empty list when no index is attached or the query fails; callers
    /// treat that as "no anchor available", not as an error.
    pub async fn resolve(
        &self,
        intent_summary: &str,
        top_k: usize,
        hard_anchors: &BTreeSet<String>,
    ) -> Vec<AnchorCandidate> {
        let Some(index) = &self.index else {
            log::debug!("no vector index attached, resolving to empty candidate list");
            return Vec::new();
        };

        let hits = match index.query(intent_summary, self.config.pool_size).await {
            Ok(hits) => hits,
            Err(error) => {
                log::warn!("vector index query failed: {error:#}");
                return Vec::new();
            }
        };

        let mut anchored: Vec<AnchorCandidate> = Vec::new();
        let mut unanchored: Vec<AnchorCandidate> = Vec::new();
        for hit in hits {
            let has_hard_anchor = contains_any_anchor(&hit, hard_anchors);
            let candidate = AnchorCandidate {
                asset_id: hit.asset_id,
                similarity_score: hit.similarity,
                has_hard_anchor,
            };
            if has_hard_anchor {
                anchored.push(candidate);
            } else {
                unanchored.push(candidate);
            }
        }

        anchored.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
        unanchored.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));

        log::debug!(
            "resolved {} anchored and {} unanchored candidates for top_k {top_k}",
            anchored.len(),
            unanchored.len(),
        );

        let mut ranked = anchored;
        ranked.extend(unanchored);
        ranked.truncate(top_k);
        ranked
    }
}

fn contains_any_anchor(hit: &IndexHit, hard_anchors: &BTreeSet<String>) -> bool {
    hard_anchors
        .iter()
        .any(|anchor| contains_case_insensitive_word(&hit.document, anchor))
}

/// Whole-word containment, case-insensitive. "BCI" matches "a BCI trial" and
/// "bci-targeted" but not "subclinical".
fn contains_case_insensitive_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let haystack_lower = haystack.to_lowercase();
    let needle_lower = needle.to_lowercase();
    let haystack_bytes = haystack_lower.as_bytes();
    let needle_len = needle_lower.len();

    let mut search_from = 0;
    while let Some(offset) = haystack_lower[search_from..].find(&needle_lower) {
        let start = search_from + offset;
        let end = start + needle_len;
        let boundary_before = start == 0 || !is_word_byte(haystack_bytes[start - 1]);
        let boundary_after =
            end == haystack_bytes.len() || !is_word_byte(haystack_bytes[end]);
        if boundary_before && boundary_after {
            return true;
        }
        // Advance by the full width of the character at `start` so the next
        // slice stays on a char boundary for multibyte text.
        let width = haystack_lower[start..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        search_from = start + width;
    }
    false
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemoryIndex;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    /// Index double returning a fixed hit list regardless of the query text.
    struct FixedIndex {
        hits: Vec<IndexHit>,
    }

    #[async_trait]
    impl VectorIndex for FixedIndex {
        async fn query(&self, _text: &str, pool_size: usize) -> anyhow::Result<Vec<IndexHit>> {
            let mut hits = self.hits.clone();
            hits.truncate(pool_size);
            Ok(hits)
        }
    }

    struct FailingIndex;

    #[async_trait]
    impl VectorIndex for FailingIndex {
        async fn query(&self, _text: &str, _pool_size: usize) -> anyhow::Result<Vec<IndexHit>> {
            anyhow::bail!("index unavailable")
        }
    }

    fn hit(asset_id: &str, similarity: f32, document: &str) -> IndexHit {
        IndexHit {
            asset_id: asset_id.to_string(),
            similarity,
            document: document.to_string(),
        }
    }

    fn anchors(terms: &[&str]) -> BTreeSet<String> {
        terms.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn word_boundary_matching() {
        assert!(contains_case_insensitive_word("a BCI trial", "bci"));
        assert!(contains_case_insensitive_word("bci-targeted device", "BCI"));
        assert!(!contains_case_insensitive_word("subclinical findings", "bci"));
        assert!(!contains_case_insensitive_word("abciximab", "bci"));
        assert!(!contains_case_insensitive_word("anything", ""));
    }

    #[test]
    fn word_boundary_matching_handles_multibyte_text() {
        // A multibyte anchor that occurs only inside larger words must scan
        // past each rejected occurrence without splitting a character.
        assert!(!contains_case_insensitive_word("naïveté café", "é"));
        assert!(contains_case_insensitive_word("naïveté café", "café"));
        assert!(contains_case_insensitive_word("une naïveté rare", "naïveté"));
        assert!(contains_case_insensitive_word("Æther trial", "æther"));
        assert!(!contains_case_insensitive_word("protégé", "égé"));
    }

    #[tokio::test]
    async fn without_index_resolves_empty() {
        let resolver = AnchorResolver::new(ResolverConfig::default());
        let candidates = resolver.resolve("motor restoration", 5, &anchors(&[])).await;
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn index_failure_degrades_to_empty() {
        let resolver =
            AnchorResolver::new(ResolverConfig::default()).with_index(Arc::new(FailingIndex));
        let candidates = resolver.resolve("motor restoration", 5, &anchors(&[])).await;
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn anchored_candidate_outranks_higher_similarity() {
        // A large pool where one low-similarity document carries the hard
        // anchor term; it must surface first in the top slice.
        let mut hits = Vec::new();
        for n in 0..100 {
            let similarity = 0.99 - n as f32 * 0.005;
            if n == 47 {
                hits.push(hit(
                    "asset-bci",
                    similarity,
                    "early feasibility BCI implant cohort",
                ));
            } else {
                hits.push(hit(
                    &format!("asset-{n}"),
                    similarity,
                    "general neuromodulation program",
                ));
            }
        }

        let resolver = AnchorResolver::new(ResolverConfig::default())
            .with_index(Arc::new(FixedIndex { hits }));
        let candidates = resolver
            .resolve("implantable neural interface", 5, &anchors(&["BCI"]))
            .await;

        assert_eq!(candidates.len(), 5);
        assert_eq!(candidates[0].asset_id, "asset-bci");
        assert!(candidates[0].has_hard_anchor);
        assert!(!candidates[1].has_hard_anchor);
        assert_eq!(candidates[1].asset_id, "asset-0");
    }

    #[tokio::test]
    async fn multiple_anchored_candidates_keep_similarity_order() {
        let hits = vec![
            hit("asset-a", 0.9, "plain document"),
            hit("asset-b", 0.5, "mentions AGID token"),
            hit("asset-c", 0.7, "also an AGID match"),
        ];
        let resolver = AnchorResolver::new(ResolverConfig::default())
            .with_index(Arc::new(FixedIndex { hits }));
        let candidates = resolver.resolve("query", 3, &anchors(&["agid"])).await;

        let ids: Vec<&str> = candidates.iter().map(|c| c.asset_id.as_str()).collect();
        assert_eq!(ids, vec!["asset-c", "asset-b", "asset-a"]);
    }

    #[tokio::test]
    async fn empty_anchor_set_ranks_by_similarity_alone() {
        let hits = vec![
            hit("asset-low", 0.2, "doc"),
            hit("asset-high", 0.9, "doc"),
            hit("asset-mid", 0.6, "doc"),
        ];
        let resolver = AnchorResolver::new(ResolverConfig::default())
            .with_index(Arc::new(FixedIndex { hits }));
        let candidates = resolver.resolve("query", 2, &anchors(&[])).await;

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].asset_id, "asset-high");
        assert_eq!(candidates[1].asset_id, "asset-mid");
        assert!(candidates.iter().all(|c| !c.has_hard_anchor));
    }

    #[tokio::test]
    async fn multibyte_anchors_resolve_without_panicking() {
        let hits = vec![
            hit("asset-plain", 0.9, "naïveté café cohort"),
            hit("asset-cafe", 0.5, "open café study"),
        ];
        let resolver = AnchorResolver::new(ResolverConfig::default())
            .with_index(Arc::new(FixedIndex { hits }));

        // Occurs only inside larger words: no anchored candidate.
        let unanchored = resolver.resolve("query", 2, &anchors(&["é"])).await;
        assert_eq!(unanchored.len(), 2);
        assert!(unanchored.iter().all(|c| !c.has_hard_anchor));

        // A standalone multibyte word anchors as usual.
        let anchored = resolver.resolve("query", 2, &anchors(&["café"])).await;
        assert_eq!(anchored[0].asset_id, "asset-plain");
        assert!(anchored[0].has_hard_anchor);
        assert!(anchored[1].has_hard_anchor);
    }

    #[tokio::test]
    async fn memory_index_end_to_end() {
        let mut index = MemoryIndex::new();
        index.insert("asset-motor", "implantable BCI for motor restoration");
        index.insert("asset-speech", "speech decoding interface study");
        index.insert("asset-gene", "unrelated gene therapy program");

        let resolver = AnchorResolver::new(ResolverConfig::default())
            .with_index(Arc::new(index));
        let candidates = resolver
            .resolve("motor restoration interface", 2, &anchors(&["BCI"]))
            .await;

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].asset_id, "asset-motor");
        assert!(candidates[0].has_hard_anchor);
    }
}
