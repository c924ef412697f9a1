use async_trait::async_trait;

/// One similarity hit from the vector index. The asset id stays opaque; the
/// document text is what hard-anchor terms are matched against.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    pub asset_id: String,
    pub similarity: f32,
    pub document: String,
}

/// Approximate nearest-neighbor retrieval boundary. The resolver treats the
/// implementation as a black box; it only requires hits ordered by
/// descending similarity.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn query(&self, text: &str, pool_size: usize) -> anyhow::Result<Vec<IndexHit>>;
}

const EMBEDDING_DIMENSION: usize = 256;

/// In-memory brute-force index over a deterministic hashed bag-of-words
/// embedding. Good enough as a test and demo substrate; persistence and real
/// ANN structures are out of scope.
#[derive(Default)]
pub struct MemoryIndex {
    entries: Vec<IndexedDocument>,
}

struct IndexedDocument {
    asset_id: String,
    document: String,
    vector: Vec<f32>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document under an opaque asset id.
    pub fn insert(&mut self, asset_id: impl Into<String>, document: impl Into<String>) {
        let document = document.into();
        let vector = embed(&document);
        self.entries.push(IndexedDocument {
            asset_id: asset_id.into(),
            document,
            vector,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn query(&self, text: &str, pool_size: usize) -> anyhow::Result<Vec<IndexHit>> {
        let query_vector = embed(text);
        let mut hits: Vec<IndexHit> = self
            .entries
            .iter()
            .map(|entry| IndexHit {
                asset_id: entry.asset_id.clone(),
                similarity: cosine_similarity(&query_vector, &entry.vector),
                document: entry.document.clone(),
            })
            .collect();
        hits.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        hits.truncate(pool_size);
        Ok(hits)
    }
}

/// Hashed bag-of-words embedding: each lowercased token increments one
/// FNV-derived bucket. Deterministic across runs and platforms.
fn embed(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; EMBEDDING_DIMENSION];
    for token in text.split_whitespace() {
        let token = token.to_lowercase();
        vector[token_bucket(&token)] += 1.0;
    }
    vector
}

fn token_bucket(token: &str) -> usize {
    // FNV-1a.
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in token.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    (hash % EMBEDDING_DIMENSION as u64) as usize
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
