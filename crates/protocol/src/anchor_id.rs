use sha2::{Digest, Sha256};

/// Hex digits kept from the digest. Wide enough to make collisions a
/// non-concern at the scale of a single deployment's asset space.
const HASH_WIDTH: usize = 16;

/// Derives a deterministic, fixed-width, content-addressed opaque identifier.
///
/// The token refers to a resource without exposing its underlying identity in
/// transit: only the namespace and kind are readable, the raw identifier is
/// folded into a truncated SHA-256 digest. Every caller in the workspace goes
/// through this one function so identifiers stay byte-for-byte comparable.
///
/// ```
/// use triage_protocol::anchor_id;
///
/// let id = anchor_id("trial", "nct", "NCT-06578901");
/// assert!(id.starts_with("trial-nct-"));
/// assert_eq!(id, anchor_id("trial", "nct", "NCT-06578901"));
/// ```
pub fn anchor_id(namespace: &str, kind: &str, raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(namespace.as_bytes());
    hasher.update(b":");
    hasher.update(kind.as_bytes());
    hasher.update(b":");
    hasher.update(raw.as_bytes());
    let digest = hasher.finalize();

    let mut hex = String::with_capacity(HASH_WIDTH);
    for byte in digest.iter().take(HASH_WIDTH / 2) {
        hex.push_str(&format!("{byte:02x}"));
    }
    format!("{namespace}-{kind}-{hex}")
}
