//! # Triage Resolver
//!
//! Identifier-anchoring resolver: maps a semantic intent summary to a ranked
//! list of opaque asset identifiers via similarity search over an injected
//! vector index, then re-ranks the pool so candidates carrying a literal
//! hard-anchor term are never displaced by higher raw similarity.

mod index;
mod resolver;

pub use index::{IndexHit, MemoryIndex, VectorIndex};
pub use resolver::AnchorResolver;
