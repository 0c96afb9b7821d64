//! Knowledge graph (C7): typed edges between memories, auto-linking,
//! proximity linking, LLM relation classification, degree centrality,
//! and deterministic community detection (spec.md §4.7).

pub mod auto_link;
pub mod centrality;
pub mod community;
pub mod proximity;
pub mod relation_classification;

pub use auto_link::auto_link;
pub use centrality::compute as compute_centrality;
pub use community::{detect as detect_communities, filter_min_size};
