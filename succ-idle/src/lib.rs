//! Idle-time pipeline (C8): four disjoint jobs dispatched by the
//! daemon when no foreground request is in flight (spec.md §4.8).
//! Consolidation and graph refinement are synchronous; session
//! summary, reflection, and precompute are asynchronous.

pub mod consolidation;
pub mod precompute;
pub mod reflection;
pub mod scheduler;
pub mod session_summary;

pub use consolidation::{consolidate, ConsolidationReport};
pub use precompute::precompute_briefing;
pub use reflection::{reflect_cluster, ReflectionReport};
pub use scheduler::{run_guarded, JobGuard};
pub use session_summary::{summarize_session, SessionSummaryReport};
