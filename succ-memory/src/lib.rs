//! Memory contracts and the working-memory pipeline (C6): dedup,
//! quality gate, invariant detection, the correction protocol, and
//! priority-ranked working-set assembly (spec.md §4.6).

pub mod correction;
pub mod forget;
pub mod invariant;
pub mod priority;
pub mod working_set;
pub mod write_path;

pub use correction::correct;
pub use forget::forget;
pub use invariant::detect_invariant;
pub use priority::{priority_score, type_weight};
pub use working_set::build_working_set;
pub use write_path::{apply_correction_if_requested, WriteOutcome, WritePipeline, WriteRequest};
