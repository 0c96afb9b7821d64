//! Temporal validity, confidence decay, and retention-sweep eligibility.
//!
//! `Memory::is_valid_at` (succ-core) already covers the point-in-time
//! validity check from spec.md §3. This crate owns the decay formula
//! used by the Memory Core's priority score (spec.md §4.6) and the
//! archival-eligibility check used by retention sweeps (spec.md §7).

pub mod archival;
pub mod decay;

pub use archival::{evaluate_archival, ArchivalDecision};
pub use decay::confidence_decayed;
