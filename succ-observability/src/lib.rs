//! Ambient observability: health/status reporting, degradation
//! tracking, and structured tracing spans. Carried regardless of
//! spec.md Non-goals around outer metrics surfaces, since logging and
//! health reporting are part of the ambient stack (spec.md §4.11).

pub mod degradation;
pub mod health;
pub mod spans;

pub use degradation::{DegradationTracker, RecoveryStatus, TrackedDegradation};
pub use health::{HealthResponse, HealthStatus, StatusResponse};
pub use spans::init as init_tracing;
