//! # succ-core
//!
//! Foundation crate for the succ memory engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod memory;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::SuccConfig;
pub use errors::{SuccError, SuccResult};
pub use memory::{Memory, MemoryType, QualityFactors};
