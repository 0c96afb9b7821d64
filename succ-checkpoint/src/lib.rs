//! Checkpoint export/import (C9, spec.md §4.9): self-describing,
//! optionally gzip-compressed project snapshots.

pub mod export;
pub mod format;
pub mod import;

pub use export::{build_checkpoint, serialize, ExportOptions};
pub use format::{BrainVaultFile, Checkpoint, CheckpointData, CheckpointStats};
pub use import::{deserialize, import_checkpoint, ImportOptions, ImportReport};
