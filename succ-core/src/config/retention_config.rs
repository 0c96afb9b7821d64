use serde::{Deserialize, Serialize};

use super::defaults;

/// Retention-sweep configuration. `keep_threshold`/`delete_threshold`
/// are ages (days) past which a non-pinned memory becomes a sweep
/// candidate / deletion candidate respectively.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    pub use_temporal_decay: bool,
    pub keep_threshold_days: u64,
    pub delete_threshold_days: u64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            use_temporal_decay: true,
            keep_threshold_days: defaults::DEFAULT_KEEP_THRESHOLD_DAYS,
            delete_threshold_days: defaults::DEFAULT_DELETE_THRESHOLD_DAYS,
        }
    }
}
