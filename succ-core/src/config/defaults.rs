pub const DEFAULT_EMBEDDING_DIMENSION: usize = 384;
pub const DEFAULT_MAX_MEMORIES_TO_PROCESS: usize = 200;
pub const DEFAULT_IDLE_TIMEOUT_SECONDS: u64 = 25;
pub const DEFAULT_KEEP_THRESHOLD_DAYS: u64 = 90;
pub const DEFAULT_DELETE_THRESHOLD_DAYS: u64 = 365;
