/// Storage-layer errors (C1), modeled after the teacher's `StorageError`.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("sqlite error: {message}")]
    Sqlite { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("connection pool exhausted: {active_connections} active connections")]
    PoolExhausted { active_connections: usize },

    #[error("transaction failed: {reason}")]
    TransactionFailed { reason: String },
}

/// Retrieval subsystem errors (C4/C5).
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("no results found for query")]
    NoResults,

    #[error("search failed: {reason}")]
    SearchFailed { reason: String },

    #[error("bm25 index rebuild failed for corpus {corpus}: {reason}")]
    IndexRebuildFailed { corpus: String, reason: String },
}

/// Knowledge-graph errors (C7).
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("link already exists between {source_id} and {target_id}")]
    DuplicateEdge { source_id: String, target_id: String },

    #[error("invalid relation: {reason}")]
    InvalidRelation { reason: String },

    #[error("graph inconsistency: {details}")]
    Inconsistency { details: String },
}

/// Idle-pipeline errors (C8).
#[derive(Debug, thiserror::Error)]
pub enum IdleError {
    #[error("job already running: {job}")]
    AlreadyRunning { job: String },

    #[error("job timed out after {elapsed_secs}s: {job}")]
    TimedOut { job: String, elapsed_secs: u64 },

    #[error("merge failed: {reason}")]
    MergeFailed { reason: String },
}

/// Checkpoint export/import errors (C9).
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("schema version {found} is newer than engine's {supported}")]
    SchemaTooNew { found: u32, supported: u32 },

    #[error("malformed checkpoint: {reason}")]
    Malformed { reason: String },

    #[error("link endpoint missing after id remap: {memory_id}")]
    DanglingLink { memory_id: String },
}

/// Sensitive-filter errors (C10).
#[derive(Debug, thiserror::Error)]
pub enum PrivacyError {
    #[error("content blocked: {finding} in field {field}")]
    Blocked { field: String, finding: String },
}

/// Embedding-provider errors (C2).
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("embedding provider {provider} unavailable")]
    ProviderUnavailable { provider: String },

    #[error("embedding inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("failed to load model at {path}: {reason}")]
    ModelLoadFailed { path: String, reason: String },
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("failed to parse config at {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}
