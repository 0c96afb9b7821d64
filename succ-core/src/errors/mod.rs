mod causes;

pub use causes::{
    CheckpointError, ConfigError, EmbeddingError, GraphError, IdleError, PrivacyError,
    RetrievalError, StorageError,
};

/// Result alias used throughout the workspace.
pub type SuccResult<T> = Result<T, SuccError>;

/// Cross-cutting wire error kind, per spec.md §6. Every component error
/// enum is wrapped by exactly one variant here so callers at the daemon
/// and tool-surface boundary can map to a stable set of error kinds
/// without knowing which component raised it.
#[derive(Debug, thiserror::Error)]
pub enum SuccError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("network error: {0}")]
    Network(String),

    #[error(transparent)]
    Privacy(#[from] PrivacyError),

    #[error("below quality threshold: {reason}")]
    QualityTooLow { reason: String },

    #[error("memory {id} is pinned and cannot be deleted or invalidated")]
    PinnedMemory { id: String },

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Idle(#[from] IdleError),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    #[error("dependency failure: {0}")]
    Dependency(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SuccError {
    /// The stable wire error kind name from spec.md §6, for clients that
    /// need to branch on kind without matching the full enum.
    pub fn kind(&self) -> &'static str {
        match self {
            SuccError::Validation(_) => "Validation",
            SuccError::NotFound(_) => "NotFound",
            SuccError::Storage(StorageError::DimensionMismatch { .. }) => "Validation",
            SuccError::Storage(_) => "Storage",
            SuccError::Network(_) => "Network",
            SuccError::Privacy(_) => "Sensitive",
            SuccError::QualityTooLow { .. } => "QualityTooLow",
            SuccError::PinnedMemory { .. } => "PinnedMemory",
            SuccError::Retrieval(_) => "Storage",
            SuccError::Embedding(EmbeddingError::DimensionMismatch { .. }) => "Validation",
            SuccError::Embedding(_) => "Dependency",
            SuccError::Graph(_) => "Storage",
            SuccError::Idle(_) => "Dependency",
            SuccError::Checkpoint(_) => "Storage",
            SuccError::Dependency(_) => "Dependency",
            SuccError::Config(_) => "Config",
        }
    }
}
