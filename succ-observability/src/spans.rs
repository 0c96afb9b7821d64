//! Span definitions per operation: retrieval, write path, idle jobs,
//! embedding, graph refinement. Each carries duration and key metadata
//! via the `tracing` crate.

/// Create a retrieval span.
#[macro_export]
macro_rules! retrieval_span {
    ($query:expr, $corpus:expr) => {
        tracing::info_span!("succ.retrieval", query = %$query, corpus = ?$corpus)
    };
}

/// Create a memory write-path span.
#[macro_export]
macro_rules! write_span {
    ($memory_type:expr) => {
        tracing::info_span!("succ.write", memory_type = ?$memory_type)
    };
}

/// Create an idle-job span.
#[macro_export]
macro_rules! idle_job_span {
    ($job:expr) => {
        tracing::info_span!("succ.idle", job = %$job)
    };
}

/// Create an embedding span.
#[macro_export]
macro_rules! embedding_span {
    ($provider:expr, $dimension:expr) => {
        tracing::info_span!("succ.embedding", provider = %$provider, dimension = $dimension)
    };
}

/// Create a graph-refinement span.
#[macro_export]
macro_rules! graph_span {
    ($operation:expr) => {
        tracing::info_span!("succ.graph", operation = %$operation)
    };
}

/// Span names as constants for programmatic use (e.g. log filtering).
pub mod names {
    pub const RETRIEVAL: &str = "succ.retrieval";
    pub const WRITE: &str = "succ.write";
    pub const IDLE: &str = "succ.idle";
    pub const EMBEDDING: &str = "succ.embedding";
    pub const GRAPH: &str = "succ.graph";
}

/// Installs the global tracing subscriber: env-filterable, JSON on the
/// daemon, human-readable on the short-lived tool process.
pub fn init(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        let _ = subscriber.json().try_init();
    } else {
        let _ = subscriber.try_init();
    }
}
