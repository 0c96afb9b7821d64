//! Long-lived daemon binary (C11): binds a Unix domain socket under
//! `<project>/.succ/daemon.sock`, serves newline-delimited JSON
//! requests against the shared engine, and exits after an idle timeout
//! or when its listener goes away (spec.md §5, §6).

use std::path::PathBuf;
use std::sync::Arc;

use succ_core::config::SuccConfig;
use succ_core::errors::SuccResult;
use succ_daemon::state::AppState;
use succ_daemon::transport::{Transport, UnixTransport};
use succ_daemon::{connection, idle_timeout};
use succ_embeddings::EmbeddingEngine;
use succ_storage::StorageEngine;

#[tokio::main]
async fn main() -> SuccResult<()> {
    let json_logs = std::env::var("SUCC_LOG_JSON").map(|v| v == "1").unwrap_or(false);
    succ_observability::init_tracing(json_logs);

    let project_root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().expect("cwd must be readable"));

    let config = SuccConfig::load(&project_root)?;
    let store = StorageEngine::open(&project_root.join(".succ").join("store.db"))?;

    // `EmbeddingEngine::new` requires *a* path in local mode even though
    // a missing file just logs and falls through to the hashing
    // fallback provider — there is no bundled model, so this points at
    // an operator-supplied override or a project-local default that may
    // not exist.
    let model_path = std::env::var("SUCC_EMBEDDING_MODEL_PATH")
        .unwrap_or_else(|_| project_root.join(".succ/models/default.onnx").display().to_string());
    let embedder = EmbeddingEngine::new(&config.embedding, Some(model_path.as_str()), None)?;

    let state = Arc::new(AppState::new(project_root, config, store, embedder));

    let socket_path = state.socket_path();
    let mut transport = UnixTransport::bind(&socket_path)?;
    tracing::info!(socket = %socket_path.display(), pid = state.pid, "daemon listening");

    let idle_watch = idle_timeout::watch(state.clone());
    tokio::pin!(idle_watch);

    loop {
        tokio::select! {
            _ = &mut idle_watch => {
                tracing::info!("shutting down: idle timeout");
                break;
            }
            accepted = transport.accept() => {
                match accepted {
                    Ok(conn) => {
                        let conn_state = state.clone();
                        tokio::spawn(async move {
                            connection::handle_connection(conn_state, conn).await;
                        });
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "listener closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    let _ = std::fs::remove_file(&socket_path);
    Ok(())
}
