//! Tool-protocol server binary (C12): speaks MCP over stdio, serving
//! exactly one request at a time (spec.md §5). Builds its own handle
//! onto the shared engine rather than dialing the daemon's socket —
//! "both process roles link the same engine" (spec.md §5).

mod protocol;
mod server;
mod tools;

use std::path::PathBuf;

use succ_core::config::{SuccConfig, ToolProfile};
use succ_core::errors::SuccResult;
use succ_daemon::state::AppState;
use succ_embeddings::EmbeddingEngine;
use succ_storage::StorageEngine;

use crate::protocol::stdio::StdioTransport;
use crate::server::McpServer;
use crate::tools::Profile;

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

    let model_path = std::env::var("SUCC_EMBEDDING_MODEL_PATH")
        .unwrap_or_else(|_| project_root.join(".succ/models/default.onnx").display().to_string());
    let embedder = EmbeddingEngine::new(&config.embedding, Some(model_path.as_str()), None)?;

    // `Auto` (spec.md §9 Open Question: client-identity-to-profile
    // mapping is left to the tool surface) starts at the conservative
    // `core` profile and upgrades on demand — see `tool_profile` in a
    // `tools/call` request's arguments.
    let default_profile = match config.tool_profile {
        ToolProfile::Auto => Profile::Core,
        ToolProfile::Standard => Profile::Standard,
        ToolProfile::Core => Profile::Core,
        ToolProfile::Full => Profile::Full,
    };

    let state = std::sync::Arc::new(AppState::new(project_root, config, store, embedder));
    let mut server = McpServer::new(state, default_profile);

    StdioTransport::run(&mut server).await.map_err(|e| {
        succ_core::errors::SuccError::Network(format!("stdio transport error: {e}"))
    })
}
