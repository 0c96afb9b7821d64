//! Per-connection request loop: read one NDJSON frame, route it,
//! write one NDJSON frame back. No streaming (spec.md §4.11).

use std::sync::Arc;

use crate::protocol::{WireRequest, WireResponse};
use crate::router::route;
use crate::state::AppState;
use crate::transport::Connection;

pub async fn handle_connection(state: Arc<AppState>, mut conn: Box<dyn Connection>) {
    loop {
        let line = match conn.read_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "connection read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<WireRequest>(&line) {
            Ok(request) => {
                let outcome = route(&state, &request.method, &request.path, &request.query, &request.body).await;
                match outcome {
                    Ok(value) => WireResponse::ok(value),
                    Err(err) => WireResponse::err(&err),
                }
            }
            Err(e) => WireResponse::malformed(format!("malformed request frame: {e}")),
        };

        let Ok(serialized) = serde_json::to_string(&response) else {
            tracing::error!("failed to serialize response frame");
            break;
        };
        if let Err(e) = conn.write_line(&serialized).await {
            tracing::warn!(error = %e, "connection write failed");
            break;
        }
    }
}
