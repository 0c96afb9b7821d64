//! stdio transport: one JSON-RPC request per line in, one frame out.
//! The tool process "serves exactly one request at a time" (spec.md
//! §5): requests are handled sequentially off a blocking stdin loop.

use std::io::{self, BufRead, BufReader, Write};

use super::types::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use crate::server::McpServer;

pub struct StdioTransport;

impl StdioTransport {
    pub async fn run(server: &mut McpServer) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let reader = BufReader::new(stdin.lock());

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
                Ok(request) => {
                    let id = request.id.clone();
                    match server.handle_request(request).await {
                        Some(outcome) => outcome,
                        None => continue, // notification, no response expected
                    }
                    .unwrap_or_else(|e| JsonRpcResponse::error(id, e))
                }
                Err(_) => JsonRpcResponse::error(None, JsonRpcError::parse_error()),
            };

            let serialized = serde_json::to_string(&response)
                .unwrap_or_else(|_| r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"internal error"}}"#.to_string());
            writeln!(stdout, "{serialized}")?;
            stdout.flush()?;
        }
        Ok(())
    }
}
