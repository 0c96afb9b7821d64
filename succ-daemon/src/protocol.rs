//! Wire frame shapes for the newline-delimited JSON transport. One
//! frame in, one frame out — no streaming (spec.md §4.11).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use succ_core::errors::SuccError;

#[derive(Debug, Clone, Deserialize)]
pub struct WireRequest {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub query: HashMap<String, String>,
    #[serde(default)]
    pub body: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct WireError {
    pub kind: String,
    pub message: String,
}

impl From<&SuccError> for WireError {
    fn from(err: &SuccError) -> Self {
        Self { kind: err.kind().to_string(), message: err.to_string() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WireResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<WireError>,
}

impl WireResponse {
    pub fn ok(value: serde_json::Value) -> Self {
        Self { ok: true, value: Some(value), error: None }
    }

    pub fn err(error: &SuccError) -> Self {
        Self { ok: false, value: None, error: Some(error.into()) }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self { ok: false, value: None, error: Some(WireError { kind: "Validation".to_string(), message: message.into() }) }
    }
}
