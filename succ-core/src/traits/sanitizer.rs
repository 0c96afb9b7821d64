use serde::{Deserialize, Serialize};

use crate::errors::SuccResult;

/// A single redaction applied during sanitization.
#[derive(Debug, Clone, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct Redaction {
    pub category: String,
    pub placeholder: String,
    pub start: usize,
    pub end: usize,
    pub confidence: f64,
}

/// Result of sanitization with metadata about what was redacted.
#[derive(Debug, Clone, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct SanitizedText {
    pub has_sensitive: bool,
    pub text: String,
    pub redactions: Vec<Redaction>,
}

/// Sensitive-content detection and redaction (C10).
pub trait Sanitizer: Send + Sync {
    /// Scan `text`, returning redaction findings and a redacted copy.
    /// Whether callers block on `has_sensitive` or use the redacted
    /// text is a config decision (`sensitive_auto_redact`), not this
    /// trait's concern.
    fn sanitize(&self, text: &str) -> SuccResult<SanitizedText>;
}
