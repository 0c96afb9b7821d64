//! Context-aware confidence adjustment for privacy pattern matches.
//!
//! Adjusts the base confidence of a detected pattern based on the
//! surrounding context, to reduce false positives in code.

/// Context signals that can adjust pattern confidence.
#[derive(Debug, Clone, Default)]
pub struct ScoringContext {
    /// File path (if known) — used for test-file/.env detection.
    pub file_path: Option<String>,
    pub in_comment: bool,
    pub is_placeholder: bool,
    pub sensitive_variable: bool,
}

const TEST_FILE_ADJUSTMENT: f64 = -0.20;
const COMMENT_ADJUSTMENT: f64 = -0.30;
const ENV_FILE_ADJUSTMENT: f64 = 0.10;
const SENSITIVE_VAR_ADJUSTMENT: f64 = 0.10;

/// Matches below this are dropped outright.
pub const MIN_CONFIDENCE_THRESHOLD: f64 = 0.40;

/// Adjust the base confidence of a pattern match given its context.
/// Returns `None` if the match should be dropped entirely (placeholder).
pub fn adjust_confidence(base_confidence: f64, ctx: &ScoringContext) -> Option<f64> {
    if ctx.is_placeholder {
        return None;
    }

    let mut adjusted = base_confidence;

    if let Some(ref path) = ctx.file_path {
        let lower = path.to_lowercase();
        if is_test_file(&lower) {
            adjusted += TEST_FILE_ADJUSTMENT;
        }
        if is_env_file(&lower) {
            adjusted += ENV_FILE_ADJUSTMENT;
        }
    }

    if ctx.in_comment {
        adjusted += COMMENT_ADJUSTMENT;
    }

    if ctx.sensitive_variable {
        adjusted += SENSITIVE_VAR_ADJUSTMENT;
    }

    adjusted = adjusted.clamp(0.0, 1.0);

    if adjusted < MIN_CONFIDENCE_THRESHOLD {
        return None;
    }

    Some(adjusted)
}

fn is_test_file(path: &str) -> bool {
    path.contains("test")
        || path.contains("spec")
        || path.contains("__tests__")
        || path.contains("_test.")
        || path.contains(".test.")
        || path.contains("_spec.")
        || path.contains(".spec.")
        || path.ends_with("_test.rs")
        || path.ends_with("_test.go")
}

fn is_env_file(path: &str) -> bool {
    path.ends_with(".env")
        || path.ends_with(".env.local")
        || path.ends_with(".env.production")
        || path.ends_with(".env.development")
        || path.contains(".env.")
}

/// Detects whether a matched string looks like a well-known placeholder.
pub fn looks_like_placeholder(matched_text: &str) -> bool {
    let lower = matched_text.to_lowercase();

    let exact_indicators = ["<", ">", "${", "{{"];
    if exact_indicators.iter().any(|p| lower.contains(p)) {
        return true;
    }

    if lower.contains('@') {
        let email_placeholders = [
            "example.com",
            "example.org",
            "test.com",
            "dummy.com",
            "fake.com",
            "sample.com",
            "placeholder.com",
        ];
        return email_placeholders.iter().any(|p| lower.contains(p));
    }

    let full_match_placeholders = ["your_", "my_", "replace_me", "change_me", "todo", "fixme"];
    full_match_placeholders.iter().any(|p| lower.starts_with(p))
}

/// Detects whether a match offset falls inside a code comment (`//`,
/// `/* ... */`, `#`, `--`).
pub fn is_in_comment(text: &str, match_start: usize) -> bool {
    let line_start = text[..match_start].rfind('\n').map_or(0, |p| p + 1);
    let line_prefix = &text[line_start..match_start];

    if line_prefix.contains("//") || line_prefix.contains('#') || line_prefix.contains("--") {
        return true;
    }

    if let Some(block_start) = text[..match_start].rfind("/*") {
        let block_end = text[block_start..match_start].find("*/");
        if block_end.is_none() {
            return true;
        }
    }

    false
}

/// Detects whether the ~60 characters before the match suggest a sensitive
/// variable assignment (`password = ...`, `api_key: ...`, etc).
pub fn has_sensitive_variable_context(text: &str, match_start: usize) -> bool {
    let prefix_start = match_start.saturating_sub(60);
    let prefix = text[prefix_start..match_start].to_lowercase();
    let sensitive_names = [
        "password",
        "passwd",
        "pwd",
        "secret",
        "token",
        "api_key",
        "apikey",
        "auth",
        "credential",
        "private_key",
        "access_key",
    ];
    sensitive_names.iter().any(|name| prefix.contains(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_always_dropped() {
        let ctx = ScoringContext { is_placeholder: true, ..Default::default() };
        assert_eq!(adjust_confidence(0.99, &ctx), None);
    }

    #[test]
    fn comment_lowers_confidence_below_threshold() {
        let ctx = ScoringContext { in_comment: true, ..Default::default() };
        assert_eq!(adjust_confidence(0.5, &ctx), None);
    }

    #[test]
    fn sensitive_variable_boosts_confidence() {
        let ctx = ScoringContext { sensitive_variable: true, ..Default::default() };
        assert_eq!(adjust_confidence(0.5, &ctx), Some(0.6));
    }

    #[test]
    fn recognizes_common_placeholders() {
        assert!(looks_like_placeholder("user@example.com"));
        assert!(looks_like_placeholder("<your_api_key>"));
        assert!(!looks_like_placeholder("jsmith@realcompany.io"));
    }
}
