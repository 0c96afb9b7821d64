//! Individual quality dimensions. Each produces a score in `[0, 1]`; the
//! engine combines them into the overall quality score.

use std::sync::LazyLock;

use regex::Regex;

/// Identifier-like tokens: `snake_case`, `camelCase`/`PascalCase`, and
/// path-like fragments (`src/foo.rs`, `a/b.py`).
static RE_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[a-zA-Z_][a-zA-Z0-9_]*(?:_[a-zA-Z0-9]+)+\b|\b[a-z]+[A-Z][a-zA-Z0-9]*\b|\b[\w.\-]+/[\w./\-]+\b")
        .expect("static regex")
});

const FILLER_WORDS: &[&str] = &[
    "the", "a", "an", "is", "was", "were", "very", "just", "really", "basically", "actually",
    "stuff", "thing", "things", "kind", "sort", "maybe", "probably", "like", "okay", "ok",
];

/// Scores content length: too short to carry information, or unbounded
/// long-form text, both get penalized relative to a comfortable middle.
pub fn length_score(content: &str) -> f64 {
    let len = content.trim().len();
    if len < 10 {
        return 0.1;
    }
    (len as f64 / 200.0).min(1.0)
}

/// Fraction of words that look like identifiers, file paths, or call
/// expressions — content tied to concrete code reads as higher quality
/// than vague prose.
pub fn identifier_density_score(content: &str) -> f64 {
    let word_count = content.split_whitespace().count().max(1);
    let identifier_count = RE_IDENTIFIER.find_iter(content).count();
    (identifier_count as f64 / word_count as f64 * 2.0).min(1.0)
}

/// `1 - filler_word_ratio`: penalizes hedging/filler-heavy prose.
pub fn signal_to_noise_score(content: &str) -> f64 {
    let words: Vec<String> = content
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return 0.0;
    }
    let filler_count = words.iter().filter(|w| FILLER_WORDS.contains(&w.as_str())).count();
    (1.0 - filler_count as f64 / words.len() as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_scores_low_on_length() {
        assert!(length_score("ok") < 0.2);
    }

    #[test]
    fn identifier_heavy_content_scores_higher() {
        let code_like = "fixed the null_pointer_exception in src/handlers/auth.rs by checking userToken";
        let prose = "it was kind of a thing that was basically just very weird stuff";
        assert!(identifier_density_score(code_like) > identifier_density_score(prose));
    }

    #[test]
    fn filler_heavy_content_scores_lower_signal() {
        let filler = "it was just kind of a thing, basically really very stuff";
        let signal = "authentication now rejects expired refresh tokens before dispatch";
        assert!(signal_to_noise_score(signal) > signal_to_noise_score(filler));
    }
}
