//! Invariant auto-detection (spec.md §4.6): a multilingual rule-language
//! regex scan, plus an optional embedding comparison against a cached
//! set of canonical invariant phrases.

use std::sync::LazyLock;

use regex::Regex;

use succ_core::traits::embedding::cosine_similarity;

/// English/Latin-script rule markers: word-boundary-matched.
static RULE_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(must|never|always|mandatory|shall not|forbidden|required to)\b").expect("static regex")
});

/// Non-Latin-script rule markers: matched as substrings, since `\b`
/// word-boundary semantics don't apply cleanly to CJK/Cyrillic text.
const NON_LATIN_RULE_MARKERS: &[&str] =
    &["всегда", "никогда", "должен", "обязательно", "必须", "一定要", "禁止", "不能"];

pub fn has_rule_language(content: &str) -> bool {
    RULE_WORDS.is_match(content) || NON_LATIN_RULE_MARKERS.iter().any(|m| content.contains(m))
}

/// True if `embedding` is within `threshold` cosine similarity of any
/// canonical invariant reference phrase.
pub fn matches_canonical_invariant(embedding: &[f32], canonical_refs: &[Vec<f32>], threshold: f64) -> bool {
    canonical_refs
        .iter()
        .any(|reference| cosine_similarity(embedding, reference) >= threshold)
}

/// Combined detector: either signal alone is sufficient.
pub fn detect_invariant(content: &str, embedding: Option<&[f32]>, canonical_refs: &[Vec<f32>], threshold: f64) -> bool {
    has_rule_language(content)
        || embedding.is_some_and(|e| matches_canonical_invariant(e, canonical_refs, threshold))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_english_rule_word() {
        assert!(has_rule_language("You must never commit directly to main"));
    }

    #[test]
    fn detects_non_latin_rule_marker() {
        assert!(has_rule_language("необходимо всегда проверять токен"));
    }

    #[test]
    fn plain_observation_has_no_rule_language() {
        assert!(!has_rule_language("the build took 40 seconds today"));
    }

    #[test]
    fn similarity_above_threshold_flags_invariant() {
        let refs = vec![vec![1.0, 0.0]];
        assert!(matches_canonical_invariant(&[1.0, 0.0], &refs, 0.55));
    }

    #[test]
    fn similarity_below_threshold_does_not_flag() {
        let refs = vec![vec![1.0, 0.0]];
        assert!(!matches_canonical_invariant(&[0.0, 1.0], &refs, 0.55));
    }
}
