//! Lowercased word-boundary tokenization, no stemming (spec.md §4.4).

use bm25::Tokenizer;

#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_non_alphanumeric_and_lowercases() {
        let tokens = WordTokenizer.tokenize("fn get_user_by_id(id: i32) -> User");
        assert!(tokens.contains(&"user".to_string()));
        assert!(tokens.contains(&"id".to_string()));
        assert!(!tokens.contains(&"User".to_string()));
    }

    #[test]
    fn does_not_stem() {
        let tokens = WordTokenizer.tokenize("running runs");
        assert!(tokens.contains(&"running".to_string()));
        assert!(tokens.contains(&"runs".to_string()));
    }
}
