use moka::sync::Cache;
use tiktoken_rs::CoreBPE;

/// Content-hash-cached token counter. One instance per process; cheap
/// to clone (the cache and the BPE table are both internally shared).
pub struct TokenCounter {
    bpe: CoreBPE,
    cache: Cache<String, usize>,
}

impl TokenCounter {
    /// Build a counter over the `cl100k_base` encoding with a bounded
    /// LRU-ish cache (moka) keyed by blake3 content hash.
    pub fn new() -> Self {
        Self {
            bpe: tiktoken_rs::cl100k_base().expect("cl100k_base encoding is statically bundled"),
            cache: Cache::new(10_000),
        }
    }

    /// Count tokens in `text`, caching by content hash so repeated
    /// counts of identical text are O(1) after the first call.
    pub fn count(&self, text: &str) -> usize {
        let key = blake3::hash(text.as_bytes()).to_hex().to_string();
        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }
        let count = self.bpe.encode_ordinary(text).len();
        self.cache.insert(key, count);
        count
    }

    pub fn count_all<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> usize {
        texts.into_iter().map(|t| self.count(t)).sum()
    }
}

impl Default for TokenCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_counts_to_zero() {
        let counter = TokenCounter::new();
        assert_eq!(counter.count(""), 0);
    }

    #[test]
    fn repeated_text_hits_the_cache_with_same_result() {
        let counter = TokenCounter::new();
        let a = counter.count("the quick brown fox");
        let b = counter.count("the quick brown fox");
        assert_eq!(a, b);
        assert!(a > 0);
    }

    #[test]
    fn longer_text_counts_at_least_as_many_tokens() {
        let counter = TokenCounter::new();
        let short = counter.count("hello");
        let long = counter.count("hello hello hello hello hello");
        assert!(long >= short);
    }
}
