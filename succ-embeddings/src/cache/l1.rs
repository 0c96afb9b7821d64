//! L1 in-memory embedding cache (moka). Sub-microsecond lookups, keyed
//! by blake3 content hash.

use std::time::Duration;

use moka::sync::Cache;

pub struct L1Cache {
    cache: Cache<String, Vec<f32>>,
}

impl L1Cache {
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_idle(Duration::from_secs(3600))
            .time_to_live(Duration::from_secs(86400))
            .build();
        Self { cache }
    }

    pub fn get(&self, content_hash: &str) -> Option<Vec<f32>> {
        self.cache.get(content_hash)
    }

    pub fn insert(&self, content_hash: String, embedding: Vec<f32>) {
        self.cache.insert(content_hash, embedding);
    }

    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

impl Default for L1Cache {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let cache = L1Cache::new(100);
        let hash = "abc123".to_string();
        let vec = vec![1.0, 2.0, 3.0];
        cache.insert(hash.clone(), vec.clone());
        assert_eq!(cache.get(&hash), Some(vec));
    }

    #[test]
    fn miss_returns_none() {
        let cache = L1Cache::new(100);
        assert_eq!(cache.get("nonexistent"), None);
    }

    #[test]
    fn clear_empties_cache() {
        let cache = L1Cache::new(100);
        cache.insert("a".to_string(), vec![1.0]);
        cache.insert("b".to_string(), vec![2.0]);
        cache.clear();
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), None);
    }
}
