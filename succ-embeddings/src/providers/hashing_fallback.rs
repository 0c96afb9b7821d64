//! Hashing-based fallback embedder.
//!
//! Generates fixed-dimension vectors from term frequency scores hashed
//! into buckets. No model file, no network call — always available,
//! including air-gapped environments. Last link in the degradation chain.

use std::collections::HashMap;

use succ_core::errors::SuccResult;

use super::Provider;

pub struct HashingFallback {
    dimensions: usize,
}

impl HashingFallback {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn hash_term(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h as usize) % dims
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|s| s.len() >= 2)
            .map(|s| s.to_lowercase())
            .collect()
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        if tokens.is_empty() {
            return vec![0.0; self.dimensions];
        }

        let mut tf: HashMap<String, f32> = HashMap::new();
        for tok in &tokens {
            *tf.entry(tok.clone()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        let mut vec = vec![0.0f32; self.dimensions];
        for (term, count) in &tf {
            let freq = count / total;
            let idf = 1.0 + (term.len() as f32).ln();
            let bucket = Self::hash_term(term, self.dimensions);
            vec[bucket] += freq * idf;
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

impl Provider for HashingFallback {
    fn embed(&self, text: &str) -> SuccResult<Vec<f32>> {
        Ok(self.vectorize(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashing-fallback"
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_zero_vector() {
        let p = HashingFallback::new(16);
        let v = p.embed("").unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn same_text_is_deterministic() {
        let p = HashingFallback::new(32);
        assert_eq!(p.embed("hello world").unwrap(), p.embed("hello world").unwrap());
    }

    #[test]
    fn output_has_configured_dimensions() {
        let p = HashingFallback::new(64);
        assert_eq!(p.embed("any text here").unwrap().len(), 64);
    }

    #[test]
    fn always_available() {
        assert!(HashingFallback::new(8).is_available());
    }
}
