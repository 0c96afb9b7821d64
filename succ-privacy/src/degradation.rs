//! Graceful degradation for the privacy engine: if a regex pattern fails
//! to compile, it's skipped and the gap is recorded rather than failing
//! the whole sanitization pass.

#[derive(Debug, Clone)]
pub struct PatternFailure {
    pub pattern_name: String,
    pub category: String,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct DegradationTracker {
    failures: Vec<PatternFailure>,
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_failure(&mut self, pattern_name: &str, category: &str, error: &str) {
        self.failures.push(PatternFailure {
            pattern_name: pattern_name.to_string(),
            category: category.to_string(),
            error: error.to_string(),
        });
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn failures(&self) -> &[PatternFailure] {
        &self.failures
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}
