use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Named quality-scoring factors. A `BTreeMap` (not `HashMap`) so
/// breakdowns serialize and log in a deterministic order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct QualityFactors(pub BTreeMap<String, f64>);

impl QualityFactors {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, factor: impl Into<String>, value: f64) {
        self.0.insert(factor.into(), value);
    }

    pub fn get(&self, factor: &str) -> Option<f64> {
        self.0.get(factor).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.0.iter()
    }
}
