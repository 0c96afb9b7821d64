mod defaults;
mod embedding_config;
mod graph_config;
mod idle_config;
mod retention_config;
mod retrieval_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use embedding_config::{EmbeddingConfig, EmbeddingMode};
pub use graph_config::GraphCentralityConfig;
pub use idle_config::IdleReflectionConfig;
pub use retention_config::RetentionConfig;
pub use retrieval_config::RetrievalConfig;

use crate::constants;
use crate::errors::{ConfigError, SuccResult};

/// Tool-surface profile negotiation (C12). Open Question in spec.md §9:
/// "the implementation should expose a configurable mapping rather than
/// hard-coding" client-identity-to-profile — `ToolProfile::Auto` defers
/// that mapping to the tool surface's own config, not to this struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolProfile {
    Auto,
    Core,
    Standard,
    Full,
}

impl Default for ToolProfile {
    fn default() -> Self {
        ToolProfile::Auto
    }
}

/// The merged configuration document (spec.md §6): global
/// (`~/.succ/config.json`) then project (`<project>/.succ/config.json`),
/// field by field, project wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuccConfig {
    pub embedding: EmbeddingConfig,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub quality_threshold: f64,
    pub sensitive_filter_enabled: bool,
    pub sensitive_auto_redact: bool,
    pub idle_reflection: IdleReflectionConfig,
    pub graph_centrality: GraphCentralityConfig,
    pub retention: RetentionConfig,
    pub retrieval: RetrievalConfig,
    pub tool_profile: ToolProfile,
}

impl Default for SuccConfig {
    fn default() -> Self {
        Self {
            embedding: EmbeddingConfig::default(),
            chunk_size: constants::DEFAULT_CHUNK_SIZE,
            chunk_overlap: constants::DEFAULT_CHUNK_OVERLAP,
            quality_threshold: constants::DEFAULT_QUALITY_THRESHOLD,
            sensitive_filter_enabled: true,
            sensitive_auto_redact: true,
            idle_reflection: IdleReflectionConfig::default(),
            graph_centrality: GraphCentralityConfig::default(),
            retention: RetentionConfig::default(),
            retrieval: RetrievalConfig::default(),
            tool_profile: ToolProfile::default(),
        }
    }
}

impl SuccConfig {
    /// Load and merge `~/.succ/config.json` then `<project>/.succ/config.json`.
    /// Missing files are treated as empty documents, not errors — only a
    /// present-but-unparseable file is a `ConfigError`.
    pub fn load(project_root: &Path) -> SuccResult<Self> {
        let mut merged = serde_json::to_value(SuccConfig::default())
            .map_err(|e| ConfigError::ParseFailed {
                path: "<default>".to_string(),
                reason: e.to_string(),
            })?;

        if let Some(home) = dirs_home() {
            merge_file(&mut merged, &home.join(".succ/config.json"))?;
        }
        merge_file(&mut merged, &project_root.join(".succ/config.json"))?;

        serde_json::from_value(merged).map_err(|e| {
            ConfigError::ParseFailed {
                path: "<merged>".to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

fn dirs_home() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME").map(std::path::PathBuf::from)
}

fn merge_file(into: &mut serde_json::Value, path: &Path) -> SuccResult<()> {
    if !path.exists() {
        return Ok(());
    }
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let patch: serde_json::Value = serde_json::from_str(&text).map_err(|e| ConfigError::ParseFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    deep_merge(into, &patch);
    Ok(())
}

/// Deep-merge `patch` onto `base` in place: object fields overlay
/// recursively, everything else (scalars, arrays) replaces wholesale.
fn deep_merge(base: &mut serde_json::Value, patch: &serde_json::Value) {
    match (base, patch) {
        (serde_json::Value::Object(base_map), serde_json::Value::Object(patch_map)) => {
            for (k, v) in patch_map {
                deep_merge(base_map.entry(k.clone()).or_insert(serde_json::Value::Null), v);
            }
        }
        (base_slot, patch_val) => {
            *base_slot = patch_val.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_json() {
        let cfg = SuccConfig::default();
        let json = serde_json::to_value(&cfg).unwrap();
        let back: SuccConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back.chunk_size, cfg.chunk_size);
    }

    #[test]
    fn deep_merge_overlays_nested_fields_only() {
        let mut base = serde_json::json!({"a": {"x": 1, "y": 2}, "b": 3});
        let patch = serde_json::json!({"a": {"y": 20}});
        deep_merge(&mut base, &patch);
        assert_eq!(base["a"]["x"], 1);
        assert_eq!(base["a"]["y"], 20);
        assert_eq!(base["b"], 3);
    }
}
