//! Tool catalog (spec.md §4.12): each tool names the minimum profile
//! that unlocks it. `core` (8), `standard` (20), `full` (31) are
//! cumulative — `standard` includes every `core` tool, `full` includes
//! everything. Dispatch itself lives in `server::McpServer::call_tool`.

use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Profile {
    Core,
    Standard,
    Full,
}

impl Profile {
    pub fn name(self) -> &'static str {
        match self {
            Profile::Core => "core",
            Profile::Standard => "standard",
            Profile::Full => "full",
        }
    }

    pub fn parse(name: &str) -> Option<Profile> {
        match name {
            "core" => Some(Profile::Core),
            "standard" => Some(Profile::Standard),
            "full" => Some(Profile::Full),
            _ => None,
        }
    }
}

pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub profile: Profile,
    pub input_schema: fn() -> Value,
}

/// The fixed catalog, grouped by the profile that first unlocks each
/// tool. Profiles are cumulative: `full` sees all 31, `standard` sees
/// the first 20, `core` the first 8. Dispatch is by tool name, in
/// `server::McpServer::call_tool`.
pub fn catalog() -> Vec<ToolSpec> {
    vec![
        // --- core (8) ---
        ToolSpec { name: "remember", description: "Write a new memory.", profile: Profile::Core, input_schema: remember_schema },
        ToolSpec { name: "recall", description: "Hybrid search over memories.", profile: Profile::Core, input_schema: search_schema },
        ToolSpec { name: "search", description: "Hybrid search over indexed documents.", profile: Profile::Core, input_schema: search_schema },
        ToolSpec { name: "search_code", description: "Hybrid search over indexed code chunks.", profile: Profile::Core, input_schema: search_schema },
        ToolSpec { name: "health", description: "Daemon liveness and uptime.", profile: Profile::Core, input_schema: empty_schema },
        ToolSpec { name: "status", description: "Engine status: memory counts, index freshness, service health.", profile: Profile::Core, input_schema: empty_schema },
        ToolSpec { name: "session_register", description: "Register a new session for activity tracking.", profile: Profile::Core, input_schema: session_register_schema },
        ToolSpec { name: "session_activity", description: "Record activity on a session (auto-registers unknown ids).", profile: Profile::Core, input_schema: session_activity_schema },
        // --- standard (+12 = 20) ---
        ToolSpec { name: "session_unregister", description: "Drop a session from the registry.", profile: Profile::Standard, input_schema: session_id_schema },
        ToolSpec { name: "services", description: "Per-service health breakdown.", profile: Profile::Standard, input_schema: empty_schema },
        ToolSpec { name: "analyze_status", description: "Whether idle consolidation is currently running.", profile: Profile::Standard, input_schema: empty_schema },
        ToolSpec { name: "analyze_trigger", description: "Run one consolidation pass synchronously.", profile: Profile::Standard, input_schema: empty_schema },
        ToolSpec { name: "analyze_index", description: "Stale-file report for the document or code corpus.", profile: Profile::Standard, input_schema: analyze_index_schema },
        ToolSpec { name: "forget", description: "Delete a memory by id; fails with PinnedMemory on pinned memories.", profile: Profile::Standard, input_schema: memory_id_schema },
        ToolSpec { name: "correct", description: "Mark one memory as superseding another.", profile: Profile::Standard, input_schema: correct_schema },
        ToolSpec { name: "link", description: "Create an explicit graph edge between two memories.", profile: Profile::Standard, input_schema: link_schema },
        ToolSpec { name: "neighbors", description: "List a memory's graph neighbors.", profile: Profile::Standard, input_schema: memory_id_schema },
        ToolSpec { name: "checkpoint_export", description: "Export the store to a checkpoint file.", profile: Profile::Standard, input_schema: checkpoint_export_schema },
        ToolSpec { name: "checkpoint_import", description: "Restore the store from a checkpoint file.", profile: Profile::Standard, input_schema: checkpoint_import_schema },
        ToolSpec { name: "working_set", description: "Assemble the priority-ranked working set for a session budget.", profile: Profile::Standard, input_schema: working_set_schema },
        ToolSpec { name: "quality_score", description: "Score a piece of text against the quality gate without writing it.", profile: Profile::Standard, input_schema: quality_score_schema },
        // --- full (+11 = 31) ---
        ToolSpec { name: "analyze_start", description: "Start the background idle consolidation loop.", profile: Profile::Full, input_schema: empty_schema },
        ToolSpec { name: "analyze_stop", description: "Stop the background idle consolidation loop.", profile: Profile::Full, input_schema: empty_schema },
        ToolSpec { name: "degradation_status", description: "Current provider degradation chain state.", profile: Profile::Full, input_schema: empty_schema },
        ToolSpec { name: "invariant_check", description: "Test a string for rule-language invariant markers.", profile: Profile::Full, input_schema: invariant_check_schema },
        ToolSpec { name: "priority_score", description: "Compute the priority score for an existing memory.", profile: Profile::Full, input_schema: memory_id_schema },
        ToolSpec { name: "reinforce", description: "Bump a memory's access count and last-accessed timestamp.", profile: Profile::Full, input_schema: memory_id_schema },
        ToolSpec { name: "graph_centrality", description: "Report the configured graph centrality boost weight.", profile: Profile::Full, input_schema: empty_schema },
        ToolSpec { name: "soul_read", description: "Read the project identity document (soul.md).", profile: Profile::Full, input_schema: empty_schema },
        ToolSpec { name: "soul_write", description: "Overwrite the project identity document (soul.md).", profile: Profile::Full, input_schema: soul_write_schema },
        ToolSpec { name: "retention_sweep", description: "Apply temporal decay retention thresholds to stale memories.", profile: Profile::Full, input_schema: empty_schema },
        ToolSpec { name: "config_get", description: "Read the merged effective configuration.", profile: Profile::Full, input_schema: empty_schema },
    ]
}

pub fn for_profile(profile: Profile) -> Vec<ToolSpec> {
    catalog().into_iter().filter(|t| t.profile <= profile).collect()
}

fn empty_schema() -> Value {
    json!({ "type": "object", "properties": {}, "additionalProperties": false })
}

fn search_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": { "type": "string" },
            "limit": { "type": "integer", "minimum": 1 },
            "threshold": { "type": "number" },
            "tags": { "type": "array", "items": { "type": "string" } },
            "since": { "type": "string", "format": "date-time" },
        },
        "required": ["query"],
    })
}

fn remember_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "content": { "type": "string" },
            "tags": { "type": "array", "items": { "type": "string" } },
            "source": { "type": "string" },
            "memory_type": { "type": "string", "enum": ["observation", "decision", "learning", "error", "pattern", "dead_end"] },
            "valid_from": { "type": "string", "format": "date-time" },
            "valid_until": { "type": "string", "format": "date-time" },
            "supersedes": { "type": "integer" },
        },
        "required": ["content"],
    })
}

fn session_register_schema() -> Value {
    json!({
        "type": "object",
        "properties": { "session_id": { "type": "string" }, "transcript_path": { "type": "string" } },
        "required": ["session_id"],
    })
}

fn session_activity_schema() -> Value {
    json!({
        "type": "object",
        "properties": { "session_id": { "type": "string" }, "had_user_prompt": { "type": "boolean" } },
        "required": ["session_id"],
    })
}

fn session_id_schema() -> Value {
    json!({ "type": "object", "properties": { "session_id": { "type": "string" } }, "required": ["session_id"] })
}

fn memory_id_schema() -> Value {
    json!({ "type": "object", "properties": { "id": { "type": "integer" } }, "required": ["id"] })
}

fn correct_schema() -> Value {
    json!({
        "type": "object",
        "properties": { "superseded_id": { "type": "integer" }, "superseding_id": { "type": "integer" } },
        "required": ["superseded_id", "superseding_id"],
    })
}

fn link_schema() -> Value {
    json!({
        "type": "object",
        "properties": { "from_id": { "type": "integer" }, "to_id": { "type": "integer" }, "weight": { "type": "number" } },
        "required": ["from_id", "to_id"],
    })
}

fn analyze_index_schema() -> Value {
    json!({ "type": "object", "properties": { "corpus": { "type": "string", "enum": ["document", "code"] } } })
}

fn checkpoint_export_schema() -> Value {
    json!({ "type": "object", "properties": { "path": { "type": "string" } }, "required": ["path"] })
}

fn checkpoint_import_schema() -> Value {
    json!({ "type": "object", "properties": { "path": { "type": "string" } }, "required": ["path"] })
}

fn working_set_schema() -> Value {
    json!({ "type": "object", "properties": { "token_budget": { "type": "integer", "minimum": 1 } }, "required": ["token_budget"] })
}

fn quality_score_schema() -> Value {
    json!({ "type": "object", "properties": { "content": { "type": "string" } }, "required": ["content"] })
}

fn invariant_check_schema() -> Value {
    json!({ "type": "object", "properties": { "content": { "type": "string" } }, "required": ["content"] })
}

fn soul_write_schema() -> Value {
    json!({ "type": "object", "properties": { "content": { "type": "string" } }, "required": ["content"] })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_sizes_match_spec() {
        assert_eq!(for_profile(Profile::Core).len(), 8);
        assert_eq!(for_profile(Profile::Standard).len(), 20);
        assert_eq!(for_profile(Profile::Full).len(), 31);
    }

    #[test]
    fn full_profile_is_superset_of_core() {
        let core_names: Vec<_> = for_profile(Profile::Core).iter().map(|t| t.name).collect();
        let full_names: Vec<_> = for_profile(Profile::Full).iter().map(|t| t.name).collect();
        assert!(core_names.iter().all(|n| full_names.contains(n)));
    }
}
