//! Health/status reporting for the daemon router's `/health` and
//! `/api/status` endpoints (spec.md §6).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
    Down,
}

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub pid: u32,
    pub uptime_secs: u64,
    #[serde(rename = "activeSessions")]
    pub active_sessions: usize,
}

/// Per-subsystem fragments of `GET /api/status`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DaemonStatus {
    pub pid: u32,
    pub uptime_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IndexStatus {
    pub document_count: usize,
    pub code_chunk_count: usize,
    pub stale_files: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MemoryStatus {
    pub total: usize,
    pub pinned: usize,
    pub average_quality: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceStatus {
    pub name: String,
    pub healthy: bool,
    pub detail: Option<String>,
}

/// Response body for `GET /api/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub daemon: DaemonStatus,
    pub index: IndexStatus,
    pub memories: MemoryStatus,
    pub services: Vec<ServiceStatus>,
}

impl StatusResponse {
    /// Overall status derived the same way as a subsystem health
    /// rollup: any unhealthy service wins over any degraded-by-staleness
    /// condition, which wins over ok.
    pub fn overall_status(&self) -> HealthStatus {
        if self.services.iter().any(|s| !s.healthy) {
            return HealthStatus::Down;
        }
        if self.index.stale_files > 0 {
            return HealthStatus::Degraded;
        }
        HealthStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(services: Vec<ServiceStatus>, stale_files: usize) -> StatusResponse {
        StatusResponse {
            daemon: DaemonStatus::default(),
            index: IndexStatus { stale_files, ..Default::default() },
            memories: MemoryStatus::default(),
            services,
        }
    }

    #[test]
    fn all_healthy_with_no_staleness_is_ok() {
        let s = status(vec![ServiceStatus { name: "llm".into(), healthy: true, detail: None }], 0);
        assert_eq!(s.overall_status(), HealthStatus::Ok);
    }

    #[test]
    fn stale_files_degrade_status() {
        let s = status(vec![ServiceStatus { name: "llm".into(), healthy: true, detail: None }], 3);
        assert_eq!(s.overall_status(), HealthStatus::Degraded);
    }

    #[test]
    fn unhealthy_service_takes_priority_over_staleness() {
        let s = status(vec![ServiceStatus { name: "llm".into(), healthy: false, detail: None }], 3);
        assert_eq!(s.overall_status(), HealthStatus::Down);
    }
}
