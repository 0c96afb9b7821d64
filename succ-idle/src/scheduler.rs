//! Idle-job scheduling (spec.md §4.8 "Scheduling", §5 cancellation):
//! each job runs under a single-execution guard and a per-job timeout,
//! and is safe to re-run (idempotent) if cancelled mid-flight.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use succ_core::errors::{IdleError, SuccError, SuccResult};

/// Guards one job kind against concurrent re-entry. One instance per
/// job (consolidation, reflection, session_summary, precompute), held
/// by the daemon for the lifetime of the process.
pub struct JobGuard {
    running: AtomicBool,
}

impl JobGuard {
    pub fn new() -> Self {
        Self { running: AtomicBool::new(false) }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    fn acquire(&self) -> bool {
        self.running.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_ok()
    }

    fn release(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl Default for JobGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs `job` under `guard`, cancelling it if it doesn't finish within
/// `timeout_secs`. `name` identifies the job kind for error messages.
/// Returns `SuccError::Idle(AlreadyRunning)` if another instance of the
/// same job is in flight.
pub async fn run_guarded<F, T>(guard: &JobGuard, name: &str, timeout_secs: u64, job: F) -> SuccResult<T>
where
    F: Future<Output = SuccResult<T>>,
{
    if !guard.acquire() {
        return Err(SuccError::Idle(IdleError::AlreadyRunning { job: name.to_string() }));
    }

    let result = tokio::time::timeout(std::time::Duration::from_secs(timeout_secs), job).await;
    guard.release();

    match result {
        Ok(inner) => inner,
        Err(_) => Err(SuccError::Idle(IdleError::TimedOut { job: name.to_string(), elapsed_secs: timeout_secs })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_concurrent_runs() {
        let guard = JobGuard::new();
        assert!(guard.acquire());
        let result = run_guarded(&guard, "consolidation", 5, async { Ok::<_, SuccError>(()) }).await;
        assert!(matches!(result, Err(SuccError::Idle(IdleError::AlreadyRunning { .. }))));
        guard.release();
    }

    #[tokio::test]
    async fn releases_guard_after_success() {
        let guard = JobGuard::new();
        run_guarded(&guard, "consolidation", 5, async { Ok::<_, SuccError>(()) }).await.unwrap();
        assert!(!guard.is_running());
    }

    #[tokio::test]
    async fn times_out_long_running_job() {
        let guard = JobGuard::new();
        let result = run_guarded(&guard, "reflection", 0, async {
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            Ok::<_, SuccError>(())
        })
        .await;
        assert!(matches!(result, Err(SuccError::Idle(IdleError::TimedOut { .. }))));
        assert!(!guard.is_running());
    }
}
