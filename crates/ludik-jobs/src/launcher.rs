//! Launches jobs on background tasks with per-kind overlap suppression.

use crate::error::{JobError, JobResult};
use crate::status::{JobKind, JobStatus};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

/// One tracked job run.
#[derive(Debug, Clone)]
pub struct JobRun {
    pub id: Uuid,
    pub kind: JobKind,
    pub status: JobStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Handle to a launched job. Dropping it detaches the run; the launcher
/// keeps tracking its status either way.
pub struct JobHandle<T> {
    pub id: Uuid,
    pub kind: JobKind,
    join: JoinHandle<JobResult<T>>,
}

impl<T> JobHandle<T> {
    /// Wait for the run to finish and return its result.
    pub async fn wait(self) -> JobResult<T> {
        self.join
            .await
            .map_err(|e| JobError::Panicked(e.to_string()))?
    }
}

/// Default number of run records retained before old terminal runs are
/// pruned.
const DEFAULT_RUN_HISTORY: usize = 64;

/// Spawns jobs and refuses to start a second run of a kind that is still
/// in flight. Run records are kept in memory; finished runs beyond the
/// history limit are pruned oldest-first, and a restart forgets history.
#[derive(Clone)]
pub struct JobLauncher {
    runs: Arc<RwLock<HashMap<Uuid, JobRun>>>,
    history_limit: usize,
}

impl Default for JobLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl JobLauncher {
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_RUN_HISTORY)
    }

    /// A launcher retaining at most `limit` run records. In-flight runs
    /// are never pruned regardless of the limit.
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            runs: Arc::new(RwLock::new(HashMap::new())),
            history_limit: limit.max(1),
        }
    }

    /// Launch a job on a background task.
    ///
    /// Fails with [`JobError::AlreadyRunning`] when a run of the same kind
    /// has not yet finished. The run record is updated when the task
    /// completes, whether the handle is awaited or dropped.
    pub async fn try_launch<F, T>(
        &self,
        kind: JobKind,
        job: F,
    ) -> JobResult<JobHandle<T>>
    where
        F: std::future::Future<Output = JobResult<T>> + Send + 'static,
        T: Send + 'static,
    {
        let id = Uuid::new_v4();
        {
            let mut runs = self.runs.write().await;
            if runs
                .values()
                .any(|r| r.kind == kind && !r.status.is_terminal())
            {
                return Err(JobError::AlreadyRunning { kind });
            }
            runs.insert(
                id,
                JobRun {
                    id,
                    kind,
                    status: JobStatus::Starting,
                    started_at: Utc::now(),
                    finished_at: None,
                },
            );
            Self::prune(&mut runs, self.history_limit);
        }

        info!(job_id = %id, kind = %kind, "Job launched");
        let runs = self.runs.clone();
        let join = tokio::spawn(async move {
            if let Some(run) = runs.write().await.get_mut(&id) {
                run.status = JobStatus::Running;
            }
            let result = job.await;
            let status = match &result {
                Ok(_) => {
                    info!(job_id = %id, kind = %kind, "Job completed");
                    JobStatus::Completed
                }
                Err(e) => {
                    error!(job_id = %id, kind = %kind, error = %e, "Job failed");
                    JobStatus::Failed(e.to_string())
                }
            };

            let mut runs = runs.write().await;
            if let Some(run) = runs.get_mut(&id) {
                run.status = status;
                run.finished_at = Some(Utc::now());
            }
            result
        });

        Ok(JobHandle { id, kind, join })
    }

    /// Drop the oldest terminal runs until the registry fits the limit.
    fn prune(runs: &mut HashMap<Uuid, JobRun>, limit: usize) {
        if runs.len() <= limit {
            return;
        }
        let mut terminal: Vec<(Uuid, DateTime<Utc>)> = runs
            .values()
            .filter(|r| r.status.is_terminal())
            .map(|r| (r.id, r.started_at))
            .collect();
        terminal.sort_by_key(|(_, started_at)| *started_at);
        for (id, _) in terminal {
            if runs.len() <= limit {
                break;
            }
            runs.remove(&id);
        }
    }

    /// Status of one run, if known.
    pub async fn status(&self, id: Uuid) -> Option<JobStatus> {
        self.runs.read().await.get(&id).map(|r| r.status.clone())
    }

    /// Snapshot of all tracked runs, most recent first.
    pub async fn runs(&self) -> Vec<JobRun> {
        let mut runs: Vec<JobRun> = self.runs.read().await.values().cloned().collect();
        runs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_launch_and_wait_records_completion() {
        let launcher = JobLauncher::new();
        let handle = launcher
            .try_launch(JobKind::DirectorySync, async { Ok(41 + 1) })
            .await
            .unwrap();
        let id = handle.id;

        assert_eq!(handle.wait().await.unwrap(), 42);
        assert_eq!(launcher.status(id).await, Some(JobStatus::Completed));
    }

    #[tokio::test]
    async fn test_run_moves_through_starting_then_running() {
        let launcher = JobLauncher::new();
        let (release, gate) = oneshot::channel::<()>();

        let handle = launcher
            .try_launch(JobKind::DirectorySync, async move {
                let _ = gate.await;
                Ok(())
            })
            .await
            .unwrap();
        let id = handle.id;

        // The spawned task has not been polled yet.
        assert_eq!(launcher.status(id).await, Some(JobStatus::Starting));

        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        assert_eq!(launcher.status(id).await, Some(JobStatus::Running));

        release.send(()).unwrap();
        handle.wait().await.unwrap();
        assert_eq!(launcher.status(id).await, Some(JobStatus::Completed));
    }

    #[tokio::test]
    async fn test_old_terminal_runs_are_pruned() {
        let launcher = JobLauncher::with_history_limit(2);
        let mut last_id = None;
        for _ in 0..4 {
            let handle = launcher
                .try_launch(JobKind::DirectorySync, async { Ok(()) })
                .await
                .unwrap();
            last_id = Some(handle.id);
            handle.wait().await.unwrap();
        }

        assert!(launcher.runs().await.len() <= 2);
        // The most recent run is always retained.
        assert!(launcher.status(last_id.unwrap()).await.is_some());
    }

    #[tokio::test]
    async fn test_in_flight_runs_survive_pruning() {
        let launcher = JobLauncher::with_history_limit(1);
        let (release, gate) = oneshot::channel::<()>();

        let first = launcher
            .try_launch(JobKind::DirectorySync, async move {
                let _ = gate.await;
                Ok(())
            })
            .await
            .unwrap();
        let first_id = first.id;

        for _ in 0..3 {
            launcher
                .try_launch(JobKind::SubscriptionExpiry, async { Ok(()) })
                .await
                .unwrap()
                .wait()
                .await
                .unwrap();
        }

        assert!(launcher.status(first_id).await.is_some());
        release.send(()).unwrap();
        first.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_overlapping_runs_of_same_kind_are_refused() {
        let launcher = JobLauncher::new();
        let (release, gate) = oneshot::channel::<()>();

        let first = launcher
            .try_launch(JobKind::DirectorySync, async move {
                let _ = gate.await;
                Ok(())
            })
            .await
            .unwrap();

        let refused = launcher
            .try_launch(JobKind::DirectorySync, async { Ok(()) })
            .await;
        assert!(matches!(
            refused,
            Err(JobError::AlreadyRunning { kind: JobKind::DirectorySync })
        ));

        // A different kind runs concurrently just fine.
        launcher
            .try_launch(JobKind::SubscriptionExpiry, async { Ok(()) })
            .await
            .unwrap()
            .wait()
            .await
            .unwrap();

        release.send(()).unwrap();
        first.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_failure_is_recorded() {
        let launcher = JobLauncher::new();
        let handle = launcher
            .try_launch(JobKind::SubscriptionExpiry, async {
                Err::<(), _>(JobError::SkipLimitExceeded { skipped: 3, limit: 2 })
            })
            .await
            .unwrap();
        let id = handle.id;

        assert!(handle.wait().await.is_err());
        assert!(matches!(
            launcher.status(id).await,
            Some(JobStatus::Failed(_))
        ));
    }

    #[tokio::test]
    async fn test_finished_run_frees_the_kind() {
        let launcher = JobLauncher::new();
        launcher
            .try_launch(JobKind::DirectorySync, async { Ok(()) })
            .await
            .unwrap()
            .wait()
            .await
            .unwrap();

        launcher
            .try_launch(JobKind::DirectorySync, async { Ok(()) })
            .await
            .unwrap()
            .wait()
            .await
            .unwrap();
    }
}
