//! Job manager: the cancellable lifecycle of running crawls
//!
//! Tracks at most one running crawl per caller-supplied identifier. The
//! registry (job id to cancellation token plus a start generation) is the
//! only shared mutable state in the crate; every read and write happens
//! under one mutex, and the guard is never held across an await. `start`
//! does an atomic check-and-insert so that two concurrent starts for the
//! same id cannot both launch, and the spawned task removes its own entry
//! on termination. Cleanup is generation-checked: after a stop-then-restart
//! of the same id, the stale task finds a newer generation in the registry
//! and leaves the successor's entry alone.
//!
//! Completion is observed through a callback invoked exactly once per job
//! with a fully-formed [`CrawlResult`] - on success, failure, and
//! cancellation alike - on the crawl task's own execution context.

use crate::crawler::Crawler;
use crate::report::CrawlResult;
use crate::{Config, JobError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;

/// Caller-supplied job identifier
pub type JobId = u64;

/// One tracked job: its cancellation token plus the generation stamped at
/// `start`. A job id can be reused after a stop; the generation is what a
/// finishing task compares before cleaning up, so a stale task from an
/// earlier start can never remove a successor's entry.
struct JobEntry {
    generation: u64,
    token: CancellationToken,
}

/// Launches, tracks, and cancels crawl jobs
///
/// Must be used inside a tokio runtime; `start` spawns the crawl as an
/// independent task and returns immediately. `JobManager` is cheap to clone
/// and all clones share the same registry.
#[derive(Clone)]
pub struct JobManager {
    crawler: Arc<Crawler>,
    jobs: Arc<Mutex<HashMap<JobId, JobEntry>>>,
    next_generation: Arc<AtomicU64>,
}

impl JobManager {
    /// Builds a manager whose jobs all crawl under the given configuration
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            crawler: Arc::new(Crawler::new(config)?),
            jobs: Arc::new(Mutex::new(HashMap::new())),
            next_generation: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Starts a crawl for `id`, delivering the result to `on_complete`
    ///
    /// Fails with [`JobError::AlreadyRunning`] when a crawl for the same id
    /// is still in flight. On success the caller returns immediately; the
    /// callback fires exactly once, after the job's registry entry has been
    /// removed, so `is_running(id)` is already false by the time it runs.
    pub fn start<F>(&self, id: JobId, raw_url: &str, on_complete: F) -> Result<(), JobError>
    where
        F: FnOnce(CrawlResult) + Send + 'static,
    {
        let token = CancellationToken::new();
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);

        {
            let mut jobs = lock_registry(&self.jobs);
            if jobs.contains_key(&id) {
                return Err(JobError::AlreadyRunning(id));
            }
            jobs.insert(
                id,
                JobEntry {
                    generation,
                    token: token.clone(),
                },
            );
        }

        tracing::info!("Starting crawl job {} for '{}'", id, raw_url.trim());

        let crawler = Arc::clone(&self.crawler);
        let jobs = Arc::clone(&self.jobs);
        let url = raw_url.to_string();

        tokio::spawn(async move {
            let result = crawler.crawl(&url, &token).await;

            // Natural completion can race a stop() and even a subsequent
            // restart of the same id. Only remove the entry if it is still
            // this task's own generation; a successor's entry stays intact.
            {
                let mut jobs = lock_registry(&jobs);
                if jobs
                    .get(&id)
                    .is_some_and(|entry| entry.generation == generation)
                {
                    jobs.remove(&id);
                }
            }

            tracing::info!(
                "Crawl job {} finished ({})",
                id,
                result
                    .error
                    .as_deref()
                    .unwrap_or("ok")
            );

            on_complete(result);
        });

        Ok(())
    }

    /// Cancels the running crawl for `id`
    ///
    /// Fails with [`JobError::NotRunning`] when no crawl is tracked for the
    /// id. Cancellation is cooperative: the task observes the token at its
    /// next suspension point and still delivers its (cancelled) result
    /// through the completion callback.
    pub fn stop(&self, id: JobId) -> Result<(), JobError> {
        let entry = lock_registry(&self.jobs)
            .remove(&id)
            .ok_or(JobError::NotRunning(id))?;

        tracing::info!("Stopping crawl job {}", id);
        entry.token.cancel();

        Ok(())
    }

    /// Pure query: whether a crawl for `id` is currently tracked
    pub fn is_running(&self, id: JobId) -> bool {
        lock_registry(&self.jobs).contains_key(&id)
    }

    /// Number of currently running jobs
    pub fn running_count(&self) -> usize {
        lock_registry(&self.jobs).len()
    }
}

/// Locks the registry, recovering from a poisoned mutex
///
/// The registry only ever holds plain map operations, so a poisoned lock
/// cannot leave it in a half-updated state; the inner value is still valid.
fn lock_registry(
    jobs: &Mutex<HashMap<JobId, JobEntry>>,
) -> MutexGuard<'_, HashMap<JobId, JobEntry>> {
    jobs.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn manager() -> JobManager {
        JobManager::new(&Config::default()).unwrap()
    }

    #[tokio::test]
    async fn test_stop_unknown_job_is_not_running_error() {
        let manager = manager();
        assert_eq!(manager.stop(42), Err(JobError::NotRunning(42)));
    }

    #[tokio::test]
    async fn test_is_running_on_empty_registry() {
        let manager = manager();
        assert!(!manager.is_running(1));
        assert_eq!(manager.running_count(), 0);
    }

    #[tokio::test]
    async fn test_callback_fires_for_invalid_url() {
        let manager = manager();
        let (tx, rx) = oneshot::channel();

        manager
            .start(1, "   ", move |result| {
                let _ = tx.send(result);
            })
            .unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), rx)
            .await
            .expect("callback not invoked")
            .unwrap();

        assert!(result.error.is_some());
        assert!(!manager.is_running(1));
    }

    #[tokio::test]
    async fn test_registry_entry_removed_before_callback() {
        let manager = manager();
        let (tx, rx) = oneshot::channel();

        let probe = manager.clone();
        manager
            .start(7, "not a url ::", move |result| {
                // By the callback contract the job is already untracked.
                let _ = tx.send((probe.is_running(7), result));
            })
            .unwrap();

        let (running_during_callback, _result) =
            tokio::time::timeout(Duration::from_secs(5), rx)
                .await
                .expect("callback not invoked")
                .unwrap();

        assert!(!running_during_callback);
    }
}
