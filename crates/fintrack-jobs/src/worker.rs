//! Worker pool that executes queued jobs.

use crate::error::{JobError, JobResult};
use crate::job::{Job, JobContext, JobData};
use crate::metrics::{JobMetrics, WorkerMetrics};
use crate::queue::JobQueue;
use futures::future::BoxFuture;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, Semaphore};
use tokio::time::{interval, timeout};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Type-erased job handler stored in the dispatch table.
pub type JobHandler =
    Box<dyn Fn(JobData, JobContext) -> BoxFuture<'static, Result<(), JobError>> + Send + Sync>;

/// Worker pool tuning.
#[derive(Debug, Clone)]
pub struct WorkerPoolConfig {
    /// Jobs executed concurrently.
    pub concurrency: usize,
    /// Queues polled, in priority order.
    pub queues: Vec<String>,
    /// Timeout for jobs that do not set their own.
    pub job_timeout: Duration,
    /// Sleep between polls when the queues are empty.
    pub poll_interval: Duration,
    /// How often delayed jobs are promoted and stale ones reclaimed.
    pub maintenance_interval: Duration,
    /// How long shutdown waits for in-flight jobs.
    pub shutdown_timeout: Duration,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            queues: vec!["default".to_string()],
            job_timeout: Duration::from_secs(300),
            poll_interval: Duration::from_millis(100),
            maintenance_interval: Duration::from_secs(1),
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl From<&fintrack_config::JobsConfig> for WorkerPoolConfig {
    fn from(config: &fintrack_config::JobsConfig) -> Self {
        Self {
            concurrency: config.worker_concurrency.max(1),
            queues: vec!["default".to_string()],
            job_timeout: Duration::from_secs(config.job_timeout_secs),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            maintenance_interval: Duration::from_secs(1),
            shutdown_timeout: Duration::from_secs(config.shutdown_timeout_secs),
        }
    }
}

/// Pulls jobs from a [`JobQueue`] and runs registered handlers.
///
/// Each job executes in its own task so a panicking or hung handler
/// takes down only that job; the queue then retries or dead-letters it
/// like any other failure.
pub struct WorkerPool {
    id: String,
    queue: Arc<dyn JobQueue>,
    config: WorkerPoolConfig,
    handlers: RwLock<HashMap<String, JobHandler>>,
    shutdown_tx: broadcast::Sender<()>,
    running: AtomicBool,
    jobs_processed: Arc<AtomicU64>,
    jobs_failed: Arc<AtomicU64>,
}

impl WorkerPool {
    pub fn new(queue: Arc<dyn JobQueue>, config: WorkerPoolConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            id: format!("pool-{}", Uuid::new_v4()),
            queue,
            config,
            handlers: RwLock::new(HashMap::new()),
            shutdown_tx,
            running: AtomicBool::new(false),
            jobs_processed: Arc::new(AtomicU64::new(0)),
            jobs_failed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Registers the handler for a job type, wiring its lifecycle hooks
    /// around the handler future.
    pub fn register<J, F>(&self, handler: F)
    where
        J: Job + Clone,
        F: Fn(J, JobContext) -> BoxFuture<'static, Result<(), JobError>> + Send + Sync + 'static,
    {
        let wrapped: JobHandler = Box::new(move |data: JobData, ctx: JobContext| {
            match data.deserialize::<J>() {
                Ok(job) => {
                    let fut = handler(job.clone(), ctx.clone());
                    Box::pin(async move {
                        job.before_run(&ctx);
                        let result = fut.await;
                        match &result {
                            Ok(()) => job.after_run(&ctx),
                            Err(error) => {
                                job.on_failure(&ctx, error);
                                if ctx.is_last_attempt() {
                                    job.on_dead_letter(&ctx, error);
                                }
                            }
                        }
                        result
                    })
                }
                Err(e) => Box::pin(async move { Err(e) }),
            }
        });
        self.handlers.write().insert(J::NAME.to_string(), wrapped);
        debug!(job = J::NAME, "Registered job handler");
    }

    /// Runs the pool until [`stop`](Self::stop) is called.
    pub async fn start(&self) -> JobResult<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(JobError::Worker("Worker pool already running".to_string()));
        }
        info!(
            pool_id = %self.id,
            concurrency = self.config.concurrency,
            queues = ?self.config.queues,
            "Starting worker pool"
        );
        WorkerMetrics::update_workers(&self.id, 0, self.config.concurrency);

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let maintenance = self.spawn_maintenance();

        loop {
            let permit = tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!(pool_id = %self.id, "Received shutdown signal");
                    break;
                }
                permit = Arc::clone(&semaphore).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let queues: Vec<&str> = self.config.queues.iter().map(String::as_str).collect();
            match self.queue.dequeue(&queues, &self.id).await {
                Ok(Some(job_data)) => {
                    let Some(handler_future) = self.handler_future(&job_data) else {
                        error!(job = %job_data.name, job_id = %job_data.id, "No handler registered for job");
                        let error = JobError::Configuration(format!(
                            "No handler registered for job: {}",
                            job_data.name
                        ));
                        if let Err(e) = self.queue.fail(&job_data.id, &error).await {
                            error!(job_id = %job_data.id, error = %e, "Failed to record job failure");
                        }
                        self.jobs_failed.fetch_add(1, Ordering::Relaxed);
                        drop(permit);
                        continue;
                    };

                    WorkerMetrics::update_workers(
                        &self.id,
                        self.config.concurrency - semaphore.available_permits(),
                        self.config.concurrency,
                    );

                    let queue = Arc::clone(&self.queue);
                    let default_timeout = self.config.job_timeout;
                    let jobs_processed = Arc::clone(&self.jobs_processed);
                    let jobs_failed = Arc::clone(&self.jobs_failed);
                    tokio::spawn(async move {
                        Self::run_job(
                            queue,
                            job_data,
                            handler_future,
                            default_timeout,
                            jobs_processed,
                            jobs_failed,
                        )
                        .await;
                        drop(permit);
                    });
                }
                Ok(None) => {
                    drop(permit);
                    tokio::time::sleep(self.config.poll_interval).await;
                }
                Err(e) => {
                    drop(permit);
                    error!(error = %e, "Failed to dequeue job");
                    tokio::time::sleep(self.config.poll_interval).await;
                }
            }
        }

        maintenance.abort();

        // Give in-flight jobs a window to finish before reporting stopped.
        let drained = timeout(self.config.shutdown_timeout, async {
            while semaphore.available_permits() < self.config.concurrency {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        })
        .await;
        if drained.is_err() {
            warn!(pool_id = %self.id, "Shutdown timeout reached with jobs still in flight");
        }

        self.running.store(false, Ordering::SeqCst);
        WorkerMetrics::update_workers(&self.id, 0, self.config.concurrency);
        info!(
            pool_id = %self.id,
            processed = self.jobs_processed.load(Ordering::Relaxed),
            failed = self.jobs_failed.load(Ordering::Relaxed),
            "Worker pool stopped"
        );
        Ok(())
    }

    /// Signals the pool to stop picking up work.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(());
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn jobs_processed(&self) -> u64 {
        self.jobs_processed.load(Ordering::Relaxed)
    }

    pub fn jobs_failed(&self) -> u64 {
        self.jobs_failed.load(Ordering::Relaxed)
    }

    fn handler_future(
        &self,
        job_data: &JobData,
    ) -> Option<BoxFuture<'static, Result<(), JobError>>> {
        let ctx = job_data.to_context(&self.id);
        let handlers = self.handlers.read();
        handlers
            .get(&job_data.name)
            .map(|handler| handler(job_data.clone(), ctx))
    }

    async fn run_job(
        queue: Arc<dyn JobQueue>,
        job_data: JobData,
        handler_future: BoxFuture<'static, Result<(), JobError>>,
        default_timeout: Duration,
        jobs_processed: Arc<AtomicU64>,
        jobs_failed: Arc<AtomicU64>,
    ) {
        let started = Instant::now();
        let job_timeout = if job_data.timeout_secs > 0 {
            Duration::from_secs(job_data.timeout_secs)
        } else {
            default_timeout
        };

        // The handler runs in its own task so a panic unwinds there and
        // surfaces as a JoinError instead of killing the worker loop.
        let mut handle = tokio::spawn(handler_future);
        let result = match timeout(job_timeout, &mut handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(JobError::Panicked(panic_message(join_error))),
            Err(_) => {
                handle.abort();
                Err(JobError::Timeout(job_timeout.as_secs()))
            }
        };

        match result {
            Ok(()) => {
                debug!(job_id = %job_data.id, job = %job_data.name, "Job completed");
                JobMetrics::job_completed(&job_data.queue, &job_data.name, started.elapsed());
                if let Err(e) = queue.complete(&job_data.id).await {
                    error!(job_id = %job_data.id, error = %e, "Failed to record job completion");
                }
                jobs_processed.fetch_add(1, Ordering::Relaxed);
            }
            Err(error) => {
                warn!(
                    job_id = %job_data.id,
                    job = %job_data.name,
                    attempt = job_data.attempt,
                    error = %error,
                    "Job failed"
                );
                if matches!(error, JobError::Timeout(_)) {
                    JobMetrics::job_timed_out(&job_data.queue, &job_data.name);
                }
                JobMetrics::job_failed(
                    &job_data.queue,
                    &job_data.name,
                    error.kind(),
                    started.elapsed(),
                );
                if let Err(e) = queue.fail(&job_data.id, &error).await {
                    error!(job_id = %job_data.id, error = %e, "Failed to record job failure");
                }
                jobs_failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn spawn_maintenance(&self) -> tokio::task::JoinHandle<()> {
        let queue = Arc::clone(&self.queue);
        let period = self.config.maintenance_interval;
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        tokio::spawn(async move {
            let mut ticker = interval(period);
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = queue.maintain().await {
                            warn!(error = %e, "Queue maintenance failed");
                        }
                    }
                }
            }
        })
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

fn panic_message(error: tokio::task::JoinError) -> String {
    match error.try_into_panic() {
        Ok(payload) => {
            if let Some(message) = payload.downcast_ref::<&str>() {
                (*message).to_string()
            } else if let Some(message) = payload.downcast_ref::<String>() {
                message.clone()
            } else {
                "unknown panic payload".to_string()
            }
        }
        Err(_) => "job task was cancelled".to_string(),
    }
}
