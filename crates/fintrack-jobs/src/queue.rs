//! Queue abstraction and enqueue builder.

use crate::error::{JobError, JobResult};
use crate::job::{Job, JobData, JobId, JobInfo};
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Job priority. Higher priorities are dequeued first within a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Normal,
    High,
    Critical,
}

impl Priority {
    /// Numeric weight folded into the queue score.
    pub fn weight(self) -> i8 {
        match self {
            Priority::Low => -10,
            Priority::Normal => 0,
            Priority::High => 10,
            Priority::Critical => 20,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

impl From<i8> for Priority {
    fn from(weight: i8) -> Self {
        match weight {
            w if w <= -10 => Priority::Low,
            w if w < 10 => Priority::Normal,
            w if w < 20 => Priority::High,
            _ => Priority::Critical,
        }
    }
}

/// Builder for enqueueing a job with non-default options.
#[derive(Debug)]
pub struct QueuedJob<J: Job> {
    job: J,
    priority: Priority,
    delay: Option<Duration>,
    retry_policy: Option<RetryPolicy>,
}

impl<J: Job> QueuedJob<J> {
    pub fn new(job: J) -> Self {
        Self {
            job,
            priority: Priority::Normal,
            delay: None,
            retry_policy: None,
        }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Delays the first execution by the given duration.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Overrides the job type's retry policy.
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    pub fn build(self) -> JobResult<JobData> {
        let mut data = JobData::new(&self.job)?;
        data.priority = self.priority.weight();
        if let Some(policy) = self.retry_policy {
            data.max_attempts = policy.max_retries + 1;
            data.retry_policy = policy;
        }
        if let Some(delay) = self.delay {
            data.scheduled_at = Utc::now()
                + ChronoDuration::from_std(delay).unwrap_or_else(|_| ChronoDuration::zero());
        }
        Ok(data)
    }
}

/// Per-queue counters for the admin API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct QueueStats {
    pub queue: String,
    pub pending: u64,
    pub processing: u64,
    /// Delayed jobs across all queues, retries included.
    pub delayed: u64,
    pub dead_letter: u64,
    pub completed: u64,
    pub failed: u64,
}

/// Backend-agnostic job queue.
///
/// Object-safe so workers, the scheduler and request handlers can share
/// one `Arc<dyn JobQueue>`. Typed enqueueing lives in [`JobQueueExt`].
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Stores the job and places it on its queue, or on the delayed set
    /// when `scheduled_at` lies in the future.
    async fn enqueue_data(&self, data: JobData) -> JobResult<JobId>;

    /// Pops the highest-priority due job from the given queues and moves
    /// it to the processing set.
    async fn dequeue(&self, queues: &[&str], worker_id: &str) -> JobResult<Option<JobData>>;

    async fn complete(&self, job_id: &JobId) -> JobResult<()>;

    /// Records a failed attempt, scheduling a retry or dead-lettering
    /// according to the job's retry policy.
    async fn fail(&self, job_id: &JobId, error: &JobError) -> JobResult<()>;

    /// Promotes due delayed jobs, reclaims jobs whose visibility timeout
    /// expired and trims old completed entries. Returns how many jobs
    /// were moved.
    async fn maintain(&self) -> JobResult<u64>;

    async fn get_job(&self, job_id: &JobId) -> JobResult<Option<JobInfo>>;

    async fn stats(&self, queue: &str) -> JobResult<QueueStats>;

    /// Dead-lettered jobs, most recent first.
    async fn list_dlq(&self, limit: usize, offset: usize) -> JobResult<Vec<JobInfo>>;

    /// Requeues a dead-lettered job with a fresh retry budget.
    async fn retry_dlq(&self, job_id: &JobId) -> JobResult<()>;

    async fn health_check(&self) -> JobResult<()>;
}

/// Typed enqueue helpers over any [`JobQueue`].
#[async_trait]
pub trait JobQueueExt: JobQueue {
    async fn enqueue<J: Job>(&self, job: J) -> JobResult<JobId> {
        self.enqueue_data(JobData::new(&job)?).await
    }

    async fn enqueue_with<J: Job>(&self, queued: QueuedJob<J>) -> JobResult<JobId> {
        self.enqueue_data(queued.build()?).await
    }
}

impl<Q: JobQueue + ?Sized> JobQueueExt for Q {}
