//! Job definitions and queue payloads.

use crate::error::{JobError, JobResult};
use crate::retry::RetryPolicy;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Unique job identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct JobId(String);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Execution context passed to handlers and lifecycle hooks.
#[derive(Debug, Clone)]
pub struct JobContext {
    pub job_id: JobId,
    /// Current attempt, 1-based.
    pub attempt: u32,
    pub max_attempts: u32,
    pub queue: String,
    pub scheduled_at: DateTime<Utc>,
    pub started_at: DateTime<Utc>,
    pub worker_id: String,
}

impl JobContext {
    /// Whether a failure now would exhaust the retry budget.
    pub fn is_last_attempt(&self) -> bool {
        self.attempt >= self.max_attempts
    }
}

/// A unit of background work.
///
/// Implementors are serializable payloads describing what to do; the
/// async work itself is attached when the type is registered with a
/// [`WorkerPool`](crate::worker::WorkerPool). Associated constants set
/// the queueing defaults, and the lifecycle hooks observe execution
/// without taking part in it.
pub trait Job: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Unique name workers dispatch on.
    const NAME: &'static str;

    /// Queue the job is placed on.
    const QUEUE: &'static str = "default";

    /// Retry attempts after the initial execution.
    const MAX_RETRIES: u32 = 3;

    /// Execution timeout in seconds.
    const TIMEOUT_SECS: u64 = 300;

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::exponential(Self::MAX_RETRIES)
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(Self::TIMEOUT_SECS)
    }

    /// Jobs sharing a unique key are deduplicated while one is live.
    fn unique_key(&self) -> Option<String> {
        None
    }

    /// Called just before the handler runs.
    fn before_run(&self, _ctx: &JobContext) {}

    /// Called after the handler succeeds.
    fn after_run(&self, _ctx: &JobContext) {}

    /// Called after a failed attempt, including the final one.
    fn on_failure(&self, _ctx: &JobContext, _error: &JobError) {}

    /// Called when a failure exhausts the retry budget.
    fn on_dead_letter(&self, _ctx: &JobContext, _error: &JobError) {}
}

/// Serialized job as stored in Redis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobData {
    pub id: JobId,
    pub name: String,
    pub queue: String,
    /// JSON-serialized [`Job`] payload.
    pub payload: String,
    /// Executed attempts so far.
    pub attempt: u32,
    pub max_attempts: u32,
    pub timeout_secs: u64,
    pub created_at: DateTime<Utc>,
    pub scheduled_at: DateTime<Utc>,
    pub priority: i8,
    pub retry_policy: RetryPolicy,
    pub unique_key: Option<String>,
    pub last_error: Option<String>,
}

impl JobData {
    pub fn new<J: Job>(job: &J) -> JobResult<Self> {
        let now = Utc::now();
        let retry_policy = job.retry_policy();
        Ok(Self {
            id: JobId::new(),
            name: J::NAME.to_string(),
            queue: J::QUEUE.to_string(),
            payload: serde_json::to_string(job)?,
            attempt: 0,
            max_attempts: retry_policy.max_retries + 1,
            timeout_secs: job.timeout().as_secs(),
            created_at: now,
            scheduled_at: now,
            priority: 0,
            retry_policy,
            unique_key: job.unique_key(),
            last_error: None,
        })
    }

    /// Deserializes the payload back into its job type.
    pub fn deserialize<J: Job>(&self) -> JobResult<J> {
        Ok(serde_json::from_str(&self.payload)?)
    }

    pub fn to_json(&self) -> JobResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> JobResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn increment_attempt(&mut self) {
        self.attempt += 1;
    }

    pub fn set_error(&mut self, error: &JobError) {
        self.last_error = Some(error.to_string());
    }

    pub fn to_context(&self, worker_id: &str) -> JobContext {
        JobContext {
            job_id: self.id.clone(),
            attempt: self.attempt,
            max_attempts: self.max_attempts,
            queue: self.queue.clone(),
            scheduled_at: self.scheduled_at,
            started_at: Utc::now(),
            worker_id: worker_id.to_string(),
        }
    }
}

/// Lifecycle state of a job, derived from which Redis set holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum JobStatus {
    /// Waiting on its queue.
    Pending,
    /// Delayed until its scheduled time.
    Scheduled,
    /// Picked up by a worker.
    Running,
    /// Finished successfully.
    Completed,
    /// Exhausted its retries.
    DeadLetter,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Pending => "pending",
            JobStatus::Scheduled => "scheduled",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::DeadLetter => "dead_letter",
        };
        write!(f, "{s}")
    }
}

/// Read-only view of a job for the admin API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct JobInfo {
    pub id: JobId,
    pub name: String,
    pub queue: String,
    pub status: JobStatus,
    pub attempt: u32,
    pub max_attempts: u32,
    pub created_at: DateTime<Utc>,
    pub scheduled_at: DateTime<Utc>,
    pub priority: i8,
    pub last_error: Option<String>,
}

impl From<JobData> for JobInfo {
    fn from(data: JobData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            queue: data.queue,
            status: JobStatus::Pending,
            attempt: data.attempt,
            max_attempts: data.max_attempts,
            created_at: data.created_at,
            scheduled_at: data.scheduled_at,
            priority: data.priority,
            last_error: data.last_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct ReportJob {
        user_id: String,
    }

    impl Job for ReportJob {
        const NAME: &'static str = "report";
        const QUEUE: &'static str = "reports";
        const MAX_RETRIES: u32 = 2;

        fn unique_key(&self) -> Option<String> {
            Some(format!("{}:{}", Self::NAME, self.user_id))
        }
    }

    #[test]
    fn test_job_data_from_job() {
        let job = ReportJob {
            user_id: "u1".to_string(),
        };
        let data = JobData::new(&job).unwrap();

        assert_eq!(data.name, "report");
        assert_eq!(data.queue, "reports");
        assert_eq!(data.attempt, 0);
        assert_eq!(data.max_attempts, 3);
        assert_eq!(data.timeout_secs, 300);
        assert_eq!(data.unique_key.as_deref(), Some("report:u1"));
        assert!(data.last_error.is_none());
    }

    #[test]
    fn test_payload_roundtrip() {
        let job = ReportJob {
            user_id: "u42".to_string(),
        };
        let data = JobData::new(&job).unwrap();
        let json = data.to_json().unwrap();
        let restored = JobData::from_json(&json).unwrap();
        let job_again: ReportJob = restored.deserialize().unwrap();

        assert_eq!(restored.id, data.id);
        assert_eq!(job_again.user_id, "u42");
    }

    #[test]
    fn test_context_tracks_attempts() {
        let job = ReportJob {
            user_id: "u1".to_string(),
        };
        let mut data = JobData::new(&job).unwrap();
        data.increment_attempt();
        let ctx = data.to_context("worker-1");

        assert_eq!(ctx.attempt, 1);
        assert_eq!(ctx.max_attempts, 3);
        assert_eq!(ctx.worker_id, "worker-1");
        assert!(!ctx.is_last_attempt());

        data.attempt = 3;
        assert!(data.to_context("worker-1").is_last_attempt());
    }

    #[test]
    fn test_job_status_serde() {
        assert_eq!(
            serde_json::to_string(&JobStatus::DeadLetter).unwrap(),
            "\"dead_letter\""
        );
        assert_eq!(JobStatus::Running.to_string(), "running");
    }
}
