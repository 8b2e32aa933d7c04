//! Error types for the job system.

use thiserror::Error;

/// Result alias for job operations.
pub type JobResult<T> = Result<T, JobError>;

/// Errors produced by queues, workers and the scheduler.
#[derive(Debug, Error)]
pub enum JobError {
    /// The job handler returned an error.
    #[error("Job execution failed: {0}")]
    ExecutionFailed(String),

    /// The job handler panicked.
    #[error("Job handler panicked: {0}")]
    Panicked(String),

    /// The job exceeded its execution timeout.
    #[error("Job timed out after {0} seconds")]
    Timeout(u64),

    /// Job payload could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Redis command failed.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Redis connection pool failed.
    #[error("Redis pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    /// Job not found in any queue state.
    #[error("Job not found: {0}")]
    NotFound(String),

    /// A live job with the same unique key already exists.
    #[error("Duplicate job for unique key: {0}")]
    Duplicate(String),

    /// Worker pool error.
    #[error("Worker error: {0}")]
    Worker(String),

    /// Scheduler error.
    #[error("Scheduler error: {0}")]
    Scheduler(String),

    /// Invalid job system configuration, including unknown job names.
    #[error("Job configuration error: {0}")]
    Configuration(String),
}

impl JobError {
    /// Whether a failed attempt with this error may be retried.
    ///
    /// Payload and configuration problems are permanent; retrying them
    /// would fail identically, so they go straight to the dead letter
    /// queue.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            JobError::ExecutionFailed(_)
                | JobError::Panicked(_)
                | JobError::Timeout(_)
                | JobError::Redis(_)
                | JobError::Pool(_)
                | JobError::Worker(_)
        )
    }

    /// Short stable label for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            JobError::ExecutionFailed(_) => "execution",
            JobError::Panicked(_) => "panic",
            JobError::Timeout(_) => "timeout",
            JobError::Serialization(_) => "serialization",
            JobError::Redis(_) => "redis",
            JobError::Pool(_) => "pool",
            JobError::NotFound(_) => "not_found",
            JobError::Duplicate(_) => "duplicate",
            JobError::Worker(_) => "worker",
            JobError::Scheduler(_) => "scheduler",
            JobError::Configuration(_) => "configuration",
        }
    }
}

// Domain errors surfacing from service calls inside handlers are treated
// as retryable execution failures; transient database or cache outages
// resolve on a later attempt and permanent ones exhaust into the DLQ.
impl From<fintrack_core::FintrackError> for JobError {
    fn from(err: fintrack_core::FintrackError) -> Self {
        JobError::ExecutionFailed(err.to_string())
    }
}
