//! Redis-backed queue implementation.

mod queue;

pub use queue::RedisJobQueue;

use crate::error::{JobError, JobResult};
use deadpool_redis::{Config as PoolConfig, Pool, Runtime};
use fintrack_config::RedisConfig;

/// Creates a Redis connection pool from application configuration.
pub fn create_pool(config: &RedisConfig) -> JobResult<Pool> {
    let pool_config = PoolConfig::from_url(&config.url);
    let pool = pool_config
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|e| JobError::Configuration(format!("Failed to create Redis pool: {e}")))?;
    pool.resize(config.pool_size);
    Ok(pool)
}

/// Key layout for all job system state under a shared prefix.
///
/// Sorted sets hold job ids; the serialized [`JobData`](crate::job::JobData)
/// lives in a plain string key per job so every set can reference the
/// same copy.
#[derive(Debug, Clone)]
pub struct RedisKeys {
    prefix: String,
}

impl RedisKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Serialized job data.
    pub fn job(&self, job_id: &str) -> String {
        format!("{}:job:{}", self.prefix, job_id)
    }

    /// Pending jobs for one queue, scored by priority and time.
    pub fn pending(&self, queue: &str) -> String {
        format!("{}:pending:{}", self.prefix, queue)
    }

    /// Jobs waiting for their scheduled time, scored by due time.
    pub fn delayed(&self) -> String {
        format!("{}:delayed", self.prefix)
    }

    /// In-flight jobs, scored by visibility deadline.
    pub fn processing(&self) -> String {
        format!("{}:processing", self.prefix)
    }

    /// Jobs that exhausted their retries, scored by dead-letter time.
    pub fn dead_letter(&self) -> String {
        format!("{}:dead_letter", self.prefix)
    }

    /// Completed job ids, scored by completion time.
    pub fn completed(&self) -> String {
        format!("{}:completed", self.prefix)
    }

    /// Deduplication marker for a unique key.
    pub fn unique(&self, unique_key: &str) -> String {
        format!("{}:unique:{}", self.prefix, unique_key)
    }

    /// Per-queue counters hash.
    pub fn stats(&self, queue: &str) -> String {
        format!("{}:stats:{}", self.prefix, queue)
    }

    /// Scheduler leader election lock.
    pub fn scheduler_lock(&self) -> String {
        format!("{}:scheduler:leader", self.prefix)
    }

    /// Last trigger time of a scheduled job.
    pub fn last_run(&self, job_name: &str) -> String {
        format!("{}:scheduler:last_run:{}", self.prefix, job_name)
    }
}

impl Default for RedisKeys {
    fn default() -> Self {
        Self::new("fintrack:jobs")
    }
}
