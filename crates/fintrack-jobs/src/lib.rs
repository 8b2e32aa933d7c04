//! # Fintrack Jobs
//!
//! Redis-backed background job system: a priority queue with delayed
//! delivery, retries and a dead letter queue, a worker pool that
//! isolates panics and timeouts per job, and a cron scheduler with
//! Redis leader election so scheduled jobs fire exactly once across
//! instances.
//!
//! A job is a serializable payload type implementing [`Job`]; the async
//! work is attached by registering a handler on the [`WorkerPool`].
//! Enqueueing goes through [`JobQueueExt::enqueue`] for the defaults or
//! [`QueuedJob`] for priority, delay and retry overrides.

pub mod error;
pub mod job;
pub mod metrics;
pub mod queue;
pub mod redis;
pub mod retry;
pub mod scheduler;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{JobError, JobResult};
pub use job::{Job, JobContext, JobData, JobId, JobInfo, JobStatus};
pub use metrics::register_metrics;
pub use queue::{JobQueue, JobQueueExt, Priority, QueueStats, QueuedJob};
pub use self::redis::{create_pool, RedisJobQueue, RedisKeys};
pub use retry::{RetryPolicy, RetryStrategy};
pub use scheduler::{
    ScheduledJob, ScheduledJobInfo, Scheduler, SchedulerConfig, SchedulerStats,
};
pub use worker::{JobHandler, WorkerPool, WorkerPoolConfig};
