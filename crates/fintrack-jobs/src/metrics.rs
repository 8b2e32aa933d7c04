//! Metrics emitted by the job system.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::time::Duration;

/// Metric names, kept in one place so dashboards and alerts can refer
/// to them.
pub mod names {
    pub const JOBS_ENQUEUED: &str = "fintrack_jobs_enqueued_total";
    pub const JOBS_DEQUEUED: &str = "fintrack_jobs_dequeued_total";
    pub const JOBS_COMPLETED: &str = "fintrack_jobs_completed_total";
    pub const JOBS_FAILED: &str = "fintrack_jobs_failed_total";
    pub const JOBS_RETRIED: &str = "fintrack_jobs_retried_total";
    pub const JOBS_DEAD_LETTERED: &str = "fintrack_jobs_dead_lettered_total";
    pub const JOBS_TIMED_OUT: &str = "fintrack_jobs_timed_out_total";
    pub const JOB_DURATION: &str = "fintrack_jobs_duration_seconds";
    pub const QUEUE_PENDING: &str = "fintrack_jobs_queue_pending";
    pub const QUEUE_PROCESSING: &str = "fintrack_jobs_queue_processing";
    pub const QUEUE_DELAYED: &str = "fintrack_jobs_queue_delayed";
    pub const QUEUE_DEAD_LETTER: &str = "fintrack_jobs_queue_dead_letter";
    pub const WORKERS_ACTIVE: &str = "fintrack_jobs_workers_active";
    pub const WORKERS_TOTAL: &str = "fintrack_jobs_workers_total";
    pub const SCHEDULER_LEADER: &str = "fintrack_jobs_scheduler_leader";
    pub const SCHEDULER_TRIGGERED: &str = "fintrack_jobs_scheduler_triggered_total";
}

/// Registers descriptions for all job metrics. Call once at startup.
pub fn register_metrics() {
    describe_counter!(names::JOBS_ENQUEUED, "Total jobs enqueued");
    describe_counter!(names::JOBS_DEQUEUED, "Total jobs picked up by workers");
    describe_counter!(names::JOBS_COMPLETED, "Total jobs completed successfully");
    describe_counter!(names::JOBS_FAILED, "Total failed job attempts");
    describe_counter!(names::JOBS_RETRIED, "Total job retries scheduled");
    describe_counter!(names::JOBS_DEAD_LETTERED, "Total jobs moved to the DLQ");
    describe_counter!(names::JOBS_TIMED_OUT, "Total jobs that hit their timeout");
    describe_histogram!(names::JOB_DURATION, "Job execution duration in seconds");
    describe_gauge!(names::QUEUE_PENDING, "Jobs waiting on a queue");
    describe_gauge!(names::QUEUE_PROCESSING, "Jobs currently being processed");
    describe_gauge!(names::QUEUE_DELAYED, "Jobs waiting for their scheduled time");
    describe_gauge!(names::QUEUE_DEAD_LETTER, "Jobs in the dead letter queue");
    describe_gauge!(names::WORKERS_ACTIVE, "Worker slots currently busy");
    describe_gauge!(names::WORKERS_TOTAL, "Configured worker concurrency");
    describe_gauge!(names::SCHEDULER_LEADER, "1 when this instance holds scheduler leadership");
    describe_counter!(names::SCHEDULER_TRIGGERED, "Scheduled jobs triggered by the leader");
}

/// Counters and timings around individual jobs.
pub struct JobMetrics;

impl JobMetrics {
    pub fn job_enqueued(queue: &str, job: &str, priority: &'static str) {
        counter!(
            names::JOBS_ENQUEUED,
            "queue" => queue.to_string(),
            "job" => job.to_string(),
            "priority" => priority
        )
        .increment(1);
    }

    pub fn job_dequeued(queue: &str, job: &str) {
        counter!(
            names::JOBS_DEQUEUED,
            "queue" => queue.to_string(),
            "job" => job.to_string()
        )
        .increment(1);
    }

    pub fn job_completed(queue: &str, job: &str, duration: Duration) {
        counter!(
            names::JOBS_COMPLETED,
            "queue" => queue.to_string(),
            "job" => job.to_string()
        )
        .increment(1);
        histogram!(
            names::JOB_DURATION,
            "queue" => queue.to_string(),
            "job" => job.to_string(),
            "outcome" => "completed"
        )
        .record(duration.as_secs_f64());
    }

    pub fn job_failed(queue: &str, job: &str, kind: &'static str, duration: Duration) {
        counter!(
            names::JOBS_FAILED,
            "queue" => queue.to_string(),
            "job" => job.to_string(),
            "kind" => kind
        )
        .increment(1);
        histogram!(
            names::JOB_DURATION,
            "queue" => queue.to_string(),
            "job" => job.to_string(),
            "outcome" => "failed"
        )
        .record(duration.as_secs_f64());
    }

    pub fn job_retried(queue: &str, job: &str, attempt: u32) {
        counter!(
            names::JOBS_RETRIED,
            "queue" => queue.to_string(),
            "job" => job.to_string(),
            "attempt" => attempt.to_string()
        )
        .increment(1);
    }

    pub fn job_dead_lettered(queue: &str, job: &str, reason: &'static str) {
        counter!(
            names::JOBS_DEAD_LETTERED,
            "queue" => queue.to_string(),
            "job" => job.to_string(),
            "reason" => reason
        )
        .increment(1);
    }

    pub fn job_timed_out(queue: &str, job: &str) {
        counter!(
            names::JOBS_TIMED_OUT,
            "queue" => queue.to_string(),
            "job" => job.to_string()
        )
        .increment(1);
    }

    pub fn update_queue_sizes(
        queue: &str,
        pending: u64,
        processing: u64,
        delayed: u64,
        dead_letter: u64,
    ) {
        gauge!(names::QUEUE_PENDING, "queue" => queue.to_string()).set(pending as f64);
        gauge!(names::QUEUE_PROCESSING, "queue" => queue.to_string()).set(processing as f64);
        gauge!(names::QUEUE_DELAYED, "queue" => queue.to_string()).set(delayed as f64);
        gauge!(names::QUEUE_DEAD_LETTER, "queue" => queue.to_string()).set(dead_letter as f64);
    }
}

/// Worker pool gauges.
pub struct WorkerMetrics;

impl WorkerMetrics {
    pub fn update_workers(pool_id: &str, active: usize, total: usize) {
        gauge!(names::WORKERS_ACTIVE, "pool" => pool_id.to_string()).set(active as f64);
        gauge!(names::WORKERS_TOTAL, "pool" => pool_id.to_string()).set(total as f64);
    }
}

/// Scheduler gauges and counters.
pub struct SchedulerMetrics;

impl SchedulerMetrics {
    pub fn update_leader_status(scheduler_id: &str, is_leader: bool) {
        gauge!(names::SCHEDULER_LEADER, "scheduler" => scheduler_id.to_string())
            .set(if is_leader { 1.0 } else { 0.0 });
    }

    pub fn job_triggered(scheduler_id: &str, job: &str) {
        counter!(
            names::SCHEDULER_TRIGGERED,
            "scheduler" => scheduler_id.to_string(),
            "job" => job.to_string()
        )
        .increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_share_prefix() {
        assert!(names::JOBS_ENQUEUED.starts_with("fintrack_jobs_"));
        assert!(names::SCHEDULER_LEADER.starts_with("fintrack_jobs_"));
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        register_metrics();
        JobMetrics::job_enqueued("default", "test", "normal");
        JobMetrics::job_completed("default", "test", Duration::from_millis(5));
        JobMetrics::job_failed("default", "test", "timeout", Duration::from_millis(5));
        WorkerMetrics::update_workers("pool-1", 2, 4);
        SchedulerMetrics::update_leader_status("sched-1", true);
    }
}
