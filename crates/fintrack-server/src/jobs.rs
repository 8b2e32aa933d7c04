//! Background job wiring.
//!
//! Registers a handler for every job type on the worker pool and puts
//! the recurring jobs on the cron scheduler. Handlers close over the
//! service layer, so a job is a thin named trigger around a service
//! call.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use deadpool_redis::Pool;
use fintrack_config::AppConfig;
use fintrack_core::{FintrackError, FintrackResult};
use fintrack_jobs::{
    register_metrics, Job, JobError, JobQueue, JobResult, RedisJobQueue, Scheduler,
    SchedulerConfig, WorkerPool, WorkerPoolConfig,
};
use fintrack_service::{
    BackupUserDataJob, CalculateInsightsJob, CheckGoalDeadlinesJob, CleanupOldDataJob,
    GenerateMonthlyReportsJob, ProcessRecurringTransactionsJob, SendBudgetAlertsJob,
};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::bootstrap::Services;

/// Cron schedules for the recurring jobs (six-field, UTC plus the
/// configured timezone offset).
const PROCESS_RECURRING_SCHEDULE: &str = "0 30 0 * * *";
const BUDGET_ALERTS_SCHEDULE: &str = "0 0 9 * * *";
const MONTHLY_REPORTS_SCHEDULE: &str = "0 0 8 1 * *";
const GOAL_DEADLINES_SCHEDULE: &str = "0 0 10 * * *";
const CLEANUP_SCHEDULE: &str = "0 0 3 * * SUN";

/// The job queue, worker pool, and optional scheduler for one process.
pub struct JobRuntime {
    pub queue: Arc<dyn JobQueue>,
    pub workers: Arc<WorkerPool>,
    pub scheduler: Option<Arc<Scheduler>>,
}

impl JobRuntime {
    /// Builds the job runtime, or `None` when Redis or jobs are disabled.
    pub fn build(
        config: &AppConfig,
        redis: Option<&Pool>,
        services: &Services,
    ) -> FintrackResult<Option<Self>> {
        if !config.jobs.enabled {
            info!("Background jobs disabled by configuration");
            return Ok(None);
        }
        let Some(pool) = redis else {
            info!("Redis is disabled; background jobs will not run");
            return Ok(None);
        };

        register_metrics();

        let queue: Arc<dyn JobQueue> = Arc::new(RedisJobQueue::new(
            pool.clone(),
            config.jobs.key_prefix.clone(),
        ));
        let workers = Arc::new(WorkerPool::new(
            queue.clone(),
            WorkerPoolConfig::from(&config.jobs),
        ));
        register_handlers(&workers, config, services);

        let scheduler = if config.jobs.scheduler_enabled {
            let scheduler = Scheduler::new(
                pool.clone(),
                queue.clone(),
                SchedulerConfig::from(&config.jobs),
            );
            register_schedules(&scheduler)
                .map_err(|e| FintrackError::Configuration(format!("Invalid job schedule: {e}")))?;
            Some(Arc::new(scheduler))
        } else {
            info!("Scheduler disabled; this instance will only execute jobs");
            None
        };

        Ok(Some(Self {
            queue,
            workers,
            scheduler,
        }))
    }

    /// Spawns the worker pool and scheduler loops.
    pub fn start(&self) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::new();

        let workers = self.workers.clone();
        handles.push(tokio::spawn(async move {
            if let Err(e) = workers.start().await {
                error!("Worker pool stopped with error: {}", e);
            }
        }));

        if let Some(scheduler) = &self.scheduler {
            let scheduler = scheduler.clone();
            handles.push(tokio::spawn(async move {
                if let Err(e) = scheduler.start().await {
                    error!("Scheduler stopped with error: {}", e);
                }
            }));
        }

        handles
    }

    /// Stops the loops and waits for in-flight jobs to drain.
    pub async fn shutdown(&self, handles: Vec<JoinHandle<()>>) {
        if let Some(scheduler) = &self.scheduler {
            scheduler.stop();
        }
        self.workers.stop();
        for handle in handles {
            if let Err(e) = handle.await {
                error!("Job task did not shut down cleanly: {}", e);
            }
        }
        info!("Job runtime stopped");
    }
}

fn register_handlers(pool: &WorkerPool, config: &AppConfig, services: &Services) {
    let timezone_offset = config.jobs.timezone_offset_hours;

    let recurring = services.recurring.clone();
    pool.register::<ProcessRecurringTransactionsJob, _>(move |_job, _ctx| {
        let recurring = recurring.clone();
        Box::pin(async move {
            let today = local_today(timezone_offset);
            let created = recurring.process_due(today).await.map_err(job_error)?;
            info!(created, %today, "Processed due recurring transactions");
            Ok(())
        })
    });

    let reports = services.reports.clone();
    pool.register::<SendBudgetAlertsJob, _>(move |_job, _ctx| {
        let reports = reports.clone();
        Box::pin(async move {
            let sent = reports.send_budget_alerts().await.map_err(job_error)?;
            info!(sent, "Sent budget alert notifications");
            Ok(())
        })
    });

    let reports = services.reports.clone();
    pool.register::<GenerateMonthlyReportsJob, _>(move |_job, _ctx| {
        let reports = reports.clone();
        Box::pin(async move {
            let sent = reports.send_monthly_reports().await.map_err(job_error)?;
            info!(sent, "Sent monthly spending reports");
            Ok(())
        })
    });

    let reports = services.reports.clone();
    pool.register::<CheckGoalDeadlinesJob, _>(move |_job, _ctx| {
        let reports = reports.clone();
        Box::pin(async move {
            let sent = reports.send_goal_reminders().await.map_err(job_error)?;
            info!(sent, "Sent goal deadline reminders");
            Ok(())
        })
    });

    let transactions = services.transactions.clone();
    pool.register::<CleanupOldDataJob, _>(move |_job, _ctx| {
        let transactions = transactions.clone();
        Box::pin(async move {
            let cutoff = CleanupOldDataJob::cutoff(Utc::now());
            let purged = transactions
                .purge_created_before(cutoff)
                .await
                .map_err(job_error)?;
            info!(purged, %cutoff, "Purged transactions past the retention window");
            Ok(())
        })
    });

    let backup = services.backup.clone();
    pool.register::<BackupUserDataJob, _>(move |job, _ctx| {
        let backup = backup.clone();
        Box::pin(async move {
            let path = backup.backup_user(job.user_id).await.map_err(job_error)?;
            info!(user_id = %job.user_id, path = %path.display(), "User backup written");
            Ok(())
        })
    });

    let insights = services.insights.clone();
    pool.register::<CalculateInsightsJob, _>(move |job, _ctx| {
        let insights = insights.clone();
        Box::pin(async move {
            insights
                .calculate_and_store(job.user_id)
                .await
                .map_err(job_error)?;
            info!(user_id = %job.user_id, "Recalculated spending insights");
            Ok(())
        })
    });
}

fn register_schedules(scheduler: &Scheduler) -> JobResult<()> {
    scheduler.schedule(
        ProcessRecurringTransactionsJob::NAME,
        PROCESS_RECURRING_SCHEDULE,
        || ProcessRecurringTransactionsJob,
    )?;
    scheduler.schedule(SendBudgetAlertsJob::NAME, BUDGET_ALERTS_SCHEDULE, || {
        SendBudgetAlertsJob
    })?;
    scheduler.schedule(
        GenerateMonthlyReportsJob::NAME,
        MONTHLY_REPORTS_SCHEDULE,
        || GenerateMonthlyReportsJob,
    )?;
    scheduler.schedule(CheckGoalDeadlinesJob::NAME, GOAL_DEADLINES_SCHEDULE, || {
        CheckGoalDeadlinesJob
    })?;
    scheduler.schedule(CleanupOldDataJob::NAME, CLEANUP_SCHEDULE, || {
        CleanupOldDataJob
    })?;
    Ok(())
}

/// Today's date in the configured local timezone.
fn local_today(offset_hours: i8) -> NaiveDate {
    (Utc::now() + Duration::hours(i64::from(offset_hours))).date_naive()
}

fn job_error(err: FintrackError) -> JobError {
    JobError::ExecutionFailed(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedules_parse() {
        for (name, expr) in [
            ("recurring", PROCESS_RECURRING_SCHEDULE),
            ("alerts", BUDGET_ALERTS_SCHEDULE),
            ("reports", MONTHLY_REPORTS_SCHEDULE),
            ("deadlines", GOAL_DEADLINES_SCHEDULE),
            ("cleanup", CLEANUP_SCHEDULE),
        ] {
            let job = fintrack_jobs::ScheduledJob::new(name, expr, || CleanupOldDataJob);
            assert!(job.is_ok(), "schedule {name} should parse: {expr}");
        }
    }

    #[test]
    fn test_local_today_applies_offset() {
        let west = local_today(-12);
        let east = local_today(12);
        // A full day apart at most; both must be valid dates near now.
        let span = east.signed_duration_since(west).num_days();
        assert!((0..=1).contains(&span));
    }

    #[test]
    fn test_job_error_is_retryable() {
        let err = job_error(FintrackError::Internal("db went away".to_string()));
        assert!(err.is_retryable());
    }
}
