//! Cron scheduler with Redis leader election.
//!
//! Every instance runs a scheduler, but only the current leader
//! enqueues scheduled jobs. Leadership is a Redis `SET NX EX` lock
//! refreshed while held and released with a compare-and-delete script,
//! so a crashed leader is replaced within one TTL.

use crate::error::{JobError, JobResult};
use crate::job::{Job, JobData, JobId};
use crate::metrics::SchedulerMetrics;
use crate::queue::JobQueue;
use crate::redis::RedisKeys;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use cron::Schedule;
use deadpool_redis::Pool;
use parking_lot::RwLock;
use redis::AsyncCommands;
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::interval;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Scheduler tuning.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// How often due schedules are checked.
    pub poll_interval: Duration,
    /// How often leadership is acquired or refreshed.
    pub leader_check_interval: Duration,
    /// Leadership lock TTL; bounds failover time.
    pub leader_ttl_secs: u64,
    pub key_prefix: String,
    /// Offset applied when evaluating cron expressions.
    pub timezone_offset_hours: i8,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            leader_check_interval: Duration::from_secs(15),
            leader_ttl_secs: 30,
            key_prefix: "fintrack:jobs".to_string(),
            timezone_offset_hours: 0,
        }
    }
}

impl From<&fintrack_config::JobsConfig> for SchedulerConfig {
    fn from(config: &fintrack_config::JobsConfig) -> Self {
        Self {
            key_prefix: config.key_prefix.clone(),
            timezone_offset_hours: config.timezone_offset_hours,
            ..Self::default()
        }
    }
}

/// A job definition bound to a cron schedule.
#[derive(Clone)]
pub struct ScheduledJob {
    name: String,
    cron: String,
    schedule: Schedule,
    factory: Arc<dyn Fn() -> JobResult<JobData> + Send + Sync>,
    timezone_offset_hours: i8,
}

impl ScheduledJob {
    /// Six-field cron expressions: second, minute, hour, day of month,
    /// month, day of week.
    pub fn new<J, F>(name: impl Into<String>, cron_expr: &str, factory: F) -> JobResult<Self>
    where
        J: Job,
        F: Fn() -> J + Send + Sync + 'static,
    {
        let schedule = Schedule::from_str(cron_expr).map_err(|e| {
            JobError::Scheduler(format!("Invalid cron expression '{cron_expr}': {e}"))
        })?;
        Ok(Self {
            name: name.into(),
            cron: cron_expr.to_string(),
            schedule,
            factory: Arc::new(move || JobData::new(&factory())),
            timezone_offset_hours: 0,
        })
    }

    /// Evaluates the cron expression in the given fixed offset instead
    /// of UTC.
    pub fn timezone_offset(mut self, hours: i8) -> Self {
        self.timezone_offset_hours = hours;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cron(&self) -> &str {
        &self.cron
    }

    /// Next fire time strictly after `from`, as UTC.
    pub fn next_run_from(&self, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let offset = FixedOffset::east_opt(i32::from(self.timezone_offset_hours) * 3_600)
            .unwrap_or_else(|| Utc.fix());
        self.schedule
            .after(&from.with_timezone(&offset))
            .next()
            .map(|next| next.with_timezone(&Utc))
    }

    pub fn create_job_data(&self) -> JobResult<JobData> {
        (self.factory)()
    }
}

impl std::fmt::Debug for ScheduledJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledJob")
            .field("name", &self.name)
            .field("cron", &self.cron)
            .field("timezone_offset_hours", &self.timezone_offset_hours)
            .finish_non_exhaustive()
    }
}

/// Scheduler state for the admin API.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SchedulerStats {
    pub scheduler_id: String,
    pub is_leader: bool,
    pub jobs_triggered: u64,
    pub scheduled_jobs: Vec<ScheduledJobInfo>,
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ScheduledJobInfo {
    pub name: String,
    pub cron: String,
    pub next_run: Option<DateTime<Utc>>,
}

/// Triggers registered [`ScheduledJob`]s while holding leadership.
pub struct Scheduler {
    id: String,
    pool: Pool,
    queue: Arc<dyn JobQueue>,
    config: SchedulerConfig,
    keys: RedisKeys,
    jobs: RwLock<HashMap<String, ScheduledJob>>,
    shutdown_tx: broadcast::Sender<()>,
    running: AtomicBool,
    is_leader: AtomicBool,
    jobs_triggered: AtomicU64,
}

impl Scheduler {
    pub fn new(pool: Pool, queue: Arc<dyn JobQueue>, config: SchedulerConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        let keys = RedisKeys::new(config.key_prefix.clone());
        Self {
            id: format!("scheduler-{}", Uuid::new_v4()),
            pool,
            queue,
            config,
            keys,
            jobs: RwLock::new(HashMap::new()),
            shutdown_tx,
            running: AtomicBool::new(false),
            is_leader: AtomicBool::new(false),
            jobs_triggered: AtomicU64::new(0),
        }
    }

    /// Registers a job under the scheduler's configured timezone offset.
    pub fn schedule<J, F>(&self, name: impl Into<String>, cron_expr: &str, factory: F) -> JobResult<()>
    where
        J: Job,
        F: Fn() -> J + Send + Sync + 'static,
    {
        let job = ScheduledJob::new(name, cron_expr, factory)?
            .timezone_offset(self.config.timezone_offset_hours);
        self.register(job);
        Ok(())
    }

    pub fn register(&self, job: ScheduledJob) {
        debug!(job = %job.name, cron = %job.cron, "Registered scheduled job");
        self.jobs.write().insert(job.name.clone(), job);
    }

    pub fn is_leader(&self) -> bool {
        self.is_leader.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> SchedulerStats {
        let now = Utc::now();
        let jobs = self.jobs.read();
        let mut scheduled_jobs: Vec<ScheduledJobInfo> = jobs
            .values()
            .map(|job| ScheduledJobInfo {
                name: job.name.clone(),
                cron: job.cron.clone(),
                next_run: job.next_run_from(now),
            })
            .collect();
        scheduled_jobs.sort_by(|a, b| a.name.cmp(&b.name));
        SchedulerStats {
            scheduler_id: self.id.clone(),
            is_leader: self.is_leader(),
            jobs_triggered: self.jobs_triggered.load(Ordering::Relaxed),
            scheduled_jobs,
        }
    }

    /// Enqueues a scheduled job immediately, regardless of its cron
    /// schedule or leadership.
    pub async fn trigger_job(&self, name: &str) -> JobResult<JobId> {
        let data = {
            let jobs = self.jobs.read();
            let job = jobs
                .get(name)
                .ok_or_else(|| JobError::NotFound(format!("No scheduled job named '{name}'")))?;
            job.create_job_data()?
        };

        let job_id = self.queue.enqueue_data(data).await?;
        self.jobs_triggered.fetch_add(1, Ordering::Relaxed);
        SchedulerMetrics::job_triggered(&self.id, name);
        info!(job = name, job_id = %job_id, "Manually triggered scheduled job");
        Ok(job_id)
    }

    /// Runs the scheduler until [`stop`](Self::stop) is called.
    pub async fn start(&self) -> JobResult<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(JobError::Scheduler("Scheduler already running".to_string()));
        }
        info!(
            scheduler_id = %self.id,
            jobs = self.jobs.read().len(),
            timezone_offset_hours = self.config.timezone_offset_hours,
            "Starting scheduler"
        );

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let mut poll = interval(self.config.poll_interval);
        let mut leader_check = interval(self.config.leader_check_interval);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!(scheduler_id = %self.id, "Received shutdown signal");
                    break;
                }
                _ = leader_check.tick() => {
                    if let Err(e) = self.check_leadership().await {
                        error!(error = %e, "Scheduler leadership check failed");
                    }
                }
                _ = poll.tick() => {
                    if self.is_leader() {
                        if let Err(e) = self.check_and_enqueue_jobs().await {
                            error!(error = %e, "Scheduled job sweep failed");
                        }
                    }
                }
            }
        }

        if let Err(e) = self.release_leadership().await {
            warn!(error = %e, "Failed to release scheduler leadership on shutdown");
        }
        self.running.store(false, Ordering::SeqCst);
        info!(scheduler_id = %self.id, "Scheduler stopped");
        Ok(())
    }

    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Acquires leadership if free, or refreshes it while owned.
    async fn check_leadership(&self) -> JobResult<bool> {
        let mut conn = self.pool.get().await?;
        let lock_key = self.keys.scheduler_lock();

        if self.is_leader.load(Ordering::SeqCst) {
            let owner: Option<String> = conn.get(&lock_key).await?;
            if owner.as_deref() == Some(self.id.as_str()) {
                let _: () = conn
                    .expire(&lock_key, self.config.leader_ttl_secs as i64)
                    .await?;
                return Ok(true);
            }
            self.is_leader.store(false, Ordering::SeqCst);
            SchedulerMetrics::update_leader_status(&self.id, false);
            warn!(scheduler_id = %self.id, "Lost scheduler leadership");
        }

        let acquired: Option<String> = redis::cmd("SET")
            .arg(&lock_key)
            .arg(&self.id)
            .arg("NX")
            .arg("EX")
            .arg(self.config.leader_ttl_secs)
            .query_async(&mut *conn)
            .await?;

        if acquired.is_some() {
            self.is_leader.store(true, Ordering::SeqCst);
            SchedulerMetrics::update_leader_status(&self.id, true);
            info!(scheduler_id = %self.id, "Acquired scheduler leadership");
            return Ok(true);
        }
        Ok(false)
    }

    async fn release_leadership(&self) -> JobResult<()> {
        if !self.is_leader.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        let mut conn = self.pool.get().await?;
        // Compare-and-delete so a newer leader's lock survives a slow
        // shutdown of this one.
        let script = redis::Script::new(
            r#"
            if redis.call("GET", KEYS[1]) == ARGV[1] then
                return redis.call("DEL", KEYS[1])
            else
                return 0
            end
            "#,
        );
        let _: i64 = script
            .key(self.keys.scheduler_lock())
            .arg(&self.id)
            .invoke_async(&mut *conn)
            .await?;

        SchedulerMetrics::update_leader_status(&self.id, false);
        info!(scheduler_id = %self.id, "Released scheduler leadership");
        Ok(())
    }

    async fn check_and_enqueue_jobs(&self) -> JobResult<()> {
        let now = Utc::now();
        let jobs: Vec<ScheduledJob> = self.jobs.read().values().cloned().collect();
        let mut conn = self.pool.get().await?;

        for scheduled in jobs {
            let last_run_key = self.keys.last_run(&scheduled.name);
            let last_run: Option<String> = conn.get(&last_run_key).await?;

            let due = match last_run
                .as_deref()
                .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            {
                Some(last) => scheduled
                    .next_run_from(last.with_timezone(&Utc))
                    .is_some_and(|next| next <= now),
                None => {
                    // First sighting of this schedule: prime it without
                    // firing, so a fresh deployment does not run every
                    // job at boot.
                    let _: () = conn.set(&last_run_key, now.to_rfc3339()).await?;
                    debug!(job = %scheduled.name, "Primed schedule");
                    false
                }
            };

            if !due {
                continue;
            }

            let job_data = match scheduled.create_job_data() {
                Ok(data) => data,
                Err(e) => {
                    error!(job = %scheduled.name, error = %e, "Failed to build scheduled job payload");
                    continue;
                }
            };

            let _: () = conn.set(&last_run_key, now.to_rfc3339()).await?;
            match self.queue.enqueue_data(job_data).await {
                Ok(job_id) => {
                    info!(job = %scheduled.name, job_id = %job_id, "Enqueued scheduled job");
                    self.jobs_triggered.fetch_add(1, Ordering::Relaxed);
                    SchedulerMetrics::job_triggered(&self.id, &scheduled.name);
                }
                Err(JobError::Duplicate(unique_key)) => {
                    debug!(job = %scheduled.name, unique_key = %unique_key, "Skipped duplicate scheduled job");
                }
                Err(e) => {
                    error!(job = %scheduled.name, error = %e, "Failed to enqueue scheduled job");
                    // Roll the marker back so the next sweep retries.
                    let _: () = conn.del(&last_run_key).await?;
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("id", &self.id)
            .field("is_leader", &self.is_leader())
            .field("jobs", &self.jobs.read().len())
            .finish_non_exhaustive()
    }
}
