//! Redis job queue built on sorted sets.
//!
//! Every set stores job ids; the serialized payload lives once in a
//! string key per job. Pending sets are scored so that higher priority
//! always beats earlier enqueue time, the delayed and processing sets
//! are scored by their due time, which makes promotion and reclaim a
//! single `ZRANGEBYSCORE` sweep.

use crate::error::{JobError, JobResult};
use crate::job::{JobData, JobId, JobInfo, JobStatus};
use crate::metrics::JobMetrics;
use crate::queue::{JobQueue, Priority, QueueStats};
use crate::redis::RedisKeys;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use deadpool_redis::{Connection, Pool};
use redis::AsyncCommands;
use tracing::{debug, info, warn};

/// TTL on unique-key markers so a crashed worker cannot block an
/// on-demand job forever.
const UNIQUE_KEY_TTL_SECS: u64 = 3_600;

/// Slack added to the job timeout before an in-flight entry counts as
/// abandoned and is reclaimed.
const VISIBILITY_GRACE_SECS: u64 = 30;

/// How long completed job ids stay visible before being trimmed.
const COMPLETED_RETENTION_SECS: i64 = 7 * 24 * 3_600;

/// Redis implementation of [`JobQueue`].
pub struct RedisJobQueue {
    pool: Pool,
    keys: RedisKeys,
}

impl RedisJobQueue {
    pub fn new(pool: Pool, key_prefix: impl Into<String>) -> Self {
        Self {
            pool,
            keys: RedisKeys::new(key_prefix),
        }
    }

    async fn conn(&self) -> JobResult<Connection> {
        Ok(self.pool.get().await?)
    }

    /// Score for pending sets. Priority dominates, enqueue time breaks
    /// ties, lowest score pops first.
    fn priority_score(priority: i8, at_ms: i64) -> f64 {
        -f64::from(priority) * 1e12 + at_ms as f64
    }

    async fn load(&self, conn: &mut Connection, job_id: &str) -> JobResult<Option<JobData>> {
        let json: Option<String> = conn.get(self.keys.job(job_id)).await?;
        match json {
            Some(json) => Ok(Some(JobData::from_json(&json)?)),
            None => Ok(None),
        }
    }

    async fn store(&self, conn: &mut Connection, data: &JobData) -> JobResult<()> {
        let _: () = conn
            .set(self.keys.job(data.id.as_str()), data.to_json()?)
            .await?;
        Ok(())
    }

    async fn release_unique(&self, conn: &mut Connection, data: &JobData) -> JobResult<()> {
        if let Some(unique_key) = &data.unique_key {
            let _: () = conn.del(self.keys.unique(unique_key)).await?;
        }
        Ok(())
    }

    /// Puts a failed job back on the delayed set after its backoff.
    async fn schedule_retry(&self, conn: &mut Connection, data: &mut JobData) -> JobResult<()> {
        let delay = data.retry_policy.delay_for_attempt(data.attempt);
        data.scheduled_at =
            Utc::now() + ChronoDuration::from_std(delay).unwrap_or_else(|_| ChronoDuration::zero());
        self.store(conn, data).await?;
        let _: () = conn
            .zadd(
                self.keys.delayed(),
                data.id.as_str(),
                data.scheduled_at.timestamp_millis() as f64,
            )
            .await?;

        JobMetrics::job_retried(&data.queue, &data.name, data.attempt);
        debug!(
            job_id = %data.id,
            attempt = data.attempt,
            retry_at = %data.scheduled_at,
            "Scheduled job retry"
        );
        Ok(())
    }

    async fn move_to_dead_letter(
        &self,
        conn: &mut Connection,
        data: &JobData,
        error: &JobError,
    ) -> JobResult<()> {
        self.store(conn, data).await?;
        let _: () = conn
            .zadd(
                self.keys.dead_letter(),
                data.id.as_str(),
                Utc::now().timestamp_millis() as f64,
            )
            .await?;
        let _: () = conn
            .hincr(self.keys.stats(&data.queue), "dead_letter", 1i64)
            .await?;
        self.release_unique(conn, data).await?;

        JobMetrics::job_dead_lettered(&data.queue, &data.name, error.kind());
        warn!(
            job_id = %data.id,
            job = %data.name,
            attempts = data.attempt,
            error = %error,
            "Moved job to dead letter queue"
        );
        Ok(())
    }

    /// Moves due delayed jobs onto their pending sets.
    async fn promote_delayed(&self) -> JobResult<u64> {
        let mut conn = self.conn().await?;
        let now_ms = Utc::now().timestamp_millis();
        let due: Vec<String> = conn
            .zrangebyscore(self.keys.delayed(), 0i64, now_ms)
            .await?;

        let mut promoted = 0u64;
        for job_id in due {
            match self.load(&mut conn, &job_id).await? {
                Some(data) => {
                    let score =
                        Self::priority_score(data.priority, data.scheduled_at.timestamp_millis());
                    let _: () = redis::pipe()
                        .zrem(self.keys.delayed(), &job_id)
                        .zadd(self.keys.pending(&data.queue), &job_id, score)
                        .query_async(&mut *conn)
                        .await?;
                    promoted += 1;
                    debug!(job_id = %job_id, queue = %data.queue, "Promoted delayed job");
                }
                None => {
                    // Payload expired or was deleted; drop the orphan entry.
                    let _: () = conn.zrem(self.keys.delayed(), &job_id).await?;
                }
            }
        }
        Ok(promoted)
    }

    /// Fails jobs whose visibility deadline passed, so work lost to a
    /// crashed or stalled worker is retried.
    async fn reclaim_expired(&self) -> JobResult<u64> {
        let mut conn = self.conn().await?;
        let now_ms = Utc::now().timestamp_millis();
        let expired: Vec<String> = conn
            .zrangebyscore(self.keys.processing(), 0i64, now_ms)
            .await?;

        let mut reclaimed = 0u64;
        for job_id in expired {
            let _: () = conn.zrem(self.keys.processing(), &job_id).await?;
            if let Some(mut data) = self.load(&mut conn, &job_id).await? {
                let error = JobError::Timeout(data.timeout_secs);
                data.set_error(&error);
                let _: () = conn
                    .hincr(self.keys.stats(&data.queue), "failed", 1i64)
                    .await?;
                if data.retry_policy.should_retry(data.attempt) {
                    self.schedule_retry(&mut conn, &mut data).await?;
                } else {
                    self.move_to_dead_letter(&mut conn, &data, &error).await?;
                }
                reclaimed += 1;
                warn!(
                    job_id = %job_id,
                    job = %data.name,
                    attempt = data.attempt,
                    "Reclaimed job past its visibility deadline"
                );
            }
        }
        Ok(reclaimed)
    }

    async fn trim_completed(&self) -> JobResult<()> {
        let mut conn = self.conn().await?;
        let threshold = Utc::now().timestamp_millis() - COMPLETED_RETENTION_SECS * 1_000;
        let removed: u64 = redis::cmd("ZREMRANGEBYSCORE")
            .arg(self.keys.completed())
            .arg(0i64)
            .arg(threshold)
            .query_async(&mut *conn)
            .await?;
        if removed > 0 {
            debug!(count = removed, "Trimmed old completed job entries");
        }
        Ok(())
    }
}

#[async_trait]
impl JobQueue for RedisJobQueue {
    async fn enqueue_data(&self, data: JobData) -> JobResult<JobId> {
        let mut conn = self.conn().await?;

        if let Some(unique_key) = &data.unique_key {
            let claimed: Option<String> = redis::cmd("SET")
                .arg(self.keys.unique(unique_key))
                .arg(data.id.as_str())
                .arg("NX")
                .arg("EX")
                .arg(UNIQUE_KEY_TTL_SECS)
                .query_async(&mut *conn)
                .await?;
            if claimed.is_none() {
                debug!(unique_key = %unique_key, "Rejected duplicate job");
                return Err(JobError::Duplicate(unique_key.clone()));
            }
        }

        self.store(&mut conn, &data).await?;

        let now_ms = Utc::now().timestamp_millis();
        let scheduled_ms = data.scheduled_at.timestamp_millis();
        if scheduled_ms > now_ms {
            let _: () = conn
                .zadd(self.keys.delayed(), data.id.as_str(), scheduled_ms as f64)
                .await?;
            debug!(
                job_id = %data.id,
                job = %data.name,
                scheduled_at = %data.scheduled_at,
                "Enqueued delayed job"
            );
        } else {
            let score = Self::priority_score(data.priority, now_ms);
            let _: () = conn
                .zadd(self.keys.pending(&data.queue), data.id.as_str(), score)
                .await?;
            debug!(job_id = %data.id, job = %data.name, queue = %data.queue, "Enqueued job");
        }

        JobMetrics::job_enqueued(&data.queue, &data.name, Priority::from(data.priority).as_str());
        Ok(data.id)
    }

    async fn dequeue(&self, queues: &[&str], worker_id: &str) -> JobResult<Option<JobData>> {
        // Surface due delayed jobs before draining the pending sets.
        self.promote_delayed().await?;

        let mut conn = self.conn().await?;
        for queue in queues {
            let pending_key = self.keys.pending(queue);
            let popped: Vec<(String, f64)> = conn.zpopmin(&pending_key, 1).await?;
            let Some((job_id, _)) = popped.into_iter().next() else {
                continue;
            };

            let Some(mut data) = self.load(&mut conn, &job_id).await? else {
                warn!(job_id = %job_id, queue, "Dropped pending entry with no stored payload");
                continue;
            };

            data.increment_attempt();
            self.store(&mut conn, &data).await?;

            let deadline_ms = Utc::now().timestamp_millis()
                + (data.timeout_secs + VISIBILITY_GRACE_SECS) as i64 * 1_000;
            let _: () = conn
                .zadd(self.keys.processing(), data.id.as_str(), deadline_ms as f64)
                .await?;

            JobMetrics::job_dequeued(&data.queue, &data.name);
            debug!(
                job_id = %data.id,
                job = %data.name,
                attempt = data.attempt,
                worker_id,
                "Dequeued job"
            );
            return Ok(Some(data));
        }
        Ok(None)
    }

    async fn complete(&self, job_id: &JobId) -> JobResult<()> {
        let mut conn = self.conn().await?;
        let _: () = conn.zrem(self.keys.processing(), job_id.as_str()).await?;

        if let Some(data) = self.load(&mut conn, job_id.as_str()).await? {
            let _: () = conn
                .zadd(
                    self.keys.completed(),
                    job_id.as_str(),
                    Utc::now().timestamp_millis() as f64,
                )
                .await?;
            let _: () = conn
                .hincr(self.keys.stats(&data.queue), "completed", 1i64)
                .await?;
            self.release_unique(&mut conn, &data).await?;
            // Payload stays visible to lookups until the ledger window
            // passes, then expires on its own.
            let _: () = conn
                .expire(self.keys.job(job_id.as_str()), COMPLETED_RETENTION_SECS)
                .await?;
        }

        debug!(job_id = %job_id, "Completed job");
        Ok(())
    }

    async fn fail(&self, job_id: &JobId, error: &JobError) -> JobResult<()> {
        let mut conn = self.conn().await?;
        let _: () = conn.zrem(self.keys.processing(), job_id.as_str()).await?;

        let Some(mut data) = self.load(&mut conn, job_id.as_str()).await? else {
            warn!(job_id = %job_id, "Failed job has no stored payload");
            return Ok(());
        };

        data.set_error(error);
        let _: () = conn
            .hincr(self.keys.stats(&data.queue), "failed", 1i64)
            .await?;

        if error.is_retryable() && data.retry_policy.should_retry(data.attempt) {
            self.schedule_retry(&mut conn, &mut data).await?;
        } else {
            self.move_to_dead_letter(&mut conn, &data, error).await?;
        }
        Ok(())
    }

    async fn maintain(&self) -> JobResult<u64> {
        let promoted = self.promote_delayed().await?;
        let reclaimed = self.reclaim_expired().await?;
        self.trim_completed().await?;
        Ok(promoted + reclaimed)
    }

    async fn get_job(&self, job_id: &JobId) -> JobResult<Option<JobInfo>> {
        let mut conn = self.conn().await?;

        let Some(data) = self.load(&mut conn, job_id.as_str()).await? else {
            return Ok(None);
        };

        let processing: Option<f64> = conn
            .zscore(self.keys.processing(), job_id.as_str())
            .await?;
        let dead: Option<f64> = conn
            .zscore(self.keys.dead_letter(), job_id.as_str())
            .await?;
        let delayed: Option<f64> = conn.zscore(self.keys.delayed(), job_id.as_str()).await?;
        let completed: Option<f64> = conn.zscore(self.keys.completed(), job_id.as_str()).await?;

        let mut info = JobInfo::from(data);
        info.status = if processing.is_some() {
            JobStatus::Running
        } else if dead.is_some() {
            JobStatus::DeadLetter
        } else if completed.is_some() {
            JobStatus::Completed
        } else if delayed.is_some() {
            JobStatus::Scheduled
        } else {
            JobStatus::Pending
        };
        Ok(Some(info))
    }

    async fn stats(&self, queue: &str) -> JobResult<QueueStats> {
        let mut conn = self.conn().await?;

        let pending: u64 = conn.zcard(self.keys.pending(queue)).await?;
        let processing: u64 = conn.zcard(self.keys.processing()).await?;
        let delayed: u64 = conn.zcard(self.keys.delayed()).await?;
        let dead_letter: u64 = conn.zcard(self.keys.dead_letter()).await?;
        let completed: Option<u64> = conn.hget(self.keys.stats(queue), "completed").await?;
        let failed: Option<u64> = conn.hget(self.keys.stats(queue), "failed").await?;

        let stats = QueueStats {
            queue: queue.to_string(),
            pending,
            processing,
            delayed,
            dead_letter,
            completed: completed.unwrap_or(0),
            failed: failed.unwrap_or(0),
        };
        JobMetrics::update_queue_sizes(
            queue,
            stats.pending,
            stats.processing,
            stats.delayed,
            stats.dead_letter,
        );
        Ok(stats)
    }

    async fn list_dlq(&self, limit: usize, offset: usize) -> JobResult<Vec<JobInfo>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut conn = self.conn().await?;
        let ids: Vec<String> = conn
            .zrevrange(
                self.keys.dead_letter(),
                offset as isize,
                (offset + limit - 1) as isize,
            )
            .await?;

        let mut jobs = Vec::with_capacity(ids.len());
        for job_id in ids {
            if let Some(data) = self.load(&mut conn, &job_id).await? {
                let mut info = JobInfo::from(data);
                info.status = JobStatus::DeadLetter;
                jobs.push(info);
            }
        }
        Ok(jobs)
    }

    async fn retry_dlq(&self, job_id: &JobId) -> JobResult<()> {
        let mut conn = self.conn().await?;
        let removed: u64 = conn.zrem(self.keys.dead_letter(), job_id.as_str()).await?;
        if removed == 0 {
            return Err(JobError::NotFound(job_id.to_string()));
        }

        let Some(mut data) = self.load(&mut conn, job_id.as_str()).await? else {
            return Err(JobError::NotFound(job_id.to_string()));
        };

        data.attempt = 0;
        data.last_error = None;
        data.scheduled_at = Utc::now();
        self.store(&mut conn, &data).await?;

        let score = Self::priority_score(data.priority, data.scheduled_at.timestamp_millis());
        let _: () = conn
            .zadd(self.keys.pending(&data.queue), job_id.as_str(), score)
            .await?;

        info!(job_id = %job_id, job = %data.name, "Requeued job from dead letter queue");
        Ok(())
    }

    async fn health_check(&self) -> JobResult<()> {
        let mut conn = self.conn().await?;
        let pong: String = redis::cmd("PING").query_async(&mut *conn).await?;
        if pong == "PONG" {
            Ok(())
        } else {
            Err(JobError::Worker(format!(
                "Unexpected Redis ping reply: {pong}"
            )))
        }
    }
}

impl std::fmt::Debug for RedisJobQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisJobQueue")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}
