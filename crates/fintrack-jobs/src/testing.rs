//! In-memory queue double used by worker and scheduler tests.

use crate::error::{JobError, JobResult};
use crate::job::{JobData, JobId, JobInfo, JobStatus};
use crate::queue::{JobQueue, QueueStats};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;

/// [`JobQueue`] backed by vectors, mirroring the Redis queue's retry
/// and dead-letter flow closely enough for pool tests.
#[derive(Default)]
pub(crate) struct InMemoryJobQueue {
    inner: Mutex<State>,
}

#[derive(Default)]
struct State {
    ready: Vec<JobData>,
    delayed: Vec<JobData>,
    processing: HashMap<String, JobData>,
    completed: Vec<JobData>,
    dead_letter: Vec<JobData>,
}

impl State {
    fn promote_due(&mut self) -> u64 {
        let now = Utc::now();
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.delayed)
            .into_iter()
            .partition(|data| data.scheduled_at <= now);
        let promoted = due.len() as u64;
        self.ready.extend(due);
        self.delayed = waiting;
        promoted
    }
}

impl InMemoryJobQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn pending_count(&self) -> usize {
        self.inner.lock().ready.len()
    }

    pub(crate) fn completed_count(&self) -> usize {
        self.inner.lock().completed.len()
    }

    pub(crate) fn dead_letter_jobs(&self) -> Vec<JobData> {
        self.inner.lock().dead_letter.clone()
    }
}

#[async_trait]
impl JobQueue for InMemoryJobQueue {
    async fn enqueue_data(&self, data: JobData) -> JobResult<JobId> {
        let id = data.id.clone();
        let mut state = self.inner.lock();
        if data.scheduled_at > Utc::now() {
            state.delayed.push(data);
        } else {
            state.ready.push(data);
        }
        Ok(id)
    }

    async fn dequeue(&self, queues: &[&str], _worker_id: &str) -> JobResult<Option<JobData>> {
        let mut state = self.inner.lock();
        state.promote_due();

        let index = state
            .ready
            .iter()
            .enumerate()
            .filter(|(_, data)| queues.contains(&data.queue.as_str()))
            .max_by_key(|(_, data)| (data.priority, std::cmp::Reverse(data.scheduled_at)))
            .map(|(index, _)| index);

        match index {
            Some(index) => {
                let mut data = state.ready.remove(index);
                data.increment_attempt();
                state
                    .processing
                    .insert(data.id.as_str().to_string(), data.clone());
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    async fn complete(&self, job_id: &JobId) -> JobResult<()> {
        let mut state = self.inner.lock();
        if let Some(data) = state.processing.remove(job_id.as_str()) {
            state.completed.push(data);
        }
        Ok(())
    }

    async fn fail(&self, job_id: &JobId, error: &JobError) -> JobResult<()> {
        let mut state = self.inner.lock();
        if let Some(mut data) = state.processing.remove(job_id.as_str()) {
            data.set_error(error);
            if error.is_retryable() && data.retry_policy.should_retry(data.attempt) {
                let delay = data.retry_policy.delay_for_attempt(data.attempt);
                data.scheduled_at = Utc::now()
                    + ChronoDuration::from_std(delay).unwrap_or_else(|_| ChronoDuration::zero());
                state.delayed.push(data);
            } else {
                state.dead_letter.push(data);
            }
        }
        Ok(())
    }

    async fn maintain(&self) -> JobResult<u64> {
        Ok(self.inner.lock().promote_due())
    }

    async fn get_job(&self, job_id: &JobId) -> JobResult<Option<JobInfo>> {
        let state = self.inner.lock();
        let with_status = |data: &JobData, status: JobStatus| {
            let mut info = JobInfo::from(data.clone());
            info.status = status;
            info
        };

        if let Some(data) = state.processing.get(job_id.as_str()) {
            return Ok(Some(with_status(data, JobStatus::Running)));
        }
        for (items, status) in [
            (&state.ready, JobStatus::Pending),
            (&state.delayed, JobStatus::Scheduled),
            (&state.completed, JobStatus::Completed),
            (&state.dead_letter, JobStatus::DeadLetter),
        ] {
            if let Some(data) = items.iter().find(|data| &data.id == job_id) {
                return Ok(Some(with_status(data, status)));
            }
        }
        Ok(None)
    }

    async fn stats(&self, queue: &str) -> JobResult<QueueStats> {
        let state = self.inner.lock();
        Ok(QueueStats {
            queue: queue.to_string(),
            pending: state.ready.len() as u64,
            processing: state.processing.len() as u64,
            delayed: state.delayed.len() as u64,
            dead_letter: state.dead_letter.len() as u64,
            completed: state.completed.len() as u64,
            failed: 0,
        })
    }

    async fn list_dlq(&self, limit: usize, offset: usize) -> JobResult<Vec<JobInfo>> {
        let state = self.inner.lock();
        Ok(state
            .dead_letter
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .map(|data| {
                let mut info = JobInfo::from(data.clone());
                info.status = JobStatus::DeadLetter;
                info
            })
            .collect())
    }

    async fn retry_dlq(&self, job_id: &JobId) -> JobResult<()> {
        let mut state = self.inner.lock();
        let index = state
            .dead_letter
            .iter()
            .position(|data| &data.id == job_id)
            .ok_or_else(|| JobError::NotFound(job_id.to_string()))?;
        let mut data = state.dead_letter.remove(index);
        data.attempt = 0;
        data.last_error = None;
        data.scheduled_at = Utc::now();
        state.ready.push(data);
        Ok(())
    }

    async fn health_check(&self) -> JobResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::Job;
    use crate::queue::{JobQueueExt, Priority, QueuedJob};
    use crate::retry::RetryPolicy;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct StubJob;

    impl Job for StubJob {
        const NAME: &'static str = "stub";
    }

    #[tokio::test]
    async fn test_enqueue_dequeue_complete() {
        let queue = InMemoryJobQueue::new();
        let id = queue.enqueue(StubJob).await.unwrap();

        let data = queue.dequeue(&["default"], "w1").await.unwrap().unwrap();
        assert_eq!(data.id, id);
        assert_eq!(data.attempt, 1);

        queue.complete(&id).await.unwrap();
        assert_eq!(queue.completed_count(), 1);

        let info = queue.get_job(&id).await.unwrap().unwrap();
        assert_eq!(info.status, JobStatus::Completed);
    }

    #[tokio::test]
    async fn test_higher_priority_dequeues_first() {
        let queue = InMemoryJobQueue::new();
        queue.enqueue(StubJob).await.unwrap();
        let urgent = queue
            .enqueue_with(QueuedJob::new(StubJob).priority(Priority::Critical))
            .await
            .unwrap();

        let first = queue.dequeue(&["default"], "w1").await.unwrap().unwrap();
        assert_eq!(first.id, urgent);
    }

    #[tokio::test]
    async fn test_exhausted_retries_reach_dead_letter() {
        let queue = InMemoryJobQueue::new();
        let id = queue
            .enqueue_with(QueuedJob::new(StubJob).with_retry(RetryPolicy::fixed(1, 0)))
            .await
            .unwrap();

        for _ in 0..2 {
            let data = queue.dequeue(&["default"], "w1").await.unwrap().unwrap();
            queue
                .fail(&data.id, &JobError::ExecutionFailed("nope".to_string()))
                .await
                .unwrap();
        }

        let dlq = queue.list_dlq(10, 0).await.unwrap();
        assert_eq!(dlq.len(), 1);
        assert_eq!(dlq[0].id, id);
        assert_eq!(dlq[0].status, JobStatus::DeadLetter);

        // Requeue resets the attempt counter.
        queue.retry_dlq(&id).await.unwrap();
        let data = queue.dequeue(&["default"], "w1").await.unwrap().unwrap();
        assert_eq!(data.attempt, 1);
        assert!(data.last_error.is_none());
    }
}
