//! Background job payload types.
//!
//! These describe the work and its queueing behaviour; the handlers
//! binding them to services, and the cron schedules for the recurring
//! ones, are registered at server startup.

use chrono::{DateTime, Duration, Utc};
use fintrack_core::UserId;
use fintrack_jobs::{Job, RetryPolicy};
use serde::{Deserialize, Serialize};

/// Materializes due recurring templates into transactions.
///
/// Scheduled daily shortly after midnight so the day's occurrences
/// exist before users check their feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRecurringTransactionsJob;

impl Job for ProcessRecurringTransactionsJob {
    const NAME: &'static str = "process-recurring-transactions";
}

/// Notifies users whose budgets crossed their alert threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendBudgetAlertsJob;

impl Job for SendBudgetAlertsJob {
    const NAME: &'static str = "send-budget-alerts";
}

/// Sends the previous month's spending summary to opted-in users.
/// Scheduled on the first of each month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateMonthlyReportsJob;

impl Job for GenerateMonthlyReportsJob {
    const NAME: &'static str = "generate-monthly-reports";
    const TIMEOUT_SECS: u64 = 900;
}

/// Reminds users about savings goals approaching their deadline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckGoalDeadlinesJob;

impl Job for CheckGoalDeadlinesJob {
    const NAME: &'static str = "check-goal-deadlines";
}

/// Purges transactions past the retention window. Scheduled weekly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupOldDataJob;

impl CleanupOldDataJob {
    /// Transactions created this many days ago or earlier are purged.
    pub const RETENTION_DAYS: i64 = 7 * 365;

    pub fn cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(Self::RETENTION_DAYS)
    }
}

impl Job for CleanupOldDataJob {
    const NAME: &'static str = "cleanup-old-data";
    const MAX_RETRIES: u32 = 1;
    const TIMEOUT_SECS: u64 = 1_800;
}

/// Writes one user's data to a backup archive. Enqueued on demand; at
/// most one backup per user runs at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupUserDataJob {
    pub user_id: UserId,
}

impl Job for BackupUserDataJob {
    const NAME: &'static str = "backup-user-data";
    const TIMEOUT_SECS: u64 = 600;

    fn unique_key(&self) -> Option<String> {
        Some(format!("{}:{}", Self::NAME, self.user_id))
    }
}

/// Recomputes and caches one user's spending insights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateInsightsJob {
    pub user_id: UserId,
}

impl Job for CalculateInsightsJob {
    const NAME: &'static str = "calculate-spending-insights";
    const MAX_RETRIES: u32 = 2;

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::exponential(Self::MAX_RETRIES).with_max_delay(60_000)
    }

    fn unique_key(&self) -> Option<String> {
        Some(format!("{}:{}", Self::NAME, self.user_id))
    }
}
