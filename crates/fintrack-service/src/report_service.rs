//! Scheduled notification flows: budget alerts, monthly reports, goal
//! deadline reminders.
//!
//! Each flow walks qualifying records across all users, looks up the
//! owner once per run, checks the profile's notification opt-ins, and
//! hands composed messages to the [`Notifier`]. A failed send is logged
//! and skipped so one bad recipient does not abort the run.

use crate::notify::{self, Notifier};
use async_trait::async_trait;
use chrono::{Datelike, Duration, Utc};
use fintrack_core::{FintrackResult, Service, User, UserId, UserProfile};
use fintrack_repository::{
    BudgetRepository, CategoryRepository, GoalRepository, TransactionRepository,
    UserProfileRepository, UserRepository,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Days ahead a goal deadline triggers a reminder.
const GOAL_REMINDER_DAYS: i64 = 30;

/// How many top categories the monthly report lists.
const REPORT_CATEGORY_LIMIT: u32 = 5;

/// Report service trait.
#[async_trait]
pub trait ReportService: Service {
    /// Sends over-budget and near-limit alerts for current budgets.
    /// Returns the number of notifications sent.
    async fn send_budget_alerts(&self) -> FintrackResult<u64>;

    /// Sends last month's financial report to users who had activity.
    /// Returns the number of reports sent.
    async fn send_monthly_reports(&self) -> FintrackResult<u64>;

    /// Sends reminders for unachieved goals with deadlines inside the
    /// next 30 days. Returns the number of reminders sent.
    async fn send_goal_reminders(&self) -> FintrackResult<u64>;
}

type RecipientCache = HashMap<UserId, Option<(User, UserProfile)>>;

/// Report service implementation.
pub struct ReportServiceImpl<U, P, T, B, C, G>
where
    U: UserRepository,
    P: UserProfileRepository,
    T: TransactionRepository,
    B: BudgetRepository,
    C: CategoryRepository,
    G: GoalRepository,
{
    user_repository: Arc<U>,
    profile_repository: Arc<P>,
    transaction_repository: Arc<T>,
    budget_repository: Arc<B>,
    category_repository: Arc<C>,
    goal_repository: Arc<G>,
    notifier: Arc<dyn Notifier>,
}

impl<U, P, T, B, C, G> ReportServiceImpl<U, P, T, B, C, G>
where
    U: UserRepository,
    P: UserProfileRepository,
    T: TransactionRepository,
    B: BudgetRepository,
    C: CategoryRepository,
    G: GoalRepository,
{
    /// Creates a new report service.
    pub fn new(
        user_repository: Arc<U>,
        profile_repository: Arc<P>,
        transaction_repository: Arc<T>,
        budget_repository: Arc<B>,
        category_repository: Arc<C>,
        goal_repository: Arc<G>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            user_repository,
            profile_repository,
            transaction_repository,
            budget_repository,
            category_repository,
            goal_repository,
            notifier,
        }
    }

    /// Loads the owner and profile for a notification, memoized per
    /// run. Inactive users get `None`; a missing profile falls back to
    /// defaults (all notifications wanted).
    async fn recipient(
        &self,
        cache: &mut RecipientCache,
        user_id: UserId,
    ) -> FintrackResult<Option<(User, UserProfile)>> {
        if let Some(entry) = cache.get(&user_id) {
            return Ok(entry.clone());
        }

        let entry = match self.user_repository.find_by_id(user_id).await? {
            Some(user) if user.is_active() => {
                let profile = match self.profile_repository.find_by_user_id(user_id).await? {
                    Some(profile) => profile,
                    None => UserProfile::new(user_id),
                };
                Some((user, profile))
            }
            _ => None,
        };
        cache.insert(user_id, entry.clone());
        Ok(entry)
    }

    async fn deliver(&self, user: &User, subject: &str, body: &str) -> bool {
        match self.notifier.send(user.email.as_str(), subject, body).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to notify {}: {}", user.email, e);
                false
            }
        }
    }
}

#[async_trait]
impl<U, P, T, B, C, G> ReportService for ReportServiceImpl<U, P, T, B, C, G>
where
    U: UserRepository + 'static,
    P: UserProfileRepository + 'static,
    T: TransactionRepository + 'static,
    B: BudgetRepository + 'static,
    C: CategoryRepository + 'static,
    G: GoalRepository + 'static,
{
    async fn send_budget_alerts(&self) -> FintrackResult<u64> {
        let today = Utc::now().date_naive();
        debug!("Checking budget alerts for {}", today);

        let budgets = self
            .budget_repository
            .find_current_with_spent_all_users(today)
            .await?;

        let mut recipients = RecipientCache::new();
        let mut sent = 0u64;
        for (budget, spent) in budgets {
            let over = budget.is_over_budget(spent);
            if !over && !budget.is_near_limit(spent) {
                continue;
            }

            let (user, profile) = match self.recipient(&mut recipients, budget.user_id).await? {
                Some(pair) => pair,
                None => continue,
            };
            if !profile.wants_notification("budget_alerts") {
                continue;
            }

            let category_name = self
                .category_repository
                .find_by_id(budget.user_id, budget.category_id)
                .await?
                .map(|category| category.name)
                .unwrap_or_else(|| "Uncategorized".to_string());

            let (subject, body) = if over {
                notify::over_budget_message(user.display_name(), &category_name, &budget, spent)
            } else {
                notify::near_limit_message(user.display_name(), &category_name, &budget, spent)
            };
            if self.deliver(&user, &subject, &body).await {
                sent += 1;
            }
        }

        info!("Budget alert run sent {} notifications", sent);
        Ok(sent)
    }

    async fn send_monthly_reports(&self) -> FintrackResult<u64> {
        let today = Utc::now().date_naive();
        let month_start = today.with_day(1).unwrap_or(today);
        let prev_end = month_start.pred_opt().unwrap_or(month_start);
        let prev_start = prev_end.with_day(1).unwrap_or(prev_end);
        let month_name = prev_start.format("%B %Y").to_string();
        debug!("Generating monthly reports for {}", month_name);

        let user_ids = self
            .transaction_repository
            .user_ids_with_activity(prev_start, prev_end)
            .await?;

        let mut recipients = RecipientCache::new();
        let mut sent = 0u64;
        for user_id in user_ids {
            let (user, profile) = match self.recipient(&mut recipients, user_id).await? {
                Some(pair) => pair,
                None => continue,
            };
            if !profile.wants_notification("monthly_reports") {
                continue;
            }

            let totals = self
                .transaction_repository
                .period_totals(user_id, prev_start, prev_end)
                .await?;
            let top_categories = self
                .transaction_repository
                .expenses_by_category(user_id, prev_start, prev_end, Some(REPORT_CATEGORY_LIMIT))
                .await?;

            let (subject, body) = notify::monthly_report_message(
                user.display_name(),
                &month_name,
                &totals,
                &top_categories,
            );
            if self.deliver(&user, &subject, &body).await {
                sent += 1;
            }
        }

        info!("Monthly report run sent {} reports", sent);
        Ok(sent)
    }

    async fn send_goal_reminders(&self) -> FintrackResult<u64> {
        let today = Utc::now().date_naive();
        let deadline = today + Duration::days(GOAL_REMINDER_DAYS);
        debug!("Checking goal deadlines through {}", deadline);

        let goals = self
            .goal_repository
            .find_unachieved_with_deadline_between(today, deadline)
            .await?;

        let mut recipients = RecipientCache::new();
        let mut sent = 0u64;
        for goal in goals {
            let (user, profile) = match self.recipient(&mut recipients, goal.user_id).await? {
                Some(pair) => pair,
                None => continue,
            };
            if !profile.wants_notification("goal_reminders") {
                continue;
            }

            let (subject, body) = notify::goal_deadline_message(user.display_name(), &goal, today);
            if self.deliver(&user, &subject, &body).await {
                sent += 1;
            }
        }

        info!("Goal reminder run sent {} reminders", sent);
        Ok(sent)
    }
}

impl<U, P, T, B, C, G> Service for ReportServiceImpl<U, P, T, B, C, G>
where
    U: UserRepository + 'static,
    P: UserProfileRepository + 'static,
    T: TransactionRepository + 'static,
    B: BudgetRepository + 'static,
    C: CategoryRepository + 'static,
    G: GoalRepository + 'static,
{
}

impl<U, P, T, B, C, G> std::fmt::Debug for ReportServiceImpl<U, P, T, B, C, G>
where
    U: UserRepository,
    P: UserProfileRepository,
    T: TransactionRepository,
    B: BudgetRepository,
    C: CategoryRepository,
    G: GoalRepository,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportServiceImpl").finish_non_exhaustive()
    }
}
