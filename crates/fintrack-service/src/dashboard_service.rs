//! Dashboard aggregation service.

use crate::dto::{
    BudgetStats, CategorySpendEntry, CurrentMonthStats, DashboardResponse, GoalStats,
    TransactionResponse,
};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use fintrack_core::{FintrackResult, Goal, Service, UserId};
use fintrack_repository::{BudgetRepository, GoalRepository, TransactionRepository};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;

/// How many recent transactions the dashboard shows.
const RECENT_LIMIT: u32 = 5;

/// How many top expense categories the dashboard shows.
const TOP_CATEGORY_LIMIT: u32 = 3;

/// Dashboard service trait.
#[async_trait]
pub trait DashboardService: Service {
    /// Builds the dashboard payload for a user.
    async fn dashboard(&self, user_id: UserId) -> FintrackResult<DashboardResponse>;
}

/// Dashboard service implementation.
pub struct DashboardServiceImpl<T, B, G>
where
    T: TransactionRepository,
    B: BudgetRepository,
    G: GoalRepository,
{
    transaction_repository: Arc<T>,
    budget_repository: Arc<B>,
    goal_repository: Arc<G>,
}

impl<T, B, G> DashboardServiceImpl<T, B, G>
where
    T: TransactionRepository,
    B: BudgetRepository,
    G: GoalRepository,
{
    /// Creates a new dashboard service.
    pub fn new(
        transaction_repository: Arc<T>,
        budget_repository: Arc<B>,
        goal_repository: Arc<G>,
    ) -> Self {
        Self {
            transaction_repository,
            budget_repository,
            goal_repository,
        }
    }

    /// A goal counts as on track when actual progress is at least 80%
    /// of the progress expected from elapsed time.
    fn is_on_track(goal: &Goal, today: NaiveDate) -> bool {
        let days_elapsed = (today - goal.created_at.date_naive()).num_days().max(0) as f64;
        let total_days = (days_elapsed + goal.days_remaining(today) as f64).max(1.0);
        let expected = (days_elapsed / total_days * 100.0).min(100.0);
        let actual = goal.progress_percentage().to_f64().unwrap_or(0.0);
        actual >= expected * 0.8
    }

    fn expense_change(current: Decimal, previous: Decimal) -> Decimal {
        if previous.is_zero() {
            return Decimal::ZERO;
        }
        ((current - previous) * Decimal::ONE_HUNDRED / previous).round_dp(2)
    }
}

#[async_trait]
impl<T, B, G> DashboardService for DashboardServiceImpl<T, B, G>
where
    T: TransactionRepository + 'static,
    B: BudgetRepository + 'static,
    G: GoalRepository + 'static,
{
    async fn dashboard(&self, user_id: UserId) -> FintrackResult<DashboardResponse> {
        debug!("Building dashboard for user: {}", user_id);

        let today = Utc::now().date_naive();
        let month_start = today.with_day(1).unwrap_or(today);
        let prev_end = month_start.pred_opt().unwrap_or(month_start);
        let prev_start = prev_end.with_day(1).unwrap_or(prev_end);

        let current = self
            .transaction_repository
            .period_totals(user_id, month_start, today)
            .await?;
        let previous = self
            .transaction_repository
            .period_totals(user_id, prev_start, prev_end)
            .await?;

        let current_month = CurrentMonthStats {
            income: current.income,
            expenses: current.expenses,
            net: current.income - current.expenses,
            expense_change_percentage: Self::expense_change(current.expenses, previous.expenses),
        };

        let mut budget_stats = BudgetStats {
            active_count: 0,
            over_budget_count: 0,
            near_limit_count: 0,
        };
        for (budget, spent) in self
            .budget_repository
            .find_all_with_spent(user_id)
            .await?
            .into_iter()
            .filter(|(b, _)| b.is_active)
        {
            if budget.is_current(today) {
                budget_stats.active_count += 1;
            }
            if budget.is_over_budget(spent) {
                budget_stats.over_budget_count += 1;
            } else if budget.is_near_limit(spent) {
                budget_stats.near_limit_count += 1;
            }
        }

        let active_goals = self.goal_repository.find_active(user_id).await?;
        let goal_stats = GoalStats {
            total_count: active_goals.len() as u64,
            on_track_count: active_goals
                .iter()
                .filter(|goal| Self::is_on_track(goal, today))
                .count() as u64,
        };

        let recent_transactions = self
            .transaction_repository
            .find_recent(user_id, RECENT_LIMIT)
            .await?
            .iter()
            .map(TransactionResponse::from)
            .collect();

        let top_categories = self
            .transaction_repository
            .expenses_by_category(user_id, month_start, today, Some(TOP_CATEGORY_LIMIT))
            .await?
            .into_iter()
            .map(CategorySpendEntry::from)
            .collect();

        Ok(DashboardResponse {
            current_month,
            budgets: budget_stats,
            goals: goal_stats,
            recent_transactions,
            top_categories,
        })
    }
}

impl<T, B, G> Service for DashboardServiceImpl<T, B, G>
where
    T: TransactionRepository + 'static,
    B: BudgetRepository + 'static,
    G: GoalRepository + 'static,
{
}

impl<T, B, G> std::fmt::Debug for DashboardServiceImpl<T, B, G>
where
    T: TransactionRepository,
    B: BudgetRepository,
    G: GoalRepository,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardServiceImpl").finish_non_exhaustive()
    }
}
