//! Spending insights computed in the background and cached in Redis.

use crate::cache::{cache_keys, CacheExt, CacheInterface};
use crate::dto::{
    CategoryBreakdownEntry, DayOfWeekPattern, MonthlyTrend, SpendingInsights, SpendingVelocity,
};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use fintrack_core::{FintrackResult, Service, UserId};
use fintrack_repository::TransactionRepository;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Expense history window the insights cover.
const INSIGHT_WINDOW_DAYS: i64 = 180;

/// How long computed insights stay cached.
const INSIGHTS_TTL: std::time::Duration = std::time::Duration::from_secs(24 * 60 * 60);

/// Insights service trait.
#[async_trait]
pub trait InsightsService: Service {
    /// Computes a user's spending insights and caches the result.
    async fn calculate_and_store(&self, user_id: UserId) -> FintrackResult<SpendingInsights>;
}

/// Insights service implementation.
pub struct InsightsServiceImpl<T>
where
    T: TransactionRepository,
{
    transaction_repository: Arc<T>,
    cache: Arc<dyn CacheInterface>,
}

impl<T> InsightsServiceImpl<T>
where
    T: TransactionRepository,
{
    /// Creates a new insights service.
    pub fn new(transaction_repository: Arc<T>, cache: Arc<dyn CacheInterface>) -> Self {
        Self {
            transaction_repository,
            cache,
        }
    }

    fn average(total: Decimal, count: u64) -> Decimal {
        if count == 0 {
            return Decimal::ZERO;
        }
        (total / Decimal::from(count)).round_dp(2)
    }

    /// Day name for a MySQL `DAYOFWEEK` value (1 = Sunday).
    fn day_name(weekday: u32) -> Option<&'static str> {
        match weekday {
            1 => Some("Sunday"),
            2 => Some("Monday"),
            3 => Some("Tuesday"),
            4 => Some("Wednesday"),
            5 => Some("Thursday"),
            6 => Some("Friday"),
            7 => Some("Saturday"),
            _ => None,
        }
    }
}

#[async_trait]
impl<T> InsightsService for InsightsServiceImpl<T>
where
    T: TransactionRepository + 'static,
{
    async fn calculate_and_store(&self, user_id: UserId) -> FintrackResult<SpendingInsights> {
        debug!("Calculating spending insights for user: {}", user_id);

        let today = Utc::now().date_naive();
        let start = today - Duration::days(INSIGHT_WINDOW_DAYS);

        let monthly_trends = self
            .transaction_repository
            .monthly_totals(user_id, start, today)
            .await?
            .into_iter()
            .filter(|totals| !totals.expenses.is_zero())
            .filter_map(|totals| {
                NaiveDate::from_ymd_opt(totals.year, totals.month, 1).map(|month| MonthlyTrend {
                    month: month.format("%B %Y").to_string(),
                    amount: totals.expenses,
                })
            })
            .collect();

        let category_breakdown = self
            .transaction_repository
            .expenses_by_category(user_id, start, today, None)
            .await?
            .into_iter()
            .map(|spend| CategoryBreakdownEntry {
                avg_transaction: Self::average(spend.total, spend.transaction_count),
                category: spend.name.unwrap_or_else(|| "Other".to_string()),
                total_spent: spend.total,
                frequency: spend.transaction_count,
            })
            .collect();

        let mut day_of_week_patterns = BTreeMap::new();
        for spend in self
            .transaction_repository
            .day_of_week_expenses(user_id, start, today)
            .await?
        {
            if let Some(name) = Self::day_name(spend.weekday) {
                day_of_week_patterns.insert(
                    name.to_string(),
                    DayOfWeekPattern {
                        avg_spending: Self::average(spend.total, spend.transaction_count),
                        total_transactions: spend.transaction_count,
                    },
                );
            }
        }

        // Two back-to-back 30-day windows, most recent one ending today.
        let recent = self
            .transaction_repository
            .period_totals(user_id, today - Duration::days(30), today)
            .await?;
        let previous = self
            .transaction_repository
            .period_totals(user_id, today - Duration::days(60), today - Duration::days(31))
            .await?;
        let percentage_change = if previous.expenses.is_zero() {
            Decimal::ZERO
        } else {
            ((recent.expenses - previous.expenses) * Decimal::ONE_HUNDRED / previous.expenses)
                .round_dp(2)
        };

        let insights = SpendingInsights {
            monthly_trends,
            category_breakdown,
            day_of_week_patterns,
            spending_velocity: SpendingVelocity {
                recent_month_total: recent.expenses,
                previous_month_total: previous.expenses,
                percentage_change,
            },
        };

        self.cache
            .set(
                &cache_keys::spending_insights(user_id),
                &insights,
                INSIGHTS_TTL,
            )
            .await?;

        info!("Spending insights cached for user: {}", user_id);
        Ok(insights)
    }
}

impl<T> Service for InsightsServiceImpl<T> where T: TransactionRepository + 'static {}

impl<T> std::fmt::Debug for InsightsServiceImpl<T>
where
    T: TransactionRepository,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsightsServiceImpl").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryCache, InMemoryTransactionRepository};
    use chrono::Datelike;
    use fintrack_core::{Category, Transaction, TransactionType};
    use rust_decimal_macros::dec;

    struct TestContext {
        service: InsightsServiceImpl<InMemoryTransactionRepository>,
        transactions: Arc<InMemoryTransactionRepository>,
        cache: Arc<InMemoryCache>,
        user_id: UserId,
    }

    fn create_context() -> TestContext {
        let transactions = Arc::new(InMemoryTransactionRepository::new());
        let cache = Arc::new(InMemoryCache::new());
        let cache_interface: Arc<dyn CacheInterface> = cache.clone();
        let service = InsightsServiceImpl::new(Arc::clone(&transactions), cache_interface);

        TestContext {
            service,
            transactions,
            cache,
            user_id: UserId::new(),
        }
    }

    fn expense(ctx: &TestContext, amount: Decimal, date: NaiveDate) -> Transaction {
        Transaction::new(
            ctx.user_id,
            "Expense".to_string(),
            amount,
            TransactionType::Expense,
            date,
            None,
        )
    }

    #[tokio::test]
    async fn test_insights_sections_and_caching() {
        let ctx = create_context();
        let today = Utc::now().date_naive();

        let food = Category::new(ctx.user_id, "Food".to_string(), None, None);
        let food_id = food.id;
        ctx.transactions.add_category(food);

        let recent_date = today - Duration::days(5);
        let previous_date = today - Duration::days(45);

        let mut recent = expense(&ctx, dec!(100), recent_date);
        recent.category_id = Some(food_id);
        ctx.transactions.add(recent);

        let mut previous = expense(&ctx, dec!(50), previous_date);
        previous.category_id = Some(food_id);
        ctx.transactions.add(previous);

        // Income and out-of-window expenses do not count.
        ctx.transactions.add(Transaction::new(
            ctx.user_id,
            "Salary".to_string(),
            dec!(3000),
            TransactionType::Income,
            today,
            None,
        ));
        ctx.transactions
            .add(expense(&ctx, dec!(900), today - Duration::days(200)));

        let insights = ctx
            .service
            .calculate_and_store(ctx.user_id)
            .await
            .unwrap();

        let trend_total: Decimal = insights.monthly_trends.iter().map(|t| t.amount).sum();
        assert_eq!(trend_total, dec!(150));
        let expected_label = recent_date.with_day(1).unwrap().format("%B %Y").to_string();
        assert!(insights
            .monthly_trends
            .iter()
            .any(|t| t.month == expected_label));

        assert_eq!(insights.category_breakdown.len(), 1);
        let food_entry = &insights.category_breakdown[0];
        assert_eq!(food_entry.category, "Food");
        assert_eq!(food_entry.total_spent, dec!(150));
        assert_eq!(food_entry.frequency, 2);
        assert_eq!(food_entry.avg_transaction, dec!(75.00));

        // The two expenses are 40 days apart, so on different weekdays.
        assert_eq!(insights.day_of_week_patterns.len(), 2);
        let recent_day = recent_date.format("%A").to_string();
        assert_eq!(
            insights.day_of_week_patterns[&recent_day].avg_spending,
            dec!(100.00)
        );

        assert_eq!(insights.spending_velocity.recent_month_total, dec!(100));
        assert_eq!(insights.spending_velocity.previous_month_total, dec!(50));
        assert_eq!(insights.spending_velocity.percentage_change, dec!(100.00));

        let stored = ctx
            .cache
            .stored_json(&cache_keys::spending_insights(ctx.user_id))
            .unwrap();
        let cached: SpendingInsights = serde_json::from_str(&stored).unwrap();
        assert_eq!(cached.spending_velocity.recent_month_total, dec!(100));
    }

    #[tokio::test]
    async fn test_velocity_change_zero_without_previous_spending() {
        let ctx = create_context();
        let today = Utc::now().date_naive();

        ctx.transactions
            .add(expense(&ctx, dec!(75), today - Duration::days(3)));

        let insights = ctx
            .service
            .calculate_and_store(ctx.user_id)
            .await
            .unwrap();
        assert_eq!(insights.spending_velocity.recent_month_total, dec!(75));
        assert_eq!(insights.spending_velocity.percentage_change, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_velocity_windows_do_not_overlap() {
        let ctx = create_context();
        let today = Utc::now().date_naive();

        // Boundary dates: day 30 falls in the recent window, day 31 in
        // the previous one.
        ctx.transactions
            .add(expense(&ctx, dec!(10), today - Duration::days(30)));
        ctx.transactions
            .add(expense(&ctx, dec!(20), today - Duration::days(31)));

        let insights = ctx
            .service
            .calculate_and_store(ctx.user_id)
            .await
            .unwrap();
        assert_eq!(insights.spending_velocity.recent_month_total, dec!(10));
        assert_eq!(insights.spending_velocity.previous_month_total, dec!(20));
    }

    #[tokio::test]
    async fn test_empty_history_yields_empty_insights() {
        let ctx = create_context();

        let insights = ctx
            .service
            .calculate_and_store(ctx.user_id)
            .await
            .unwrap();
        assert!(insights.monthly_trends.is_empty());
        assert!(insights.category_breakdown.is_empty());
        assert!(insights.day_of_week_patterns.is_empty());
        assert_eq!(insights.spending_velocity.percentage_change, Decimal::ZERO);
    }
}
