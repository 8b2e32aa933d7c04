//! Spending insight shapes, cached in Redis per user.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Computed spending insights over the last 180 days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingInsights {
    /// Expense totals per calendar month, oldest first.
    pub monthly_trends: Vec<MonthlyTrend>,
    /// Per-category totals, averages and counts, largest total first.
    pub category_breakdown: Vec<CategoryBreakdownEntry>,
    /// Average spend per day of week, keyed by day name.
    pub day_of_week_patterns: BTreeMap<String, DayOfWeekPattern>,
    pub spending_velocity: SpendingVelocity,
}

/// One month's expense total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyTrend {
    /// Month display name, e.g. `January 2025`.
    pub month: String,
    pub amount: Decimal,
}

/// Aggregates for one expense category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBreakdownEntry {
    pub category: String,
    pub total_spent: Decimal,
    pub avg_transaction: Decimal,
    /// Number of expense transactions.
    pub frequency: u64,
}

/// Spending pattern for one day of the week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayOfWeekPattern {
    pub avg_spending: Decimal,
    pub total_transactions: u64,
}

/// Last 30 days of spending vs. the 30 before that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingVelocity {
    pub recent_month_total: Decimal,
    pub previous_month_total: Decimal,
    /// Percent change rounded to 2 decimals; 0 when the earlier window
    /// is empty.
    pub percentage_change: Decimal,
}
