//! Dashboard DTOs.

use super::{CategorySpendEntry, TransactionResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The dashboard payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub current_month: CurrentMonthStats,
    pub budgets: BudgetStats,
    pub goals: GoalStats,
    /// Latest 5 transactions.
    pub recent_transactions: Vec<TransactionResponse>,
    /// Top 3 expense categories this month.
    pub top_categories: Vec<CategorySpendEntry>,
}

/// Income/expense figures for the current calendar month.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentMonthStats {
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
    /// Expense change vs. the previous calendar month, percent rounded
    /// to 2 decimals; 0 when the previous month had no expenses.
    pub expense_change_percentage: Decimal,
}

/// Budget counters.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BudgetStats {
    /// Active budgets whose window covers today.
    pub active_count: u64,
    pub over_budget_count: u64,
    pub near_limit_count: u64,
}

/// Goal counters.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GoalStats {
    /// Unachieved goals.
    pub total_count: u64,
    /// Goals whose progress is at least 80% of the pace needed.
    pub on_track_count: u64,
}
