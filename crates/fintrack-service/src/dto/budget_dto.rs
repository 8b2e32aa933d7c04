//! Budget DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use fintrack_core::{Budget, BudgetId, BudgetPeriod, CategoryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to create a budget.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateBudgetRequest {
    pub category_id: CategoryId,

    pub amount: Decimal,

    pub period: BudgetPeriod,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,

    /// Percent of the limit that triggers a near-limit alert; default 80.
    pub alert_threshold: Option<Decimal>,
}

/// Request to update a budget. Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateBudgetRequest {
    pub amount: Option<Decimal>,

    pub period: Option<BudgetPeriod>,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,

    pub alert_threshold: Option<Decimal>,

    pub is_active: Option<bool>,
}

/// Budget response with its computed spending state.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BudgetResponse {
    pub id: BudgetId,
    pub category_id: CategoryId,
    pub amount: Decimal,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub alert_threshold: Decimal,
    pub is_active: bool,
    pub spent_amount: Decimal,
    pub remaining_amount: Decimal,
    pub percentage_used: Decimal,
    pub is_over_budget: bool,
    pub is_near_limit: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<(Budget, Decimal)> for BudgetResponse {
    fn from((budget, spent): (Budget, Decimal)) -> Self {
        Self {
            id: budget.id,
            category_id: budget.category_id,
            amount: budget.amount,
            period: budget.period,
            start_date: budget.start_date,
            end_date: budget.end_date,
            alert_threshold: budget.alert_threshold,
            is_active: budget.is_active,
            spent_amount: spent,
            remaining_amount: budget.remaining_amount(spent),
            percentage_used: budget.percentage_used(spent),
            is_over_budget: budget.is_over_budget(spent),
            is_near_limit: budget.is_near_limit(spent),
            created_at: budget.created_at,
            updated_at: budget.updated_at,
        }
    }
}

/// Active budgets split by alert state.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BudgetAlertsResponse {
    pub over_budget: Vec<BudgetResponse>,
    pub near_limit: Vec<BudgetResponse>,
}
