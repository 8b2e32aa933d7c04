//! Budget service implementation.

use crate::dto::{BudgetAlertsResponse, BudgetResponse, CreateBudgetRequest, UpdateBudgetRequest};
use async_trait::async_trait;
use chrono::Utc;
use fintrack_core::{
    Budget, BudgetId, FintrackError, FintrackResult, Page, PageRequest, Service, UserId,
};
use fintrack_repository::{BudgetRepository, CategoryRepository};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

/// Budget service trait.
#[async_trait]
pub trait BudgetService: Service {
    /// Pages a user's budgets with spending state.
    async fn list_budgets(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> FintrackResult<Page<BudgetResponse>>;

    /// Gets a budget by ID with spending state.
    async fn get_budget(&self, user_id: UserId, id: BudgetId) -> FintrackResult<BudgetResponse>;

    /// Creates a new budget.
    async fn create_budget(
        &self,
        user_id: UserId,
        request: CreateBudgetRequest,
    ) -> FintrackResult<BudgetResponse>;

    /// Updates an existing budget.
    async fn update_budget(
        &self,
        user_id: UserId,
        id: BudgetId,
        request: UpdateBudgetRequest,
    ) -> FintrackResult<BudgetResponse>;

    /// Deletes a budget.
    async fn delete_budget(&self, user_id: UserId, id: BudgetId) -> FintrackResult<()>;

    /// Splits the user's active budgets into over-budget and near-limit.
    async fn alerts(&self, user_id: UserId) -> FintrackResult<BudgetAlertsResponse>;
}

/// Budget service implementation.
pub struct BudgetServiceImpl<B, C>
where
    B: BudgetRepository,
    C: CategoryRepository,
{
    budget_repository: Arc<B>,
    category_repository: Arc<C>,
}

impl<B, C> BudgetServiceImpl<B, C>
where
    B: BudgetRepository,
    C: CategoryRepository,
{
    /// Creates a new budget service.
    pub fn new(budget_repository: Arc<B>, category_repository: Arc<C>) -> Self {
        Self {
            budget_repository,
            category_repository,
        }
    }

    fn validate_amount(amount: Decimal) -> FintrackResult<()> {
        if amount <= Decimal::ZERO {
            return Err(FintrackError::Validation(
                "Amount must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_threshold(threshold: Decimal) -> FintrackResult<()> {
        if threshold <= Decimal::ZERO || threshold > Decimal::ONE_HUNDRED {
            return Err(FintrackError::Validation(
                "Alert threshold must be between 0 and 100".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_dates(budget: &Budget) -> FintrackResult<()> {
        if budget.end_date < budget.start_date {
            return Err(FintrackError::Validation(
                "End date must be on or after start date".to_string(),
            ));
        }
        Ok(())
    }

    /// Re-reads a budget with its spent amount after a write, so the
    /// response reflects transactions already inside the window.
    async fn respond_with_spent(
        &self,
        user_id: UserId,
        id: BudgetId,
    ) -> FintrackResult<BudgetResponse> {
        let (budget, spent) = self
            .budget_repository
            .find_by_id_with_spent(user_id, id)
            .await?
            .ok_or_else(|| FintrackError::not_found("Budget", id))?;
        Ok(BudgetResponse::from((budget, spent)))
    }
}

#[async_trait]
impl<B, C> BudgetService for BudgetServiceImpl<B, C>
where
    B: BudgetRepository + 'static,
    C: CategoryRepository + 'static,
{
    async fn list_budgets(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> FintrackResult<Page<BudgetResponse>> {
        debug!("Listing budgets for user: {}", user_id);

        let budgets = self
            .budget_repository
            .find_page_with_spent(user_id, page)
            .await?;
        Ok(budgets.map(BudgetResponse::from))
    }

    async fn get_budget(&self, user_id: UserId, id: BudgetId) -> FintrackResult<BudgetResponse> {
        self.respond_with_spent(user_id, id).await
    }

    async fn create_budget(
        &self,
        user_id: UserId,
        request: CreateBudgetRequest,
    ) -> FintrackResult<BudgetResponse> {
        debug!("Creating budget for user: {}", user_id);

        Self::validate_amount(request.amount)?;

        if self
            .category_repository
            .find_by_id(user_id, request.category_id)
            .await?
            .is_none()
        {
            return Err(FintrackError::Validation(format!(
                "Unknown category: {}",
                request.category_id
            )));
        }

        let mut budget = Budget::new(
            user_id,
            request.category_id,
            request.amount,
            request.period,
            request.start_date,
            request.end_date,
        );
        if let Some(threshold) = request.alert_threshold {
            Self::validate_threshold(threshold)?;
            budget.alert_threshold = threshold;
        }
        Self::validate_dates(&budget)?;

        let saved = self.budget_repository.save(&budget).await?;

        info!("Budget created: {}", saved.id);
        self.respond_with_spent(user_id, saved.id).await
    }

    async fn update_budget(
        &self,
        user_id: UserId,
        id: BudgetId,
        request: UpdateBudgetRequest,
    ) -> FintrackResult<BudgetResponse> {
        debug!("Updating budget: {}", id);

        let mut budget = self
            .budget_repository
            .find_by_id(user_id, id)
            .await?
            .ok_or_else(|| FintrackError::not_found("Budget", id))?;

        if let Some(amount) = request.amount {
            Self::validate_amount(amount)?;
            budget.amount = amount;
        }
        if let Some(period) = request.period {
            budget.period = period;
        }
        if let Some(start_date) = request.start_date {
            budget.start_date = start_date;
        }
        if let Some(end_date) = request.end_date {
            budget.end_date = end_date;
        }
        if let Some(threshold) = request.alert_threshold {
            Self::validate_threshold(threshold)?;
            budget.alert_threshold = threshold;
        }
        if let Some(is_active) = request.is_active {
            budget.is_active = is_active;
        }
        Self::validate_dates(&budget)?;
        budget.updated_at = Utc::now();

        self.budget_repository.update(&budget).await?;

        info!("Budget updated: {}", id);
        self.respond_with_spent(user_id, id).await
    }

    async fn delete_budget(&self, user_id: UserId, id: BudgetId) -> FintrackResult<()> {
        debug!("Deleting budget: {}", id);

        let deleted = self.budget_repository.delete(user_id, id).await?;
        if !deleted {
            return Err(FintrackError::not_found("Budget", id));
        }

        info!("Budget deleted: {}", id);
        Ok(())
    }

    async fn alerts(&self, user_id: UserId) -> FintrackResult<BudgetAlertsResponse> {
        debug!("Budget alerts for user: {}", user_id);

        let budgets = self.budget_repository.find_all_with_spent(user_id).await?;

        let mut over_budget = Vec::new();
        let mut near_limit = Vec::new();
        for (budget, spent) in budgets.into_iter().filter(|(b, _)| b.is_active) {
            if budget.is_over_budget(spent) {
                over_budget.push(BudgetResponse::from((budget, spent)));
            } else if budget.is_near_limit(spent) {
                near_limit.push(BudgetResponse::from((budget, spent)));
            }
        }

        Ok(BudgetAlertsResponse {
            over_budget,
            near_limit,
        })
    }
}

impl<B, C> Service for BudgetServiceImpl<B, C>
where
    B: BudgetRepository + 'static,
    C: CategoryRepository + 'static,
{
}

impl<B, C> std::fmt::Debug for BudgetServiceImpl<B, C>
where
    B: BudgetRepository,
    C: CategoryRepository,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BudgetServiceImpl").finish_non_exhaustive()
    }
}
