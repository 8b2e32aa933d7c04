//! Savings goal service implementation.

use crate::dto::{CreateGoalRequest, GoalProgressRequest, GoalResponse, UpdateGoalRequest};
use async_trait::async_trait;
use chrono::Utc;
use fintrack_core::{
    FintrackError, FintrackResult, Goal, GoalId, Page, PageRequest, Service, UserId, ValidateExt,
};
use fintrack_repository::GoalRepository;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

/// Goal service trait.
#[async_trait]
pub trait GoalService: Service {
    /// Pages a user's goals, newest first.
    async fn list_goals(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> FintrackResult<Page<GoalResponse>>;

    /// Gets a goal by ID.
    async fn get_goal(&self, user_id: UserId, id: GoalId) -> FintrackResult<GoalResponse>;

    /// Creates a new goal.
    async fn create_goal(
        &self,
        user_id: UserId,
        request: CreateGoalRequest,
    ) -> FintrackResult<GoalResponse>;

    /// Updates an existing goal.
    async fn update_goal(
        &self,
        user_id: UserId,
        id: GoalId,
        request: UpdateGoalRequest,
    ) -> FintrackResult<GoalResponse>;

    /// Deletes a goal.
    async fn delete_goal(&self, user_id: UserId, id: GoalId) -> FintrackResult<()>;

    /// Adds an amount to a goal's saved progress.
    async fn record_progress(
        &self,
        user_id: UserId,
        id: GoalId,
        request: GoalProgressRequest,
    ) -> FintrackResult<GoalResponse>;
}

/// Goal service implementation.
pub struct GoalServiceImpl<G>
where
    G: GoalRepository,
{
    goal_repository: Arc<G>,
}

impl<G> GoalServiceImpl<G>
where
    G: GoalRepository,
{
    /// Creates a new goal service.
    pub fn new(goal_repository: Arc<G>) -> Self {
        Self { goal_repository }
    }

    fn validate_amount(amount: Decimal) -> FintrackResult<()> {
        if amount <= Decimal::ZERO {
            return Err(FintrackError::Validation(
                "Amount must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn respond(goal: Goal) -> GoalResponse {
        GoalResponse::new(goal, Utc::now().date_naive())
    }

    async fn find_owned(&self, user_id: UserId, id: GoalId) -> FintrackResult<Goal> {
        self.goal_repository
            .find_by_id(user_id, id)
            .await?
            .ok_or_else(|| FintrackError::not_found("Goal", id))
    }
}

#[async_trait]
impl<G> GoalService for GoalServiceImpl<G>
where
    G: GoalRepository + 'static,
{
    async fn list_goals(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> FintrackResult<Page<GoalResponse>> {
        debug!("Listing goals for user: {}", user_id);

        let today = Utc::now().date_naive();
        let goals = self.goal_repository.find_page(user_id, page).await?;
        Ok(goals.map(|goal| GoalResponse::new(goal, today)))
    }

    async fn get_goal(&self, user_id: UserId, id: GoalId) -> FintrackResult<GoalResponse> {
        let goal = self.find_owned(user_id, id).await?;
        Ok(Self::respond(goal))
    }

    async fn create_goal(
        &self,
        user_id: UserId,
        request: CreateGoalRequest,
    ) -> FintrackResult<GoalResponse> {
        debug!("Creating goal for user: {}", user_id);

        request.validate_request()?;
        Self::validate_amount(request.target_amount)?;

        let mut goal = Goal::new(
            user_id,
            request.name,
            request.goal_type,
            request.target_amount,
            request.target_date,
        );
        goal.description = request.description;

        let saved = self.goal_repository.save(&goal).await?;

        info!("Goal created: {}", saved.id);
        Ok(Self::respond(saved))
    }

    async fn update_goal(
        &self,
        user_id: UserId,
        id: GoalId,
        request: UpdateGoalRequest,
    ) -> FintrackResult<GoalResponse> {
        debug!("Updating goal: {}", id);

        request.validate_request()?;

        let mut goal = self.find_owned(user_id, id).await?;

        if let Some(name) = request.name {
            goal.name = name;
        }
        if let Some(description) = request.description {
            goal.description = Some(description);
        }
        if let Some(goal_type) = request.goal_type {
            goal.goal_type = goal_type;
        }
        if let Some(target_amount) = request.target_amount {
            Self::validate_amount(target_amount)?;
            goal.target_amount = target_amount;
        }
        if let Some(target_date) = request.target_date {
            goal.target_date = target_date;
        }
        goal.updated_at = Utc::now();

        let updated = self.goal_repository.update(&goal).await?;

        info!("Goal updated: {}", id);
        Ok(Self::respond(updated))
    }

    async fn delete_goal(&self, user_id: UserId, id: GoalId) -> FintrackResult<()> {
        debug!("Deleting goal: {}", id);

        let deleted = self.goal_repository.delete(user_id, id).await?;
        if !deleted {
            return Err(FintrackError::not_found("Goal", id));
        }

        info!("Goal deleted: {}", id);
        Ok(())
    }

    async fn record_progress(
        &self,
        user_id: UserId,
        id: GoalId,
        request: GoalProgressRequest,
    ) -> FintrackResult<GoalResponse> {
        debug!("Recording progress for goal: {}", id);

        let amount = request
            .amount
            .ok_or_else(|| FintrackError::BadRequest("Amount is required".to_string()))?;

        let mut goal = self.find_owned(user_id, id).await?;
        goal.record_progress(amount);

        let updated = self.goal_repository.update(&goal).await?;

        if updated.is_achieved {
            info!("Goal achieved: {}", id);
        }
        Ok(Self::respond(updated))
    }
}

impl<G> Service for GoalServiceImpl<G> where G: GoalRepository + 'static {}

impl<G> std::fmt::Debug for GoalServiceImpl<G>
where
    G: GoalRepository,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoalServiceImpl").finish_non_exhaustive()
    }
}
