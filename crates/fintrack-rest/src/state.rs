//! Application state for Axum handlers.

use fintrack_jobs::{JobQueue, Scheduler};
use fintrack_service::{
    AdvisorService, AuthService, BudgetService, CategoryService, DashboardService, GoalService,
    ProfileService, RecurringService, TransactionService,
};
use std::sync::Arc;

/// Shared application state.
///
/// The job queue and scheduler are optional: they are absent when Redis
/// or background jobs are disabled, and the admin endpoints answer 503.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub category_service: Arc<dyn CategoryService>,
    pub transaction_service: Arc<dyn TransactionService>,
    pub budget_service: Arc<dyn BudgetService>,
    pub goal_service: Arc<dyn GoalService>,
    pub recurring_service: Arc<dyn RecurringService>,
    pub profile_service: Arc<dyn ProfileService>,
    pub dashboard_service: Arc<dyn DashboardService>,
    pub advisor_service: Arc<dyn AdvisorService>,
    pub job_queue: Option<Arc<dyn JobQueue>>,
    pub scheduler: Option<Arc<Scheduler>>,
}
