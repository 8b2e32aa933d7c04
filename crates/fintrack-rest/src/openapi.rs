//! OpenAPI documentation configuration.
//!
//! This module provides OpenAPI/Swagger documentation generation for the REST API.

use fintrack_advisor::{EmergencyFundPlan, GoalSavingsPlan, InvestmentPlan, SpendingPlan};
use fintrack_core::{
    BudgetId, BudgetPeriod, CategoryId, ErrorResponse, FieldError, Frequency, GoalId, GoalType,
    RecurringTransactionId, TransactionId, TransactionType, UserId, UserRole,
};
use fintrack_jobs::{JobId, JobInfo, JobStatus, QueueStats, ScheduledJobInfo, SchedulerStats};
use fintrack_service::{
    AuthResponse, AuthUserInfo, BudgetAlertsResponse, BudgetResponse, BudgetStats,
    BulkUploadResponse, CategorizeRequest, CategorizeResponse, CategoryAnalysisEntry,
    CategoryResponse, CategorySpendEntry, CreateBudgetRequest, CreateCategoryRequest,
    CreateGoalRequest, CreateRecurringRequest, CreateTransactionRequest, CurrentMonthStats,
    DashboardResponse, GoalProgressRequest, GoalResponse, GoalStats, LoginRequest,
    MessageResponse, PlanRequest, ProfileResponse, RecurringResponse, RefreshTokenRequest,
    RegisterRequest, SummaryResponse, TransactionResponse, UpdateBudgetRequest,
    UpdateCategoryRequest, UpdateGoalRequest, UpdateProfileRequest, UpdateRecurringRequest,
    UpdateTransactionRequest,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::controllers::health_controller::HealthResponse;
use crate::controllers::jobs_controller::{
    JobsStatsResponse, TriggerJobRequest, TriggeredJobResponse,
};

/// OpenAPI documentation for the Fintrack API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fintrack API",
        version = "1.0.0",
        description = "RESTful API for the Fintrack personal finance platform"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Auth endpoints
        crate::controllers::auth_controller::register,
        crate::controllers::auth_controller::login,
        crate::controllers::auth_controller::refresh_token,
        crate::controllers::auth_controller::logout,
        crate::controllers::auth_controller::get_current_user,
        // Category endpoints
        crate::controllers::category_controller::list_categories,
        crate::controllers::category_controller::get_category,
        crate::controllers::category_controller::create_category,
        crate::controllers::category_controller::update_category,
        crate::controllers::category_controller::delete_category,
        // Transaction endpoints
        crate::controllers::transaction_controller::list_transactions,
        crate::controllers::transaction_controller::get_transaction,
        crate::controllers::transaction_controller::create_transaction,
        crate::controllers::transaction_controller::update_transaction,
        crate::controllers::transaction_controller::delete_transaction,
        crate::controllers::transaction_controller::summary,
        crate::controllers::transaction_controller::category_analysis,
        crate::controllers::transaction_controller::bulk_upload,
        // Budget endpoints
        crate::controllers::budget_controller::list_budgets,
        crate::controllers::budget_controller::get_budget,
        crate::controllers::budget_controller::create_budget,
        crate::controllers::budget_controller::update_budget,
        crate::controllers::budget_controller::delete_budget,
        crate::controllers::budget_controller::budget_alerts,
        // Goal endpoints
        crate::controllers::goal_controller::list_goals,
        crate::controllers::goal_controller::get_goal,
        crate::controllers::goal_controller::create_goal,
        crate::controllers::goal_controller::update_goal,
        crate::controllers::goal_controller::delete_goal,
        crate::controllers::goal_controller::record_progress,
        // Recurring transaction endpoints
        crate::controllers::recurring_controller::list_recurring,
        crate::controllers::recurring_controller::get_recurring,
        crate::controllers::recurring_controller::create_recurring,
        crate::controllers::recurring_controller::update_recurring,
        crate::controllers::recurring_controller::delete_recurring,
        // Profile endpoints
        crate::controllers::profile_controller::get_profile,
        crate::controllers::profile_controller::update_profile,
        // Dashboard endpoints
        crate::controllers::dashboard_controller::dashboard,
        // Advisor endpoints
        crate::controllers::advisor_controller::categorize,
        crate::controllers::advisor_controller::generate_plan,
        // Job administration endpoints
        crate::controllers::jobs_controller::jobs_stats,
        crate::controllers::jobs_controller::get_job,
        crate::controllers::jobs_controller::list_dlq,
        crate::controllers::jobs_controller::retry_dlq_job,
        crate::controllers::jobs_controller::trigger_job,
        // Health endpoints
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            // Core types
            UserId,
            CategoryId,
            TransactionId,
            BudgetId,
            GoalId,
            RecurringTransactionId,
            UserRole,
            TransactionType,
            BudgetPeriod,
            GoalType,
            Frequency,
            ErrorResponse,
            FieldError,
            // Auth DTOs
            LoginRequest,
            RegisterRequest,
            RefreshTokenRequest,
            AuthResponse,
            AuthUserInfo,
            MessageResponse,
            // Category DTOs
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CategoryResponse,
            // Transaction DTOs
            CreateTransactionRequest,
            UpdateTransactionRequest,
            TransactionResponse,
            SummaryResponse,
            CategorySpendEntry,
            CategoryAnalysisEntry,
            BulkUploadResponse,
            // Budget DTOs
            CreateBudgetRequest,
            UpdateBudgetRequest,
            BudgetResponse,
            BudgetAlertsResponse,
            // Goal DTOs
            CreateGoalRequest,
            UpdateGoalRequest,
            GoalProgressRequest,
            GoalResponse,
            // Recurring transaction DTOs
            CreateRecurringRequest,
            UpdateRecurringRequest,
            RecurringResponse,
            // Profile DTOs
            UpdateProfileRequest,
            ProfileResponse,
            // Dashboard DTOs
            DashboardResponse,
            CurrentMonthStats,
            BudgetStats,
            GoalStats,
            // Advisor DTOs
            CategorizeRequest,
            CategorizeResponse,
            PlanRequest,
            SpendingPlan,
            EmergencyFundPlan,
            GoalSavingsPlan,
            InvestmentPlan,
            // Job types
            JobId,
            JobStatus,
            JobInfo,
            QueueStats,
            SchedulerStats,
            ScheduledJobInfo,
            JobsStatsResponse,
            TriggerJobRequest,
            TriggeredJobResponse,
            // Health
            HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "categories", description = "Transaction category endpoints"),
        (name = "transactions", description = "Transaction and analytics endpoints"),
        (name = "budgets", description = "Budget and alert endpoints"),
        (name = "goals", description = "Financial goal endpoints"),
        (name = "recurring", description = "Recurring transaction template endpoints"),
        (name = "profile", description = "User profile endpoints"),
        (name = "dashboard", description = "Dashboard aggregation endpoints"),
        (name = "advisor", description = "Categorization and planning endpoints"),
        (name = "jobs", description = "Background job administration endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Security addon for JWT Bearer authentication.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token authentication"))
                        .build(),
                ),
            );
        }
    }
}
