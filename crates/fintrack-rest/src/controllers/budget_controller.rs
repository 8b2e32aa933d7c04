//! Budget controller.

use crate::{
    extractors::{AuthenticatedUser, PaginationQuery, ValidatedJson},
    responses::{created, no_content, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use fintrack_core::{BudgetId, FintrackError, Page};
use fintrack_security::ClaimsExt;
use fintrack_service::{
    BudgetAlertsResponse, BudgetResponse, CreateBudgetRequest, UpdateBudgetRequest,
};
use tracing::debug;

/// Creates the budget router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_budgets).post(create_budget))
        .route("/alerts", get(budget_alerts))
        .route(
            "/:id",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
}

/// List the user's budgets with their spending state.
#[utoipa::path(
    get,
    path = "/budgets",
    tag = "budgets",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "A page of budgets with spending state"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_budgets(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(pagination): Query<PaginationQuery>,
) -> ApiResult<Page<BudgetResponse>> {
    let user_id = user.require_user_id()?;

    let response = state
        .budget_service
        .list_budgets(user_id, pagination.into())
        .await?;
    ok(response)
}

/// Get a budget by ID.
#[utoipa::path(
    get,
    path = "/budgets/{id}",
    tag = "budgets",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Budget ID")),
    responses(
        (status = 200, description = "The budget", body = BudgetResponse),
        (status = 404, description = "Budget not found")
    )
)]
pub async fn get_budget(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<BudgetResponse> {
    let user_id = user.require_user_id()?;
    let id = parse_budget_id(&id)?;

    let response = state.budget_service.get_budget(user_id, id).await?;
    ok(response)
}

/// Create a budget.
#[utoipa::path(
    post,
    path = "/budgets",
    tag = "budgets",
    security(("bearer_auth" = [])),
    request_body = CreateBudgetRequest,
    responses(
        (status = 201, description = "Budget created", body = BudgetResponse),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_budget(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateBudgetRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BudgetResponse>>), AppError> {
    debug!("Create budget request for category {}", request.category_id);

    let user_id = user.require_user_id()?;

    let response = state.budget_service.create_budget(user_id, request).await?;
    Ok(created(response))
}

/// Update a budget.
#[utoipa::path(
    put,
    path = "/budgets/{id}",
    tag = "budgets",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Budget ID")),
    request_body = UpdateBudgetRequest,
    responses(
        (status = 200, description = "Budget updated", body = BudgetResponse),
        (status = 404, description = "Budget not found")
    )
)]
pub async fn update_budget(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateBudgetRequest>,
) -> ApiResult<BudgetResponse> {
    let user_id = user.require_user_id()?;
    let id = parse_budget_id(&id)?;

    let response = state
        .budget_service
        .update_budget(user_id, id, request)
        .await?;
    ok(response)
}

/// Delete a budget.
#[utoipa::path(
    delete,
    path = "/budgets/{id}",
    tag = "budgets",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Budget ID")),
    responses(
        (status = 204, description = "Budget deleted"),
        (status = 404, description = "Budget not found")
    )
)]
pub async fn delete_budget(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let user_id = user.require_user_id()?;
    let id = parse_budget_id(&id)?;

    state.budget_service.delete_budget(user_id, id).await?;
    Ok(no_content())
}

/// Active budgets split into over-budget and near-limit lists.
#[utoipa::path(
    get,
    path = "/budgets/alerts",
    tag = "budgets",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Budgets needing attention", body = BudgetAlertsResponse)
    )
)]
pub async fn budget_alerts(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<BudgetAlertsResponse> {
    let user_id = user.require_user_id()?;

    let response = state.budget_service.alerts(user_id).await?;
    ok(response)
}

/// Helper to parse a budget ID from a path parameter.
fn parse_budget_id(id: &str) -> Result<BudgetId, AppError> {
    BudgetId::parse(id)
        .map_err(|_| AppError(FintrackError::Validation(format!("Invalid budget ID: {}", id))))
}
