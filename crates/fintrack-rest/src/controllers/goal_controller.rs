//! Goal controller.

use crate::{
    extractors::{AuthenticatedUser, PaginationQuery, ValidatedJson},
    responses::{created, no_content, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use fintrack_core::{FintrackError, GoalId, Page};
use fintrack_security::ClaimsExt;
use fintrack_service::{CreateGoalRequest, GoalProgressRequest, GoalResponse, UpdateGoalRequest};
use tracing::debug;

/// Creates the goal router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_goals).post(create_goal))
        .route("/:id", get(get_goal).put(update_goal).delete(delete_goal))
        .route("/:id/progress", post(record_progress))
}

/// List the user's goals, newest first.
#[utoipa::path(
    get,
    path = "/goals",
    tag = "goals",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "A page of goals"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_goals(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(pagination): Query<PaginationQuery>,
) -> ApiResult<Page<GoalResponse>> {
    let user_id = user.require_user_id()?;

    let response = state
        .goal_service
        .list_goals(user_id, pagination.into())
        .await?;
    ok(response)
}

/// Get a goal by ID.
#[utoipa::path(
    get,
    path = "/goals/{id}",
    tag = "goals",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Goal ID")),
    responses(
        (status = 200, description = "The goal", body = GoalResponse),
        (status = 404, description = "Goal not found")
    )
)]
pub async fn get_goal(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<GoalResponse> {
    let user_id = user.require_user_id()?;
    let id = parse_goal_id(&id)?;

    let response = state.goal_service.get_goal(user_id, id).await?;
    ok(response)
}

/// Create a goal.
#[utoipa::path(
    post,
    path = "/goals",
    tag = "goals",
    security(("bearer_auth" = [])),
    request_body = CreateGoalRequest,
    responses(
        (status = 201, description = "Goal created", body = GoalResponse),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_goal(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateGoalRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GoalResponse>>), AppError> {
    debug!("Create goal request: {}", request.name);

    let user_id = user.require_user_id()?;

    let response = state.goal_service.create_goal(user_id, request).await?;
    Ok(created(response))
}

/// Update a goal.
#[utoipa::path(
    put,
    path = "/goals/{id}",
    tag = "goals",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Goal ID")),
    request_body = UpdateGoalRequest,
    responses(
        (status = 200, description = "Goal updated", body = GoalResponse),
        (status = 404, description = "Goal not found")
    )
)]
pub async fn update_goal(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateGoalRequest>,
) -> ApiResult<GoalResponse> {
    let user_id = user.require_user_id()?;
    let id = parse_goal_id(&id)?;

    let response = state.goal_service.update_goal(user_id, id, request).await?;
    ok(response)
}

/// Delete a goal.
#[utoipa::path(
    delete,
    path = "/goals/{id}",
    tag = "goals",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Goal ID")),
    responses(
        (status = 204, description = "Goal deleted"),
        (status = 404, description = "Goal not found")
    )
)]
pub async fn delete_goal(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let user_id = user.require_user_id()?;
    let id = parse_goal_id(&id)?;

    state.goal_service.delete_goal(user_id, id).await?;
    Ok(no_content())
}

/// Add an amount to a goal's saved progress.
///
/// Progress clamps at the target amount and marks the goal achieved
/// when it gets there.
#[utoipa::path(
    post,
    path = "/goals/{id}/progress",
    tag = "goals",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Goal ID")),
    request_body = GoalProgressRequest,
    responses(
        (status = 200, description = "Updated goal", body = GoalResponse),
        (status = 400, description = "Missing or invalid amount"),
        (status = 404, description = "Goal not found")
    )
)]
pub async fn record_progress(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<GoalProgressRequest>,
) -> ApiResult<GoalResponse> {
    let user_id = user.require_user_id()?;
    let id = parse_goal_id(&id)?;

    let response = state
        .goal_service
        .record_progress(user_id, id, request)
        .await?;
    ok(response)
}

/// Helper to parse a goal ID from a path parameter.
fn parse_goal_id(id: &str) -> Result<GoalId, AppError> {
    GoalId::parse(id)
        .map_err(|_| AppError(FintrackError::Validation(format!("Invalid goal ID: {}", id))))
}
