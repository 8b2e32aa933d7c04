//! Recurring transaction template controller.
//!
//! Templates are materialized into transactions by the background jobs,
//! not through this API.

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
use fintrack_core::{FintrackError, Page, RecurringTransactionId};
use fintrack_security::ClaimsExt;
use fintrack_service::{CreateRecurringRequest, RecurringResponse, UpdateRecurringRequest};
use tracing::debug;

/// Creates the recurring transaction router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_recurring).post(create_recurring))
        .route(
            "/:id",
            get(get_recurring)
                .put(update_recurring)
                .delete(delete_recurring),
        )
}

/// List the user's recurring templates, newest first.
#[utoipa::path(
    get,
    path = "/recurring",
    tag = "recurring",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "A page of recurring templates"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_recurring(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(pagination): Query<PaginationQuery>,
) -> ApiResult<Page<RecurringResponse>> {
    let user_id = user.require_user_id()?;

    let response = state
        .recurring_service
        .list_recurring(user_id, pagination.into())
        .await?;
    ok(response)
}

/// Get a recurring template by ID.
#[utoipa::path(
    get,
    path = "/recurring/{id}",
    tag = "recurring",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Template ID")),
    responses(
        (status = 200, description = "The template", body = RecurringResponse),
        (status = 404, description = "Template not found")
    )
)]
pub async fn get_recurring(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<RecurringResponse> {
    let user_id = user.require_user_id()?;
    let id = parse_recurring_id(&id)?;

    let response = state.recurring_service.get_recurring(user_id, id).await?;
    ok(response)
}

/// Create a recurring template.
#[utoipa::path(
    post,
    path = "/recurring",
    tag = "recurring",
    security(("bearer_auth" = [])),
    request_body = CreateRecurringRequest,
    responses(
        (status = 201, description = "Template created", body = RecurringResponse),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_recurring(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateRecurringRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RecurringResponse>>), AppError> {
    debug!("Create recurring template: {}", request.description);

    let user_id = user.require_user_id()?;

    let response = state
        .recurring_service
        .create_recurring(user_id, request)
        .await?;
    Ok(created(response))
}

/// Update a recurring template.
#[utoipa::path(
    put,
    path = "/recurring/{id}",
    tag = "recurring",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Template ID")),
    request_body = UpdateRecurringRequest,
    responses(
        (status = 200, description = "Template updated", body = RecurringResponse),
        (status = 404, description = "Template not found")
    )
)]
pub async fn update_recurring(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateRecurringRequest>,
) -> ApiResult<RecurringResponse> {
    let user_id = user.require_user_id()?;
    let id = parse_recurring_id(&id)?;

    let response = state
        .recurring_service
        .update_recurring(user_id, id, request)
        .await?;
    ok(response)
}

/// Delete a recurring template.
#[utoipa::path(
    delete,
    path = "/recurring/{id}",
    tag = "recurring",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Template ID")),
    responses(
        (status = 204, description = "Template deleted"),
        (status = 404, description = "Template not found")
    )
)]
pub async fn delete_recurring(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let user_id = user.require_user_id()?;
    let id = parse_recurring_id(&id)?;

    state.recurring_service.delete_recurring(user_id, id).await?;
    Ok(no_content())
}

/// Helper to parse a template ID from a path parameter.
fn parse_recurring_id(id: &str) -> Result<RecurringTransactionId, AppError> {
    RecurringTransactionId::parse(id).map_err(|_| {
        AppError(FintrackError::Validation(format!(
            "Invalid recurring transaction ID: {}",
            id
        )))
    })
}
