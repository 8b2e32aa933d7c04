//! Category controller.

use crate::{
    extractors::{AuthenticatedUser, ValidatedJson},
    responses::{created, no_content, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use fintrack_core::{CategoryId, FintrackError};
use fintrack_security::ClaimsExt;
use fintrack_service::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};
use tracing::debug;

/// Creates the category router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

/// List the user's categories.
#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The user's categories", body = Vec<CategoryResponse>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_categories(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Vec<CategoryResponse>> {
    let user_id = user.require_user_id()?;

    let response = state.category_service.list_categories(user_id).await?;
    ok(response)
}

/// Get a category by ID.
#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "The category", body = CategoryResponse),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<CategoryResponse> {
    let user_id = user.require_user_id()?;
    let id = parse_category_id(&id)?;

    let response = state.category_service.get_category(user_id, id).await?;
    ok(response)
}

/// Create a category.
#[utoipa::path(
    post,
    path = "/categories",
    tag = "categories",
    security(("bearer_auth" = [])),
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 409, description = "Duplicate category name"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponse>>), AppError> {
    debug!("Create category request: {}", request.name);

    let user_id = user.require_user_id()?;

    let response = state
        .category_service
        .create_category(user_id, request)
        .await?;
    Ok(created(response))
}

/// Update a category.
#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 404, description = "Category not found")
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateCategoryRequest>,
) -> ApiResult<CategoryResponse> {
    let user_id = user.require_user_id()?;
    let id = parse_category_id(&id)?;

    let response = state
        .category_service
        .update_category(user_id, id, request)
        .await?;
    ok(response)
}

/// Delete a category. Its transactions become uncategorized.
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let user_id = user.require_user_id()?;
    let id = parse_category_id(&id)?;

    state.category_service.delete_category(user_id, id).await?;
    Ok(no_content())
}

/// Helper to parse a category ID from a path parameter.
fn parse_category_id(id: &str) -> Result<CategoryId, AppError> {
    CategoryId::parse(id)
        .map_err(|_| AppError(FintrackError::Validation(format!("Invalid category ID: {}", id))))
}
