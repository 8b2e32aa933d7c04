//! Advisor controller: category suggestions and generated plans.

use crate::{
    extractors::AuthenticatedUser,
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{extract::State, routing::post, Json, Router};
use fintrack_security::ClaimsExt;
use fintrack_service::{CategorizeRequest, CategorizeResponse, PlanRequest};
use fintrack_advisor::SpendingPlan;
use tracing::debug;

/// Creates the advisor router. Routes carry their full paths so this
/// merges directly into the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze/categorize", post(categorize))
        .route("/plan/generate", post(generate_plan))
}

/// Suggest a category for a transaction description.
#[utoipa::path(
    post,
    path = "/analyze/categorize",
    tag = "advisor",
    security(("bearer_auth" = [])),
    request_body = CategorizeRequest,
    responses(
        (status = 200, description = "Suggested category", body = CategorizeResponse),
        (status = 400, description = "Missing description")
    )
)]
pub async fn categorize(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CategorizeRequest>,
) -> ApiResult<CategorizeResponse> {
    let user_id = user.require_user_id()?;

    let response = state.advisor_service.categorize(user_id, request).await?;
    ok(response)
}

/// Generate a financial plan from the caller's figures and their
/// recent spending.
#[utoipa::path(
    post,
    path = "/plan/generate",
    tag = "advisor",
    security(("bearer_auth" = [])),
    request_body = PlanRequest,
    responses(
        (status = 200, description = "Generated plan", body = SpendingPlan),
        (status = 400, description = "Missing required figures"),
        (status = 502, description = "Plan generation failed upstream")
    )
)]
pub async fn generate_plan(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<PlanRequest>,
) -> ApiResult<SpendingPlan> {
    debug!("Plan generation request from: {}", user.username);

    let user_id = user.require_user_id()?;

    let response = state.advisor_service.generate_plan(user_id, request).await?;
    ok(response)
}
