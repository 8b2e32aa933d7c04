//! Dashboard controller.

use crate::{
    extractors::AuthenticatedUser,
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{extract::State, routing::get, Router};
use fintrack_security::ClaimsExt;
use fintrack_service::DashboardResponse;

/// Creates the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}

/// The dashboard payload: current-month figures, budget and goal
/// counters, recent transactions and top categories.
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard data", body = DashboardResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<DashboardResponse> {
    let user_id = user.require_user_id()?;

    let response = state.dashboard_service.dashboard(user_id).await?;
    ok(response)
}
