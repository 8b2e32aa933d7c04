//! Transaction controller: CRUD, summaries, analysis and CSV import.

use crate::{
    extractors::{AuthenticatedUser, PaginationQuery, ValidatedJson},
    responses::{created, no_content, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use fintrack_core::{FintrackError, Page, TransactionId};
use fintrack_security::ClaimsExt;
use fintrack_service::{
    BulkUploadResponse, CategoryAnalysisEntry, CreateTransactionRequest, SummaryPeriod,
    SummaryResponse, TransactionFilterQuery, TransactionResponse, UpdateTransactionRequest,
};
use serde::Deserialize;
use tracing::debug;

/// Creates the transaction router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transactions).post(create_transaction))
        .route("/summary", get(summary))
        .route("/category-analysis", get(category_analysis))
        .route("/bulk-upload", post(bulk_upload))
        .route(
            "/:id",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}

/// Query parameters for the summary endpoint.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// `daily`, `weekly`, `monthly` or `yearly`; defaults to monthly.
    pub period: Option<String>,
}

/// Query parameters for category analysis.
#[derive(Debug, Deserialize)]
pub struct AnalysisQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// List transactions with filters and pagination.
#[utoipa::path(
    get,
    path = "/transactions",
    tag = "transactions",
    security(("bearer_auth" = [])),
    params(TransactionFilterQuery),
    responses(
        (status = 200, description = "A page of transactions, date descending"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(filter): Query<TransactionFilterQuery>,
    Query(pagination): Query<PaginationQuery>,
) -> ApiResult<Page<TransactionResponse>> {
    let user_id = user.require_user_id()?;

    let response = state
        .transaction_service
        .list_transactions(user_id, filter.into_filter(), pagination.into())
        .await?;
    ok(response)
}

/// Get a transaction by ID.
#[utoipa::path(
    get,
    path = "/transactions/{id}",
    tag = "transactions",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Transaction ID")),
    responses(
        (status = 200, description = "The transaction", body = TransactionResponse),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn get_transaction(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<TransactionResponse> {
    let user_id = user.require_user_id()?;
    let id = parse_transaction_id(&id)?;

    let response = state.transaction_service.get_transaction(user_id, id).await?;
    ok(response)
}

/// Create a transaction.
#[utoipa::path(
    post,
    path = "/transactions",
    tag = "transactions",
    security(("bearer_auth" = [])),
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction created", body = TransactionResponse),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_transaction(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), AppError> {
    debug!("Create transaction request: {}", request.description);

    let user_id = user.require_user_id()?;

    let response = state
        .transaction_service
        .create_transaction(user_id, request)
        .await?;
    Ok(created(response))
}

/// Update a transaction.
#[utoipa::path(
    put,
    path = "/transactions/{id}",
    tag = "transactions",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Transaction ID")),
    request_body = UpdateTransactionRequest,
    responses(
        (status = 200, description = "Transaction updated", body = TransactionResponse),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn update_transaction(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateTransactionRequest>,
) -> ApiResult<TransactionResponse> {
    let user_id = user.require_user_id()?;
    let id = parse_transaction_id(&id)?;

    let response = state
        .transaction_service
        .update_transaction(user_id, id, request)
        .await?;
    ok(response)
}

/// Delete a transaction.
#[utoipa::path(
    delete,
    path = "/transactions/{id}",
    tag = "transactions",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Transaction ID")),
    responses(
        (status = 204, description = "Transaction deleted"),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn delete_transaction(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let user_id = user.require_user_id()?;
    let id = parse_transaction_id(&id)?;

    state
        .transaction_service
        .delete_transaction(user_id, id)
        .await?;
    Ok(no_content())
}

/// Income/expense summary over a trailing window.
#[utoipa::path(
    get,
    path = "/transactions/summary",
    tag = "transactions",
    security(("bearer_auth" = [])),
    params(("period" = Option<String>, Query, description = "daily, weekly, monthly or yearly")),
    responses(
        (status = 200, description = "Summary for the window", body = SummaryResponse)
    )
)]
pub async fn summary(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<SummaryResponse> {
    let user_id = user.require_user_id()?;
    let period = SummaryPeriod::parse(query.period.as_deref());

    let response = state.transaction_service.summary(user_id, period).await?;
    ok(response)
}

/// Per-category expense analysis.
#[utoipa::path(
    get,
    path = "/transactions/category-analysis",
    tag = "transactions",
    security(("bearer_auth" = [])),
    params(
        ("start_date" = Option<String>, Query, description = "Window start, YYYY-MM-DD"),
        ("end_date" = Option<String>, Query, description = "Window end, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Expense totals per category", body = Vec<CategoryAnalysisEntry>)
    )
)]
pub async fn category_analysis(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<AnalysisQuery>,
) -> ApiResult<Vec<CategoryAnalysisEntry>> {
    let user_id = user.require_user_id()?;

    let response = state
        .transaction_service
        .category_analysis(user_id, query.start_date, query.end_date)
        .await?;
    ok(response)
}

/// Import transactions from an uploaded CSV file.
///
/// Expects a multipart form with a `file` field whose name ends `.csv`.
/// Rows are imported independently; failures come back as
/// `"Row {n}: {error}"` strings.
#[utoipa::path(
    post,
    path = "/transactions/bulk-upload",
    tag = "transactions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Import result", body = BulkUploadResponse),
        (status = 400, description = "Missing file or not a CSV")
    )
)]
pub async fn bulk_upload(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    mut multipart: Multipart,
) -> ApiResult<BulkUploadResponse> {
    let user_id = user.require_user_id()?;

    let mut payload: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError(FintrackError::BadRequest(format!(
            "Invalid multipart body: {}",
            e
        )))
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if !file_name.to_lowercase().ends_with(".csv") {
            return Err(AppError(FintrackError::BadRequest(
                "File must be a CSV".to_string(),
            )));
        }

        let bytes = field.bytes().await.map_err(|e| {
            AppError(FintrackError::BadRequest(format!(
                "Failed to read file: {}",
                e
            )))
        })?;
        payload = Some(bytes.to_vec());
        break;
    }

    let data = payload.ok_or_else(|| {
        AppError(FintrackError::BadRequest("No file provided".to_string()))
    })?;

    debug!("Bulk upload of {} bytes for user {}", data.len(), user_id);

    let response = state.transaction_service.bulk_upload(user_id, &data).await?;
    ok(response)
}

/// Helper to parse a transaction ID from a path parameter.
fn parse_transaction_id(id: &str) -> Result<TransactionId, AppError> {
    TransactionId::parse(id).map_err(|_| {
        AppError(FintrackError::Validation(format!(
            "Invalid transaction ID: {}",
            id
        )))
    })
}
