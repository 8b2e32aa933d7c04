//! Background job administration controller.
//!
//! Every endpoint requires the admin role. When Redis or background
//! jobs are disabled the endpoints answer 503.

use crate::{
    responses::{ApiResponse, AppError},
    extractors::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use fintrack_core::{ErrorResponse, FintrackError, UserId, UserRole};
use fintrack_jobs::{
    Job, JobError, JobId, JobInfo, JobQueue, JobQueueExt, QueueStats, Scheduler, SchedulerStats,
};
use fintrack_security::ClaimsExt;
use fintrack_service::{BackupUserDataJob, CalculateInsightsJob, MessageResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

/// Queue reported by the stats endpoint.
const DEFAULT_QUEUE: &str = "default";

/// Creates the jobs router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(jobs_stats))
        .route("/dlq", get(list_dlq))
        .route("/dlq/:id/retry", post(retry_dlq_job))
        .route("/scheduled/:name/trigger", post(trigger_job))
        .route("/:id", get(get_job))
}

/// Error type for the jobs endpoints.
///
/// Wraps the usual application error and adds the 503 answered when the
/// job infrastructure is not running.
pub enum JobsApiError {
    /// Redis or background jobs are disabled.
    Unavailable,
    /// Any other failure, mapped through the standard envelope.
    Core(FintrackError),
}

impl From<FintrackError> for JobsApiError {
    fn from(err: FintrackError) -> Self {
        Self::Core(err)
    }
}

impl IntoResponse for JobsApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Unavailable => {
                let error = ErrorResponse {
                    code: "JOB_QUEUE_UNAVAILABLE".to_string(),
                    message: "Job queue is not configured; Redis may be disabled".to_string(),
                    details: None,
                    trace_id: None,
                };
                let body = Json(ApiResponse::<()>::error(error));
                (StatusCode::SERVICE_UNAVAILABLE, body).into_response()
            }
            Self::Core(err) => AppError(err).into_response(),
        }
    }
}

/// Result type for the jobs endpoints.
type JobsResult<T> = Result<Json<ApiResponse<T>>, JobsApiError>;

/// Combined queue and scheduler statistics.
#[derive(Debug, Serialize, ToSchema)]
pub struct JobsStatsResponse {
    pub queue: QueueStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduler: Option<SchedulerStats>,
}

/// Optional body for job triggers; per-user jobs need a target.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TriggerJobRequest {
    pub user_id: Option<UserId>,
}

/// A job accepted for execution.
#[derive(Debug, Serialize, ToSchema)]
pub struct TriggeredJobResponse {
    pub job_id: String,
    pub name: String,
}

/// Query parameters for DLQ listing.
#[derive(Debug, Deserialize)]
pub struct DlqQuery {
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

fn require_queue(state: &AppState) -> Result<Arc<dyn JobQueue>, JobsApiError> {
    state.job_queue.clone().ok_or(JobsApiError::Unavailable)
}

fn require_scheduler(state: &AppState) -> Result<Arc<Scheduler>, JobsApiError> {
    state.scheduler.clone().ok_or(JobsApiError::Unavailable)
}

/// Maps queue errors onto the standard envelope.
fn job_error(err: JobError) -> JobsApiError {
    JobsApiError::Core(match err {
        JobError::Duplicate(_) => {
            FintrackError::Conflict("A job with the same unique key is already queued".to_string())
        }
        other => FintrackError::Redis(other.to_string()),
    })
}

/// Queue and scheduler statistics.
#[utoipa::path(
    get,
    path = "/jobs/stats",
    tag = "jobs",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Queue and scheduler statistics", body = JobsStatsResponse),
        (status = 403, description = "Admin role required"),
        (status = 503, description = "Job queue unavailable")
    )
)]
pub async fn jobs_stats(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> JobsResult<JobsStatsResponse> {
    user.require_role(UserRole::Admin)?;
    let queue = require_queue(&state)?;

    let stats = queue.stats(DEFAULT_QUEUE).await.map_err(job_error)?;
    let scheduler = state.scheduler.as_ref().map(|s| s.stats());

    Ok(Json(ApiResponse::success(JobsStatsResponse {
        queue: stats,
        scheduler,
    })))
}

/// Look up a job by ID.
#[utoipa::path(
    get,
    path = "/jobs/{id}",
    tag = "jobs",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job details", body = JobInfo),
        (status = 404, description = "Job not found"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn get_job(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> JobsResult<JobInfo> {
    user.require_role(UserRole::Admin)?;
    let queue = require_queue(&state)?;

    let job_id = JobId::from(id.as_str());
    let info = queue
        .get_job(&job_id)
        .await
        .map_err(job_error)?
        .ok_or_else(|| JobsApiError::Core(FintrackError::not_found("Job", &id)))?;

    Ok(Json(ApiResponse::success(info)))
}

/// List dead-lettered jobs, most recent first.
#[utoipa::path(
    get,
    path = "/jobs/dlq",
    tag = "jobs",
    security(("bearer_auth" = [])),
    params(
        ("limit" = Option<usize>, Query, description = "Page size, default 50"),
        ("offset" = Option<usize>, Query, description = "Offset into the DLQ")
    ),
    responses(
        (status = 200, description = "Dead-lettered jobs", body = Vec<JobInfo>),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_dlq(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<DlqQuery>,
) -> JobsResult<Vec<JobInfo>> {
    user.require_role(UserRole::Admin)?;
    let queue = require_queue(&state)?;

    let jobs = queue
        .list_dlq(query.limit, query.offset)
        .await
        .map_err(job_error)?;

    Ok(Json(ApiResponse::success(jobs)))
}

/// Requeue a dead-lettered job with a fresh retry budget.
#[utoipa::path(
    post,
    path = "/jobs/dlq/{id}/retry",
    tag = "jobs",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job requeued", body = MessageResponse),
        (status = 404, description = "Job not in the DLQ"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn retry_dlq_job(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> JobsResult<MessageResponse> {
    user.require_role(UserRole::Admin)?;
    let queue = require_queue(&state)?;

    let job_id = JobId::from(id.as_str());
    queue.retry_dlq(&job_id).await.map_err(|err| match err {
        JobError::NotFound(_) => JobsApiError::Core(FintrackError::not_found("Job", &id)),
        other => job_error(other),
    })?;

    info!("DLQ job {} requeued by {}", id, user.username);
    Ok(Json(ApiResponse::success(MessageResponse::new(format!(
        "Job {} queued for retry",
        id
    )))))
}

/// Run a named job now.
///
/// Scheduled job names go through the scheduler; the per-user jobs
/// `backup-user-data` and `calculate-spending-insights` take a
/// `user_id` in the body and are enqueued directly.
#[utoipa::path(
    post,
    path = "/jobs/scheduled/{name}/trigger",
    tag = "jobs",
    security(("bearer_auth" = [])),
    params(("name" = String, Path, description = "Job name")),
    request_body(content = TriggerJobRequest, description = "Target user for per-user jobs"),
    responses(
        (status = 200, description = "Job enqueued", body = TriggeredJobResponse),
        (status = 400, description = "Missing user_id for a per-user job"),
        (status = 404, description = "Unknown job name"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn trigger_job(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(name): Path<String>,
    body: Option<Json<TriggerJobRequest>>,
) -> JobsResult<TriggeredJobResponse> {
    user.require_role(UserRole::Admin)?;

    let job_id = match name.as_str() {
        BackupUserDataJob::NAME => {
            let queue = require_queue(&state)?;
            let user_id = required_user_id(&body)?;
            queue
                .enqueue(BackupUserDataJob { user_id })
                .await
                .map_err(job_error)?
        }
        CalculateInsightsJob::NAME => {
            let queue = require_queue(&state)?;
            let user_id = required_user_id(&body)?;
            queue
                .enqueue(CalculateInsightsJob { user_id })
                .await
                .map_err(job_error)?
        }
        _ => {
            let scheduler = require_scheduler(&state)?;
            scheduler.trigger_job(&name).await.map_err(|err| match err {
                JobError::NotFound(_) => {
                    JobsApiError::Core(FintrackError::not_found("ScheduledJob", &name))
                }
                other => job_error(other),
            })?
        }
    };

    info!("Job '{}' triggered by {} as {}", name, user.username, job_id);
    Ok(Json(ApiResponse::success(TriggeredJobResponse {
        job_id: job_id.to_string(),
        name,
    })))
}

fn required_user_id(body: &Option<Json<TriggerJobRequest>>) -> Result<UserId, JobsApiError> {
    body.as_ref().and_then(|request| request.0.user_id).ok_or_else(|| {
        JobsApiError::Core(FintrackError::BadRequest(
            "user_id is required for this job".to_string(),
        ))
    })
}
