//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, Sse},
    Json,
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;

use super::dto::{
    HealthResponse, JobStatusResponse, LoanListResponse, NextOpenQuery, NextOpenResponse,
    OpenQuery, OpenStatusResponse, RunJobResponse, SiteInfoDto, SiteListResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{Loan, LoanId, Site, SiteId};
use crate::db::services as db_services;
use crate::services::availability;
use crate::services::job_runner;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and storage is
/// accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Site CRUD
// =============================================================================

/// GET /v1/sites
///
/// List all sites.
pub async fn list_sites(State(state): State<AppState>) -> HandlerResult<SiteListResponse> {
    let sites = db_services::list_sites(state.repository.as_ref()).await?;

    let site_dtos: Vec<SiteInfoDto> = sites.into_iter().map(Into::into).collect();
    let total = site_dtos.len();

    Ok(Json(SiteListResponse {
        sites: site_dtos,
        total,
    }))
}

/// POST /v1/sites
///
/// Create a new site. The schedule is validated before anything is stored;
/// a validation failure returns 400 and stores nothing.
pub async fn create_site(
    State(state): State<AppState>,
    Json(site): Json<Site>,
) -> Result<(axum::http::StatusCode, Json<SiteInfoDto>), AppError> {
    let info = db_services::store_site(state.repository.as_ref(), &site).await?;
    Ok((axum::http::StatusCode::CREATED, Json(info.into())))
}

/// GET /v1/sites/{site_id}
///
/// Fetch a site record.
pub async fn get_site(
    State(state): State<AppState>,
    Path(site_id): Path<i64>,
) -> HandlerResult<Site> {
    let site = db_services::get_site(state.repository.as_ref(), SiteId::new(site_id)).await?;
    Ok(Json(site))
}

/// PUT /v1/sites/{site_id}
///
/// Replace a site record wholesale. The stored record is untouched when
/// validation fails.
pub async fn update_site(
    State(state): State<AppState>,
    Path(site_id): Path<i64>,
    Json(mut site): Json<Site>,
) -> HandlerResult<Site> {
    site.id = Some(SiteId::new(site_id));
    db_services::update_site(state.repository.as_ref(), &site).await?;
    let stored = db_services::get_site(state.repository.as_ref(), SiteId::new(site_id)).await?;
    Ok(Json(stored))
}

// =============================================================================
// Availability Queries
// =============================================================================

/// GET /v1/sites/{site_id}/open?date=YYYY-MM-DD
///
/// Whether the site is open on the given date.
pub async fn get_open_status(
    State(state): State<AppState>,
    Path(site_id): Path<i64>,
    Query(query): Query<OpenQuery>,
) -> HandlerResult<OpenStatusResponse> {
    let site = db_services::get_site(state.repository.as_ref(), SiteId::new(site_id)).await?;

    Ok(Json(OpenStatusResponse {
        site_id,
        date: query.date,
        is_open: availability::is_open_on(&site, query.date),
    }))
}

/// GET /v1/sites/{site_id}/next-open?from=YYYY-MM-DD
///
/// Earliest open date on/after `from`; `next_open` is `null` when the
/// schedule can never open again.
pub async fn get_next_open(
    State(state): State<AppState>,
    Path(site_id): Path<i64>,
    Query(query): Query<NextOpenQuery>,
) -> HandlerResult<NextOpenResponse> {
    let site = db_services::get_site(state.repository.as_ref(), SiteId::new(site_id)).await?;

    let next_open = availability::next_open_on_or_after(&site, query.from)?;

    Ok(Json(NextOpenResponse {
        site_id,
        from: query.from,
        next_open,
    }))
}

// =============================================================================
// Loans
// =============================================================================

/// GET /v1/loans
///
/// List all active loans.
pub async fn list_loans(State(state): State<AppState>) -> HandlerResult<LoanListResponse> {
    let loans = db_services::list_active_loans(state.repository.as_ref()).await?;
    let total = loans.len();
    Ok(Json(LoanListResponse { loans, total }))
}

/// POST /v1/loans
///
/// Create a new loan record.
pub async fn create_loan(
    State(state): State<AppState>,
    Json(loan): Json<Loan>,
) -> Result<(axum::http::StatusCode, Json<Loan>), AppError> {
    // The pickup site must exist before a loan can reference it.
    db_services::get_site(state.repository.as_ref(), loan.pickup_site_id).await?;
    let stored = db_services::store_loan(state.repository.as_ref(), &loan).await?;
    Ok((axum::http::StatusCode::CREATED, Json(stored)))
}

/// GET /v1/loans/{loan_id}
///
/// Fetch a loan record.
pub async fn get_loan(
    State(state): State<AppState>,
    Path(loan_id): Path<i64>,
) -> HandlerResult<Loan> {
    let loan = db_services::get_loan(state.repository.as_ref(), LoanId::new(loan_id)).await?;
    Ok(Json(loan))
}

// =============================================================================
// Batch Job Triggers
// =============================================================================

/// POST /v1/tasks/clean-exceptions
///
/// Start the stale-exception cleanup job. Returns a job ID for tracking.
pub async fn run_clean_exceptions(
    State(state): State<AppState>,
) -> Result<(axum::http::StatusCode, Json<RunJobResponse>), AppError> {
    let job_id = state
        .job_tracker
        .create_job(crate::services::job_tracker::JobKind::CleanExceptions);
    let response_job_id = job_id.clone();

    let tracker = state.job_tracker.clone();
    let repo = state.repository.clone();
    tokio::spawn(async move {
        let _ = job_runner::run_clean_exceptions_async(job_id, tracker, repo).await;
    });

    Ok((
        axum::http::StatusCode::ACCEPTED,
        Json(RunJobResponse {
            job_id: response_job_id.clone(),
            message: format!(
                "Exception cleanup started. Track progress at /v1/jobs/{}/logs",
                response_job_id
            ),
        }),
    ))
}

/// POST /v1/tasks/extend-loans
///
/// Start the loan-extension job. Returns a job ID for tracking.
pub async fn run_extend_loans(
    State(state): State<AppState>,
) -> Result<(axum::http::StatusCode, Json<RunJobResponse>), AppError> {
    let job_id = state
        .job_tracker
        .create_job(crate::services::job_tracker::JobKind::ExtendLoans);
    let response_job_id = job_id.clone();

    let tracker = state.job_tracker.clone();
    let repo = state.repository.clone();
    let notifier = state.notifier.clone();
    tokio::spawn(async move {
        let _ = job_runner::run_extend_loans_async(job_id, tracker, repo, notifier).await;
    });

    Ok((
        axum::http::StatusCode::ACCEPTED,
        Json(RunJobResponse {
            job_id: response_job_id.clone(),
            message: format!(
                "Loan extension started. Track progress at /v1/jobs/{}/logs",
                response_job_id
            ),
        }),
    ))
}

// =============================================================================
// Async Job Management
// =============================================================================

/// GET /v1/jobs/{job_id}
///
/// Get the current status and logs of a background job.
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> HandlerResult<JobStatusResponse> {
    let job = state
        .job_tracker
        .get_job(&job_id)
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))?;

    Ok(Json(JobStatusResponse {
        job_id: job.job_id,
        kind: job.kind,
        status: format!("{:?}", job.status).to_lowercase(),
        logs: job.logs,
        result: job.result,
    }))
}

/// GET /v1/jobs/{job_id}/logs
///
/// Stream job logs via Server-Sent Events (SSE).
pub async fn stream_job_logs(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    // Verify job exists
    if state.job_tracker.get_job(&job_id).is_none() {
        return Err(AppError::NotFound(format!("Job {} not found", job_id)));
    }

    let tracker = state.job_tracker.clone();
    let stream = async_stream::stream! {
        let mut last_log_count = 0;
        loop {
            // Get current logs
            let logs = tracker.get_logs(&job_id);

            // Send new logs since last check
            for log in logs.iter().skip(last_log_count) {
                let event_data = serde_json::to_string(log).unwrap_or_default();
                yield Ok(Event::default().data(event_data));
            }
            last_log_count = logs.len();

            // Check if job is complete
            if let Some(job) = tracker.get_job(&job_id) {
                if job.status != crate::services::job_tracker::JobStatus::Running {
                    let final_event = serde_json::json!({
                        "status": job.status,
                        "result": job.result,
                    });
                    yield Ok(Event::default()
                        .event("complete")
                        .data(serde_json::to_string(&final_event).unwrap_or_default()));
                    break;
                }
            } else {
                break;
            }

            // Wait before checking again
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    };

    Ok(Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(1))
            .text("keep-alive"),
    ))
}
