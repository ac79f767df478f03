//! Waste report handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};

use crate::api::AuthUser;
use crate::api::dto::{CreateReportResponse, ReportListResponse, ReportResponse, UpdateStatusRequest};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, ServerError};
use crate::model::NewReport;

/// `GET /reports`: Every report, newest first.
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "Reports",
    summary = "List reports",
    responses(
        (status = 200, description = "All reports", body = ReportListResponse),
    )
)]
pub async fn list_reports(State(state): State<AppState>) -> Json<ReportListResponse> {
    Json(ReportListResponse {
        reports: state.reports.list().await,
    })
}

/// `GET /reports/my`: The caller's reports.
///
/// # Errors
///
/// Returns [`ServerError::Unauthorized`] for a missing or expired token.
#[utoipa::path(
    get,
    path = "/api/reports/my",
    tag = "Reports",
    summary = "List own reports",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Own reports", body = ReportListResponse),
        (status = 401, description = "Missing or expired token", body = ErrorResponse),
    )
)]
pub async fn my_reports(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Json<ReportListResponse> {
    Json(ReportListResponse {
        reports: state.reports.list_for_user(&auth.user.id).await,
    })
}

/// `POST /reports`: Submit a waste report.
///
/// # Errors
///
/// Returns [`ServerError`] for a missing token or an invalid report.
#[utoipa::path(
    post,
    path = "/api/reports",
    tag = "Reports",
    summary = "Submit a report",
    description = "Stores the report as `pending` and credits the reporter's eco points.",
    security(("bearer" = [])),
    request_body = NewReport,
    responses(
        (status = 201, description = "Report stored", body = CreateReportResponse),
        (status = 400, description = "Invalid report", body = ErrorResponse),
        (status = 401, description = "Missing or expired token", body = ErrorResponse),
    )
)]
pub async fn create_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<NewReport>,
) -> Result<impl IntoResponse, ServerError> {
    let (report, points_earned) = state.reports.create(&auth.user, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateReportResponse {
            report,
            points_earned,
        }),
    ))
}

/// `PUT /reports/{id}/status`: Advance a report's status.
///
/// # Errors
///
/// Returns [`ServerError`] for a missing token, an unknown report or a
/// regressing status.
#[utoipa::path(
    put,
    path = "/api/reports/{id}/status",
    tag = "Reports",
    summary = "Update report status",
    description = "Statuses only move forward: pending, in_progress, completed. Re-sending the current status is a no-op.",
    security(("bearer" = [])),
    params(
        ("id" = String, Path, description = "Report ID"),
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated report", body = ReportResponse),
        (status = 404, description = "Report not found", body = ErrorResponse),
        (status = 409, description = "Status would regress", body = ErrorResponse),
    )
)]
pub async fn update_report_status(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(report_id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<ReportResponse>, ServerError> {
    let report = state.reports.update_status(&report_id, req.status).await?;
    Ok(Json(ReportResponse { report }))
}

/// Report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports", get(list_reports).post(create_report))
        .route("/reports/my", get(my_reports))
        .route("/reports/{id}/status", put(update_report_status))
}
