//! Cleanup activity handlers: feed pages, own activities, create, like.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::AuthUser;
use crate::api::dto::{
    ActivityListResponse, ActivityPageResponse, CreateActivityResponse, FeedQuery, LikeResponse,
};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, ServerError};
use crate::model::NewCleanupActivity;

/// `GET /cleanup-activities`: One page of the feed.
#[utoipa::path(
    get,
    path = "/api/cleanup-activities",
    tag = "Feed",
    summary = "List feed activities",
    description = "Newest first. `verified` keeps verified cleanups only, `recent` keeps cleanups from the last 7 days.",
    params(FeedQuery),
    responses(
        (status = 200, description = "Feed page", body = ActivityPageResponse),
    )
)]
pub async fn list_activities(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Json<ActivityPageResponse> {
    Json(state.activities.page(&query).await)
}

/// `GET /cleanup-activities/my`: The caller's activities.
///
/// # Errors
///
/// Returns [`ServerError::Unauthorized`] for a missing or expired token.
#[utoipa::path(
    get,
    path = "/api/cleanup-activities/my",
    tag = "Feed",
    summary = "List own activities",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Own activities", body = ActivityListResponse),
        (status = 401, description = "Missing or expired token", body = ErrorResponse),
    )
)]
pub async fn my_activities(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Json<ActivityListResponse> {
    Json(ActivityListResponse {
        activities: state.activities.list_for_user(&auth.user.id).await,
    })
}

/// `POST /cleanup-activities`: Submit a cleanup verification.
///
/// # Errors
///
/// Returns [`ServerError`] for a missing token or an invalid submission.
#[utoipa::path(
    post,
    path = "/api/cleanup-activities",
    tag = "Feed",
    summary = "Submit a cleanup",
    description = "Requires a verification photo and GPS coordinates. A linked waste report must exist. Credits the user's eco points.",
    security(("bearer" = [])),
    request_body = NewCleanupActivity,
    responses(
        (status = 201, description = "Cleanup stored", body = CreateActivityResponse),
        (status = 400, description = "Invalid submission", body = ErrorResponse),
        (status = 401, description = "Missing or expired token", body = ErrorResponse),
        (status = 404, description = "Linked waste report not found", body = ErrorResponse),
    )
)]
pub async fn create_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<NewCleanupActivity>,
) -> Result<impl IntoResponse, ServerError> {
    let (activity, points_earned) = state.activities.create(&auth.user, req).await?;
    let message = format!("Cleanup verified! You earned {points_earned} eco points.");
    Ok((
        StatusCode::CREATED,
        Json(CreateActivityResponse {
            activity,
            points_earned,
            message,
        }),
    ))
}

/// `POST /cleanup-activities/{id}/like`: Like an activity.
///
/// # Errors
///
/// Returns [`ServerError`] for a missing token or an unknown activity.
#[utoipa::path(
    post,
    path = "/api/cleanup-activities/{id}/like",
    tag = "Feed",
    summary = "Like an activity",
    description = "Each user counts once per activity; the response carries the authoritative count.",
    security(("bearer" = [])),
    params(
        ("id" = String, Path, description = "Activity ID"),
    ),
    responses(
        (status = 200, description = "Like count", body = LikeResponse),
        (status = 404, description = "Activity not found", body = ErrorResponse),
    )
)]
pub async fn like_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(activity_id): Path<String>,
) -> Result<Json<LikeResponse>, ServerError> {
    let (likes, fresh) = state.activities.like(&activity_id, &auth.user.id).await?;
    let message = if fresh {
        "Activity liked"
    } else {
        "Activity already liked"
    };
    Ok(Json(LikeResponse {
        likes,
        message: message.to_string(),
    }))
}

/// Activity routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/cleanup-activities",
            get(list_activities).post(create_activity),
        )
        .route("/cleanup-activities/my", get(my_activities))
        .route("/cleanup-activities/{id}/like", post(like_activity))
}
