//! Feed statistics and the leaderboard.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{LeaderboardQuery, LeaderboardResponse, StatsResponse};
use crate::app_state::AppState;

/// `GET /feed/stats`: Aggregate feed statistics.
#[utoipa::path(
    get,
    path = "/api/feed/stats",
    tag = "Feed",
    summary = "Feed statistics",
    responses(
        (status = 200, description = "Statistics", body = StatsResponse),
    )
)]
pub async fn feed_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        stats: state.activities.stats().await,
    })
}

/// `GET /leaderboard`: Users ranked by eco points.
#[utoipa::path(
    get,
    path = "/api/leaderboard",
    tag = "Feed",
    summary = "Leaderboard",
    description = "Ties are broken by earlier registration.",
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Ranked users", body = LeaderboardResponse),
    )
)]
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Json<LeaderboardResponse> {
    Json(LeaderboardResponse {
        leaders: state.users.leaderboard(query.limit).await,
    })
}

/// Stats and leaderboard routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/feed/stats", get(feed_stats))
        .route("/leaderboard", get(leaderboard))
}
