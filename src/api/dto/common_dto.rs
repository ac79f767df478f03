//! Shared envelopes: ping, plain messages, leaderboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Response of `GET /api/ping`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PingResponse {
    /// Always `"pong"`.
    pub message: String,
    /// Server time.
    pub timestamp: DateTime<Utc>,
}

/// A bare confirmation message.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

/// Query parameters of `GET /api/leaderboard`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaderboardQuery {
    /// Number of entries (1..=100). Defaults to 10.
    #[serde(default = "default_leaderboard_limit")]
    pub limit: u32,
}

fn default_leaderboard_limit() -> u32 {
    10
}

/// One ranked user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based rank.
    pub rank: u32,
    /// Ranked user.
    pub user_id: String,
    /// Display name.
    pub name: String,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Eco-points balance.
    pub points: i64,
}

/// Response of `GET /api/leaderboard`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardResponse {
    /// Entries by descending points.
    pub leaders: Vec<LeaderboardEntry>,
}
