//! Cleanup activity and feed envelopes.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::{CleanupActivity, FeedFilter, FeedStats};

/// Largest page the feed endpoint serves.
pub const MAX_FEED_LIMIT: u32 = 50;

/// Query parameters of `GET /api/cleanup-activities`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeedQuery {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 50). Defaults to 10.
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Feed filter. Defaults to `all`.
    #[serde(default)]
    pub filter: FeedFilter,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

impl FeedQuery {
    /// Clamps `page` to at least 1 and `limit` to `1..=50`.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, MAX_FEED_LIMIT),
            filter: self.filter,
        }
    }
}

/// Pagination metadata of a feed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedPagination {
    /// Page served.
    pub page: u32,
    /// Page size used.
    pub limit: u32,
    /// Matching activities across all pages.
    pub total: u32,
    /// Whether a further page exists.
    pub has_more: bool,
}

/// Response of `GET /api/cleanup-activities`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivityPageResponse {
    /// Activities on this page.
    pub activities: Vec<CleanupActivity>,
    /// Pagination metadata.
    pub pagination: FeedPagination,
}

/// Response of `GET /api/cleanup-activities/my`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivityListResponse {
    /// The caller's activities, newest first.
    pub activities: Vec<CleanupActivity>,
}

/// Response of `POST /api/cleanup-activities` (201 Created).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityResponse {
    /// The stored activity.
    pub activity: CleanupActivity,
    /// Eco points credited.
    pub points_earned: i64,
    /// Human-readable confirmation.
    pub message: String,
}

/// Response of `POST /api/cleanup-activities/{id}/like`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LikeResponse {
    /// Authoritative like count after the call.
    pub likes: u32,
    /// Human-readable confirmation.
    pub message: String,
}

/// Response of `GET /api/feed/stats`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    /// Aggregate feed statistics.
    pub stats: FeedStats,
}
