//! Notifications emitted by the stores after they reconcile state.
//!
//! A UI subscribes through [`super::EventBus`] and re-renders on each
//! [`StoreEvent`].

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{FeedFilter, ReportStatus};

/// Event emitted after every store mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum StoreEvent {
    /// The signed-in user changed (login, signup, logout, profile update,
    /// session restore or expiry).
    SessionChanged {
        /// New user, `None` when signed out.
        user_id: Option<String>,
        /// When the change was applied.
        timestamp: DateTime<Utc>,
    },

    /// The report cache was replaced by a full fetch.
    ReportsLoaded {
        /// Reports now cached.
        count: usize,
        /// When the cache was replaced.
        timestamp: DateTime<Utc>,
    },

    /// A newly created report was appended.
    ReportAdded {
        /// Server-assigned report ID.
        report_id: String,
        /// Eco points the server credited.
        points_earned: i64,
        /// When the report was appended.
        timestamp: DateTime<Utc>,
    },

    /// A cached report was replaced after a status update.
    ReportUpdated {
        /// Report ID.
        report_id: String,
        /// Status returned by the server.
        status: ReportStatus,
        /// When the report was replaced.
        timestamp: DateTime<Utc>,
    },

    /// The feed list was replaced by page 1 of `filter`.
    FeedReset {
        /// Active filter.
        filter: FeedFilter,
        /// Activities now listed.
        count: usize,
        /// When the list was replaced.
        timestamp: DateTime<Utc>,
    },

    /// A further feed page was appended.
    FeedPageAppended {
        /// Active filter.
        filter: FeedFilter,
        /// Page number appended.
        page: u32,
        /// Activities on that page.
        count: usize,
        /// When the page was appended.
        timestamp: DateTime<Utc>,
    },

    /// A new cleanup activity was prepended.
    ActivityCreated {
        /// Server-assigned activity ID.
        activity_id: String,
        /// Eco points the server credited.
        points_earned: i64,
        /// When the activity was prepended.
        timestamp: DateTime<Utc>,
    },

    /// An activity's like counter was patched.
    ActivityLiked {
        /// Activity ID.
        activity_id: String,
        /// Authoritative like count.
        likes: u32,
        /// When the counter was patched.
        timestamp: DateTime<Utc>,
    },

    /// Feed statistics were replaced.
    StatsUpdated {
        /// `true` when zeroed fallback stats were installed after a failed
        /// fetch.
        fallback: bool,
        /// When the stats were replaced.
        timestamp: DateTime<Utc>,
    },
}

impl StoreEvent {
    /// Returns the event type as a snake_case string.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::SessionChanged { .. } => "session_changed",
            Self::ReportsLoaded { .. } => "reports_loaded",
            Self::ReportAdded { .. } => "report_added",
            Self::ReportUpdated { .. } => "report_updated",
            Self::FeedReset { .. } => "feed_reset",
            Self::FeedPageAppended { .. } => "feed_page_appended",
            Self::ActivityCreated { .. } => "activity_created",
            Self::ActivityLiked { .. } => "activity_liked",
            Self::StatsUpdated { .. } => "stats_updated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn liked_event_type() {
        let event = StoreEvent::ActivityLiked {
            activity_id: "a1".to_string(),
            likes: 7,
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_type_str(), "activity_liked");
    }

    #[test]
    fn feed_reset_serializes_with_tag() {
        let event = StoreEvent::FeedReset {
            filter: FeedFilter::Verified,
            count: 3,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains("\"event_type\":\"feed_reset\""));
        assert!(json.contains("\"filter\":\"verified\""));
    }
}
