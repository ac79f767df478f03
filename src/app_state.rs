//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use chrono::Duration;

use crate::config::ServerConfig;
use crate::domain::{Database, RewardPolicy};
use crate::service::{ActivityService, NoteService, ReportService, UserService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Accounts, sessions and the leaderboard.
    pub users: Arc<UserService>,
    /// Waste reports.
    pub reports: Arc<ReportService>,
    /// Cleanup activities and feed statistics.
    pub activities: Arc<ActivityService>,
    /// Notes.
    pub notes: Arc<NoteService>,
}

impl AppState {
    /// Builds every service over one fresh in-memory database.
    #[must_use]
    pub fn new(config: &ServerConfig) -> Self {
        let db = Arc::new(Database::new());
        let rewards = RewardPolicy::from(config);
        let ttl = Duration::hours(config.session_ttl_hours);

        Self {
            users: Arc::new(UserService::new(Arc::clone(&db), ttl)),
            reports: Arc::new(ReportService::new(Arc::clone(&db), rewards)),
            activities: Arc::new(ActivityService::new(Arc::clone(&db), rewards)),
            notes: Arc::new(NoteService::new(db)),
        }
    }
}
