//! Eco points credited per contribution.

use crate::config::ServerConfig;

/// Points awarded by the backend. Fixed once a contribution is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardPolicy {
    /// Points for a submitted waste report.
    pub report_points: i64,
    /// Points for a verified cleanup.
    pub cleanup_points: i64,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for RewardPolicy {
    fn from(config: &ServerConfig) -> Self {
        Self {
            report_points: config.report_points,
            cleanup_points: config.cleanup_points,
        }
    }
}

impl RewardPolicy {
    /// Points for a cleanup; unverified cleanups earn nothing.
    #[must_use]
    pub const fn for_cleanup(&self, verified: bool) -> i64 {
        if verified { self.cleanup_points } else { 0 }
    }
}
