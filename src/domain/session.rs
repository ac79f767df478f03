//! Opaque bearer sessions.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// A bearer token issued at login or registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Account the token belongs to.
    pub user_id: String,
    /// When the token was issued.
    pub issued_at: DateTime<Utc>,
}

impl Session {
    /// Starts a session for `user_id` now.
    #[must_use]
    pub fn start(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            issued_at: Utc::now(),
        }
    }

    /// Whether the session is older than `ttl` at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.issued_at >= ttl
    }
}

/// Generates a fresh opaque token.
#[must_use]
pub fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_inclusive() {
        let session = Session::start("u1");
        let ttl = Duration::hours(1);
        assert!(!session.is_expired(session.issued_at, ttl));
        assert!(session.is_expired(session.issued_at + ttl, ttl));
    }

    #[test]
    fn tokens_are_unique() {
        assert_ne!(new_token(), new_token());
        assert_eq!(new_token().len(), 32);
    }
}
