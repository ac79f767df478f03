//! In-memory tables of the reference backend.
//!
//! [`Database`] keeps every table behind a single [`tokio::sync::RwLock`]
//! so that cross-table mutations (storing a report and crediting the
//! reporter, for instance) happen under one write guard. Reads run
//! concurrently.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::Session;
use crate::error::ServerError;
use crate::model::{CleanupActivity, Note, User, WasteReport};

/// A user row: the public profile plus credentials.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Public profile.
    pub user: User,
    /// Argon2 PHC string.
    pub password_hash: String,
}

/// All rows, in insertion order where order matters.
#[derive(Debug, Default)]
pub struct Tables {
    /// Accounts keyed by user ID.
    pub users: HashMap<String, UserRecord>,
    /// Bearer sessions keyed by token.
    pub sessions: HashMap<String, Session>,
    /// Waste reports, oldest first.
    pub reports: Vec<WasteReport>,
    /// Cleanup activities, oldest first.
    pub activities: Vec<CleanupActivity>,
    /// `(activity_id, user_id)` pairs that already liked.
    pub likes: HashSet<(String, String)>,
    /// Notes, oldest first.
    pub notes: Vec<Note>,
}

impl Tables {
    /// Finds an account by e-mail, ignoring ASCII case.
    #[must_use]
    pub fn user_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.users
            .values()
            .find(|r| r.user.email.eq_ignore_ascii_case(email))
    }

    /// Looks up a user profile.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::UserNotFound`] for an unknown ID.
    pub fn user(&self, user_id: &str) -> Result<&User, ServerError> {
        self.users
            .get(user_id)
            .map(|r| &r.user)
            .ok_or_else(|| ServerError::UserNotFound(user_id.to_string()))
    }

    /// Adds `points` to a user's balance and returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::UserNotFound`] for an unknown ID.
    pub fn credit_points(&mut self, user_id: &str, points: i64) -> Result<i64, ServerError> {
        let record = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| ServerError::UserNotFound(user_id.to_string()))?;
        record.user.points = record.user.points.saturating_add(points);
        Ok(record.user.points)
    }

    /// Looks up a report.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::ReportNotFound`] for an unknown ID.
    pub fn report(&self, report_id: &str) -> Result<&WasteReport, ServerError> {
        self.reports
            .iter()
            .find(|r| r.id == report_id)
            .ok_or_else(|| ServerError::ReportNotFound(report_id.to_string()))
    }

    /// Drops every session older than `ttl` at `now` and returns how many
    /// were removed.
    pub fn sweep_expired_sessions(&mut self, now: DateTime<Utc>, ttl: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired(now, ttl));
        before - self.sessions.len()
    }

    /// Mutable access to a report.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::ReportNotFound`] for an unknown ID.
    pub fn report_mut(&mut self, report_id: &str) -> Result<&mut WasteReport, ServerError> {
        self.reports
            .iter_mut()
            .find(|r| r.id == report_id)
            .ok_or_else(|| ServerError::ReportNotFound(report_id.to_string()))
    }

    /// Mutable access to an activity.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::ActivityNotFound`] for an unknown ID.
    pub fn activity_mut(
        &mut self,
        activity_id: &str,
    ) -> Result<&mut CleanupActivity, ServerError> {
        self.activities
            .iter_mut()
            .find(|a| a.id == activity_id)
            .ok_or_else(|| ServerError::ActivityNotFound(activity_id.to_string()))
    }

    /// Mutable access to a note.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::NoteNotFound`] for an unknown ID.
    pub fn note_mut(&mut self, note_id: &str) -> Result<&mut Note, ServerError> {
        self.notes
            .iter_mut()
            .find(|n| n.id == note_id)
            .ok_or_else(|| ServerError::NoteNotFound(note_id.to_string()))
    }
}

/// Shared handle on the tables.
#[derive(Debug, Default)]
pub struct Database {
    tables: RwLock<Tables>,
}

impl Database {
    /// Creates an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires shared access.
    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    /// Acquires exclusive access.
    pub async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn record(id: &str, email: &str) -> UserRecord {
        UserRecord {
            user: User {
                id: id.to_string(),
                name: "Asha".to_string(),
                email: email.to_string(),
                avatar: None,
                phone: None,
                location: None,
                points: 0,
                joined_date: Utc::now(),
            },
            password_hash: String::new(),
        }
    }

    #[tokio::test]
    async fn credit_points_accumulates() {
        let db = Database::new();
        let mut tables = db.write().await;
        tables.users.insert("u1".to_string(), record("u1", "a@eco.org"));
        assert!(matches!(tables.credit_points("u1", 50), Ok(50)));
        assert!(matches!(tables.credit_points("u1", 100), Ok(150)));
        assert!(matches!(
            tables.credit_points("nobody", 1),
            Err(ServerError::UserNotFound(_))
        ));
    }

    #[tokio::test]
    async fn email_lookup_ignores_case() {
        let db = Database::new();
        db.write()
            .await
            .users
            .insert("u1".to_string(), record("u1", "Asha@Eco.org"));
        let tables = db.read().await;
        let Some(found) = tables.user_by_email("asha@eco.org") else {
            panic!("user should be found");
        };
        assert_eq!(found.user.id, "u1");
    }

    #[tokio::test]
    async fn missing_rows_map_to_not_found() {
        let db = Database::new();
        let mut tables = db.write().await;
        assert!(matches!(
            tables.report_mut("r1"),
            Err(ServerError::ReportNotFound(_))
        ));
        assert!(matches!(
            tables.activity_mut("a1"),
            Err(ServerError::ActivityNotFound(_))
        ));
        assert!(matches!(tables.note_mut("n1"), Err(ServerError::NoteNotFound(_))));
        assert!(matches!(tables.report("r1"), Err(ServerError::ReportNotFound(_))));
    }

    #[tokio::test]
    async fn sweep_keeps_live_sessions() {
        let db = Database::new();
        let mut tables = db.write().await;
        let mut stale = Session::start("u1");
        stale.issued_at = Utc::now() - Duration::hours(2);
        tables.sessions.insert("old".to_string(), stale);
        tables.sessions.insert("new".to_string(), Session::start("u1"));

        assert_eq!(tables.sweep_expired_sessions(Utc::now(), Duration::hours(1)), 1);
        assert!(tables.sessions.contains_key("new"));
        assert!(!tables.sessions.contains_key("old"));
    }
}
