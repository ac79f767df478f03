//! Accounts, sessions, profiles and the leaderboard.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::api::dto::{AuthResponse, LeaderboardEntry, LoginRequest, RegisterRequest};
use crate::domain::{
    Database, Session, Tables, UserRecord, hash_password, new_token, verify_password,
};
use crate::error::ServerError;
use crate::model::validation::require_text;
use crate::model::{ProfileUpdate, User};

/// Largest leaderboard the backend serves.
pub const MAX_LEADERBOARD_LIMIT: u32 = 100;

/// Account and session operations.
#[derive(Debug, Clone)]
pub struct UserService {
    db: Arc<Database>,
    session_ttl: Duration,
}

impl UserService {
    /// Creates the service; sessions live for `session_ttl`.
    #[must_use]
    pub fn new(db: Arc<Database>, session_ttl: Duration) -> Self {
        Self { db, session_ttl }
    }

    /// Creates an account and signs it in.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Validation`] for blank fields and
    /// [`ServerError::EmailTaken`] when the e-mail is registered.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ServerError> {
        let name = require_text("name", &request.name)?;
        let email = require_text("email", &request.email)?;
        require_text("password", &request.password)?;

        if self.db.read().await.user_by_email(&email).is_some() {
            return Err(ServerError::EmailTaken(email));
        }
        let password_hash = hash_password(&request.password)?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            avatar: None,
            phone: None,
            location: None,
            points: 0,
            joined_date: Utc::now(),
        };

        let token = new_token();
        {
            let mut tables = self.db.write().await;
            // Re-check under the write guard: hashing ran unlocked.
            if tables.user_by_email(&user.email).is_some() {
                return Err(ServerError::EmailTaken(user.email));
            }
            tables.users.insert(
                user.id.clone(),
                UserRecord {
                    user: user.clone(),
                    password_hash,
                },
            );
            self.start_session(&mut tables, &token, &user.id);
        }

        tracing::info!(user_id = %user.id, "user registered");
        Ok(AuthResponse { token, user })
    }

    /// Verifies credentials and issues a new session token.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidCredentials`] for an unknown e-mail or
    /// a wrong password.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ServerError> {
        let (user, password_hash) = {
            let tables = self.db.read().await;
            let record = tables
                .user_by_email(request.email.trim())
                .ok_or(ServerError::InvalidCredentials)?;
            (record.user.clone(), record.password_hash.clone())
        };

        if !verify_password(&request.password, &password_hash) {
            tracing::warn!(user_id = %user.id, "login with wrong password");
            return Err(ServerError::InvalidCredentials);
        }

        let token = new_token();
        self.start_session(&mut *self.db.write().await, &token, &user.id);

        tracing::info!(user_id = %user.id, "user logged in");
        Ok(AuthResponse { token, user })
    }

    /// Resolves a bearer token to its user. Expired sessions are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Unauthorized`] for an unknown or expired
    /// token, or one whose account no longer exists.
    pub async fn authenticate(&self, token: &str) -> Result<User, ServerError> {
        let now = Utc::now();
        {
            let tables = self.db.read().await;
            let session = tables.sessions.get(token).ok_or(ServerError::Unauthorized)?;
            if !session.is_expired(now, self.session_ttl) {
                return tables
                    .user(&session.user_id)
                    .cloned()
                    .map_err(|_| ServerError::Unauthorized);
            }
        }

        self.db.write().await.sessions.remove(token);
        tracing::debug!("expired session removed");
        Err(ServerError::Unauthorized)
    }

    /// Stores a session for `user_id`, sweeping expired ones first so the
    /// table holds at most the live sessions plus the new one.
    fn start_session(&self, tables: &mut Tables, token: &str, user_id: &str) {
        let swept = tables.sweep_expired_sessions(Utc::now(), self.session_ttl);
        if swept > 0 {
            tracing::debug!(swept, "expired sessions removed");
        }
        tables
            .sessions
            .insert(token.to_string(), Session::start(user_id));
    }

    /// Current profile of `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::UserNotFound`] for an unknown ID.
    pub async fn profile(&self, user_id: &str) -> Result<User, ServerError> {
        self.db.read().await.user(user_id).cloned()
    }

    /// Applies a partial profile update and returns the stored profile.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::UserNotFound`] for an unknown ID and
    /// [`ServerError::EmailTaken`] when the new e-mail belongs to another
    /// account.
    pub async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<User, ServerError> {
        let mut tables = self.db.write().await;
        let current = tables.user(user_id)?.clone();
        let merged = update.merged_with(&current);

        if let Some(email) = &merged.email
            && let Some(other) = tables.user_by_email(email)
            && other.user.id != user_id
        {
            return Err(ServerError::EmailTaken(email.clone()));
        }

        let record = tables
            .users
            .get_mut(user_id)
            .ok_or_else(|| ServerError::UserNotFound(user_id.to_string()))?;
        let user = &mut record.user;
        if let Some(name) = merged.name {
            user.name = name;
        }
        if let Some(email) = merged.email {
            user.email = email;
        }
        user.phone = merged.phone;
        user.location = merged.location;

        tracing::info!(%user_id, "profile updated");
        Ok(user.clone())
    }

    /// Users ranked by points, ties broken by earlier registration.
    pub async fn leaderboard(&self, limit: u32) -> Vec<LeaderboardEntry> {
        let limit = limit.clamp(1, MAX_LEADERBOARD_LIMIT) as usize;
        let tables = self.db.read().await;

        let mut users: Vec<&User> = tables.users.values().map(|r| &r.user).collect();
        users.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then_with(|| a.joined_date.cmp(&b.joined_date))
        });

        users
            .into_iter()
            .take(limit)
            .zip(1u32..)
            .map(|(user, rank)| LeaderboardEntry {
                rank,
                user_id: user.id.clone(),
                name: user.name.clone(),
                avatar: user.avatar.clone(),
                points: user.points,
            })
            .collect()
    }
}
