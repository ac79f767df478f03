//! Session state: current user and persisted bearer token.

use std::future::Future;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use super::{EventBus, StoreEvent, read, until_cancelled, write};
use crate::api::dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::client::{ApiClient, ApiError};
use crate::model::{MilestoneProgress, ProfileUpdate, User};

/// Where the session stands.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// No user is signed in.
    Unauthenticated,
    /// A login, signup or session restore is in progress.
    Loading,
    /// A user is signed in.
    Authenticated(User),
}

#[derive(Debug, Default)]
struct Session {
    user: Option<User>,
    loading: bool,
}

/// Holds the signed-in user and keeps the persisted token in step.
#[derive(Debug)]
pub struct AuthStore {
    client: Arc<ApiClient>,
    session: RwLock<Session>,
    events: EventBus,
    cancel: CancellationToken,
}

impl AuthStore {
    /// Creates a signed-out store. Call [`AuthStore::restore_session`] to
    /// pick up a persisted token.
    #[must_use]
    pub fn new(client: Arc<ApiClient>, events: EventBus, cancel: CancellationToken) -> Self {
        Self {
            client,
            session: RwLock::new(Session::default()),
            events,
            cancel,
        }
    }

    /// Current session state. Loading wins over a known user.
    #[must_use]
    pub fn state(&self) -> AuthState {
        let session = read(&self.session);
        if session.loading {
            AuthState::Loading
        } else {
            session
                .user
                .clone()
                .map_or(AuthState::Unauthenticated, AuthState::Authenticated)
        }
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        read(&self.session).user.clone()
    }

    /// Milestone progress of the signed-in user's eco-points balance.
    #[must_use]
    pub fn reward_progress(&self) -> Option<MilestoneProgress> {
        read(&self.session)
            .user
            .as_ref()
            .map(|u| MilestoneProgress::for_points(u.points))
    }

    /// Whether an auth call is in progress.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        read(&self.session).loading
    }

    /// Validates a persisted token by fetching the profile.
    ///
    /// Any failure clears the token: a 401 is expected expiry and only
    /// logged at info level, anything else is logged as an error. Never
    /// fails towards the caller.
    pub async fn restore_session(&self) {
        if self.client.tokens().load().is_none() {
            return;
        }

        write(&self.session).loading = true;
        let outcome = until_cancelled(&self.cancel, self.client.get_profile()).await;

        match outcome {
            None => tracing::debug!("auth store closed, discarding profile response"),
            Some(Ok(response)) => {
                tracing::info!(user_id = %response.user.id, "session restored");
                self.set_user(Some(response.user));
            }
            Some(Err(e)) => {
                if e.is_unauthorized() {
                    tracing::info!("token expired or invalid, removing it from storage");
                } else {
                    tracing::error!(error = %e, "token validation failed");
                }
                self.client.tokens().clear();
                self.set_user(None);
            }
        }
        write(&self.session).loading = false;
    }

    /// Signs in. Returns `false` and leaves the session untouched on
    /// failure.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        self.authenticate("login", self.client.login(&request)).await
    }

    /// Registers and signs in. Returns `false` and leaves the session
    /// untouched on failure.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> bool {
        let request = RegisterRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        self.authenticate("signup", self.client.register(&request))
            .await
    }

    /// Signs out locally: clears the user and the persisted token. No
    /// network call is made.
    pub fn logout(&self) {
        self.client.tokens().clear();
        self.set_user(None);
        tracing::info!("signed out");
    }

    /// Sends the supplied fields merged over the current profile and
    /// replaces the user with the server's answer.
    ///
    /// Returns `false` without touching state when nobody is signed in or
    /// the call fails.
    pub async fn update_profile(&self, update: ProfileUpdate) -> bool {
        let Some(current) = self.user() else {
            return false;
        };
        let merged = update.merged_with(&current);

        match until_cancelled(&self.cancel, self.client.update_profile(&merged)).await {
            Some(Ok(response)) => {
                tracing::info!(user_id = %response.user.id, "profile updated");
                self.set_user(Some(response.user));
                true
            }
            Some(Err(e)) => {
                tracing::error!(error = %e, "profile update failed");
                false
            }
            None => false,
        }
    }

    /// Stops applying results of outstanding calls.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    async fn authenticate(
        &self,
        action: &'static str,
        call: impl Future<Output = Result<AuthResponse, ApiError>>,
    ) -> bool {
        write(&self.session).loading = true;
        let outcome = until_cancelled(&self.cancel, call).await;
        write(&self.session).loading = false;

        match outcome {
            Some(Ok(response)) => {
                self.client.tokens().save(&response.token);
                tracing::info!(action, user_id = %response.user.id, "signed in");
                self.set_user(Some(response.user));
                true
            }
            Some(Err(e)) => {
                tracing::error!(action, error = %e, "authentication failed");
                false
            }
            None => false,
        }
    }

    fn set_user(&self, user: Option<User>) {
        let user_id = user.as_ref().map(|u| u.id.clone());
        write(&self.session).user = user;
        let _ = self.events.publish(StoreEvent::SessionChanged {
            user_id,
            timestamp: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MemoryTokenStore, TokenStore};

    fn store_with_token(token: Option<&str>) -> (AuthStore, Arc<MemoryTokenStore>) {
        let tokens = Arc::new(token.map_or_else(MemoryTokenStore::new, MemoryTokenStore::with_token));
        let dyn_tokens: Arc<dyn TokenStore> = Arc::clone(&tokens) as Arc<dyn TokenStore>;
        // Nothing listens on port 1; any network call would fail.
        let client = Arc::new(ApiClient::new("http://127.0.0.1:1/api", dyn_tokens));
        let store = AuthStore::new(client, EventBus::new(16), CancellationToken::new());
        (store, tokens)
    }

    #[test]
    fn new_store_is_unauthenticated() {
        let (store, _) = store_with_token(None);
        assert_eq!(store.state(), AuthState::Unauthenticated);
        assert!(!store.is_loading());
    }

    #[test]
    fn logout_clears_token_without_network() {
        let (store, tokens) = store_with_token(Some("tok"));
        store.logout();
        assert_eq!(tokens.load(), None);
        assert_eq!(store.user(), None);
    }

    #[tokio::test]
    async fn restore_without_token_does_nothing() {
        let (store, _) = store_with_token(None);
        store.restore_session().await;
        assert_eq!(store.state(), AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn restore_with_unreachable_server_fails_closed() {
        let (store, tokens) = store_with_token(Some("tok"));
        store.restore_session().await;
        assert_eq!(tokens.load(), None);
        assert_eq!(store.state(), AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn failed_login_keeps_prior_state() {
        let (store, tokens) = store_with_token(Some("previous"));
        assert!(!store.login("a@example.com", "pw").await);
        assert_eq!(tokens.load().as_deref(), Some("previous"));
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn update_profile_requires_a_user() {
        let (store, _) = store_with_token(None);
        assert!(!store.update_profile(ProfileUpdate::default()).await);
    }

    #[tokio::test]
    async fn closed_store_discards_login() {
        let (store, tokens) = store_with_token(None);
        store.close();
        assert!(!store.login("a@example.com", "pw").await);
        assert_eq!(tokens.load(), None);
    }
}
