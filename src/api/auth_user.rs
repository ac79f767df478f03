//! Bearer-token extractor for authenticated routes.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::app_state::AppState;
use crate::error::ServerError;
use crate::model::User;

/// The user behind the request's `Authorization: Bearer <token>` header.
///
/// Rejects with [`ServerError::Unauthorized`] (401) when the header is
/// missing, malformed, unknown or expired.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The authenticated account.
    pub user: User,
    /// The bearer token presented.
    pub token: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or(ServerError::Unauthorized)?
            .to_string();

        let user = state.users.authenticate(&token).await?;
        Ok(Self { user, token })
    }
}

/// Extracts the token from a `Bearer <token>` header value.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
