//! Registration, login and profile envelopes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::User;

/// Request body for `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Login e-mail.
    pub email: String,
    /// Plain-text password, hashed server-side.
    pub password: String,
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Login e-mail.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// Response of register and login: a bearer token and the user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    /// Opaque bearer token.
    pub token: String,
    /// The authenticated user.
    pub user: User,
}

/// Response of `GET`/`PUT /api/auth/profile`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    /// Current user record.
    pub user: User,
}
