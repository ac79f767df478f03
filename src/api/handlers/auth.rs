//! Registration, login and profile handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::AuthUser;
use crate::api::dto::{AuthResponse, LoginRequest, ProfileResponse, RegisterRequest};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, ServerError};
use crate::model::ProfileUpdate;

/// `POST /auth/register`: Create an account and sign in.
///
/// # Errors
///
/// Returns [`ServerError`] on blank fields or a registered e-mail.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    summary = "Register",
    description = "Creates an account and returns a bearer token for it.",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Missing name, e-mail or password", body = ErrorResponse),
        (status = 409, description = "E-mail already registered", body = ErrorResponse),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let response = state.users.register(&req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `POST /auth/login`: Exchange credentials for a bearer token.
///
/// # Errors
///
/// Returns [`ServerError::InvalidCredentials`] on a bad e-mail/password.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    summary = "Log in",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ServerError> {
    Ok(Json(state.users.login(&req).await?))
}

/// `GET /auth/profile`: Current user.
///
/// # Errors
///
/// Returns [`ServerError::Unauthorized`] for a missing or expired token.
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    tag = "Auth",
    summary = "Get own profile",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Missing or expired token", body = ErrorResponse),
    )
)]
pub async fn get_profile(auth: AuthUser) -> Json<ProfileResponse> {
    Json(ProfileResponse { user: auth.user })
}

/// `PUT /auth/profile`: Partial profile update.
///
/// # Errors
///
/// Returns [`ServerError`] for a missing token or a taken e-mail.
#[utoipa::path(
    put,
    path = "/api/auth/profile",
    tag = "Auth",
    summary = "Update own profile",
    description = "Fields left out keep their current value.",
    security(("bearer" = [])),
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 401, description = "Missing or expired token", body = ErrorResponse),
        (status = 409, description = "E-mail already registered", body = ErrorResponse),
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ProfileResponse>, ServerError> {
    let user = state.users.update_profile(&auth.user.id, &update).await?;
    Ok(Json(ProfileResponse { user }))
}

/// Auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/profile", get(get_profile).put(update_profile))
}
