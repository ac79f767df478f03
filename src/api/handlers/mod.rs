//! REST endpoint handlers organized by resource.

pub mod activities;
pub mod auth;
pub mod feed;
pub mod notes;
pub mod reports;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes mounted under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(reports::routes())
        .merge(activities::routes())
        .merge(feed::routes())
        .merge(notes::routes())
        .merge(system::api_routes())
}
