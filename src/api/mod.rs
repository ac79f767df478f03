//! REST API layer of the reference backend: route handlers, DTOs, the
//! bearer-token extractor, the OpenAPI document and router composition.
//!
//! All resource endpoints are mounted under `/api`.

pub mod auth_user;
pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub use auth_user::AuthUser;

use crate::app_state::AppState;

/// Where the OpenAPI document is served.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// OpenAPI document of every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "EcoTrack API", description = "Waste reporting, cleanup verification feed and notes."),
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_profile,
        handlers::auth::update_profile,
        handlers::reports::list_reports,
        handlers::reports::my_reports,
        handlers::reports::create_report,
        handlers::reports::update_report_status,
        handlers::activities::list_activities,
        handlers::activities::my_activities,
        handlers::activities::create_activity,
        handlers::activities::like_activity,
        handlers::feed::feed_stats,
        handlers::feed::leaderboard,
        handlers::notes::list_notes,
        handlers::notes::create_note,
        handlers::notes::update_note,
        handlers::notes::delete_note,
        handlers::system::ping,
        handlers::system::health_handler,
    ),
    components(schemas(crate::error::ErrorResponse, crate::error::ErrorBody)),
    modifiers(&BearerAuth),
    tags(
        (name = "Auth", description = "Accounts and sessions"),
        (name = "Reports", description = "Waste reports"),
        (name = "Feed", description = "Cleanup activities, stats and leaderboard"),
        (name = "Notes", description = "Notes"),
        (name = "System", description = "Liveness"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` security scheme referenced by the handlers.
#[derive(Debug)]
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// Builds the complete router: `/api` resources, `/health` and the
/// OpenAPI document.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api", handlers::routes())
        .merge(handlers::system::routes());
    with_api_docs(router)
}

#[cfg(feature = "swagger-ui")]
fn with_api_docs(router: Router<AppState>) -> Router<AppState> {
    use utoipa_swagger_ui::SwaggerUi;
    router.merge(SwaggerUi::new("/swagger-ui").url(OPENAPI_PATH, ApiDoc::openapi()))
}

#[cfg(not(feature = "swagger-ui"))]
fn with_api_docs(router: Router<AppState>) -> Router<AppState> {
    use axum::Json;
    use axum::routing::get;
    router.route(
        OPENAPI_PATH,
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}
