//! Shared helpers: spawn the real backend or a mock router on an
//! ephemeral port, plus fixtures.

#![allow(dead_code, clippy::panic)]

use std::sync::Arc;

use axum::Router;
use chrono::Utc;
use tokio::net::TcpListener;

use ecotrack::api;
use ecotrack::app_state::AppState;
use ecotrack::client::{ApiClient, MemoryTokenStore, TokenStore};
use ecotrack::config::ServerConfig;
use ecotrack::model::{CleanupActivity, Location};

/// Serves `router` on `127.0.0.1:0` and returns `http://addr`.
pub async fn serve(router: Router) -> String {
    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("failed to bind test listener");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("listener has no address");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

/// Starts the reference backend and returns its `/api` base URL.
pub async fn spawn_backend(config: ServerConfig) -> String {
    let router = api::build_router().with_state(AppState::new(&config));
    format!("{}/api", serve(router).await)
}

/// Starts the reference backend with default settings.
pub async fn spawn_default_backend() -> String {
    spawn_backend(ServerConfig::default()).await
}

/// Client over an in-memory token store, returning both.
pub fn client(base_url: &str, token: Option<&str>) -> (Arc<ApiClient>, Arc<MemoryTokenStore>) {
    let tokens = Arc::new(match token {
        Some(t) => MemoryTokenStore::with_token(t),
        None => MemoryTokenStore::new(),
    });
    let dyn_tokens: Arc<dyn TokenStore> = Arc::clone(&tokens) as Arc<dyn TokenStore>;
    (Arc::new(ApiClient::new(base_url, dyn_tokens)), tokens)
}

/// A verified activity with the given id and like count.
pub fn activity(id: &str, likes: u32) -> CleanupActivity {
    CleanupActivity {
        id: id.to_string(),
        user_id: "u1".to_string(),
        user_name: "Asha".to_string(),
        user_avatar: None,
        waste_report_id: None,
        waste_type: "Plastic Bottles".to_string(),
        location: Location::new(18.52, 73.85, "FC Road"),
        description: format!("cleanup {id}"),
        before_image: None,
        after_image: None,
        verification_image: "verify.jpg".to_string(),
        verified: true,
        points_earned: 100,
        likes,
        comments: 0,
        cleaned_at: Utc::now(),
        created_at: Utc::now(),
    }
}
