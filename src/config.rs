//! Configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). [`ServerConfig`] drives the reference
//! backend, [`ClientConfig`] drives [`crate::app::EcoTrack`].

use std::net::SocketAddr;
use std::path::PathBuf;

/// Reference backend configuration.
///
/// Loaded once at startup via [`ServerConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8080`).
    pub listen_addr: SocketAddr,

    /// Eco points credited for a submitted waste report.
    pub report_points: i64,

    /// Eco points credited for a verified cleanup.
    pub cleanup_points: i64,

    /// Lifetime of a bearer session, in hours.
    pub session_ttl_hours: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            report_points: 50,
            cleanup_points: 100,
            session_ttl_hours: 168,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to [`ServerConfig::default`] values when a variable is
    /// not set. Calls `dotenvy::dotenv().ok()` to optionally load a `.env`
    /// file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr: SocketAddr = match std::env::var("LISTEN_ADDR") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.listen_addr,
        };

        Ok(Self {
            listen_addr,
            report_points: parse_env("REPORT_POINTS", defaults.report_points),
            cleanup_points: parse_env("CLEANUP_POINTS", defaults.cleanup_points),
            session_ttl_hours: parse_env("SESSION_TTL_HOURS", defaults.session_ttl_hours),
        })
    }
}

/// Client-side configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to (no trailing slash).
    pub api_base_url: String,

    /// File holding the persisted session token. `None` keeps the token
    /// in memory only.
    pub token_file: Option<PathBuf>,

    /// Activities requested per feed page.
    pub feed_page_size: u32,

    /// Capacity of the store-event broadcast channel.
    pub event_bus_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".to_string(),
            token_file: None,
            feed_page_size: 10,
            event_bus_capacity: 1024,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from environment variables, with
    /// [`ClientConfig::default`] values as fallback.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let api_base_url = std::env::var("ECOTRACK_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);
        let token_file = std::env::var("ECOTRACK_TOKEN_FILE")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Self {
            api_base_url,
            token_file,
            feed_page_size: parse_env("ECOTRACK_FEED_PAGE_SIZE", defaults.feed_page_size),
            event_bus_capacity: parse_env("EVENT_BUS_CAPACITY", defaults.event_bus_capacity),
        }
    }

    /// Config pointing at `api_base_url` with every other value defaulted.
    #[must_use]
    pub fn with_base_url(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Self::default()
        }
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
