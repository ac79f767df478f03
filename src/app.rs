//! Client composition root.
//!
//! [`EcoTrack`] owns the single [`ApiClient`], the store-event bus and the
//! three stores. Each store receives a child of the root cancellation
//! token, so [`EcoTrack::shutdown`] stops every store at once.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::client::{ApiClient, FileTokenStore, MemoryTokenStore, TokenStore};
use crate::config::ClientConfig;
use crate::store::{AuthStore, EventBus, FeedStore, ReportStore};

/// Wired client application: one API client shared by all stores.
#[derive(Debug)]
pub struct EcoTrack {
    client: Arc<ApiClient>,
    events: EventBus,
    cancel: CancellationToken,
    auth: AuthStore,
    reports: ReportStore,
    feed: FeedStore,
}

impl EcoTrack {
    /// Builds the stores without touching the network.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        let tokens: Arc<dyn TokenStore> = match &config.token_file {
            Some(path) => Arc::new(FileTokenStore::new(path.clone())),
            None => Arc::new(MemoryTokenStore::new()),
        };
        Self::with_client(
            Arc::new(ApiClient::new(config.api_base_url.clone(), tokens)),
            config,
        )
    }

    /// Builds the stores around an existing client.
    #[must_use]
    pub fn with_client(client: Arc<ApiClient>, config: &ClientConfig) -> Self {
        let events = EventBus::new(config.event_bus_capacity);
        let cancel = CancellationToken::new();

        let auth = AuthStore::new(Arc::clone(&client), events.clone(), cancel.child_token());
        let reports = ReportStore::new(Arc::clone(&client), events.clone(), cancel.child_token());
        let feed = FeedStore::new(
            Arc::clone(&client),
            config.feed_page_size,
            events.clone(),
            cancel.child_token(),
        );

        Self {
            client,
            events,
            cancel,
            auth,
            reports,
            feed,
        }
    }

    /// Builds the application, restores a persisted session, then loads
    /// the reports, the first feed page and the feed stats.
    pub async fn connect(config: ClientConfig) -> Self {
        let app = Self::new(&config);
        tracing::info!(api = %app.client.base_url(), "connecting EcoTrack client");

        app.auth.restore_session().await;
        tokio::join!(app.reports.refresh(), app.feed.refresh_feed());
        app
    }

    /// The shared API client.
    #[must_use]
    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// The store-event bus.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Session store.
    #[must_use]
    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    /// Waste-report store.
    #[must_use]
    pub fn reports(&self) -> &ReportStore {
        &self.reports
    }

    /// Activity feed store.
    #[must_use]
    pub fn feed(&self) -> &FeedStore {
        &self.feed
    }

    /// Cancels every store. Results of calls still in flight are dropped.
    pub fn shutdown(&self) {
        self.cancel.cancel();
        tracing::info!("EcoTrack client shut down");
    }

    /// Whether [`EcoTrack::shutdown`] has run.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_app_starts_signed_out() {
        let app = EcoTrack::new(&ClientConfig::with_base_url("http://127.0.0.1:1/api"));
        assert!(app.auth().user().is_none());
        assert!(app.reports().is_empty());
        assert_eq!(app.client().in_flight_count(), 0);
    }

    #[tokio::test]
    async fn connect_against_unreachable_server_degrades_to_empty_state() {
        let app = EcoTrack::connect(ClientConfig::with_base_url("http://127.0.0.1:1/api")).await;
        assert!(app.reports().is_empty());
        assert!(app.feed().activities().is_empty());
        assert_eq!(app.feed().stats(), Some(crate::model::FeedStats::default()));
    }

    #[tokio::test]
    async fn shutdown_cancels_child_stores() {
        let app = EcoTrack::new(&ClientConfig::with_base_url("http://127.0.0.1:1/api"));
        app.shutdown();
        assert!(app.is_shut_down());
        // Closed stores drop results instead of applying them.
        app.feed().load_feed_stats().await;
        assert_eq!(app.feed().stats(), None);
    }
}
