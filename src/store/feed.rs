//! Paginated cleanup-activity feed with filter switching and stats.
//!
//! Every load is dispatched with a [`LoadTicket`] carrying the feed
//! generation active at dispatch time. A reset load (first page, filter
//! change, refresh) starts a new generation, so any page still in flight
//! from before is discarded on arrival instead of being appended to the
//! new list.

use std::sync::{Arc, RwLock};

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use super::{EventBus, StoreEvent, SubmitOutcome, read, until_cancelled, write};
use crate::api::dto::ActivityPageResponse;
use crate::client::{ApiClient, ApiError};
use crate::model::{CleanupActivity, CleanupDraft, FeedFilter, FeedStats};

#[derive(Debug)]
struct FeedState {
    activities: Vec<CleanupActivity>,
    stats: Option<FeedStats>,
    /// Generation of the load in progress.
    loading: Option<u64>,
    has_more: bool,
    current_page: u32,
    filter: FeedFilter,
    generation: u64,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            activities: Vec::new(),
            stats: None,
            loading: None,
            has_more: true,
            current_page: 1,
            filter: FeedFilter::All,
            generation: 0,
        }
    }
}

/// What a load asked for, and under which generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LoadTicket {
    page: u32,
    filter: FeedFilter,
    generation: u64,
    reset: bool,
}

impl FeedState {
    fn begin_load(&mut self, reset: bool) -> LoadTicket {
        if reset {
            self.generation += 1;
        }
        self.loading = Some(self.generation);
        LoadTicket {
            page: if reset { 1 } else { self.current_page },
            filter: self.filter,
            generation: self.generation,
            reset,
        }
    }

    /// Applies a page. Returns `false` when the ticket is stale.
    fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<ActivityPageResponse, ApiError>,
    ) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.loading = None;

        match result {
            Ok(response) => {
                if ticket.reset {
                    self.activities = response.activities;
                } else {
                    self.activities.extend(response.activities);
                }
                self.has_more = response.pagination.has_more;
                self.current_page = ticket.page + 1;
            }
            Err(e) => {
                tracing::error!(filter = %ticket.filter, page = ticket.page, error = %e, "error loading feed data");
                self.activities.clear();
            }
        }
        true
    }
}

/// Activity feed cache.
#[derive(Debug)]
pub struct FeedStore {
    client: Arc<ApiClient>,
    page_size: u32,
    state: RwLock<FeedState>,
    events: EventBus,
    cancel: CancellationToken,
}

impl FeedStore {
    /// Creates an empty store on the `all` filter without fetching.
    #[must_use]
    pub fn new(
        client: Arc<ApiClient>,
        page_size: u32,
        events: EventBus,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            client,
            page_size: page_size.max(1),
            state: RwLock::new(FeedState::default()),
            events,
            cancel,
        }
    }

    /// Creates a store and loads the first page and the stats.
    pub async fn connect(
        client: Arc<ApiClient>,
        page_size: u32,
        events: EventBus,
        cancel: CancellationToken,
    ) -> Self {
        let store = Self::new(client, page_size, events, cancel);
        store.refresh_feed().await;
        store
    }

    /// Snapshot of the listed activities.
    #[must_use]
    pub fn activities(&self) -> Vec<CleanupActivity> {
        read(&self.state).activities.clone()
    }

    /// Latest stats, `None` before the first stats load.
    #[must_use]
    pub fn stats(&self) -> Option<FeedStats> {
        read(&self.state).stats
    }

    /// Whether a page load is in progress.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        read(&self.state).loading.is_some()
    }

    /// Whether the server reported a further page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        read(&self.state).has_more
    }

    /// Page the next append will request.
    #[must_use]
    pub fn current_page(&self) -> u32 {
        read(&self.state).current_page
    }

    /// Active filter.
    #[must_use]
    pub fn filter(&self) -> FeedFilter {
        read(&self.state).filter
    }

    /// Switches filter: resets pagination, then reloads page 1 and stats.
    pub async fn filter_activities(&self, filter: FeedFilter) {
        {
            let mut state = write(&self.state);
            state.filter = filter;
            state.current_page = 1;
            state.has_more = true;
        }
        tracing::debug!(%filter, "feed filter changed");
        self.load_feed_data(true).await;
        self.load_feed_stats().await;
    }

    /// Loads a page: page 1 replacing the list when `reset`, otherwise
    /// the current page appended to it.
    pub async fn load_feed_data(&self, reset: bool) {
        let ticket = write(&self.state).begin_load(reset);
        self.run_load(ticket).await;
    }

    /// Appends the next page. No-op while a load is running or when the
    /// server reported no further page.
    pub async fn load_more_activities(&self) {
        let ticket = {
            let mut state = write(&self.state);
            if state.loading.is_some() || !state.has_more {
                return;
            }
            state.begin_load(false)
        };
        self.run_load(ticket).await;
    }

    /// Reloads page 1, then the stats.
    pub async fn refresh_feed(&self) {
        self.load_feed_data(true).await;
        self.load_feed_stats().await;
    }

    /// Fetches stats; on failure installs zeroed stats.
    pub async fn load_feed_stats(&self) {
        let Some(result) = until_cancelled(&self.cancel, self.client.get_feed_stats()).await
        else {
            return;
        };

        let (stats, fallback) = match result {
            Ok(response) => (response.stats, false),
            Err(e) => {
                tracing::error!(error = %e, "error loading feed stats");
                (FeedStats::default(), true)
            }
        };
        write(&self.state).stats = Some(stats);
        let _ = self.events.publish(StoreEvent::StatsUpdated {
            fallback,
            timestamp: Utc::now(),
        });
    }

    /// Likes an activity and patches only its `likes` field with the
    /// server's count. Returns `false` on failure.
    pub async fn like_activity(&self, activity_id: &str) -> bool {
        match until_cancelled(&self.cancel, self.client.like_activity(activity_id)).await {
            Some(Ok(response)) => {
                {
                    let mut state = write(&self.state);
                    if let Some(activity) =
                        state.activities.iter_mut().find(|a| a.id == activity_id)
                    {
                        activity.likes = response.likes;
                    }
                }
                let _ = self.events.publish(StoreEvent::ActivityLiked {
                    activity_id: activity_id.to_string(),
                    likes: response.likes,
                    timestamp: Utc::now(),
                });
                true
            }
            Some(Err(e)) => {
                tracing::error!(activity_id, error = %e, "error liking activity");
                false
            }
            None => false,
        }
    }

    /// Validates and submits a cleanup verification, prepends the stored
    /// activity, then refreshes the stats in a second call.
    pub async fn create_cleanup_activity(&self, draft: CleanupDraft) -> SubmitOutcome {
        let request = match draft.into_request() {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "cleanup draft rejected");
                return SubmitOutcome::failed();
            }
        };

        let call = self.client.create_cleanup_activity(&request);
        let response = match until_cancelled(&self.cancel, call).await {
            Some(Ok(response)) => response,
            Some(Err(e)) => {
                tracing::error!(error = %e, "error creating cleanup activity");
                return SubmitOutcome::failed();
            }
            None => return SubmitOutcome::failed(),
        };

        let activity_id = response.activity.id.clone();
        write(&self.state).activities.insert(0, response.activity);
        tracing::info!(%activity_id, points = response.points_earned, "cleanup activity created");
        let _ = self.events.publish(StoreEvent::ActivityCreated {
            activity_id,
            points_earned: response.points_earned,
            timestamp: Utc::now(),
        });

        self.load_feed_stats().await;
        SubmitOutcome::succeeded(response.points_earned)
    }

    /// Stops applying results of outstanding calls.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    async fn run_load(&self, ticket: LoadTicket) {
        let call = self
            .client
            .get_feed_activities(ticket.page, self.page_size, ticket.filter);
        let Some(result) = until_cancelled(&self.cancel, call).await else {
            return;
        };
        let count = result.as_ref().map_or(0, |r| r.activities.len());

        let applied = write(&self.state).finish_load(ticket, result);
        if !applied {
            tracing::debug!(
                filter = %ticket.filter,
                page = ticket.page,
                "discarding stale feed page"
            );
            return;
        }

        let event = if ticket.reset {
            StoreEvent::FeedReset {
                filter: ticket.filter,
                count,
                timestamp: Utc::now(),
            }
        } else {
            StoreEvent::FeedPageAppended {
                filter: ticket.filter,
                page: ticket.page,
                count,
                timestamp: Utc::now(),
            }
        };
        let _ = self.events.publish(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::FeedPagination;
    use crate::model::Location;

    fn activity(id: &str) -> CleanupActivity {
        CleanupActivity {
            id: id.to_string(),
            user_id: "u1".to_string(),
            user_name: "Asha".to_string(),
            user_avatar: None,
            waste_report_id: None,
            waste_type: "Plastic Bottles".to_string(),
            location: Location::new(18.52, 73.85, ""),
            description: "two bags".to_string(),
            before_image: None,
            after_image: None,
            verification_image: "img".to_string(),
            verified: true,
            points_earned: 100,
            likes: 0,
            comments: 0,
            cleaned_at: Utc::now(),
            created_at: Utc::now(),
        }
    }

    fn page(ids: &[&str], has_more: bool) -> Result<ActivityPageResponse, ApiError> {
        Ok(ActivityPageResponse {
            activities: ids.iter().map(|id| activity(id)).collect(),
            pagination: FeedPagination {
                page: 1,
                limit: 10,
                total: 0,
                has_more,
            },
        })
    }

    #[test]
    fn reset_replaces_and_append_extends() {
        let mut state = FeedState::default();
        let t1 = state.begin_load(true);
        assert!(state.finish_load(t1, page(&["a", "b"], true)));
        assert_eq!(state.current_page, 2);

        let t2 = state.begin_load(false);
        assert_eq!(t2.page, 2);
        assert!(state.finish_load(t2, page(&["c"], false)));
        assert_eq!(state.activities.len(), 3);
        assert_eq!(state.current_page, 3);
        assert!(!state.has_more);
        assert_eq!(state.loading, None);
    }

    #[test]
    fn page_advances_even_when_empty() {
        let mut state = FeedState::default();
        let t = state.begin_load(true);
        assert!(state.finish_load(t, page(&[], false)));
        assert_eq!(state.current_page, 2);
    }

    #[test]
    fn stale_append_after_reset_is_discarded() {
        let mut state = FeedState::default();
        let t0 = state.begin_load(true);
        state.finish_load(t0, page(&["a"], true));

        let stale = state.begin_load(false);
        state.filter = FeedFilter::Verified;
        let fresh = state.begin_load(true);

        assert!(state.finish_load(fresh, page(&["v1"], false)));
        assert!(!state.finish_load(stale, page(&["old"], true)));
        let ids: Vec<&str> = state.activities.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["v1"]);
        assert!(!state.has_more);
        assert_eq!(state.loading, None);
    }

    #[test]
    fn stale_response_arriving_first_keeps_loading_flag() {
        let mut state = FeedState::default();
        let stale = state.begin_load(false);
        let fresh = state.begin_load(true);
        assert!(!state.finish_load(stale, page(&["old"], true)));
        assert_eq!(state.loading, Some(fresh.generation));
    }

    #[test]
    fn failed_load_empties_list() {
        let mut state = FeedState::default();
        let t = state.begin_load(true);
        state.finish_load(t, page(&["a"], true));
        let t = state.begin_load(false);
        assert!(state.finish_load(t, Err(ApiError::Transport("down".to_string()))));
        assert!(state.activities.is_empty());
        assert_eq!(state.current_page, 2);
    }
}
