//! Feed store behaviour against a scripted mock server: like patching,
//! the filter/pagination race and the single-load guard.

#![allow(clippy::panic)]

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio_util::sync::CancellationToken;

use ecotrack::api::dto::{ActivityPageResponse, FeedPagination, FeedQuery, LikeResponse, StatsResponse};
use ecotrack::model::{FeedFilter, FeedStats};
use ecotrack::store::{EventBus, FeedStore, StoreEvent};

#[derive(Clone, Default)]
struct Script {
    page_two_calls: Arc<AtomicUsize>,
}

async fn feed(State(script): State<Script>, Query(q): Query<FeedQuery>) -> Json<ActivityPageResponse> {
    let (activities, has_more) = match (q.filter, q.page) {
        (FeedFilter::Verified, _) => (vec![common::activity("v1", 0)], false),
        (FeedFilter::Recent, _) => {
            tokio::time::sleep(Duration::from_millis(200)).await;
            (vec![common::activity("r1", 0)], true)
        }
        (_, 1) => (
            vec![common::activity("a1", 6), common::activity("a2", 2)],
            true,
        ),
        (_, _) => {
            script.page_two_calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(300)).await;
            (vec![common::activity("old", 0)], true)
        }
    };
    Json(ActivityPageResponse {
        pagination: FeedPagination {
            page: q.page,
            limit: q.limit,
            total: 0,
            has_more,
        },
        activities,
    })
}

async fn like(Path(_id): Path<String>) -> Json<LikeResponse> {
    Json(LikeResponse {
        likes: 7,
        message: "Activity liked".to_string(),
    })
}

async fn stats() -> Json<StatsResponse> {
    Json(StatsResponse {
        stats: FeedStats {
            areas_cleaned: 3,
            photos_shared: 4,
            verification_rate: 100,
            points_earned: 300,
        },
    })
}

async fn setup() -> (FeedStore, Script, EventBus) {
    let script = Script::default();
    let router = Router::new()
        .route("/api/cleanup-activities", get(feed))
        .route("/api/cleanup-activities/{id}/like", post(like))
        .route("/api/feed/stats", get(stats))
        .with_state(script.clone());
    let base = format!("{}/api", common::serve(router).await);
    let (client, _) = common::client(&base, Some("tok"));
    let events = EventBus::new(64);
    let store = FeedStore::new(client, 10, events.clone(), CancellationToken::new());
    (store, script, events)
}

fn ids(store: &FeedStore) -> Vec<String> {
    store.activities().into_iter().map(|a| a.id).collect()
}

#[tokio::test]
async fn like_patches_only_the_liked_activity() {
    let (store, _, _) = setup().await;
    store.load_feed_data(true).await;

    assert!(store.like_activity("a1").await);

    let activities = store.activities();
    let likes: Vec<(String, u32)> = activities.into_iter().map(|a| (a.id, a.likes)).collect();
    assert_eq!(
        likes,
        vec![("a1".to_string(), 7), ("a2".to_string(), 2)]
    );
}

#[tokio::test]
async fn filter_switch_discards_in_flight_page() {
    let (store, _, events) = setup().await;
    let mut rx = events.subscribe();
    store.load_feed_data(true).await;
    assert_eq!(store.current_page(), 2);

    let switch = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.filter_activities(FeedFilter::Verified).await;
    };
    tokio::join!(store.load_more_activities(), switch);

    assert_eq!(ids(&store), vec!["v1".to_string()]);
    assert_eq!(store.filter(), FeedFilter::Verified);
    assert!(!store.has_more());
    assert!(!store.is_loading());
    assert_eq!(store.current_page(), 2);

    let mut appended = false;
    while let Ok(event) = rx.try_recv() {
        if matches!(event, StoreEvent::FeedPageAppended { .. }) {
            appended = true;
        }
    }
    assert!(!appended, "stale page must not be appended");
}

#[tokio::test]
async fn load_more_right_after_filter_change_does_not_mix_filters() {
    let (store, script, _) = setup().await;
    store.load_feed_data(true).await;

    let more = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        store.load_more_activities().await;
    };
    tokio::join!(store.filter_activities(FeedFilter::Recent), more);

    assert_eq!(ids(&store), vec!["r1".to_string()]);
    assert_eq!(script.page_two_calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.current_page(), 2);
}

#[tokio::test]
async fn load_more_is_a_no_op_while_loading() {
    let (store, script, _) = setup().await;
    store.load_feed_data(true).await;

    tokio::join!(store.load_more_activities(), store.load_more_activities());

    assert_eq!(script.page_two_calls.load(Ordering::SeqCst), 1);
    assert_eq!(ids(&store), vec!["a1", "a2", "old"]);
    assert_eq!(store.current_page(), 3);
}

#[tokio::test]
async fn load_more_stops_when_no_page_remains() {
    let (store, script, _) = setup().await;
    store.filter_activities(FeedFilter::Verified).await;
    assert!(!store.has_more());

    store.load_more_activities().await;
    assert_eq!(script.page_two_calls.load(Ordering::SeqCst), 0);
    assert_eq!(ids(&store), vec!["v1".to_string()]);
}

#[tokio::test]
async fn refresh_loads_stats() {
    let (store, _, _) = setup().await;
    store.refresh_feed().await;
    let Some(stats) = store.stats() else {
        panic!("stats should be loaded");
    };
    assert_eq!(stats.areas_cleaned, 3);
    assert_eq!(ids(&store), vec!["a1".to_string(), "a2".to_string()]);
}
