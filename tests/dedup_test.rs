//! De-duplication of concurrent identical requests, checked against a
//! mock server that counts the calls it receives.

#![allow(clippy::panic)]

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{Value, json};
use tokio_test::{assert_err, assert_ok};

use ecotrack::api::dto::{LikeResponse, PingResponse};
use ecotrack::client::{ApiError, RequestOptions};
use reqwest::Method;

const DELAY: Duration = Duration::from_millis(150);

#[derive(Clone, Default)]
struct Counters {
    likes: Arc<AtomicUsize>,
    pings: Arc<AtomicUsize>,
    echoes: Arc<AtomicUsize>,
    failures: Arc<AtomicUsize>,
    last_auth: Arc<std::sync::Mutex<Option<String>>>,
}

async fn like(
    State(c): State<Counters>,
    Path(_id): Path<String>,
    headers: HeaderMap,
) -> Json<LikeResponse> {
    let n = c.likes.fetch_add(1, Ordering::SeqCst) + 1;
    if let Ok(mut slot) = c.last_auth.lock() {
        *slot = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
    }
    tokio::time::sleep(DELAY).await;
    Json(LikeResponse {
        likes: u32::try_from(n).unwrap_or(0),
        message: "Activity liked".to_string(),
    })
}

async fn ping(State(c): State<Counters>) -> Json<PingResponse> {
    c.pings.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(DELAY).await;
    Json(PingResponse {
        message: "pong".to_string(),
        timestamp: Utc::now(),
    })
}

async fn echo(State(c): State<Counters>, Json(body): Json<Value>) -> Json<Value> {
    c.echoes.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(DELAY).await;
    Json(body)
}

async fn fail(State(c): State<Counters>) -> (StatusCode, Json<Value>) {
    c.failures.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(DELAY).await;
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": {"code": 3000, "message": "database offline"}})),
    )
}

async fn mock() -> (String, Counters) {
    let counters = Counters::default();
    let router = Router::new()
        .route("/api/cleanup-activities/{id}/like", post(like))
        .route("/api/ping", get(ping))
        .route("/api/echo", post(echo))
        .route("/api/fail", post(fail))
        .with_state(counters.clone());
    let base = common::serve(router).await;
    (format!("{base}/api"), counters)
}

#[tokio::test]
async fn identical_concurrent_posts_share_one_call() {
    let (base, counters) = mock().await;
    let (client, _) = common::client(&base, Some("tok-1"));

    let (a, b) = tokio::join!(client.like_activity("a1"), client.like_activity("a1"));
    let (a, b) = (assert_ok!(a), assert_ok!(b));

    assert_eq!(counters.likes.load(Ordering::SeqCst), 1);
    assert_eq!(a.likes, b.likes);
    assert_eq!(client.in_flight_count(), 0);
    let auth = counters.last_auth.lock().map(|g| g.clone()).unwrap_or_default();
    assert_eq!(auth.as_deref(), Some("Bearer tok-1"));
}

#[tokio::test]
async fn settled_key_allows_a_new_call() {
    let (base, counters) = mock().await;
    let (client, _) = common::client(&base, None);

    assert_ok!(client.like_activity("a1").await);
    assert_ok!(client.like_activity("a1").await);
    assert_eq!(counters.likes.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn concurrent_gets_are_not_deduplicated() {
    let (base, counters) = mock().await;
    let (client, _) = common::client(&base, None);

    let (a, b) = tokio::join!(client.ping(), client.ping());
    assert_ok!(a);
    assert_ok!(b);
    assert_eq!(counters.pings.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn different_bodies_are_separate_calls() {
    let (base, counters) = mock().await;
    let (client, _) = common::client(&base, None);

    let one = RequestOptions::new(Method::POST).with_body(json!({"n": 1}));
    let two = RequestOptions::new(Method::POST).with_body(json!({"n": 2}));
    let (a, b) = tokio::join!(
        client.request::<Value>("/echo", one),
        client.request::<Value>("/echo", two)
    );
    assert_eq!(assert_ok!(a), json!({"n": 1}));
    assert_eq!(assert_ok!(b), json!({"n": 2}));
    assert_eq!(counters.echoes.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn shared_failure_reaches_every_caller() {
    let (base, counters) = mock().await;
    let (client, _) = common::client(&base, None);

    let options = || RequestOptions::new(Method::POST).with_body(json!({}));
    let (a, b) = tokio::join!(
        client.request::<Value>("/fail", options()),
        client.request::<Value>("/fail", options())
    );
    let (a, b) = (assert_err!(a), assert_err!(b));

    assert_eq!(counters.failures.load(Ordering::SeqCst), 1);
    assert_eq!(a, b);
    let ApiError::Status { status, message } = a else {
        panic!("expected a status error, got {a:?}");
    };
    assert_eq!(status, 500);
    assert_eq!(message, "database offline");
    assert_eq!(client.in_flight_count(), 0);
}

#[tokio::test]
async fn dropped_caller_does_not_leave_a_stale_key() {
    let (base, counters) = mock().await;
    let (client, _) = common::client(&base, None);

    let abandoned = tokio::time::timeout(Duration::from_millis(20), client.like_activity("a1")).await;
    assert!(abandoned.is_err());

    // The spawned request still completes and clears its key.
    tokio::time::sleep(DELAY * 2).await;
    assert_eq!(client.in_flight_count(), 0);
    assert_ok!(client.like_activity("a1").await);
    assert_eq!(counters.likes.load(Ordering::SeqCst), 2);
}
