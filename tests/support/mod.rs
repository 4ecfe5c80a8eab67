// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Mock upstream API server for integration tests
//!
//! Stands up a local axum server with the three API routes. Each route's
//! behavior is chosen per test and every hit is counted, so tests can assert
//! that a short-circuited sequence never issued the later calls.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Query;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, MethodRouter};
use axum::{Json, Router};
use serde_json::{json, Value};

/// How one mock route behaves
#[derive(Clone)]
pub enum Upstream {
    /// Answer with a canned `status: OK` payload
    Ok,
    /// Answer with `status: FAILED` and the given comment
    Failed(&'static str),
    /// Answer with a non-JSON body
    Html(&'static str),
    /// Sleep before answering OK
    DelayMs(u64),
    /// Sleep only for the named handle, then answer OK
    SlowForHandle {
        handle: &'static str,
        delay_ms: u64,
    },
    /// Answer with an arbitrary envelope verbatim
    Custom(Value),
}

#[derive(Clone, Copy)]
enum Route {
    Info,
    Rating,
    Status,
}

/// A running mock API and its per-route hit counters
pub struct MockApi {
    pub base_url: String,
    pub info_hits: Arc<AtomicUsize>,
    pub rating_hits: Arc<AtomicUsize>,
    pub status_hits: Arc<AtomicUsize>,
}

/// Start a mock API with the given per-route behaviors
pub async fn spawn(info: Upstream, rating: Upstream, status: Upstream) -> MockApi {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let info_hits = Arc::new(AtomicUsize::new(0));
    let rating_hits = Arc::new(AtomicUsize::new(0));
    let status_hits = Arc::new(AtomicUsize::new(0));

    let app = Router::new()
        .route("/user.info", handler(Route::Info, info, info_hits.clone()))
        .route(
            "/user.rating",
            handler(Route::Rating, rating, rating_hits.clone()),
        )
        .route(
            "/user.status",
            handler(Route::Status, status, status_hits.clone()),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock listener");
    let addr = listener.local_addr().expect("Failed to read mock addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock server failed");
    });

    MockApi {
        base_url: format!("http://{}/", addr),
        info_hits,
        rating_hits,
        status_hits,
    }
}

fn handler(route: Route, behavior: Upstream, hits: Arc<AtomicUsize>) -> MethodRouter {
    get(move |Query(params): Query<HashMap<String, String>>| {
        let behavior = behavior.clone();
        let hits = hits.clone();
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            let handle = params
                .get("handles")
                .or_else(|| params.get("handle"))
                .cloned()
                .unwrap_or_default();

            match behavior {
                Upstream::Ok => ok_response(route, &handle),
                Upstream::Failed(comment) => {
                    Json(json!({"status": "FAILED", "comment": comment})).into_response()
                }
                Upstream::Html(body) => {
                    ([(header::CONTENT_TYPE, "text/html")], body).into_response()
                }
                Upstream::DelayMs(ms) => {
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                    ok_response(route, &handle)
                }
                Upstream::SlowForHandle {
                    handle: slow,
                    delay_ms,
                } => {
                    if handle == slow {
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    }
                    ok_response(route, &handle)
                }
                Upstream::Custom(envelope) => Json(envelope).into_response(),
            }
        }
    })
}

fn ok_response(route: Route, handle: &str) -> Response {
    let result = match route {
        Route::Info => json!([{
            "handle": handle,
            "rating": 2100,
            "maxRating": 2240,
            "rank": "master",
            "maxRank": "international master",
            "contribution": 12
        }]),
        Route::Rating => json!([{
            "contestId": 1,
            "contestName": "Beta Round #1",
            "handle": handle,
            "rank": 57,
            "ratingUpdateTimeSeconds": 1266588000,
            "oldRating": 0,
            "newRating": 1500
        }]),
        Route::Status => json!([{
            "id": 1,
            "contestId": 1,
            "creationTimeSeconds": 1266588000,
            "problem": {
                "contestId": 1,
                "index": "A",
                "name": "Theatre Square",
                "tags": ["math"]
            },
            "programmingLanguage": "GNU C++17",
            "verdict": "OK"
        }]),
    };

    Json(json!({"status": "OK", "result": result})).into_response()
}
