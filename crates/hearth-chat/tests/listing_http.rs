//! End-to-end tests for the listing controller against an in-process
//! mock backend: debounced fetch coalescing and the exact query the
//! coalesced fetch carries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use hearth_chat::{ListingController, TracingSink};
use hearth_client::ApiClient;
use hearth_core::config::ListingConfig;
use hearth_core::filters::Filters;

#[derive(Clone, Default)]
struct Recorded {
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

async fn properties_handler(
    State(state): State<Recorded>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.queries.lock().unwrap().push(params);
    Json(json!({
        "properties": [{"name": "Birch House", "description": "", "slug": "birch-house"}],
        "pagination": {"page": 1, "limit": 12, "total": 25, "totalPages": 3, "hasNext": true, "hasPrev": false}
    }))
}

async fn spawn_backend(state: Recorded) -> String {
    let app = Router::new()
        .route("/properties", get(properties_handler))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

// Short quiet period so the tests run against real time.
const DEBOUNCE_MS: u64 = 100;

fn make_controller(base: &str) -> Arc<ListingController> {
    let client = ApiClient::new(base, Duration::from_secs(5)).unwrap();
    let config = ListingConfig {
        page_size: 12,
        debounce_ms: DEBOUNCE_MS,
    };
    Arc::new(ListingController::new(
        client,
        Arc::new(TracingSink),
        &config,
    ))
}

/// Long enough for a pending debounce window to elapse and the fetch to
/// complete against the local mock.
async fn let_debounce_settle() {
    tokio::time::sleep(Duration::from_millis(DEBOUNCE_MS * 4)).await;
}

// ---- Coalescing ----

#[tokio::test]
async fn rapid_filter_edits_coalesce_into_one_fetch_with_final_state() {
    let state = Recorded::default();
    let base = spawn_backend(state.clone()).await;
    let controller = make_controller(&base);

    // Three edits in quick succession, all inside the quiet window
    controller.set_filters(Filters {
        bedrooms: Some(1),
        ..Filters::default()
    });
    controller.set_filters(Filters {
        bedrooms: Some(4),
        ..Filters::default()
    });
    controller.set_filters(Filters {
        bedrooms: Some(2),
        location: Some("Brooklyn".to_string()),
        ..Filters::default()
    });

    let_debounce_settle().await;

    // Exactly one request, carrying the last edit's filters
    let queries = state.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    let q = &queries[0];
    assert_eq!(q.get("page").map(String::as_str), Some("1"));
    assert_eq!(q.get("limit").map(String::as_str), Some("12"));
    assert_eq!(q.get("bedrooms").map(String::as_str), Some("2"));
    assert_eq!(q.get("location").map(String::as_str), Some("Brooklyn"));
    assert!(!q.contains_key("price_min"));
    drop(queries);

    // The fetch landed: results and pagination reflect the reply
    assert_eq!(controller.properties().len(), 1);
    assert_eq!(controller.page_info().total, 25);
    assert_eq!(controller.page_info().total_pages, 3);
}

#[tokio::test]
async fn separated_filter_edits_each_fetch() {
    let state = Recorded::default();
    let base = spawn_backend(state.clone()).await;
    let controller = make_controller(&base);

    controller.set_filters(Filters {
        bedrooms: Some(1),
        ..Filters::default()
    });
    let_debounce_settle().await;
    controller.set_filters(Filters {
        bedrooms: Some(2),
        ..Filters::default()
    });
    let_debounce_settle().await;

    let queries = state.queries.lock().unwrap();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0].get("bedrooms").map(String::as_str), Some("1"));
    assert_eq!(queries[1].get("bedrooms").map(String::as_str), Some("2"));
}

// ---- Page changes bypass the debouncer ----

#[tokio::test]
async fn page_change_fetches_immediately() {
    let state = Recorded::default();
    let base = spawn_backend(state.clone()).await;
    let controller = make_controller(&base);

    controller.set_page(3).await;

    // No debounce window: the request has already been recorded
    let queries = state.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].get("page").map(String::as_str), Some("3"));
}

// ---- One-shot path ----

#[tokio::test]
async fn replace_filters_then_set_page_issues_a_single_request() {
    let state = Recorded::default();
    let base = spawn_backend(state.clone()).await;
    let controller = make_controller(&base);

    controller.replace_filters(Filters {
        bedrooms: Some(3),
        ..Filters::default()
    });
    controller.set_page(1).await;
    // Past any would-be debounce window: no second request may appear
    let_debounce_settle().await;

    let queries = state.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].get("bedrooms").map(String::as_str), Some("3"));
}
