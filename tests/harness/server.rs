//! In-process message store for integration testing.
//!
//! Serves the same three endpoints and status codes as the real store
//! (201 for posts and counts, `null` for an empty read) on a random local
//! port, with switches for injecting faults.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
struct Stored {
    id: i64,
    text: String,
}

/// Shared state behind the test store.
#[derive(Debug, Default)]
pub struct StoreState {
    messages: Mutex<Vec<Stored>>,
    /// Acknowledge posts without storing them.
    pub drop_writes: AtomicBool,
    /// Answer every post with 500.
    pub fail_posts: AtomicBool,
    /// Store a fixed placeholder instead of the posted text.
    pub redact_text: AtomicBool,
    /// Answer posts and counts with 201 but a body the client cannot decode.
    pub bad_bodies: AtomicBool,
    /// Answer both reads with 500.
    pub fail_reads: AtomicBool,
    /// Artificial latency added to each post, in milliseconds.
    pub post_delay_ms: AtomicU64,
    posts_received: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl StoreState {
    /// Insert messages directly, bypassing HTTP.
    pub fn preload<I, S>(&self, texts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut messages = self.messages.lock().unwrap();
        for text in texts {
            let id = messages.len() as i64 + 1;
            messages.push(Stored {
                id,
                text: text.into(),
            });
        }
    }

    /// Number of stored messages.
    pub fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    /// Texts of all stored messages, in insertion order.
    pub fn texts(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.text.clone())
            .collect()
    }

    /// Posts received, including dropped and failed ones.
    pub fn posts_received(&self) -> usize {
        self.posts_received.load(Ordering::SeqCst)
    }

    /// Highest number of posts handled at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn set_post_delay(&self, delay: Duration) {
        self.post_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }
}

/// A running test store.
pub struct TestServer {
    state: Arc<StoreState>,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Bind to a random port and start serving.
    pub async fn spawn() -> (Self, SocketAddr) {
        let state = Arc::new(StoreState::default());
        let app = Router::new()
            .route("/messages", get(get_messages).post(post_message))
            .route("/messages/count", get(get_count))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = rx.await;
                })
                .await
                .unwrap();
        });

        (
            Self {
                state,
                shutdown,
                handle,
            },
            addr,
        )
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        let _ = self.handle.await;
    }
}

async fn post_message(State(state): State<Arc<StoreState>>, body: Bytes) -> Response {
    state.posts_received.fetch_add(1, Ordering::SeqCst);
    let current = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    state.peak_in_flight.fetch_max(current, Ordering::SeqCst);

    let delay = state.post_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let response = store_message(&state, &body);
    state.in_flight.fetch_sub(1, Ordering::SeqCst);
    response
}

fn store_message(state: &StoreState, body: &[u8]) -> Response {
    let text = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v.get("text").and_then(Value::as_str).map(str::to_owned))
        .filter(|t| !t.is_empty());

    let Some(text) = text else {
        return (StatusCode::BAD_REQUEST, "Invalid message\n").into_response();
    };

    if state.fail_posts.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to store message\n").into_response();
    }

    if state.bad_bodies.load(Ordering::SeqCst) {
        state.preload([text]);
        return (StatusCode::CREATED, "ok").into_response();
    }

    if state.drop_writes.load(Ordering::SeqCst) {
        // acknowledged but lost
    } else if state.redact_text.load(Ordering::SeqCst) {
        state.preload(["[redacted]"]);
    } else {
        state.preload([text]);
    }

    (
        StatusCode::CREATED,
        Json(json!({"status": "Message received"})),
    )
        .into_response()
}

async fn get_messages(
    State(state): State<Arc<StoreState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if state.fail_reads.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to retrieve messages\n").into_response();
    }

    let Some(offset) = params.get("OFFSET").and_then(|o| o.parse::<usize>().ok()) else {
        return (
            StatusCode::BAD_REQUEST,
            "Invalid OFFSET parameter. Must be an integer.\n",
        )
            .into_response();
    };

    let messages = state.messages.lock().unwrap();
    let page: Vec<Value> = messages
        .iter()
        .skip(offset)
        .map(|m| {
            json!({
                "id": m.id,
                "text": m.text,
                "timestamp": format!("2024-01-01T00:00:00.{:06}Z", m.id),
            })
        })
        .collect();

    if page.is_empty() {
        Json(Value::Null).into_response()
    } else {
        Json(Value::Array(page)).into_response()
    }
}

async fn get_count(State(state): State<Arc<StoreState>>) -> Response {
    if state.fail_reads.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to count messages\n").into_response();
    }
    if state.bad_bodies.load(Ordering::SeqCst) {
        return (StatusCode::CREATED, Json(json!({"count": state.len()}))).into_response();
    }
    (StatusCode::CREATED, Json(json!({"int": state.len()}))).into_response()
}
