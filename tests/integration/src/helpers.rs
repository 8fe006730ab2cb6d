//! Test helpers for integration tests
//!
//! Provides a fake streaming server that records every command and note the
//! agent sends, and can push frames to (or drop) the agent's connection.

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tally_common::AppConfig;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Token the agent is configured with in tests
pub const TEST_TOKEN: &str = "test-token";

#[derive(Debug, Clone)]
enum Push {
    Frame(String),
    Close,
}

#[derive(Debug)]
struct FakeState {
    commands: Mutex<Vec<Value>>,
    notes: Mutex<Vec<Value>>,
    tokens: Mutex<Vec<String>>,
    connections: AtomicUsize,
    note_status: AtomicU16,
    push: broadcast::Sender<Push>,
}

/// Fake instance exposing `/streaming` and `/api/notes/create`
pub struct FakeServer {
    pub addr: SocketAddr,
    state: Arc<FakeState>,
    _handle: JoinHandle<()>,
}

impl FakeServer {
    /// Start a fake server on an ephemeral port
    pub async fn start() -> Result<Self> {
        let (push, _) = broadcast::channel(8192);
        let state = Arc::new(FakeState {
            commands: Mutex::new(Vec::new()),
            notes: Mutex::new(Vec::new()),
            tokens: Mutex::new(Vec::new()),
            connections: AtomicUsize::new(0),
            note_status: AtomicU16::new(200),
            push,
        });

        let app = Router::new()
            .route("/streaming", get(streaming_handler))
            .route("/api/notes/create", post(create_note_handler))
            .with_state(state.clone());

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            state,
            _handle: handle,
        })
    }

    /// Agent configuration pointing at this server
    pub fn config(&self, extra: &[(&str, &str)]) -> Result<AppConfig> {
        let domain = self.addr.to_string();
        let mut vars: HashMap<String, String> = [
            ("INSTANCE_DOMAIN", domain.as_str()),
            ("INSTANCE_SECURE", "false"),
            ("TOKEN", TEST_TOKEN),
            ("TARGET_EMOJIS", "fire star"),
            ("REPORT_TEMPLATE", "count={count}"),
            ("REPORT_INTERVAL_SECS", "2"),
            ("RECONNECT_DELAY_MS", "50"),
        ]
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();

        for (k, v) in extra {
            vars.insert((*k).to_string(), (*v).to_string());
        }

        AppConfig::from_lookup(|key| vars.get(key).cloned())
            .map_err(|e| anyhow::anyhow!("Config error: {e}"))
    }

    /// Push a text frame to every connected client
    pub fn push(&self, frame: String) {
        let _ = self.state.push.send(Push::Frame(frame));
    }

    /// Close every connected client's socket
    pub fn drop_connections(&self) {
        let _ = self.state.push.send(Push::Close);
    }

    /// Status code returned by `api/notes/create`
    pub fn set_note_status(&self, status: u16) {
        self.state.note_status.store(status, Ordering::SeqCst);
    }

    /// Commands received so far, in order
    pub fn commands(&self) -> Vec<Value> {
        self.state.commands.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Note creation request bodies received so far
    pub fn notes(&self) -> Vec<Value> {
        self.state.notes.lock().map(|n| n.clone()).unwrap_or_default()
    }

    /// Token query parameters seen on `/streaming`
    pub fn tokens(&self) -> Vec<String> {
        self.state.tokens.lock().map(|t| t.clone()).unwrap_or_default()
    }

    /// Number of streaming connections accepted so far
    pub fn connections(&self) -> usize {
        self.state.connections.load(Ordering::SeqCst)
    }
}

async fn streaming_handler(
    State(state): State<Arc<FakeState>>,
    Query(params): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    if let (Some(token), Ok(mut tokens)) = (params.get("i"), state.tokens.lock()) {
        tokens.push(token.clone());
    }
    ws.on_upgrade(move |socket| handle_socket(state, socket))
}

async fn handle_socket(state: Arc<FakeState>, socket: WebSocket) {
    let mut push_rx = state.push.subscribe();
    state.connections.fetch_add(1, Ordering::SeqCst);

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let (Ok(value), Ok(mut commands)) =
                            (serde_json::from_str::<Value>(&text), state.commands.lock())
                        {
                            commands.push(value);
                        }
                    }
                    Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }

            push = push_rx.recv() => {
                match push {
                    Ok(Push::Frame(frame)) => {
                        if sink.send(Message::Text(frame)).await.is_err() {
                            break;
                        }
                    }
                    Ok(Push::Close) => {
                        let _ = sink.send(Message::Close(None)).await;
                        break;
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }
}

async fn create_note_handler(
    State(state): State<Arc<FakeState>>,
    Json(body): Json<Value>,
) -> StatusCode {
    if let Ok(mut notes) = state.notes.lock() {
        notes.push(body);
    }
    StatusCode::from_u16(state.note_status.load(Ordering::SeqCst))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Poll `check` until it returns true or `timeout` elapses
pub async fn wait_until<F>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}

/// Spawn the agent against a fake server configuration
pub fn spawn_agent<F>(run: F) -> JoinHandle<()>
where
    F: Future<Output = tally_common::AppResult<()>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = run.await {
            eprintln!("agent stopped: {e}");
        }
    })
}
