//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for building and sending requests through the full axum router,
//! plus a capture server that stands in for the Slack incoming webhook.
//!
//! ## Log Capture
//!
//! Use [`LogCapture::install()`] to route this thread's `tracing` output into a JSON
//! buffer that tests can inspect.
//!
//! ## Capture Server
//!
//! Use [`spawn_capture_server()`] to get a real HTTP endpoint on a random port that
//! records every JSON body POSTed to it and answers with a fixed status.
#![allow(dead_code)]

use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use alert_relay::api::{create_router, AppState};
use alert_relay::config::Config;
use alert_relay::relay::signing;
use axum::body::Body;
use axum::extract::State;
use axum::http::{self, Method, Request, Response, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use http_body_util::BodyExt;
use tokio::task::JoinHandle;
use tower::ServiceExt;

// ============================================================================
// Test App
// ============================================================================

/// Router plus the configuration it was built from.
pub struct TestApp {
    pub router: Router,
    pub config: Config,
}

impl TestApp {
    /// Build a [`TestApp`] from [`Config::default_for_test`].
    pub fn new() -> Self {
        Self::with_config(Config::default_for_test())
    }

    /// Build a [`TestApp`] that delivers to the given Slack URL.
    pub fn delivering_to(url: &str) -> Self {
        let mut config = Config::default_for_test();
        config.slack_webhook_url = url.to_string();
        Self::with_config(config)
    }

    /// Build a [`TestApp`] from an explicit config.
    pub fn with_config(config: Config) -> Self {
        let state = AppState::new(config.clone()).expect("Failed to build app state");
        Self {
            router: create_router(state),
            config,
        }
    }

    /// Build an HTTP request with the given method and URI.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// Build a POST to `/webhook` signed with the configured secret.
    pub fn signed_webhook(&self, body: &str) -> Request<Body> {
        let secret = self
            .config
            .webhook_secret
            .as_deref()
            .expect("test config has no secret");
        Self::request(Method::POST, "/webhook")
            .header("content-type", "application/json")
            .header(signing::SIGNATURE_HEADER, signing::sign_payload(secret, body.as_bytes()))
            .header("x-github-event", "code_scanning_alert")
            .header("x-github-delivery", "72d3162e-cc78-11e3-81ab-4c9367dc0958")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }
}

// ============================================================================
// Capture Server
// ============================================================================

/// A running HTTP server recording the JSON bodies it receives.
pub struct CaptureServer {
    /// Server address (127.0.0.1:PORT).
    pub addr: SocketAddr,
    /// Hook URL to configure as the Slack destination.
    pub url: String,
    received: Arc<Mutex<Vec<serde_json::Value>>>,
    /// Handle to the server task for cleanup.
    _handle: JoinHandle<()>,
}

impl CaptureServer {
    /// Bodies received so far, in arrival order.
    pub fn received(&self) -> Vec<serde_json::Value> {
        self.received.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct CaptureState {
    received: Arc<Mutex<Vec<serde_json::Value>>>,
    status: StatusCode,
}

async fn capture(
    State(state): State<CaptureState>,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, &'static str) {
    state.received.lock().unwrap().push(body);
    let reply = if state.status.is_success() {
        "ok"
    } else {
        "invalid_payload"
    };
    (state.status, reply)
}

/// Spawn a capture server on a random port answering with `status`.
pub async fn spawn_capture_server(status: StatusCode) -> CaptureServer {
    let received = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new()
        .route("/hooks/slack", post(capture))
        .with_state(CaptureState {
            received: received.clone(),
            status,
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind capture server");
    let addr = listener.local_addr().expect("Failed to get local addr");
    let url = format!("http://{addr}/hooks/slack");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Capture server failed");
    });

    CaptureServer {
        addr,
        url,
        received,
        _handle: handle,
    }
}

// ============================================================================
// Body helpers
// ============================================================================

/// Collect a response body as UTF-8 text.
pub async fn body_to_string(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect response body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("Response body is not UTF-8")
}

/// Collect a response body and parse it as JSON.
pub async fn body_to_json(response: Response<Body>) -> serde_json::Value {
    let text = body_to_string(response).await;
    serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("Failed to parse response as JSON: {e}\nBody: {text}"))
}

// ============================================================================
// Payloads
// ============================================================================

/// A critical SQL injection alert.
pub fn critical_alert_payload() -> String {
    serde_json::json!({
        "action": "created",
        "alert": {
            "severity": "critical",
            "most_recent_instance": {
                "rule": {"description": "SQL Injection"},
                "location": {"path": "app.js", "start_line": 42}
            },
            "html_url": "https://x/y"
        },
        "repository": {"full_name": "org/repo"}
    })
    .to_string()
}

/// An alert payload with the given severity label.
pub fn alert_payload_with_severity(severity: &str) -> String {
    serde_json::json!({
        "action": "appeared_in_branch",
        "alert": {
            "severity": severity,
            "most_recent_instance": {
                "rule": {"description": "Uncontrolled format string"},
                "location": {"path": "src/log.c", "start_line": 7}
            },
            "html_url": "https://github.com/org/repo/security/code-scanning/3"
        },
        "repository": {"full_name": "org/repo"}
    })
    .to_string()
}

// ============================================================================
// Log Capture
// ============================================================================

/// In-memory `tracing` sink recording JSON-formatted events.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogCapture {
    /// Install as the default subscriber for the current thread.
    ///
    /// Tests must run on a current-thread runtime so the handler logs here.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Every captured event, one JSON object per line.
    pub fn events(&self) -> Vec<serde_json::Value> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8_lossy(&bytes)
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).expect("Log line is not JSON"))
            .collect()
    }

    /// Captured events whose message equals `message`.
    pub fn events_with_message(&self, message: &str) -> Vec<serde_json::Value> {
        self.events()
            .into_iter()
            .filter(|e| e["fields"]["message"] == message)
            .collect()
    }
}
