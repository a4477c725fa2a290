#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use skinsight_api::config::ServerConfig;
use skinsight_api::router::build_app_router;
use skinsight_api::state::AppState;
use skinsight_core::types::AnalysisMode;
use skinsight_vision::{Credentials, GatewayError, UpstreamError, VisionGateway};
use tower::ServiceExt;

pub const BOUNDARY: &str = "skinsight-test-boundary";

/// Smallest byte string the format sniffer recognises as PNG.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        face_api: Credentials::new("test-key-0123456789", "test-secret-0123456789"),
        face_api_base_url: "http://127.0.0.1:9".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Fake gateway
// ---------------------------------------------------------------------------

/// What the fake gateway answers with.
#[derive(Debug, Clone)]
pub enum FakeReply {
    Payload(Value),
    Upstream(UpstreamError),
    Misconfigured,
}

/// In-process stand-in for the vision API. Counts calls and records the
/// mode of the last one.
pub struct FakeGateway {
    reply: FakeReply,
    calls: AtomicUsize,
    last_mode: std::sync::Mutex<Option<AnalysisMode>>,
}

impl FakeGateway {
    pub fn new(reply: FakeReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            last_mode: std::sync::Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_mode(&self) -> Option<AnalysisMode> {
        *self.last_mode.lock().unwrap()
    }
}

#[async_trait]
impl VisionGateway for FakeGateway {
    async fn analyze(&self, _image: &[u8], mode: AnalysisMode) -> Result<Value, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_mode.lock().unwrap() = Some(mode);
        match &self.reply {
            FakeReply::Payload(v) => Ok(v.clone()),
            FakeReply::Upstream(e) => Err(GatewayError::Upstream(*e)),
            FakeReply::Misconfigured => Err(GatewayError::Misconfigured(
                "Invalid Face++ API credentials format. Please check your environment variables."
                    .into(),
            )),
        }
    }

    fn is_configured(&self) -> bool {
        !matches!(self.reply, FakeReply::Misconfigured)
    }
}

// ---------------------------------------------------------------------------
// App + request helpers
// ---------------------------------------------------------------------------

/// Build the full application router (same middleware stack as production)
/// around the given gateway.
pub fn build_test_app(gateway: Arc<FakeGateway>) -> Router {
    let state = AppState { gateway };
    build_app_router(state, &test_config())
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a multipart form with one file part named `field`.
pub async fn post_image(
    app: Router,
    uri: &str,
    field: &str,
    content_type: &str,
    bytes: &[u8],
) -> Response {
    let mut body = Vec::with_capacity(bytes.len() + 256);
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"face\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST an arbitrary body with the given content type.
pub async fn post_raw(app: Router, uri: &str, content_type: &str, body: &'static str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
