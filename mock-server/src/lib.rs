//! Echo server for exercising the API client over real HTTP.
//!
//! Every route lives under `/api/v1`. The catch-all route reflects the
//! request back as JSON (method, path, query, decorative headers, and the
//! auth scheme it detected) so tests can assert on what actually went over
//! the wire.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query},
    http::{header, HeaderMap, Method, StatusCode},
    routing::any,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

pub mod logging;

/// What the server saw, returned by the echo route.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub request_id: Uuid,
    pub method: String,
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub content_type: Option<String>,
    pub accept: Option<String>,
    pub user_agent: Option<String>,
    pub auth: EchoAuth,
}

/// Authorization scheme detected on an incoming request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "lowercase")]
pub enum EchoAuth {
    None,
    Bearer { token: String },
    Basic { username: String, password: String },
    Other { value: String },
}

/// Body served by `/api/v1/fixture`.
pub fn fixture() -> Value {
    json!({
        "id": 42,
        "name": "fixture",
        "tags": ["alpha", "beta"],
        "nested": { "enabled": true, "ratio": 0.5 },
        "missing": null
    })
}

pub fn app() -> Router {
    Router::new()
        .route("/api/v1/fixture", any(serve_fixture))
        .route("/api/v1/not-json", any(serve_not_json))
        .route("/api/v1/status/{code}", any(serve_status))
        .route("/api/v1/{*path}", any(echo))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn serve_fixture() -> Json<Value> {
    Json(fixture())
}

async fn serve_not_json() -> (StatusCode, &'static str) {
    (StatusCode::OK, "this is not json")
}

async fn serve_status(Path(code): Path<u16>) -> (StatusCode, Json<Value>) {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    let body = json!({
        "status": status.as_u16(),
        "error": status.canonical_reason().unwrap_or("unknown"),
    });
    (status, Json(body))
}

async fn echo(
    method: Method,
    Path(path): Path<String>,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
) -> Json<Echo> {
    let echo = Echo {
        request_id: Uuid::new_v4(),
        method: method.to_string(),
        path,
        query,
        content_type: header_str(&headers, header::CONTENT_TYPE),
        accept: header_str(&headers, header::ACCEPT),
        user_agent: header_str(&headers, header::USER_AGENT),
        auth: detect_auth(&headers),
    };
    tracing::debug!(
        request_id = %echo.request_id,
        method = %echo.method,
        path = %echo.path,
        "echoing request"
    );
    Json(echo)
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn detect_auth(headers: &HeaderMap) -> EchoAuth {
    let Some(value) = header_str(headers, header::AUTHORIZATION) else {
        return EchoAuth::None;
    };
    if let Some(token) = value.strip_prefix("Bearer ") {
        return EchoAuth::Bearer {
            token: token.to_string(),
        };
    }
    if let Some(encoded) = value.strip_prefix("Basic ") {
        let decoded = STANDARD
            .decode(encoded)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok());
        if let Some((username, password)) = decoded.as_deref().and_then(|s| s.split_once(':')) {
            return EchoAuth::Basic {
                username: username.to_string(),
                password: password.to_string(),
            };
        }
    }
    EchoAuth::Other { value }
}
