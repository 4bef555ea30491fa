//! Authenticated request dispatch.
//!
//! # Design
//! `RequestManager` holds `Credentials` and a `Transport` and carries no
//! mutable state between calls. Each call is split in three:
//! `build_request` resolves the URL and makes the auth decision,
//! the transport performs the round-trip, and `parse_response` decodes the
//! body. `request` and `send` chain them for callers that want a single
//! awaitable.

use serde_json::Value;
use tracing::{debug, instrument, Span};

use crate::credentials::{AuthMode, Credentials};
use crate::error::RequestError;
use crate::http::{ApiRequest, BasicAuth, HttpMethod, HttpRequest, HttpResponse, QueryParams};
use crate::transport::{ReqwestTransport, Transport};

/// Issues one authenticated JSON request per call.
#[derive(Debug, Clone)]
pub struct RequestManager<T = ReqwestTransport> {
    credentials: Credentials,
    transport: T,
}

impl RequestManager<ReqwestTransport> {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_transport(credentials, ReqwestTransport)
    }
}

impl<T: Transport> RequestManager<T> {
    pub fn with_transport(credentials: Credentials, transport: T) -> Self {
        Self {
            credentials,
            transport,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Resolve URL, headers, and auth for one call without touching the
    /// network.
    pub fn build_request(&self, request: &ApiRequest) -> HttpRequest {
        let url = self
            .credentials
            .api_url()
            .join(request.endpoint.trim_start_matches('/'));

        let basic_auth = match (self.credentials.auth_mode(), self.credentials.username()) {
            (AuthMode::Basic, Some(username)) => Some(BasicAuth {
                username: username.to_string(),
                password: self.credentials.token().clone(),
            }),
            _ => None,
        };
        let headers = self.credentials.headers(basic_auth.is_none());

        let query = request
            .params
            .iter()
            .flatten()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        HttpRequest {
            method: request.method,
            url: url.into(),
            headers,
            query,
            basic_auth,
        }
    }

    /// Decode the whole body as JSON. The status code is not inspected.
    ///
    /// An empty or whitespace-only body (HEAD, 204) decodes to `Value::Null`.
    /// Bytes that are not valid UTF-8 are a decode error.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, RequestError> {
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&response.body).map_err(|source| RequestError::Decode {
            status: response.status,
            source,
        })
    }

    /// Perform `request` and return the decoded JSON body.
    ///
    /// `method` is matched case-insensitively; an unrecognised verb is sent
    /// as GET.
    pub async fn request(
        &self,
        endpoint: &str,
        method: &str,
        params: Option<&QueryParams>,
    ) -> Result<Value, RequestError> {
        self.send(ApiRequest {
            endpoint: endpoint.to_string(),
            method: HttpMethod::from_name_or_get(method),
            params: params.cloned(),
        })
        .await
    }

    pub async fn get(&self, endpoint: &str) -> Result<Value, RequestError> {
        self.send(ApiRequest::get(endpoint)).await
    }

    #[instrument(
        name = "api_request",
        skip(self, request),
        fields(
            http.method = %request.method,
            http.url = tracing::field::Empty,
            auth = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
        )
    )]
    pub async fn send(&self, request: ApiRequest) -> Result<Value, RequestError> {
        let http_request = self.build_request(&request);
        let span = Span::current();
        span.record("http.url", http_request.url.as_str());
        span.record(
            "auth",
            if http_request.basic_auth.is_some() {
                "basic"
            } else {
                "bearer"
            },
        );
        debug!("request resolved");

        let response = self.transport.execute(http_request).await.map_err(|e| {
            debug!(error = %e, "transport failed");
            e
        })?;
        span.record("http.status_code", response.status);
        debug!("response received");

        self.parse_response(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use secrecy::ExposeSecret;
    use serde_json::json;

    use super::*;

    /// Answers every request with a fixed body and remembers what it saw.
    struct EchoTransport {
        status: u16,
        body: Vec<u8>,
        seen: Mutex<Vec<HttpRequest>>,
        calls: AtomicUsize,
    }

    impl EchoTransport {
        fn new(status: u16, body: &[u8]) -> Self {
            Self {
                status,
                body: body.to_vec(),
                seen: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }

        fn last(&self) -> HttpRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl Transport for EchoTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(request);
            Ok(HttpResponse {
                status: self.status,
                headers: Vec::new(),
                body: self.body.clone(),
            })
        }
    }

    fn bearer_client() -> RequestManager<EchoTransport> {
        let creds = Credentials::new(None, "T", Some("https://api.url/".to_string())).unwrap();
        RequestManager::with_transport(creds, EchoTransport::new(200, br#"{"ok":true}"#))
    }

    fn basic_client() -> RequestManager<EchoTransport> {
        let creds = Credentials::basic("alice", "T").unwrap();
        RequestManager::with_transport(creds, EchoTransport::new(200, br#"{"ok":true}"#))
    }

    #[test]
    fn build_request_targets_api_root() {
        let req = bearer_client().build_request(&ApiRequest::get("users/1"));
        assert_eq!(req.url, "https://api.url/api/v1/users/1");
        assert_eq!(req.method, HttpMethod::Get);
        assert!(req.query.is_empty());
    }

    #[test]
    fn build_request_strips_leading_slashes_from_endpoint() {
        let client = bearer_client();
        for endpoint in ["users", "/users", "//users", "///users"] {
            let req = client.build_request(&ApiRequest::get(endpoint));
            assert_eq!(req.url, "https://api.url/api/v1/users", "{endpoint}");
        }
    }

    #[test]
    fn bearer_mode_sets_header_and_no_basic_auth() {
        let req = bearer_client().build_request(&ApiRequest::get("x"));
        assert!(req.basic_auth.is_none());
        assert_eq!(req.header("Authorization"), Some("Bearer T"));
    }

    #[test]
    fn basic_mode_sets_basic_auth_and_no_header() {
        let req = basic_client().build_request(&ApiRequest::get("x"));
        let auth = req.basic_auth.as_ref().unwrap();
        assert_eq!(auth.username, "alice");
        assert_eq!(auth.password.expose_secret(), "T");
        assert_eq!(req.header("Authorization"), None);
        assert!(req.header("User-Agent").is_some());
    }

    #[test]
    fn build_request_carries_params_in_order() {
        let api_request = ApiRequest::new("search", HttpMethod::Post)
            .param("q", "rust")
            .param("page", "2");
        let req = bearer_client().build_request(&api_request);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(
            req.query,
            vec![
                ("page".to_string(), "2".to_string()),
                ("q".to_string(), "rust".to_string()),
            ]
        );
    }

    #[test]
    fn parse_response_returns_value_verbatim() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: br#"[1, "two", {"three": 3}]"#.to_vec(),
        };
        let value = bearer_client().parse_response(response).unwrap();
        assert_eq!(value, json!([1, "two", {"three": 3}]));
    }

    #[test]
    fn parse_response_ignores_status() {
        let response = HttpResponse {
            status: 404,
            headers: Vec::new(),
            body: br#"{"error":"not found"}"#.to_vec(),
        };
        let value = bearer_client().parse_response(response).unwrap();
        assert_eq!(value["error"], "not found");
    }

    #[test]
    fn parse_response_bad_json() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: b"<html>".to_vec(),
        };
        let err = bearer_client().parse_response(response).unwrap_err();
        assert!(matches!(err, RequestError::Decode { status: 200, .. }));
    }

    #[test]
    fn parse_response_rejects_invalid_utf8() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: b"\"\xff\xfe\"".to_vec(),
        };
        let err = bearer_client().parse_response(response).unwrap_err();
        assert!(matches!(err, RequestError::Decode { status: 200, .. }));
    }

    #[test]
    fn parse_response_empty_body_is_null() {
        for body in [&b""[..], &b"  \r\n"[..]] {
            let response = HttpResponse {
                status: 204,
                headers: Vec::new(),
                body: body.to_vec(),
            };
            assert_eq!(bearer_client().parse_response(response).unwrap(), Value::Null);
        }
    }

    #[tokio::test]
    async fn request_returns_echoed_object_every_time() {
        let client = bearer_client();
        let first = client.request("x", "GET", None).await.unwrap();
        let second = client.request("x", "GET", None).await.unwrap();
        assert_eq!(first, json!({"ok": true}));
        assert_eq!(first, second);
        assert_eq!(client.transport.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn request_unknown_method_is_sent_as_get() {
        let client = bearer_client();
        client.request("x", "XPATCH", None).await.unwrap();
        assert_eq!(client.transport.last().method, HttpMethod::Get);
    }

    #[tokio::test]
    async fn request_method_is_case_insensitive() {
        let client = basic_client();
        client.request("x", "delete", None).await.unwrap();
        assert_eq!(client.transport.last().method, HttpMethod::Delete);
    }

    #[tokio::test]
    async fn request_passes_params_through() {
        let client = bearer_client();
        let mut params = QueryParams::new();
        params.insert("limit".to_string(), "5".to_string());
        client.request("/items", "get", Some(&params)).await.unwrap();
        let seen = client.transport.last();
        assert_eq!(seen.url, "https://api.url/api/v1/items");
        assert_eq!(seen.query, vec![("limit".to_string(), "5".to_string())]);
    }

    #[tokio::test]
    async fn request_head_returns_null() {
        let creds = Credentials::bearer("T").unwrap();
        let client = RequestManager::with_transport(creds, EchoTransport::new(200, b""));
        let value = client.request("x", "HEAD", None).await.unwrap();
        assert_eq!(value, Value::Null);
        assert_eq!(client.transport.last().method, HttpMethod::Head);
    }

    #[tokio::test]
    async fn request_surfaces_decode_failure() {
        let creds = Credentials::bearer("T").unwrap();
        let client = RequestManager::with_transport(creds, EchoTransport::new(500, b"oops"));
        let err = client.get("x").await.unwrap_err();
        assert!(matches!(err, RequestError::Decode { status: 500, .. }));
    }
}
