//! The I/O seam: turn an `HttpRequest` into an `HttpResponse`.
//!
//! # Design
//! `ReqwestTransport` opens a client per call with idle pooling disabled, so
//! the connection lives exactly as long as one `execute` and is torn down
//! when the function returns, whichever way it returns. Tests substitute
//! their own `Transport` to answer without a network.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::ExposeSecret;

use crate::error::RequestError;
use crate::http::{HttpRequest, HttpResponse};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, RequestError>;
}

/// HTTP(S) transport backed by a short-lived `reqwest::Client`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestTransport;

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        let headers = header_map(&request.headers)?;

        // Scoped session: dropped at the end of this call.
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .build()?;

        let mut builder = client
            .request(request.method.to_reqwest(), &request.url)
            .headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(auth) = &request.basic_auth {
            builder = builder.basic_auth(&auth.username, Some(auth.password.expose_secret()));
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, RequestError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::try_from(name.as_str())
            .map_err(|e| RequestError::InvalidHeader(format!("{name}: {e}")))?;
        let mut value = HeaderValue::try_from(value.as_str())
            .map_err(|e| RequestError::InvalidHeader(format!("{name}: {e}")))?;
        if name == reqwest::header::AUTHORIZATION {
            value.set_sensitive(true);
        }
        map.insert(name, value);
    }
    Ok(map)
}
