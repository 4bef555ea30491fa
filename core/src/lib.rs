//! Authenticated JSON API client core.
//!
//! # Overview
//! `Credentials` hold the username, token, and base URL and derive the API
//! root, header set, and auth mode. `RequestManager` turns one endpoint call
//! into one HTTP request and returns the decoded JSON body.
//!
//! # Design
//! - `Credentials` are immutable; everything else is derived per call.
//! - Each call is split into `build_request` (plain data, no I/O), a
//!   `Transport` round-trip, and `parse_response`, so the I/O boundary is
//!   explicit and swappable in tests.
//! - Exactly one of basic auth and a bearer header carries the token.
//! - No retries, pooling, or caching: one connection per call.
//!
//! ```rust,ignore
//! use apiauth_core::{Credentials, RequestManager};
//!
//! let creds = Credentials::bearer("token")?.with_base_url("https://api.example.com");
//! let user = RequestManager::new(creds).get("users/1").await?;
//! ```

pub mod client;
pub mod credentials;
pub mod error;
pub mod http;
pub mod transport;
pub mod url;
pub mod user_agent;

pub use client::RequestManager;
pub use credentials::{AuthMode, Credentials, CredentialsConfig, API_PREFIX, DEFAULT_BASE_URL};
pub use error::{ApiError, ConfigurationError, RequestError};
pub use http::{ApiRequest, BasicAuth, HttpMethod, HttpRequest, HttpResponse, QueryParams};
pub use transport::{ReqwestTransport, Transport};
pub use url::{join_path, ApiUrl};
