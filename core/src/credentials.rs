//! Credentials and everything derived from them.
//!
//! # Design
//! `Credentials` is an immutable value: once the token check passes, every
//! other piece the dispatcher needs (API root, header set, auth mode, client
//! identifier) is computed on demand by a plain method. Nothing is cached,
//! so a shared `&Credentials` is all concurrent callers ever need.

use std::env;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::ConfigurationError;
use crate::url::{join_path, ApiUrl};
use crate::user_agent;

pub const DEFAULT_BASE_URL: &str = "https://api.url";

/// Version prefix appended to every base URL.
pub const API_PREFIX: &str = "api/v1";

pub const ENV_USERNAME: &str = "API_USERNAME";
pub const ENV_TOKEN: &str = "API_TOKEN";
pub const ENV_BASE_URL: &str = "API_BASE_URL";

/// Which mechanism carries the secret on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Transport-level basic auth with the token as password. No
    /// `Authorization: Bearer` header.
    Basic,
    /// `Authorization: Bearer <token>` header, no basic auth.
    Bearer,
}

/// Raw, unvalidated credential input as it comes out of a config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Identity and endpoint for the API.
#[derive(Debug, Clone)]
pub struct Credentials {
    username: Option<String>,
    token: SecretString,
    base_url: String,
}

impl Credentials {
    /// Build credentials, rejecting a missing or blank token.
    ///
    /// An empty username is treated as no username. `base_url` defaults to
    /// [`DEFAULT_BASE_URL`].
    pub fn new(
        username: Option<String>,
        token: impl Into<String>,
        base_url: Option<String>,
    ) -> Result<Self, ConfigurationError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigurationError::MissingToken);
        }
        Ok(Self {
            username: username.filter(|u| !u.is_empty()),
            token: SecretString::from(token),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    /// Token-only credentials against the default base URL.
    pub fn bearer(token: impl Into<String>) -> Result<Self, ConfigurationError> {
        Self::new(None, token, None)
    }

    /// Username + token credentials against the default base URL.
    pub fn basic(
        username: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        Self::new(Some(username.into()), token, None)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Read `API_USERNAME`, `API_TOKEN` and `API_BASE_URL` from the process
    /// environment.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let username = read_env(ENV_USERNAME)?;
        let token = read_env(ENV_TOKEN)?.ok_or(ConfigurationError::MissingToken)?;
        let base_url = read_env(ENV_BASE_URL)?.filter(|u| !u.is_empty());
        Self::new(username, token, base_url)
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base_url` joined with [`API_PREFIX`].
    pub fn api_url(&self) -> ApiUrl {
        ApiUrl::new(join_path(&self.base_url, API_PREFIX))
    }

    /// A fresh synthetic client identifier. Different on every call.
    pub fn user_agent(&self) -> String {
        user_agent::generate()
    }

    /// Basic when a username is present, bearer otherwise. The token is
    /// guaranteed non-empty by construction.
    pub fn auth_mode(&self) -> AuthMode {
        if self.username.is_some() {
            AuthMode::Basic
        } else {
            AuthMode::Bearer
        }
    }

    /// Header set for a request. `Authorization` is present iff `bearer`.
    pub fn headers(&self, bearer: bool) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
            ("User-Agent".to_string(), self.user_agent()),
        ];
        if bearer {
            headers.push((
                "Authorization".to_string(),
                format!("Bearer {}", self.token.expose_secret()),
            ));
        }
        headers
    }
}

impl TryFrom<CredentialsConfig> for Credentials {
    type Error = ConfigurationError;

    fn try_from(config: CredentialsConfig) -> Result<Self, Self::Error> {
        let token = config.token.ok_or(ConfigurationError::MissingToken)?;
        Self::new(config.username, token, config.base_url)
    }
}

fn read_env(name: &str) -> Result<Option<String>, ConfigurationError> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigurationError::InvalidEnv {
            name: name.to_string(),
        }),
    }
}
