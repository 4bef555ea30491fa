//! Slash-safe URL composition.
//!
//! Joining never produces `//` or a missing separator at the seam: the left
//! operand loses its trailing slashes, the right operand loses its leading
//! slashes, and exactly one `/` goes between them. Because of that,
//! `root / "a" / "b"` and `root / "a/b"` are the same URL.

use std::fmt;
use std::ops::Div;

/// Join two URL fragments with exactly one `/` between them.
pub fn join_path(left: &str, right: &str) -> String {
    format!(
        "{}/{}",
        left.trim_end_matches('/'),
        right.trim_start_matches('/')
    )
}

/// A URL-like string that only knows how to grow by path segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiUrl(String);

impl ApiUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn join(&self, segment: &str) -> ApiUrl {
        ApiUrl(join_path(&self.0, segment))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Div<&str> for &ApiUrl {
    type Output = ApiUrl;

    fn div(self, segment: &str) -> ApiUrl {
        self.join(segment)
    }
}

impl Div<&str> for ApiUrl {
    type Output = ApiUrl;

    fn div(self, segment: &str) -> ApiUrl {
        self.join(segment)
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ApiUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ApiUrl> for String {
    fn from(url: ApiUrl) -> Self {
        url.0
    }
}
