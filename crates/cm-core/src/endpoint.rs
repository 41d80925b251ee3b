use std::fmt;

use serde::{Deserialize, Serialize};

/// Base URL of the snippet web app, e.g. `https://click-memory.vercel.app`.
///
/// Always stored without trailing slashes so paths can be appended directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Endpoint(String);

impl Endpoint {
    pub fn new(url: impl AsRef<str>) -> Self {
        Self(url.as_ref().trim().trim_end_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append an absolute path such as `/api/snippets`.
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl From<String> for Endpoint {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<Endpoint> for String {
    fn from(e: Endpoint) -> Self {
        e.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
