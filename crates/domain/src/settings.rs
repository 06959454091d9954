//! HTTP client settings.

use serde::{Deserialize, Serialize};

/// Settings applied to every outgoing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Whole-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Redirects to follow before giving up; 0 disables following.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// `User-Agent` sent unless the request sets its own.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Accept self-signed or otherwise invalid TLS certificates.
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

const fn default_timeout_ms() -> u64 {
    30_000
}

const fn default_max_redirects() -> usize {
    10
}

fn default_user_agent() -> String {
    format!("Wirepad/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
            accept_invalid_certs: false,
        }
    }
}
