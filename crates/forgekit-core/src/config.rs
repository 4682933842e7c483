//! Client configuration types
//!
//! These types define configuration that controls client behavior like
//! the API endpoint, authentication, timeouts, and fork polling.

use serde::{Deserialize, Serialize};

use crate::poll::PollPolicy;

/// Complete client configuration
///
/// Constructed once and handed to the client; fields left unset fall back
/// to the documented defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ForgeConfig {
    /// Base URL for the forge API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Personal access token, sent as `Authorization: token <t>` when set
    #[serde(default)]
    pub token: Option<String>,

    /// Login of the authenticated user; forks land in this namespace
    #[serde(default)]
    pub username: Option<String>,

    /// HTTP timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Timeout override for the fork creation request, in milliseconds
    #[serde(default = "default_fork_timeout")]
    pub fork_timeout_ms: u64,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Polling policy for fork visibility
    #[serde(default)]
    pub fork_poll: PollPolicy,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: None,
            username: None,
            http_timeout_secs: default_http_timeout(),
            fork_timeout_ms: default_fork_timeout(),
            user_agent: default_user_agent(),
            fork_poll: PollPolicy::default(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}
fn default_http_timeout() -> u64 {
    30
}
fn default_fork_timeout() -> u64 {
    5000 // 5 seconds
}
fn default_user_agent() -> String {
    format!(
        "forgekit/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
