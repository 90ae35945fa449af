use serde::Deserialize;
use std::time::Duration;

/// Settings for [`crate::CurriculumClient`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme and host of the API, without trailing slash.
    pub base_url: String,

    /// Items requested per page.
    pub page_size: usize,

    /// Hard stop for `next` chains.
    pub max_pages: usize,

    pub timeout_ms: u64,

    pub user_agent: String,

    /// Sent as a bearer token when set.
    pub access_token: Option<String>,
}

impl ClientConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.udemy.com".to_string(),
            page_size: 200,
            max_pages: 100,
            timeout_ms: 30_000,
            user_agent: concat!("lecture-dates/", env!("CARGO_PKG_VERSION")).to_string(),
            access_token: None,
        }
    }
}
