use std::time::Duration;

/// Base URL of the Freebase-compatible JSON API.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/freebase/v1";

/// Configuration for [`HttpKnowledgeBase`](crate::HttpKnowledgeBase).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KbConfig {
    /// API root; `/mqlread`, `/search` and `/topic` are appended.
    pub base_url: String,
    /// Sent as the `key` query parameter when set.
    pub api_key: Option<String>,
    /// Language requested for search results and topic text.
    pub language: String,
    /// Transport timeout per request. `None` disables it.
    pub timeout: Option<Duration>,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for KbConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            language: "en".to_string(),
            timeout: Some(Duration::from_secs(30)),
            user_agent: concat!("mediaminer/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl KbConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.is_empty());
        self
    }

    /// Set the result language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the transport timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}
