use std::time::Duration;

use crate::errors::XaiError;

/// Configuration for the X.AI streaming client.
#[derive(Clone, Debug)]
pub struct XaiConfig {
    /// API key used for bearer auth.
    pub api_key: String,
    /// Base URL for the X.AI API.
    ///
    /// Useful for proxies or local test servers.
    pub base_url: String,
    /// Connect timeout for the underlying HTTP client.
    ///
    /// No deadline is applied to an open stream; callers compose their own
    /// around the whole call.
    pub connect_timeout: Duration,
    /// Requested model id. Absent or unknown ids resolve to the default.
    pub model: Option<String>,
}

impl XaiConfig {
    /// Creates a config with sensible defaults and a provided API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.x.ai".to_string(),
            connect_timeout: Duration::from_secs(30),
            model: None,
        }
    }

    /// Builds a config from `XAI_API_KEY`.
    pub fn from_env() -> Result<Self, XaiError> {
        let api_key = std::env::var("XAI_API_KEY").unwrap_or_default();
        if api_key.trim().is_empty() {
            return Err(XaiError::Config("missing XAI_API_KEY for X.AI client".into()));
        }
        Ok(Self::new(api_key))
    }

    /// Overrides the API base URL (for proxies or test servers).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the requested model id.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub(crate) fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }
}
