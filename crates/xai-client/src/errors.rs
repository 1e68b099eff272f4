/// Errors returned by the X.AI streaming client.
///
/// Only call-aborting conditions surface here; malformed SSE lines are
/// recovered inside the decoder and never reach the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum XaiError {
    /// No API key was supplied. Raised before any network activity.
    #[error("X.AI API key is required")]
    MissingApiKey,
    /// Provider returned a non-success HTTP status.
    ///
    /// `message` carries the status line plus the provider's own error
    /// message when one could be extracted from the response body.
    #[error("X.AI API error: {message}")]
    Http { status: u16, message: String },
    /// Successful status but the response carried no event-stream body.
    #[error("X.AI API returned no streaming response body")]
    NoResponseBody,
    /// Network failure while connecting or reading the stream. Events
    /// already emitted before the failure remain valid.
    #[error("transport error: {message}")]
    Transport { message: String },
    /// Invalid client configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl XaiError {
    /// Creates an HTTP-status error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a transport-level error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Whether an external retry policy may reattempt the whole call.
    ///
    /// Rate limiting and server-side failures are retryable, as are
    /// transport drops; precondition and configuration failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => *status == 429 || (500..600).contains(status),
            Self::Transport { .. } => true,
            Self::MissingApiKey | Self::NoResponseBody | Self::Config(_) => false,
        }
    }
}
