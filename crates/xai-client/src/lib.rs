//! Streaming chat-completions client for the X.AI (Grok) API.
//!
//! Each call opens one streaming HTTP request and converts the provider's
//! SSE lines into normalized [`StreamEvent`]s, tolerating malformed or
//! partial frames along the way.
//!
//! # Streaming usage
//!
//! ```no_run
//! use futures::StreamExt as _;
//! use xai_client::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), XaiError> {
//! let client = XaiClient::from_env()?;
//!
//! let mut stream = client
//!     .stream_chat("Answer briefly.", &[Message::user("Say hello")])
//!     .await?;
//!
//! while let Some(event) = stream.next().await {
//!     match event? {
//!         StreamEvent::TextDelta { text } => print!("{text}"),
//!         StreamEvent::UsageTotal { input_tokens, output_tokens } => {
//!             eprintln!("[usage] in={input_tokens} out={output_tokens}");
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

/// Streaming client, request assembly, and the per-call event loop.
pub mod client;
/// Client configuration.
pub mod config;
/// Public error types used by the client API.
pub mod errors;
/// Neutral conversation messages and wire roles.
pub mod message;
/// Known-model catalog and resolution.
pub mod model;
/// Common imports for typical usage.
pub mod prelude;
/// Bounded retry policy for whole streaming calls.
pub mod retry;
/// SSE line decoding and event normalization.
mod sse;
/// Normalized public stream events.
pub mod stream;

pub use client::XaiClient;
pub use config::XaiConfig;
pub use errors::XaiError;
pub use message::{Message, MessageRole};
pub use model::{DEFAULT_MODEL_ID, ModelInfo, ModelSelection, model_info, resolve_model};
pub use retry::RetryPolicy;
pub use stream::{EventStream, StreamEvent};
