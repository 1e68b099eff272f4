use std::pin::Pin;

use crate::errors::XaiError;

/// Normalized events produced by a chat completion stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental fragment of assistant text; concatenate in arrival order.
    TextDelta { text: String },
    /// Token totals as reported by the provider. Fields the provider omits
    /// read as zero, which is indistinguishable from a reported zero.
    ///
    /// May arrive zero or more times per call, including after text deltas.
    UsageTotal { input_tokens: u32, output_tokens: u32 },
}

/// Pinned, boxed stream of normalized events for one call.
///
/// Yields events in byte-arrival order until the provider closes the stream
/// or a terminal error occurs. Dropping it releases the connection.
pub type EventStream =
    Pin<Box<dyn futures::Stream<Item = Result<StreamEvent, XaiError>> + Send + 'static>>;
