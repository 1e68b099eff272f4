//! Common imports for typical client usage.
//!
//! This module intentionally exports the most frequently used types so
//! examples and application code need fewer import lines.
pub use crate::{
    EventStream, Message, MessageRole, ModelSelection, RetryPolicy, StreamEvent, XaiClient,
    XaiConfig, XaiError,
};
