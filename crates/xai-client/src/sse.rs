use tracing::warn;

use crate::stream::StreamEvent;

/// One parsed `data:` payload from the completion stream.
///
/// All fields are optional on the wire; absence is an explicit checked case,
/// never an error.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
pub(crate) struct ChatChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    #[serde(default)]
    pub usage: Option<ChunkUsage>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
pub(crate) struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
pub(crate) struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

/// Token totals as reported by the provider; omitted fields read as zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
pub(crate) struct ChunkUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

/// Incremental decoder for `data:`-prefixed SSE lines.
///
/// Keeps a rolling byte buffer so chunk boundaries never have to align with
/// line boundaries; an unterminated line stays buffered until the next push
/// and is discarded if the stream ends first.
#[derive(Default)]
pub(crate) struct SseLineDecoder {
    buf: Vec<u8>,
}

impl SseLineDecoder {
    /// Appends a byte chunk and returns every frame completed by it.
    ///
    /// Malformed `data:` lines (including `[DONE]` sentinels) are logged and
    /// skipped; a single bad line never fails the stream.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<ChatChunk> {
        self.buf.extend_from_slice(chunk);
        let mut frames = Vec::new();
        while let Some(idx) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=idx).collect();
            if let Some(frame) = parse_data_line(&String::from_utf8_lossy(&line)) {
                frames.push(frame);
            }
        }
        frames
    }
}

fn parse_data_line(line: &str) -> Option<ChatChunk> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let payload = line.strip_prefix("data: ")?;
    match serde_json::from_str(payload) {
        Ok(frame) => Some(frame),
        Err(e) => {
            warn!(line = %line, "skipping unparseable SSE line: {e}");
            None
        }
    }
}

/// Normalizes one frame into zero, one, or two events: a text delta when
/// `choices[0].delta.content` is present and non-empty, then a usage total
/// when `usage` is present.
pub(crate) fn frame_events(frame: ChatChunk) -> Vec<StreamEvent> {
    let mut events = Vec::new();
    if let Some(content) = frame
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        && !content.is_empty()
    {
        events.push(StreamEvent::TextDelta { text: content });
    }
    if let Some(usage) = frame.usage {
        events.push(StreamEvent::UsageTotal {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
        });
    }
    events
}
