//! Streaming transcript assembly.
//!
//! The chat endpoint replies with an event-stream body: newline-delimited
//! frames of the form `data: <json>`, closed by the `data: [DONE]`
//! sentinel. Chunk boundaries fall anywhere — mid-line and even mid-UTF-8
//! codepoint — so decoding runs through a two-stage buffer: a byte carry
//! for incomplete codepoints and a line carry for text after the last
//! newline. Feeding the same bytes in any chunking yields the same deltas.

use serde::Deserialize;
use tracing::debug;

const DATA_PREFIX: &str = "data: ";
const DONE_SENTINEL: &str = "[DONE]";

/// Incremental UTF-8 decoder and line splitter.
#[derive(Debug, Default)]
pub(crate) struct Utf8LineBuffer {
    /// Undecoded suffix: bytes of a codepoint cut off by the chunk edge.
    bytes: Vec<u8>,
    /// Decoded text after the last newline.
    line: String,
}

impl Utf8LineBuffer {
    /// Feeds one chunk and returns every line completed by it, without the
    /// trailing `\n` (or `\r\n`).
    pub(crate) fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.bytes.extend_from_slice(chunk);
        let buf = std::mem::take(&mut self.bytes);
        let mut text = std::mem::take(&mut self.line);

        let mut pos = 0;
        while pos < buf.len() {
            match std::str::from_utf8(&buf[pos..]) {
                Ok(valid) => {
                    text.push_str(valid);
                    pos = buf.len();
                }
                Err(err) => {
                    let valid_end = pos + err.valid_up_to();
                    text.push_str(&String::from_utf8_lossy(&buf[pos..valid_end]));
                    match err.error_len() {
                        // Invalid sequence mid-buffer: substitute and keep
                        // scanning rather than abort the stream.
                        Some(len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            pos = valid_end + len;
                        }
                        // Incomplete codepoint at the end of the chunk:
                        // carry the suffix to the next push.
                        None => {
                            self.bytes = buf[valid_end..].to_vec();
                            pos = buf.len();
                        }
                    }
                }
            }
        }

        let mut lines = Vec::new();
        while let Some(idx) = text.find('\n') {
            let mut line: String = text.drain(..=idx).collect();
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
            lines.push(line);
        }
        self.line = text;
        lines
    }

    /// Drains the trailing unterminated line, if any, at end of stream.
    pub(crate) fn finish(&mut self) -> Option<String> {
        self.bytes.clear();
        let line = std::mem::take(&mut self.line);
        if line.is_empty() {
            None
        } else {
            Some(line)
        }
    }
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Frame {
    /// Incremental assistant content.
    Delta(String),
    /// Termination sentinel: normal stream end, not content.
    Done,
}

/// Parses one complete line. Non-data lines, malformed JSON, and frames
/// without content all yield `None`: the stream is a best-effort
/// accumulation, and one bad frame must not lose prior content.
pub(crate) fn parse_frame(line: &str) -> Option<Frame> {
    let payload = line.strip_prefix(DATA_PREFIX)?;
    if payload == DONE_SENTINEL {
        return Some(Frame::Done);
    }
    match serde_json::from_str::<StreamChunk>(payload) {
        Ok(chunk) => chunk
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.delta.content)
            .filter(|content| !content.is_empty())
            .map(Frame::Delta),
        Err(err) => {
            debug!("skipping malformed stream frame: {err}");
            None
        }
    }
}

/// Folds a chunked event-stream body into ordered content deltas.
#[derive(Debug, Default)]
pub struct DeltaAssembler {
    buffer: Utf8LineBuffer,
    done: bool,
}

impl DeltaAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk and returns the content deltas it completed,
    /// in arrival order.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut deltas = Vec::new();
        for line in self.buffer.push(chunk) {
            self.apply_line(&line, &mut deltas);
        }
        deltas
    }

    /// Signals end of stream, processing any unterminated trailing line.
    pub fn finish(&mut self) -> Vec<String> {
        let mut deltas = Vec::new();
        if let Some(line) = self.buffer.finish() {
            self.apply_line(&line, &mut deltas);
        }
        deltas
    }

    /// Whether the `[DONE]` sentinel was observed. A close without it and
    /// with zero content is a soft completion, not an error.
    pub fn saw_done(&self) -> bool {
        self.done
    }

    fn apply_line(&mut self, line: &str, deltas: &mut Vec<String>) {
        if self.done {
            return;
        }
        match parse_frame(line) {
            Some(Frame::Done) => self.done = true,
            Some(Frame::Delta(content)) => deltas.push(content),
            None => {}
        }
    }
}
