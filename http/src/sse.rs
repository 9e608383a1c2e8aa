//! Incremental `text/event-stream` decoding.
//!
//! Chunks from the response body can split lines (and UTF-8 sequences)
//! anywhere, so bytes are buffered until a full line is available. Lines end
//! in LF, CRLF or a lone CR.

use tracing::warn;

const LF: u8 = b'\n';
const CR: u8 = b'\r';

/// Longest line kept while waiting for its terminator.
pub const MAX_LINE: usize = 1 << 20;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseEvent {
    pub event: Option<String>,
    pub data: String,
    pub id: Option<String>,
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    // Bytes at the front of `buffer` already known to hold no terminator.
    scanned: usize,
    // The last line ended in CR at a chunk boundary; a leading LF belongs to it.
    after_cr: bool,
    // Skipping the rest of an oversized line.
    discarding: bool,
    event: Option<String>,
    data: Vec<String>,
    last_event_id: Option<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one body chunk and returns every event it completed.
    pub fn push(&mut self, mut chunk: &[u8]) -> Vec<SseEvent> {
        if self.after_cr && !chunk.is_empty() {
            self.after_cr = false;
            if chunk[0] == LF {
                chunk = &chunk[1..];
            }
        }
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        let mut start = 0;
        let mut cursor = self.scanned;
        while let Some(offset) = self.buffer[cursor..]
            .iter()
            .position(|byte| *byte == LF || *byte == CR)
        {
            let end = cursor + offset;
            let mut next = end + 1;
            if self.buffer[end] == CR {
                match self.buffer.get(next) {
                    Some(&LF) => next += 1,
                    Some(_) => {}
                    None => self.after_cr = true,
                }
            }

            if self.discarding {
                self.discarding = false;
            } else {
                let line = String::from_utf8_lossy(&self.buffer[start..end]).into_owned();
                if let Some(event) = self.process_line(&line) {
                    events.push(event);
                }
            }
            start = next;
            cursor = next;
        }

        self.buffer.drain(..start);
        if self.buffer.len() > MAX_LINE {
            warn!(len = self.buffer.len(), "event stream line too long, dropping it");
            self.buffer.clear();
            self.discarding = true;
        }
        self.scanned = self.buffer.len();
        events
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "data" => self.data.push(value.to_string()),
            "event" => self.event = Some(value.to_string()),
            "id" if !value.contains('\0') => self.last_event_id = Some(value.to_string()),
            // retry only matters to clients that reconnect
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }

        let data = self.data.join("\n");
        self.data.clear();
        Some(SseEvent {
            event,
            data,
            id: self.last_event_id.clone(),
        })
    }
}
