//! Line Protocol
//!
//! The editor speaks newline-delimited JSON: one notification per line,
//! UTF-8, no length prefix.
//!
//! ```text
//! {"jsonrpc":"2.0","method":"draw_status","params":[...]}\n
//! {"jsonrpc":"2.0","method":"menu_hide","params":[]}\n
//! ```
//!
//! [`LineDecoder`] buffers raw bytes from the editor's stdout and yields
//! complete messages. A bad line costs only itself: after an error the
//! decoder resumes at the next line.
//!
//! # Security
//!
//! - Line length is bounded by [`MAX_LINE_SIZE`]; longer lines are dropped
//!   without being buffered in full

use crate::protocol::{EditorMessage, ProtocolError};

/// Maximum accepted line size (16 MB)
///
/// A full-screen `draw` of a large terminal with rich highlighting stays well
/// under this.
pub const MAX_LINE_SIZE: usize = 16 * 1024 * 1024;

/// Minimum buffer capacity for decoder
const MIN_BUFFER_CAPACITY: usize = 8192;

/// Decoder state machine for streaming line parsing
#[derive(Debug)]
pub struct LineDecoder {
    buffer: Vec<u8>,
    /// Position where we've consumed up to
    read_pos: usize,
    /// Bytes before this offset (relative to `read_pos`) hold no newline
    scanned: usize,
    /// Dropping the rest of an oversized line
    discarding: bool,
    max_line_size: usize,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDecoder {
    /// Create a new decoder with the default line limit
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_line_size(MAX_LINE_SIZE)
    }

    /// Create a decoder with a custom line limit
    #[must_use]
    pub fn with_max_line_size(max_line_size: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(MIN_BUFFER_CAPACITY),
            read_pos: 0,
            scanned: 0,
            discarding: false,
            max_line_size,
        }
    }

    /// Append bytes to the buffer
    pub fn push(&mut self, mut data: &[u8]) {
        if self.discarding {
            match data.iter().position(|&b| b == b'\n') {
                Some(end) => {
                    self.discarding = false;
                    data = &data[end + 1..];
                }
                None => return,
            }
        }

        // Compact buffer if we've consumed a lot
        if self.read_pos > self.buffer.len() / 2 && self.read_pos > MIN_BUFFER_CAPACITY {
            self.buffer.drain(..self.read_pos);
            self.read_pos = 0;
        }
        self.buffer.extend_from_slice(data);
    }

    /// Get the number of bytes available in the buffer
    #[must_use]
    pub fn available(&self) -> usize {
        self.buffer.len() - self.read_pos
    }

    /// Try to decode the next message
    ///
    /// Returns:
    /// - `Ok(Some(msg))` if a complete line was decoded
    /// - `Ok(None)` if more data is needed
    /// - `Err(...)` if the next line is invalid; it has been consumed, so
    ///   calling again continues with the line after it
    pub fn decode(&mut self) -> Result<Option<EditorMessage>, ProtocolError> {
        loop {
            let pending = &self.buffer[self.read_pos..];
            let Some(offset) = pending[self.scanned..].iter().position(|&b| b == b'\n') else {
                let size = pending.len();
                if size > self.max_line_size {
                    self.drop_pending();
                    self.discarding = true;
                    return Err(ProtocolError::TooLarge {
                        size,
                        max: self.max_line_size,
                    });
                }
                self.scanned = size;
                return Ok(None);
            };

            let start = self.read_pos;
            let end = start + self.scanned + offset;
            self.read_pos = end + 1;
            self.scanned = 0;

            if end - start > self.max_line_size {
                return Err(ProtocolError::TooLarge {
                    size: end - start,
                    max: self.max_line_size,
                });
            }

            if let Some(msg) = parse_line(&self.buffer[start..end])? {
                return Ok(Some(msg));
            }
        }
    }

    /// Decode whatever is left once the stream has ended
    ///
    /// The editor normally terminates every line, but a final unterminated
    /// line is still honored.
    pub fn finish(&mut self) -> Result<Option<EditorMessage>, ProtocolError> {
        if self.discarding {
            self.clear();
            return Ok(None);
        }
        let rest = self.buffer.split_off(self.read_pos);
        self.clear();
        if rest.len() > self.max_line_size {
            return Err(ProtocolError::TooLarge {
                size: rest.len(),
                max: self.max_line_size,
            });
        }
        parse_line(&rest)
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.read_pos = 0;
        self.scanned = 0;
        self.discarding = false;
    }

    fn drop_pending(&mut self) {
        self.buffer.clear();
        self.read_pos = 0;
        self.scanned = 0;
    }
}

/// Parse one line; blank lines yield `None`
fn parse_line(bytes: &[u8]) -> Result<Option<EditorMessage>, ProtocolError> {
    let line = std::str::from_utf8(bytes).map_err(|_| ProtocolError::InvalidUtf8)?;
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    EditorMessage::parse(line).map(Some)
}
