//! Incremental UTF-8 decoding for chunked response bodies
//!
//! Chunk boundaries from the network carry no meaning: a multi-byte
//! character may be split across two (or more) chunks. The decoder holds the
//! incomplete tail back until the rest of the sequence arrives.

use std::char::REPLACEMENT_CHARACTER;

/// Streaming UTF-8 decoder
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk, returning everything that is complete so far.
    ///
    /// Invalid sequences become U+FFFD. An incomplete sequence at the end of
    /// the input is buffered for the next call.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);

        let mut out = String::new();
        let mut rest: &[u8] = &self.pending;
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    rest = &[];
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match e.error_len() {
                        Some(len) => {
                            out.push(REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            rest = after;
                            break;
                        }
                    }
                }
            }
        }

        let leftover = rest.to_vec();
        self.pending = leftover;
        out
    }

    /// Flush at end of stream. A truncated trailing sequence becomes U+FFFD.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            self.pending.clear();
            REPLACEMENT_CHARACTER.to_string()
        }
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
