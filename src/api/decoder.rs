// Incremental UTF-8 decoding for streamed response bodies

/// Decodes byte chunks into text, holding back an incomplete multi-byte
/// character until the next chunk arrives.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `chunk`. With `stream` set, a truncated character at the end is
    /// kept for the next call; otherwise it becomes U+FFFD.
    pub fn decode(&mut self, chunk: &[u8], stream: bool) -> String {
        self.pending.extend_from_slice(chunk);
        let mut out = String::new();

        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    break;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[..valid]));

                    if let Some(len) = err.error_len() {
                        // Invalid sequence in the middle
                        out.push(char::REPLACEMENT_CHARACTER);
                        self.pending.drain(..valid + len);
                    } else {
                        self.pending.drain(..valid);
                        if !stream {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.clear();
                        }
                        break;
                    }
                }
            }
        }

        out
    }

    /// Flush whatever is still held back at end of stream.
    pub fn finish(&mut self) -> String {
        self.decode(&[], false)
    }
}
