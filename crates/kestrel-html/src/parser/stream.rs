//! Byte-stream front end for the parser.

use std::{io, mem};

use super::core::Parser;
use super::handler::Handler;
use crate::error::ParseError;

/// Feeds a [`Parser`] from raw bytes through [`io::Write`].
///
/// Multi-byte characters split across writes are carried until complete.
/// Invalid sequences become U+FFFD and decoding continues after them.
///
/// ```
/// use std::io::Write;
/// use kestrel_html::{EventCollector, Parser, ParserOptions, StreamWriter};
///
/// let parser = Parser::new(EventCollector::new(), ParserOptions::default());
/// let mut writer = StreamWriter::new(parser);
/// writer.write_all(b"<p>caf\xC3").unwrap();
/// writer.write_all(b"\xA9</p>").unwrap();
/// let parser = writer.finish().unwrap();
/// assert_eq!(parser.handler().text(), "caf\u{e9}");
/// ```
#[derive(Debug)]
pub struct StreamWriter<H: Handler> {
    parser: Parser<H>,
    /// Incomplete UTF-8 suffix of the last write.
    carry: Vec<u8>,
}

impl<H: Handler> StreamWriter<H> {
    /// Wrap a parser.
    #[must_use]
    pub const fn new(parser: Parser<H>) -> Self {
        Self {
            parser,
            carry: Vec::new(),
        }
    }

    /// The wrapped parser.
    #[must_use]
    pub const fn parser(&self) -> &Parser<H> {
        &self.parser
    }

    /// Flush any carried bytes, end the parse and return the parser.
    ///
    /// # Errors
    ///
    /// [`ParseError::EndAfterEnd`] if the parser was already ended.
    pub fn finish(mut self) -> Result<Parser<H>, ParseError> {
        if self.carry.is_empty() {
            self.parser.end(None)?;
        } else {
            let rest = String::from_utf8_lossy(&self.carry).into_owned();
            self.parser.end(Some(&rest))?;
        }
        Ok(self.parser)
    }
}

/// Decode as much of `bytes` as possible into `text`. An incomplete
/// sequence at the end is left in `carry`.
fn decode_bytes(text: &mut String, carry: &mut Vec<u8>, mut bytes: &[u8]) {
    while !bytes.is_empty() {
        match std::str::from_utf8(bytes) {
            Ok(s) => {
                text.push_str(s);
                break;
            }
            Err(e) => {
                let valid_up_to = e.valid_up_to();
                text.push_str(&String::from_utf8_lossy(&bytes[..valid_up_to]));
                if let Some(len) = e.error_len() {
                    text.push('\u{FFFD}');
                    bytes = &bytes[valid_up_to + len..];
                } else {
                    carry.extend_from_slice(&bytes[valid_up_to..]);
                    break;
                }
            }
        }
    }
}

impl<H: Handler> io::Write for StreamWriter<H> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut pending = mem::take(&mut self.carry);
        pending.extend_from_slice(buf);

        let mut text = String::with_capacity(pending.len());
        decode_bytes(&mut text, &mut self.carry, &pending);
        if text.is_empty() {
            if self.parser.is_ended() {
                return Err(io::Error::other(ParseError::WriteAfterEnd));
            }
        } else {
            self.parser.write(&text).map_err(io::Error::other)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(chunks: &[&[u8]]) -> (String, Vec<u8>) {
        let mut text = String::new();
        let mut carry = Vec::new();
        for chunk in chunks {
            let mut pending = mem::take(&mut carry);
            pending.extend_from_slice(chunk);
            decode_bytes(&mut text, &mut carry, &pending);
        }
        (text, carry)
    }

    #[test]
    fn test_split_sequence_is_carried() {
        let (text, carry) = decode(&[b"a\xF0\x9F", b"\x98\x80b"]);
        assert_eq!(text, "a\u{1F600}b");
        assert!(carry.is_empty());
    }

    #[test]
    fn test_invalid_byte_is_replaced() {
        let (text, carry) = decode(&[b"a\xFFb"]);
        assert_eq!(text, "a\u{FFFD}b");
        assert!(carry.is_empty());
    }

    #[test]
    fn test_trailing_partial_sequence_waits() {
        let (text, carry) = decode(&[b"ok\xE2\x82"]);
        assert_eq!(text, "ok");
        assert_eq!(carry, b"\xE2\x82");
    }
}
