//! Incremental character reference decoder.
//!
//! The decoder is started right after an `&` and fed one byte at a time. It
//! answers [`DecodeStep::Pending`] until it can tell whether the bytes seen so
//! far form a reference, and then reports how many source bytes (counting the
//! `&`) the reference spans. Bytes after the reported length were only looked
//! at, not consumed, and must be scanned again by the caller.

use strum_macros::Display;
use thiserror::Error;

use super::numeric::{is_substituted, replace_code_point};
use super::{CodePoints, EntityTrie};

/// Which unterminated references are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DecodeMode {
    /// Text content: legacy names such as `&amp` are accepted without `;`.
    Legacy,
    /// Attribute values: like `Legacy`, but `&copy=` and `&copyx` stay
    /// literal so query strings survive.
    Attribute,
    /// XML: only `;`-terminated references.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
enum DecoderState {
    BeforeEntity,
    BeforeNumericEntity,
    InNumericEntity,
    InHexEntity,
    InNamedEntity,
}

/// A recognised reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityMatch {
    /// Source bytes spanned, including the leading `&` and any `;`.
    pub consumed: usize,
    /// Decoded text.
    pub value: CodePoints,
}

/// Result of feeding the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStep {
    /// More input is needed.
    Pending,
    /// A reference was recognised.
    Resolved(EntityMatch),
    /// The `&` does not start a reference and is literal text.
    Rejected,
}

/// Recoverable problems noticed while decoding. None of them change the
/// decoded output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EntityError {
    /// A reference was accepted without its terminating `;`.
    #[error("missing semicolon after character reference")]
    MissingSemicolon,
    /// `&#` or `&#x` was not followed by any digit.
    #[error("absence of digits in numeric character reference")]
    AbsenceOfDigits,
    /// The numeric value was substituted (NUL, surrogate, out of range or a
    /// C1 control).
    #[error("invalid numeric character reference value {code:#x}")]
    InvalidNumeric {
        /// The value as written.
        code: u32,
    },
}

/// Saturation point for numeric accumulation. Anything at or above it is
/// out of range regardless of further digits.
const NUMERIC_CEILING: u32 = 0x11_0000;

/// State machine decoding one character reference at a time.
#[derive(Debug, Clone)]
pub struct EntityDecoder {
    trie: &'static EntityTrie,
    mode: DecodeMode,
    state: DecoderState,
    /// Bytes committed to the reference so far, counting the `&`.
    consumed: usize,
    /// Trie node of the best terminal seen so far (0 = none).
    result: usize,
    /// Current trie position.
    tree_index: usize,
    /// Bytes walked past the best terminal.
    excess: usize,
    numeric: u32,
    digits: usize,
    errors: Vec<EntityError>,
}

impl EntityDecoder {
    /// Create a decoder over `trie`.
    #[must_use]
    pub const fn new(trie: &'static EntityTrie) -> Self {
        Self {
            trie,
            mode: DecodeMode::Legacy,
            state: DecoderState::BeforeEntity,
            consumed: 1,
            result: 0,
            tree_index: 0,
            excess: 1,
            numeric: 0,
            digits: 0,
            errors: Vec::new(),
        }
    }

    /// Prepare for a new reference. Call right after the `&` was seen.
    pub fn start(&mut self, mode: DecodeMode) {
        self.mode = mode;
        self.state = DecoderState::BeforeEntity;
        self.consumed = 1;
        self.result = 0;
        self.tree_index = EntityTrie::ROOT;
        self.excess = 1;
        self.numeric = 0;
        self.digits = 0;
        self.errors.clear();
    }

    /// Feed the next byte after the `&`.
    pub fn feed(&mut self, byte: u8) -> DecodeStep {
        match self.state {
            DecoderState::BeforeEntity => {
                if byte == b'#' {
                    self.state = DecoderState::BeforeNumericEntity;
                    self.consumed += 1;
                    DecodeStep::Pending
                } else {
                    self.state = DecoderState::InNamedEntity;
                    self.named(byte)
                }
            }
            DecoderState::BeforeNumericEntity => {
                if byte | 0x20 == b'x' {
                    self.state = DecoderState::InHexEntity;
                    self.consumed += 1;
                    DecodeStep::Pending
                } else {
                    self.state = DecoderState::InNumericEntity;
                    self.numeric_digit(byte, 10)
                }
            }
            DecoderState::InNumericEntity => self.numeric_digit(byte, 10),
            DecoderState::InHexEntity => self.numeric_digit(byte, 16),
            DecoderState::InNamedEntity => self.named(byte),
        }
    }

    /// Flush at end of input. Never returns [`DecodeStep::Pending`].
    pub fn end(&mut self) -> DecodeStep {
        match self.state {
            DecoderState::InNamedEntity => {
                if self.result != 0
                    && (self.mode != DecodeMode::Attribute || self.result == self.tree_index)
                {
                    self.emit_unterminated_named()
                } else {
                    DecodeStep::Rejected
                }
            }
            DecoderState::InNumericEntity | DecoderState::InHexEntity => self.emit_numeric(false),
            DecoderState::BeforeEntity | DecoderState::BeforeNumericEntity => {
                if self.state == DecoderState::BeforeNumericEntity {
                    self.errors.push(EntityError::AbsenceOfDigits);
                }
                DecodeStep::Rejected
            }
        }
    }

    /// Take the diagnostics collected since the last [`Self::start`].
    pub fn drain_errors(&mut self) -> impl Iterator<Item = EntityError> + '_ {
        self.errors.drain(..)
    }

    fn numeric_digit(&mut self, byte: u8, base: u32) -> DecodeStep {
        match char::from(byte).to_digit(base) {
            Some(digit) => {
                self.numeric = self
                    .numeric
                    .saturating_mul(base)
                    .saturating_add(digit)
                    .min(NUMERIC_CEILING);
                self.digits += 1;
                self.consumed += 1;
                DecodeStep::Pending
            }
            None => self.emit_numeric(byte == b';'),
        }
    }

    fn emit_numeric(&mut self, terminated: bool) -> DecodeStep {
        if self.digits == 0 {
            self.errors.push(EntityError::AbsenceOfDigits);
            return DecodeStep::Rejected;
        }
        if terminated {
            self.consumed += 1;
        } else if self.mode == DecodeMode::Strict {
            return DecodeStep::Rejected;
        } else {
            self.errors.push(EntityError::MissingSemicolon);
        }
        if is_substituted(self.numeric) {
            self.errors
                .push(EntityError::InvalidNumeric { code: self.numeric });
        }
        DecodeStep::Resolved(EntityMatch {
            consumed: self.consumed,
            value: CodePoints::single(replace_code_point(self.numeric)),
        })
    }

    fn named(&mut self, byte: u8) -> DecodeStep {
        let current = self.trie.node(self.tree_index);
        let Some(next) = self.trie.child(self.tree_index, byte) else {
            let ambiguous = self.mode == DecodeMode::Attribute
                && (!current.is_terminal() || byte == b'=' || byte.is_ascii_alphanumeric());
            return if self.result == 0 || ambiguous {
                DecodeStep::Rejected
            } else {
                self.emit_unterminated_named()
            };
        };

        self.tree_index = next;
        if self.trie.node(next).is_terminal() {
            if byte == b';' {
                return self.emit_named(next, self.consumed + self.excess);
            }
            if self.mode != DecodeMode::Strict {
                self.result = next;
                self.consumed += self.excess;
                self.excess = 0;
            }
        }
        self.excess += 1;
        DecodeStep::Pending
    }

    fn emit_unterminated_named(&mut self) -> DecodeStep {
        self.errors.push(EntityError::MissingSemicolon);
        self.emit_named(self.result, self.consumed)
    }

    fn emit_named(&self, node: usize, consumed: usize) -> DecodeStep {
        match self.trie.value(node) {
            Some(value) => DecodeStep::Resolved(EntityMatch { consumed, value }),
            None => DecodeStep::Rejected,
        }
    }
}
