//! The interface between the tokenizer and whatever consumes its output.

use serde::Serialize;
use strum_macros::Display;

use crate::entities::{CodePoints, EntityError};

/// A half-open byte range `[start, end)` in the logical input stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// First byte.
    pub start: usize,
    /// One past the last byte.
    pub end: usize,
}

impl Span {
    /// Construct a span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How an attribute value was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteType {
    /// `<input disabled>`
    NoValue,
    /// `<a href=x>`
    Unquoted,
    /// `<a href='x'>`
    Single,
    /// `<a href="x">`
    Double,
}

/// Receives structural events from the [`Tokenizer`](super::Tokenizer).
///
/// Text arguments are already sliced out of the input stream. They are only
/// valid for the duration of the call.
pub trait Callbacks {
    /// A run of character data.
    fn on_text(&mut self, text: &str, span: Span);
    /// A decoded character reference inside character data. `span` covers
    /// the reference source.
    fn on_text_entity(&mut self, value: CodePoints, span: Span);
    /// The name of a start tag, as written.
    fn on_open_tag_name(&mut self, name: &str, span: Span);
    /// The `>` closing a start tag.
    fn on_open_tag_end(&mut self, end_index: usize);
    /// The `/>` closing a start tag. `end_index` is the position of the `>`.
    ///
    /// Returns whether the element was closed. An element left open is
    /// read like a plain start tag, so `<script/>` still starts a raw-text
    /// body.
    fn on_self_closing_tag(&mut self, end_index: usize) -> bool;
    /// An end tag. `end_index` is the position of its `>`.
    fn on_close_tag(&mut self, name: &str, end_index: usize);
    /// An attribute name.
    fn on_attrib_name(&mut self, name: &str, span: Span);
    /// A piece of an attribute value. Values may arrive in several pieces.
    fn on_attrib_data(&mut self, data: &str, span: Span);
    /// A decoded character reference inside an attribute value.
    fn on_attrib_entity(&mut self, value: CodePoints, span: Span);
    /// The end of an attribute. `end_index` is one past its last byte.
    fn on_attrib_end(&mut self, quote: QuoteType, end_index: usize);
    /// The body of a comment, without `<!--` and `-->`.
    fn on_comment(&mut self, text: &str, end_index: usize);
    /// The body of a CDATA section, without `<![CDATA[` and `]]>`.
    fn on_cdata(&mut self, text: &str, end_index: usize);
    /// The body of a `<!...>` declaration, without `<!` and `>`.
    fn on_declaration(&mut self, text: &str, end_index: usize);
    /// The body of a `<?...>` processing instruction, without `<?` and `>`.
    fn on_processing_instruction(&mut self, text: &str, end_index: usize);
    /// A recoverable problem in the character reference starting at `index`.
    fn on_entity_error(&mut self, error: EntityError, index: usize) {
        let _ = (error, index);
    }
    /// End of input; no further callbacks follow.
    fn on_end(&mut self);
}
