use std::collections::HashMap;

use super::options::ParserOptions;
use crate::error::ParseError;
use crate::tokenizer::QuoteType;

/// Attributes of a start tag, keyed by (possibly lower-cased) name. When a
/// name repeats, the first occurrence wins.
pub type Attributes = HashMap<String, String>;

/// Source position of the construct a [`Handler`] callback describes.
///
/// Both offsets are byte offsets into the input stream and `end_index` is
/// inclusive: for `<b>` at the start of the input, the open tag reports
/// `0..=2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Location {
    /// First byte of the construct.
    pub start_index: usize,
    /// Last byte of the construct.
    pub end_index: usize,
}

/// Receives document events from a [`Parser`](super::Parser).
///
/// Every method has an empty default so implementors only override what
/// they care about. Events arrive in document order, every open tag is
/// eventually matched by exactly one close tag (possibly `implied`), and
/// nothing follows [`Handler::on_end`]. The exception is HTML void
/// elements such as `<img>`, which open and never close.
#[allow(unused_variables)]
pub trait Handler {
    /// The handler was attached to a parser configured with `options`.
    fn on_parser_init(&mut self, options: ParserOptions) {}

    /// The parser was reset and a new document begins.
    fn on_reset(&mut self) {}

    /// A start tag name, before its attributes.
    fn on_open_tag_name(&mut self, name: &str, location: Location) {}

    /// One attribute of the start tag being read. Duplicates are reported
    /// here even though [`Handler::on_open_tag`] only keeps the first.
    fn on_attribute(&mut self, name: &str, value: &str, quote: QuoteType, location: Location) {}

    /// A complete start tag. `implied` is set for tags the parser
    /// synthesized, such as the `<p>` in front of a stray `</p>`.
    fn on_open_tag(&mut self, name: &str, attributes: &Attributes, implied: bool, location: Location) {}

    /// An element was closed. `implied` is set when no matching end tag was
    /// written: auto-closed or still open at end of input.
    fn on_close_tag(&mut self, name: &str, implied: bool, location: Location) {}

    /// Character data. A run of text may arrive in several calls.
    fn on_text(&mut self, text: &str, location: Location) {}

    /// Comment text. Also used for CDATA sections outside XML mode.
    fn on_comment(&mut self, text: &str, location: Location) {}

    /// The end of the comment started by the preceding
    /// [`Handler::on_comment`] calls.
    fn on_comment_end(&mut self, location: Location) {}

    /// A CDATA section begins; its content follows as text.
    fn on_cdata_start(&mut self, location: Location) {}

    /// The current CDATA section ends.
    fn on_cdata_end(&mut self, location: Location) {}

    /// A `<!...>` declaration (`name` starts with `!`) or `<?...>`
    /// instruction (`name` starts with `?`). `data` is the raw body with
    /// the same prefix.
    fn on_processing_instruction(&mut self, name: &str, data: &str, location: Location) {}

    /// A recoverable error.
    fn on_error(&mut self, error: &ParseError, location: Location) {}

    /// The document is complete.
    fn on_end(&mut self, location: Location) {}
}
