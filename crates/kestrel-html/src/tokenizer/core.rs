use std::cell::Cell;
use std::rc::Rc;

use kestrel_common::warning::warn_once;

use super::callbacks::{Callbacks, QuoteType, Span};
use super::helpers::{is_end_of_tag_section, is_whitespace};
use super::input::BufferChain;
use super::states::State;
use crate::entities::{DecodeMode, DecodeStep, EntityDecoder, EntityTrie};

/// `<![` must be followed by this to open a CDATA section.
const CDATA_START: &[u8] = b"CDATA[";
/// Terminator of a CDATA section.
const CDATA_END: &[u8] = b"]]>";
/// Terminator of a comment.
const COMMENT_END: &[u8] = b"-->";
const SCRIPT_END: &[u8] = b"</script";
const STYLE_END: &[u8] = b"</style";
const TITLE_END: &[u8] = b"</title";
const TEXTAREA_END: &[u8] = b"</textarea";

/// Settings fixed for the lifetime of a tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerOptions {
    /// Treat the input as XML: no raw-text elements, any name character may
    /// start a tag, strict entity decoding against the XML entity set.
    pub xml_mode: bool,
    /// Decode character references in text and attribute values.
    pub decode_entities: bool,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            xml_mode: false,
            decode_entities: true,
        }
    }
}

/// Shared pause flag.
///
/// Cloned handles observe and control the same tokenizer, so code running
/// inside a callback can suspend parsing. Parsing stops after the byte being
/// processed; [`Tokenizer::resume`] continues from there.
#[derive(Debug, Clone, Default)]
pub struct PauseHandle(Rc<Cell<bool>>);

impl PauseHandle {
    /// Request that parsing stop.
    pub fn pause(&self) {
        self.0.set(true);
    }

    /// Whether parsing is currently suspended.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.0.get()
    }

    pub(super) fn clear(&self) {
        self.0.set(false);
    }
}

/// Streaming markup tokenizer.
///
/// Bytes are pulled from a [`BufferChain`] one at a time and dispatched on
/// the current [`State`]. Output is delivered through [`Callbacks`] as soon as
/// a section is complete, with text flushed at the end of every chunk, so
/// arbitrarily chunked input yields the same events as one big write (modulo
/// text being split at chunk boundaries).
#[derive(Debug)]
pub struct Tokenizer {
    pub(super) state: State,
    /// State to return to after a character reference.
    pub(super) base_state: State,
    pub(super) buffer: BufferChain,
    /// Start of the section currently being read.
    pub(super) section_start: usize,
    /// Position of the byte being processed.
    pub(super) index: usize,
    /// Position of the `&` of the reference being decoded.
    pub(super) entity_start: usize,
    /// End of an end-tag name followed by whitespace, e.g. `</div  >`.
    pub(super) close_name_end: usize,
    /// Inside a raw-text element.
    pub(super) is_special: bool,
    /// Terminator or end tag being matched.
    pub(super) current_sequence: &'static [u8],
    pub(super) sequence_index: usize,
    pub(super) paused: PauseHandle,
    pub(super) end_requested: bool,
    pub(super) finished: bool,
    pub(super) options: TokenizerOptions,
    pub(super) decoder: EntityDecoder,
}

impl Tokenizer {
    /// Create a tokenizer in the `Text` state.
    #[must_use]
    pub fn new(options: TokenizerOptions) -> Self {
        let trie = if options.xml_mode {
            EntityTrie::xml()
        } else {
            EntityTrie::html()
        };
        Self {
            state: State::Text,
            base_state: State::Text,
            buffer: BufferChain::new(),
            section_start: 0,
            index: 0,
            entity_start: 0,
            close_name_end: 0,
            is_special: false,
            current_sequence: &[],
            sequence_index: 0,
            paused: PauseHandle::default(),
            end_requested: false,
            finished: false,
            options,
            decoder: EntityDecoder::new(trie),
        }
    }

    /// Return to the initial state, forgetting all input. Pause handles stay
    /// connected.
    pub fn reset(&mut self) {
        self.state = State::Text;
        self.base_state = State::Text;
        self.buffer.clear();
        self.section_start = 0;
        self.index = 0;
        self.entity_start = 0;
        self.close_name_end = 0;
        self.is_special = false;
        self.current_sequence = &[];
        self.sequence_index = 0;
        self.paused.clear();
        self.end_requested = false;
        self.finished = false;
    }

    /// Feed a chunk. While paused the chunk is only queued.
    pub fn write<C: Callbacks>(&mut self, chunk: &str, cbs: &mut C) {
        if self.finished {
            return;
        }
        log::trace!(target: "kestrel::tokenizer", "write {} bytes at {}", chunk.len(), self.buffer.end_index());
        self.buffer.push(chunk);
        if !self.paused.is_paused() {
            self.parse(cbs);
        }
    }

    /// Signal end of input. When paused, finishing is deferred to
    /// [`Self::resume`].
    pub fn end<C: Callbacks>(&mut self, cbs: &mut C) {
        if self.finished {
            return;
        }
        self.end_requested = true;
        if !self.paused.is_paused() {
            self.finish(cbs);
        }
    }

    /// Suspend parsing after the current byte.
    pub fn pause(&self) {
        self.paused.pause();
    }

    /// Continue parsing queued input, finishing if [`Self::end`] was called.
    pub fn resume<C: Callbacks>(&mut self, cbs: &mut C) {
        self.paused.clear();
        if self.finished {
            return;
        }
        if self.index < self.buffer.end_index() {
            self.parse(cbs);
        }
        if self.end_requested && !self.paused.is_paused() {
            self.finish(cbs);
        }
    }

    /// A handle that can pause this tokenizer from elsewhere.
    #[must_use]
    pub fn pause_handle(&self) -> PauseHandle {
        self.paused.clone()
    }

    /// Whether parsing is suspended.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused.is_paused()
    }

    /// Whether `on_end` has been delivered.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    /// Start of the section currently being read.
    #[must_use]
    pub const fn section_start(&self) -> usize {
        self.section_start
    }

    /// Number of input chunks still held in memory.
    #[must_use]
    pub fn buffered_chunks(&self) -> usize {
        self.buffer.chunk_count()
    }

    fn parse<C: Callbacks>(&mut self, cbs: &mut C) {
        while !self.paused.is_paused() {
            let Some(c) = self.buffer.byte_at(self.index) else {
                break;
            };
            self.step(c, cbs);
            self.index += 1;
        }
        self.cleanup(cbs);
        self.buffer.discard_before(self.retain_from());
    }

    /// Oldest position that may still be sliced or revisited.
    fn retain_from(&self) -> usize {
        let oldest = self.section_start.min(self.index);
        if self.state == State::InEntity {
            oldest.min(self.entity_start)
        } else {
            oldest
        }
    }

    fn step<C: Callbacks>(&mut self, c: u8, cbs: &mut C) {
        match self.state {
            State::Text => self.handle_text_state(c, cbs),
            State::BeforeTagName => self.handle_before_tag_name_state(c, cbs),
            State::InTagName => self.handle_in_tag_name_state(c, cbs),
            State::InSelfClosingTag => self.handle_in_self_closing_tag_state(c, cbs),
            State::BeforeClosingTagName => self.handle_before_closing_tag_name_state(c),
            State::InClosingTagName => self.handle_in_closing_tag_name_state(c, cbs),
            State::AfterClosingTagName => self.handle_after_closing_tag_name_state(c, cbs),
            State::BeforeAttributeName => self.handle_before_attribute_name_state(c, cbs),
            State::InAttributeName => self.handle_in_attribute_name_state(c, cbs),
            State::AfterAttributeName => self.handle_after_attribute_name_state(c, cbs),
            State::BeforeAttributeValue => self.handle_before_attribute_value_state(c, cbs),
            State::InAttributeValueDq => self.handle_in_quoted_attribute_value_state(c, b'"', cbs),
            State::InAttributeValueSq => {
                self.handle_in_quoted_attribute_value_state(c, b'\'', cbs);
            }
            State::InAttributeValueNq => self.handle_in_unquoted_attribute_value_state(c, cbs),
            State::BeforeDeclaration => self.handle_before_declaration_state(c, cbs),
            State::InDeclaration => self.handle_in_declaration_state(c, cbs),
            State::InProcessingInstruction => self.handle_in_processing_instruction_state(c, cbs),
            State::BeforeComment => self.handle_before_comment_state(c, cbs),
            State::CdataSequence => self.handle_cdata_sequence_state(c, cbs),
            State::InSpecialComment => self.handle_in_special_comment_state(c, cbs),
            State::InCommentLike => self.handle_in_comment_like_state(c, cbs),
            State::BeforeSpecialS => self.handle_before_special_s_state(c, cbs),
            State::BeforeSpecialT => self.handle_before_special_t_state(c, cbs),
            State::SpecialStartSequence => self.handle_special_start_sequence_state(c, cbs),
            State::InSpecialTag => self.handle_in_special_tag_state(c, cbs),
            State::InEntity => self.handle_in_entity_state(c, cbs),
        }
    }

    // =========================================================================
    // Text and tags
    // =========================================================================

    fn handle_text_state<C: Callbacks>(&mut self, c: u8, cbs: &mut C) {
        if c == b'<' || (!self.options.decode_entities && self.fast_forward_to(b'<')) {
            if self.index > self.section_start {
                self.emit_text(self.section_start, self.index, cbs);
            }
            self.state = State::BeforeTagName;
            self.section_start = self.index;
        } else if self.options.decode_entities && c == b'&' {
            self.start_entity();
        }
    }

    fn handle_before_tag_name_state<C: Callbacks>(&mut self, c: u8, cbs: &mut C) {
        if c == b'!' {
            self.state = State::BeforeDeclaration;
            self.section_start = self.index + 1;
        } else if c == b'?' {
            self.state = State::InProcessingInstruction;
            self.section_start = self.index + 1;
        } else if self.is_tag_start_char(c) {
            self.section_start = self.index;
            self.state = if self.options.xml_mode {
                State::InTagName
            } else {
                match c | 0x20 {
                    b's' => State::BeforeSpecialS,
                    b't' => State::BeforeSpecialT,
                    _ => State::InTagName,
                }
            };
        } else if c == b'/' {
            self.state = State::BeforeClosingTagName;
        } else {
            // Not a tag after all: the `<` stays in the text section.
            self.state = State::Text;
            self.handle_text_state(c, cbs);
        }
    }

    fn handle_in_tag_name_state<C: Callbacks>(&mut self, c: u8, cbs: &mut C) {
        if is_end_of_tag_section(c) {
            self.emit_open_tag_name(cbs);
            self.section_start = self.index;
            self.state = State::BeforeAttributeName;
            self.handle_before_attribute_name_state(c, cbs);
        }
    }

    fn handle_before_closing_tag_name_state(&mut self, c: u8) {
        if is_whitespace(c) {
            // `</ div>`: keep looking for the name.
        } else if c == b'>' {
            // `</>` is dropped entirely.
            self.state = State::Text;
            self.section_start = self.index + 1;
        } else {
            self.state = if self.is_tag_start_char(c) {
                State::InClosingTagName
            } else {
                State::InSpecialComment
            };
            self.section_start = self.index;
        }
    }

    fn handle_in_closing_tag_name_state<C: Callbacks>(&mut self, c: u8, cbs: &mut C) {
        if c == b'>' {
            self.emit_close_tag(self.index, cbs);
        } else if c == b'/' || is_whitespace(c) {
            self.close_name_end = self.index;
            self.state = State::AfterClosingTagName;
        }
    }

    fn handle_after_closing_tag_name_state<C: Callbacks>(&mut self, c: u8, cbs: &mut C) {
        if c == b'>' || self.fast_forward_to(b'>') {
            self.emit_close_tag(self.close_name_end, cbs);
        }
    }

    fn handle_in_self_closing_tag_state<C: Callbacks>(&mut self, c: u8, cbs: &mut C) {
        if c == b'>' {
            let closed = cbs.on_self_closing_tag(self.index);
            if self.is_special && !closed {
                self.state = State::InSpecialTag;
                self.sequence_index = 0;
            } else {
                self.state = State::Text;
                self.is_special = false;
            }
            self.section_start = self.index + 1;
        } else if !is_whitespace(c) {
            self.state = State::BeforeAttributeName;
            self.handle_before_attribute_name_state(c, cbs);
        }
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    fn handle_before_attribute_name_state<C: Callbacks>(&mut self, c: u8, cbs: &mut C) {
        if c == b'>' {
            cbs.on_open_tag_end(self.index);
            if self.is_special {
                self.state = State::InSpecialTag;
                self.sequence_index = 0;
            } else {
                self.state = State::Text;
            }
            self.section_start = self.index + 1;
        } else if c == b'/' {
            self.state = State::InSelfClosingTag;
        } else if !is_whitespace(c) {
            self.state = State::InAttributeName;
            self.section_start = self.index;
        }
    }

    fn handle_in_attribute_name_state<C: Callbacks>(&mut self, c: u8, cbs: &mut C) {
        if c == b'=' || is_end_of_tag_section(c) {
            self.emit_attrib_name(cbs);
            self.section_start = self.index;
            self.state = State::AfterAttributeName;
            self.handle_after_attribute_name_state(c, cbs);
        }
    }

    fn handle_after_attribute_name_state<C: Callbacks>(&mut self, c: u8, cbs: &mut C) {
        if c == b'=' {
            self.state = State::BeforeAttributeValue;
        } else if c == b'/' || c == b'>' {
            cbs.on_attrib_end(QuoteType::NoValue, self.section_start);
            self.section_start = self.index;
            self.state = State::BeforeAttributeName;
            self.handle_before_attribute_name_state(c, cbs);
        } else if !is_whitespace(c) {
            cbs.on_attrib_end(QuoteType::NoValue, self.section_start);
            self.state = State::InAttributeName;
            self.section_start = self.index;
        }
    }

    fn handle_before_attribute_value_state<C: Callbacks>(&mut self, c: u8, cbs: &mut C) {
        if c == b'"' {
            self.state = State::InAttributeValueDq;
            self.section_start = self.index + 1;
        } else if c == b'\'' {
            self.state = State::InAttributeValueSq;
            self.section_start = self.index + 1;
        } else if !is_whitespace(c) {
            self.section_start = self.index;
            self.state = State::InAttributeValueNq;
            self.handle_in_unquoted_attribute_value_state(c, cbs);
        }
    }

    fn handle_in_quoted_attribute_value_state<C: Callbacks>(&mut self, c: u8, quote: u8, cbs: &mut C) {
        if c == quote || (!self.options.decode_entities && self.fast_forward_to(quote)) {
            self.emit_attrib_data(self.section_start, self.index, cbs);
            let quote_type = if quote == b'"' {
                QuoteType::Double
            } else {
                QuoteType::Single
            };
            cbs.on_attrib_end(quote_type, self.index + 1);
            self.section_start = self.index + 1;
            self.state = State::BeforeAttributeName;
        } else if self.options.decode_entities && c == b'&' {
            self.start_entity();
        }
    }

    fn handle_in_unquoted_attribute_value_state<C: Callbacks>(&mut self, c: u8, cbs: &mut C) {
        if is_whitespace(c) || c == b'>' {
            self.emit_attrib_data(self.section_start, self.index, cbs);
            self.section_start = self.index;
            cbs.on_attrib_end(QuoteType::Unquoted, self.index);
            self.state = State::BeforeAttributeName;
            self.handle_before_attribute_name_state(c, cbs);
        } else if self.options.decode_entities && c == b'&' {
            self.start_entity();
        }
    }

    // =========================================================================
    // Declarations, processing instructions, comments and CDATA
    // =========================================================================

    fn handle_before_declaration_state<C: Callbacks>(&mut self, c: u8, cbs: &mut C) {
        if c == b'[' {
            self.state = State::CdataSequence;
            self.sequence_index = 0;
        } else if c == b'-' {
            self.state = State::BeforeComment;
        } else {
            self.state = State::InDeclaration;
            self.handle_in_declaration_state(c, cbs);
        }
    }

    fn handle_cdata_sequence_state<C: Callbacks>(&mut self, c: u8, cbs: &mut C) {
        if CDATA_START.get(self.sequence_index) == Some(&c) {
            self.sequence_index += 1;
            if self.sequence_index == CDATA_START.len() {
                self.state = State::InCommentLike;
                self.current_sequence = CDATA_END;
                self.sequence_index = 0;
                self.section_start = self.index + 1;
            }
        } else {
            self.sequence_index = 0;
            self.state = State::InDeclaration;
            self.handle_in_declaration_state(c, cbs);
        }
    }

    fn handle_in_declaration_state<C: Callbacks>(&mut self, c: u8, cbs: &mut C) {
        if c == b'>' || self.fast_forward_to(b'>') {
            let text = self.buffer.slice(self.section_start, self.index);
            cbs.on_declaration(&text, self.index);
            self.state = State::Text;
            self.section_start = self.index + 1;
        }
    }

    fn handle_in_processing_instruction_state<C: Callbacks>(&mut self, c: u8, cbs: &mut C) {
        if c == b'>' || self.fast_forward_to(b'>') {
            let text = self.buffer.slice(self.section_start, self.index);
            cbs.on_processing_instruction(&text, self.index);
            self.state = State::Text;
            self.section_start = self.index + 1;
        }
    }

    fn handle_before_comment_state<C: Callbacks>(&mut self, c: u8, cbs: &mut C) {
        if c == b'-' {
            self.state = State::InCommentLike;
            self.current_sequence = COMMENT_END;
            // Start two bytes into `-->` so that `<!-->` is an empty comment.
            self.sequence_index = 2;
            self.section_start = self.index + 1;
        } else {
            self.state = State::InDeclaration;
            self.handle_in_declaration_state(c, cbs);
        }
    }

    fn handle_in_comment_like_state<C: Callbacks>(&mut self, c: u8, cbs: &mut C) {
        let sequence = self.current_sequence;
        if sequence.get(self.sequence_index) == Some(&c) {
            self.sequence_index += 1;
            if self.sequence_index == sequence.len() {
                let text_end = self.index + 1 - sequence.len();
                let text = self.buffer.slice(self.section_start, text_end);
                if sequence == CDATA_END {
                    cbs.on_cdata(&text, self.index);
                } else {
                    cbs.on_comment(&text, self.index);
                }
                self.sequence_index = 0;
                self.section_start = self.index + 1;
                self.state = State::Text;
            }
        } else if self.sequence_index == 0 {
            if sequence.first().is_some_and(|&first| self.fast_forward_to(first)) {
                self.sequence_index = 1;
            }
        } else if sequence.get(self.sequence_index - 1) != Some(&c) {
            // `--->` and `]]]>` still terminate: only a different byte resets.
            self.sequence_index = 0;
        }
    }

    fn handle_in_special_comment_state<C: Callbacks>(&mut self, c: u8, cbs: &mut C) {
        if c == b'>' || self.fast_forward_to(b'>') {
            let text = self.buffer.slice(self.section_start, self.index);
            cbs.on_comment(&text, self.index);
            self.state = State::Text;
            self.section_start = self.index + 1;
        }
    }

    // =========================================================================
    // Raw-text elements
    // =========================================================================

    fn handle_before_special_s_state<C: Callbacks>(&mut self, c: u8, cbs: &mut C) {
        match c | 0x20 {
            b'c' => self.start_special(SCRIPT_END),
            b't' => self.start_special(STYLE_END),
            _ => {
                self.state = State::InTagName;
                self.handle_in_tag_name_state(c, cbs);
            }
        }
    }

    fn handle_before_special_t_state<C: Callbacks>(&mut self, c: u8, cbs: &mut C) {
        match c | 0x20 {
            b'i' => self.start_special(TITLE_END),
            b'e' => self.start_special(TEXTAREA_END),
            _ => {
                self.state = State::InTagName;
                self.handle_in_tag_name_state(c, cbs);
            }
        }
    }

    /// Begin matching a raw-text element name. The first two bytes of the
    /// end sequence are `</` and the third was already seen.
    fn start_special(&mut self, sequence: &'static [u8]) {
        self.is_special = true;
        self.current_sequence = sequence;
        self.sequence_index = 4;
        self.state = State::SpecialStartSequence;
    }

    fn handle_special_start_sequence_state<C: Callbacks>(&mut self, c: u8, cbs: &mut C) {
        let at_end = self.sequence_index == self.current_sequence.len();
        let matched = if at_end {
            is_end_of_tag_section(c)
        } else {
            self.current_sequence.get(self.sequence_index) == Some(&(c | 0x20))
        };

        if !matched {
            self.is_special = false;
        } else if !at_end {
            self.sequence_index += 1;
            return;
        }

        self.sequence_index = 0;
        self.state = State::InTagName;
        self.handle_in_tag_name_state(c, cbs);
    }

    fn handle_in_special_tag_state<C: Callbacks>(&mut self, c: u8, cbs: &mut C) {
        let sequence = self.current_sequence;
        if self.sequence_index == sequence.len() {
            if c == b'>' || c == b'/' || is_whitespace(c) {
                let end_of_text = self.index - sequence.len();
                if self.section_start < end_of_text {
                    self.emit_text(self.section_start, end_of_text, cbs);
                }
                self.is_special = false;
                // Skip the `</`.
                self.section_start = end_of_text + 2;
                self.state = State::InClosingTagName;
                self.handle_in_closing_tag_name_state(c, cbs);
                return;
            }
            self.sequence_index = 0;
        }

        if sequence.get(self.sequence_index) == Some(&(c | 0x20)) {
            self.sequence_index += 1;
        } else if self.sequence_index == 0 {
            if sequence == TITLE_END || sequence == TEXTAREA_END {
                if self.options.decode_entities && c == b'&' {
                    self.start_entity();
                }
            } else if self.fast_forward_to(b'<') {
                self.sequence_index = 1;
            }
        } else {
            // `<</script>`: a `<` restarts the match.
            self.sequence_index = usize::from(c == b'<');
        }
    }

    // =========================================================================
    // Character references
    // =========================================================================

    fn start_entity(&mut self) {
        self.base_state = self.state;
        self.state = State::InEntity;
        self.entity_start = self.index;
        let mode = if self.options.xml_mode {
            DecodeMode::Strict
        } else if matches!(self.base_state, State::Text | State::InSpecialTag) {
            DecodeMode::Legacy
        } else {
            DecodeMode::Attribute
        };
        self.decoder.start(mode);
    }

    fn handle_in_entity_state<C: Callbacks>(&mut self, c: u8, cbs: &mut C) {
        match self.decoder.feed(c) {
            DecodeStep::Pending => {}
            DecodeStep::Resolved(found) => {
                self.state = self.base_state;
                self.emit_entity(found.value, found.consumed, cbs);
                self.report_entity_errors(cbs);
            }
            DecodeStep::Rejected => {
                self.report_entity_errors(cbs);
                // The `&` is literal; rescan from the byte after it.
                self.state = self.base_state;
                self.index = self.entity_start;
            }
        }
    }

    // =========================================================================
    // End of input
    // =========================================================================

    /// Flush pending text or attribute data at the end of a chunk.
    fn cleanup<C: Callbacks>(&mut self, cbs: &mut C) {
        if self.paused.is_paused() || self.section_start >= self.index {
            return;
        }
        let in_text = self.state == State::Text
            || (self.state == State::InSpecialTag && self.sequence_index == 0);
        if in_text {
            self.emit_text(self.section_start, self.index, cbs);
            self.section_start = self.index;
        } else if self.state.is_attribute_value() {
            self.emit_attrib_data(self.section_start, self.index, cbs);
            self.section_start = self.index;
        }
    }

    fn finish<C: Callbacks>(&mut self, cbs: &mut C) {
        if self.state == State::InEntity {
            let step = self.decoder.end();
            self.state = self.base_state;
            if let DecodeStep::Resolved(found) = step {
                self.emit_entity(found.value, found.consumed, cbs);
            }
            self.report_entity_errors(cbs);
        }
        self.handle_trailing_data(cbs);
        self.finished = true;
        log::trace!(target: "kestrel::tokenizer", "finished at {} in {}", self.buffer.end_index(), self.state);
        cbs.on_end();
    }

    /// Deliver whatever section is still open at end of input.
    fn handle_trailing_data<C: Callbacks>(&mut self, cbs: &mut C) {
        let end = self.buffer.end_index();
        if self.section_start >= end {
            return;
        }
        let last = end - 1;
        let text = self.buffer.slice(self.section_start, end);

        match self.state {
            State::InCommentLike if self.current_sequence == CDATA_END => {
                warn_once("tokenizer", "unterminated CDATA section at end of input");
                cbs.on_cdata(&text, last);
            }
            State::InCommentLike | State::InSpecialComment => {
                warn_once("tokenizer", "unterminated comment at end of input");
                cbs.on_comment(&text, last);
            }
            State::InDeclaration | State::BeforeComment | State::CdataSequence => {
                warn_once("tokenizer", "unterminated declaration at end of input");
                cbs.on_declaration(&text, last);
            }
            State::InProcessingInstruction => {
                warn_once("tokenizer", "unterminated processing instruction at end of input");
                cbs.on_processing_instruction(&text, last);
            }
            state if state.is_inside_tag() => {
                // An unfinished tag is dropped.
                log::debug!(target: "kestrel::tokenizer", "dropping unfinished tag in {state}");
            }
            _ => cbs.on_text(&text, Span::new(self.section_start, end)),
        }
    }
}
