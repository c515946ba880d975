use std::mem;

use kestrel_common::warning::warn_once;

use super::handler::{Attributes, Handler, Location};
use super::options::ParserOptions;
use super::rules::{implied_closes, is_foreign_context, is_void, switches_context};
use crate::entities::{CodePoints, EntityError};
use crate::error::ParseError;
use crate::tokenizer::{Callbacks, PauseHandle, QuoteType, Span, Tokenizer};

/// Streaming parser.
///
/// Wraps a [`Tokenizer`] and turns its raw events into a well-nested
/// document for a [`Handler`]: names are normalized, attributes collected,
/// and the open-element stack enforces HTML's implicit-close and void
/// element rules. In XML mode no such rules apply, only stack matching.
///
/// ```
/// use kestrel_html::{EventCollector, Parser, ParserOptions};
///
/// let mut parser = Parser::new(EventCollector::new(), ParserOptions::default());
/// parser.write("<ul><li>one<li>two").unwrap();
/// parser.end(Some("</ul>")).unwrap();
/// assert_eq!(parser.handler().text(), "onetwo");
/// ```
#[derive(Debug)]
pub struct Parser<H: Handler> {
    tokenizer: Tokenizer,
    state: ParseState<H>,
    ended: bool,
}

/// Everything the tokenizer callbacks mutate, kept apart from the
/// tokenizer so both can be borrowed at once.
#[derive(Debug)]
struct ParseState<H: Handler> {
    handler: H,
    options: ParserOptions,
    start_index: usize,
    end_index: usize,
    /// Start of the start tag being read; attribute names move
    /// `start_index` while the tag is open.
    open_tag_start: usize,
    tag_name: String,
    attrib_name: String,
    attrib_value: String,
    attribs: Attributes,
    /// Open elements, innermost last.
    stack: Vec<String>,
    /// Whether `/>` is honored at the current depth. Seeded with
    /// `xml_mode`; `svg` and `math` push `true`, integration points `false`.
    foreign_context: Vec<bool>,
}

impl<H: Handler> Parser<H> {
    /// Create a parser delivering events to `handler`.
    #[must_use]
    pub fn new(mut handler: H, options: ParserOptions) -> Self {
        handler.on_parser_init(options);
        Self {
            tokenizer: Tokenizer::new(options.tokenizer_options()),
            state: ParseState::new(handler, options),
            ended: false,
        }
    }

    /// Parse a chunk of input.
    ///
    /// # Errors
    ///
    /// [`ParseError::WriteAfterEnd`] once [`Self::end`] has been called.
    pub fn write(&mut self, chunk: &str) -> Result<(), ParseError> {
        if self.ended {
            return Err(self.state.report(ParseError::WriteAfterEnd));
        }
        self.tokenizer.write(chunk, &mut self.state);
        Ok(())
    }

    /// Parse an optional final chunk and finish the document. Elements still
    /// open are closed with `implied` set, then [`Handler::on_end`] fires
    /// (deferred until [`Self::resume`] while paused).
    ///
    /// # Errors
    ///
    /// [`ParseError::EndAfterEnd`] when called a second time.
    pub fn end(&mut self, chunk: Option<&str>) -> Result<(), ParseError> {
        if self.ended {
            return Err(self.state.report(ParseError::EndAfterEnd));
        }
        if let Some(chunk) = chunk {
            self.tokenizer.write(chunk, &mut self.state);
        }
        self.ended = true;
        self.tokenizer.end(&mut self.state);
        Ok(())
    }

    /// Suspend parsing. Later writes are queued.
    pub fn pause(&self) {
        self.tokenizer.pause();
    }

    /// Continue after [`Self::pause`].
    pub fn resume(&mut self) {
        self.tokenizer.resume(&mut self.state);
    }

    /// A handle that can pause this parser from inside a handler callback.
    #[must_use]
    pub fn pause_handle(&self) -> PauseHandle {
        self.tokenizer.pause_handle()
    }

    /// Whether parsing is suspended.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.tokenizer.is_paused()
    }

    /// Whether [`Self::end`] has been called.
    #[must_use]
    pub const fn is_ended(&self) -> bool {
        self.ended
    }

    /// Forget all input and start a new document. The handler receives
    /// [`Handler::on_reset`].
    pub fn reset(&mut self) {
        self.state.handler.on_reset();
        self.tokenizer.reset();
        self.state.clear();
        self.ended = false;
    }

    /// Reset, then parse `data` as a whole document.
    ///
    /// # Errors
    ///
    /// Never in practice: the parser was just reset.
    pub fn parse_complete(&mut self, data: &str) -> Result<(), ParseError> {
        self.reset();
        self.end(Some(data))
    }

    /// Start offset of the construct most recently reported.
    #[must_use]
    pub const fn start_index(&self) -> usize {
        self.state.start_index
    }

    /// Inclusive end offset of the construct most recently reported.
    #[must_use]
    pub const fn end_index(&self) -> usize {
        self.state.end_index
    }

    /// Names of the currently open elements, outermost first.
    #[must_use]
    pub fn open_elements(&self) -> &[String] {
        &self.state.stack
    }

    /// The options the parser was created with.
    #[must_use]
    pub const fn options(&self) -> &ParserOptions {
        &self.state.options
    }

    /// The handler.
    #[must_use]
    pub const fn handler(&self) -> &H {
        &self.state.handler
    }

    /// The handler, mutably.
    pub const fn handler_mut(&mut self) -> &mut H {
        &mut self.state.handler
    }

    /// Consume the parser and return the handler.
    #[must_use]
    pub fn into_handler(self) -> H {
        self.state.handler
    }
}

// =============================================================================
// Element stack
// =============================================================================

impl<H: Handler> ParseState<H> {
    fn new(handler: H, options: ParserOptions) -> Self {
        Self {
            handler,
            options,
            start_index: 0,
            end_index: 0,
            open_tag_start: 0,
            tag_name: String::new(),
            attrib_name: String::new(),
            attrib_value: String::new(),
            attribs: Attributes::new(),
            stack: Vec::new(),
            foreign_context: vec![options.xml_mode],
        }
    }

    fn clear(&mut self) {
        self.start_index = 0;
        self.end_index = 0;
        self.open_tag_start = 0;
        self.tag_name.clear();
        self.attrib_name.clear();
        self.attrib_value.clear();
        self.attribs.clear();
        self.stack.clear();
        self.foreign_context.clear();
        self.foreign_context.push(self.options.xml_mode);
    }

    const fn location(&self) -> Location {
        Location {
            start_index: self.start_index,
            end_index: self.end_index,
        }
    }

    const fn html_mode(&self) -> bool {
        !self.options.xml_mode
    }

    fn is_void_element(&self, name: &str) -> bool {
        self.html_mode() && is_void(name)
    }

    fn report(&mut self, error: ParseError) -> ParseError {
        let location = self.location();
        self.handler.on_error(&error, location);
        error
    }

    fn normalize_tag_name(&self, name: &str) -> String {
        if self.options.lowers_tags() {
            name.to_ascii_lowercase()
        } else {
            name.to_owned()
        }
    }

    fn push_element(&mut self, name: String) {
        if self.html_mode() && switches_context(&name) {
            self.foreign_context.push(is_foreign_context(&name));
        }
        self.stack.push(name);
    }

    /// Pop the innermost open element, keeping the foreign-context stack in
    /// step with it.
    fn pop_element(&mut self) -> Option<String> {
        let name = self.stack.pop()?;
        if self.html_mode() && switches_context(&name) && self.foreign_context.len() > 1 {
            let _ = self.foreign_context.pop();
        }
        Some(name)
    }

    fn in_foreign_context(&self) -> bool {
        self.foreign_context.last().copied().unwrap_or(false)
    }

    fn emit_open_tag(&mut self, name: String) {
        self.open_tag_start = self.start_index;

        if self.html_mode() {
            let closes = implied_closes(&name);
            while self.stack.last().is_some_and(|open| closes.contains(&open.as_str())) {
                if let Some(element) = self.pop_element() {
                    log::debug!(target: "kestrel::parser", "<{name}> implicitly closes <{element}>");
                    let location = self.location();
                    self.handler.on_close_tag(&element, true, location);
                }
            }
        }

        if !self.is_void_element(&name) {
            self.push_element(name.clone());
        }
        let location = self.location();
        self.handler.on_open_tag_name(&name, location);
        self.attribs.clear();
        self.tag_name = name;
    }

    fn end_open_tag(&mut self, implied: bool) {
        self.start_index = self.open_tag_start;
        let name = mem::take(&mut self.tag_name);
        let location = self.location();
        self.handler.on_open_tag(&name, &self.attribs, implied, location);
        self.attribs.clear();
    }

    /// Close the element whose start tag just ended, as for `<br/>`.
    fn close_current_tag(&mut self, open_implied: bool) {
        let name = self.tag_name.clone();
        self.end_open_tag(open_implied);

        if self.stack.last() == Some(&name) {
            let _ = self.pop_element();
            let location = self.location();
            self.handler.on_close_tag(&name, !open_implied, location);
        }
    }

    fn instruction_name(&self, value: &str) -> String {
        let end = value
            .find(|c: char| c.is_whitespace() || c == '/')
            .unwrap_or(value.len());
        self.normalize_tag_name(&value[..end])
    }
}

// =============================================================================
// Tokenizer callbacks
// =============================================================================

impl<H: Handler> Callbacks for ParseState<H> {
    fn on_text(&mut self, text: &str, span: Span) {
        self.end_index = span.end.saturating_sub(1);
        let location = self.location();
        self.handler.on_text(text, location);
        self.start_index = span.end;
    }

    fn on_text_entity(&mut self, value: CodePoints, span: Span) {
        self.end_index = span.end.saturating_sub(1);
        let mut text = String::with_capacity(8);
        value.push_to(&mut text);
        let location = self.location();
        self.handler.on_text(&text, location);
        self.start_index = span.end;
    }

    fn on_open_tag_name(&mut self, name: &str, span: Span) {
        self.end_index = span.end;
        let name = self.normalize_tag_name(name);
        self.emit_open_tag(name);
    }

    fn on_open_tag_end(&mut self, end_index: usize) {
        self.end_index = end_index;
        self.end_open_tag(false);
        self.start_index = end_index + 1;
    }

    fn on_self_closing_tag(&mut self, end_index: usize) -> bool {
        self.end_index = end_index;
        if self.options.recognizes_self_closing() || self.in_foreign_context() {
            self.close_current_tag(false);
            self.start_index = end_index + 1;
            true
        } else {
            self.on_open_tag_end(end_index);
            false
        }
    }

    fn on_close_tag(&mut self, name: &str, end_index: usize) {
        self.end_index = end_index;
        let name = self.normalize_tag_name(name);

        if !self.is_void_element(&name) {
            if let Some(pos) = self.stack.iter().rposition(|open| *open == name) {
                let location = self.location();
                while self.stack.len() > pos {
                    let implied = self.stack.len() - 1 != pos;
                    if let Some(element) = self.pop_element() {
                        if implied {
                            log::debug!(target: "kestrel::parser", "</{name}> implicitly closes <{element}>");
                        }
                        self.handler.on_close_tag(&element, implied, location);
                    }
                }
            } else if self.html_mode() && name == "p" {
                // `</p>` without an open paragraph yields an empty one.
                self.emit_open_tag(name);
                self.close_current_tag(true);
            } else {
                warn_once("parser", "ignoring end tag with no matching open element");
            }
        } else if self.html_mode() && name == "br" {
            // `</br>` is read as `<br>`. Not through `emit_open_tag`, which
            // would apply the implied closes of a real start tag.
            let location = self.location();
            self.handler.on_open_tag_name(&name, location);
            self.handler.on_open_tag(&name, &Attributes::new(), true, location);
        }

        self.start_index = end_index + 1;
    }

    fn on_attrib_name(&mut self, name: &str, span: Span) {
        self.start_index = span.start;
        self.attrib_name = if self.options.lowers_attribute_names() {
            name.to_ascii_lowercase()
        } else {
            name.to_owned()
        };
    }

    fn on_attrib_data(&mut self, data: &str, _span: Span) {
        self.attrib_value.push_str(data);
    }

    fn on_attrib_entity(&mut self, value: CodePoints, _span: Span) {
        value.push_to(&mut self.attrib_value);
    }

    fn on_attrib_end(&mut self, quote: QuoteType, end_index: usize) {
        self.end_index = end_index;
        let name = mem::take(&mut self.attrib_name);
        let value = mem::take(&mut self.attrib_value);
        let location = self.location();
        self.handler.on_attribute(&name, &value, quote, location);

        if self.attribs.contains_key(&name) {
            warn_once("parser", "duplicate attribute ignored");
        } else {
            let _ = self.attribs.insert(name, value);
        }
    }

    fn on_comment(&mut self, text: &str, end_index: usize) {
        self.end_index = end_index;
        let location = self.location();
        self.handler.on_comment(text, location);
        self.handler.on_comment_end(location);
        self.start_index = end_index + 1;
    }

    fn on_cdata(&mut self, text: &str, end_index: usize) {
        self.end_index = end_index;
        let location = self.location();
        if self.options.recognizes_cdata() {
            self.handler.on_cdata_start(location);
            self.handler.on_text(text, location);
            self.handler.on_cdata_end(location);
        } else {
            self.handler.on_comment(&format!("[CDATA[{text}]]"), location);
            self.handler.on_comment_end(location);
        }
        self.start_index = end_index + 1;
    }

    fn on_declaration(&mut self, text: &str, end_index: usize) {
        self.end_index = end_index;
        let name = self.instruction_name(text);
        let location = self.location();
        self.handler
            .on_processing_instruction(&format!("!{name}"), &format!("!{text}"), location);
        self.start_index = end_index + 1;
    }

    fn on_processing_instruction(&mut self, text: &str, end_index: usize) {
        self.end_index = end_index;
        let name = self.instruction_name(text);
        let location = self.location();
        self.handler
            .on_processing_instruction(&format!("?{name}"), &format!("?{text}"), location);
        self.start_index = end_index + 1;
    }

    fn on_entity_error(&mut self, error: EntityError, index: usize) {
        let _ = self.report(ParseError::Entity { error, index });
    }

    fn on_end(&mut self) {
        // A start tag cut off by the end of input never completes.
        if !self.tag_name.is_empty() {
            let name = mem::take(&mut self.tag_name);
            if self.stack.last() == Some(&name) {
                let _ = self.pop_element();
            }
            log::debug!(target: "kestrel::parser", "dropping unfinished <{name}>");
        }
        self.attribs.clear();
        self.end_index = self.start_index;
        let location = self.location();
        while let Some(element) = self.pop_element() {
            self.handler.on_close_tag(&element, true, location);
        }
        self.handler.on_end(location);
    }
}
