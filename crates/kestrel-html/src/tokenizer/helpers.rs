//! Helper functions for the tokenizer.
//!
//! This module contains the byte classes used by the state handlers and the
//! methods that slice a finished section out of the buffer and hand it to the
//! callbacks.

use super::callbacks::{Callbacks, Span};
use super::core::Tokenizer;
use super::states::State;
use crate::entities::CodePoints;

// =============================================================================
// Byte Classes
// =============================================================================

/// Space, tab, line feed, form feed or carriage return.
pub(super) const fn is_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\n' | b'\t' | b'\x0C' | b'\r')
}

/// Bytes that end a tag or attribute name.
pub(super) const fn is_end_of_tag_section(c: u8) -> bool {
    c == b'/' || c == b'>' || is_whitespace(c)
}

impl Tokenizer {
    /// HTML tag names start with an ASCII letter. XML is laxer: anything that
    /// does not end the name may start it.
    pub(super) const fn is_tag_start_char(&self, c: u8) -> bool {
        if self.options.xml_mode {
            !is_end_of_tag_section(c)
        } else {
            c.is_ascii_alphabetic()
        }
    }

    /// Skip ahead to the next `byte`. Returns `false` and parks on the last
    /// buffered byte when there is none yet.
    pub(super) fn fast_forward_to(&mut self, byte: u8) -> bool {
        if let Some(pos) = self.buffer.find_byte(self.index + 1, byte) {
            self.index = pos;
            true
        } else {
            self.index = self.buffer.end_index().saturating_sub(1).max(self.index);
            false
        }
    }

    /// The span from the section start to the current byte.
    pub(super) const fn span_to_index(&self) -> Span {
        Span::new(self.section_start, self.index)
    }
}

// =============================================================================
// Emission Helpers
// =============================================================================

impl Tokenizer {
    pub(super) fn emit_text<C: Callbacks>(&self, start: usize, end: usize, cbs: &mut C) {
        let text = self.buffer.slice(start, end);
        cbs.on_text(&text, Span::new(start, end));
    }

    pub(super) fn emit_attrib_data<C: Callbacks>(&self, start: usize, end: usize, cbs: &mut C) {
        if start < end {
            let data = self.buffer.slice(start, end);
            cbs.on_attrib_data(&data, Span::new(start, end));
        }
    }

    pub(super) fn emit_open_tag_name<C: Callbacks>(&self, cbs: &mut C) {
        let name = self.buffer.slice(self.section_start, self.index);
        cbs.on_open_tag_name(&name, self.span_to_index());
    }

    pub(super) fn emit_attrib_name<C: Callbacks>(&self, cbs: &mut C) {
        let name = self.buffer.slice(self.section_start, self.index);
        cbs.on_attrib_name(&name, self.span_to_index());
    }

    /// Report the end tag whose name runs from the section start to
    /// `name_end`. The current byte is its `>`.
    pub(super) fn emit_close_tag<C: Callbacks>(&mut self, name_end: usize, cbs: &mut C) {
        {
            let name = self.buffer.slice(self.section_start, name_end);
            cbs.on_close_tag(&name, self.index);
        }
        self.state = State::Text;
        self.section_start = self.index + 1;
    }

    /// Deliver a decoded reference spanning `consumed` bytes from the `&` and
    /// continue after it.
    pub(super) fn emit_entity<C: Callbacks>(&mut self, value: CodePoints, consumed: usize, cbs: &mut C) {
        let entity_end = self.entity_start + consumed;
        let span = Span::new(self.entity_start, entity_end);

        if self.base_state.is_attribute_value() {
            self.emit_attrib_data(self.section_start, self.entity_start, cbs);
            cbs.on_attrib_entity(value, span);
        } else {
            if self.section_start < self.entity_start {
                self.emit_text(self.section_start, self.entity_start, cbs);
            }
            cbs.on_text_entity(value, span);
        }

        self.section_start = entity_end;
        // The main loop advances past `index` before reading again.
        self.index = entity_end - 1;
    }

    pub(super) fn report_entity_errors<C: Callbacks>(&mut self, cbs: &mut C) {
        let index = self.entity_start;
        for error in self.decoder.drain_errors() {
            log::debug!(target: "kestrel::entities", "{error} at {index}");
            cbs.on_entity_error(error, index);
        }
    }
}
