//! A handler that records what the parser reports.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ParseError;
use crate::parser::{Attributes, Handler, Location};
use crate::tokenizer::QuoteType;

/// One parser callback, with owned data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// [`Handler::on_open_tag_name`]
    OpenTagName {
        /// Tag name.
        name: String,
    },
    /// [`Handler::on_attribute`]
    Attribute {
        /// Attribute name.
        name: String,
        /// Decoded value.
        value: String,
        /// How the value was quoted.
        quote: QuoteType,
    },
    /// [`Handler::on_open_tag`]
    OpenTag {
        /// Tag name.
        name: String,
        /// Attributes, sorted by name.
        attributes: BTreeMap<String, String>,
        /// Synthesized by the parser.
        implied: bool,
    },
    /// [`Handler::on_close_tag`]
    CloseTag {
        /// Tag name.
        name: String,
        /// No end tag was written.
        implied: bool,
    },
    /// [`Handler::on_text`], with adjacent calls merged.
    Text {
        /// The text.
        text: String,
    },
    /// [`Handler::on_comment`]
    Comment {
        /// The comment body.
        text: String,
    },
    /// [`Handler::on_comment_end`]
    CommentEnd,
    /// [`Handler::on_cdata_start`]
    CdataStart,
    /// [`Handler::on_cdata_end`]
    CdataEnd,
    /// [`Handler::on_processing_instruction`]
    ProcessingInstruction {
        /// Name with its `!` or `?` sigil.
        name: String,
        /// Raw body with its sigil.
        data: String,
    },
    /// [`Handler::on_error`]
    Error {
        /// The error message.
        message: String,
    },
    /// [`Handler::on_end`]
    End,
}

/// Records every parser callback as an [`Event`].
///
/// Consecutive text callbacks are merged into one event, which makes the
/// log independent of how the input was split into chunks.
#[derive(Debug, Clone, Default)]
pub struct EventCollector {
    events: Vec<Event>,
    locations: Vec<Location>,
}

impl EventCollector {
    /// An empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded events.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// The location reported with each event. For merged text this is the
    /// location of the first piece.
    #[must_use]
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Consume the collector and return the events.
    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// All text events concatenated.
    #[must_use]
    pub fn text(&self) -> String {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn push(&mut self, event: Event, location: Location) {
        self.events.push(event);
        self.locations.push(location);
    }
}

impl Handler for EventCollector {
    fn on_reset(&mut self) {
        self.events.clear();
        self.locations.clear();
    }

    fn on_open_tag_name(&mut self, name: &str, location: Location) {
        self.push(
            Event::OpenTagName {
                name: name.to_owned(),
            },
            location,
        );
    }

    fn on_attribute(&mut self, name: &str, value: &str, quote: QuoteType, location: Location) {
        self.push(
            Event::Attribute {
                name: name.to_owned(),
                value: value.to_owned(),
                quote,
            },
            location,
        );
    }

    fn on_open_tag(&mut self, name: &str, attributes: &Attributes, implied: bool, location: Location) {
        let attributes = attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self.push(
            Event::OpenTag {
                name: name.to_owned(),
                attributes,
                implied,
            },
            location,
        );
    }

    fn on_close_tag(&mut self, name: &str, implied: bool, location: Location) {
        self.push(
            Event::CloseTag {
                name: name.to_owned(),
                implied,
            },
            location,
        );
    }

    fn on_text(&mut self, text: &str, location: Location) {
        if let Some(Event::Text { text: previous }) = self.events.last_mut() {
            previous.push_str(text);
        } else {
            self.push(
                Event::Text {
                    text: text.to_owned(),
                },
                location,
            );
        }
    }

    fn on_comment(&mut self, text: &str, location: Location) {
        self.push(
            Event::Comment {
                text: text.to_owned(),
            },
            location,
        );
    }

    fn on_comment_end(&mut self, location: Location) {
        self.push(Event::CommentEnd, location);
    }

    fn on_cdata_start(&mut self, location: Location) {
        self.push(Event::CdataStart, location);
    }

    fn on_cdata_end(&mut self, location: Location) {
        self.push(Event::CdataEnd, location);
    }

    fn on_processing_instruction(&mut self, name: &str, data: &str, location: Location) {
        self.push(
            Event::ProcessingInstruction {
                name: name.to_owned(),
                data: data.to_owned(),
            },
            location,
        );
    }

    fn on_error(&mut self, error: &ParseError, location: Location) {
        self.push(
            Event::Error {
                message: error.to_string(),
            },
            location,
        );
    }

    fn on_end(&mut self, location: Location) {
        self.push(Event::End, location);
    }
}
