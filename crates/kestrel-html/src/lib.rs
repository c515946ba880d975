//! Streaming HTML and XML parsing.
//!
//! # Scope
//!
//! This crate implements:
//! - **Character references** ([WHATWG § 13.5 Named character references](https://html.spec.whatwg.org/multipage/named-characters.html))
//!   - Packed lookup trie over the full named reference table
//!   - Incremental decoder for named, decimal and hexadecimal references
//!   - Legacy, attribute and strict (XML) matching rules
//!
//! - **Tokenizer**
//!   - Byte-oriented state machine fed by arbitrarily split chunks
//!   - Raw-text bodies for `script`, `style`, `title` and `textarea`
//!   - Comments, CDATA sections, declarations and processing instructions
//!   - Pause and resume from inside callbacks
//!
//! - **Parser**
//!   - Open-element stack with implicit closes and void elements
//!   - `/>` handling for XML and embedded SVG/MathML
//!   - A [`Handler`] interface with source locations
//!
//! - **Tree builder**
//!   - Assembles a [`kestrel_dom::DomTree`]
//!
//! # Not Implemented
//!
//! - The WHATWG tree-construction algorithm (insertion modes, foster
//!   parenting, the adoption agency algorithm)
//! - Character encoding detection; input is UTF-8
//! - Namespaces

/// Character reference decoding.
pub mod entities;
/// Parser errors.
pub mod error;
/// Event recording handler.
pub mod events;
/// Element-nesting parser and handler interface.
pub mod parser;
/// Markup tokenizer.
pub mod tokenizer;
/// DOM construction.
pub mod tree_builder;

pub use entities::{CodePoints, DecodeMode, EntityDecoder, EntityTrie, decode_html, decode_xml};
pub use error::ParseError;
pub use events::{Event, EventCollector};
pub use parser::{Attributes, Handler, Location, Parser, ParserOptions, StreamWriter};
pub use tokenizer::{Callbacks, PauseHandle, QuoteType, Span, Tokenizer, TokenizerOptions};
pub use tree_builder::{ElementCallback, TreeBuilder, TreeBuilderOptions, parse_document, parse_document_with};
