//! Element-nesting layer between the tokenizer and a document handler.
//!
//! The [`Parser`] keeps a stack of open elements and applies the HTML rules
//! a browser-agnostic parser can apply without a full tree-construction
//! algorithm:
//!
//! - a start tag implicitly closes certain open siblings (`<li>` closes
//!   `<li>`, block elements close `<p>`, table cells close cells);
//! - void elements (`<img>`, `<br>`) are never pushed and get no close tag;
//! - `/>` is honored in XML mode and inside `<svg>`/`<math>`;
//! - an end tag closes every element opened after its match.

mod core;
/// Document event interface.
pub mod handler;
/// Parser configuration.
pub mod options;
mod rules;
/// Byte-stream adapter.
pub mod stream;

pub use self::core::Parser;
pub use handler::{Attributes, Handler, Location};
pub use options::ParserOptions;
pub use stream::StreamWriter;
