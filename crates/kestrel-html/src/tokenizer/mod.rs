//! Streaming markup tokenizer.
//!
//! The tokenizer turns a stream of text chunks into structural callbacks:
//! tag names, attribute pieces, text runs, comments, CDATA, declarations and
//! processing instructions. It does not build anything itself; see
//! [`crate::parser`] for the layer that applies element nesting rules.

/// The callback interface the tokenizer drives.
pub mod callbacks;
/// The tokenizer state machine.
pub mod core;
/// Byte classes and emission helpers.
mod helpers;
/// Chunk buffering with stable stream offsets.
pub mod input;
/// Tokenizer states.
pub mod states;

pub use self::core::{PauseHandle, Tokenizer, TokenizerOptions};
pub use callbacks::{Callbacks, QuoteType, Span};
pub use input::BufferChain;
pub use states::State;
