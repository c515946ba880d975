//! Errors reported by the parser.

use thiserror::Error;

use crate::entities::EntityError;

/// A problem reported while parsing.
///
/// `WriteAfterEnd` and `EndAfterEnd` are returned to the caller and also
/// handed to [`Handler::on_error`](crate::parser::Handler::on_error).
/// Character reference problems are only reported to the handler; they
/// never stop the parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// [`Parser::write`](crate::parser::Parser::write) was called after
    /// [`Parser::end`](crate::parser::Parser::end).
    #[error("write() called after end()")]
    WriteAfterEnd,
    /// [`Parser::end`](crate::parser::Parser::end) was called twice.
    #[error("end() called after end()")]
    EndAfterEnd,
    /// A malformed character reference.
    #[error("{error} at byte {index}")]
    Entity {
        /// What was wrong with the reference.
        error: EntityError,
        /// Stream offset of the reference's `&`.
        index: usize,
    },
}
