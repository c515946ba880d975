//! Common utilities for the kestrel parser.
//!
//! This crate provides shared infrastructure used by the tokenizer, the
//! tree builder and the command-line front end:
//! - **Warning System** - deduplicated diagnostics routed through [`log`]

pub mod warning;
