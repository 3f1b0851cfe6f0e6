//! Structural signal extraction via tree-sitter.
//!
//! Parses one file snapshot in a JavaScript/TypeScript-family dialect and
//! counts four structural categories: function declarations, export
//! declarations, class declarations, and branch constructs. Parse failure
//! is a first-class outcome, never an error.

pub mod signal;

pub use signal::{extract_signal, Dialect, ParseOutcome, StructuralSignal};
