//! Symbol extraction for the background reasoning engine.
//!
//! The engine only needs a shallow view of a source file: where its functions
//! and classes start, and the text that makes up each declaration and body.
//! [`SymbolParser`] is the seam the engine calls through; [`RegexSymbolParser`]
//! is the default implementation, covering TypeScript/JavaScript, Python, Rust
//! and Go with pattern matching instead of a full grammar.

pub mod errors;
pub mod language;
pub mod regex_parser;
pub mod symbol;

pub use errors::{ParseError, Result};
pub use language::Language;
pub use regex_parser::RegexSymbolParser;
pub use symbol::{ParsedFile, Symbol, SymbolKind};

/// Extracts symbols from a file's text.
pub trait SymbolParser: Send + Sync {
    fn parse(&self, file_path: &str, content: &str) -> Result<ParsedFile>;
}
