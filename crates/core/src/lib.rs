#![deny(missing_docs)]
//! lexentity core: typographic entity conversion for HTML fragments.
//!
//! Straight quotes, double hyphens and runs of dots become curly quotes, em
//! dashes and ellipses, written as character references. Markup syntax and the
//! contents of verbatim elements (`code`, `pre` by default) pass through
//! unchanged.

/// Open tag body decomposition.
pub mod attributes;
/// Ordered punctuation patterns.
pub mod catalog;
/// Per-conversion tag stack and quote state.
pub mod context;
/// Embedded named character reference table.
pub mod entities;
/// Error, warning and diagnostic types.
pub mod error;
/// Entity substitution and typographic references.
pub mod escape;
/// Conversion options.
pub mod options;
/// Conversion driver.
pub mod render;
/// Token variants and rendering.
pub mod token;
/// Chunk splitting and classification.
pub mod tokenizer;

pub use attributes::{AttributePart, AttributeScan, PartKind, scan_attributes};
pub use catalog::{PatternCatalog, PunctuationKind};
pub use context::Context;
pub use error::{ConversionDiagnostics, ConversionError, ConversionWarning, SourceLocation};
pub use escape::{numeric_reference, substitute_entities};
pub use options::{ConvertOptions, DEFAULT_VERBATIM_TAGS, EntityStyle, TagPolicy};
pub use render::{Conversion, Converter, convert, convert_bytes, convert_with_options};
pub use token::Token;
pub use tokenizer::{Chunk, split_chunks, tokenize};
