use thiserror::Error;

/// Position of a chunk inside the converted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number in characters (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Resolve a byte offset into `input` to a line/column pair.
    ///
    /// Offsets past the end of `input` resolve to the position just after the
    /// last character.
    pub fn from_offset(input: &str, offset: usize) -> Self {
        Self::new(1, 1).advanced_by(input, offset)
    }

    /// The location reached after reading the first `offset` bytes of `text`,
    /// starting from `self`.
    pub fn advanced_by(self, text: &str, offset: usize) -> Self {
        let Self {
            mut line,
            mut column,
        } = self;
        for (idx, c) in text.char_indices() {
            if idx >= offset {
                break;
            }
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self { line, column }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

fn open_label(expected: &Option<String>) -> String {
    match expected {
        Some(name) => format!("<{name}>"),
        None => "nothing (no element is open)".to_string(),
    }
}

/// Fatal conversion errors. No output is produced when one of these occurs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// A close tag did not match the innermost open element under the strict policy.
    #[error("closing tag </{found}> at {location} does not close {}", open_label(.expected))]
    TagMismatch {
        /// Innermost open element, if any
        expected: Option<String>,
        /// Name carried by the close tag
        found: String,
        /// Where the close tag starts
        location: SourceLocation,
    },
}

impl ConversionError {
    /// Create a tag mismatch error
    pub fn tag_mismatch(
        expected: Option<String>,
        found: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self::TagMismatch {
            expected,
            found: found.into(),
            location,
        }
    }
}

/// Non-fatal findings collected while converting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionWarning {
    /// An open tag body could not be decomposed cleanly; the remainder was kept as value text.
    MalformedAttributeSyntax {
        /// Where the tag starts
        location: SourceLocation,
        /// Tag name
        tag: String,
        /// What went wrong
        message: String,
    },
    /// A close tag mismatch absorbed by the lenient or unravel policy.
    RecoveredTagMismatch {
        /// Where the close tag starts
        location: SourceLocation,
        /// Innermost open element at that point, if any
        expected: Option<String>,
        /// Name carried by the close tag
        found: String,
    },
    /// An element still open when the input ended.
    UnclosedElement {
        /// Element name
        name: String,
    },
    /// Bytes that did not decode as UTF-8 and were skipped.
    UnsupportedCodepoint {
        /// Byte offset of the invalid sequence in the raw input
        offset: usize,
        /// The skipped bytes
        bytes: Vec<u8>,
    },
}

impl std::fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversionWarning::MalformedAttributeSyntax {
                location,
                tag,
                message,
            } => write!(f, "{location}: malformed attributes in <{tag}>: {message}"),
            ConversionWarning::RecoveredTagMismatch {
                location,
                expected,
                found,
            } => write!(
                f,
                "{location}: closing tag </{found}> does not close {}",
                open_label(expected)
            ),
            ConversionWarning::UnclosedElement { name } => {
                write!(f, "<{name}> is never closed")
            }
            ConversionWarning::UnsupportedCodepoint { offset, bytes } => {
                write!(f, "byte offset {offset}: skipped invalid UTF-8 {bytes:02x?}")
            }
        }
    }
}

/// Collection of warnings gathered during one conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionDiagnostics {
    /// List of non-fatal warnings
    pub warnings: Vec<ConversionWarning>,
}

impl ConversionDiagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning to the diagnostics collection
    pub fn add_warning(&mut self, warning: ConversionWarning) {
        self.warnings.push(warning);
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get total count of all diagnostics
    pub fn count(&self) -> usize {
        self.warnings.len()
    }
}
