//! Decomposes an open tag body into syntax and value parts.
//!
//! Only [`PartKind::Value`] parts are ever entity-substituted; everything else
//! is copied through so the markup comes out byte for byte.

use once_cell::sync::Lazy;
use regex::Regex;

static DELIMITERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\s+|['"=]"#).expect("delimiter pattern is valid"));

/// What a piece of a tag body is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    /// The element name
    TagName,
    /// An attribute name (or any stray token outside a value)
    AttributeName,
    /// `=`
    Equals,
    /// The quote opening or closing a value
    Quote,
    /// Attribute value text
    Value,
    /// Whitespace between parts
    Space,
}

/// One piece of a tag body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributePart<'a> {
    /// Part kind
    pub kind: PartKind,
    /// Text, borrowed from the tag
    pub text: &'a str,
}

/// Result of scanning a tag body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeScan<'a> {
    /// Parts in order; concatenated they give back the body.
    pub parts: Vec<AttributePart<'a>>,
    /// Set when the body could not be decomposed cleanly.
    pub malformed: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Begin,
    None,
    AfterName,
    Equals,
    InValue(char),
    Unquoted,
}

/// Splits `body` on whitespace runs, quotes and `=` (keeping the delimiters as
/// their own pieces) and drops empty pieces.
fn split_body(body: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut last = 0;
    for found in DELIMITERS.find_iter(body) {
        if found.start() > last {
            pieces.push(&body[last..found.start()]);
        }
        pieces.push(found.as_str());
        last = found.end();
    }
    if last < body.len() {
        pieces.push(&body[last..]);
    }
    pieces
}

fn is_space(piece: &str) -> bool {
    piece.chars().all(char::is_whitespace)
}

fn quote_char(piece: &str) -> Option<char> {
    match piece {
        "\"" => Some('"'),
        "'" => Some('\''),
        _ => None,
    }
}

/// Scans a tag body (the text between `<` and `>`).
///
/// A value runs until the quote character that opened it appears again, so a
/// value may freely contain the other quote. A value whose quote never closes
/// keeps the rest of the body as value text and is reported as malformed.
pub fn scan_attributes(body: &str) -> AttributeScan<'_> {
    let mut scan = AttributeScan::default();
    let mut state = ScanState::Begin;

    for piece in split_body(body) {
        let (kind, next) = match state {
            ScanState::Begin => (PartKind::TagName, ScanState::None),
            ScanState::InValue(quote) if quote_char(piece) == Some(quote) => {
                (PartKind::Quote, ScanState::None)
            }
            ScanState::InValue(_) => (PartKind::Value, state),
            ScanState::Equals if is_space(piece) => (PartKind::Space, state),
            ScanState::Equals => match quote_char(piece) {
                Some(quote) => (PartKind::Quote, ScanState::InValue(quote)),
                None => (PartKind::Value, ScanState::Unquoted),
            },
            ScanState::Unquoted if is_space(piece) => (PartKind::Space, ScanState::None),
            ScanState::Unquoted => (PartKind::Value, state),
            ScanState::None | ScanState::AfterName if is_space(piece) => (PartKind::Space, state),
            ScanState::AfterName if piece == "=" => (PartKind::Equals, ScanState::Equals),
            // A name with no `=` after it is a valueless attribute; this piece
            // starts the next one.
            ScanState::None | ScanState::AfterName => {
                (PartKind::AttributeName, ScanState::AfterName)
            }
        };
        scan.parts.push(AttributePart { kind, text: piece });
        state = next;
    }

    scan.malformed = match state {
        ScanState::InValue(quote) => {
            Some(format!("attribute value quoted with {quote} is never closed"))
        }
        ScanState::Equals => Some("`=` is not followed by a value".to_string()),
        _ => None,
    };
    scan
}
