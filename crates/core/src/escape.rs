//! Entity substitution for text and attribute values.
//!
//! Typographic punctuation produced by the tokens is always written as numeric
//! references so the output does not depend on which named references a
//! consumer knows about. General text goes through the entity table and comes
//! out named or numeric depending on [`EntityStyle`].

use crate::entities;
use crate::error::ConversionWarning;
use crate::options::EntityStyle;
use std::borrow::Cow;

/// `‘`
pub const LEFT_SINGLE_QUOTE: &str = "&#8216;";
/// `’`, also used for apostrophes
pub const RIGHT_SINGLE_QUOTE: &str = "&#8217;";
/// `“`
pub const LEFT_DOUBLE_QUOTE: &str = "&#8220;";
/// `”`
pub const RIGHT_DOUBLE_QUOTE: &str = "&#8221;";
/// `…`
pub const ELLIPSIS: &str = "&#8230;";
/// Thin space, em dash, thin space
pub const EM_DASH: &str = "&#8201;&#8212;&#8201;";

/// Formats `c` as a decimal character reference.
///
/// ```
/// assert_eq!(lexentity_core::numeric_reference('—'), "&#8212;");
/// ```
pub fn numeric_reference(c: char) -> String {
    format!("&#{};", c as u32)
}

/// Replaces reserved and table characters in `text` with character references.
///
/// `&` that already starts a character reference is left alone, so running the
/// substitution on its own output changes nothing.
pub fn substitute_entities(text: &str, style: EntityStyle) -> Cow<'_, str> {
    if !text
        .chars()
        .any(|c| matches!(c, '&' | '<' | '>' | '"' | '\'') || entities::lookup(c).is_some())
    {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for (idx, c) in text.char_indices() {
        match c {
            '&' if starts_reference(&text[idx..]) => out.push('&'),
            '&' | '<' | '>' | '"' => push_reserved(c, style, &mut out),
            '\'' => out.push_str("&#39;"),
            _ => match (entities::lookup(c), style) {
                (Some(name), EntityStyle::Named) => {
                    out.push('&');
                    out.push_str(name);
                    out.push(';');
                }
                (Some(_), EntityStyle::Numeric) => out.push_str(&numeric_reference(c)),
                (None, _) => out.push(c),
            },
        }
    }
    Cow::Owned(out)
}

fn push_reserved(c: char, style: EntityStyle, out: &mut String) {
    if style == EntityStyle::Numeric {
        out.push_str(&numeric_reference(c));
        return;
    }
    out.push_str(match c {
        '&' => "&amp;",
        '<' => "&lt;",
        '>' => "&gt;",
        _ => "&quot;",
    });
}

/// True when `s` (starting at an `&`) begins with `&name;`, `&#123;` or `&#x1F;`.
fn starts_reference(s: &str) -> bool {
    let body = &s.as_bytes()[1..];
    let (digits, valid): (usize, fn(&u8) -> bool) = match body {
        [b'#', b'x' | b'X', ..] => (2, u8::is_ascii_hexdigit),
        [b'#', ..] => (1, u8::is_ascii_digit),
        [first, ..] if first.is_ascii_alphabetic() => (0, u8::is_ascii_alphanumeric),
        _ => return false,
    };
    let run = body[digits..].iter().take_while(|b| valid(*b)).count();
    run > 0 && body.get(digits + run) == Some(&b';')
}

/// Decodes `bytes` as UTF-8, dropping invalid sequences.
///
/// Every dropped sequence is reported as an `UnsupportedCodepoint` warning.
pub fn decode_utf8(bytes: &[u8]) -> (Cow<'_, str>, Vec<ConversionWarning>) {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return (Cow::Borrowed(text), Vec::new());
    }

    let mut text = String::with_capacity(bytes.len());
    let mut warnings = Vec::new();
    let mut offset = 0;
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        offset += chunk.valid().len();
        let invalid = chunk.invalid();
        if !invalid.is_empty() {
            log::warn!("skipping invalid UTF-8 at byte {offset}: {invalid:02x?}");
            warnings.push(ConversionWarning::UnsupportedCodepoint {
                offset,
                bytes: invalid.to_vec(),
            });
            offset += invalid.len();
        }
    }
    (Cow::Owned(text), warnings)
}
