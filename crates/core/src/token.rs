//! Classified chunks and how each renders.

use crate::attributes::{AttributePart, PartKind, scan_attributes};
use crate::catalog::PunctuationKind;
use crate::context::Context;
use crate::error::{ConversionError, ConversionWarning};
use crate::escape::{
    ELLIPSIS, EM_DASH, LEFT_DOUBLE_QUOTE, LEFT_SINGLE_QUOTE, RIGHT_DOUBLE_QUOTE,
    RIGHT_SINGLE_QUOTE, substitute_entities,
};
use crate::options::{EntityStyle, TagPolicy};
use std::borrow::Cow;

/// Elements that never have a close tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// One classified chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Text between punctuation and tags
    Plaintext {
        /// Source text
        raw: &'a str,
    },
    /// `'`, already resolved to an opening quote or an apostrophe
    Singlequote {
        /// Source text
        raw: &'a str,
        /// Character reference to emit
        rendered: &'static str,
    },
    /// `"`, already resolved to an opening or closing quote
    DoubleQuote {
        /// Source text
        raw: &'a str,
        /// Character reference to emit
        rendered: &'static str,
    },
    /// Three or more dots
    Ellipsis {
        /// Source text
        raw: &'a str,
    },
    /// `—` or `--`
    Emdash {
        /// Source text
        raw: &'a str,
    },
    /// `<name ...>`
    OpenTag {
        /// Source text
        raw: &'a str,
        /// Lowercased element name
        name: String,
        /// Decomposed body
        parts: Vec<AttributePart<'a>>,
    },
    /// `<name ... />` or a void element
    SelfClosingTag {
        /// Source text
        raw: &'a str,
        /// Lowercased element name
        name: String,
        /// Decomposed body
        parts: Vec<AttributePart<'a>>,
    },
    /// `</name>`
    CloseTag {
        /// Source text
        raw: &'a str,
        /// Lowercased element name
        name: String,
    },
    /// Comments, CDATA, doctype, processing instructions and nameless brackets
    Markup {
        /// Source text
        raw: &'a str,
    },
}

/// Lowercased element name following `<` or `</`, if there is one.
pub fn tag_name(tag: &str) -> Option<String> {
    let rest = tag.strip_prefix('<')?;
    let rest = rest.strip_prefix('/').unwrap_or(rest);
    let end = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-' || c == ':'))
        .unwrap_or(rest.len());
    (end > 0).then(|| rest[..end].to_ascii_lowercase())
}

impl<'a> Token<'a> {
    /// Builds the token for `raw`, applying its side effects to `ctx`:
    /// tags push and pop the stack, double quotes flip the quote state.
    pub fn build(
        raw: &'a str,
        kind: Option<PunctuationKind>,
        ctx: &mut Context<'a>,
        policy: TagPolicy,
    ) -> Result<Self, ConversionError> {
        let token = match kind {
            None => Token::Plaintext { raw },
            Some(PunctuationKind::Singlequote) => {
                let opens = match ctx.previous_chunk() {
                    None => true,
                    Some(prev) => prev.chars().next_back().is_some_and(char::is_whitespace),
                };
                let rendered = if opens {
                    LEFT_SINGLE_QUOTE
                } else {
                    RIGHT_SINGLE_QUOTE
                };
                Token::Singlequote { raw, rendered }
            }
            Some(PunctuationKind::DoubleQuote) => {
                let rendered = if ctx.toggle_quote() {
                    RIGHT_DOUBLE_QUOTE
                } else {
                    LEFT_DOUBLE_QUOTE
                };
                Token::DoubleQuote { raw, rendered }
            }
            Some(PunctuationKind::Ellipsis) => Token::Ellipsis { raw },
            Some(PunctuationKind::Emdash) => Token::Emdash { raw },
            Some(PunctuationKind::Tag) => Self::build_tag(raw, ctx, policy)?,
        };
        Ok(token)
    }

    fn build_tag(
        raw: &'a str,
        ctx: &mut Context<'a>,
        policy: TagPolicy,
    ) -> Result<Self, ConversionError> {
        if raw.starts_with("<!") || raw.starts_with("<?") {
            return Ok(Token::Markup { raw });
        }
        let Some(name) = tag_name(raw) else {
            return Ok(Token::Markup { raw });
        };

        if raw.starts_with("</") {
            ctx.pop_tag(&name, policy)?;
            return Ok(Token::CloseTag { raw, name });
        }

        let body = raw.strip_prefix('<').unwrap_or(raw);
        let body = body.strip_suffix('>').unwrap_or(body);
        let scan = scan_attributes(body);
        if let Some(message) = scan.malformed {
            let location = ctx.location();
            log::warn!("{location}: malformed attributes in <{name}>: {message}");
            ctx.warn(ConversionWarning::MalformedAttributeSyntax {
                location,
                tag: name.clone(),
                message,
            });
        }

        if raw.ends_with("/>") || VOID_ELEMENTS.contains(&name.as_str()) {
            Ok(Token::SelfClosingTag {
                raw,
                name,
                parts: scan.parts,
            })
        } else {
            ctx.push_tag(name.clone());
            Ok(Token::OpenTag {
                raw,
                name,
                parts: scan.parts,
            })
        }
    }

    /// The source text of this token.
    pub fn raw(&self) -> &'a str {
        match self {
            Token::Plaintext { raw }
            | Token::Singlequote { raw, .. }
            | Token::DoubleQuote { raw, .. }
            | Token::Ellipsis { raw }
            | Token::Emdash { raw }
            | Token::OpenTag { raw, .. }
            | Token::SelfClosingTag { raw, .. }
            | Token::CloseTag { raw, .. }
            | Token::Markup { raw } => *raw,
        }
    }

    /// Renders the token. Inside a verbatim element every token renders as its
    /// source text.
    pub fn render(&self, verbatim: bool, style: EntityStyle) -> Cow<'a, str> {
        if verbatim {
            return Cow::Borrowed(self.raw());
        }
        match self {
            Token::Plaintext { raw } => substitute_entities(*raw, style),
            Token::Singlequote { rendered, .. } | Token::DoubleQuote { rendered, .. } => {
                Cow::Borrowed(*rendered)
            }
            Token::Ellipsis { .. } => Cow::Borrowed(ELLIPSIS),
            Token::Emdash { .. } => Cow::Borrowed(EM_DASH),
            Token::OpenTag { parts, .. } | Token::SelfClosingTag { parts, .. } => {
                let mut out = String::with_capacity(self.raw().len() + 8);
                out.push('<');
                for part in parts {
                    match part.kind {
                        PartKind::Value => out.push_str(&substitute_entities(part.text, style)),
                        _ => out.push_str(part.text),
                    }
                }
                out.push('>');
                Cow::Owned(out)
            }
            Token::CloseTag { raw, .. } | Token::Markup { raw } => Cow::Borrowed(*raw),
        }
    }
}
