//! Ordered punctuation patterns used to split and classify input.

use once_cell::sync::Lazy;
use regex::Regex;

/// Punctuation class a chunk can be classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationKind {
    /// `'`
    Singlequote,
    /// Three or more dots
    Ellipsis,
    /// `"`
    DoubleQuote,
    /// Anything in angle brackets, including comments and CDATA
    Tag,
    /// `—` or `--`
    Emdash,
}

/// Patterns in priority order. Earlier entries win when a chunk matches several.
pub const STANDARD_PATTERNS: &[(PunctuationKind, &str)] = &[
    (PunctuationKind::Singlequote, "'"),
    (PunctuationKind::Ellipsis, r"\.{3,}"),
    (PunctuationKind::DoubleQuote, "\""),
    // A quoted attribute value may hold `>`. A quote that never closes falls
    // back to the first `>`.
    (
        PunctuationKind::Tag,
        r#"(?s:<!--.*?-->)|(?s:<!\[CDATA\[.*?\]\]>)|<(?:[^>"']|=\s*"[^"]*"|=\s*'[^']*')*>|<[^>]*>"#,
    ),
    (PunctuationKind::Emdash, "\u{2014}|--"),
];

static STANDARD: Lazy<PatternCatalog> = Lazy::new(|| {
    PatternCatalog::new(STANDARD_PATTERNS.iter().copied())
        .expect("standard punctuation patterns are valid")
});

#[derive(Debug, Clone)]
struct CatalogEntry {
    kind: PunctuationKind,
    anchored: Regex,
}

/// Ordered `(kind, pattern)` list plus the alternation used to split input.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    entries: Vec<CatalogEntry>,
    splitter: Regex,
}

impl PatternCatalog {
    /// Builds a catalog from `(kind, pattern)` pairs, highest priority first.
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = (PunctuationKind, S)>,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();
        let mut alternatives = Vec::new();
        for (kind, pattern) in patterns {
            let pattern = pattern.as_ref();
            entries.push(CatalogEntry {
                kind,
                anchored: Regex::new(&format!(r"\A(?:{pattern})\z"))?,
            });
            alternatives.push(format!("({pattern})"));
        }
        let splitter = Regex::new(&alternatives.join("|"))?;
        Ok(Self { entries, splitter })
    }

    /// The built-in catalog.
    pub fn standard() -> &'static PatternCatalog {
        &STANDARD
    }

    /// Kind of the first entry that matches the whole of `chunk`.
    pub fn classify(&self, chunk: &str) -> Option<PunctuationKind> {
        self.entries
            .iter()
            .find(|entry| entry.anchored.is_match(chunk))
            .map(|entry| entry.kind)
    }

    /// Kinds in priority order.
    pub fn kinds(&self) -> impl Iterator<Item = PunctuationKind> + '_ {
        self.entries.iter().map(|entry| entry.kind)
    }

    pub(crate) fn splitter(&self) -> &Regex {
        &self.splitter
    }
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self::standard().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_order() {
        let kinds: Vec<_> = PatternCatalog::standard().kinds().collect();
        assert_eq!(
            kinds,
            vec![
                PunctuationKind::Singlequote,
                PunctuationKind::Ellipsis,
                PunctuationKind::DoubleQuote,
                PunctuationKind::Tag,
                PunctuationKind::Emdash,
            ]
        );
    }

    #[test]
    fn classifies_whole_chunks_only() {
        let catalog = PatternCatalog::standard();
        assert_eq!(catalog.classify("'"), Some(PunctuationKind::Singlequote));
        assert_eq!(catalog.classify("...."), Some(PunctuationKind::Ellipsis));
        assert_eq!(catalog.classify("\""), Some(PunctuationKind::DoubleQuote));
        assert_eq!(catalog.classify("<p class=\"x\">"), Some(PunctuationKind::Tag));
        assert_eq!(catalog.classify("<!-- a\nb -->"), Some(PunctuationKind::Tag));
        assert_eq!(catalog.classify("--"), Some(PunctuationKind::Emdash));
        assert_eq!(catalog.classify("\u{2014}"), Some(PunctuationKind::Emdash));

        assert_eq!(catalog.classify(".."), None);
        assert_eq!(catalog.classify("---"), None);
        assert_eq!(catalog.classify("x'"), None);
        assert_eq!(catalog.classify("plain words"), None);
    }

    #[test]
    fn tags_may_quote_a_closing_bracket() {
        let catalog = PatternCatalog::standard();
        let found: Vec<_> = catalog
            .splitter()
            .find_iter(r#"<a title="a>b" data-x='>'>x"#)
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec![r#"<a title="a>b" data-x='>'>"#]);

        let unterminated: Vec<_> = catalog
            .splitter()
            .find_iter(r#"<a title="open>text"#)
            .map(|m| m.as_str())
            .collect();
        assert_eq!(unterminated, vec![r#"<a title="open>"#]);
        assert_eq!(
            catalog.classify(r#"<p onclick="if(a>b)f()">"#),
            Some(PunctuationKind::Tag)
        );
    }

    #[test]
    fn first_registered_pattern_wins() {
        let catalog = PatternCatalog::new([
            (PunctuationKind::Emdash, "-+"),
            (PunctuationKind::Ellipsis, "--"),
        ])
        .unwrap();
        assert_eq!(catalog.classify("--"), Some(PunctuationKind::Emdash));
    }

    #[test]
    fn rejects_invalid_patterns() {
        assert!(PatternCatalog::new([(PunctuationKind::Tag, "(<")]).is_err());
    }
}
