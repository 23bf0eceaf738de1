//! Splits input into chunks on the catalog's patterns.

use crate::catalog::{PatternCatalog, PunctuationKind};

/// A contiguous piece of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// The chunk text, borrowed from the input
    pub text: &'a str,
    /// Byte offset of `text` in the input
    pub offset: usize,
}

/// Splits `input` into chunks: every pattern match is its own chunk, and the
/// text between matches forms plain chunks. Empty chunks are never produced,
/// and concatenating the chunks gives back `input`.
pub fn split_chunks<'a>(input: &'a str, catalog: &PatternCatalog) -> Vec<Chunk<'a>> {
    let mut chunks = Vec::new();
    let mut last = 0;
    for found in catalog.splitter().find_iter(input) {
        if found.start() > last {
            chunks.push(Chunk {
                text: &input[last..found.start()],
                offset: last,
            });
        }
        if !found.is_empty() {
            chunks.push(Chunk {
                text: found.as_str(),
                offset: found.start(),
            });
        }
        last = found.end();
    }
    if last < input.len() {
        chunks.push(Chunk {
            text: &input[last..],
            offset: last,
        });
    }
    chunks
}

/// Splits `input` and classifies every chunk. `None` marks plain text.
pub fn tokenize<'a>(
    input: &'a str,
    catalog: &PatternCatalog,
) -> Vec<(Chunk<'a>, Option<PunctuationKind>)> {
    split_chunks(input, catalog)
        .into_iter()
        .map(|chunk| (chunk, catalog.classify(chunk.text)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<&str> {
        split_chunks(input, PatternCatalog::standard())
            .into_iter()
            .map(|chunk| chunk.text)
            .collect()
    }

    #[test]
    fn splits_on_every_pattern() {
        assert_eq!(
            texts(r#"<p>"Don't" -- wait...</p>"#),
            vec!["<p>", "\"", "Don", "'", "t", "\"", " ", "--", " wait", "...", "</p>"]
        );
    }

    #[test]
    fn chunks_cover_the_input() {
        let input = "a—b<!-- c \"d\" -->e....f'g<br/>\n<a\n href='x'>";
        let chunks = split_chunks(input, PatternCatalog::standard());
        let joined: String = chunks.iter().map(|c| c.text).collect();
        assert_eq!(joined, input);
        for chunk in &chunks {
            assert!(!chunk.text.is_empty());
            assert_eq!(&input[chunk.offset..chunk.offset + chunk.text.len()], chunk.text);
        }
    }

    #[test]
    fn tags_swallow_their_punctuation() {
        assert_eq!(
            texts(r#"x<a title="it's -- fine...">y"#),
            vec!["x", r#"<a title="it's -- fine...">"#, "y"]
        );
        assert_eq!(texts("<!-- 'a' -->"), vec!["<!-- 'a' -->"]);
    }

    #[test]
    fn triple_hyphen_is_dash_then_hyphen() {
        assert_eq!(texts("a---b"), vec!["a", "--", "-b"]);
    }

    #[test]
    fn empty_input_has_no_chunks() {
        assert!(split_chunks("", PatternCatalog::standard()).is_empty());
    }

    #[test]
    fn tokenize_marks_plain_text() {
        let tokens = tokenize("a'", PatternCatalog::standard());
        assert_eq!(tokens[0].1, None);
        assert_eq!(tokens[1].1, Some(PunctuationKind::Singlequote));
    }
}
