//! Drives tokenization, token construction and rendering for one input.

use crate::catalog::PatternCatalog;
use crate::context::Context;
use crate::error::{ConversionDiagnostics, ConversionError};
use crate::escape::decode_utf8;
use crate::options::ConvertOptions;
use crate::token::Token;
use crate::tokenizer::split_chunks;

/// Output of a successful conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversion {
    /// The converted fragment
    pub output: String,
    /// Warnings gathered on the way
    pub diagnostics: ConversionDiagnostics,
}

/// Reusable converter: options plus the pattern catalog.
///
/// Holds no per-run state, so one converter can serve any number of
/// conversions, from any number of threads.
#[derive(Debug, Clone)]
pub struct Converter {
    options: ConvertOptions,
    verbatim_tags: Vec<String>,
    catalog: PatternCatalog,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConvertOptions::default())
    }
}

impl Converter {
    /// Create a converter using the standard catalog.
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            verbatim_tags: options.normalized_verbatim_tags(),
            options,
            catalog: PatternCatalog::default(),
        }
    }

    /// Swap in a different pattern catalog.
    pub fn with_catalog(mut self, catalog: PatternCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Options in effect.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Converts `input`, all or nothing.
    pub fn convert(&self, input: &str) -> Result<Conversion, ConversionError> {
        let chunks = split_chunks(input, &self.catalog);
        log::trace!("converting {} bytes in {} chunks", input.len(), chunks.len());

        let mut ctx = Context::new(input, &chunks);
        let mut output = String::with_capacity(input.len() + input.len() / 8);
        while let Some(chunk) = ctx.advance() {
            let kind = self.catalog.classify(chunk.text);
            let token = Token::build(chunk.text, kind, &mut ctx, self.options.tag_policy)?;
            let verbatim = ctx.in_tag_context(&self.verbatim_tags);
            output.push_str(&token.render(verbatim, self.options.entity_style));
        }

        Ok(Conversion {
            output,
            diagnostics: ctx.finish(),
        })
    }

    /// Converts raw bytes, skipping sequences that are not valid UTF-8.
    pub fn convert_bytes(&self, input: &[u8]) -> Result<Conversion, ConversionError> {
        let (text, skipped) = decode_utf8(input);
        let mut conversion = self.convert(&text)?;
        if !skipped.is_empty() {
            let mut warnings = skipped;
            warnings.append(&mut conversion.diagnostics.warnings);
            conversion.diagnostics.warnings = warnings;
        }
        Ok(conversion)
    }
}

/// Converts `input` with default options.
///
/// ```
/// let out = lexentity_core::convert(r#"<p>"Hi" -- it's me...</p>"#).unwrap();
/// assert_eq!(
///     out,
///     "<p>&#8220;Hi&#8221; &#8201;&#8212;&#8201; it&#8217;s me&#8230;</p>"
/// );
/// ```
pub fn convert(input: &str) -> Result<String, ConversionError> {
    Converter::default()
        .convert(input)
        .map(|conversion| conversion.output)
}

/// Converts `input` with `options`, returning output and diagnostics.
pub fn convert_with_options(
    input: &str,
    options: &ConvertOptions,
) -> Result<Conversion, ConversionError> {
    Converter::new(options.clone()).convert(input)
}

/// Converts raw bytes with `options`; invalid UTF-8 is skipped and reported.
pub fn convert_bytes(input: &[u8], options: &ConvertOptions) -> Result<Conversion, ConversionError> {
    Converter::new(options.clone()).convert_bytes(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PunctuationKind;
    use crate::error::ConversionWarning;
    use crate::options::TagPolicy;

    #[test]
    fn default_converter_uses_code_and_pre() {
        let converter = Converter::default();
        assert_eq!(
            converter.convert("<code>'x'</code> 'y'").unwrap().output,
            "<code>'x'</code> &#8216;y&#8217;"
        );
    }

    #[test]
    fn verbatim_tags_match_case_insensitively() {
        let converter =
            Converter::new(ConvertOptions::default().with_verbatim_tags(["KBD"]));
        assert_eq!(
            converter.convert("<Kbd>--</Kbd>--").unwrap().output,
            "<Kbd>--</Kbd>&#8201;&#8212;&#8201;"
        );
    }

    #[test]
    fn converter_is_reusable_between_runs() {
        let converter = Converter::default();
        let first = converter.convert("\"open").unwrap();
        let second = converter.convert("\"open").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.output, "&#8220;open");
    }

    #[test]
    fn unclosed_elements_are_reported() {
        let conversion = Converter::default().convert("<div><p>text").unwrap();
        assert_eq!(
            conversion.diagnostics.warnings,
            vec![
                ConversionWarning::UnclosedElement { name: "div".into() },
                ConversionWarning::UnclosedElement { name: "p".into() },
            ]
        );
    }

    #[test]
    fn custom_catalog_drives_splitting() {
        let catalog = PatternCatalog::new([(PunctuationKind::Emdash, "~~")]).unwrap();
        let converter = Converter::default().with_catalog(catalog);
        assert_eq!(
            converter.convert("a~~b--c").unwrap().output,
            "a&#8201;&#8212;&#8201;b--c"
        );
    }

    #[test]
    fn bytes_warnings_come_first() {
        let options = ConvertOptions::default().with_tag_policy(TagPolicy::Lenient);
        let conversion = convert_bytes(b"<b>\xff</i>", &options).unwrap();
        assert_eq!(conversion.output, "<b></i>");
        assert!(matches!(
            conversion.diagnostics.warnings.as_slice(),
            [
                ConversionWarning::UnsupportedCodepoint { offset: 3, .. },
                ConversionWarning::RecoveredTagMismatch { .. },
                ConversionWarning::UnclosedElement { .. },
            ]
        ));
    }
}
