//! Per-conversion state shared by token construction and rendering.

use crate::error::{ConversionDiagnostics, ConversionError, ConversionWarning, SourceLocation};
use crate::options::TagPolicy;
use crate::tokenizer::Chunk;
use std::cell::Cell;

/// Tracks the tag stack, the double quote toggle and the position in the chunk
/// sequence. One value per conversion; it is never shared between runs.
#[derive(Debug)]
pub struct Context<'a> {
    input: &'a str,
    chunks: &'a [Chunk<'a>],
    cursor: Option<usize>,
    tag_stack: Vec<String>,
    within_quotation: bool,
    diagnostics: ConversionDiagnostics,
    // Last resolved `(offset, location)`; lookups resume from here.
    resolved: Cell<(usize, SourceLocation)>,
}

impl<'a> Context<'a> {
    /// Creates a context positioned before the first chunk.
    pub fn new(input: &'a str, chunks: &'a [Chunk<'a>]) -> Self {
        Self {
            input,
            chunks,
            cursor: None,
            tag_stack: Vec::new(),
            within_quotation: false,
            diagnostics: ConversionDiagnostics::new(),
            resolved: Cell::new((0, SourceLocation::new(1, 1))),
        }
    }

    /// Moves to the next chunk and returns it.
    pub fn advance(&mut self) -> Option<&'a Chunk<'a>> {
        let next = self.cursor.map_or(0, |idx| idx + 1);
        let chunk = self.chunks.get(next)?;
        self.cursor = Some(next);
        Some(chunk)
    }

    /// The chunk the cursor is on.
    pub fn current_chunk(&self) -> Option<&'a Chunk<'a>> {
        self.cursor.and_then(|idx| self.chunks.get(idx))
    }

    /// Raw text of the chunk before the current one; `None` at the start.
    pub fn previous_chunk(&self) -> Option<&'a str> {
        let idx = self.cursor?.checked_sub(1)?;
        self.chunks.get(idx).map(|chunk| chunk.text)
    }

    /// Puts the cursor back before the first chunk and clears all state.
    pub fn rewind(&mut self) {
        self.cursor = None;
        self.tag_stack.clear();
        self.within_quotation = false;
        self.diagnostics = ConversionDiagnostics::new();
        self.resolved.set((0, SourceLocation::new(1, 1)));
    }

    /// Opens an element.
    pub fn push_tag(&mut self, name: impl Into<String>) {
        self.tag_stack.push(name.into());
    }

    /// Closes the element `name` according to `policy`.
    pub fn pop_tag(&mut self, name: &str, policy: TagPolicy) -> Result<(), ConversionError> {
        let popped = self.tag_stack.pop();
        if popped.as_deref() == Some(name) {
            return Ok(());
        }

        let location = self.location();
        match policy {
            TagPolicy::Strict => {
                return Err(ConversionError::tag_mismatch(popped, name, location));
            }
            TagPolicy::Lenient => {
                log::debug!("ignoring </{name}> at {location}, innermost open element is {popped:?}");
                if let Some(tag) = popped.clone() {
                    self.tag_stack.push(tag);
                }
            }
            TagPolicy::Unravel => {
                let mut closed = popped.iter().cloned().collect::<Vec<_>>();
                while let Some(tag) = self.tag_stack.pop() {
                    let found = tag == name;
                    closed.push(tag);
                    if found {
                        break;
                    }
                }
                log::debug!("</{name}> at {location} unravelled {closed:?}");
            }
        }
        self.diagnostics
            .add_warning(ConversionWarning::RecoveredTagMismatch {
                location,
                expected: popped,
                found: name.to_string(),
            });
        Ok(())
    }

    /// True if any of `names` is open anywhere on the stack.
    pub fn in_tag_context<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names
            .iter()
            .any(|name| self.tag_stack.iter().any(|open| open == name.as_ref()))
    }

    /// Flips the quotation state and returns the value it had before.
    pub fn toggle_quote(&mut self) -> bool {
        let before = self.within_quotation;
        self.within_quotation = !before;
        before
    }

    /// Open elements, outermost first.
    pub fn open_tags(&self) -> &[String] {
        &self.tag_stack
    }

    /// Location of the current chunk.
    pub fn location(&self) -> SourceLocation {
        let offset = self.current_chunk().map_or(0, |chunk| chunk.offset);
        let (from, start) = self.resolved.get();
        let location = match self.input.get(from..) {
            Some(rest) if offset >= from => start.advanced_by(rest, offset - from),
            _ => SourceLocation::from_offset(self.input, offset),
        };
        self.resolved.set((offset, location));
        location
    }

    /// Record a non-fatal finding.
    pub fn warn(&mut self, warning: ConversionWarning) {
        self.diagnostics.add_warning(warning);
    }

    /// Consumes the context, reporting still-open elements.
    pub fn finish(mut self) -> ConversionDiagnostics {
        for name in std::mem::take(&mut self.tag_stack) {
            self.diagnostics
                .add_warning(ConversionWarning::UnclosedElement { name });
        }
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PatternCatalog;
    use crate::tokenizer::split_chunks;

    fn with_context<R>(input: &str, f: impl FnOnce(&mut Context<'_>) -> R) -> R {
        let chunks = split_chunks(input, PatternCatalog::standard());
        let mut ctx = Context::new(input, &chunks);
        f(&mut ctx)
    }

    #[test]
    fn cursor_walks_forward_and_looks_back() {
        with_context("a'b", |ctx| {
            assert_eq!(ctx.previous_chunk(), None);
            assert_eq!(ctx.advance().map(|c| c.text), Some("a"));
            assert_eq!(ctx.previous_chunk(), None);
            assert_eq!(ctx.advance().map(|c| c.text), Some("'"));
            assert_eq!(ctx.previous_chunk(), Some("a"));
            assert_eq!(ctx.advance().map(|c| c.text), Some("b"));
            assert_eq!(ctx.advance(), None);
            assert_eq!(ctx.current_chunk().map(|c| c.text), Some("b"));
        });
    }

    #[test]
    fn toggle_returns_previous_state() {
        with_context("", |ctx| {
            assert!(!ctx.toggle_quote());
            assert!(ctx.toggle_quote());
            assert!(!ctx.toggle_quote());
        });
    }

    #[test]
    fn strict_pop_rejects_mismatch() {
        with_context("<b>text</i>", |ctx| {
            ctx.push_tag("b");
            let err = ctx.pop_tag("i", TagPolicy::Strict).unwrap_err();
            assert!(matches!(
                err,
                ConversionError::TagMismatch { ref expected, ref found, .. }
                    if expected.as_deref() == Some("b") && found == "i"
            ));
        });
    }

    #[test]
    fn strict_pop_on_empty_stack() {
        with_context("</p>", |ctx| {
            let err = ctx.pop_tag("p", TagPolicy::Strict).unwrap_err();
            assert!(matches!(err, ConversionError::TagMismatch { expected: None, .. }));
        });
    }

    #[test]
    fn lenient_pop_keeps_stack() {
        with_context("", |ctx| {
            ctx.push_tag("div");
            ctx.push_tag("b");
            ctx.pop_tag("i", TagPolicy::Lenient).unwrap();
            assert_eq!(ctx.open_tags(), ["div", "b"]);
            ctx.pop_tag("b", TagPolicy::Lenient).unwrap();
            assert_eq!(ctx.open_tags(), ["div"]);
        });
    }

    #[test]
    fn unravel_pops_until_found() {
        with_context("", |ctx| {
            ctx.push_tag("div");
            ctx.push_tag("p");
            ctx.push_tag("b");
            ctx.pop_tag("p", TagPolicy::Unravel).unwrap();
            assert_eq!(ctx.open_tags(), ["div"]);
        });
    }

    #[test]
    fn unravel_empties_stack_when_not_found() {
        with_context("", |ctx| {
            ctx.push_tag("div");
            ctx.push_tag("b");
            ctx.pop_tag("i", TagPolicy::Unravel).unwrap();
            assert!(ctx.open_tags().is_empty());
        });
    }

    #[test]
    fn verbatim_detection_looks_at_whole_stack() {
        with_context("", |ctx| {
            ctx.push_tag("pre");
            ctx.push_tag("span");
            ctx.push_tag("b");
            assert!(ctx.in_tag_context(&["code", "pre"]));
            assert!(!ctx.in_tag_context(&["code"]));
            ctx.pop_tag("b", TagPolicy::Strict).unwrap();
            ctx.pop_tag("span", TagPolicy::Strict).unwrap();
            ctx.pop_tag("pre", TagPolicy::Strict).unwrap();
            assert!(!ctx.in_tag_context(&["pre"]));
        });
    }

    #[test]
    fn rewind_clears_state() {
        with_context("a b", |ctx| {
            ctx.advance();
            ctx.push_tag("p");
            ctx.toggle_quote();
            ctx.rewind();
            assert!(ctx.open_tags().is_empty());
            assert!(!ctx.toggle_quote());
            assert_eq!(ctx.advance().map(|c| c.text), Some("a b"));
        });
    }

    #[test]
    fn locations_resolve_incrementally() {
        let input = "<b>a</i>\nb</i>\n  c</i>";
        let chunks = split_chunks(input, PatternCatalog::standard());
        let mut ctx = Context::new(input, &chunks);
        let mut seen = Vec::new();
        while let Some(chunk) = ctx.advance() {
            if chunk.text == "</i>" {
                assert_eq!(
                    ctx.location(),
                    SourceLocation::from_offset(input, chunk.offset)
                );
                seen.push(ctx.location());
            }
        }
        assert_eq!(
            seen,
            vec![
                SourceLocation::new(1, 5),
                SourceLocation::new(2, 2),
                SourceLocation::new(3, 4),
            ]
        );

        ctx.rewind();
        ctx.advance();
        assert_eq!(ctx.location(), SourceLocation::new(1, 1));
    }

    #[test]
    fn finish_reports_unclosed_elements() {
        let diagnostics = with_context("", |ctx| {
            ctx.push_tag("p");
            ctx.pop_tag("q", TagPolicy::Lenient).unwrap();
            Context::finish(std::mem::replace(ctx, Context::new("", &[])))
        });
        assert_eq!(
            diagnostics.warnings[1],
            ConversionWarning::UnclosedElement { name: "p".into() }
        );
        assert!(matches!(
            diagnostics.warnings[0],
            ConversionWarning::RecoveredTagMismatch { .. }
        ));
    }
}
