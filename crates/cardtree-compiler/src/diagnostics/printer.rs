//! Snippet rendering for declaration diagnostics.
//!
//! Without a source, each diagnostic prints on one line with its byte
//! range. With a source, every diagnostic becomes an annotated snippet;
//! related locations (the first of two duplicate declarations, say) are
//! added as context annotations on the same snippet.

use std::fmt::Write;
use std::ops::Range;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

use super::message::{DiagnosticMessage, Severity};
use super::{Diagnostics, Span};

pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    /// Declaration source the spans point into.
    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    /// File name shown in snippet headers.
    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let written = match self.source {
            Some(source) => self.write_snippets(&mut out, source),
            None => self.write_lines(&mut out),
        };
        written.expect("String write never fails");
        out
    }

    fn write_lines(&self, w: &mut String) -> std::fmt::Result {
        for diag in self.diagnostics.iter() {
            writeln!(w, "{diag}")?;
        }
        Ok(())
    }

    fn write_snippets(&self, w: &mut String, source: &str) -> std::fmt::Result {
        let renderer = match self.colored {
            true => Renderer::styled(),
            false => Renderer::plain(),
        };
        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.push('\n');
            }
            let report = [self.group(diag, source)];
            write!(w, "{}", renderer.render(&report))?;
        }
        Ok(())
    }

    fn group<'a>(&self, diag: &'a DiagnosticMessage, source: &'a str) -> Group<'a>
    where
        's: 'a,
    {
        let primary = AnnotationKind::Primary
            .span(highlight(diag.span, source))
            .label(&diag.message);
        let mut snippet = Snippet::source(source).line_start(1).annotation(primary);
        if let Some(path) = self.path {
            snippet = snippet.path(path);
        }
        for related in &diag.related {
            snippet = snippet.annotation(
                AnnotationKind::Context
                    .span(highlight(related.span, source))
                    .label(&related.message),
            );
        }
        diag.severity().level().primary_title(&diag.message).element(snippet)
    }
}

impl Severity {
    fn level(self) -> Level<'static> {
        match self {
            Severity::Error => Level::ERROR,
            Severity::Warning => Level::WARNING,
        }
    }
}

/// Byte range to underline. Empty spans (end of input) widen to one byte
/// when the source has one.
fn highlight(span: Span, source: &str) -> Range<usize> {
    let range = span.range();
    if range.is_empty() {
        return range.start..(range.start + 1).min(source.len());
    }
    range
}

impl Diagnostics {
    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        DiagnosticsPrinter {
            diagnostics: self,
            source: None,
            path: None,
            colored: false,
        }
    }
}
