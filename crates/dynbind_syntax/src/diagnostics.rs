//! Diagnostics and error reporting for contract declarations.
//!
//! Errors carry a byte [`Span`] into the declaration source and render through miette with a source excerpt
//! around the offending line.

use std::fmt;

use miette::{GraphicalReportHandler, GraphicalTheme, LabeledSpan, NamedSource, Report, SourceSpan};

use crate::ast::Span;

/// An error in a contract declaration, with location information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct DeclError {
    pub message: String,
    pub span: Span,
    pub kind: ErrorKind,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl DeclError {
    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            kind: ErrorKind::Syntax,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    /// A well-formed declaration that does not describe a valid contract (unknown type, duplicate method, ...).
    pub fn contract(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            kind: ErrorKind::Contract,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Contract,
}

impl ErrorKind {
    /// Stable diagnostic code.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Syntax => "dynbind::syntax",
            ErrorKind::Contract => "dynbind::contract",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Syntax => write!(f, "syntax error"),
            ErrorKind::Contract => write!(f, "contract error"),
        }
    }
}

impl miette::Diagnostic for DeclError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.notes.is_empty() && self.hints.is_empty() {
            return None;
        }
        let lines: Vec<&str> = self.notes.iter().chain(&self.hints).map(String::as_str).collect();
        Some(Box::new(lines.join("\n")))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = SourceSpan::from(self.span.start..self.span.end.max(self.span.start));
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.kind.to_string()),
            span,
        ))))
    }
}

/// Render errors with source context, one report per error, without ANSI colors.
///
/// ## Parameters
/// - `file_name`: Name shown in the report header.
/// - `source`: The declaration source the spans point into.
pub fn render(file_name: &str, source: &str, errors: &[DeclError]) -> String {
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    let mut out = String::new();
    for err in errors {
        let report = Report::new(err.clone()).with_source_code(NamedSource::new(file_name, source.to_string()));
        if handler.render_report(&mut out, &*report).is_err() {
            out.push_str(&format!("{}: {}\n", err.kind, err.message));
        }
    }
    out
}

/// Get line number, column number, and line text for a byte offset
pub fn line_info(source: &str, offset: usize) -> (usize, usize, &str) {
    let offset = offset.min(source.len());
    let mut line_num = 1;
    let mut line_start = 0;

    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line_num += 1;
            line_start = i + 1;
        }
    }

    let line_end = source[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(source.len());

    let line_text = &source[line_start..line_end];
    let col_num = offset - line_start + 1;

    (line_num, col_num, line_text)
}
