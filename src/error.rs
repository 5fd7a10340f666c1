use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::fmt;
use thiserror::Error;

/// Byte range into a source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    LexError,
}

/// A diagnostic produced while driving the scanner over a source file.
#[derive(Debug, Clone)]
pub struct AuraError {
    pub kind: ErrorKind,
    pub span: Span,
    pub message: String,
    pub help: Option<String>,
}

impl AuraError {
    pub fn new(kind: ErrorKind, span: Span, message: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: None,
        }
    }

    pub fn new_with_help(kind: ErrorKind, span: Span, message: String, help: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: Some(help),
        }
    }

    pub fn lex_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::LexError, span, message)
    }

    pub fn lex_error_with_help(span: Span, message: String, help: String) -> Self {
        Self::new_with_help(ErrorKind::LexError, span, message, help)
    }

    /// Renders the diagnostic to stderr.
    pub fn report(&self, source: &str, filename: Option<&str>) {
        let filename = filename.unwrap_or("<repl>");

        let color = match self.kind {
            ErrorKind::LexError => Color::Red,
        };

        let kind_str = match self.kind {
            ErrorKind::LexError => "Lexical Error",
        };

        // ariadne counts offsets in chars, the scanner in bytes.
        let start = char_offset(source, self.span.start);
        let end = char_offset(source, self.span.end).max(start + 1);

        let mut report_builder = Report::build(ReportKind::Error, filename, start)
            .with_message(format!("{}: {}", kind_str.fg(color), self.message))
            .with_label(
                Label::new((filename, start..end))
                    .with_message(&self.message)
                    .with_color(color),
            );

        if let Some(ref help_text) = self.help {
            report_builder = report_builder.with_note(format!("{}: {}", "help".fg(Color::Cyan), help_text));
        }

        if let Err(err) = report_builder
            .finish()
            .eprint((filename, Source::from(source)))
        {
            tracing::warn!(%err, "failed to render diagnostic");
        }
    }
}

fn char_offset(source: &str, byte: usize) -> usize {
    let byte = byte.min(source.len());
    let mut boundary = byte;
    while !source.is_char_boundary(boundary) {
        boundary -= 1;
    }
    source[..boundary].chars().count()
}

impl fmt::Display for AuraError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AuraError {}

/// Resource failures while building a [`crate::value::Value`] payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("tensor dimensions must be positive (got {rows} x {cols})")]
    InvalidDimensions { rows: i64, cols: i64 },
    #[error("tensor element count overflows for {rows} x {cols}")]
    ElementCountOverflow { rows: u64, cols: u64 },
    #[error("tensor allocation size overflows for {rows} x {cols}")]
    AllocationSizeOverflow { rows: u64, cols: u64 },
    #[error("out of memory allocating {bytes} bytes for {what}")]
    OutOfMemory { what: &'static str, bytes: usize },
}

/// Failures setting up a scanner benchmark run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BenchError {
    #[error("benchmark source size overflows for {iterations} iterations")]
    SourceTooLarge { iterations: usize },
    #[error("memory allocation failed for {bytes} byte benchmark source")]
    OutOfMemory { bytes: usize },
}
