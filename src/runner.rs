use crate::error::{AuraError, Span};
use crate::scanner::{LexErrorKind, Scanner, Token};
use std::io::{self, Write};

/// Scans `source`, writes the token dump to stdout and reports every error
/// token on stderr. Returns the number of lexical errors.
pub fn run(source: &str, filename: Option<&str>) -> io::Result<usize> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let errors = dump_tokens(source, &mut out)?;
    out.flush()?;

    for error in &errors {
        error.report(source, filename);
    }
    Ok(errors.len())
}

/// Writes one line per token: the line number when it changes (`|`
/// otherwise), the token kind and its lexeme.
pub fn dump_tokens<W: Write>(source: &str, out: &mut W) -> io::Result<Vec<AuraError>> {
    let mut errors = Vec::new();
    let mut line = None;

    for token in Scanner::new(source) {
        if line == Some(token.line) {
            write!(out, "   | ")?;
        } else {
            write!(out, "{:4} ", token.line)?;
            line = Some(token.line);
        }
        writeln!(out, "{:<14} '{}'", token.token_type.to_string(), token.lexeme)?;

        if token.is_error() {
            errors.push(to_error(&token));
        }
    }

    tracing::debug!(errors = errors.len(), bytes = source.len(), "token dump complete");
    Ok(errors)
}

/// Turns an error token into a reportable diagnostic.
pub fn to_error(token: &Token<'_>) -> AuraError {
    let span = if token.span.is_empty() {
        Span::single(token.span.start)
    } else {
        token.span
    };

    match token.error.and_then(LexErrorKind::help) {
        Some(help) => AuraError::lex_error_with_help(span, token.lexeme.to_string(), help.to_string()),
        None => AuraError::lex_error(span, token.lexeme.to_string()),
    }
}
