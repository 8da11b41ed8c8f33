//! Parse-time diagnostics.
//!
//! Parsing never aborts on a recoverable error: the parser records a
//! [`ParseError`] and resynchronizes at the next statement boundary. Runtime
//! errors are plain `Value::Error`s (see [`crate::object`]) and do not use
//! this type — they are first-class values, not exceptions.

use crate::style::Style;
use crate::token::Span;

#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        ParseError { message: message.into(), span }
    }

    /// Render this error with a line of source context and an underline,
    /// the way a REPL session displays it.
    pub fn display_with_source(&self, source: &str) -> String {
        let (line_num, line_start, line_content) = self.find_context(source);
        let col = self.span.start.saturating_sub(line_start);
        let len = (self.span.end - self.span.start).max(1);
        let underline = format!("{}{}", " ".repeat(col), "^".repeat(len));

        let error_label = Style::bold_red("error");
        let line_num_str = Style::blue(&format!("{:4}", line_num));
        let pipe = Style::blue("|");
        let underline_colored = Style::red(&underline);

        format!(
            "{}: {}\n\n{} {} {}\n     {} {}",
            error_label, self.message, line_num_str, pipe, line_content, pipe, underline_colored
        )
    }

    fn find_context<'a>(&self, source: &'a str) -> (usize, usize, &'a str) {
        let mut line_num = 1;
        let mut line_start = 0;

        for (i, c) in source.char_indices() {
            if i >= self.span.start {
                break;
            }
            if c == '\n' {
                line_num += 1;
                line_start = i + 1;
            }
        }

        let line_end = source[line_start..]
            .find('\n')
            .map(|off| line_start + off)
            .unwrap_or(source.len());

        (line_num, line_start, &source[line_start..line_end])
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_has_span() {
        let error = ParseError::new("expected next token to be =, got ; instead", Span::new(5, 10));
        assert_eq!(error.span.start, 5);
        assert_eq!(error.span.end, 10);
    }

    #[test]
    fn display_with_source_shows_line_and_underline() {
        let error = ParseError::new("no prefix parse function for ILLEGAL found", Span::new(4, 5));
        let source = "let @ = 5;";
        let display = error.display_with_source(source);
        assert!(display.contains("let @ = 5;"));
        assert!(display.contains("^"));
    }

    #[test]
    fn display_with_source_has_color_codes() {
        let error = ParseError::new("expected next token to be IDENT, got ASSIGN instead", Span::new(0, 3));
        let source = "let = 5;";
        let display = error.display_with_source(source);
        assert!(display.contains("\x1b["));
    }
}
