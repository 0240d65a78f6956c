//! Error types for loading map documents

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Position of a problem in the input document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Byte offset into the source
    pub index: usize,
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid map document: {message}")]
    Invalid {
        message: String,
        location: Option<Location>,
    },
}

impl ParseError {
    pub fn location(&self) -> Option<Location> {
        match self {
            ParseError::Invalid { location, .. } => *location,
        }
    }

    /// 1-based line of the error, when known
    pub fn line(&self) -> Option<usize> {
        self.location().map(|l| l.line)
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let ParseError::Invalid { message, location } = self;

        let Some(location) = location else {
            return format!("Error: {}: {}", filename, message);
        };

        let span = error_span(source, location.index);
        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message("invalid map document")
            .with_label(
                Label::new((filename, span))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!(
                "Error: {}:{}:{}: {}",
                filename, location.line, location.column, message
            ),
        }
    }
}

/// Highlight from the error offset to the end of that line
///
/// `index` is a byte offset; ariadne counts characters, so the returned
/// span is in characters.
fn error_span(source: &str, index: usize) -> Span {
    let mut start = index.min(source.len());
    while !source.is_char_boundary(start) {
        start -= 1;
    }
    let end = source[start..]
        .find('\n')
        .map(|n| start + n)
        .unwrap_or(source.len());

    let char_start = source[..start].chars().count();
    let mut char_end = char_start + source[start..end].chars().count();
    if char_end == char_start && start < source.len() {
        char_end += 1;
    }
    char_start..char_end
}

impl From<serde_yaml::Error> for ParseError {
    fn from(err: serde_yaml::Error) -> Self {
        let location = err.location().map(|loc| Location {
            index: loc.index(),
            line: loc.line(),
            column: loc.column(),
        });
        ParseError::Invalid {
            message: err.to_string(),
            location,
        }
    }
}
