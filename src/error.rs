//! Error types for style computation.

use thiserror::Error;

/// Errors that can occur while building a document or computing styles.
#[derive(Error, Debug)]
pub enum StyleError {
    /// Malformed CSS in a stylesheet. Fatal for the whole document: a partial
    /// cascade would report misleading values.
    #[error("stylesheet parse error at {line}:{column}: {message} (near `{snippet}`)")]
    StylesheetParse {
        message: String,
        line: u32,
        column: u32,
        snippet: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl StyleError {
    /// Build a stylesheet parse error from a cssparser error.
    ///
    /// `css` is the text the error location refers to; the snippet is the
    /// offending line, trimmed.
    pub(crate) fn stylesheet<E: std::fmt::Debug>(
        css: &str,
        error: &cssparser::ParseError<'_, E>,
    ) -> Self {
        let location = error.location;
        let snippet = css
            .lines()
            .nth(location.line as usize)
            .map(str::trim)
            .unwrap_or_default()
            .chars()
            .take(80)
            .collect();
        let message = match &error.kind {
            cssparser::ParseErrorKind::Basic(kind) => kind.to_string(),
            cssparser::ParseErrorKind::Custom(custom) => format!("{custom:?}"),
        };
        Self::StylesheetParse {
            message,
            // cssparser lines are 0-based, columns 1-based
            line: location.line + 1,
            column: location.column,
            snippet,
        }
    }
}

impl StyleError {
    /// Shift a parse error reported against a fragment (such as a lone
    /// selector) to the fragment's position in the full stylesheet.
    pub(crate) fn relocate(self, origin: cssparser::SourceLocation) -> Self {
        match self {
            Self::StylesheetParse {
                message,
                line,
                column,
                snippet,
            } => Self::StylesheetParse {
                message,
                column: if line == 1 {
                    origin.column + column - 1
                } else {
                    column
                },
                line: origin.line + line,
                snippet,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, StyleError>;
