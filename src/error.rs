//! Error types for loading profiles and updating card documents

use std::fmt;
use std::path::{Path, PathBuf};

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Errors that can occur while loading a profile or rewriting a card
#[derive(Debug, Error)]
pub enum CardError {
    /// Profile configuration file does not exist
    #[error("configuration file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Configuration or document is not well-formed
    #[error("invalid syntax in '{}': {diagnostic}", path.display())]
    Parse { path: PathBuf, diagnostic: Diagnostic },

    /// Read or write failure other than a missing configuration file
    #[error("error accessing '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Expected element id is absent from a card document
    #[error("element with id '{id}' not found in '{}'", path.display())]
    MissingNode { id: String, path: PathBuf },
}

impl CardError {
    /// Create a not-found error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a parse error
    pub fn parse(path: impl Into<PathBuf>, diagnostic: Diagnostic) -> Self {
        Self::Parse {
            path: path.into(),
            diagnostic,
        }
    }

    /// Create an I/O error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a missing node error
    pub fn missing_node(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::MissingNode {
            id: id.into(),
            path: path.into(),
        }
    }

    /// The file this error is about
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path }
            | Self::Parse { path, .. }
            | Self::Io { path, .. }
            | Self::MissingNode { path, .. } => path,
        }
    }

    /// Format the error for humans.
    ///
    /// Parse errors with a known location are rendered as a source report
    /// pointing at the offending line; everything else falls back to `Display`.
    pub fn format(&self) -> String {
        if let Self::Parse { path, diagnostic } = self {
            if diagnostic.location.is_some() {
                if let Ok(source) = std::fs::read_to_string(path) {
                    return diagnostic.report(&source, &path.display().to_string());
                }
            }
        }
        self.to_string()
    }
}

/// 1-based line/column position of a syntax error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

/// Underlying parser message, with its position when the parser reports one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub location: Option<Location>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, location: Option<Location>) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }

    /// Render the diagnostic against its source text using ariadne
    pub fn report(&self, source: &str, filename: &str) -> String {
        let Some(location) = self.location else {
            return format!("{}: {}", filename, self.message);
        };

        let total = source.chars().count();
        let start = char_offset(source, location);
        let span = start..(start + 1).min(total).max(start);

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, start)
            .with_message(&self.message)
            .with_label(
                Label::new((filename, span))
                    .with_message(&self.message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("{}: {}", filename, self.message),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<&serde_yaml_ng::Error> for Diagnostic {
    fn from(err: &serde_yaml_ng::Error) -> Self {
        let location = err.location().map(|loc| Location {
            line: loc.line(),
            column: loc.column(),
        });
        Diagnostic::new(err.to_string(), location)
    }
}

impl From<&roxmltree::Error> for Diagnostic {
    fn from(err: &roxmltree::Error) -> Self {
        let pos = err.pos();
        Diagnostic::new(
            err.to_string(),
            Some(Location {
                line: pos.row as usize,
                column: pos.col as usize,
            }),
        )
    }
}

/// Convert a line/column position into a character offset (ariadne spans count chars)
fn char_offset(source: &str, location: Location) -> usize {
    let mut offset = 0;
    for (index, line) in source.split('\n').enumerate() {
        let width = line.chars().count();
        if index + 1 == location.line {
            return offset + location.column.saturating_sub(1).min(width);
        }
        offset += width + 1;
    }
    source.chars().count()
}
