//! Error types for parsing and transforming stylesheets.

use thiserror::Error;

/// A fatal processing error. Declaration-level ineligibility is never an
/// error (those declarations are silently skipped), and an unsupported
/// root unit is reported as a warning instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The root font-size expression could not be reduced to a single
    /// `<number><unit>` token. Aborts the run; the position names the
    /// declaration whose conversion first needed the root value.
    #[error("Root font-size is invalid: `{root}` at {line}:{column}")]
    InvalidRootSize {
        root: String,
        line: u32,
        column: u32,
    },

    /// The stylesheet source could not be parsed.
    #[error("{message} at {line}:{column}")]
    Syntax {
        message: String,
        line: u32,
        column: u32,
    },
}

impl Error {
    /// The short reason string, without location information.
    pub fn reason(&self) -> &str {
        match self {
            Error::InvalidRootSize { .. } => "Root font-size is invalid",
            Error::Syntax { message, .. } => message,
        }
    }

    /// 1-based line/column the error is anchored to.
    pub fn position(&self) -> (u32, u32) {
        match self {
            Error::InvalidRootSize { line, column, .. } | Error::Syntax { line, column, .. } => {
                (*line, *column)
            }
        }
    }
}
