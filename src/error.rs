//! Error types for htmlspan library.

use std::io;
use thiserror::Error;

/// Result type alias for htmlspan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by an [`HtmlConverter`](crate::convert::HtmlConverter).
///
/// Carries the markup fragment the converter choked on so callers can point
/// at the offending input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot convert `{fragment}`: {message}")]
pub struct ConversionError {
    /// The markup fragment that could not be converted.
    pub fragment: String,

    /// Human-readable reason.
    pub message: String,
}

impl ConversionError {
    /// Create a new conversion error.
    pub fn new(fragment: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            message: message.into(),
        }
    }
}

/// Error types that can occur while converting HTML to styled text.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading markup from a file or reader.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The HTML converter could not handle the (already rewritten) markup.
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// A styled range does not fit the text it annotates.
    ///
    /// Only a bug in the tag handler or the converter can produce this.
    #[error("Span {start}..{end} is invalid for text of length {len}: {reason}")]
    InvariantViolation {
        /// Range start offset
        start: usize,
        /// Range end offset
        end: usize,
        /// Length of the annotated text
        len: usize,
        /// Which part of the invariant was broken
        reason: &'static str,
    },

    /// The configuration cannot be used for conversion.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Error during rendering (JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}
