//! Document-level types.

use super::{SpanKind, StyledRange};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Converted text with its styled ranges.
///
/// A document is built once per conversion and never mutated afterwards;
/// normalization consumes one document and returns a new one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextDocument {
    text: String,
    spans: Vec<StyledRange>,
}

impl TextDocument {
    /// Create a document from text and spans.
    ///
    /// The ranges are not checked here; call [`validate`](Self::validate)
    /// when they come from an untrusted converter.
    pub fn new(text: impl Into<String>, spans: Vec<StyledRange>) -> Self {
        Self {
            text: text.into(),
            spans,
        }
    }

    /// Create a document with plain text and no spans.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Vec::new())
    }

    /// The document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Styled ranges in the order the converter emitted them.
    pub fn spans(&self) -> &[StyledRange] {
        &self.spans
    }

    /// Split the document into text and spans.
    pub fn into_parts(self) -> (String, Vec<StyledRange>) {
        (self.text, self.spans)
    }

    /// Text length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the document has no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Ranges whose kind matches the predicate.
    pub fn spans_where<'a>(
        &'a self,
        predicate: impl Fn(&SpanKind) -> bool + 'a,
    ) -> impl Iterator<Item = &'a StyledRange> + 'a {
        self.spans.iter().filter(move |s| predicate(&s.kind))
    }

    /// Ranges that contain the given offset (zero-width markers included
    /// when they sit exactly on it).
    pub fn spans_at(&self, offset: usize) -> impl Iterator<Item = &StyledRange> {
        self.spans
            .iter()
            .filter(move |s| s.start <= offset && (offset < s.end || s.start == s.end))
    }

    /// Text covered by a range, if the range is valid for this document.
    pub fn slice(&self, range: &StyledRange) -> Option<&str> {
        self.text.get(range.start..range.end)
    }

    /// Check every range against `0 <= start <= end <= len` and char boundaries.
    pub fn validate(&self) -> Result<()> {
        let len = self.text.len();
        for span in &self.spans {
            let reason = if span.start > span.end {
                Some("start is after end")
            } else if span.end > len {
                Some("end is past the end of the text")
            } else if !self.text.is_char_boundary(span.start)
                || !self.text.is_char_boundary(span.end)
            {
                Some("offset splits a character")
            } else {
                None
            };

            if let Some(reason) = reason {
                return Err(Error::InvariantViolation {
                    start: span.start,
                    end: span.end,
                    len,
                    reason,
                });
            }
        }
        Ok(())
    }
}
