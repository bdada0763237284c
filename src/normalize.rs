//! Span normalization applied to converter output.
//!
//! Two passes run over a converted document:
//!
//! 1. **Boundary promotion**: bold, italic and underline ranges become
//!    inclusive at both edges, so text typed at the edge of a styled run
//!    keeps the style.
//! 2. **Trailing blank-line trim**: line breaks left at the end of the text
//!    by block elements are removed and ranges reaching past the new end are
//!    clipped. Ranges are never dropped; a range clipped to nothing stays as a
//!    zero-width marker.

use crate::config::Configuration;
use crate::error::Result;
use crate::model::{BoundaryPolicy, StyledRange, TextDocument};

/// Check if a character counts as a trailing line break.
pub fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r')
}

/// Post-processes converted documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanNormalizer {
    trim_trailing_blank_lines: bool,
}

impl SpanNormalizer {
    /// Create a normalizer that promotes boundaries and trims trailing lines.
    pub fn new() -> Self {
        Self {
            trim_trailing_blank_lines: true,
        }
    }

    /// Create a normalizer matching a configuration.
    pub fn from_config(config: &Configuration) -> Self {
        Self {
            trim_trailing_blank_lines: config.trim_trailing_blank_lines,
        }
    }

    /// Enable or disable the trailing blank-line trim.
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim_trailing_blank_lines = trim;
        self
    }

    /// Normalize a document.
    ///
    /// Fails only with [`Error::InvariantViolation`](crate::Error::InvariantViolation)
    /// when a range does not fit the text, which means the converter is broken.
    pub fn normalize(&self, doc: TextDocument) -> Result<TextDocument> {
        doc.validate()?;

        let (mut text, mut spans) = doc.into_parts();
        let promoted = promote_boundaries(&mut spans);
        let trimmed = if self.trim_trailing_blank_lines {
            trim_trailing_line_breaks(&mut text, &mut spans)
        } else {
            0
        };

        log::debug!(
            "normalized {} span(s): {} promoted, {} trailing line break(s) trimmed",
            spans.len(),
            promoted,
            trimmed
        );

        Ok(TextDocument::new(text, spans))
    }
}

impl Default for SpanNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn promote_boundaries(spans: &mut [StyledRange]) -> usize {
    let mut promoted = 0;
    for span in spans
        .iter_mut()
        .filter(|s| s.kind.is_character_style())
        .filter(|s| s.policy != BoundaryPolicy::InclusiveInclusive)
    {
        span.policy = BoundaryPolicy::InclusiveInclusive;
        promoted += 1;
    }
    promoted
}

// Removing the breaks one at a time and clipping ranges that end at the old
// length each step ends up clipping every range past the final length, so
// the whole run is cut at once.
fn trim_trailing_line_breaks(text: &mut String, spans: &mut [StyledRange]) -> usize {
    let new_len = text.trim_end_matches(is_line_break).len();
    let removed = text.len() - new_len;
    if removed == 0 {
        return 0;
    }

    text.truncate(new_len);
    for span in spans.iter_mut().filter(|s| s.end > new_len) {
        span.end = new_len;
        span.start = span.start.min(new_len);
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::SpanKind;

    fn doc(text: &str, spans: Vec<StyledRange>) -> TextDocument {
        TextDocument::new(text, spans)
    }

    #[test]
    fn test_promotes_character_styles_only() {
        let input = doc(
            "Hello",
            vec![
                StyledRange::new(0, 5, SpanKind::Bold),
                StyledRange::new(0, 5, SpanKind::Italic)
                    .with_policy(BoundaryPolicy::ExclusiveInclusive),
                StyledRange::new(0, 5, SpanKind::Underline),
                StyledRange::new(
                    0,
                    5,
                    SpanKind::ClickableRegion {
                        target: "https://example.com".into(),
                    },
                ),
            ],
        );

        let out = SpanNormalizer::new().normalize(input).unwrap();
        let policies: Vec<BoundaryPolicy> = out.spans().iter().map(|s| s.policy).collect();
        assert_eq!(
            policies,
            vec![
                BoundaryPolicy::InclusiveInclusive,
                BoundaryPolicy::InclusiveInclusive,
                BoundaryPolicy::InclusiveInclusive,
                BoundaryPolicy::ExclusiveExclusive,
            ]
        );
    }

    #[test]
    fn test_trim_trailing_newlines() {
        let input = doc(
            "Hello\n\n\n",
            vec![
                StyledRange::new(0, 8, SpanKind::Bold),
                StyledRange::new(0, 5, SpanKind::Italic),
            ],
        );

        let out = SpanNormalizer::new().normalize(input).unwrap();
        assert_eq!(out.text(), "Hello");
        assert_eq!((out.spans()[0].start, out.spans()[0].end), (0, 5));
        assert_eq!((out.spans()[1].start, out.spans()[1].end), (0, 5));
    }

    #[test]
    fn test_span_inside_trimmed_run_becomes_marker() {
        let input = doc("Hi\n\n", vec![StyledRange::new(3, 4, SpanKind::Underline)]);

        let out = SpanNormalizer::new().normalize(input).unwrap();
        assert_eq!(out.text(), "Hi");
        assert_eq!(out.spans().len(), 1);
        assert_eq!((out.spans()[0].start, out.spans()[0].end), (2, 2));
    }

    #[test]
    fn test_crlf_trimmed() {
        let out = SpanNormalizer::new()
            .normalize(TextDocument::plain("line\r\n\r\n"))
            .unwrap();
        assert_eq!(out.text(), "line");
    }

    #[test]
    fn test_all_newlines_trims_to_empty() {
        let input = doc("\n\n", vec![StyledRange::new(0, 2, SpanKind::Bold)]);
        let out = SpanNormalizer::new().normalize(input).unwrap();
        assert!(out.is_empty());
        assert!(out.spans()[0].is_empty());
    }

    #[test]
    fn test_trim_disabled() {
        let input = doc("Hello\n\n", vec![StyledRange::new(0, 7, SpanKind::Bold)]);
        let out = SpanNormalizer::new().with_trim(false).normalize(input).unwrap();
        assert_eq!(out.text(), "Hello\n\n");
        assert_eq!(out.spans()[0].end, 7);
    }

    #[test]
    fn test_from_config() {
        let config = Configuration::new().keep_trailing_blank_lines();
        assert_eq!(
            SpanNormalizer::from_config(&config),
            SpanNormalizer::new().with_trim(false)
        );
    }

    #[test]
    fn test_invalid_span_rejected() {
        let input = doc("Hi", vec![StyledRange::new(1, 9, SpanKind::Bold)]);
        let err = SpanNormalizer::new().normalize(input).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation { .. }));
    }

    #[test]
    fn test_idempotent() {
        let input = doc(
            "a b\n",
            vec![
                StyledRange::new(0, 1, SpanKind::Bold),
                StyledRange::new(2, 4, SpanKind::Image {
                    source: "x".into(),
                }),
            ],
        );
        let normalizer = SpanNormalizer::new();
        let once = normalizer.normalize(input).unwrap();
        let twice = normalizer.normalize(once.clone()).unwrap();
        assert_eq!(once, twice);
    }
}
