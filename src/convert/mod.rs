//! Conversion facade tying the tag handler, an HTML converter and the span
//! normalizer together.
//!
//! The HTML-to-spans step is a capability supplied by the caller through the
//! [`HtmlConverter`] trait. [`BasicConverter`] is the built-in implementation.
//!
//! # Example
//!
//! ```
//! use htmlspan::convert::{convert, BasicConverter};
//! use htmlspan::model::SpanKind;
//! use htmlspan::Configuration;
//!
//! fn main() -> htmlspan::Result<()> {
//!     let config = Configuration::default();
//!     let doc = convert("<ol><li>One</li><li>Two</li></ol>", &config, &BasicConverter)?;
//!
//!     assert_eq!(doc.text(), "One\nTwo");
//!     assert_eq!(doc.spans_where(|k| matches!(k, SpanKind::ListItem(_))).count(), 2);
//!     Ok(())
//! }
//! ```

mod basic;

pub use basic::BasicConverter;

use crate::config::Configuration;
use crate::error::{ConversionError, Result};
use crate::handler::TagHandler;
use crate::model::{TagMetadata, TextDocument};
use crate::normalize::SpanNormalizer;

/// Turns rewritten markup into text and spans.
///
/// Escaped tags (`<htmlspan-NAME data-ref="N">`) must be resolved through
/// `metadata`: record `N` holds the span kind for the tag's content.
pub trait HtmlConverter {
    /// Convert rewritten markup.
    fn convert(
        &self,
        markup: &str,
        metadata: &TagMetadata,
    ) -> std::result::Result<TextDocument, ConversionError>;
}

impl<C: HtmlConverter + ?Sized> HtmlConverter for &C {
    fn convert(
        &self,
        markup: &str,
        metadata: &TagMetadata,
    ) -> std::result::Result<TextDocument, ConversionError> {
        (**self).convert(markup, metadata)
    }
}

impl<C: HtmlConverter + ?Sized> HtmlConverter for Box<C> {
    fn convert(
        &self,
        markup: &str,
        metadata: &TagMetadata,
    ) -> std::result::Result<TextDocument, ConversionError> {
        (**self).convert(markup, metadata)
    }
}

/// Convert raw HTML into a normalized [`TextDocument`].
///
/// Runs the tag handler, hands the rewritten markup to `converter`, then
/// normalizes the result. Converter failures are returned unchanged as
/// [`Error::Conversion`](crate::Error::Conversion).
pub fn convert<C>(raw: &str, config: &Configuration, converter: &C) -> Result<TextDocument>
where
    C: HtmlConverter + ?Sized,
{
    config.validate()?;

    let rewritten = TagHandler::new(config).rewrite(raw);
    log::debug!(
        "rewrote {} bytes of markup with {} tag record(s)",
        raw.len(),
        rewritten.metadata.len()
    );

    let doc = converter
        .convert(&rewritten.markup, &rewritten.metadata)
        .map_err(|e| {
            log::warn!("HTML conversion failed: {}", e);
            e
        })?;

    SpanNormalizer::from_config(config).normalize(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{BoundaryPolicy, SpanKind, StyledRange};

    struct Failing;

    impl HtmlConverter for Failing {
        fn convert(
            &self,
            _markup: &str,
            _metadata: &TagMetadata,
        ) -> std::result::Result<TextDocument, ConversionError> {
            Err(ConversionError::new("<x>", "unsupported"))
        }
    }

    // Returns the markup as text with a single bold span over all of it.
    struct Echo;

    impl HtmlConverter for Echo {
        fn convert(
            &self,
            markup: &str,
            _metadata: &TagMetadata,
        ) -> std::result::Result<TextDocument, ConversionError> {
            Ok(TextDocument::new(
                markup,
                vec![StyledRange::new(0, markup.len(), SpanKind::Bold)],
            ))
        }
    }

    #[test]
    fn test_converter_error_propagates() {
        let err = convert("<x>", &Configuration::default(), &Failing).unwrap_err();
        match err {
            Error::Conversion(e) => {
                assert_eq!(e.fragment, "<x>");
                assert_eq!(e.message, "unsupported");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_normalizes_converter_output() {
        let doc = convert("abc\n\n", &Configuration::default(), &Echo).unwrap();
        assert_eq!(doc.text(), "abc");
        assert_eq!(doc.spans()[0].end, 3);
        assert_eq!(doc.spans()[0].policy, BoundaryPolicy::InclusiveInclusive);
    }

    #[test]
    fn test_invalid_configuration_rejected() {
        let config = Configuration::new().with_list_indent(-1.0);
        let err = convert("x", &config, &Echo).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn test_boxed_converter() {
        let converter: Box<dyn HtmlConverter> = Box::new(BasicConverter);
        let doc = convert("<b>x</b>", &Configuration::default(), &converter).unwrap();
        assert_eq!(doc.text(), "x");
    }
}
