//! # htmlspan
//!
//! HTML tag handling and span normalization for rich-text display layers.
//!
//! Raw HTML goes in, a [`TextDocument`] comes out: plain text plus styled
//! ranges (bold, italic, list items, table cells, links, images and
//! application-defined spans).
//!
//! ## Quick Start
//!
//! ```
//! use htmlspan::{convert_html, SpanKind};
//!
//! fn main() -> htmlspan::Result<()> {
//!     let doc = convert_html("<p>Hello <b>world</b></p>")?;
//!
//!     assert_eq!(doc.text(), "Hello world");
//!     let bold = doc.spans_where(|k| *k == SpanKind::Bold).next();
//!     assert_eq!(bold.map(|s| (s.start, s.end)), Some((6, 11)));
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! 1. **Tag handler**: lists, tables, images and registered tags are
//!    rewritten to escaped tags and recorded in a side table.
//! 2. **HTML converter**: any [`HtmlConverter`] turns the rewritten markup
//!    into text and spans; [`BasicConverter`] is built in.
//! 3. **Span normalizer**: character styles become inclusive at both edges
//!    and trailing blank lines are trimmed.
//!
//! ## Features
//!
//! - **Lenient**: malformed markup is repaired, never rejected
//! - **Nested lists**: per-list numbering, depth and indent
//! - **Tables**: inline cells with coordinates, or a single clickable link
//! - **Custom tags**: pluggable span factories
//! - **Parallel processing**: uses Rayon for batch conversion

pub mod config;
pub mod convert;
pub mod error;
pub mod factory;
pub mod handler;
pub mod model;
pub mod normalize;
pub mod render;
pub mod scanner;

// Re-export commonly used types
pub use config::{Configuration, TableMode};
pub use convert::{convert, BasicConverter, HtmlConverter};
pub use error::{ConversionError, Error, Result};
pub use factory::{FactoryRegistry, SpanFactory};
pub use handler::{Rewritten, TagHandler};
pub use model::{
    Attributes, BoundaryPolicy, CustomSpan, ListItem, ListStyle, NumberStyle, SpanKind,
    StyledRange, TagMetadata, TagRecord, TextDocument,
};
pub use normalize::SpanNormalizer;
pub use render::{to_json, JsonFormat};

use rayon::prelude::*;
use std::io::Read;
use std::path::Path;

/// Convert HTML with the default configuration and [`BasicConverter`].
///
/// # Example
///
/// ```
/// use htmlspan::convert_html;
///
/// let doc = convert_html("<ul><li>one</li><li>two</li></ul>").unwrap();
/// assert_eq!(doc.text(), "one\ntwo");
/// ```
pub fn convert_html(html: &str) -> Result<TextDocument> {
    HtmlText::new().convert(html)
}

/// Read and convert an HTML file.
///
/// # Example
///
/// ```no_run
/// use htmlspan::convert_file;
///
/// let doc = convert_file("page.html").unwrap();
/// println!("{}", doc.text());
/// ```
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<TextDocument> {
    HtmlText::new().convert_file(path)
}

/// Read HTML from any reader and convert it.
///
/// # Example
///
/// ```no_run
/// use htmlspan::convert_reader;
/// use std::io::stdin;
///
/// let doc = convert_reader(stdin().lock()).unwrap();
/// println!("{}", doc.text());
/// ```
pub fn convert_reader<R: Read>(reader: R) -> Result<TextDocument> {
    HtmlText::new().convert_reader(reader)
}

/// Builder for converting HTML documents.
///
/// # Example
///
/// ```
/// use htmlspan::{CustomSpan, HtmlText, SpanKind};
///
/// let doc = HtmlText::new()
///     .with_list_indent(16.0)
///     .with_table_link("Show table")
///     .with_factory("spoiler", |tag: &str, _: &htmlspan::Attributes| {
///         Some(SpanKind::Custom(CustomSpan::new(tag)))
///     })
///     .convert("<spoiler>hidden</spoiler>")?;
///
/// assert_eq!(doc.text(), "hidden");
/// # Ok::<(), htmlspan::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct HtmlText<C = BasicConverter> {
    config: Configuration,
    converter: C,
}

impl HtmlText {
    /// Create a builder using [`BasicConverter`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: HtmlConverter> HtmlText<C> {
    /// Use another HTML converter.
    pub fn with_converter<D: HtmlConverter>(self, converter: D) -> HtmlText<D> {
        HtmlText {
            config: self.config,
            converter,
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: Configuration) -> Self {
        self.config = config;
        self
    }

    /// Set the per-level list indent.
    pub fn with_list_indent(mut self, width: f32) -> Self {
        self.config = self.config.with_list_indent(width);
        self
    }

    /// Keep trailing blank lines.
    pub fn keep_trailing_blank_lines(mut self) -> Self {
        self.config = self.config.keep_trailing_blank_lines();
        self
    }

    /// Enable or disable trailing blank-line trimming.
    pub fn with_trim_trailing_blank_lines(mut self, trim: bool) -> Self {
        self.config = self.config.with_trim_trailing_blank_lines(trim);
        self
    }

    /// Collapse tables into a clickable link.
    pub fn with_table_link(mut self, text: impl Into<String>) -> Self {
        self.config = self.config.with_table_link(text);
        self
    }

    /// Register a span factory for a custom tag.
    pub fn with_factory(
        mut self,
        tag: impl Into<String>,
        factory: impl SpanFactory + 'static,
    ) -> Self {
        self.config = self.config.with_factory(tag, factory);
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Run only the tag handler.
    pub fn rewrite(&self, html: &str) -> Rewritten {
        TagHandler::new(&self.config).rewrite(html)
    }

    /// Convert HTML.
    pub fn convert(&self, html: &str) -> Result<TextDocument> {
        convert::convert(html, &self.config, &self.converter)
    }

    /// Read HTML from a reader and convert it.
    pub fn convert_reader<R: Read>(&self, mut reader: R) -> Result<TextDocument> {
        let mut html = String::new();
        reader.read_to_string(&mut html)?;
        self.convert(&html)
    }

    /// Read and convert an HTML file.
    pub fn convert_file<P: AsRef<Path>>(&self, path: P) -> Result<TextDocument> {
        let path = path.as_ref();
        log::debug!("converting {}", path.display());
        let html = std::fs::read_to_string(path)?;
        self.convert(&html)
    }

    /// Convert many documents in parallel.
    ///
    /// Results keep the order of `inputs`; one failure does not affect the
    /// others.
    pub fn convert_batch<S>(&self, inputs: &[S]) -> Vec<Result<TextDocument>>
    where
        S: AsRef<str> + Sync,
        C: Sync,
    {
        inputs
            .par_iter()
            .map(|html| self.convert(html.as_ref()))
            .collect()
    }
}
