//! Styled text model shared by the tag handler, converters and normalizer.
//!
//! A conversion produces a [`TextDocument`]: plain text plus an ordered list
//! of [`StyledRange`]s. The tag handler describes the custom tags it rewrote
//! in a [`TagMetadata`] table that converters use to rebuild those ranges.

mod attributes;
mod document;
mod list;
mod metadata;
mod span;

pub use attributes::Attributes;
pub use document::TextDocument;
pub use list::{ListItem, ListStyle, NumberStyle};
pub use metadata::{TagMetadata, TagRecord};
pub use span::{BoundaryPolicy, CustomSpan, SpanKind, StyledRange};
