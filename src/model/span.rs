//! Styled ranges and span kinds.

use super::{Attributes, ListItem};
use serde::{Deserialize, Serialize};

/// Whether text inserted exactly at a range edge takes on the range's style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Neither edge expands (converter default)
    #[default]
    ExclusiveExclusive,
    /// Insertions at the end expand the range
    ExclusiveInclusive,
    /// Insertions at the start expand the range
    InclusiveExclusive,
    /// Insertions at either edge expand the range
    InclusiveInclusive,
}

impl BoundaryPolicy {
    /// Check if insertions at the start offset are covered.
    pub fn is_start_inclusive(&self) -> bool {
        matches!(
            self,
            BoundaryPolicy::InclusiveExclusive | BoundaryPolicy::InclusiveInclusive
        )
    }

    /// Check if insertions at the end offset are covered.
    pub fn is_end_inclusive(&self) -> bool {
        matches!(
            self,
            BoundaryPolicy::ExclusiveInclusive | BoundaryPolicy::InclusiveInclusive
        )
    }
}

/// The style a range applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpanKind {
    /// Bold text
    Bold,

    /// Italic text
    Italic,

    /// Underlined text
    Underline,

    /// A list item
    ListItem(ListItem),

    /// A table cell at zero-based `(row, col)`
    TableCell {
        /// Row index within the table
        row: u32,
        /// Column index within the row
        col: u32,
    },

    /// A region that reacts to clicks (hyperlink, table link)
    ClickableRegion {
        /// Link target (URL or table identifier)
        target: String,
    },

    /// An inline image
    Image {
        /// Image source as written in the markup
        source: String,
    },

    /// A span produced by a registered factory
    Custom(CustomSpan),
}

impl SpanKind {
    /// Character styles that editing should extend at their edges.
    pub fn is_character_style(&self) -> bool {
        matches!(self, SpanKind::Bold | SpanKind::Italic | SpanKind::Underline)
    }

    /// Short name used in logs and debug output.
    pub fn name(&self) -> &str {
        match self {
            SpanKind::Bold => "bold",
            SpanKind::Italic => "italic",
            SpanKind::Underline => "underline",
            SpanKind::ListItem(_) => "list_item",
            SpanKind::TableCell { .. } => "table_cell",
            SpanKind::ClickableRegion { .. } => "clickable_region",
            SpanKind::Image { .. } => "image",
            SpanKind::Custom(custom) => &custom.name,
        }
    }
}

/// Application-defined span created for a registered tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSpan {
    /// Span name, usually the tag name
    pub name: String,

    /// Attributes carried over from the tag
    pub attributes: Attributes,
}

impl CustomSpan {
    /// Create a custom span without attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
        }
    }

    /// Set attributes and return self.
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// A contiguous run of text annotated with one style.
///
/// Offsets are UTF-8 byte offsets into the document text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyledRange {
    /// Start offset (inclusive)
    pub start: usize,

    /// End offset (exclusive)
    pub end: usize,

    /// Applied style
    pub kind: SpanKind,

    /// Edge behavior on later edits
    pub policy: BoundaryPolicy,
}

impl StyledRange {
    /// Create a range with the default exclusive-exclusive policy.
    pub fn new(start: usize, end: usize, kind: SpanKind) -> Self {
        Self {
            start,
            end,
            kind,
            policy: BoundaryPolicy::default(),
        }
    }

    /// Set the boundary policy and return self.
    pub fn with_policy(mut self, policy: BoundaryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Length of the range in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if this is a zero-width marker.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if text inserted at `offset` would inherit this range's style.
    pub fn covers_insertion(&self, offset: usize) -> bool {
        (self.start < offset && offset < self.end)
            || (offset == self.start && self.policy.is_start_inclusive())
            || (offset == self.end && self.policy.is_end_inclusive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_edges() {
        assert!(!BoundaryPolicy::ExclusiveExclusive.is_start_inclusive());
        assert!(!BoundaryPolicy::ExclusiveExclusive.is_end_inclusive());
        assert!(BoundaryPolicy::ExclusiveInclusive.is_end_inclusive());
        assert!(BoundaryPolicy::InclusiveExclusive.is_start_inclusive());
        assert!(BoundaryPolicy::InclusiveInclusive.is_start_inclusive());
        assert!(BoundaryPolicy::InclusiveInclusive.is_end_inclusive());
    }

    #[test]
    fn test_covers_insertion() {
        let range = StyledRange::new(2, 5, SpanKind::Bold);
        assert!(!range.covers_insertion(2));
        assert!(range.covers_insertion(3));
        assert!(!range.covers_insertion(5));

        let range = range.with_policy(BoundaryPolicy::InclusiveInclusive);
        assert!(range.covers_insertion(2));
        assert!(range.covers_insertion(5));
        assert!(!range.covers_insertion(6));
    }

    #[test]
    fn test_zero_width() {
        let marker = StyledRange::new(4, 4, SpanKind::Italic);
        assert!(marker.is_empty());
        assert_eq!(marker.len(), 0);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(SpanKind::Bold.name(), "bold");
        assert!(SpanKind::Underline.is_character_style());
        assert!(!SpanKind::Image {
            source: "a.png".into()
        }
        .is_character_style());
        assert_eq!(SpanKind::Custom(CustomSpan::new("spoiler")).name(), "spoiler");
    }
}
