//! Side-channel metadata recorded while rewriting markup.

use super::{ListItem, SpanKind};
use serde::{Deserialize, Serialize};

/// One rewritten tag and the span it stands for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRecord {
    /// Original tag name (lowercase)
    pub tag: String,

    /// Span the converter should create for the tag's content
    pub kind: SpanKind,

    /// Original markup replaced by the tag (table links only)
    pub markup: Option<String>,
}

impl TagRecord {
    /// Create a record without captured markup.
    pub fn new(tag: impl Into<String>, kind: SpanKind) -> Self {
        Self {
            tag: tag.into(),
            kind,
            markup: None,
        }
    }
}

/// Records for every rewritten tag, indexed by the `data-ref` attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagMetadata {
    records: Vec<TagRecord>,
}

impl TagMetadata {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and return its reference id.
    pub fn push(&mut self, record: TagRecord) -> usize {
        self.records.push(record);
        self.records.len() - 1
    }

    /// Get a record by reference id.
    pub fn get(&self, id: usize) -> Option<&TagRecord> {
        self.records.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: usize) -> Option<&mut TagRecord> {
        self.records.get_mut(id)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if nothing was rewritten.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records in document order.
    pub fn iter(&self) -> impl Iterator<Item = &TagRecord> {
        self.records.iter()
    }

    /// List items in document order.
    pub fn list_items(&self) -> impl Iterator<Item = &ListItem> {
        self.records.iter().filter_map(|r| match &r.kind {
            SpanKind::ListItem(item) => Some(item),
            _ => None,
        })
    }

    /// Table cell coordinates in document order.
    pub fn table_cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.records.iter().filter_map(|r| match r.kind {
            SpanKind::TableCell { row, col } => Some((row, col)),
            _ => None,
        })
    }

    /// Original markup of a collapsed table, by its clickable target id.
    pub fn table_markup(&self, target: &str) -> Option<&str> {
        self.records.iter().find_map(|r| match &r.kind {
            SpanKind::ClickableRegion { target: t } if t == target => r.markup.as_deref(),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_get() {
        let mut metadata = TagMetadata::new();
        assert!(metadata.is_empty());

        let item = ListItem::bullet(1, 0, 24.0);
        let id = metadata.push(TagRecord::new("li", SpanKind::ListItem(item)));
        let cell = metadata.push(TagRecord::new("td", SpanKind::TableCell { row: 0, col: 1 }));

        assert_eq!(id, 0);
        assert_eq!(cell, 1);
        assert_eq!(metadata.get(0).map(|r| r.tag.as_str()), Some("li"));
        assert!(metadata.get(2).is_none());
        assert_eq!(metadata.list_items().count(), 1);
        assert_eq!(metadata.table_cells().collect::<Vec<_>>(), vec![(0, 1)]);
    }

    #[test]
    fn test_table_markup_lookup() {
        let mut metadata = TagMetadata::new();
        let mut record = TagRecord::new(
            "table",
            SpanKind::ClickableRegion {
                target: "table-0".into(),
            },
        );
        record.markup = Some("<table><tr><td>x</td></tr></table>".into());
        metadata.push(record);

        assert_eq!(
            metadata.table_markup("table-0"),
            Some("<table><tr><td>x</td></tr></table>")
        );
        assert!(metadata.table_markup("table-1").is_none());
    }
}
