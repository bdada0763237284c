//! List nesting and numbering.

use crate::model::{Attributes, ListItem, NumberStyle};

#[derive(Debug)]
struct ListFrame {
    ordered: bool,
    number_style: NumberStyle,
    next: u32,
}

/// Tracks open `<ul>`/`<ol>` elements while rewriting.
///
/// Every list element owns its counter, so a nested list never disturbs the
/// numbering of the list around it. Depth counts all enclosing lists,
/// ordered or not.
#[derive(Debug)]
pub(crate) struct ListTracker {
    frames: Vec<ListFrame>,
    orphans: u32,
    indent_width: f32,
}

impl ListTracker {
    pub(crate) fn new(indent_width: f32) -> Self {
        Self {
            frames: Vec::new(),
            orphans: 0,
            indent_width,
        }
    }

    /// Open a list. `start` and `type` are honored on ordered lists only.
    pub(crate) fn push(&mut self, ordered: bool, attributes: &Attributes) {
        let (next, number_style) = if ordered {
            let start = attributes
                .get("start")
                .and_then(|s| s.trim().parse::<u32>().ok())
                .unwrap_or(1);
            let style = attributes
                .get("type")
                .and_then(NumberStyle::from_type_attr)
                .unwrap_or_default();
            (start, style)
        } else {
            (1, NumberStyle::default())
        };

        self.frames.push(ListFrame {
            ordered,
            number_style,
            next,
        });
    }

    pub(crate) fn pop(&mut self) {
        self.frames.pop();
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Assign the next `<li>` its ordinal, depth and indent.
    ///
    /// An item outside any list is a top-level bullet numbered by its own
    /// counter.
    pub(crate) fn next_item(&mut self) -> ListItem {
        let depth = self.frames.len().saturating_sub(1) as u32;
        let indent = (depth + 1) as f32 * self.indent_width;

        match self.frames.last_mut() {
            Some(frame) => {
                let ordinal = frame.next;
                frame.next = frame.next.saturating_add(1);
                if frame.ordered {
                    ListItem::numbered(ordinal, depth, indent, frame.number_style)
                } else {
                    ListItem::bullet(ordinal, depth, indent)
                }
            }
            None => {
                self.orphans += 1;
                ListItem::bullet(self.orphans, 0, indent)
            }
        }
    }
}
