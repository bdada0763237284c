//! Tag handler: rewrites custom markup before conversion.
//!
//! Lists, tables, images and tags with a registered factory are not left to
//! the HTML converter. The handler renames each of them to
//! `<htmlspan-NAME>`, tags the ones that become spans with a
//! `data-ref="N"` attribute, and records the span in a [`TagMetadata`] table
//! at index `N`. Converters resolve the escaped tags through that table.
//!
//! Rewriting never fails. Closing tags without an open element are dropped,
//! a closing tag for a deeper element closes everything opened after it,
//! and elements still open at the end of input are closed there.
//!
//! # Example
//!
//! ```
//! use htmlspan::handler::TagHandler;
//! use htmlspan::model::SpanKind;
//! use htmlspan::Configuration;
//!
//! let config = Configuration::default();
//! let rewritten = TagHandler::new(&config).rewrite("<ol><li>A</li><li>B</li></ol>");
//!
//! assert!(rewritten.markup.starts_with("<htmlspan-ol>"));
//! let ordinals: Vec<u32> = rewritten.metadata.list_items().map(|i| i.ordinal).collect();
//! assert_eq!(ordinals, vec![1, 2]);
//! ```

mod list;
mod table;

use crate::config::{Configuration, TableMode};
use crate::model::{SpanKind, TagMetadata, TagRecord};
use crate::scanner::{escape_html, is_void, Scanner, StartTag, Token};
use list::ListTracker;
use table::TableTracker;

/// Prefix of rewritten tag names.
pub const TAG_PREFIX: &str = "htmlspan-";

/// Attribute linking a rewritten tag to its metadata record.
pub const REF_ATTR: &str = "data-ref";

/// Local name of the tag that replaces a table in link mode.
pub const TABLE_LINK_TAG: &str = "tablelink";

/// Output of [`TagHandler::rewrite`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rewritten {
    /// Markup with custom tags escaped
    pub markup: String,

    /// Records referenced by `data-ref` attributes
    pub metadata: TagMetadata,
}

/// Rewrites lists, tables, images and registered tags.
pub struct TagHandler<'c> {
    config: &'c Configuration,
}

impl<'c> TagHandler<'c> {
    /// Create a handler for the given configuration.
    pub fn new(config: &'c Configuration) -> Self {
        Self { config }
    }

    /// Rewrite markup and collect tag metadata.
    pub fn rewrite(&self, raw: &str) -> Rewritten {
        let mut state = RewriteState::new(self.config, raw.len());
        for token in Scanner::new(raw) {
            state.feed(token);
        }
        state.finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    /// Copied through unchanged
    Plain,
    /// Renamed with the prefix
    Escaped,
    /// Renamed list container
    List,
    /// Renamed table container
    Table,
}

#[derive(Debug)]
struct OpenElement {
    name: String,
    role: Role,
}

#[derive(Debug)]
struct TableCapture {
    record: usize,
    depth: u32,
    markup: String,
}

struct RewriteState<'c> {
    config: &'c Configuration,
    out: String,
    metadata: TagMetadata,
    open: Vec<OpenElement>,
    lists: ListTracker,
    tables: TableTracker,
    capture: Option<TableCapture>,
    linked_tables: u32,
}

impl<'c> RewriteState<'c> {
    fn new(config: &'c Configuration, capacity: usize) -> Self {
        Self {
            config,
            out: String::with_capacity(capacity + capacity / 4),
            metadata: TagMetadata::new(),
            open: Vec::new(),
            lists: ListTracker::new(config.list_indent_width),
            tables: TableTracker::new(),
            capture: None,
            linked_tables: 0,
        }
    }

    fn feed(&mut self, token: Token<'_>) {
        if self.capture.is_some() {
            self.capture_token(&token);
            return;
        }

        match token {
            Token::Text(text) => self.push_text(text),
            Token::RawText(text) => self.out.push_str(text),
            Token::Comment(comment) => log::trace!("dropping comment {:?}", comment),
            Token::StartTag(tag) => self.start_tag(&tag),
            Token::EndTag { name, .. } => self.end_tag(&name),
        }
    }

    fn finish(mut self) -> Rewritten {
        if self.capture.is_some() {
            log::debug!("table never closed, linking the rest of the document");
            self.finish_capture();
        }
        if !self.open.is_empty() {
            log::debug!("closing {} element(s) left open at end of input", self.open.len());
        }
        self.close_through(0);

        Rewritten {
            markup: self.out,
            metadata: self.metadata,
        }
    }

    fn push_text(&mut self, text: &str) {
        if text.contains('<') {
            self.out.push_str(&text.replace('<', "&lt;"));
        } else {
            self.out.push_str(text);
        }
    }

    fn start_tag(&mut self, tag: &StartTag<'_>) {
        let config = self.config;
        let name = tag.name.as_str();

        if let Some(kind) = config.factories.create(name, &tag.attributes) {
            let id = self.metadata.push(TagRecord::new(name, kind));
            self.open_escaped(name, Role::Escaped, Some(id));
            if tag.self_closing || is_void(name) {
                self.close_top();
            }
            return;
        }

        match name {
            "ul" | "ol" => {
                self.lists.push(name == "ol", &tag.attributes);
                self.open_escaped(name, Role::List, None);
            }
            "li" => {
                self.close_implied(&["li"], &["ul", "ol", "table"]);
                let item = self.lists.next_item();
                log::trace!(
                    "list item {} at depth {} ({} open lists)",
                    item.ordinal,
                    item.depth,
                    self.lists.depth()
                );
                let id = self
                    .metadata
                    .push(TagRecord::new(name, SpanKind::ListItem(item)));
                self.open_escaped(name, Role::Escaped, Some(id));
            }
            "table" => match &config.table_mode {
                TableMode::Inline => {
                    self.tables.open();
                    self.open_escaped(name, Role::Table, None);
                }
                TableMode::Link { text } => {
                    self.start_capture(tag, text);
                    return;
                }
            },
            "tr" => {
                self.close_implied(&["tr"], &["table"]);
                self.close_implied(&["td", "th"], &["table"]);
                self.tables.next_row();
                self.open_escaped(name, Role::Escaped, None);
            }
            "td" | "th" => {
                self.close_implied(&["td", "th"], &["tr", "table"]);
                let (row, col) = self.tables.next_cell();
                let id = self
                    .metadata
                    .push(TagRecord::new(name, SpanKind::TableCell { row, col }));
                self.open_escaped(name, Role::Escaped, Some(id));
            }
            "img" => {
                let source = tag.attributes.get("src").unwrap_or_default().to_string();
                let id = self
                    .metadata
                    .push(TagRecord::new(name, SpanKind::Image { source }));
                self.out
                    .push_str(&format!("<{}img {}=\"{}\">", TAG_PREFIX, REF_ATTR, id));
                return;
            }
            _ => {
                self.out.push_str(tag.raw);
                if !tag.self_closing && !is_void(name) {
                    self.open.push(OpenElement {
                        name: name.to_string(),
                        role: Role::Plain,
                    });
                }
                return;
            }
        }

        if tag.self_closing {
            self.close_top();
        }
    }

    fn end_tag(&mut self, name: &str) {
        match self.open.iter().rposition(|e| e.name == name) {
            Some(index) => self.close_through(index),
            None => log::debug!("dropping unmatched closing tag </{}>", name),
        }
    }

    fn open_escaped(&mut self, name: &str, role: Role, id: Option<usize>) {
        match id {
            Some(id) => self
                .out
                .push_str(&format!("<{}{} {}=\"{}\">", TAG_PREFIX, name, REF_ATTR, id)),
            None => self.out.push_str(&format!("<{}{}>", TAG_PREFIX, name)),
        }
        self.open.push(OpenElement {
            name: name.to_string(),
            role,
        });
    }

    // Close an open element named in `names` unless a `boundary` element
    // sits above it.
    fn close_implied(&mut self, names: &[&str], boundary: &[&str]) {
        for index in (0..self.open.len()).rev() {
            let name = self.open[index].name.as_str();
            if names.contains(&name) {
                self.close_through(index);
                return;
            }
            if boundary.contains(&name) {
                return;
            }
        }
    }

    fn close_top(&mut self) {
        if let Some(index) = self.open.len().checked_sub(1) {
            self.close_through(index);
        }
    }

    fn close_through(&mut self, index: usize) {
        while self.open.len() > index {
            let Some(element) = self.open.pop() else {
                break;
            };
            if self.open.len() > index {
                log::trace!("implicitly closing <{}>", element.name);
            }
            self.emit_close(&element);
        }
    }

    fn emit_close(&mut self, element: &OpenElement) {
        match element.role {
            Role::Plain => self.out.push_str(&format!("</{}>", element.name)),
            Role::Escaped => self
                .out
                .push_str(&format!("</{}{}>", TAG_PREFIX, element.name)),
            Role::List => {
                self.lists.pop();
                self.out
                    .push_str(&format!("</{}{}>", TAG_PREFIX, element.name));
            }
            Role::Table => {
                self.tables.close();
                self.out
                    .push_str(&format!("</{}{}>", TAG_PREFIX, element.name));
            }
        }
    }

    fn start_capture(&mut self, tag: &StartTag<'_>, link_text: &str) {
        let target = format!("table-{}", self.linked_tables);
        self.linked_tables += 1;

        let id = self.metadata.push(TagRecord::new(
            "table",
            SpanKind::ClickableRegion { target },
        ));
        self.out.push_str(&format!(
            "<{prefix}{tag} {attr}=\"{id}\">{text}</{prefix}{tag}>",
            prefix = TAG_PREFIX,
            tag = TABLE_LINK_TAG,
            attr = REF_ATTR,
            id = id,
            text = escape_html(link_text),
        ));

        if tag.self_closing {
            self.set_record_markup(id, tag.raw.to_string());
            return;
        }

        self.capture = Some(TableCapture {
            record: id,
            depth: 1,
            markup: tag.raw.to_string(),
        });
    }

    fn capture_token(&mut self, token: &Token<'_>) {
        let Some(capture) = self.capture.as_mut() else {
            return;
        };
        capture.markup.push_str(token.raw());

        match token {
            Token::StartTag(tag) if tag.name == "table" && !tag.self_closing => {
                capture.depth += 1;
            }
            Token::EndTag { name, .. } if name == "table" => {
                capture.depth -= 1;
                if capture.depth == 0 {
                    self.finish_capture();
                }
            }
            _ => {}
        }
    }

    fn finish_capture(&mut self) {
        if let Some(capture) = self.capture.take() {
            self.set_record_markup(capture.record, capture.markup);
        }
    }

    fn set_record_markup(&mut self, id: usize, markup: String) {
        if let Some(record) = self.metadata.get_mut(id) {
            record.markup = Some(markup);
        }
    }
}
