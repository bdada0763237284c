//! Reference HTML converter.

use super::HtmlConverter;
use crate::error::ConversionError;
use crate::handler::{REF_ATTR, TAG_PREFIX};
use crate::model::{SpanKind, StyledRange, TagMetadata, TextDocument};
use crate::scanner::{decode_entities, is_void, Scanner, StartTag, Token};

/// Character standing in for an embedded image.
pub const OBJECT_REPLACEMENT: char = '\u{FFFC}';

/// Elements that start and end on their own line.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "caption", "center", "dd", "div", "dl", "dt",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "li",
    "main", "nav", "ol", "p", "pre", "section", "table", "tablelink", "tr", "ul",
];

/// Elements whose text never reaches the output.
const SKIPPED_ELEMENTS: [&str; 4] = ["head", "script", "style", "title"];

/// Rewritten containers that carry no tag record.
const CONTAINERS: [&str; 4] = ["ol", "table", "tr", "ul"];

/// Converts rewritten markup with a fixed set of rules.
///
/// - `b`, `strong` and headings are bold; `i`, `em`, `cite`, `dfn` and
///   `var` are italic; `u` and `ins` are underlined.
/// - `a href` becomes a clickable region targeting the link.
/// - Block elements end with a single line break and `br` inserts one.
/// - Runs of whitespace collapse to a single space outside `pre`.
/// - Images become [`OBJECT_REPLACEMENT`]; table cells after the first in a
///   row are preceded by a tab.
/// - `head`, `title`, `script` and `style` are dropped.
///
/// Rewritten `htmlspan-` tags take their span from the tag record their
/// `data-ref` points at.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicConverter;

impl BasicConverter {
    /// Create a converter.
    pub fn new() -> Self {
        Self
    }
}

impl HtmlConverter for BasicConverter {
    fn convert(
        &self,
        markup: &str,
        metadata: &TagMetadata,
    ) -> Result<TextDocument, ConversionError> {
        let mut builder = DocumentBuilder::new(metadata, markup.len());
        for token in Scanner::new(markup) {
            builder.feed(token)?;
        }
        Ok(builder.finish())
    }
}

fn is_block(name: &str) -> bool {
    BLOCK_ELEMENTS.contains(&name)
}

fn inline_kind(tag: &StartTag<'_>) -> Option<SpanKind> {
    match tag.name.as_str() {
        "b" | "strong" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Some(SpanKind::Bold),
        "i" | "em" | "cite" | "dfn" | "var" => Some(SpanKind::Italic),
        "u" | "ins" => Some(SpanKind::Underline),
        "a" => tag.attributes.get("href").map(|href| SpanKind::ClickableRegion {
            target: href.to_string(),
        }),
        _ => None,
    }
}

#[derive(Debug)]
struct OpenTag {
    name: String,
    span: Option<usize>,
    block: bool,
    skip: bool,
    preformatted: bool,
}

struct DocumentBuilder<'m> {
    metadata: &'m TagMetadata,
    text: String,
    spans: Vec<StyledRange>,
    open: Vec<OpenTag>,
    skip_depth: usize,
    pre_depth: usize,
    pending_space: bool,
}

impl<'m> DocumentBuilder<'m> {
    fn new(metadata: &'m TagMetadata, capacity: usize) -> Self {
        Self {
            metadata,
            text: String::with_capacity(capacity),
            spans: Vec::with_capacity(metadata.len()),
            open: Vec::new(),
            skip_depth: 0,
            pre_depth: 0,
            pending_space: false,
        }
    }

    fn feed(&mut self, token: Token<'_>) -> Result<(), ConversionError> {
        match token {
            Token::Text(text) => self.push_text(text),
            Token::RawText(_) | Token::Comment(_) => {}
            Token::StartTag(tag) => self.start_tag(&tag)?,
            Token::EndTag { name, .. } => self.end_tag(&name),
        }
        Ok(())
    }

    fn finish(mut self) -> TextDocument {
        for element in self.open.split_off(0).into_iter().rev() {
            self.close(element);
        }
        TextDocument::new(self.text, self.spans)
    }

    fn push_text(&mut self, raw: &str) {
        if self.skip_depth > 0 {
            return;
        }

        let decoded = decode_entities(raw);
        if self.pre_depth > 0 {
            self.flush_space();
            self.text.push_str(&decoded);
            return;
        }

        for c in decoded.chars() {
            if c.is_ascii_whitespace() {
                self.pending_space = true;
            } else {
                self.flush_space();
                self.text.push(c);
            }
        }
    }

    // No space at the start of a line or cell, nor after another space.
    fn flush_space(&mut self) {
        if std::mem::take(&mut self.pending_space)
            && !matches!(
                self.text.chars().next_back(),
                None | Some(' ') | Some('\n') | Some('\t')
            )
        {
            self.text.push(' ');
        }
    }

    fn ensure_line_break(&mut self) {
        self.pending_space = false;
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
    }

    fn start_tag(&mut self, tag: &StartTag<'_>) -> Result<(), ConversionError> {
        // Inside a skipped element tags are only tracked for their end tags.
        if self.skip_depth > 0 {
            let local = tag.name.strip_prefix(TAG_PREFIX).unwrap_or(tag.name.as_str());
            if !tag.self_closing && !is_void(local) {
                self.open.push(OpenTag {
                    name: tag.name.clone(),
                    span: None,
                    block: false,
                    skip: false,
                    preformatted: false,
                });
            }
            return Ok(());
        }

        let escaped = tag.name.strip_prefix(TAG_PREFIX);
        let local = escaped.unwrap_or(tag.name.as_str());

        if escaped.is_none() {
            match local {
                "br" => {
                    self.pending_space = false;
                    self.text.push('\n');
                    return Ok(());
                }
                "hr" => {
                    self.ensure_line_break();
                    return Ok(());
                }
                _ => {}
            }
        }

        let kind = match escaped {
            Some(_) => self.resolve(tag, local)?,
            None => inline_kind(tag),
        };

        let block = is_block(local);
        if block {
            self.ensure_line_break();
        } else if kind.is_some() {
            self.flush_space();
        }

        if let Some(SpanKind::TableCell { col, .. }) = &kind {
            self.pending_space = false;
            if *col > 0 {
                self.text.push('\t');
            }
        }

        let span = kind.map(|kind| {
            let at = self.text.len();
            self.spans.push(StyledRange::new(at, at, kind));
            self.spans.len() - 1
        });

        if escaped.is_some() && local == "img" {
            self.text.push(OBJECT_REPLACEMENT);
        }

        let element = OpenTag {
            name: tag.name.clone(),
            span,
            block,
            skip: escaped.is_none() && SKIPPED_ELEMENTS.contains(&local),
            preformatted: escaped.is_none() && local == "pre",
        };
        if element.skip {
            self.skip_depth += 1;
        }
        if element.preformatted {
            self.pre_depth += 1;
        }

        if tag.self_closing || is_void(local) {
            self.close(element);
        } else {
            self.open.push(element);
        }
        Ok(())
    }

    fn end_tag(&mut self, name: &str) {
        let Some(index) = self.open.iter().rposition(|e| e.name == name) else {
            return;
        };
        for element in self.open.split_off(index).into_iter().rev() {
            self.close(element);
        }
    }

    fn close(&mut self, element: OpenTag) {
        if element.block {
            self.ensure_line_break();
        }
        if let Some(span) = element.span.and_then(|i| self.spans.get_mut(i)) {
            span.end = self.text.len();
        }
        if element.skip {
            self.skip_depth = self.skip_depth.saturating_sub(1);
        }
        if element.preformatted {
            self.pre_depth = self.pre_depth.saturating_sub(1);
        }
    }

    fn resolve(
        &self,
        tag: &StartTag<'_>,
        local: &str,
    ) -> Result<Option<SpanKind>, ConversionError> {
        let Some(value) = tag.attributes.get(REF_ATTR) else {
            if CONTAINERS.contains(&local) {
                return Ok(None);
            }
            return Err(ConversionError::new(
                tag.raw,
                format!("missing {} attribute", REF_ATTR),
            ));
        };

        let record = value
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|id| self.metadata.get(id))
            .ok_or_else(|| {
                let message = format!("no tag record for {}=\"{}\"", REF_ATTR, value);
                ConversionError::new(tag.raw, message)
            })?;
        Ok(Some(record.kind.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::convert::convert;

    fn raw(markup: &str) -> TextDocument {
        BasicConverter
            .convert(markup, &TagMetadata::new())
            .unwrap()
    }

    fn pipeline(html: &str) -> TextDocument {
        convert(html, &Configuration::default(), &BasicConverter).unwrap()
    }

    fn ranges(doc: &TextDocument, pred: impl Fn(&SpanKind) -> bool) -> Vec<(usize, usize)> {
        doc.spans_where(pred).map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn test_inline_styles() {
        let doc = raw("<p>Hello <b>bold</b> and <i>it</i><u>u</u></p>");
        assert_eq!(doc.text(), "Hello bold and itu\n");
        assert_eq!(ranges(&doc, |k| *k == SpanKind::Bold), vec![(6, 10)]);
        assert_eq!(ranges(&doc, |k| *k == SpanKind::Italic), vec![(15, 17)]);
        assert_eq!(ranges(&doc, |k| *k == SpanKind::Underline), vec![(17, 18)]);
    }

    #[test]
    fn test_spans_in_opening_order() {
        let doc = raw("<b><i>x</i></b>");
        let kinds: Vec<&SpanKind> = doc.spans().iter().map(|s| &s.kind).collect();
        assert_eq!(kinds, vec![&SpanKind::Bold, &SpanKind::Italic]);
    }

    #[test]
    fn test_whitespace_and_entities() {
        assert_eq!(raw("  a \n\t b  ").text(), "a b");
        assert_eq!(raw("a &amp; b&nbsp;c").text(), "a & b\u{A0}c");
        assert_eq!(raw("a<br>b").text(), "a\nb");
    }

    #[test]
    fn test_space_around_styled_tag_collapses() {
        let doc = pipeline("a <b> b</b>");
        assert_eq!(doc.text(), "a b");
        assert_eq!(ranges(&doc, |k| *k == SpanKind::Bold), vec![(2, 3)]);

        assert_eq!(raw("x <i> </i> y").text(), "x y");
    }

    #[test]
    fn test_preformatted_text_kept() {
        assert_eq!(raw("<pre>a  b\n c</pre>").text(), "a  b\n c\n");
    }

    #[test]
    fn test_skipped_elements() {
        let doc = raw(
            "<head><title>T</title><style>p{}</style></head>\
             <p>x</p><script>y()</script>",
        );
        assert_eq!(doc.text(), "x\n");
    }

    #[test]
    fn test_markup_inside_skipped_elements_ignored() {
        let doc = pipeline("<head><title>a<br>b</title></head><p>x</p>");
        assert_eq!(doc.text(), "x");

        let doc = pipeline(
            "<head><title>t<hr></title><div><b>c</b><img src=\"i.png\"></div></head>\
             <p>x</p>",
        );
        assert_eq!(doc.text(), "x");
        assert!(doc.spans().is_empty());
    }

    #[test]
    fn test_link() {
        let doc = raw("see <a href=\"https://example.com\">site</a>");
        assert_eq!(doc.text(), "see site");
        assert_eq!(
            doc.spans()[0],
            StyledRange::new(
                4,
                8,
                SpanKind::ClickableRegion {
                    target: "https://example.com".into()
                }
            )
        );
    }

    #[test]
    fn test_image_placeholder() {
        let doc = pipeline("a<img src=\"p.png\">b");
        assert_eq!(doc.text(), "a\u{FFFC}b");
        assert_eq!(
            ranges(&doc, |k| matches!(k, SpanKind::Image { .. })),
            vec![(1, 4)]
        );
    }

    #[test]
    fn test_table_cells() {
        let doc = pipeline("<table><tr><td>a</td><td>b</td></tr><tr><td>c</td></tr></table>");
        assert_eq!(doc.text(), "a\tb\nc");
        assert_eq!(
            ranges(&doc, |k| matches!(k, SpanKind::TableCell { .. })),
            vec![(0, 1), (2, 3), (4, 5)]
        );
    }

    #[test]
    fn test_table_link() {
        let config = Configuration::new().with_table_link("Open");
        let doc = convert("<table><tr><td>1</td></tr></table>", &config, &BasicConverter).unwrap();
        assert_eq!(doc.text(), "Open");
        assert_eq!(
            doc.spans()[0],
            StyledRange::new(
                0,
                4,
                SpanKind::ClickableRegion {
                    target: "table-0".into()
                }
            )
        );
    }

    #[test]
    fn test_containers_need_no_record() {
        assert_eq!(raw("<htmlspan-ul>x</htmlspan-ul>").text(), "x\n");
    }

    #[test]
    fn test_missing_ref_is_error() {
        let err = BasicConverter
            .convert("<htmlspan-li>x</htmlspan-li>", &TagMetadata::new())
            .unwrap_err();
        assert_eq!(err.fragment, "<htmlspan-li>");
    }

    #[test]
    fn test_unknown_ref_is_error() {
        let err = BasicConverter
            .convert("<htmlspan-td data-ref=\"7\">x", &TagMetadata::new())
            .unwrap_err();
        assert_eq!(err.fragment, "<htmlspan-td data-ref=\"7\">");
        assert!(err.message.contains("data-ref"));
    }

    #[test]
    fn test_unclosed_bold_runs_to_end() {
        let doc = pipeline("Hello <b>world");
        assert_eq!(doc.text(), "Hello world");
        assert_eq!(ranges(&doc, |k| *k == SpanKind::Bold), vec![(6, 11)]);
    }
}
