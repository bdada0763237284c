//! Integration tests for the tag handler.

use htmlspan::handler::{TagHandler, REF_ATTR, TAG_PREFIX};
use htmlspan::model::{Attributes, CustomSpan, ListItem, SpanKind};
use htmlspan::Configuration;

fn items(html: &str) -> Vec<ListItem> {
    let config = Configuration::default();
    TagHandler::new(&config)
        .rewrite(html)
        .metadata
        .list_items()
        .cloned()
        .collect()
}

#[test]
fn test_every_record_is_referenced_once() {
    let config = Configuration::default();
    let rewritten = TagHandler::new(&config).rewrite(
        "<ul><li>a</li><li>b<img src=x.png></li></ul>\
         <table><tr><td>1</td><td>2</td></tr></table>",
    );

    for id in 0..rewritten.metadata.len() {
        let needle = format!("{}=\"{}\"", REF_ATTR, id);
        assert_eq!(rewritten.markup.matches(&needle).count(), 1, "ref {}", id);
    }
    assert_eq!(rewritten.metadata.len(), 5);
}

#[test]
fn test_rewritten_tags_are_balanced() {
    let config = Configuration::default();
    let rewritten = TagHandler::new(&config).rewrite("<ol><li>a<li>b<ul><li>c</ol><td>x");

    for name in ["ol", "ul", "li", "td"] {
        let open = rewritten.markup.matches(&format!("<{}{}", TAG_PREFIX, name)).count();
        let close = rewritten
            .markup
            .matches(&format!("</{}{}>", TAG_PREFIX, name))
            .count();
        assert_eq!(open, close, "unbalanced <{}>", name);
    }
}

#[test]
fn test_ordered_list_numbering() {
    let items = items("<ol><li>A</li><li>B</li></ol>");
    let summary: Vec<(u32, u32, String)> = items
        .iter()
        .map(|i| (i.ordinal, i.depth, i.glyph()))
        .collect();
    assert_eq!(
        summary,
        vec![(1, 0, "1.".to_string()), (2, 0, "2.".to_string())]
    );
}

#[test]
fn test_sibling_lists_restart_numbering() {
    let items = items("<ol><li>a</li><li>b</li></ol><ol><li>c</li></ol>");
    let ordinals: Vec<u32> = items.iter().map(|i| i.ordinal).collect();
    assert_eq!(ordinals, vec![1, 2, 1]);
}

#[test]
fn test_ordered_list_start_and_type() {
    let items = items("<ol start=\"4\" type=\"A\"><li>d</li><li>e</li></ol>");
    let glyphs: Vec<String> = items.iter().map(|i| i.glyph()).collect();
    assert_eq!(glyphs, vec!["D.", "E."]);
}

#[test]
fn test_nested_indent_uses_configured_width() {
    let config = Configuration::new().with_list_indent(16.0);
    let html = "<ul><li>a<ol><li>b<ul><li>c</li></ul></li></ol></li></ul>";
    let rewritten = TagHandler::new(&config).rewrite(html);
    let indents: Vec<f32> = rewritten.metadata.list_items().map(|i| i.indent).collect();
    assert_eq!(indents, vec![16.0, 32.0, 48.0]);
}

#[test]
fn test_uppercase_markup() {
    let items = items("<UL><LI>a</LI><Li>b</lI></UL>");
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| !i.is_ordered()));
}

#[test]
fn test_nested_table_coordinates() {
    let config = Configuration::default();
    let rewritten = TagHandler::new(&config).rewrite(
        "<table><tr><td>a</td><td><table><tr><td>in</td></tr></table></td></tr>\
         <tr><td>b</td></tr></table>",
    );
    let cells: Vec<(u32, u32)> = rewritten.metadata.table_cells().collect();
    assert_eq!(cells, vec![(0, 0), (0, 1), (0, 0), (1, 0)]);
}

#[test]
fn test_table_links_are_numbered() {
    let config = Configuration::new().with_table_link("table");
    let rewritten = TagHandler::new(&config)
        .rewrite("<table><tr><td>1</td></tr></table><p>mid</p><table><tr><td>2</td></tr></table>");

    assert_eq!(
        rewritten.metadata.table_markup("table-1"),
        Some("<table><tr><td>2</td></tr></table>")
    );
    assert!(rewritten.markup.contains("<p>mid</p>"));
    assert!(!rewritten.markup.contains("<td>"));
}

#[test]
fn test_factory_overrides_builtin_tag() {
    let config = Configuration::new().with_factory("img", |_: &str, attrs: &Attributes| {
        Some(SpanKind::Custom(
            CustomSpan::new("emoji").with_attributes(attrs.clone()),
        ))
    });
    let rewritten = TagHandler::new(&config).rewrite("<img alt=\":)\">");

    assert_eq!(rewritten.markup, "<htmlspan-img data-ref=\"0\"></htmlspan-img>");
    assert_eq!(rewritten.metadata.get(0).map(|r| r.kind.name()), Some("emoji"));
}

#[test]
fn test_malformed_markup_never_panics() {
    let config = Configuration::default();
    let inputs = [
        "",
        "<",
        "</",
        "<<<>>>",
        "</ul></li></table>",
        "<li><li><li>",
        "<td><tr><table>",
        "<a href=\"unterminated>text",
        "<!-- never closed",
        "<script>no end",
        "caf\u{e9} <b>\u{1F600}",
    ];
    for input in inputs {
        let rewritten = TagHandler::new(&config).rewrite(input);
        assert!(rewritten.markup.len() <= input.len() * 8 + 64, "{:?}", input);
    }
}
