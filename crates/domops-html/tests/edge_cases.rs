//! Edge case tests for domops-html
//!
//! Malformed markup, fragments and serializer round trips.

use domops_dom::{Document, DomTree, NodeId};
use domops_html::{HtmlParser, inner_html, outer_html, parse, parse_fragment, parse_with_url};

fn body(doc: &Document) -> NodeId {
    doc.body().expect("document has a body")
}

fn element_by_id(doc: &Document, id: &str) -> NodeId {
    doc.get_element_by_id(id).expect("element exists")
}

// ============================================================================
// EMPTY AND MINIMAL INPUT
// ============================================================================

#[test]
fn test_parse_empty_input_has_skeleton() {
    let doc = parse("").unwrap();
    assert!(doc.document_element().is_some());
    assert!(doc.head().is_some());
    assert!(doc.body().is_some());
}

#[test]
fn test_parse_only_doctype() {
    let doc = parse("<!DOCTYPE html>").unwrap();
    let tree = doc.tree();
    let first = tree.first_child(tree.root()).unwrap();
    assert!(tree.element(first).is_none());
    assert!(doc.body().is_some());
}

#[test]
fn test_parse_with_url() {
    let doc = parse_with_url("<p>x</p>", "https://example.com/page#intro").unwrap();
    assert_eq!(doc.url(), "https://example.com/page#intro");
}

// ============================================================================
// MALFORMED HTML
// ============================================================================

#[test]
fn test_parse_unclosed_tags() {
    let doc = parse("<div id=a><p><span>text").unwrap();
    let div = element_by_id(&doc, "a");
    assert_eq!(doc.tree().text_content(div), "text");
}

#[test]
fn test_parse_mismatched_tags() {
    let doc = parse("<div id=a><p></div></p>").unwrap();
    assert_eq!(doc.tree().tag_name(element_by_id(&doc, "a")), Some("div"));
}

#[test]
fn test_parse_orphan_closing_tag() {
    let doc = parse("</div>").unwrap();
    assert_eq!(doc.tree().child_ids(body(&doc)).len(), 0);
}

#[test]
fn test_uppercase_tags_and_attributes_are_lowercased() {
    let doc = parse(r#"<DIV ID="Top" CLASS="A b">x</DIV>"#).unwrap();
    let div = element_by_id(&doc, "Top");
    assert_eq!(doc.tree().tag_name(div), Some("div"));
    assert_eq!(doc.tree().get_attribute(div, "class"), Some("A b"));
}

#[test]
fn test_entities_are_decoded() {
    let doc = parse("<p id=p>fish &amp; chips &lt;3</p>").unwrap();
    assert_eq!(doc.tree().text_content(element_by_id(&doc, "p")), "fish & chips <3");
}

#[test]
fn test_whitespace_text_is_kept() {
    let doc = parse("<p id=p><b>a</b> <i>b</i></p>").unwrap();
    assert_eq!(doc.tree().text_content(element_by_id(&doc, "p")), "a b");
}

// ============================================================================
// FRAGMENTS
// ============================================================================

#[test]
fn test_fragment_text_only() {
    let mut tree = DomTree::new();
    let nodes = parse_fragment(&mut tree, "just text").unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(tree.text_content(nodes[0]), "just text");
}

#[test]
fn test_fragment_empty() {
    let mut tree = DomTree::new();
    assert!(parse_fragment(&mut tree, "").unwrap().is_empty());
}

#[test]
fn test_fragment_nested() {
    let mut tree = DomTree::new();
    let nodes = HtmlParser::new()
        .parse_fragment(&mut tree, "<ul><li>1</li><li>2</li></ul>")
        .unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(tree.element_children(nodes[0]).count(), 2);
}

// ============================================================================
// SERIALIZATION
// ============================================================================

#[test]
fn test_inner_html_round_trip() {
    let markup = r#"<span class="x">a &amp; b</span><br><!--note-->"#;
    let doc = parse(&format!("<div id=d>{markup}</div>")).unwrap();
    let div = element_by_id(&doc, "d");
    assert_eq!(inner_html(doc.tree(), div), markup);
}

#[test]
fn test_outer_html_of_void_with_attributes() {
    let doc = parse(r#"<img id=i src="a.png?x=1&amp;y=2">"#).unwrap();
    let img = element_by_id(&doc, "i");
    assert_eq!(
        outer_html(doc.tree(), img),
        r#"<img id="i" src="a.png?x=1&amp;y=2">"#
    );
}
