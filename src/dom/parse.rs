use std::io;

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever_rcdom::Handle;
use markup5ever_rcdom::NodeData;
use markup5ever_rcdom::RcDom;

use super::{Node, NodeType, HTML_NAMESPACE};
use crate::error::{ParseError, ParseErrorKind};

/// Parses `html` as a complete standalone document.
///
/// `<html>`, `<head>` and `<body>` are synthesized exactly as a browser would
/// for a detached parser document. Scripting is disabled, so `<noscript>`
/// contents are parsed as markup rather than raw text.
pub fn parse_html(html: &str) -> Result<Node, ParseError> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };

    let mut reader = io::Cursor::new(html.as_bytes());
    let dom = parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut reader)
        .map_err(|e| {
            ParseError::new(
                ParseErrorKind::InvalidHtml,
                format!("failed to read document: {}", e),
            )
        })?;

    convert_handle_to_node(&dom.document, 0).ok_or_else(|| {
        ParseError::new(ParseErrorKind::InvalidHtml, "parser produced no document root")
    })
}

/// Longest root-to-leaf path, in nodes, that a parsed tree keeps.
///
/// Nodes that would sit deeper are re-parented as siblings under the element
/// at the limit, in document order, as browsers do for pathological nesting.
/// Every walk over a parsed tree can therefore recurse safely.
pub const MAX_TREE_DEPTH: usize = 512;

fn convert_handle_to_node(handle: &Handle, depth: usize) -> Option<Node> {
    let node_type = convert_data(handle)?;

    let children = if depth + 2 >= MAX_TREE_DEPTH {
        flatten_descendants(handle)
    } else {
        child_handles(handle)
            .iter()
            .filter_map(|child| convert_handle_to_node(child, depth + 1))
            .collect()
    };

    Some(Node {
        node_type,
        children,
    })
}

/// Converts every descendant of `handle` into a childless node, in document
/// order, using an explicit stack.
fn flatten_descendants(handle: &Handle) -> Vec<Node> {
    let mut flat = Vec::new();
    let mut stack: Vec<Handle> = child_handles(handle).into_iter().rev().collect();

    while let Some(next) = stack.pop() {
        if let Some(node_type) = convert_data(&next) {
            flat.push(Node {
                node_type,
                children: Vec::new(),
            });
        }
        stack.extend(child_handles(&next).into_iter().rev());
    }
    flat
}

fn child_handles(handle: &Handle) -> Vec<Handle> {
    match &handle.data {
        // Template contents live in a separate fragment; fold them back in so
        // transforms and serialization see them.
        NodeData::Element {
            name,
            template_contents,
            ..
        } if name.local.as_ref().eq_ignore_ascii_case("template") => template_contents
            .borrow()
            .as_ref()
            .map(|content| content.children.borrow().clone())
            .unwrap_or_default(),
        NodeData::Element { .. } | NodeData::Document => handle.children.borrow().clone(),
        _ => Vec::new(),
    }
}

fn convert_data(handle: &Handle) -> Option<NodeType> {
    let node_type = match &handle.data {
        NodeData::Document => NodeType::Document,
        NodeData::Element { name, attrs, .. } => {
            let namespace = if name.ns.as_ref() == HTML_NAMESPACE {
                String::new()
            } else {
                name.ns.to_string()
            };
            let attributes = attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect();
            NodeType::Element {
                tag_name: name.local.to_string(),
                namespace,
                attributes,
            }
        }
        NodeData::Text { contents } => NodeType::Text {
            content: contents.borrow().to_string(),
        },
        NodeData::Comment { contents } => NodeType::Comment {
            content: contents.to_string(),
        },
        _ => return None,
    };
    Some(node_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_is_wrapped_in_document_structure() {
        let doc = parse_html("<p>Hello</p>").expect("parse");

        assert!(matches!(doc.node_type, NodeType::Document));
        let body = doc.body().expect("body synthesized");
        assert_eq!(body.inner_html(), "<p>Hello</p>");
        assert!(doc.find(&|n: &Node| n.is_html_element("head")).is_some());
    }

    #[test]
    fn style_in_fragment_lands_in_head() {
        let doc = parse_html("<style>body { color: red; }</style><p>x</p>").expect("parse");

        let head = doc
            .find(&|n: &Node| n.is_html_element("head"))
            .expect("head");
        assert!(head.find(&|n: &Node| n.is_html_element("style")).is_some());
        assert_eq!(doc.body().expect("body").inner_html(), "<p>x</p>");
    }

    #[test]
    fn attributes_are_preserved() {
        let doc = parse_html(r#"<img src="http://a/b.gif" width="1" height="1">"#).expect("parse");

        let img = doc.find(&|n: &Node| n.is_html_element("img")).expect("img");
        assert_eq!(img.get_attribute_ref("src"), Some("http://a/b.gif"));
        assert_eq!(img.get_attribute_ref("width"), Some("1"));
    }

    #[test]
    fn noscript_content_is_parsed_as_markup() {
        let doc = parse_html("<noscript><img src=x.png></noscript>").expect("parse");

        assert!(doc.find(&|n: &Node| n.is_html_element("img")).is_some());
    }

    #[test]
    fn svg_children_keep_their_namespace() {
        let doc = parse_html("<svg><script>alert(1)</script></svg>").expect("parse");

        let script = doc
            .find(&|n: &Node| n.tag_name() == Some("script"))
            .expect("script");
        assert_eq!(script.namespace(), Some("http://www.w3.org/2000/svg"));
    }

    #[test]
    fn empty_input_still_yields_body() {
        let doc = parse_html("").expect("parse");
        assert_eq!(doc.body().expect("body").inner_html(), "");
    }

    fn depth(node: &Node) -> usize {
        1 + node.children.iter().map(depth).max().unwrap_or(0)
    }

    #[test]
    fn deep_nesting_is_capped_and_keeps_every_element() {
        let doc = parse_html(&"<div>".repeat(2_000)).expect("parse");

        assert_eq!(depth(&doc), MAX_TREE_DEPTH);
        let divs = doc.find_all(&|n: &Node| n.is_html_element("div")).len();
        assert_eq!(divs, 2_000);
    }

    #[test]
    fn shallow_documents_are_not_flattened() {
        let doc = parse_html("<div><p><b>x</b></p></div>").expect("parse");

        assert_eq!(
            doc.body().expect("body").inner_html(),
            "<div><p><b>x</b></p></div>"
        );
    }

    #[test]
    fn overflow_keeps_document_order() {
        let html = format!("{}<i>a</i><b>b</b>", "<span>".repeat(MAX_TREE_DEPTH));
        let doc = parse_html(&html).expect("parse");

        let text = doc.text_content();
        assert_eq!(text, "ab");
    }
}
