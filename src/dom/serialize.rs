//! HTML fragment serialization for [`Node`] trees.

use super::{Node, NodeType};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe",
    "noembed",
    "noframes",
    "plaintext",
    "script",
    "style",
    "xmp",
];

pub(super) fn inner_html(node: &Node) -> String {
    let mut out = String::new();
    let parent = node.tag_name();
    for child in &node.children {
        write_node(child, parent, &mut out);
    }
    out
}

pub(super) fn outer_html(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, None, &mut out);
    out
}

fn write_node(node: &Node, parent_tag: Option<&str>, out: &mut String) {
    match &node.node_type {
        NodeType::Document => {
            for child in &node.children {
                write_node(child, None, out);
            }
        }
        NodeType::Element {
            tag_name,
            attributes,
            ..
        } => {
            out.push('<');
            out.push_str(tag_name);
            for (name, value) in attributes {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_into(value, true, out);
                out.push('"');
            }
            out.push('>');

            if is_one_of(tag_name, VOID_ELEMENTS) {
                return;
            }
            for child in &node.children {
                write_node(child, Some(tag_name), out);
            }
            out.push_str("</");
            out.push_str(tag_name);
            out.push('>');
        }
        NodeType::Text { content } => {
            if parent_tag.is_some_and(|tag| is_one_of(tag, RAW_TEXT_ELEMENTS)) {
                out.push_str(content);
            } else {
                escape_into(content, false, out);
            }
        }
        NodeType::Comment { content } => {
            out.push_str("<!--");
            out.push_str(content);
            out.push_str("-->");
        }
    }
}

fn is_one_of(tag: &str, set: &[&str]) -> bool {
    set.iter().any(|candidate| tag.eq_ignore_ascii_case(candidate))
}

fn escape_into(value: &str, attribute_mode: bool, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            '"' if attribute_mode => out.push_str("&quot;"),
            '<' if !attribute_mode => out.push_str("&lt;"),
            '>' if !attribute_mode => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}
