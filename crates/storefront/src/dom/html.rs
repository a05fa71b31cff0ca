//! HTML fragment parsing and serialization.

use ego_tree::NodeRef;
use scraper::{Html, Node};

use super::{Child, Element, ElementData};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub(super) fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Parse `markup` as a body fragment into detached children.
///
/// Comments, doctypes and processing instructions are dropped.
pub(super) fn parse_fragment(markup: &str) -> Vec<Child> {
    let fragment = Html::parse_fragment(markup);
    fragment
        .root_element()
        .children()
        .filter_map(convert)
        .collect()
}

fn convert(node: NodeRef<'_, Node>) -> Option<Child> {
    match node.value() {
        Node::Text(text) => Some(Child::Text((**text).to_string())),
        Node::Element(el) => {
            let mut element = Element::new(el.name());
            for (name, value) in el.attrs() {
                element = element.attr(name, value);
            }
            element.children = node.children().filter_map(convert).collect();
            Some(Child::Element(element))
        }
        _ => None,
    }
}

pub(super) fn open_tag(el: &ElementData, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);
    if !el.classes.is_empty() {
        out.push_str(" class=\"");
        out.push_str(&escape_attribute(&el.classes.join(" ")));
        out.push('"');
    }
    for (name, value) in &el.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attribute(value));
        out.push('"');
    }
    out.push('>');
}

pub(super) fn close_tag(el: &ElementData, out: &mut String) {
    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}

pub(super) fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
