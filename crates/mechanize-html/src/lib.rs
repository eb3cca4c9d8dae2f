//! HTML collaborator for the mechanize selector engine.
//!
//! # Scope
//!
//! This crate turns markup into a [`DomTree`]:
//! - **Parsing** - delegated to `scraper` (html5ever), so implied elements
//!   such as `<html>`, `<head>` and `<body>` are created the way browsers do
//! - **Conversion** - elements, text and comments are copied into the arena
//!   tree, attributes in source order
//! - **Debug output** - [`format_tree`] / [`print_tree`]
//!
//! Doctypes and processing instructions carry nothing a selector can match
//! and are dropped.

use std::collections::HashMap;
use std::fmt::Write;

use mechanize_common::warning::warn_once;
use mechanize_dom::{Attribute, DomTree, ElementData, NodeId, NodeType};
use scraper::{Html, Node};

/// Parse a complete HTML document into a [`DomTree`].
///
/// Parsing never fails: malformed markup is recovered the same way a browser
/// would recover it.
#[must_use]
pub fn parse_document(html: &str) -> DomTree {
    convert(&Html::parse_document(html))
}

/// Parse an HTML fragment (for example `<li>a</li><li>b</li>`).
///
/// The fragment parser wraps its output in an `<html>` element, which ends up
/// as the single child of the returned tree's Document node.
#[must_use]
pub fn parse_fragment(html: &str) -> DomTree {
    convert(&Html::parse_fragment(html))
}

fn convert(html: &Html) -> DomTree {
    let mut tree = DomTree::new();
    let mut ids = HashMap::new();

    for node in html.tree.root().descendants() {
        let Some(parent) = node.parent() else {
            // The scraper root maps onto our Document node.
            let _ = ids.insert(node.id(), tree.root());
            continue;
        };
        let Some(&parent_id) = ids.get(&parent.id()) else {
            continue;
        };

        let node_type = match node.value() {
            Node::Element(element) => NodeType::Element(ElementData {
                tag_name: element.name().to_string(),
                attrs: element
                    .attrs()
                    .map(|(name, value)| Attribute::new(name, value))
                    .collect(),
            }),
            Node::Text(text) => NodeType::Text(text.to_string()),
            Node::Comment(comment) => NodeType::Comment(comment.to_string()),
            Node::Doctype(_) | Node::ProcessingInstruction(_) => continue,
            Node::Document | Node::Fragment => {
                warn_once("HTML", "nested document node dropped during conversion");
                continue;
            }
        };

        let id = tree.alloc(node_type);
        tree.append_child(parent_id, id);
        let _ = ids.insert(node.id(), id);
    }

    tree
}

/// Render the subtree at `id` as an indented outline, one node per line.
#[must_use]
pub fn format_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, id, 0, &mut out);
    out
}

/// Print the subtree at `id` to stdout, indented by `indent` levels.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let mut out = String::new();
    write_node(tree, id, indent, &mut out);
    print!("{out}");
}

fn write_node(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let Some(node) = tree.get(id) else { return };
    let prefix = "  ".repeat(indent);

    // Writing into a String cannot fail.
    let _ = match &node.node_type {
        NodeType::Document => writeln!(out, "{prefix}Document"),
        NodeType::Element(data) if data.attrs.is_empty() => {
            writeln!(out, "{prefix}<{}>", data.tag_name)
        }
        NodeType::Element(data) => {
            let attrs: Vec<String> = data
                .attrs
                .iter()
                .map(|attr| {
                    if attr.value.is_empty() {
                        attr.name.clone()
                    } else {
                        format!("{}=\"{}\"", attr.name, attr.value)
                    }
                })
                .collect();
            writeln!(out, "{prefix}<{} {}>", data.tag_name, attrs.join(" "))
        }
        NodeType::Text(text) => {
            let display = text.replace('\n', "\\n").replace(' ', "\u{00B7}");
            writeln!(out, "{prefix}\"{display}\"")
        }
        NodeType::Comment(text) => writeln!(out, "{prefix}<!-- {text} -->"),
    };

    for &child in tree.children(id) {
        write_node(tree, child, indent + 1, out);
    }
}
