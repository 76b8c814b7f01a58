//! Markup renderer.
//!
//! Serializes a tree to markup deterministically, with no patch generation
//! and no shared state. Besides producing initial/server-rendered output,
//! this is the correctness oracle for the whole engine: for any `old` and
//! `new`, replaying `diff(old, new)` against a live tree initialized from
//! `old` and rendering it must equal `render(new)` byte for byte.
//!
//! Escaping: text and attribute values escape `& < > " '`. Raw nodes are
//! emitted verbatim by design; whoever constructs one owns its safety.
//! Malformed input (invalid names, void elements with children, raw
//! content markup cannot carry) fails loudly — see
//! [`RenderError`](crate::error::RenderError).

use crate::attr::Attr;
use crate::error::{RenderError, RenderResult};
use crate::node::{Element, Node};

/// Attribute under which an element's identity token is serialized.
pub const ID_ATTR: &str = "data-id";

/// Render a tree to markup.
pub fn render(node: &Node) -> RenderResult<String> {
    let mut out = String::new();
    render_node(node, &mut out)?;
    Ok(out)
}

fn render_node(node: &Node, out: &mut String) -> RenderResult<()> {
    match node {
        Node::Element(elem) => render_element(elem, out),
        Node::Text(text) => {
            escape_into(&text.value, out);
            Ok(())
        }
        Node::Raw(raw) => {
            if raw.html.contains('\0') {
                return Err(RenderError::UnserializableRaw {
                    id: raw.id.clone(),
                });
            }
            out.push_str(&raw.html);
            Ok(())
        }
        Node::Empty(_) => Ok(()),
    }
}

fn render_element(elem: &Element, out: &mut String) -> RenderResult<()> {
    if !is_valid_tag(&elem.tag) {
        return Err(RenderError::InvalidTag {
            id: elem.id.clone(),
            tag: elem.tag.clone(),
        });
    }

    out.push('<');
    out.push_str(&elem.tag);

    out.push(' ');
    out.push_str(ID_ATTR);
    out.push_str("=\"");
    escape_into(elem.id.as_str(), out);
    out.push('"');

    // Attributes serialize in canonical (name-sorted) order. Patches carry
    // no attribute positions, so the live tree's insertion order may differ
    // from the builder's; the oracle must not see that.
    let mut attrs: Vec<(compact_str::CompactString, &Attr)> = elem
        .attrs
        .iter()
        .map(|attr| (attr.rendered_name(), attr))
        .collect();
    attrs.sort_by(|a, b| a.0.cmp(&b.0));

    for (name, attr) in attrs {
        if !is_valid_attr_name(&name) {
            return Err(RenderError::InvalidAttrName {
                id: elem.id.clone(),
                name,
            });
        }
        out.push(' ');
        out.push_str(&name);
        out.push_str("=\"");
        match attr {
            Attr::Plain(a) => escape_into(&a.value, out),
            Attr::Handler(h) => escape_into(&h.token, out),
        }
        out.push('"');
    }

    if is_void_element(&elem.tag) {
        if elem.children.iter().any(|c| !matches!(c, Node::Empty(_))) {
            return Err(RenderError::VoidElementWithChildren {
                id: elem.id.clone(),
                tag: elem.tag.clone(),
            });
        }
        out.push_str(" />");
        return Ok(());
    }

    out.push('>');

    for child in &elem.children {
        render_node(child, out)?;
    }

    out.push_str("</");
    out.push_str(&elem.tag);
    out.push('>');
    Ok(())
}

/// Escape markup-significant characters (`& < > " '`).
fn escape_into(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

fn is_valid_tag(tag: &str) -> bool {
    let mut chars = tag.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn is_valid_attr_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| !c.is_whitespace() && !c.is_control() && !matches!(c, '"' | '\'' | '<' | '>' | '/' | '=' | '&'))
}

/// Void elements serialize self-closing and carry no children.
fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

// =============================================================================
// Tests
// =============================================================================
