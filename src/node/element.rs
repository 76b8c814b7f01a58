//! Element nodes.

use compact_str::CompactString;

use crate::attr::{Attr, Attribute, Attrs, AttrsExt, Handler};
use crate::id::NodeId;

use super::{Children, Node, Raw, Text};

/// An element: tag, ordered attributes, ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Identity token; the differ's notion of "the same element".
    pub id: NodeId,
    /// Tag name.
    pub tag: CompactString,
    /// Ordered attribute sequence (plain attributes and handlers).
    pub attrs: Attrs,
    /// Ordered child nodes.
    pub children: Children,
}

impl Element {
    pub fn new(id: impl Into<NodeId>, tag: impl Into<CompactString>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            attrs: Vec::new(),
            children: Children::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a plain attribute.
    pub fn attr(
        mut self,
        id: impl Into<crate::id::AttrId>,
        name: impl Into<CompactString>,
        value: impl Into<String>,
    ) -> Self {
        self.attrs.push(Attr::Plain(Attribute::new(id, name, value)));
        self
    }

    /// Append an event handler.
    pub fn handler(
        mut self,
        id: impl Into<crate::id::AttrId>,
        event: impl Into<CompactString>,
        token: impl Into<String>,
    ) -> Self {
        self.attrs.push(Attr::Handler(Handler::new(id, event, token)));
        self
    }

    /// Append a prebuilt attribute entry.
    pub fn push_attr(mut self, attr: Attr) -> Self {
        self.attrs.push(attr);
        self
    }

    /// Append a child node.
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append a text child.
    pub fn text(self, id: impl Into<NodeId>, value: impl Into<String>) -> Self {
        self.child(Text::new(id, value))
    }

    /// Append a raw-markup child.
    pub fn raw(self, id: impl Into<NodeId>, html: impl Into<String>) -> Self {
        self.child(Raw::new(id, html))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// The explicit reconciliation key, if this element carries one.
    pub fn key(&self) -> Option<&str> {
        self.attrs.get_value("key")
    }

    /// A plain attribute's value by name.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get_value(name)
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}
