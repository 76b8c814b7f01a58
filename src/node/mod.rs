//! Node types for the virtual tree.
//!
//! A tree is an immutable value graph rebuilt from scratch on every render
//! pass, consumed once by [`align`](crate::align::align) and then by
//! [`diff`](crate::diff::diff), and discarded. The variant set is closed by
//! design; the differ and renderer match exhaustively.

mod element;
mod text;

pub use element::Element;
pub use text::{Empty, Raw, Text};

use smallvec::SmallVec;

use crate::id::NodeId;

/// One position in a virtual tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Box<Element>),
    Text(Text),
    /// Unescaped markup. Sanitization is the constructor's responsibility.
    Raw(Raw),
    /// Renders nothing, occupies a child slot.
    Empty(Empty),
}

impl Node {
    /// The node's identity token.
    pub fn id(&self) -> &NodeId {
        match self {
            Node::Element(e) => &e.id,
            Node::Text(t) => &t.id,
            Node::Raw(r) => &r.id,
            Node::Empty(e) => &e.id,
        }
    }

    /// Short variant name for log and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Element(_) => "element",
            Node::Text(_) => "text",
            Node::Raw(_) => "raw",
            Node::Empty(_) => "empty",
        }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(t) => Some(t),
            _ => None,
        }
    }

    /// The reconciliation key of this node when it sits in a keyed child
    /// list: the explicit `key` attribute for elements that carry one, the
    /// id token otherwise.
    pub fn child_key(&self) -> &str {
        match self {
            Node::Element(e) => e.key().unwrap_or_else(|| e.id.as_str()),
            other => other.id().as_str(),
        }
    }

    /// Whether this node switches its sibling list into keyed mode.
    pub fn exposes_key(&self) -> bool {
        matches!(self, Node::Element(e) if e.key().is_some())
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(Box::new(e))
    }
}

impl From<Text> for Node {
    fn from(t: Text) -> Self {
        Node::Text(t)
    }
}

impl From<Raw> for Node {
    fn from(r: Raw) -> Self {
        Node::Raw(r)
    }
}

impl From<Empty> for Node {
    fn from(e: Empty) -> Self {
        Node::Empty(e)
    }
}

/// Children collection of an element.
pub type Children = SmallVec<[Node; 8]>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_accessors() {
        let node: Node = Element::new("1", "div").into();
        assert!(node.is_element());
        assert_eq!(node.id().as_str(), "1");
        assert_eq!(node.kind(), "element");
        assert!(node.as_text().is_none());
    }

    #[test]
    fn test_child_key_prefers_key_attr() {
        let keyed: Node = Element::new("n1", "li").attr("a1", "key", "row-3").into();
        assert_eq!(keyed.child_key(), "row-3");
        assert!(keyed.exposes_key());

        let unkeyed: Node = Element::new("n2", "li").into();
        assert_eq!(unkeyed.child_key(), "n2");
        assert!(!unkeyed.exposes_key());

        let text: Node = Text::new("n3", "hi").into();
        assert_eq!(text.child_key(), "n3");
        assert!(!text.exposes_key());
    }
}
