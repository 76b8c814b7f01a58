//! Leaf nodes: text, raw markup, and the empty placeholder.

use crate::id::NodeId;

/// Text content. Escaped by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub id: NodeId,
    pub value: String,
}

impl Text {
    pub fn new(id: impl Into<NodeId>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

/// Pre-rendered markup, emitted verbatim.
///
/// The renderer never escapes raw content; whoever constructs a `Raw` owns
/// its safety.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raw {
    pub id: NodeId,
    pub html: String,
}

impl Raw {
    pub fn new(id: impl Into<NodeId>, html: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            html: html.into(),
        }
    }
}

/// A node that renders nothing but holds a child slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Empty {
    pub id: NodeId,
}

impl Empty {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self { id: id.into() }
    }
}
