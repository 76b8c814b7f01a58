//! Patch vocabulary.
//!
//! A [`Patch`] is one atomic (or batched) mutation instruction. Replaying a
//! diff's patch sequence strictly in order against a live tree initialized
//! from the old tree yields exactly the new tree; see
//! [`apply`](crate::apply::apply) for the reference replay.
//!
//! All placements are anchor-based: an insertion point names the sibling it
//! follows (or the start of the parent), never a numeric index. Anchors
//! address nodes purely by id, so a patch sequence has no index drift.

use compact_str::CompactString;

use crate::attr::{Attribute, Handler};
use crate::id::NodeId;
use crate::node::{Node, Raw, Text};

// =============================================================================
// Anchor
// =============================================================================

/// Where to place a child within its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// As the first child of the parent.
    Start,
    /// Immediately after the sibling with this id.
    After(NodeId),
}

// =============================================================================
// Patch
// =============================================================================

/// One mutation instruction.
///
/// The batch variants (`AddChildren`, `AddTexts`, `AddRaws`,
/// `RemoveChildren`) are only produced by [`batch`](crate::batch::batch);
/// the differ itself emits single-child patches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch {
    /// Install `node` as the root, replacing whatever was there.
    AddRoot { node: Node },

    /// Replace the subtree rooted at `target` with `node`.
    ReplaceChild { target: NodeId, node: Node },

    /// Insert `node` under `parent` at `anchor`.
    AddChild {
        parent: NodeId,
        anchor: Anchor,
        node: Node,
    },

    /// Insert a run of nodes under `parent` starting at `anchor`, in order.
    AddChildren {
        parent: NodeId,
        anchor: Anchor,
        nodes: Vec<Node>,
    },

    /// Insert a run of text nodes under `parent` starting at `anchor`.
    AddTexts {
        parent: NodeId,
        anchor: Anchor,
        texts: Vec<Text>,
    },

    /// Insert a run of raw nodes under `parent` starting at `anchor`.
    AddRaws {
        parent: NodeId,
        anchor: Anchor,
        raws: Vec<Raw>,
    },

    /// Remove the child `target` of `parent`.
    RemoveChild { parent: NodeId, target: NodeId },

    /// Remove a run of children of `parent`, in order.
    RemoveChildren {
        parent: NodeId,
        targets: Vec<NodeId>,
    },

    /// Relocate the existing child `target` of `parent` to `anchor`,
    /// keeping its subtree alive.
    MoveChild {
        parent: NodeId,
        target: NodeId,
        anchor: Anchor,
    },

    /// Add a plain attribute to the element `target`.
    AddAttribute { target: NodeId, attr: Attribute },

    /// Replace the value (and id) of an existing plain attribute, matched
    /// by name.
    UpdateAttribute { target: NodeId, attr: Attribute },

    /// Remove a plain attribute by name.
    RemoveAttribute { target: NodeId, name: CompactString },

    /// Add an event handler to the element `target`.
    AddHandler { target: NodeId, handler: Handler },

    /// Rebind an existing handler, matched by event name.
    UpdateHandler { target: NodeId, handler: Handler },

    /// Remove a handler by event name.
    RemoveHandler { target: NodeId, event: CompactString },

    /// Replace the content (and id) of the text node `target`.
    UpdateText {
        target: NodeId,
        id: NodeId,
        value: String,
    },

    /// Replace the content (and id) of the raw node `target`.
    UpdateRaw {
        target: NodeId,
        id: NodeId,
        html: String,
    },
}

impl Patch {
    /// The id this patch is addressed at: the mutated node for content
    /// patches, the parent for child-list patches, the new root's own id
    /// for `AddRoot`.
    pub fn target(&self) -> &NodeId {
        match self {
            Self::AddRoot { node } => node.id(),
            Self::ReplaceChild { target, .. } => target,
            Self::AddChild { parent, .. }
            | Self::AddChildren { parent, .. }
            | Self::AddTexts { parent, .. }
            | Self::AddRaws { parent, .. }
            | Self::RemoveChild { parent, .. }
            | Self::RemoveChildren { parent, .. }
            | Self::MoveChild { parent, .. } => parent,
            Self::AddAttribute { target, .. }
            | Self::UpdateAttribute { target, .. }
            | Self::RemoveAttribute { target, .. }
            | Self::AddHandler { target, .. }
            | Self::UpdateHandler { target, .. }
            | Self::RemoveHandler { target, .. }
            | Self::UpdateText { target, .. }
            | Self::UpdateRaw { target, .. } => target,
        }
    }

    /// Whether this patch inserts, removes, or relocates children (as
    /// opposed to updating content or attributes in place).
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::AddRoot { .. }
                | Self::ReplaceChild { .. }
                | Self::AddChild { .. }
                | Self::AddChildren { .. }
                | Self::AddTexts { .. }
                | Self::AddRaws { .. }
                | Self::RemoveChild { .. }
                | Self::RemoveChildren { .. }
                | Self::MoveChild { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Element;

    #[test]
    fn test_patch_target() {
        let patch = Patch::RemoveChild {
            parent: NodeId::new("p"),
            target: NodeId::new("c"),
        };
        assert_eq!(patch.target().as_str(), "p");

        let root = Patch::AddRoot {
            node: Element::new("r", "div").into(),
        };
        assert_eq!(root.target().as_str(), "r");
    }

    #[test]
    fn test_is_structural() {
        let structural = Patch::MoveChild {
            parent: NodeId::new("p"),
            target: NodeId::new("c"),
            anchor: Anchor::Start,
        };
        assert!(structural.is_structural());

        let content = Patch::UpdateText {
            target: NodeId::new("t"),
            id: NodeId::new("t"),
            value: "x".into(),
        };
        assert!(!content.is_structural());
    }
}
