//! Error types.
//!
//! The differ itself is total over structurally valid trees and has no
//! error type: an absent root is a first render, and duplicate sibling keys
//! resolve first-occurrence-wins. Errors arise only at the edges — the
//! renderer refuses to emit malformed markup, and the reference applier
//! refuses patches whose targets it cannot find.

use compact_str::CompactString;
use thiserror::Error;

use crate::id::NodeId;

/// Errors raised while serializing a tree to markup.
///
/// These always propagate; silently emitting malformed markup from a raw
/// node would be an injection hole, not a degraded-output case.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// Tag name is empty or contains characters markup cannot carry.
    #[error("invalid tag name {tag:?} on node {id}")]
    InvalidTag { id: NodeId, tag: CompactString },

    /// Attribute or event name is empty or contains forbidden characters.
    #[error("invalid attribute name {name:?} on node {id}")]
    InvalidAttrName { id: NodeId, name: CompactString },

    /// A void element (`br`, `img`, ...) cannot carry children.
    #[error("void element <{tag}> (node {id}) has children")]
    VoidElementWithChildren { id: NodeId, tag: CompactString },

    /// Raw content contains a byte that cannot be serialized.
    #[error("raw node {id} contains an unserializable NUL byte")]
    UnserializableRaw { id: NodeId },
}

/// Result alias for rendering.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised while replaying a patch sequence.
///
/// Per the diff contract these indicate that the live tree drifted from the
/// old tree the diff was computed against (or that patches were reordered);
/// the diff is only guaranteed correct against the trees it was given.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApplyError {
    /// A patch arrived before any root was installed.
    #[error("patch addressed {target} but the tree has no root")]
    EmptyTree { target: NodeId },

    /// No node with this id exists in the live tree.
    #[error("target {target} not found")]
    TargetNotFound { target: NodeId },

    /// The addressed node exists but is not an element.
    #[error("target {target} is a {kind} node, expected an element")]
    NotAnElement { target: NodeId, kind: &'static str },

    /// The addressed node exists but has the wrong leaf kind.
    #[error("target {target} is a {kind} node, expected {expected}")]
    KindMismatch {
        target: NodeId,
        kind: &'static str,
        expected: &'static str,
    },

    /// An anchor sibling is missing from the parent's child list.
    #[error("anchor {anchor} not found under parent {parent}")]
    AnchorNotFound { parent: NodeId, anchor: NodeId },

    /// A child to remove or move is missing from the parent's child list.
    #[error("child {target} not found under parent {parent}")]
    ChildNotFound { parent: NodeId, target: NodeId },

    /// An attribute update or removal named an attribute that is not there.
    #[error("attribute {name:?} not found on element {target}")]
    AttributeNotFound { target: NodeId, name: CompactString },

    /// A handler update or removal named an event that is not bound.
    #[error("handler for event {event:?} not found on element {target}")]
    HandlerNotFound { target: NodeId, event: CompactString },
}

/// Result alias for patch application.
pub type ApplyResult<T> = Result<T, ApplyError>;
