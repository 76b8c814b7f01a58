//! Opaque identity tokens for nodes and attributes.
//!
//! Identity is what the differ compares, not structure: two nodes with the
//! same `NodeId` across an old and a new tree are the same UI element and
//! are diffed in place. Ids are minted by the tree builder and carried
//! forward across rebuilds by [`align`](crate::align::align); the differ
//! itself never invents or rewrites one (except through
//! `UpdateText`/`UpdateRaw`, which ship the new id as payload).

use std::fmt;

use compact_str::CompactString;

// =============================================================================
// NodeId
// =============================================================================

/// Opaque node identity token.
///
/// Stable within one diff call. The token's content carries no meaning to
/// this crate beyond equality; callers typically use counters or content
/// hashes.
#[derive(Clone, PartialEq, Eq, Hash)]
#[must_use]
pub struct NodeId(CompactString);

impl NodeId {
    /// Create a node id from a raw token.
    pub fn new(token: impl Into<CompactString>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for NodeId {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

// =============================================================================
// AttrId
// =============================================================================

/// Opaque attribute identity token.
///
/// Attribute ids are regenerated on every tree-construction pass while the
/// attribute *name* stays stable, so the differ compares attributes by name
/// and ignores id churn entirely. The id exists for the builder's and
/// applier's bookkeeping, not for diffing.
#[derive(Clone, PartialEq, Eq, Hash)]
#[must_use]
pub struct AttrId(CompactString);

impl AttrId {
    /// Create an attribute id from a raw token.
    pub fn new(token: impl Into<CompactString>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AttrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttrId({})", self.0)
    }
}

impl fmt::Display for AttrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<&str> for AttrId {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for AttrId {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

// =============================================================================
// Tests
// =============================================================================
