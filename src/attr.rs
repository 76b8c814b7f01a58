//! Attributes and event handlers.
//!
//! An element carries an ordered sequence of [`Attr`]s. Two kinds exist:
//! plain name/value attributes and event [`Handler`]s, which serialize as a
//! synthesized `data-event-{name}` attribute whose value is an opaque
//! dispatch token.
//!
//! Identity rules (what the differ compares):
//! - plain attributes match by `name`; the [`AttrId`] is ignored
//! - handlers match by event name; a changed dispatch token is an update,
//!   never a remove+add
//! - a handler's [`Projection`] participates by presence only

use compact_str::{CompactString, format_compact};

use crate::id::AttrId;

/// Prefix under which handlers serialize.
pub const EVENT_ATTR_PREFIX: &str = "data-event-";

/// The rendered attribute name for an event handler.
pub fn event_attr_name(event: &str) -> CompactString {
    format_compact!("{EVENT_ATTR_PREFIX}{event}")
}

// =============================================================================
// Attribute kinds
// =============================================================================

/// A plain name/value attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Identity token, regenerated each build pass. Ignored by diffing.
    pub id: AttrId,
    /// Attribute name, the diffing identity.
    pub name: CompactString,
    /// Attribute value.
    pub value: String,
}

impl Attribute {
    pub fn new(id: impl Into<AttrId>, name: impl Into<CompactString>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Opaque reference to a payload projection attached to a handler.
///
/// Carried through untouched for the dispatch layer. Only presence or
/// absence matters to diffing, so every projection compares equal to every
/// other; swapping one projection for another without touching the dispatch
/// token produces no patch.
#[derive(Debug, Clone)]
pub struct Projection(pub CompactString);

impl Projection {
    pub fn new(key: impl Into<CompactString>) -> Self {
        Self(key.into())
    }
}

impl PartialEq for Projection {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for Projection {}

/// An event handler binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handler {
    /// Identity token, regenerated each build pass. Ignored by diffing.
    pub id: AttrId,
    /// Event name (`click`, `input`, ...), the diffing identity.
    pub event: CompactString,
    /// Opaque dispatch token; rendered as the attribute value.
    pub token: String,
    /// Optional payload projection. Presence-only for diffing.
    pub projection: Option<Projection>,
}

impl Handler {
    pub fn new(id: impl Into<AttrId>, event: impl Into<CompactString>, token: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            event: event.into(),
            token: token.into(),
            projection: None,
        }
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    /// The attribute name this handler renders under.
    pub fn attr_name(&self) -> CompactString {
        event_attr_name(&self.event)
    }
}

// =============================================================================
// Attr
// =============================================================================

/// One entry in an element's attribute sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attr {
    Plain(Attribute),
    Handler(Handler),
}

impl Attr {
    /// The rendered attribute name: `name` for plain attributes,
    /// `data-event-{event}` for handlers. This is the diffing key.
    pub fn rendered_name(&self) -> CompactString {
        match self {
            Attr::Plain(a) => a.name.clone(),
            Attr::Handler(h) => h.attr_name(),
        }
    }

    /// Identity token. Ignored by diffing.
    pub fn id(&self) -> &AttrId {
        match self {
            Attr::Plain(a) => &a.id,
            Attr::Handler(h) => &h.id,
        }
    }

    #[inline]
    pub fn is_handler(&self) -> bool {
        matches!(self, Attr::Handler(_))
    }

    #[inline]
    pub fn as_plain(&self) -> Option<&Attribute> {
        match self {
            Attr::Plain(a) => Some(a),
            _ => None,
        }
    }

    #[inline]
    pub fn as_handler(&self) -> Option<&Handler> {
        match self {
            Attr::Handler(h) => Some(h),
            _ => None,
        }
    }
}

/// Ordered attribute sequence of one element.
pub type Attrs = Vec<Attr>;

/// Extension trait for name-based operations on [`Attrs`].
pub trait AttrsExt {
    /// Find an entry by its rendered name.
    fn find_named(&self, rendered_name: &str) -> Option<&Attr>;

    /// Find a plain attribute's value by name.
    fn get_value(&self, name: &str) -> Option<&str>;

    /// Check for an entry by rendered name.
    fn has(&self, rendered_name: &str) -> bool;
}

impl AttrsExt for Attrs {
    fn find_named(&self, rendered_name: &str) -> Option<&Attr> {
        self.iter().find(|a| a.rendered_name() == rendered_name)
    }

    fn get_value(&self, name: &str) -> Option<&str> {
        self.iter()
            .filter_map(Attr::as_plain)
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    fn has(&self, rendered_name: &str) -> bool {
        self.find_named(rendered_name).is_some()
    }
}

// =============================================================================
// Tests
// =============================================================================
