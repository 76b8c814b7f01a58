//! Common imports for working with the engine.
//!
//! ```
//! use revdom::prelude::*;
//! ```

pub use crate::align::align;
pub use crate::apply::apply;
pub use crate::attr::{Attr, Attribute, Attrs, AttrsExt, Handler, Projection};
pub use crate::batch::batch;
pub use crate::diff::{DiffOptions, diff, diff_with_options};
pub use crate::error::{ApplyError, ApplyResult, RenderError, RenderResult};
pub use crate::id::{AttrId, NodeId};
pub use crate::node::{Children, Element, Empty, Node, Raw, Text};
pub use crate::patch::{Anchor, Patch};
pub use crate::render::render;
