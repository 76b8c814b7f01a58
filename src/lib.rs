//! revdom - Keyed virtual-tree reconciliation
//!
//! A pure, synchronous engine that compares two immutable tree snapshots
//! and produces the minimal ordered patch sequence transforming one into
//! the other, plus a deterministic renderer that doubles as the
//! correctness oracle.
//!
//! ## Core concepts
//!
//! **Identity over structure**: nodes are matched by [`NodeId`], not by
//! shape. The [`align`](align::align) pass copies ids from the previous
//! tree onto a freshly built one so identity survives full rebuilds.
//!
//! **Keyed reconciliation**: child lists containing `key` attributes are
//! matched by key, and a Longest-Increasing-Subsequence over the matched
//! children's old positions keeps already-ordered runs in place — a
//! two-element swap costs one move regardless of list length.
//!
//! **The round-trip law**: for any `old`, `new`, replaying
//! `diff(old, new)` against a live tree initialized from `old` and
//! rendering it equals `render(new)` byte for byte.
//!
//! ## Modules
//! - `node`: `Node`/`Element`/`Text`/`Raw`/`Empty` types
//! - `attr`: attributes and event handlers
//! - `diff`: the tree differ and child reconciler
//! - `patch`: the patch vocabulary
//! - `batch`: patch batching
//! - `render`: markup serialization
//! - `apply`: reference patch applier
//! - `align`: id preservation across rebuilds
//!
//! ## Usage
//!
//! ```
//! use revdom::prelude::*;
//!
//! let old: Node = Element::new("1", "div").text("2", "Hello").into();
//! let mut new: Node = Element::new("10", "div").text("20", "World").into();
//!
//! // Carry identity forward, then diff.
//! align(&old, &mut new);
//! let patches = diff(Some(&old), &new);
//!
//! // Replay against a live copy of the old tree.
//! let mut live = Some(old.clone());
//! apply(&mut live, &patches).unwrap();
//! assert_eq!(
//!     render(live.as_ref().unwrap()).unwrap(),
//!     render(&new).unwrap(),
//! );
//! ```

// =============================================================================
// Core modules
// =============================================================================

/// Identity tokens for nodes and attributes
pub mod id;

/// Node types: Element, Text, Raw, Empty
pub mod node;

/// Attributes and event handlers
pub mod attr;

/// Patch vocabulary
pub mod patch;

/// Tree differ and child reconciler
pub mod diff;

/// Patch batching
pub mod batch;

/// Markup rendering
pub mod render;

/// Reference patch applier
pub mod apply;

/// Id preservation across rebuilds
pub mod align;

/// Sequence algorithms (LIS)
pub mod algo;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

mod pool;

// =============================================================================
// Re-exports
// =============================================================================

pub use crate::align::align;
pub use crate::apply::apply;
pub use crate::attr::{Attr, Attribute, Attrs, AttrsExt, Handler, Projection};
pub use crate::diff::{DiffOptions, diff, diff_with_options};
pub use crate::error::{ApplyError, ApplyResult, RenderError, RenderResult};
pub use crate::id::{AttrId, NodeId};
pub use crate::node::{Children, Element, Empty, Node, Raw, Text};
pub use crate::patch::{Anchor, Patch};
pub use crate::render::render;

// =============================================================================
// Tests: engine-wide laws
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(Node: Send, Sync, Clone, PartialEq);
    assert_impl_all!(Patch: Send, Sync, Clone, PartialEq);
    assert_impl_all!(RenderError: Send, Sync);
    assert_impl_all!(ApplyError: Send, Sync);

    /// The central law, checked batched and unbatched: replaying the diff
    /// against the old tree renders byte-identically to the new tree, and
    /// both patch streams produce the same live tree.
    fn assert_round_trip(old: &Node, new: &Node) {
        let expected = render(new).unwrap();
        let mut results = Vec::new();

        for options in [DiffOptions::default(), DiffOptions::batched()] {
            let patches = diff_with_options(Some(old), new, options);
            let mut live = Some(old.clone());
            apply(&mut live, &patches)
                .unwrap_or_else(|e| panic!("replay failed: {e}\npatches: {patches:#?}"));
            let live = live.unwrap();
            assert_eq!(
                render(&live).unwrap(),
                expected,
                "replay diverged from render(new); patches: {patches:#?}"
            );
            results.push(live);
        }

        assert_eq!(results[0], results[1], "batched replay built a different tree");
    }

    fn keyed_item(id: &str, key: &str, text: &str) -> Node {
        Element::new(id, "li")
            .attr(format!("ka-{id}"), "key", key)
            .text(format!("t-{id}"), text)
            .into()
    }

    #[test]
    fn test_diff_is_idempotent() {
        let trees: Vec<Node> = vec![
            Element::new("1", "div").into(),
            Element::new("1", "div")
                .attr("a1", "class", "box")
                .handler("a2", "click", "tok")
                .text("2", "hi")
                .raw("3", "<hr>")
                .child(Empty::new("4"))
                .into(),
            Text::new("1", "bare").into(),
        ];
        for tree in &trees {
            assert!(diff(Some(tree), tree).is_empty());
            assert_round_trip(tree, tree);
        }
    }

    #[test]
    fn test_round_trip_text_update() {
        let old: Node = Element::new("1", "div").text("2", "A").into();
        let new: Node = Element::new("1", "div").text("2", "B").into();
        assert_round_trip(&old, &new);
    }

    #[test]
    fn test_round_trip_attribute_change() {
        let old: Node = Element::new("1", "div").attr("a1", "class", "old-class").into();
        let new: Node = Element::new("1", "div")
            .attr("a2", "class", "new-class")
            .attr("a3", "title", "New title")
            .into();
        assert_round_trip(&old, &new);
    }

    #[test]
    fn test_round_trip_keyed_reorder_renders_new_order() {
        // Scenario B end to end: each key keeps its own text.
        let old: Node = Element::new("p", "ul")
            .child(keyed_item("na", "a", "A"))
            .child(keyed_item("nb", "b", "B"))
            .into();
        let new: Node = Element::new("p", "ul")
            .child(keyed_item("nb", "b", "B"))
            .child(keyed_item("na", "a", "A"))
            .into();

        assert_round_trip(&old, &new);

        let markup = render(&new).unwrap();
        let b = markup.find(">B<").expect("B rendered");
        let a = markup.find(">A<").expect("A rendered");
        assert!(b < a, "B must render before A: {markup}");
    }

    #[test]
    fn test_round_trip_keyed_shuffle_with_churn() {
        // Moves, removals, insertions, and content edits in one list.
        let old: Node = Element::new("p", "ul")
            .child(keyed_item("n1", "a", "A"))
            .child(keyed_item("n2", "b", "B"))
            .child(keyed_item("n3", "c", "C"))
            .child(keyed_item("n4", "d", "D"))
            .child(keyed_item("n5", "e", "E"))
            .into();
        let new: Node = Element::new("p", "ul")
            .child(keyed_item("n5", "e", "E!"))
            .child(keyed_item("n9", "x", "X"))
            .child(keyed_item("n2", "b", "B"))
            .child(keyed_item("n1", "a", "A!"))
            .into();

        assert_round_trip(&old, &new);
    }

    #[test]
    fn test_round_trip_keyed_full_reversal() {
        let build = |order: Box<dyn Iterator<Item = usize>>| -> Node {
            let mut el = Element::new("p", "ul");
            for i in order {
                el = el.child(keyed_item(&format!("n{i}"), &format!("k{i}"), &format!("{i}")));
            }
            el.into()
        };
        let old = build(Box::new(0..12));
        let new = build(Box::new((0..12).rev()));
        assert_round_trip(&old, &new);
    }

    #[test]
    fn test_round_trip_unkeyed_growth_and_shrink() {
        let old: Node = Element::new("p", "ul")
            .child(Element::new("1", "li").text("t1", "one"))
            .child(Element::new("2", "li").text("t2", "two"))
            .into();
        let grown: Node = Element::new("p", "ul")
            .child(Element::new("1", "li").text("t1", "one"))
            .child(Element::new("2", "li").text("t2", "TWO"))
            .child(Element::new("3", "li").text("t3", "three"))
            .child(Element::new("4", "li").text("t4", "four"))
            .into();

        assert_round_trip(&old, &grown);
        assert_round_trip(&grown, &old);
    }

    #[test]
    fn test_round_trip_kind_replacements() {
        let old: Node = Element::new("1", "div")
            .text("2", "text")
            .raw("3", "<hr>")
            .child(Empty::new("4"))
            .into();
        let new: Node = Element::new("1", "div")
            .raw("5", "<br>")
            .child(Element::new("6", "span").text("7", "was raw"))
            .text("8", "was empty")
            .into();
        assert_round_trip(&old, &new);
    }

    #[test]
    fn test_round_trip_root_replacement() {
        let old: Node = Element::new("1", "div").text("2", "x").into();
        let new: Node = Element::new("1", "section").text("2", "x").into();
        assert_round_trip(&old, &new);

        let old: Node = Text::new("1", "plain").into();
        let new: Node = Element::new("2", "div").into();
        assert_round_trip(&old, &new);
    }

    #[test]
    fn test_round_trip_handlers() {
        let old: Node = Element::new("1", "button")
            .handler("a1", "click", "tok-1")
            .handler("a2", "focus", "tok-2")
            .into();
        let new: Node = Element::new("1", "button")
            .handler("a3", "click", "tok-9")
            .handler("a4", "blur", "tok-3")
            .into();
        assert_round_trip(&old, &new);
    }

    #[test]
    fn test_round_trip_duplicate_keys() {
        let old: Node = Element::new("p", "ul")
            .child(keyed_item("n1", "dup", "first"))
            .child(keyed_item("n2", "dup", "second"))
            .child(keyed_item("n3", "c", "C"))
            .into();
        let new: Node = Element::new("p", "ul")
            .child(keyed_item("n3", "c", "C"))
            .child(keyed_item("n1", "dup", "first"))
            .child(keyed_item("n9", "dup", "fresh"))
            .into();
        assert_round_trip(&old, &new);
    }

    #[test]
    fn test_round_trip_mixed_keyed_list() {
        // Keyed elements interleaved with id-keyed text and raw siblings.
        let old: Node = Element::new("p", "div")
            .text("t1", "intro")
            .child(keyed_item("na", "a", "A"))
            .raw("r1", "<hr>")
            .child(keyed_item("nb", "b", "B"))
            .into();
        let new: Node = Element::new("p", "div")
            .child(keyed_item("nb", "b", "B"))
            .raw("r1", "<hr>")
            .child(keyed_item("na", "a", "A+"))
            .text("t1", "outro")
            .into();
        assert_round_trip(&old, &new);
    }

    #[test]
    fn test_round_trip_deep_nesting() {
        let old: Node = Element::new("1", "main")
            .child(
                Element::new("2", "section")
                    .attr("a1", "class", "left")
                    .child(
                        Element::new("3", "ul")
                            .child(keyed_item("n1", "a", "A"))
                            .child(keyed_item("n2", "b", "B")),
                    ),
            )
            .child(Element::new("4", "aside").text("5", "side"))
            .into();
        let new: Node = Element::new("1", "main")
            .child(
                Element::new("2", "section")
                    .attr("a2", "class", "right")
                    .child(
                        Element::new("3", "ul")
                            .child(keyed_item("n2", "b", "B*"))
                            .child(keyed_item("n1", "a", "A"))
                            .child(keyed_item("n3", "c", "C")),
                    ),
            )
            .child(Element::new("4", "aside").raw("6", "<em>side</em>"))
            .into();
        assert_round_trip(&old, &new);
    }

    #[test]
    fn test_round_trip_after_align_of_fresh_rebuild() {
        // The realistic pipeline: rebuild from scratch with fresh ids,
        // align, then diff.
        let old: Node = Element::new("1", "div")
            .attr("a1", "class", "page")
            .child(
                Element::new("2", "ul")
                    .child(keyed_item("n1", "a", "A"))
                    .child(keyed_item("n2", "b", "B")),
            )
            .into();
        let mut new: Node = Element::new("f1", "div")
            .attr("f2", "class", "page")
            .child(
                Element::new("f3", "ul")
                    .child(keyed_item("f4", "b", "B"))
                    .child(keyed_item("f5", "a", "A2")),
            )
            .into();

        align(&old, &mut new);
        assert_round_trip(&old, &new);
    }

    #[test]
    fn test_batching_collapses_append_runs() {
        let old: Node = Element::new("p", "ul").into();
        let mut new_el = Element::new("p", "ul");
        for i in 0..6 {
            new_el = new_el.child(Element::new(format!("{i}"), "li"));
        }
        let new: Node = new_el.into();

        let plain = diff(Some(&old), &new);
        assert_eq!(plain.len(), 6);

        let batched = diff_with_options(Some(&old), &new, DiffOptions::batched());
        assert_eq!(batched.len(), 1);
        assert!(matches!(&batched[0], Patch::AddChildren { nodes, .. } if nodes.len() == 6));

        assert_round_trip(&old, &new);
    }

    #[test]
    fn test_batching_specializes_text_runs() {
        let old: Node = Element::new("p", "div").into();
        let new: Node = Element::new("p", "div")
            .text("1", "a")
            .text("2", "b")
            .text("3", "c")
            .into();

        let batched = diff_with_options(Some(&old), &new, DiffOptions::batched());
        assert_eq!(batched.len(), 1);
        assert!(matches!(&batched[0], Patch::AddTexts { texts, .. } if texts.len() == 3));

        assert_round_trip(&old, &new);
    }
}
