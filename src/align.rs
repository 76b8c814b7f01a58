//! Id-preservation pass.
//!
//! Trees are rebuilt from scratch on every render pass, so every node and
//! attribute starts with a fresh id. Run `align(old, new)` before diffing:
//! it zips the two trees by structural correspondence and copies the old
//! ids onto the corresponding new nodes (and onto attributes and handlers,
//! matched by rendered name). Without this pass every diff would look like
//! a total replacement; with it, incoming ids encode intended identity and
//! the differ can assume exactly that.
//!
//! Correspondence rules:
//! - nodes correspond when their kinds match (and tags, for elements)
//! - child lists zip positionally, or by `key` attribute when any child in
//!   either list carries one (children without a `key` attribute in a keyed
//!   list keep their fresh identity)
//! - a structural mismatch stops alignment for that branch; fresh ids stand
//!   and the differ will replace the subtree

use compact_str::CompactString;
use rustc_hash::FxHashMap;

use crate::attr::{Attr, AttrsExt};
use crate::node::{Element, Node};

/// Copy identity from `old` onto the structurally corresponding parts of
/// `new`.
pub fn align(old: &Node, new: &mut Node) {
    match (old, new) {
        (Node::Element(o), Node::Element(n)) if o.tag == n.tag => {
            n.id = o.id.clone();
            align_attrs(o, n);
            align_children(o, n);
        }
        (Node::Text(o), Node::Text(n)) => n.id = o.id.clone(),
        (Node::Raw(o), Node::Raw(n)) => n.id = o.id.clone(),
        (Node::Empty(o), Node::Empty(n)) => n.id = o.id.clone(),
        _ => {}
    }
}

fn align_attrs(old: &Element, new: &mut Element) {
    for attr in new.attrs.iter_mut() {
        let name = attr.rendered_name();
        match (old.attrs.find_named(name.as_str()), attr) {
            (Some(Attr::Plain(o)), Attr::Plain(n)) => n.id = o.id.clone(),
            (Some(Attr::Handler(o)), Attr::Handler(n)) => n.id = o.id.clone(),
            _ => {}
        }
    }
}

fn align_children(old: &Element, new: &mut Element) {
    let keyed = old
        .children
        .iter()
        .chain(new.children.iter())
        .any(Node::exposes_key);

    if keyed {
        let mut index: FxHashMap<&str, usize> = FxHashMap::default();
        for (i, child) in old.children.iter().enumerate() {
            index.entry(child.child_key()).or_insert(i);
        }
        let mut claimed = vec![false; old.children.len()];
        for child in new.children.iter_mut() {
            let key = CompactString::from(child.child_key());
            if let Some(&i) = index.get(key.as_str())
                && !claimed[i]
            {
                claimed[i] = true;
                align(&old.children[i], child);
            }
        }
    } else {
        for (o, n) in old.children.iter().zip(new.children.iter_mut()) {
            align(o, n);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff;
    use crate::patch::Patch;

    #[test]
    fn test_align_makes_a_rebuild_invisible_to_the_differ() {
        let old: Node = Element::new("1", "div")
            .attr("a1", "class", "box")
            .text("2", "hello")
            .into();
        // Same shape, all-fresh ids, as a builder would produce it.
        let mut new: Node = Element::new("100", "div")
            .attr("a100", "class", "box")
            .text("200", "hello")
            .into();

        align(&old, &mut new);
        assert!(diff(Some(&old), &new).is_empty());
    }

    #[test]
    fn test_align_preserves_identity_through_content_change() {
        let old: Node = Element::new("1", "div").text("2", "hello").into();
        let mut new: Node = Element::new("100", "div").text("200", "goodbye").into();

        align(&old, &mut new);
        let patches = diff(Some(&old), &new);
        assert_eq!(patches.len(), 1);
        assert!(matches!(
            &patches[0],
            Patch::UpdateText { target, .. } if target.as_str() == "2"
        ));
    }

    #[test]
    fn test_keyed_align_follows_keys_not_positions() {
        let old: Node = Element::new("p", "ul")
            .child(Element::new("na", "li").attr("k1", "key", "a").text("ta", "A"))
            .child(Element::new("nb", "li").attr("k2", "key", "b").text("tb", "B"))
            .into();
        let mut new: Node = Element::new("p2", "ul")
            .child(Element::new("x1", "li").attr("k9", "key", "b").text("y1", "B"))
            .child(Element::new("x2", "li").attr("k8", "key", "a").text("y2", "A"))
            .into();

        align(&old, &mut new);

        let el = new.as_element().unwrap();
        assert_eq!(el.children[0].id().as_str(), "nb");
        assert_eq!(el.children[1].id().as_str(), "na");

        // Reorder only: the differ sees one relocation, zero content diffs.
        let patches = diff(Some(&old), &new);
        assert_eq!(patches.len(), 1);
        assert!(matches!(&patches[0], Patch::MoveChild { .. }));
    }

    #[test]
    fn test_mismatched_branch_keeps_fresh_ids() {
        let old: Node = Element::new("1", "div").child(Element::new("2", "span")).into();
        let mut new: Node = Element::new("100", "div").raw("200", "<b>x</b>").into();

        align(&old, &mut new);
        let el = new.as_element().unwrap();
        // Root corresponded, the child did not.
        assert_eq!(el.id.as_str(), "1");
        assert_eq!(el.children[0].id().as_str(), "200");
    }

    #[test]
    fn test_attr_ids_align_by_name() {
        let old: Node = Element::new("1", "div").attr("a1", "class", "x").into();
        let mut new: Node = Element::new("9", "div").attr("a9", "class", "y").into();

        align(&old, &mut new);
        let el = new.as_element().unwrap();
        assert_eq!(el.attrs[0].id().as_str(), "a1");
    }
}
