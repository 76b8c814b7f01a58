//! Reference patch applier.
//!
//! Replays an ordered patch sequence against a mutable tree, one operation
//! per patch kind, addressed purely by id, strictly in the order received.
//! This is the in-memory realization of the applier contract the differ
//! targets, and the oracle the round-trip law is tested against:
//! `render(apply(old, diff(old, new))) == render(new)`.
//!
//! A patch whose target cannot be found means the live tree drifted from
//! the old tree the diff was computed against; that is surfaced as a typed
//! [`ApplyError`], never repaired silently.

use tracing::debug;

use crate::attr::Attr;
use crate::error::{ApplyError, ApplyResult};
use crate::id::NodeId;
use crate::node::{Element, Node};
use crate::patch::{Anchor, Patch};

/// Replay `patches` in order against `root`.
///
/// `root` is `None` before the first render; an [`Patch::AddRoot`] installs
/// it. On error the tree is left as the already-applied prefix produced it.
pub fn apply(root: &mut Option<Node>, patches: &[Patch]) -> ApplyResult<()> {
    for patch in patches {
        apply_one(root, patch)?;
    }
    debug!(patches = patches.len(), "apply complete");
    Ok(())
}

fn apply_one(root: &mut Option<Node>, patch: &Patch) -> ApplyResult<()> {
    if let Patch::AddRoot { node } = patch {
        *root = Some(node.clone());
        return Ok(());
    }

    let tree = root.as_mut().ok_or_else(|| ApplyError::EmptyTree {
        target: patch.target().clone(),
    })?;

    match patch {
        Patch::AddRoot { .. } => unreachable!("handled above"),

        Patch::ReplaceChild { target, node } => replace_node(tree, target, node),

        Patch::AddChild {
            parent,
            anchor,
            node,
        } => {
            let el = find_element_mut(tree, parent)?;
            let at = anchor_index(el, anchor, parent)?;
            el.children.insert(at, node.clone());
            Ok(())
        }

        Patch::AddChildren {
            parent,
            anchor,
            nodes,
        } => {
            let el = find_element_mut(tree, parent)?;
            let at = anchor_index(el, anchor, parent)?;
            for (offset, node) in nodes.iter().enumerate() {
                el.children.insert(at + offset, node.clone());
            }
            Ok(())
        }

        Patch::AddTexts {
            parent,
            anchor,
            texts,
        } => {
            let el = find_element_mut(tree, parent)?;
            let at = anchor_index(el, anchor, parent)?;
            for (offset, text) in texts.iter().enumerate() {
                el.children.insert(at + offset, Node::Text(text.clone()));
            }
            Ok(())
        }

        Patch::AddRaws {
            parent,
            anchor,
            raws,
        } => {
            let el = find_element_mut(tree, parent)?;
            let at = anchor_index(el, anchor, parent)?;
            for (offset, raw) in raws.iter().enumerate() {
                el.children.insert(at + offset, Node::Raw(raw.clone()));
            }
            Ok(())
        }

        Patch::RemoveChild { parent, target } => {
            let el = find_element_mut(tree, parent)?;
            remove_child(el, parent, target).map(drop)
        }

        Patch::RemoveChildren { parent, targets } => {
            let el = find_element_mut(tree, parent)?;
            for target in targets {
                remove_child(el, parent, target)?;
            }
            Ok(())
        }

        Patch::MoveChild {
            parent,
            target,
            anchor,
        } => {
            let el = find_element_mut(tree, parent)?;
            let node = remove_child(el, parent, target)?;
            let at = anchor_index(el, anchor, parent)?;
            el.children.insert(at, node);
            Ok(())
        }

        Patch::AddAttribute { target, attr } => {
            let el = find_element_mut(tree, target)?;
            el.attrs.push(Attr::Plain(attr.clone()));
            Ok(())
        }

        Patch::UpdateAttribute { target, attr } => {
            let el = find_element_mut(tree, target)?;
            let slot = el
                .attrs
                .iter_mut()
                .filter_map(|a| match a {
                    Attr::Plain(p) if p.name == attr.name => Some(p),
                    _ => None,
                })
                .next()
                .ok_or_else(|| ApplyError::AttributeNotFound {
                    target: target.clone(),
                    name: attr.name.clone(),
                })?;
            *slot = attr.clone();
            Ok(())
        }

        Patch::RemoveAttribute { target, name } => {
            let el = find_element_mut(tree, target)?;
            let pos = el
                .attrs
                .iter()
                .position(|a| matches!(a, Attr::Plain(p) if p.name == *name))
                .ok_or_else(|| ApplyError::AttributeNotFound {
                    target: target.clone(),
                    name: name.clone(),
                })?;
            el.attrs.remove(pos);
            Ok(())
        }

        Patch::AddHandler { target, handler } => {
            let el = find_element_mut(tree, target)?;
            el.attrs.push(Attr::Handler(handler.clone()));
            Ok(())
        }

        Patch::UpdateHandler { target, handler } => {
            let el = find_element_mut(tree, target)?;
            let slot = el
                .attrs
                .iter_mut()
                .filter_map(|a| match a {
                    Attr::Handler(h) if h.event == handler.event => Some(h),
                    _ => None,
                })
                .next()
                .ok_or_else(|| ApplyError::HandlerNotFound {
                    target: target.clone(),
                    event: handler.event.clone(),
                })?;
            *slot = handler.clone();
            Ok(())
        }

        Patch::RemoveHandler { target, event } => {
            let el = find_element_mut(tree, target)?;
            let pos = el
                .attrs
                .iter()
                .position(|a| matches!(a, Attr::Handler(h) if h.event == *event))
                .ok_or_else(|| ApplyError::HandlerNotFound {
                    target: target.clone(),
                    event: event.clone(),
                })?;
            el.attrs.remove(pos);
            Ok(())
        }

        Patch::UpdateText { target, id, value } => {
            let node = find_node_mut(tree, target).ok_or_else(|| ApplyError::TargetNotFound {
                target: target.clone(),
            })?;
            let kind = node.kind();
            match node {
                Node::Text(t) => {
                    t.id = id.clone();
                    t.value = value.clone();
                    Ok(())
                }
                _ => Err(ApplyError::KindMismatch {
                    target: target.clone(),
                    kind,
                    expected: "text",
                }),
            }
        }

        Patch::UpdateRaw { target, id, html } => {
            let node = find_node_mut(tree, target).ok_or_else(|| ApplyError::TargetNotFound {
                target: target.clone(),
            })?;
            let kind = node.kind();
            match node {
                Node::Raw(r) => {
                    r.id = id.clone();
                    r.html = html.clone();
                    Ok(())
                }
                _ => Err(ApplyError::KindMismatch {
                    target: target.clone(),
                    kind,
                    expected: "raw",
                }),
            }
        }
    }
}

// =============================================================================
// Lookup helpers
// =============================================================================

fn find_node_mut<'a>(node: &'a mut Node, id: &NodeId) -> Option<&'a mut Node> {
    if node.id() == id {
        return Some(node);
    }
    match node {
        Node::Element(el) => el
            .children
            .iter_mut()
            .find_map(|child| find_node_mut(child, id)),
        _ => None,
    }
}

fn find_element_mut<'a>(tree: &'a mut Node, id: &NodeId) -> ApplyResult<&'a mut Element> {
    let node = find_node_mut(tree, id).ok_or_else(|| ApplyError::TargetNotFound {
        target: id.clone(),
    })?;
    let kind = node.kind();
    match node {
        Node::Element(el) => Ok(el),
        _ => Err(ApplyError::NotAnElement {
            target: id.clone(),
            kind,
        }),
    }
}

fn replace_node(tree: &mut Node, target: &NodeId, replacement: &Node) -> ApplyResult<()> {
    if tree.id() == target {
        *tree = replacement.clone();
        return Ok(());
    }
    if replace_in_children(tree, target, replacement) {
        Ok(())
    } else {
        Err(ApplyError::TargetNotFound {
            target: target.clone(),
        })
    }
}

fn replace_in_children(node: &mut Node, target: &NodeId, replacement: &Node) -> bool {
    if let Node::Element(el) = node {
        for child in el.children.iter_mut() {
            if child.id() == target {
                *child = replacement.clone();
                return true;
            }
            if replace_in_children(child, target, replacement) {
                return true;
            }
        }
    }
    false
}

fn anchor_index(el: &Element, anchor: &Anchor, parent: &NodeId) -> ApplyResult<usize> {
    match anchor {
        Anchor::Start => Ok(0),
        Anchor::After(id) => el
            .children
            .iter()
            .position(|c| c.id() == id)
            .map(|pos| pos + 1)
            .ok_or_else(|| ApplyError::AnchorNotFound {
                parent: parent.clone(),
                anchor: id.clone(),
            }),
    }
}

fn remove_child(el: &mut Element, parent: &NodeId, target: &NodeId) -> ApplyResult<Node> {
    let pos = el
        .children
        .iter()
        .position(|c| c.id() == target)
        .ok_or_else(|| ApplyError::ChildNotFound {
            parent: parent.clone(),
            target: target.clone(),
        })?;
    Ok(el.children.remove(pos))
}

// =============================================================================
// Tests
// =============================================================================
