//! Tree differ.
//!
//! Computes the ordered patch sequence that transforms one immutable tree
//! snapshot into another. Pure and synchronous: no I/O, no shared state,
//! never mutates its inputs, never fails on structurally valid trees.
//!
//! # Algorithm
//!
//! 1. Compare nodes by identity ([`NodeId`]), not structure: same id means
//!    same UI element, diffed in place.
//! 2. Attributes and handlers diff by name with an O(1) index; id churn on
//!    an attribute never produces a patch.
//! 3. Child lists diff positionally, or — when any child exposes a `key`
//!    attribute — by key, with an LIS over the matched children's old
//!    positions so that a reorder keeping k children in relative order
//!    costs n − k moves.
//!
//! # Ordering
//!
//! The patch sequence is deterministic and safe to apply strictly
//! sequentially: a node's attribute patches precede its descendants'
//! patches, siblings are handled left to right, and within one keyed list
//! removals precede placements.
//!
//! # Complexity
//!
//! O(n log n): hash-map key lookups plus patience-sorting LIS. Scratch
//! structures are checked out of a pool once per call (see
//! [`pool`](crate::pool)).

use compact_str::CompactString;
use tracing::{debug, trace};

use crate::algo::longest_increasing_run;
use crate::attr::Attr;
use crate::batch;
use crate::id::NodeId;
use crate::node::{Element, Node};
use crate::patch::{Anchor, Patch};
use crate::pool::{self, DiffScratch};

// =============================================================================
// Options
// =============================================================================

/// Configuration for one diff call.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffOptions {
    /// Fold contiguous same-kind single-child patches into batch patches
    /// (see [`batch`](crate::batch::batch)). Off by default.
    pub batch: bool,
}

impl DiffOptions {
    /// Options with batching enabled.
    pub fn batched() -> Self {
        Self { batch: true }
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Diff two trees into an ordered patch sequence.
///
/// `old` absent means first render: the result is a single
/// [`Patch::AddRoot`]. `diff(t, t)` is empty for any `t`.
pub fn diff(old: Option<&Node>, new: &Node) -> Vec<Patch> {
    diff_with_options(old, new, DiffOptions::default())
}

/// Diff two trees with explicit [`DiffOptions`].
pub fn diff_with_options(old: Option<&Node>, new: &Node, options: DiffOptions) -> Vec<Patch> {
    let Some(old) = old else {
        return vec![Patch::AddRoot { node: new.clone() }];
    };

    let mut ctx = DiffContext::new();
    ctx.diff_nodes(old, new, true);
    let DiffContext { patches, scratch } = ctx;
    pool::checkin(scratch);

    debug!(patches = patches.len(), "diff complete");
    if options.batch {
        batch::batch(patches)
    } else {
        patches
    }
}

// =============================================================================
// Internal context
// =============================================================================

struct DiffContext {
    patches: Vec<Patch>,
    scratch: DiffScratch,
}

impl DiffContext {
    fn new() -> Self {
        Self {
            patches: Vec::new(),
            scratch: pool::checkout(),
        }
    }

    /// Dispatch on node kinds. `root` selects `AddRoot` over `ReplaceChild`
    /// when the pair cannot be diffed in place.
    fn diff_nodes(&mut self, old: &Node, new: &Node, root: bool) {
        match (old, new) {
            (Node::Element(o), Node::Element(n)) if o.tag == n.tag => {
                self.diff_attrs(o, n);
                self.diff_children(o, n);
            }
            (Node::Text(o), Node::Text(n)) => {
                if o.id != n.id || o.value != n.value {
                    self.patches.push(Patch::UpdateText {
                        target: o.id.clone(),
                        id: n.id.clone(),
                        value: n.value.clone(),
                    });
                }
            }
            (Node::Raw(o), Node::Raw(n)) => {
                if o.id != n.id || o.html != n.html {
                    self.patches.push(Patch::UpdateRaw {
                        target: o.id.clone(),
                        id: n.id.clone(),
                        html: n.html.clone(),
                    });
                }
            }
            (Node::Empty(_), Node::Empty(_)) => {}
            // Kind or tag mismatch: replace the whole subtree, no recursion.
            _ => self.replace(old, new, root),
        }
    }

    fn replace(&mut self, old: &Node, new: &Node, root: bool) {
        let patch = if root {
            Patch::AddRoot { node: new.clone() }
        } else {
            Patch::ReplaceChild {
                target: old.id().clone(),
                node: new.clone(),
            }
        };
        self.patches.push(patch);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Attributes and handlers
    // ─────────────────────────────────────────────────────────────────────────

    /// Name-keyed attribute diff. Old attributes are indexed by rendered
    /// name; the new-side walk emits updates and adds in new order, the
    /// old-side walk emits removals. Both index maps are drained before any
    /// child reconciliation at this level touches them.
    fn diff_attrs(&mut self, old: &Element, new: &Element) {
        let target = &old.id;

        let old_index = &mut self.scratch.old_index;
        old_index.clear();
        for (i, attr) in old.attrs.iter().enumerate() {
            old_index.entry(attr.rendered_name()).or_insert(i);
        }
        let new_index = &mut self.scratch.new_index;
        new_index.clear();
        for (i, attr) in new.attrs.iter().enumerate() {
            new_index.entry(attr.rendered_name()).or_insert(i);
        }

        for (i, attr) in new.attrs.iter().enumerate() {
            if self.scratch.new_index.get(attr.rendered_name().as_str()) != Some(&i) {
                // Later duplicate on the new side; first occurrence won.
                continue;
            }
            match self.scratch.old_index.get(attr.rendered_name().as_str()) {
                Some(&old_pos) => match (&old.attrs[old_pos], attr) {
                    (Attr::Plain(o), Attr::Plain(n)) => {
                        // Same value means no patch regardless of id churn.
                        if o.value != n.value {
                            self.patches.push(Patch::UpdateAttribute {
                                target: target.clone(),
                                attr: n.clone(),
                            });
                        }
                    }
                    (Attr::Handler(o), Attr::Handler(n)) => {
                        // Rebind in place, never remove+add for one event.
                        if o.token != n.token
                            || o.projection.is_some() != n.projection.is_some()
                        {
                            self.patches.push(Patch::UpdateHandler {
                                target: target.clone(),
                                handler: n.clone(),
                            });
                        }
                    }
                    // A plain attribute and a handler collided on one
                    // rendered name; no update op can change kinds.
                    (Attr::Plain(o), Attr::Handler(n)) => {
                        self.patches.push(Patch::RemoveAttribute {
                            target: target.clone(),
                            name: o.name.clone(),
                        });
                        self.patches.push(Patch::AddHandler {
                            target: target.clone(),
                            handler: n.clone(),
                        });
                    }
                    (Attr::Handler(o), Attr::Plain(n)) => {
                        self.patches.push(Patch::RemoveHandler {
                            target: target.clone(),
                            event: o.event.clone(),
                        });
                        self.patches.push(Patch::AddAttribute {
                            target: target.clone(),
                            attr: n.clone(),
                        });
                    }
                },
                None => match attr {
                    Attr::Plain(n) => self.patches.push(Patch::AddAttribute {
                        target: target.clone(),
                        attr: n.clone(),
                    }),
                    Attr::Handler(n) => self.patches.push(Patch::AddHandler {
                        target: target.clone(),
                        handler: n.clone(),
                    }),
                },
            }
        }

        for (i, attr) in old.attrs.iter().enumerate() {
            let name = attr.rendered_name();
            if self.scratch.old_index.get(name.as_str()) != Some(&i) {
                continue;
            }
            if !self.scratch.new_index.contains_key(name.as_str()) {
                match attr {
                    Attr::Plain(o) => self.patches.push(Patch::RemoveAttribute {
                        target: target.clone(),
                        name: o.name.clone(),
                    }),
                    Attr::Handler(o) => self.patches.push(Patch::RemoveHandler {
                        target: target.clone(),
                        event: o.event.clone(),
                    }),
                }
            }
        }

        self.scratch.old_index.clear();
        self.scratch.new_index.clear();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Children
    // ─────────────────────────────────────────────────────────────────────────

    fn diff_children(&mut self, old: &Element, new: &Element) {
        let keyed = old
            .children
            .iter()
            .chain(new.children.iter())
            .any(Node::exposes_key);
        if keyed {
            self.diff_children_keyed(old, new);
        } else {
            self.diff_children_positional(old, new);
        }
    }

    /// Unkeyed lists diff by index: shared positions recurse, trailing old
    /// children are removed, trailing new children are appended on an
    /// anchor chain (which the batcher folds into one patch).
    fn diff_children_positional(&mut self, old: &Element, new: &Element) {
        let parent = &old.id;
        let shared = old.children.len().min(new.children.len());

        for i in 0..shared {
            self.diff_nodes(&old.children[i], &new.children[i], false);
        }

        for child in &old.children[shared..] {
            self.patches.push(Patch::RemoveChild {
                parent: parent.clone(),
                target: child.id().clone(),
            });
        }

        if new.children.len() > shared {
            let mut anchor = if shared == 0 {
                Anchor::Start
            } else {
                Anchor::After(live_id(&old.children[shared - 1], &new.children[shared - 1]).clone())
            };
            for child in &new.children[shared..] {
                self.patches.push(Patch::AddChild {
                    parent: parent.clone(),
                    anchor: anchor.clone(),
                    node: child.clone(),
                });
                anchor = Anchor::After(child.id().clone());
            }
        }
    }

    /// Keyed reconciliation.
    ///
    /// Matches children across the two lists by key (first occurrence wins
    /// on both sides; later duplicates fall through as plain removals and
    /// insertions), computes the LIS of the matched children's old
    /// positions in new order, then emits: all removals in old order,
    /// followed by one left-to-right pass over the new list that moves
    /// every non-LIS matched child and inserts every unmatched one, each
    /// anchored on the live identity of its preceding sibling. Matched
    /// pairs recurse afterwards, in new order.
    fn diff_children_keyed(&mut self, old_el: &Element, new_el: &Element) {
        let parent = &old_el.id;
        let old_children = &old_el.children;
        let new_children = &new_el.children;

        let old_index = &mut self.scratch.old_index;
        old_index.clear();
        for (i, child) in old_children.iter().enumerate() {
            old_index
                .entry(CompactString::from(child.child_key()))
                .or_insert(i);
        }
        let new_index = &mut self.scratch.new_index;
        new_index.clear();
        for (i, child) in new_children.iter().enumerate() {
            new_index
                .entry(CompactString::from(child.child_key()))
                .or_insert(i);
        }

        // Matched pairs in new order; seq carries their old positions.
        let mut matched: Vec<(usize, usize)> = Vec::new();
        let mut matched_old = vec![false; old_children.len()];
        self.scratch.seq.clear();
        for (new_idx, child) in new_children.iter().enumerate() {
            let key = child.child_key();
            if self.scratch.new_index.get(key) != Some(&new_idx) {
                continue;
            }
            if let Some(&old_idx) = self.scratch.old_index.get(key) {
                matched.push((old_idx, new_idx));
                self.scratch.seq.push(old_idx);
                matched_old[old_idx] = true;
            }
        }

        // Removals first, so a re-added duplicate key never coexists with
        // the old child it displaces.
        for (i, child) in old_children.iter().enumerate() {
            if !matched_old[i] {
                self.patches.push(Patch::RemoveChild {
                    parent: parent.clone(),
                    target: child.id().clone(),
                });
            }
        }

        // Children on the LIS are already consistent with the new relative
        // order; everything else is placed after its (live) predecessor.
        let lis = longest_increasing_run(&self.scratch.seq, &mut self.scratch.lis);
        trace!(
            matched = matched.len(),
            stable = lis.len(),
            old = old_children.len(),
            new = new_children.len(),
            "keyed reconcile"
        );

        let mut m = 0;
        let mut l = 0;
        let mut anchor = Anchor::Start;
        for (new_idx, child) in new_children.iter().enumerate() {
            // Anchors name the id that is live while the structural ops
            // run: matched children still carry their old id (content
            // recursion comes after), inserted children their own.
            let placed_id = if m < matched.len() && matched[m].1 == new_idx {
                let (old_idx, _) = matched[m];
                if l < lis.len() && lis[l] == m {
                    l += 1;
                } else {
                    self.patches.push(Patch::MoveChild {
                        parent: parent.clone(),
                        target: old_children[old_idx].id().clone(),
                        anchor: anchor.clone(),
                    });
                }
                m += 1;
                old_children[old_idx].id()
            } else {
                self.patches.push(Patch::AddChild {
                    parent: parent.clone(),
                    anchor: anchor.clone(),
                    node: child.clone(),
                });
                child.id()
            };
            anchor = Anchor::After(placed_id.clone());
        }

        // Maps and work arrays are live again for levels below us.
        self.scratch.old_index.clear();
        self.scratch.new_index.clear();
        self.scratch.seq.clear();

        for &(old_idx, new_idx) in &matched {
            self.diff_nodes(&old_children[old_idx], &new_children[new_idx], false);
        }
    }
}

/// The identity a diffed pair leaves behind once its own patches have
/// applied: elements and empties keep the old id (nothing rewrites it),
/// text and raw nodes carry the new id (`UpdateText`/`UpdateRaw` ship it),
/// replaced subtrees carry the new node's id. Positional trailing appends
/// anchor on this, since they run after the shared prefix has recursed.
fn live_id<'a>(old: &'a Node, new: &'a Node) -> &'a NodeId {
    match (old, new) {
        (Node::Element(o), Node::Element(n)) if o.tag == n.tag => &o.id,
        (Node::Empty(o), Node::Empty(_)) => &o.id,
        (Node::Text(_), Node::Text(n)) => &n.id,
        (Node::Raw(_), Node::Raw(n)) => &n.id,
        _ => new.id(),
    }
}

// =============================================================================
// Tests
// =============================================================================
