//! Patch batcher.
//!
//! Folds contiguous runs of same-kind single-child patches against one
//! parent into multi-child batch patches: an anchor-chained run of
//! [`Patch::AddChild`] becomes one [`Patch::AddChildren`] (or
//! [`Patch::AddTexts`]/[`Patch::AddRaws`] when the run is purely text or
//! purely raw), and a run of [`Patch::RemoveChild`] becomes one
//! [`Patch::RemoveChildren`].
//!
//! Batching changes patch *count* only. Replaying the batched sequence
//! produces exactly the tree the unbatched sequence produces.

use crate::id::NodeId;
use crate::node::Node;
use crate::patch::{Anchor, Patch};

/// Fold contiguous single-child insert/remove runs into batch patches.
pub fn batch(patches: Vec<Patch>) -> Vec<Patch> {
    let mut out = Vec::with_capacity(patches.len());
    let mut run: Option<Run> = None;

    for patch in patches {
        match patch {
            Patch::AddChild {
                parent,
                anchor,
                node,
            } => {
                // Extend an insert run only when this insertion is anchored
                // on the run's previous node, i.e. the run is one
                // contiguous splice.
                if let Some(Run::Insert(ins)) = &mut run
                    && ins.parent == parent
                    && matches!(&anchor, Anchor::After(id) if *id == ins.last_id)
                {
                    ins.last_id = node.id().clone();
                    ins.nodes.push(node);
                    continue;
                }
                flush(&mut run, &mut out);
                run = Some(Run::Insert(InsertRun {
                    last_id: node.id().clone(),
                    parent,
                    anchor,
                    nodes: vec![node],
                }));
            }
            Patch::RemoveChild { parent, target } => {
                if let Some(Run::Remove(rem)) = &mut run
                    && rem.parent == parent
                {
                    rem.targets.push(target);
                    continue;
                }
                flush(&mut run, &mut out);
                run = Some(Run::Remove(RemoveRun {
                    parent,
                    targets: vec![target],
                }));
            }
            other => {
                flush(&mut run, &mut out);
                out.push(other);
            }
        }
    }

    flush(&mut run, &mut out);
    out
}

struct InsertRun {
    parent: NodeId,
    anchor: Anchor,
    nodes: Vec<Node>,
    last_id: NodeId,
}

struct RemoveRun {
    parent: NodeId,
    targets: Vec<NodeId>,
}

enum Run {
    Insert(InsertRun),
    Remove(RemoveRun),
}

fn flush(run: &mut Option<Run>, out: &mut Vec<Patch>) {
    match run.take() {
        None => {}
        Some(Run::Insert(mut ins)) => {
            if ins.nodes.len() == 1 {
                out.push(Patch::AddChild {
                    parent: ins.parent,
                    anchor: ins.anchor,
                    node: ins.nodes.pop().expect("run holds one node"),
                });
            } else if ins.nodes.iter().all(Node::is_text) {
                out.push(Patch::AddTexts {
                    parent: ins.parent,
                    anchor: ins.anchor,
                    texts: ins
                        .nodes
                        .into_iter()
                        .map(|n| match n {
                            Node::Text(t) => t,
                            _ => unreachable!("run checked as pure text"),
                        })
                        .collect(),
                });
            } else if ins.nodes.iter().all(|n| matches!(n, Node::Raw(_))) {
                out.push(Patch::AddRaws {
                    parent: ins.parent,
                    anchor: ins.anchor,
                    raws: ins
                        .nodes
                        .into_iter()
                        .map(|n| match n {
                            Node::Raw(r) => r,
                            _ => unreachable!("run checked as pure raw"),
                        })
                        .collect(),
                });
            } else {
                out.push(Patch::AddChildren {
                    parent: ins.parent,
                    anchor: ins.anchor,
                    nodes: ins.nodes,
                });
            }
        }
        Some(Run::Remove(mut rem)) => {
            if rem.targets.len() == 1 {
                out.push(Patch::RemoveChild {
                    parent: rem.parent,
                    target: rem.targets.pop().expect("run holds one target"),
                });
            } else {
                out.push(Patch::RemoveChildren {
                    parent: rem.parent,
                    targets: rem.targets,
                });
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Element, Raw, Text};

    fn add(parent: &str, anchor: Anchor, node: impl Into<Node>) -> Patch {
        Patch::AddChild {
            parent: NodeId::new(parent),
            anchor,
            node: node.into(),
        }
    }

    #[test]
    fn test_chained_inserts_merge() {
        let patches = vec![
            add("p", Anchor::Start, Element::new("1", "li")),
            add("p", Anchor::After(NodeId::new("1")), Element::new("2", "li")),
            add("p", Anchor::After(NodeId::new("2")), Element::new("3", "li")),
        ];

        let batched = batch(patches);
        assert_eq!(batched.len(), 1);
        assert!(matches!(
            &batched[0],
            Patch::AddChildren { anchor: Anchor::Start, nodes, .. } if nodes.len() == 3
        ));
    }

    #[test]
    fn test_pure_text_run_specializes() {
        let patches = vec![
            add("p", Anchor::Start, Text::new("1", "a")),
            add("p", Anchor::After(NodeId::new("1")), Text::new("2", "b")),
        ];

        let batched = batch(patches);
        assert_eq!(batched.len(), 1);
        assert!(matches!(
            &batched[0],
            Patch::AddTexts { texts, .. } if texts.len() == 2
        ));
    }

    #[test]
    fn test_pure_raw_run_specializes() {
        let patches = vec![
            add("p", Anchor::Start, Raw::new("1", "<i>a</i>")),
            add("p", Anchor::After(NodeId::new("1")), Raw::new("2", "<i>b</i>")),
        ];

        let batched = batch(patches);
        assert_eq!(batched.len(), 1);
        assert!(matches!(&batched[0], Patch::AddRaws { raws, .. } if raws.len() == 2));
    }

    #[test]
    fn test_mixed_run_stays_generic() {
        let patches = vec![
            add("p", Anchor::Start, Text::new("1", "a")),
            add("p", Anchor::After(NodeId::new("1")), Element::new("2", "li")),
        ];

        let batched = batch(patches);
        assert_eq!(batched.len(), 1);
        assert!(matches!(&batched[0], Patch::AddChildren { .. }));
    }

    #[test]
    fn test_removals_merge_per_parent() {
        let patches = vec![
            Patch::RemoveChild {
                parent: NodeId::new("p"),
                target: NodeId::new("1"),
            },
            Patch::RemoveChild {
                parent: NodeId::new("p"),
                target: NodeId::new("2"),
            },
            Patch::RemoveChild {
                parent: NodeId::new("q"),
                target: NodeId::new("3"),
            },
        ];

        let batched = batch(patches);
        assert_eq!(batched.len(), 2);
        assert!(matches!(
            &batched[0],
            Patch::RemoveChildren { targets, .. } if targets.len() == 2
        ));
        assert!(matches!(&batched[1], Patch::RemoveChild { .. }));
    }

    #[test]
    fn test_singleton_runs_stay_single() {
        let patches = vec![
            add("p", Anchor::Start, Element::new("1", "li")),
            Patch::RemoveChild {
                parent: NodeId::new("p"),
                target: NodeId::new("9"),
            },
        ];

        let batched = batch(patches.clone());
        assert_eq!(batched, patches);
    }

    #[test]
    fn test_unchained_inserts_do_not_merge() {
        // Two inserts into the same parent but not anchored on each other
        // are separate splices.
        let patches = vec![
            add("p", Anchor::Start, Element::new("1", "li")),
            add("p", Anchor::After(NodeId::new("zz")), Element::new("2", "li")),
        ];

        let batched = batch(patches.clone());
        assert_eq!(batched, patches);
    }

    #[test]
    fn test_intervening_patch_splits_runs() {
        let patches = vec![
            add("p", Anchor::Start, Element::new("1", "li")),
            Patch::UpdateText {
                target: NodeId::new("t"),
                id: NodeId::new("t"),
                value: "x".into(),
            },
            add("p", Anchor::After(NodeId::new("1")), Element::new("2", "li")),
        ];

        let batched = batch(patches.clone());
        assert_eq!(batched, patches);
    }
}
