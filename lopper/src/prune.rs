//! Pruning of subtrees that are identical in both trees.
//!
//! The old tree is walked breadth-first. Every internal old node looks up the
//! first new node, in breadth-first order, with the same fingerprint. A hit
//! removes both subtrees from further comparison; a miss descends into the
//! old node's children. Leaves are never pruned: a leaf's fingerprint is just
//! its label, which is far too common to pair on.
//!
//! Tie-breaking is first-come: with several equal candidates, the shallowest
//! and then leftmost wins. Equal fingerprints mean equal content, so any
//! candidate is as good as another content-wise; only positions may differ.

use std::collections::VecDeque;

use indextree::NodeId;
use rapidhash::RapidHashMap as HashMap;

use crate::change::{ChangeKey, ChangeSet, ChangeType, Occurrence};
use crate::error::DiffError;
use crate::fingerprint::Fingerprint;
use crate::matching::{DiffConfig, MatchKind, Matching};
use crate::tree::Tree;
use crate::tracing_macros::{debug, trace};

/// Both trees after pruning, ready for classification.
///
/// Pruned subtrees are detached from their trees but still addressable.
#[derive(Debug)]
pub struct Pruned {
    pub(crate) old: Tree,
    pub(crate) new: Tree,
    pub(crate) matching: Matching,
    pub(crate) changes: ChangeSet,
}

impl Pruned {
    /// The old tree, minus pruned subtrees.
    pub fn old_tree(&self) -> &Tree {
        &self.old
    }

    /// The new tree, minus pruned subtrees.
    pub fn new_tree(&self) -> &Tree {
        &self.new
    }

    /// Pairs of pruned subtree roots.
    pub fn matching(&self) -> &Matching {
        &self.matching
    }
}

/// New-tree nodes grouped by fingerprint, each group in breadth-first order.
///
/// Detaching subtrees never reorders the survivors, so the first valid entry
/// of a group is what a fresh breadth-first search would find.
struct FingerprintIndex {
    by_fingerprint: HashMap<Fingerprint, VecDeque<NodeId>>,
}

impl FingerprintIndex {
    fn new(tree: &Tree) -> Result<Self, DiffError> {
        let mut by_fingerprint: HashMap<Fingerprint, VecDeque<NodeId>> = HashMap::default();
        for id in tree.breadth_first() {
            by_fingerprint
                .entry(tree.fingerprint(id)?)
                .or_default()
                .push_back(id);
        }
        Ok(Self { by_fingerprint })
    }

    /// Take the first candidate that is neither matched nor detached.
    /// Skipped candidates can never become valid again, so they are dropped.
    fn take_first(
        &mut self,
        fingerprint: Fingerprint,
        tree: &Tree,
        matching: &Matching,
    ) -> Option<NodeId> {
        let candidates = self.by_fingerprint.get_mut(&fingerprint)?;
        while let Some(id) = candidates.pop_front() {
            if !matching.contains_new(id) && tree.is_attached(id) {
                return Some(id);
            }
        }
        None
    }
}

/// Prune identical subtrees from both trees.
pub fn prune(mut old: Tree, mut new: Tree, config: &DiffConfig) -> Result<Pruned, DiffError> {
    debug!(
        old_nodes = old.node_count(),
        new_nodes = new.node_count(),
        "prune start"
    );
    let mut index = FingerprintIndex::new(&new)?;
    let mut matching = Matching::with_capacity(old.node_count() + 1, new.node_count() + 1);
    let mut changes = ChangeSet::new();

    let mut queue: VecDeque<NodeId> = old.children(old.root()).collect();
    while let Some(o) = queue.pop_front() {
        if old.is_leaf(o) {
            continue;
        }
        let fingerprint = old.fingerprint(o)?;
        let Some(n) = index.take_first(fingerprint, &new, &matching) else {
            queue.extend(old.children(o));
            continue;
        };

        trace!(label = old.label(o), %fingerprint, "pruning identical subtree");
        if config.detect_moves {
            record_move(&old, o, &new, n, &mut changes);
        }
        matching.add(o, n, MatchKind::Identical);
        old.detach(o);
        new.detach(n);
    }

    debug!(pruned = matching.len(), "prune done");
    Ok(Pruned {
        old,
        new,
        matching,
        changes,
    })
}

/// Record a MOVE when a pruned pair sits under differently labeled parents.
fn record_move(old: &Tree, o: NodeId, new: &Tree, n: NodeId, changes: &mut ChangeSet) {
    let (Some(old_parent), Some(new_parent)) = (old.parent(o), new.parent(n)) else {
        return;
    };
    if old.label(old_parent) != new.label(new_parent) {
        trace!(
            label = old.label(o),
            from = old.label(old_parent),
            to = new.label(new_parent),
            "moved"
        );
        changes.record(
            ChangeKey::new(ChangeType::Move, old.label(o), old.span(o)),
            [Occurrence::Old(o), Occurrence::New(n)],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::PlainNode;
    use crate::tree::build_tree;
    use facet_testhelpers::test;

    fn method(name: &str, body: &[&str]) -> PlainNode {
        PlainNode::branch(
            "method",
            [
                PlainNode::valued("name", name),
                PlainNode::branch("body", body.iter().map(|s| PlainNode::valued("stmt", *s))),
            ],
        )
    }

    #[test]
    fn test_identical_trees_prune_completely() {
        let syntax = PlainNode::branch("unit", [method("a", &["x", "y"]), method("b", &["z"])]);
        let old = build_tree(&syntax).unwrap();
        let new = build_tree(&syntax).unwrap();

        let pruned = prune(old, new, &DiffConfig::default()).unwrap();
        assert_eq!(pruned.old_tree().breadth_first().count(), 0);
        assert_eq!(pruned.new_tree().breadth_first().count(), 0);
        assert_eq!(pruned.matching().len(), 1);
    }

    #[test]
    fn test_changed_method_survives() {
        let old = build_tree(&PlainNode::branch(
            "unit",
            [method("a", &["x"]), method("b", &["y"])],
        ))
        .unwrap();
        let new = build_tree(&PlainNode::branch(
            "unit",
            [method("a", &["x"]), method("b", &["w"])],
        ))
        .unwrap();

        let pruned = prune(old, new, &DiffConfig::default()).unwrap();
        let remaining: Vec<&str> = pruned
            .old_tree()
            .breadth_first()
            .map(|id| pruned.old_tree().label(id))
            .collect();
        assert_eq!(
            remaining,
            vec!["unit", "method", "name|#|b", "body", "stmt|#|y"]
        );
    }

    #[test]
    fn test_leaves_are_not_pruned() {
        let old = build_tree(&PlainNode::leaf("x")).unwrap();
        let new = build_tree(&PlainNode::leaf("x")).unwrap();

        let pruned = prune(old, new, &DiffConfig::default()).unwrap();
        assert!(pruned.matching().is_empty());
        assert_eq!(pruned.old_tree().breadth_first().count(), 1);
        assert_eq!(pruned.new_tree().breadth_first().count(), 1);
    }

    #[test]
    fn test_equal_child_text_prunes_across_kinds() {
        let old = build_tree(&PlainNode::branch("call", [PlainNode::leaf("x")])).unwrap();
        let new = build_tree(&PlainNode::branch("cast", [PlainNode::leaf("x")])).unwrap();

        let pruned = prune(old, new, &DiffConfig::default()).unwrap();
        assert_eq!(pruned.matching().len(), 1);
    }

    #[test]
    fn test_first_candidate_in_breadth_first_order_wins() {
        let old = build_tree(&PlainNode::branch(
            "unit",
            [method("a", &["x"]), PlainNode::leaf("k")],
        ))
        .unwrap();
        let new = build_tree(&PlainNode::branch(
            "unit",
            [
                PlainNode::branch("wrapper", [method("a", &["x"])]),
                method("a", &["x"]),
                PlainNode::leaf("k"),
            ],
        ))
        .unwrap();

        let pruned = prune(old, new, &DiffConfig::default()).unwrap();
        assert_eq!(pruned.matching().len(), 1);
        let (_, n, kind) = pruned.matching().pairs().next().unwrap();
        assert_eq!(kind, MatchKind::Identical);
        assert_eq!(pruned.new_tree().parent(n), None);

        // The shallow copy (depth 2) beats the wrapped one (depth 3).
        let tree = pruned.new_tree();
        let unit = tree.children(tree.root()).next().unwrap();
        let wrapper = tree.children(unit).next().unwrap();
        assert_eq!(tree.child_count(unit), 2);
        assert_eq!(tree.label(wrapper), "wrapper");
        assert_eq!(tree.child_count(wrapper), 1);
    }

    #[test]
    fn test_moves_are_opt_in() {
        let old_syntax = PlainNode::branch(
            "unit",
            [PlainNode::branch("class", [method("a", &["x"]), PlainNode::leaf("k")])],
        );
        let new_syntax = PlainNode::branch(
            "unit",
            [
                PlainNode::branch("iface", [method("a", &["x"])]),
                PlainNode::leaf("j"),
            ],
        );

        let pruned = prune(
            build_tree(&old_syntax).unwrap(),
            build_tree(&new_syntax).unwrap(),
            &DiffConfig::default(),
        )
        .unwrap();
        assert!(pruned.changes.is_empty());

        let config = DiffConfig {
            detect_moves: true,
            ..DiffConfig::default()
        };
        let pruned = prune(
            build_tree(&old_syntax).unwrap(),
            build_tree(&new_syntax).unwrap(),
            &config,
        )
        .unwrap();
        assert_eq!(pruned.changes.count(ChangeType::Move), 1);
        assert_eq!(pruned.changes.keys().next().unwrap().entity_label, "method");
    }
}
