//! Mapping change locations back to syntactic entity kinds.
//!
//! Change labels are raw node labels. Reports usually want the kind of the
//! entity at that location instead, e.g. `method_declaration`. The lookup
//! takes the entity that starts where the change starts and ends at, or
//! closest after, where the change ends.

use std::collections::BTreeMap;

use facet::Facet;
use rapidhash::RapidHashMap as HashMap;

use crate::change::{ChangeKey, ChangeSet, ChangeType};
use crate::classify::Diff;
use crate::tree::Tree;

/// Prefix for changes whose location matches no known entity.
pub const UNKNOWN_ENTITY: &str = "Unknown#";

/// Entity kinds of a tree, indexed by start offset, then end offset.
#[derive(Debug, Default)]
pub struct EntityIndex {
    by_start: HashMap<usize, BTreeMap<usize, String>>,
}

impl EntityIndex {
    /// Index every non-root node of `tree`, pruned ones included.
    ///
    /// Nodes sharing a span are resolved to the one created last, which is
    /// the innermost.
    pub fn new(tree: &Tree) -> Self {
        let mut by_start: HashMap<usize, BTreeMap<usize, String>> = HashMap::default();
        for id in tree.nodes() {
            let span = tree.span(id);
            by_start
                .entry(span.start)
                .or_default()
                .insert(span.end, tree.kind(id).to_owned());
        }
        Self { by_start }
    }

    /// Kind of the entity starting at `start` with the smallest end `>= end`.
    pub fn closest(&self, start: usize, end: usize) -> Option<&str> {
        self.by_start
            .get(&start)?
            .range(end..)
            .next()
            .map(|(_, kind)| kind.as_str())
    }
}

/// A change with its entity kind resolved.
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChange {
    /// What happened
    pub change_type: ChangeType,
    /// Kind of the enclosing entity, or `Unknown#<label>`
    pub entity_type: String,
    /// Raw label of the changed node
    pub entity_label: String,
    /// Start offset
    pub start: usize,
    /// End offset
    pub end: usize,
}

/// Resolve every group of `changes`. Inserts are looked up in the new tree's
/// index; deletes, updates and moves in the old one.
pub fn resolve(changes: &ChangeSet, old: &EntityIndex, new: &EntityIndex) -> Vec<ResolvedChange> {
    changes.keys().map(|key| resolve_one(key, old, new)).collect()
}

fn resolve_one(key: &ChangeKey, old: &EntityIndex, new: &EntityIndex) -> ResolvedChange {
    let index = match key.change_type {
        ChangeType::Insert => new,
        ChangeType::Delete | ChangeType::Update | ChangeType::Move => old,
    };
    let entity_type = match index.closest(key.start, key.end) {
        Some(kind) => kind.to_owned(),
        None => format!("{UNKNOWN_ENTITY}{}", key.entity_label),
    };
    ResolvedChange {
        change_type: key.change_type,
        entity_type,
        entity_label: key.entity_label.clone(),
        start: key.start,
        end: key.end,
    }
}

impl Diff {
    /// Resolve every change against the entities of the diffed trees.
    pub fn resolve_entities(&self) -> Vec<ResolvedChange> {
        let old = EntityIndex::new(self.old_tree());
        let new = EntityIndex::new(self.new_tree());
        resolve(self.changes(), &old, &new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{PlainNode, Span};
    use crate::tree::build_tree;

    #[test]
    fn test_ceiling_end_on_same_start() {
        let syntax = PlainNode::branch(
            "method",
            [
                PlainNode::valued("name", "foo").with_span(0, 3),
                PlainNode::leaf("body").with_span(4, 10),
            ],
        )
        .with_span(0, 10);
        let tree = build_tree(&syntax).unwrap();
        let index = EntityIndex::new(&tree);

        assert_eq!(index.closest(0, 3), Some("name"));
        assert_eq!(index.closest(0, 5), Some("method"));
        assert_eq!(index.closest(0, 11), None);
        assert_eq!(index.closest(2, 3), None);
    }

    #[test]
    fn test_unresolved_changes_fall_back_to_label() {
        let mut changes = ChangeSet::new();
        changes.record(
            ChangeKey::new(ChangeType::Delete, "name|#|foo", Span::new(40, 43)),
            core::iter::empty(),
        );
        let resolved = resolve(&changes, &EntityIndex::default(), &EntityIndex::default());
        assert_eq!(resolved[0].entity_type, "Unknown#name|#|foo");
    }

    #[test]
    fn test_inserts_use_the_new_index() {
        let old = build_tree(&PlainNode::leaf("field").with_span(0, 5)).unwrap();
        let new = build_tree(&PlainNode::leaf("method").with_span(0, 5)).unwrap();
        let mut changes = ChangeSet::new();
        changes.record(
            ChangeKey::new(ChangeType::Insert, "method", Span::new(0, 5)),
            core::iter::empty(),
        );
        changes.record(
            ChangeKey::new(ChangeType::Delete, "field", Span::new(0, 5)),
            core::iter::empty(),
        );

        let resolved = resolve(&changes, &EntityIndex::new(&old), &EntityIndex::new(&new));
        assert_eq!(resolved[0].entity_type, "method");
        assert_eq!(resolved[1].entity_type, "field");
    }
}
