//! Classification of what pruning left behind.
//!
//! Every surviving old node either finds a similar new counterpart (UPDATE,
//! or nothing when the pair turns out to be identical) or is DELETEd. Every
//! new node that nobody claimed is an INSERT.

use crate::change::{ChangeKey, ChangeSet, ChangeType, Occurrence};
use crate::error::DiffError;
use crate::matching::{DiffConfig, Matching};
use crate::prune::{Pruned, prune};
use crate::similarity::find_similar_counterpart;
use crate::tree::{NodeData, Tree};
use crate::tracing_macros::{debug, trace};

/// The outcome of a diff: both trees, the node matching, and the changes.
///
/// Occurrences in the change set point into the two trees, which still hold
/// every node, pruned ones included.
#[derive(Debug)]
pub struct Diff {
    pub(crate) old: Tree,
    pub(crate) new: Tree,
    pub(crate) matching: Matching,
    pub(crate) changes: ChangeSet,
}

impl Diff {
    /// The old tree, minus pruned subtrees.
    pub fn old_tree(&self) -> &Tree {
        &self.old
    }

    /// The new tree, minus pruned subtrees.
    pub fn new_tree(&self) -> &Tree {
        &self.new
    }

    /// All matched pairs, pruned and similar.
    pub fn matching(&self) -> &Matching {
        &self.matching
    }

    /// The classified, grouped changes.
    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    /// Give up the trees and keep the change set.
    pub fn into_changes(self) -> ChangeSet {
        self.changes
    }

    /// Node data behind an occurrence.
    pub fn node(&self, occurrence: Occurrence) -> &NodeData {
        match occurrence {
            Occurrence::Old(id) => self.old.get(id),
            Occurrence::New(id) => self.new.get(id),
        }
    }
}

impl Pruned {
    /// Classify the nodes that survived pruning.
    pub fn classify(self, config: &DiffConfig) -> Result<Diff, DiffError> {
        let Pruned {
            old,
            new,
            mut matching,
            mut changes,
        } = self;

        for o in old.breadth_first() {
            if matching.contains_old(o) {
                continue;
            }
            let found =
                find_similar_counterpart(&old, o, &new, &mut matching, config.similarity_threshold)?;
            match found {
                // Matched but unchanged; reported only on request.
                Some(n)
                    if !config.report_identical_matches
                        && old.fingerprint(o)? == new.fingerprint(n)? =>
                {
                    trace!(label = old.label(o), "similar counterpart is identical");
                }
                Some(n) => changes.record(
                    ChangeKey::new(ChangeType::Update, old.label(o), old.span(o)),
                    [Occurrence::Old(o), Occurrence::New(n)],
                ),
                None => changes.record(
                    ChangeKey::new(ChangeType::Delete, old.label(o), old.span(o)),
                    [Occurrence::Old(o)],
                ),
            }
        }

        for n in new.breadth_first() {
            if !matching.contains_new(n) {
                changes.record(
                    ChangeKey::new(ChangeType::Insert, new.label(n), new.span(n)),
                    [Occurrence::New(n)],
                );
            }
        }

        debug!(
            inserts = changes.count(ChangeType::Insert),
            deletes = changes.count(ChangeType::Delete),
            updates = changes.count(ChangeType::Update),
            moves = changes.count(ChangeType::Move),
            "classified"
        );
        Ok(Diff {
            old,
            new,
            matching,
            changes,
        })
    }
}

/// Diff two fingerprinted trees: prune, then classify.
pub fn diff(old: Tree, new: Tree, config: &DiffConfig) -> Result<Diff, DiffError> {
    prune(old, new, config)?.classify(config)
}
