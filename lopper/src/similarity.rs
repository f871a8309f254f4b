//! Similarity matching for old nodes that survived pruning.
//!
//! score(o, n) =
//!     0.25 · [label(o) = label(n)]
//!   + 0.25 · [label(parent(o)) = label(parent(n))]
//!   + 0.5  · (1 − |children(o) Δ children(n)| / (|children(o)| + |children(n)|))
//!
//! Children are compared by label as a multiset. Two childless nodes get the
//! full 0.5 for the last term.

use indextree::NodeId;
use rapidhash::RapidHashMap as HashMap;

use crate::error::DiffError;
use crate::matching::{MatchKind, Matching};
use crate::tree::Tree;
use crate::tracing_macros::trace;

/// Similarity score between an old node and a new node, in `[0, 1]`.
///
/// Both nodes must have a parent; scoring a root or a detached node is a
/// traversal bug and reported as [`DiffError::Detached`].
pub fn similarity(
    old_tree: &Tree,
    old: NodeId,
    new_tree: &Tree,
    new: NodeId,
) -> Result<f64, DiffError> {
    let old_parent = parent_of(old_tree, old)?;
    let new_parent = parent_of(new_tree, new)?;

    let mut score = 0.0;
    if old_tree.label(old) == new_tree.label(new) {
        score += 0.25;
    }
    if old_tree.label(old_parent) == new_tree.label(new_parent) {
        score += 0.25;
    }
    score += 0.5 * child_overlap(old_tree, old, new_tree, new);
    Ok(score)
}

fn parent_of(tree: &Tree, id: NodeId) -> Result<NodeId, DiffError> {
    tree.parent(id).ok_or_else(|| DiffError::Detached {
        label: tree.label(id).to_owned(),
    })
}

/// `1 − |A Δ B| / (|A| + |B|)` over child labels; 1.0 when both are empty.
fn child_overlap(old_tree: &Tree, old: NodeId, new_tree: &Tree, new: NodeId) -> f64 {
    let mut balance: HashMap<&str, isize> = HashMap::default();
    let mut total = 0usize;
    for child in old_tree.children(old) {
        *balance.entry(old_tree.label(child)).or_default() += 1;
        total += 1;
    }
    for child in new_tree.children(new) {
        *balance.entry(new_tree.label(child)).or_default() -= 1;
        total += 1;
    }

    if total == 0 {
        return 1.0;
    }
    let symmetric_difference: usize = balance.values().map(|n| n.unsigned_abs()).sum();
    1.0 - symmetric_difference as f64 / total as f64
}

/// Find the first unmatched new node, in breadth-first order, whose score
/// against `old` reaches `threshold`. A hit is recorded in `matching`.
pub fn find_similar_counterpart(
    old_tree: &Tree,
    old: NodeId,
    new_tree: &Tree,
    matching: &mut Matching,
    threshold: f64,
) -> Result<Option<NodeId>, DiffError> {
    for candidate in new_tree.breadth_first() {
        if matching.contains_new(candidate) {
            continue;
        }
        let score = similarity(old_tree, old, new_tree, candidate)?;
        if score >= threshold {
            trace!(
                old = old_tree.label(old),
                new = new_tree.label(candidate),
                score,
                "similar counterpart"
            );
            matching.add(old, candidate, MatchKind::Similar);
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}
