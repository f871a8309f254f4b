//! Bookkeeping of which old node was paired with which new node.
//!
//! This is the side table behind the per-node "matched" flag: the trees stay
//! immutable apart from pruning, and every pairing decision lands here.

use indextree::NodeId;

/// How a pair of nodes was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Equal fingerprints; the subtrees were pruned as unchanged.
    Identical,
    /// Similarity score above the threshold; the old node was updated.
    Similar,
}

/// A bidirectional mapping between nodes in the old and new trees.
/// Uses Vec for O(1) lookups indexed by NodeId.
#[derive(Debug, Default)]
pub struct Matching {
    /// Map from old node to new node (indexed by the old NodeId)
    old_to_new: Vec<Option<NodeId>>,
    /// Map from new node to old node (indexed by the new NodeId)
    new_to_old: Vec<Option<NodeId>>,
    /// All matched pairs in the order they were made
    pairs: Vec<(NodeId, NodeId, MatchKind)>,
}

impl Matching {
    /// Create a new empty matching.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new matching with preallocated capacity.
    pub fn with_capacity(max_old: usize, max_new: usize) -> Self {
        Self {
            old_to_new: vec![None; max_old],
            new_to_old: vec![None; max_new],
            pairs: Vec::new(),
        }
    }

    /// Record a match between two nodes.
    #[inline]
    pub fn add(&mut self, old: NodeId, new: NodeId, kind: MatchKind) {
        let old_idx = usize::from(old);
        let new_idx = usize::from(new);

        if old_idx >= self.old_to_new.len() {
            self.old_to_new.resize(old_idx + 1, None);
        }
        if new_idx >= self.new_to_old.len() {
            self.new_to_old.resize(new_idx + 1, None);
        }

        self.old_to_new[old_idx] = Some(new);
        self.new_to_old[new_idx] = Some(old);
        self.pairs.push((old, new, kind));
    }

    /// Check if a node from the old tree is matched.
    #[inline(always)]
    pub fn contains_old(&self, old: NodeId) -> bool {
        self.get_new(old).is_some()
    }

    /// Check if a node from the new tree is matched.
    #[inline(always)]
    pub fn contains_new(&self, new: NodeId) -> bool {
        self.get_old(new).is_some()
    }

    /// Get the counterpart of an old node.
    #[inline(always)]
    pub fn get_new(&self, old: NodeId) -> Option<NodeId> {
        self.old_to_new.get(usize::from(old)).copied().flatten()
    }

    /// Get the counterpart of a new node.
    #[inline(always)]
    pub fn get_old(&self, new: NodeId) -> Option<NodeId> {
        self.new_to_old.get(usize::from(new)).copied().flatten()
    }

    /// All matched pairs, in matching order.
    pub fn pairs(&self) -> impl Iterator<Item = (NodeId, NodeId, MatchKind)> + '_ {
        self.pairs.iter().copied()
    }

    /// Number of matched pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if there are no matches.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Configuration for pruning and similarity matching.
#[derive(Debug, Clone)]
pub struct DiffConfig {
    /// Minimum similarity score for an old node to be paired with a new
    /// node (and reported as UPDATE instead of DELETE). Inclusive.
    pub similarity_threshold: f64,

    /// Report MOVE when a pruned pair sits under parents with different
    /// labels. Off by default: the baseline algorithm never emits MOVE.
    pub detect_moves: bool,

    /// Report UPDATE for similarity pairs whose fingerprints are equal too.
    /// Off by default, so unchanged leaves under a changed parent stay out of
    /// the report and identical inputs always diff to nothing.
    pub report_identical_matches: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.5,
            detect_moves: false,
            report_identical_matches: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indextree::Arena;

    #[test]
    fn test_lookup_both_directions() {
        let mut old_arena = Arena::new();
        let mut new_arena = Arena::new();
        let a = old_arena.new_node(());
        let b = old_arena.new_node(());
        let x = new_arena.new_node(());

        let mut matching = Matching::new();
        matching.add(b, x, MatchKind::Similar);

        assert!(matching.contains_old(b));
        assert!(!matching.contains_old(a));
        assert_eq!(matching.get_new(b), Some(x));
        assert_eq!(matching.get_old(x), Some(b));
        assert_eq!(matching.pairs().collect::<Vec<_>>(), vec![(b, x, MatchKind::Similar)]);
    }
}
