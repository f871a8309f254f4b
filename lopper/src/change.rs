//! Classified changes and their grouping.

use core::fmt;

use facet::Facet;
use indexmap::IndexMap;
use indextree::NodeId;
use smallvec::SmallVec;

use crate::syntax::Span;

/// Kind of a reported change.
#[derive(Facet, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ChangeType {
    /// Present only in the new tree.
    Insert,
    /// Present only in the old tree.
    Delete,
    /// Present in both, with changed content.
    Update,
    /// Unchanged content under a differently labeled parent. Only emitted
    /// when move detection is enabled.
    Move,
}

impl ChangeType {
    /// Upper-case name, as used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Insert => "INSERT",
            ChangeType::Delete => "DELETE",
            ChangeType::Update => "UPDATE",
            ChangeType::Move => "MOVE",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grouping key of a change: type, entity label and source span.
#[derive(Facet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangeKey {
    /// What happened
    pub change_type: ChangeType,
    /// Label of the affected node
    pub entity_label: String,
    /// Start offset of the affected node
    pub start: usize,
    /// End offset of the affected node
    pub end: usize,
}

impl ChangeKey {
    /// Build a key from a label and span.
    pub fn new(change_type: ChangeType, entity_label: impl Into<String>, span: Span) -> Self {
        Self {
            change_type,
            entity_label: entity_label.into(),
            start: span.start,
            end: span.end,
        }
    }

    /// Source span of the change.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

impl fmt::Display for ChangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} @{}..{}",
            self.change_type, self.entity_label, self.start, self.end
        )
    }
}

/// A node contributing to a change, tagged with the tree it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occurrence {
    /// Node of the old tree
    Old(NodeId),
    /// Node of the new tree
    New(NodeId),
}

/// Nodes contributing to one change group. Most groups hold one or two.
pub type Occurrences = SmallVec<[Occurrence; 2]>;

/// Changes grouped by [`ChangeKey`], in the order keys were first recorded.
#[derive(Debug, Default)]
pub struct ChangeSet {
    groups: IndexMap<ChangeKey, Occurrences>,
}

impl ChangeSet {
    /// Create an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record occurrences under `key`, appending to an existing group.
    pub fn record(&mut self, key: ChangeKey, occurrences: impl IntoIterator<Item = Occurrence>) {
        self.groups.entry(key).or_default().extend(occurrences);
    }

    /// Occurrences recorded for `key`.
    pub fn get(&self, key: &ChangeKey) -> Option<&[Occurrence]> {
        self.groups.get(key).map(|o| o.as_slice())
    }

    /// All groups.
    pub fn iter(&self) -> impl Iterator<Item = (&ChangeKey, &[Occurrence])> {
        self.groups.iter().map(|(k, o)| (k, o.as_slice()))
    }

    /// Keys of all groups.
    pub fn keys(&self) -> impl Iterator<Item = &ChangeKey> {
        self.groups.keys()
    }

    /// Groups of one change type.
    pub fn of_type(
        &self,
        change_type: ChangeType,
    ) -> impl Iterator<Item = (&ChangeKey, &[Occurrence])> {
        self.iter().filter(move |(k, _)| k.change_type == change_type)
    }

    /// Number of groups of one change type.
    pub fn count(&self, change_type: ChangeType) -> usize {
        self.of_type(change_type).count()
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether nothing changed.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = (&'a ChangeKey, &'a [Occurrence]);
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indextree::Arena;

    #[test]
    fn test_same_key_accumulates() {
        let mut arena = Arena::new();
        let a = arena.new_node(());
        let b = arena.new_node(());

        let mut changes = ChangeSet::new();
        let key = ChangeKey::new(ChangeType::Delete, "field", Span::new(3, 9));
        changes.record(key.clone(), [Occurrence::Old(a)]);
        changes.record(key.clone(), [Occurrence::Old(b)]);

        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes.get(&key).unwrap(),
            &[Occurrence::Old(a), Occurrence::Old(b)]
        );
    }

    #[test]
    fn test_span_is_part_of_the_key() {
        let mut arena = Arena::new();
        let a = arena.new_node(());

        let mut changes = ChangeSet::new();
        changes.record(
            ChangeKey::new(ChangeType::Insert, "x", Span::new(0, 1)),
            [Occurrence::New(a)],
        );
        changes.record(
            ChangeKey::new(ChangeType::Insert, "x", Span::new(2, 3)),
            [Occurrence::New(a)],
        );
        assert_eq!(changes.count(ChangeType::Insert), 2);
        assert_eq!(changes.count(ChangeType::Delete), 0);
    }

    #[test]
    fn test_key_display() {
        let key = ChangeKey::new(ChangeType::Update, "method|#|foo", Span::new(4, 20));
        assert_eq!(key.to_string(), "UPDATE method|#|foo @4..20");
    }
}
