use facet::Facet;

/// Errors raised while building or diffing trees.
///
/// Every variant signals malformed input or a broken pipeline invariant;
/// none of them is recoverable within a single diff.
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
#[facet(derive(Error))]
#[repr(u8)]
pub enum DiffError {
    /// syntax node at offset {offset} has an empty kind
    MissingLabel { offset: usize },

    /// syntax tree is deeper than {limit} levels (cyclic input?)
    DepthLimitExceeded { limit: usize },

    /// node {label} has no fingerprint (tree was not fully built)
    MissingFingerprint { label: String },

    /// node {label} has no parent
    Detached { label: String },
}
