//! # Lopper
//!
//! Syntax-tree diffing: prune what is identical, classify what is left.
//!
//! ## Algorithm Overview
//!
//! 1. **Build**: turn a parsed syntax tree into a labeled [`Tree`], where each
//!    node carries `kind|#|value` and an MD5 [`Fingerprint`] of its content.
//! 2. **Prune**: walk the old tree breadth-first and remove every internal
//!    subtree whose fingerprint also appears in the new tree.
//! 3. **Classify**: match each surviving old node to the first similar new
//!    node (UPDATE) or report it as DELETE; unmatched new nodes are INSERTs.
//!
//! Changes are grouped by type, label and source span in a [`ChangeSet`].
//!
//! ## Usage
//!
//! ```
//! use lopper::{ChangeType, DiffConfig, PlainNode, build_tree, diff};
//!
//! let old = PlainNode::branch(
//!     "class",
//!     [PlainNode::valued("method", "a"), PlainNode::valued("method", "b")],
//! );
//! let new = PlainNode::branch(
//!     "class",
//!     [PlainNode::valued("method", "a"), PlainNode::valued("method", "c")],
//! );
//!
//! let diff = diff(
//!     build_tree(&old).unwrap(),
//!     build_tree(&new).unwrap(),
//!     &DiffConfig::default(),
//! )
//! .unwrap();
//!
//! // the class and `method b` were updated; `method a` is unchanged
//! assert_eq!(diff.changes().count(ChangeType::Update), 2);
//! assert_eq!(diff.changes().count(ChangeType::Insert), 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]

pub use indextree;

mod tracing_macros;

mod change;
mod classify;
mod entity;
mod error;
mod fingerprint;
/// Node matching between the two trees
pub mod matching;
mod prune;
mod similarity;
/// Syntax tree input
pub mod syntax;
/// Labeled, fingerprinted trees
pub mod tree;

pub use change::{ChangeKey, ChangeSet, ChangeType, Occurrence, Occurrences};
pub use classify::{Diff, diff};
pub use entity::{EntityIndex, ResolvedChange, UNKNOWN_ENTITY, resolve};
pub use error::DiffError;
pub use fingerprint::Fingerprint;
pub use matching::{DiffConfig, MatchKind, Matching};
pub use prune::{Pruned, prune};
pub use similarity::{find_similar_counterpart, similarity};
pub use syntax::{PlainNode, Span, SyntaxNode};
pub use tree::{
    BreadthFirst, BuildConfig, LABEL_DELIMITER, NodeData, ROOT_LABEL, Tree, TreeBuilder,
    build_tree, compose_label,
};
