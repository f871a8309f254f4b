//! Arena-backed tree of labeled syntax nodes.
//!
//! Nodes live in an [`indextree::Arena`] and refer to each other through
//! [`NodeId`] handles, so "same parent" checks are handle comparisons and no
//! ownership cycles exist. Pruning detaches subtrees from their parent but
//! never frees them: detached nodes stay addressable for reporting.

use core::fmt;
use std::collections::VecDeque;

use indextree::{Arena, NodeId};

use crate::error::DiffError;
use crate::fingerprint::{ChildDigest, Fingerprint};
use crate::syntax::{Span, SyntaxNode};
use crate::tracing_macros::{debug, trace};

/// Separator between a node's kind and its discriminant value in a label.
pub const LABEL_DELIMITER: &str = "|#|";

/// Label of the synthetic root node.
pub const ROOT_LABEL: &str = "root";

/// Compose the structural label of a node from its kind and optional value.
pub fn compose_label(kind: &str, value: Option<&str>) -> String {
    match value {
        Some(value) => {
            let mut label =
                String::with_capacity(kind.len() + LABEL_DELIMITER.len() + value.len());
            label.push_str(kind);
            label.push_str(LABEL_DELIMITER);
            label.push_str(value);
            label
        }
        None => kind.to_owned(),
    }
}

/// Data stored for each node of a [`Tree`].
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Kind plus optional discriminant value; the unit of equality.
    pub label: String,
    /// Bare syntactic kind.
    pub kind: String,
    /// Source location. Never used for identity.
    pub span: Span,
    /// Content digest, set once when the node's subtree is complete.
    pub fingerprint: Option<Fingerprint>,
}

impl NodeData {
    /// Create node data for a syntax construct.
    pub fn new(kind: impl Into<String>, value: Option<&str>, span: Span) -> Self {
        let kind = kind.into();
        Self {
            label: compose_label(&kind, value),
            kind,
            span,
            fingerprint: None,
        }
    }

    fn root() -> Self {
        Self {
            label: ROOT_LABEL.to_owned(),
            kind: ROOT_LABEL.to_owned(),
            span: Span::default(),
            fingerprint: None,
        }
    }
}

/// An ordered tree under a synthetic root.
///
/// The root carries [`ROOT_LABEL`], has no fingerprint, and is never matched,
/// pruned or classified. Its children are the top-level parse units.
#[derive(Debug, Clone)]
pub struct Tree {
    arena: Arena<NodeData>,
    root: NodeId,
    /// Every non-root node in creation order, attached or not.
    nodes: Vec<NodeId>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create a tree holding only the synthetic root.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeData::root());
        Self {
            arena,
            root,
            nodes: Vec::new(),
        }
    }

    /// The synthetic root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether `id` is the synthetic root.
    pub fn is_root(&self, id: NodeId) -> bool {
        id == self.root
    }

    /// Number of non-root nodes ever added, including detached ones.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Every non-root node in creation order, including detached ones.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// Data of a node.
    pub fn get(&self, id: NodeId) -> &NodeData {
        self.arena[id].get()
    }

    /// Label of a node.
    pub fn label(&self, id: NodeId) -> &str {
        &self.get(id).label
    }

    /// Bare kind of a node.
    pub fn kind(&self, id: NodeId) -> &str {
        &self.get(id).kind
    }

    /// Source span of a node.
    pub fn span(&self, id: NodeId) -> Span {
        self.get(id).span
    }

    /// Fingerprint of a node; an error if it was never computed.
    pub fn fingerprint(&self, id: NodeId) -> Result<Fingerprint, DiffError> {
        let data = self.get(id);
        data.fingerprint
            .ok_or_else(|| DiffError::MissingFingerprint {
                label: data.label.clone(),
            })
    }

    /// Parent of a node; `None` for the root and for detached subtree tops.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].parent()
    }

    /// Children of a node in source order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    /// Number of (currently attached) children.
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    /// Whether a node currently has no children.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.arena[id].first_child().is_none()
    }

    /// Whether a node is still reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        id.ancestors(&self.arena).any(|a| a == self.root)
    }

    /// Breadth-first traversal of attached nodes, root excluded.
    pub fn breadth_first(&self) -> BreadthFirst<'_> {
        BreadthFirst {
            tree: self,
            queue: self.children(self.root).collect(),
        }
    }

    /// Append a node as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = self.arena.new_node(data);
        parent.append(id, &mut self.arena);
        self.nodes.push(id);
        id
    }

    /// Detach a subtree from its parent. The nodes stay in the arena.
    pub(crate) fn detach(&mut self, id: NodeId) {
        id.detach(&mut self.arena);
    }

    /// Set a node's fingerprint. A fingerprint never changes once set: a
    /// second call keeps the first value and returns `false`.
    pub(crate) fn set_fingerprint(&mut self, id: NodeId, fingerprint: Fingerprint) -> bool {
        let slot = &mut self.arena[id].get_mut().fingerprint;
        if slot.is_some() {
            return false;
        }
        *slot = Some(fingerprint);
        true
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{ROOT_LABEL}")?;
        let mut stack: Vec<(NodeId, usize)> =
            self.children(self.root).map(|c| (c, 1)).collect();
        stack.reverse();
        while let Some((id, depth)) = stack.pop() {
            let data = self.get(id);
            let short = data
                .fingerprint
                .map(|fp| fp.to_hex()[..8].to_owned())
                .unwrap_or_else(|| "--------".to_owned());
            writeln!(
                f,
                "{:indent$}{} [{}] {}",
                "",
                data.label,
                short,
                data.span,
                indent = depth * 2
            )?;
            let first = stack.len();
            stack.extend(self.children(id).map(|c| (c, depth + 1)));
            stack[first..].reverse();
        }
        Ok(())
    }
}

/// Breadth-first iterator over the attached nodes of a [`Tree`].
pub struct BreadthFirst<'a> {
    tree: &'a Tree,
    queue: VecDeque<NodeId>,
}

impl Iterator for BreadthFirst<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.queue.pop_front()?;
        self.queue.extend(self.tree.children(id));
        Some(id)
    }
}

/// Limits applied while building a tree.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Maximum syntax depth. Exceeding it aborts the build, which also
    /// catches syntax providers that hand out cycles.
    pub max_depth: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self { max_depth: 4096 }
    }
}

/// Builds a fingerprinted [`Tree`] from any [`SyntaxNode`].
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    config: BuildConfig,
}

enum Step<S> {
    Enter(S, usize),
    Exit(S),
}

struct Frame {
    id: NodeId,
    digest: ChildDigest,
}

impl TreeBuilder {
    /// Create a builder with the given limits.
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Walk `syntax` depth-first and build the tree.
    ///
    /// Enter creates the node and attaches it as the last child of the open
    /// parent; exit fingerprints it and feeds its source text to the parent.
    /// Pass-through nodes are skipped and their children hoisted.
    pub fn build<S: SyntaxNode>(&self, syntax: S) -> Result<Tree, DiffError> {
        let mut tree = Tree::new();
        let mut open = vec![Frame {
            id: tree.root,
            digest: ChildDigest::default(),
        }];
        let mut work = vec![Step::Enter(syntax, 0)];

        while let Some(step) = work.pop() {
            match step {
                Step::Enter(node, depth) => {
                    if depth > self.config.max_depth {
                        return Err(DiffError::DepthLimitExceeded {
                            limit: self.config.max_depth,
                        });
                    }
                    let children: Vec<S> = node.children().collect();

                    if node.is_pass_through() {
                        trace!(kind = node.kind(), "pass-through, hoisting children");
                        work.extend(children.into_iter().rev().map(|c| Step::Enter(c, depth + 1)));
                        continue;
                    }

                    let kind = node.kind();
                    if kind.is_empty() {
                        return Err(DiffError::MissingLabel {
                            offset: node.span().start,
                        });
                    }
                    let data = NodeData::new(kind, node.value().as_deref(), node.span());
                    let parent = open.last().map_or(tree.root, |frame| frame.id);
                    let id = tree.add_child(parent, data);
                    open.push(Frame {
                        id,
                        digest: ChildDigest::default(),
                    });

                    work.push(Step::Exit(node));
                    work.extend(children.into_iter().rev().map(|c| Step::Enter(c, depth + 1)));
                }
                Step::Exit(node) => {
                    let Some(frame) = open.pop() else {
                        break;
                    };
                    let fingerprint = frame.digest.finish(tree.label(frame.id));
                    trace!(label = tree.label(frame.id), %fingerprint, "fingerprinted");
                    tree.set_fingerprint(frame.id, fingerprint);

                    // The root frame sits at the bottom and is never hashed.
                    if open.len() > 1
                        && let Some(parent) = open.last_mut()
                    {
                        parent.digest.feed(&node.source_text());
                    }
                }
            }
        }

        debug!(nodes = tree.node_count(), "tree built");
        Ok(tree)
    }
}

/// Build a tree with the default [`BuildConfig`].
pub fn build_tree<S: SyntaxNode>(syntax: S) -> Result<Tree, DiffError> {
    TreeBuilder::default().build(syntax)
}
