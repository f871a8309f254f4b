//! The contract a parser must satisfy for its output to be diffed.
//!
//! lopper never parses source text itself. Any concrete or abstract syntax
//! tree can be fed to [`TreeBuilder`](crate::TreeBuilder) as long as its nodes
//! implement [`SyntaxNode`]. [`PlainNode`] is a small owned implementation for
//! callers that assemble trees by hand.

use std::borrow::Cow;

use facet::Facet;

/// Byte range of a node in its source file. `end = start + length`.
#[derive(Facet, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Span {
    /// Offset of the first byte
    pub start: usize,
    /// Offset one past the last byte
    pub end: usize,
}

impl Span {
    /// Create a span from start and end offsets.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of bytes covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl core::fmt::Display for Span {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A node of an externally produced syntax tree.
///
/// Implementations are usually cheap handles (`Copy` references into a
/// parser-owned tree), since the builder clones nothing but asks for children
/// by value.
pub trait SyntaxNode: Sized {
    /// Stable structural kind, e.g. `method_declaration`. Must not be empty.
    fn kind(&self) -> &str;

    /// Discriminant for value-carrying kinds (operator, literal, identifier,
    /// declared name). `None` for everything else.
    fn value(&self) -> Option<Cow<'_, str>>;

    /// Byte range of this node in the source.
    fn span(&self) -> Span;

    /// Source text covered by [`span`](Self::span).
    fn source_text(&self) -> Cow<'_, str>;

    /// Children in source order.
    fn children(&self) -> impl Iterator<Item = Self> + '_;

    /// Pass-through nodes are not materialized; their children attach to the
    /// nearest materialized ancestor instead.
    fn is_pass_through(&self) -> bool {
        false
    }
}

/// Owned syntax node for trees assembled by hand.
///
/// A leaf's text is its value (or its kind when it has none); a branch's text
/// is the text of its children joined by single spaces. Spans are zero until
/// [`laid_out`](Self::laid_out) assigns contiguous offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainNode {
    kind: String,
    value: Option<String>,
    text: String,
    span: Span,
    pass_through: bool,
    children: Vec<PlainNode>,
}

impl PlainNode {
    /// A childless node without a value.
    pub fn leaf(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        Self {
            text: kind.clone(),
            kind,
            value: None,
            span: Span::default(),
            pass_through: false,
            children: Vec::new(),
        }
    }

    /// A childless node carrying a value, e.g. an identifier.
    pub fn valued(kind: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            kind: kind.into(),
            text: value.clone(),
            value: Some(value),
            span: Span::default(),
            pass_through: false,
            children: Vec::new(),
        }
    }

    /// A node with children.
    pub fn branch(kind: impl Into<String>, children: impl IntoIterator<Item = PlainNode>) -> Self {
        let children: Vec<PlainNode> = children.into_iter().collect();
        let text = children
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            kind: kind.into(),
            value: None,
            text,
            span: Span::default(),
            pass_through: false,
            children,
        }
    }

    /// Attach a value to this node.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Override the source text of this node.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Override the span of this node.
    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.span = Span::new(start, end);
        self
    }

    /// Mark this node as pass-through.
    pub fn elided(mut self) -> Self {
        self.pass_through = true;
        self
    }

    /// Assign contiguous spans to the whole subtree, starting at offset 0.
    pub fn laid_out(mut self) -> Self {
        self.layout(0);
        self
    }

    fn layout(&mut self, start: usize) -> usize {
        if self.children.is_empty() {
            self.span = Span::new(start, start + self.text.len());
            return self.span.end;
        }
        let mut cursor = start;
        for (i, child) in self.children.iter_mut().enumerate() {
            if i > 0 {
                cursor += 1;
            }
            cursor = child.layout(cursor);
        }
        self.span = Span::new(start, cursor);
        cursor
    }

    /// Children of this node.
    pub fn child_nodes(&self) -> &[PlainNode] {
        &self.children
    }

    /// Text of this node.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl<'a> SyntaxNode for &'a PlainNode {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn value(&self) -> Option<Cow<'_, str>> {
        self.value.as_deref().map(Cow::Borrowed)
    }

    fn span(&self) -> Span {
        self.span
    }

    fn source_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.text)
    }

    fn children(&self) -> impl Iterator<Item = Self> + '_ {
        let node: &'a PlainNode = *self;
        node.children.iter()
    }

    fn is_pass_through(&self) -> bool {
        self.pass_through
    }
}
