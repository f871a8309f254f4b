//! [`SyntaxNode`] over tree-sitter's Java grammar.

use std::borrow::Cow;

use lopper::{Span, SyntaxNode};
use tree_sitter::Node;

/// Statement wrappers that add nothing but a trailing `;`. Their expression
/// takes their place in the tree.
const PASS_THROUGH: &[&str] = &["expression_statement"];

/// Qualified names and string literals are compared as a whole.
const OPAQUE: &[&str] = &["scoped_identifier", "scoped_type_identifier", "string_literal"];

/// Kinds whose label carries their own source text.
const TEXT_VALUED: &[&str] = &[
    "identifier",
    "type_identifier",
    "scoped_identifier",
    "scoped_type_identifier",
    "integral_type",
    "floating_point_type",
    "boolean_type",
    "void_type",
    "modifiers",
    "true",
    "false",
    "character_literal",
    "string_literal",
    "decimal_integer_literal",
    "hex_integer_literal",
    "octal_integer_literal",
    "binary_integer_literal",
    "decimal_floating_point_literal",
    "hex_floating_point_literal",
];

/// A tree-sitter Java node together with the source it was parsed from.
///
/// Only named, non-extra children are visited, so punctuation and comments
/// never reach the diff.
#[derive(Debug, Clone, Copy)]
pub struct JavaSyntax<'a> {
    node: Node<'a>,
    source: &'a str,
}

impl<'a> JavaSyntax<'a> {
    /// Wrap `node`, which must come from a tree parsed from `source`.
    pub fn new(node: Node<'a>, source: &'a str) -> Self {
        Self { node, source }
    }

    /// The wrapped tree-sitter node.
    pub fn node(&self) -> Node<'a> {
        self.node
    }

    fn text(&self, node: Node<'a>) -> &'a str {
        self.source
            .get(node.start_byte()..node.end_byte())
            .unwrap_or_default()
    }

    fn is_opaque(&self) -> bool {
        OPAQUE.contains(&self.node.kind())
    }

    fn field_text(&self, field: &str) -> Option<&'a str> {
        self.node
            .child_by_field_name(field)
            .map(|child| self.text(child))
    }

    fn operator(&self) -> Option<&'a str> {
        self.node
            .child_by_field_name("operator")
            .map(|child| child.kind())
    }

    /// Leaf tokens of `self.node` joined by single spaces, comments skipped.
    ///
    /// Layout never reaches a fingerprint this way: reformatting or commenting
    /// a subtree leaves its rendering unchanged.
    fn normalized_text(&self) -> String {
        let mut out = String::new();
        let mut cursor = self.node.walk();
        let mut descend = true;
        loop {
            let node = cursor.node();
            if descend && !node.is_extra() {
                if node.child_count() == 0 {
                    let token = self.text(node);
                    if !token.is_empty() {
                        if !out.is_empty() {
                            out.push(' ');
                        }
                        out.push_str(token);
                    }
                } else if cursor.goto_first_child() {
                    continue;
                }
            }
            if cursor.goto_next_sibling() {
                descend = true;
                continue;
            }
            if !cursor.goto_parent() {
                break;
            }
            descend = false;
        }
        out
    }

    /// `++x` and `x++` share a kind; the operator position tells them apart.
    fn update_operator(&self) -> Option<String> {
        let first = self.node.child(0)?;
        if !first.is_named() {
            return Some(format!("prefix {}", first.kind()));
        }
        let last = self.node.child(self.node.child_count().checked_sub(1)?)?;
        Some(format!("postfix {}", last.kind()))
    }
}

impl<'a> SyntaxNode for JavaSyntax<'a> {
    fn kind(&self) -> &str {
        self.node.kind()
    }

    fn value(&self) -> Option<Cow<'_, str>> {
        let kind = self.node.kind();
        match kind {
            "assignment_expression" | "binary_expression" | "unary_expression" => {
                self.operator().map(Cow::Borrowed)
            }
            "update_expression" => self.update_operator().map(Cow::Owned),
            "method_invocation" | "variable_declarator" => {
                self.field_text("name").map(Cow::Borrowed)
            }
            _ if TEXT_VALUED.contains(&kind) => Some(Cow::Borrowed(self.text(self.node))),
            _ => None,
        }
    }

    fn span(&self) -> Span {
        Span::new(self.node.start_byte(), self.node.end_byte())
    }

    fn source_text(&self) -> Cow<'_, str> {
        Cow::Owned(self.normalized_text())
    }

    fn children(&self) -> impl Iterator<Item = Self> + '_ {
        let mut kids = Vec::new();
        if !self.is_opaque() {
            let mut cursor = self.node.walk();
            kids.extend(
                self.node
                    .named_children(&mut cursor)
                    .filter(|child| !child.is_extra())
                    .map(|child| JavaSyntax::new(child, self.source)),
            );
        }
        kids.into_iter()
    }

    fn is_pass_through(&self) -> bool {
        PASS_THROUGH.contains(&self.node.kind())
    }
}
