use lopper::{BuildConfig, Tree, TreeBuilder};
use tree_sitter::Parser;

use crate::tracing_macros::debug;
use crate::error::JavaError;
use crate::syntax::JavaSyntax;

/// Parse Java source with tree-sitter.
///
/// Syntax errors do not fail the parse; tree-sitter recovers and marks them
/// with `ERROR` nodes, which then diff like any other node.
pub fn parse(source: &str) -> Result<tree_sitter::Tree, JavaError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_java::language())
        .map_err(|_| JavaError::LanguageUnavailable)?;
    let tree = parser.parse(source, None).ok_or(JavaError::NoTree)?;
    if tree.root_node().has_error() {
        debug!(bytes = source.len(), "source has syntax errors");
    }
    Ok(tree)
}

/// Parse `source` and build its labeled, fingerprinted tree.
pub fn build_tree(source: &str, config: &BuildConfig) -> Result<Tree, JavaError> {
    let parsed = parse(source)?;
    let syntax = JavaSyntax::new(parsed.root_node(), source);
    Ok(TreeBuilder::new(config.clone()).build(syntax)?)
}
