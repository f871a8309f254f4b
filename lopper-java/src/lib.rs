//! # lopper-java
//!
//! Java front end for [`lopper`]: parses sources with tree-sitter, builds
//! labeled trees and diffs them.
//!
//! ```
//! use lopper::{ChangeType, DiffConfig};
//!
//! let old = "class Foo { void a() { x = 1; } }";
//! let new = "class Foo { void a() { x = 1; } void b() { y = 2; } }";
//!
//! let diff = lopper_java::diff_sources(old, new, &DiffConfig::default()).unwrap();
//! assert!(diff.resolved.iter().any(|change| {
//!     change.change_type == ChangeType::Insert && change.entity_type == "method_declaration"
//! }));
//! assert_eq!(diff.diff.changes().count(ChangeType::Delete), 0);
//! ```

#![warn(missing_docs)]

mod tracing_macros;

mod diff;
mod error;
mod parse;
mod syntax;

pub use diff::{JavaDiff, diff_batch, diff_sources};
pub use error::JavaError;
pub use parse::{build_tree, parse};
pub use syntax::JavaSyntax;
