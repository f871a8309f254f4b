use lopper::{BuildConfig, Diff, DiffConfig, ResolvedChange};
use rayon::prelude::*;

use crate::tracing_macros::debug;
use crate::error::JavaError;
use crate::parse::build_tree;

/// A diff between two Java sources, with every change resolved to the kind
/// of syntax entity it touches.
#[derive(Debug)]
pub struct JavaDiff {
    /// Trees, matching and grouped changes.
    pub diff: Diff,
    /// One entry per change group, in report order.
    pub resolved: Vec<ResolvedChange>,
}

/// Diff two Java sources.
pub fn diff_sources(old: &str, new: &str, config: &DiffConfig) -> Result<JavaDiff, JavaError> {
    let build = BuildConfig::default();
    let old_tree = build_tree(old, &build)?;
    let new_tree = build_tree(new, &build)?;
    let diff = lopper::diff(old_tree, new_tree, config)?;
    let resolved = diff.resolve_entities();
    debug!(changes = resolved.len(), "java sources diffed");
    Ok(JavaDiff { diff, resolved })
}

/// Diff many independent `(old, new)` source pairs in parallel.
///
/// Results come back in input order; one failing pair does not affect the
/// others.
pub fn diff_batch<S>(pairs: &[(S, S)], config: &DiffConfig) -> Vec<Result<JavaDiff, JavaError>>
where
    S: AsRef<str> + Sync,
{
    pairs
        .par_iter()
        .map(|(old, new)| diff_sources(old.as_ref(), new.as_ref(), config))
        .collect()
}
