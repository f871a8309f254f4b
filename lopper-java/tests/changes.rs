//! Fixture-driven Java diffs using datatest-stable.
//!
//! Each case in `tests/changes/` has the format:
//! ```
//! <old source>
//! ===
//! <new source>
//! ===
//! <expected changes, one `TYPE entity_type` per line>
//! ```
//!
//! The expectation section is optional. Every case also checks that a source
//! diffed against itself is empty and that every node is accounted for.

use lopper::{ChangeType, Diff, DiffConfig, Occurrence};
use lopper_java::diff_sources;
use std::path::Path;

fn in_group(diff: &Diff, wanted: Occurrence, change_type: ChangeType) -> bool {
    diff.changes()
        .of_type(change_type)
        .any(|(_, occurrences)| occurrences.contains(&wanted))
}

fn check_accounted(diff: &Diff) -> Result<(), String> {
    let old = diff.old_tree();
    for o in old.breadth_first() {
        if !diff.matching().contains_old(o) && !in_group(diff, Occurrence::Old(o), ChangeType::Delete)
        {
            return Err(format!("old node {} is neither matched nor deleted", old.label(o)));
        }
    }
    let new = diff.new_tree();
    for n in new.breadth_first() {
        if !diff.matching().contains_new(n) && !in_group(diff, Occurrence::New(n), ChangeType::Insert)
        {
            return Err(format!("new node {} is neither matched nor inserted", new.label(n)));
        }
    }
    Ok(())
}

fn run_change_case(path: &Path) -> datatest_stable::Result<()> {
    facet_testhelpers::setup();

    let content = std::fs::read_to_string(path)?;
    let parts: Vec<&str> = content.split("\n===\n").collect();

    if !(2..=3).contains(&parts.len()) {
        return Err(format!(
            "Case file must have one or two '===' separators, found {} parts",
            parts.len()
        )
        .into());
    }

    let old = parts[0];
    let new = parts[1];
    let config = DiffConfig::default();

    let unchanged = diff_sources(old, old, &config).map_err(|e| format!("diff failed: {e:?}"))?;
    if !unchanged.diff.changes().is_empty() {
        return Err(format!(
            "Source diffed against itself reported {} change groups",
            unchanged.diff.changes().len()
        )
        .into());
    }

    let result = diff_sources(old, new, &config).map_err(|e| format!("diff failed: {e:?}"))?;
    check_accounted(&result.diff)?;

    let Some(expected) = parts.get(2) else {
        return Ok(());
    };
    let actual: Vec<String> = result
        .resolved
        .iter()
        .map(|change| format!("{} {}", change.change_type, change.entity_type))
        .collect();
    for line in expected.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if !actual.iter().any(|a| a == line) {
            return Err(format!("Missing change: {line}\nActual: {actual:#?}").into());
        }
    }

    Ok(())
}

datatest_stable::harness! {
    { test = run_change_case, root = "tests/changes", pattern = r".*\.case$" },
}
