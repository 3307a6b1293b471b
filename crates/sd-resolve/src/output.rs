//! Dependency tree persistence and text summaries.

use crate::error::{ResolveError, ResolveResult};
use sd_core::{DependencyRecord, ObjectName};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// `<analysis_dir>/<routine>/<routine>_dependency_tree.json`
pub fn dependency_tree_path(analysis_dir: &Path, routine: &ObjectName) -> PathBuf {
    let routine = routine.to_string();
    analysis_dir
        .join(&routine)
        .join(format!("{routine}_dependency_tree.json"))
}

/// Serialize records as pretty JSON.
pub fn to_json(records: &[DependencyRecord]) -> ResolveResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Write the dependency tree of `routine`, creating directories as needed.
pub fn write_dependency_tree(
    analysis_dir: &Path,
    routine: &ObjectName,
    records: &[DependencyRecord],
) -> ResolveResult<PathBuf> {
    let path = dependency_tree_path(analysis_dir, routine);
    let write_err = |source| ResolveError::Write {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(&path, to_json(records)?).map_err(write_err)?;
    log::info!("Wrote dependency tree to {}", path.display());
    Ok(path)
}

/// One line per record, nested view dependencies indented.
pub fn format_summary(records: &[DependencyRecord]) -> String {
    let mut out = String::new();
    write_summary(&mut out, records, 0);
    out
}

fn write_summary(out: &mut String, records: &[DependencyRecord], depth: usize) {
    let indent = "  ".repeat(depth);
    for (i, record) in records.iter().enumerate() {
        let enforced = if record.has_enforced_dependencies {
            "enforced"
        } else {
            "not enforced"
        };
        let auto = if record.auto_populated_columns.is_empty() {
            "none".to_string()
        } else {
            record
                .auto_populated_columns
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let _ = writeln!(
            out,
            "{indent}{}. {} [{}] schema: {}, {}, auto-populated: {}",
            i + 1,
            record.name,
            record.dependency_type,
            record.schema_name.as_deref().unwrap_or("N/A"),
            enforced,
            auto
        );
        if let Some(nested) = &record.view_dependencies {
            write_summary(out, nested, depth + 1);
        }
    }
}
