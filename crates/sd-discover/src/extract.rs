//! Routine extraction: comment-free routine bodies written to disk.

use crate::error::{DiscoverError, DiscoverResult};
use crate::filter::ObjectFilter;
use sd_core::ObjectName;
use sd_db::Catalog;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Where extracted routines go.
#[derive(Debug, Clone)]
pub struct ExtractTargets {
    /// Receives `<routine>/<routine>.sql`
    pub sql_raw_dir: PathBuf,
    /// Receives an empty `<routine>/` per routine for later analysis output
    pub analysis_dir: PathBuf,
}

/// One written routine.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedRoutine {
    pub name: ObjectName,
    pub path: PathBuf,
}

/// Write the definition of each selected routine with comments removed.
///
/// An empty `selection` means every routine the filter keeps. Selected names
/// without a schema are matched under the catalog's default schema. Routines
/// without a retrievable definition are skipped with a warning.
pub async fn extract_routines(
    catalog: &dyn Catalog,
    filter: &ObjectFilter,
    selection: &[ObjectName],
    targets: &ExtractTargets,
) -> DiscoverResult<Vec<ExtractedRoutine>> {
    let default_schema = catalog.default_schema();
    let mut wanted: HashSet<String> = selection
        .iter()
        .map(|n| n.with_default_schema(default_schema).canonical_key())
        .collect();

    let mut extracted = Vec::new();
    for routine in catalog.list_routines().await? {
        if filter.is_excluded(&routine.name) {
            continue;
        }
        let key = routine.name.with_default_schema(default_schema).canonical_key();
        if !selection.is_empty() && !wanted.remove(&key) {
            continue;
        }

        let Some(definition) = catalog.object_definition(&routine.name).await? else {
            log::warn!("No definition found for {}, skipping", routine.name);
            continue;
        };
        let body = match sd_sql::strip_comments(&definition) {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Keeping comments in {}: {e}", routine.name);
                definition.trim().to_string()
            }
        };

        let path = write_routine(&routine.name, &body, targets)?;
        log::info!("Extracted {} to {}", routine.name, path.display());
        extracted.push(ExtractedRoutine {
            name: routine.name,
            path,
        });
    }

    let mut missing: Vec<_> = wanted.into_iter().collect();
    missing.sort();
    for name in missing {
        log::warn!("Routine {name} not found in catalog");
    }

    Ok(extracted)
}

fn write_routine(
    name: &ObjectName,
    body: &str,
    targets: &ExtractTargets,
) -> DiscoverResult<PathBuf> {
    let routine = name.to_string();
    let sql_dir = targets.sql_raw_dir.join(&routine);
    create_dir(&sql_dir)?;
    create_dir(&targets.analysis_dir.join(&routine))?;

    let path = sql_dir.join(format!("{routine}.sql"));
    std::fs::write(&path, body).map_err(|e| DiscoverError::Write {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(path)
}

fn create_dir(dir: &Path) -> DiscoverResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| DiscoverError::Write {
        path: dir.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
