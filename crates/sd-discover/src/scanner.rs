//! Catalog scanner: first-level dependencies of every routine and view.

use crate::error::DiscoverResult;
use crate::filter::ObjectFilter;
use sd_core::{CachedDependency, DependencyType, ProcedureDependencies};
use sd_db::{Catalog, CatalogObject, ObjectKind};

/// Collect the catalog-recorded dependencies of every routine and view that
/// the filter keeps.
///
/// Table and view dependencies carry their column metadata; function
/// dependencies carry their definition. Any catalog failure aborts the scan.
pub async fn scan_dependencies(
    catalog: &dyn Catalog,
    filter: &ObjectFilter,
) -> DiscoverResult<Vec<ProcedureDependencies>> {
    let mut subjects: Vec<CatalogObject> = catalog.list_routines().await?;
    subjects.extend(catalog.list_objects(ObjectKind::View).await?);

    let mut entries = Vec::new();
    for subject in subjects {
        if filter.is_excluded(&subject.name) {
            log::debug!("Skipping excluded object {}", subject.name);
            continue;
        }

        let referenced = catalog.referenced_objects(&subject.name).await?;
        let mut dependencies = Vec::with_capacity(referenced.len());
        for object in referenced {
            let mut dependency = CachedDependency::new(object.name, object.dependency_type);
            match object.dependency_type {
                DependencyType::Table | DependencyType::View => {
                    dependency.columns = Some(catalog.columns(&dependency.name).await?);
                }
                DependencyType::Function => {
                    dependency.definition = catalog.object_definition(&dependency.name).await?;
                }
                _ => {}
            }
            dependencies.push(dependency);
        }

        log::info!(
            "Processed {} with {} dependencies",
            subject.name,
            dependencies.len()
        );
        entries.push(ProcedureDependencies {
            name: subject.name,
            dependencies,
        });
    }

    Ok(entries)
}

#[cfg(test)]
#[path = "scanner_test.rs"]
mod tests;
