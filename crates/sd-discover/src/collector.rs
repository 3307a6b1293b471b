//! Create-script collection for every catalog object.

use crate::error::DiscoverResult;
use crate::filter::ObjectFilter;
use sd_core::{ObjectName, ObjectScript, ObjectType};
use sd_db::{Catalog, DbError, DbResult, ObjectKind};

/// Collect create scripts for tables, views, functions, procedures and
/// triggers, in that order.
///
/// Listing failures and lost connections abort collection. Any other
/// failure while scripting a single object is logged and that object is
/// left out; so is an object whose definition the catalog cannot return.
pub async fn collect_scripts(
    catalog: &dyn Catalog,
    filter: &ObjectFilter,
) -> DiscoverResult<Vec<ObjectScript>> {
    let mut scripts = Vec::new();

    for kind in ObjectKind::ALL {
        let objects = catalog.list_objects(kind).await?;
        let mut collected = 0usize;
        for object in objects {
            if filter.is_excluded(&object.name) {
                continue;
            }
            let result = if object.object_type == ObjectType::Table {
                table_script(catalog, &object.name).await.map(Some)
            } else {
                catalog.object_definition(&object.name).await
            };
            match result {
                Ok(Some(definition)) => {
                    scripts.push(ObjectScript {
                        name: object.name,
                        object_type: object.object_type,
                        definition,
                    });
                    collected += 1;
                }
                Ok(None) => log::debug!("No definition available for {}", object.name),
                Err(e @ DbError::ConnectionError(_)) => return Err(e.into()),
                Err(e) => log::warn!("Failed to script {}: {e}", object.name),
            }
        }
        log::info!("Collected {collected} {kind:?} scripts");
    }

    Ok(scripts)
}

/// Full table DDL from the engine's helper, or reconstructed from metadata.
pub async fn table_script(catalog: &dyn Catalog, name: &ObjectName) -> DbResult<String> {
    if let Some(ddl) = catalog.full_table_ddl(name).await? {
        return Ok(ddl);
    }
    let metadata = catalog.table_metadata(name).await?;
    Ok(sd_sql::render_table_ddl(&metadata))
}

#[cfg(test)]
#[path = "collector_test.rs"]
mod tests;
