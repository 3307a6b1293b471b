//! sd-discover - Discovery pass for sqldeps
//!
//! Reads a live catalog once and produces the two caches every later
//! resolution works from: first-level routine dependencies and object
//! create scripts. Also extracts routine bodies to disk.

pub mod collector;
pub mod error;
pub mod extract;
pub mod filter;
pub mod scanner;

#[cfg(test)]
pub(crate) mod test_utils;

pub use collector::{collect_scripts, table_script};
pub use error::{DiscoverError, DiscoverResult};
pub use extract::{extract_routines, ExtractTargets, ExtractedRoutine};
pub use filter::ObjectFilter;
pub use scanner::scan_dependencies;

use sd_core::{CacheFiles, ObjectScript, ProcedureDependencies};
use sd_db::Catalog;

/// Everything one discovery pass produces.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOutput {
    pub procedures: Vec<ProcedureDependencies>,
    pub scripts: Vec<ObjectScript>,
}

impl DiscoveryOutput {
    /// Persist both caches.
    pub fn write(&self, cache: &CacheFiles) -> DiscoverResult<()> {
        cache.write(&self.procedures, &self.scripts)?;
        Ok(())
    }
}

/// Scan dependencies, then collect create scripts.
pub async fn discover(
    catalog: &dyn Catalog,
    filter: &ObjectFilter,
) -> DiscoverResult<DiscoveryOutput> {
    log::info!("Discovering dependencies via {}", catalog.backend_name());
    let procedures = scan_dependencies(catalog, filter).await?;
    let scripts = collect_scripts(catalog, filter).await?;
    Ok(DiscoveryOutput {
        procedures,
        scripts,
    })
}
