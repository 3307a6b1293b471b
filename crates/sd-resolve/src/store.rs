//! In-memory index over the two discovery caches.
//!
//! Every lookup goes through [`ObjectName::canonical_key`], so `[dbo].[Orders]`,
//! `dbo.orders` and `"dbo"."Orders"` all find the same entry.

use crate::error::ResolveResult;
use sd_core::{CacheFiles, CachedDependency, ColumnInfo, ObjectName, ObjectScript, ProcedureDependencies};
use std::collections::HashMap;

/// Read-only view of a cache snapshot.
#[derive(Debug, Default)]
pub struct DependencyStore {
    routines: Vec<ObjectName>,
    dependencies: HashMap<String, Vec<CachedDependency>>,
    scripts: HashMap<String, ObjectScript>,
    columns: HashMap<String, Vec<ColumnInfo>>,
}

impl DependencyStore {
    /// Load both cache files.
    ///
    /// Fails if either file is missing or malformed.
    pub fn load(cache: &CacheFiles) -> ResolveResult<Self> {
        let procedures = cache.read_procedure_dependencies()?;
        let scripts = cache.read_object_scripts()?;
        log::debug!(
            "Loaded {} routine entries and {} create scripts from {}",
            procedures.len(),
            scripts.len(),
            cache.dir().display()
        );
        Ok(Self::from_parts(procedures, scripts))
    }

    /// Index already decoded cache contents.
    ///
    /// When a name occurs more than once the first entry wins.
    pub fn from_parts(procedures: Vec<ProcedureDependencies>, scripts: Vec<ObjectScript>) -> Self {
        let mut store = Self::default();

        for entry in procedures {
            for dependency in &entry.dependencies {
                if let Some(columns) = &dependency.columns {
                    store
                        .columns
                        .entry(dependency.name.canonical_key())
                        .or_insert_with(|| columns.clone());
                }
            }
            let key = entry.name.canonical_key();
            if !store.dependencies.contains_key(&key) {
                store.routines.push(entry.name);
                store.dependencies.insert(key, entry.dependencies);
            }
        }

        for script in scripts {
            store
                .scripts
                .entry(script.name.canonical_key())
                .or_insert(script);
        }

        store
    }

    /// Routines and views with a dependency entry, in cache order.
    pub fn routines(&self) -> &[ObjectName] {
        &self.routines
    }

    /// Whether `name` has a dependency entry or a create script.
    pub fn contains(&self, name: &ObjectName) -> bool {
        let key = name.canonical_key();
        self.dependencies.contains_key(&key) || self.scripts.contains_key(&key)
    }

    /// First-level dependencies recorded for `name`.
    pub fn dependencies(&self, name: &ObjectName) -> Option<&[CachedDependency]> {
        self.dependencies
            .get(&name.canonical_key())
            .map(Vec::as_slice)
    }

    /// Cached create script of `name`.
    pub fn script(&self, name: &ObjectName) -> Option<&ObjectScript> {
        self.scripts.get(&name.canonical_key())
    }

    /// Column metadata of `name` from any dependency entry that carried it.
    pub fn columns(&self, name: &ObjectName) -> Option<&[ColumnInfo]> {
        self.columns.get(&name.canonical_key()).map(Vec::as_slice)
    }

    pub fn script_count(&self) -> usize {
        self.scripts.len()
    }
}
