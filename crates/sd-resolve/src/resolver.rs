//! Recursive dependency resolution.
//!
//! A routine's tree is built from two sources. Formal dependencies come
//! from the catalog scan and are listed first, in cache order. Heuristic
//! references found in the routine's own script follow, skipping any whose
//! trailing name is already present. Views recurse through the same
//! visited set, which bounds the walk to one expansion per object and makes
//! cycles terminate.

use crate::autopop::classify_columns;
use crate::error::{ResolveError, ResolveResult};
use crate::store::DependencyStore;
use sd_core::{
    CachedDependency, ColumnInfo, DependencyRecord, DependencyType, ObjectName, ObjectScript,
};
use sd_sql::{has_enforced_dependencies, strip_comments, PatternReferenceExtractor, ReferenceExtractor};
use std::collections::HashSet;

/// Builds dependency trees from a cache snapshot.
pub struct Resolver {
    store: DependencyStore,
    extractor: Box<dyn ReferenceExtractor>,
    default_schema: String,
}

impl Resolver {
    /// Resolver using the keyword-pattern reference extractor.
    pub fn new(store: DependencyStore, default_schema: impl Into<String>) -> Self {
        Self {
            store,
            extractor: Box::new(PatternReferenceExtractor),
            default_schema: default_schema.into(),
        }
    }

    /// Replace the heuristic reference extractor.
    pub fn with_extractor(mut self, extractor: impl ReferenceExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn store(&self) -> &DependencyStore {
        &self.store
    }

    /// Resolve a top-level routine with a fresh visited set.
    pub fn resolve_routine(&self, routine: &ObjectName) -> ResolveResult<Vec<DependencyRecord>> {
        if self.find(routine, |n| self.store.contains(n).then_some(())).is_none() {
            return Err(ResolveError::UnknownRoutine {
                name: routine.to_string(),
            });
        }
        let mut visited = HashSet::new();
        let records = self.resolve(routine, &mut visited);
        log::info!(
            "Resolved {} dependencies of {} ({} objects visited)",
            records.len(),
            routine,
            visited.len()
        );
        Ok(records)
    }

    /// Resolve `routine`, recording every expanded name in `visited`.
    ///
    /// Returns an empty list if `routine` was already expanded.
    pub fn resolve(
        &self,
        routine: &ObjectName,
        visited: &mut HashSet<String>,
    ) -> Vec<DependencyRecord> {
        let key = routine.with_default_schema(&self.default_schema).canonical_key();
        if !visited.insert(key) {
            log::debug!("{routine} already resolved, skipping");
            return Vec::new();
        }

        let mut records: Vec<DependencyRecord> = self
            .find(routine, |n| self.store.dependencies(n))
            .unwrap_or_default()
            .iter()
            .map(|dependency| self.formal_record(dependency, visited))
            .collect();

        if let Some(script) = self.find(routine, |n| self.store.script(n)) {
            let text = strip_comments(&script.definition).unwrap_or_else(|e| {
                log::debug!("Scanning raw script of {routine}: {e}");
                script.definition.clone()
            });
            let mut seen: HashSet<String> = records.iter().map(|r| r.name.to_lowercase()).collect();
            for reference in self.extractor.extract(&text) {
                if seen.insert(reference.trailing_key()) {
                    records.push(self.referenced_record(&reference, visited));
                }
            }
        }

        records
    }

    fn formal_record(
        &self,
        dependency: &CachedDependency,
        visited: &mut HashSet<String>,
    ) -> DependencyRecord {
        let name = &dependency.name;
        let mut record = DependencyRecord::new(name, dependency.dependency_type);

        let script = self
            .find(name, |n| self.store.script(n))
            .map(|s| s.definition.clone())
            .or_else(|| dependency.definition.clone());
        let columns = dependency
            .columns
            .as_deref()
            .or_else(|| self.find(name, |n| self.store.columns(n)));
        enrich(&mut record, name, script, columns);

        if dependency.dependency_type == DependencyType::View {
            record.view_dependencies = Some(self.resolve(name, visited));
        }
        record
    }

    fn referenced_record(
        &self,
        reference: &ObjectName,
        visited: &mut HashSet<String>,
    ) -> DependencyRecord {
        let script: Option<&ObjectScript> = self.find(reference, |n| self.store.script(n));
        let (name, dependency_type) = match script {
            Some(script) => (&script.name, script.object_type.dependency_type()),
            None => (reference, DependencyType::Referenced),
        };
        let mut record = DependencyRecord::new(name, dependency_type);

        let columns = self.find(name, |n| self.store.columns(n));
        enrich(&mut record, name, script.map(|s| s.definition.clone()), columns);

        if dependency_type == DependencyType::View {
            record.view_dependencies = Some(self.resolve(name, visited));
        }
        record
    }

    /// Look `name` up as written, then under the default schema.
    fn find<T>(&self, name: &ObjectName, lookup: impl Fn(&ObjectName) -> Option<T>) -> Option<T> {
        lookup(name).or_else(|| match name.schema() {
            Some(_) => None,
            None => lookup(&name.with_default_schema(&self.default_schema)),
        })
    }
}

/// Attach script-derived flags and column metadata.
///
/// Without a script the record keeps its defaults; ordinary columns are
/// attached either way.
fn enrich(
    record: &mut DependencyRecord,
    name: &ObjectName,
    script: Option<String>,
    columns: Option<&[ColumnInfo]>,
) {
    let (auto, ordinary) = match columns {
        Some(columns) => {
            let (auto, ordinary) = classify_columns(columns);
            (auto, Some(ordinary))
        }
        None => (Vec::new(), None),
    };
    record.columns = ordinary;

    if let Some(script) = script {
        record.has_enforced_dependencies = has_enforced_dependencies(&script);
        if record.dependency_type == DependencyType::Table && !name.is_temporary() {
            record.auto_populated_columns = auto;
        }
        record.create_script = Some(script);
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
