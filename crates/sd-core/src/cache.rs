//! On-disk dependency caches.
//!
//! Discovery writes two JSON files that every later resolution reads:
//!
//! - `procedure_dependencies.json`: `[{name, dependencies: [{name, type, columns?, definition?}]}]`
//! - `object_create_scripts.json`: `[{name, type, definition}]`
//!
//! The caches are a snapshot. Nothing here detects that the source schema
//! has changed since they were written.

use crate::dependency::{ColumnInfo, DependencyType, ObjectType};
use crate::error::{CoreError, CoreResult};
use crate::object_name::ObjectName;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the routine dependency cache.
pub const PROCEDURE_DEPENDENCIES_FILE: &str = "procedure_dependencies.json";

/// File name of the create-script cache.
pub const OBJECT_CREATE_SCRIPTS_FILE: &str = "object_create_scripts.json";

/// First-level dependencies of one routine (or view) as seen by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureDependencies {
    pub name: ObjectName,
    #[serde(default)]
    pub dependencies: Vec<CachedDependency>,
}

/// One catalog-reported dependency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedDependency {
    pub name: ObjectName,
    #[serde(rename = "type", default)]
    pub dependency_type: DependencyType,
    /// Column metadata for tables and views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<ColumnInfo>>,
    /// Inline definition, kept for functions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

impl CachedDependency {
    /// Create a dependency entry with no attached metadata.
    pub fn new(name: ObjectName, dependency_type: DependencyType) -> Self {
        Self {
            name,
            dependency_type,
            columns: None,
            definition: None,
        }
    }
}

/// Create script of one database object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectScript {
    pub name: ObjectName,
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    pub definition: String,
}

/// Location of the two cache files.
#[derive(Debug, Clone)]
pub struct CacheFiles {
    dir: PathBuf,
}

impl CacheFiles {
    /// Cache files inside `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the cache files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn procedure_dependencies_path(&self) -> PathBuf {
        self.dir.join(PROCEDURE_DEPENDENCIES_FILE)
    }

    pub fn object_scripts_path(&self) -> PathBuf {
        self.dir.join(OBJECT_CREATE_SCRIPTS_FILE)
    }

    /// Whether both cache files are present.
    pub fn exist(&self) -> bool {
        self.procedure_dependencies_path().is_file() && self.object_scripts_path().is_file()
    }

    /// Read the routine dependency cache.
    pub fn read_procedure_dependencies(&self) -> CoreResult<Vec<ProcedureDependencies>> {
        read_json(&self.procedure_dependencies_path())
    }

    /// Read the create-script cache.
    pub fn read_object_scripts(&self) -> CoreResult<Vec<ObjectScript>> {
        read_json(&self.object_scripts_path())
    }

    /// Write both caches, creating the directory if needed.
    pub fn write(
        &self,
        procedures: &[ProcedureDependencies],
        scripts: &[ObjectScript],
    ) -> CoreResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| CoreError::IoWithPath {
            path: self.dir.display().to_string(),
            source: e,
        })?;
        write_json(&self.procedure_dependencies_path(), procedures)?;
        write_json(&self.object_scripts_path(), scripts)?;
        log::info!(
            "Wrote {} routine entries and {} create scripts to {}",
            procedures.len(),
            scripts.len(),
            self.dir.display()
        );
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> CoreResult<T> {
    if !path.is_file() {
        return Err(CoreError::CacheNotFound {
            path: path.display().to_string(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| CoreError::CacheParse {
        path: path.display().to_string(),
        source: e,
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> CoreResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
