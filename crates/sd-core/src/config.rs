//! Configuration types and parsing for sqldeps.yml

use crate::error::{CoreError, CoreResult};
use crate::cache::CacheFiles;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project configuration from sqldeps.yml
///
/// Every field has a default, so a project without a config file behaves as
/// if an empty one were present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name, used only for display
    #[serde(default)]
    pub name: Option<String>,

    /// Catalog backend used by discovery and extraction
    #[serde(default)]
    pub backend: Backend,

    /// Connection string (ADO format for SQL Server, a path for DuckDB).
    /// The `CONNECTION_STRING` environment variable takes precedence.
    #[serde(default)]
    pub connection: Option<String>,

    /// Schema assumed for unqualified object names (default: the backend's)
    #[serde(default)]
    pub default_schema: Option<String>,

    /// Directory holding the discovery caches, relative to the project root
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    /// Directory receiving per-routine analysis output
    #[serde(default = "default_analysis_dir")]
    pub analysis_dir: String,

    /// Directory receiving extracted routine definitions
    #[serde(default = "default_sql_raw_dir")]
    pub sql_raw_dir: String,

    /// Case-insensitive name fragments of test-framework objects to skip
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

/// Catalog backend selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Microsoft SQL Server (default)
    #[default]
    SqlServer,
    /// DuckDB database file
    DuckDb,
}

impl Backend {
    /// Schema the engine assigns to unqualified objects.
    pub fn default_schema(self) -> &'static str {
        match self {
            Backend::SqlServer => "dbo",
            Backend::DuckDb => "main",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::SqlServer => write!(f, "sqlserver"),
            Backend::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Config file names probed in the project root, in order.
const CONFIG_FILE_NAMES: &[&str] = &["sqldeps.yml", "sqldeps.yaml"];

fn default_cache_dir() -> String {
    "output/data".to_string()
}

fn default_analysis_dir() -> String {
    "analysis".to_string()
}

fn default_sql_raw_dir() -> String {
    "sql_raw".to_string()
}

fn default_exclude_patterns() -> Vec<String> {
    vec!["tSQLt".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: None,
            backend: Backend::default(),
            connection: None,
            default_schema: None,
            cache_dir: default_cache_dir(),
            analysis_dir: default_analysis_dir(),
            sql_raw_dir: default_sql_raw_dir(),
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        match CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.exists())
        {
            Some(path) => Self::load(&path),
            None => Err(CoreError::ConfigNotFound {
                path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
            }),
        }
    }

    /// Load configuration from a project directory, falling back to defaults
    /// when no config file exists
    pub fn load_or_default(dir: &Path) -> CoreResult<Self> {
        match Self::load_from_dir(dir) {
            Err(CoreError::ConfigNotFound { .. }) => {
                log::debug!("No sqldeps.yml in {}, using defaults", dir.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Check semantic constraints serde cannot express
    pub fn validate(&self) -> CoreResult<()> {
        if self
            .default_schema
            .as_deref()
            .is_some_and(|s| s.trim().is_empty())
        {
            return Err(CoreError::ConfigInvalid {
                message: "'default_schema' must not be empty".to_string(),
            });
        }
        let required = [
            ("cache_dir", &self.cache_dir),
            ("analysis_dir", &self.analysis_dir),
            ("sql_raw_dir", &self.sql_raw_dir),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("'{field}' must not be empty"),
                });
            }
        }
        if self.exclude_patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(CoreError::ConfigInvalid {
                message: "'exclude_patterns' must not contain empty entries".to_string(),
            });
        }
        Ok(())
    }

    /// Schema for unqualified names: the configured one, else the backend's
    pub fn effective_default_schema(&self) -> &str {
        self.default_schema
            .as_deref()
            .unwrap_or_else(|| self.backend.default_schema())
    }

    /// Cache directory resolved against the project root
    pub fn cache_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.cache_dir)
    }

    /// Cache file locations for this project
    pub fn cache_files(&self, root: &Path) -> CacheFiles {
        CacheFiles::new(self.cache_dir_absolute(root))
    }

    /// Analysis directory resolved against the project root
    pub fn analysis_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.analysis_dir)
    }

    /// Raw SQL directory resolved against the project root
    pub fn sql_raw_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.sql_raw_dir)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
