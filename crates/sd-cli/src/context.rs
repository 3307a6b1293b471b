//! Project context shared by CLI commands

use anyhow::{Context, Result};
use sd_core::{Backend, CacheFiles, Config};
use sd_db::{Catalog, DuckDbCatalog, SqlServerCatalog};
use sd_discover::ObjectFilter;
use std::path::{Path, PathBuf};

use crate::cli::{ConnectionArgs, GlobalArgs};

/// Project root plus its loaded configuration
pub struct ProjectContext {
    pub root: PathBuf,
    pub config: Config,
}

impl ProjectContext {
    /// Load config from `--config` or the project directory.
    ///
    /// A project without a config file runs on defaults.
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let root = PathBuf::from(&global.project_dir);
        let config = match &global.config {
            Some(path) => {
                Config::load(Path::new(path)).context("Failed to load configuration file")?
            }
            None => Config::load_or_default(&root).context("Failed to load project configuration")?,
        };
        log::debug!(
            "Project {} ({} backend)",
            config.name.as_deref().unwrap_or("<unnamed>"),
            config.backend
        );
        Ok(Self { root, config })
    }

    pub fn cache_files(&self) -> CacheFiles {
        self.config.cache_files(&self.root)
    }

    pub fn filter(&self) -> ObjectFilter {
        ObjectFilter::new(&self.config.exclude_patterns)
    }

    /// Open the catalog named by the flags, falling back to config.
    pub async fn open_catalog(&self, args: &ConnectionArgs) -> Result<Box<dyn Catalog>> {
        let backend = args.backend.map(Backend::from).unwrap_or(self.config.backend);
        let connection = args
            .connection
            .clone()
            .or_else(|| self.config.connection.clone())
            .with_context(|| {
                format!(
                    "No {backend} connection configured. Pass --connection, set \
                     CONNECTION_STRING or add `connection` to sqldeps.yml"
                )
            })?;

        let catalog: Box<dyn Catalog> = match backend {
            Backend::SqlServer => Box::new(
                SqlServerCatalog::connect(&connection)
                    .await
                    .context("Failed to connect to SQL Server")?,
            ),
            Backend::DuckDb => {
                let path = self.root.join(&connection);
                Box::new(DuckDbCatalog::from_path(&path).with_context(|| {
                    format!("Failed to open DuckDB database {}", path.display())
                })?)
            }
        };
        log::info!("Connected to {} catalog", catalog.backend_name());
        Ok(catalog)
    }
}
