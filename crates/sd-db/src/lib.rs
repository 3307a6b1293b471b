//! sd-db - Catalog access layer for sqldeps
//!
//! This crate provides the read-only `Catalog` trait that discovery and
//! extraction run against, with implementations for Microsoft SQL Server
//! (over TDS via tiberius) and DuckDB.

pub mod duckdb;
pub mod error;
pub mod sqlserver;
pub mod traits;

pub use duckdb::DuckDbCatalog;
pub use error::{DbError, DbResult};
pub use sqlserver::SqlServerCatalog;
pub use traits::{Catalog, CatalogObject, ObjectKind, ReferencedObject};
