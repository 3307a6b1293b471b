//! sd-core - Core library for sqldeps
//!
//! This crate provides the shared data model used by every sqldeps
//! component: schema-qualified object names, dependency records and column
//! metadata, the on-disk cache formats written by discovery, the structured
//! table metadata consumed by DDL reconstruction, and project configuration.

pub mod cache;
pub mod config;
pub mod dependency;
pub mod error;
pub mod object_name;
pub mod table;

pub use cache::{CacheFiles, CachedDependency, ObjectScript, ProcedureDependencies};
pub use config::{Backend, Config};
pub use dependency::{
    AutoPopulatedColumn, ColumnInfo, DependencyRecord, DependencyType, ObjectType, PopulationType,
};
pub use error::{CoreError, CoreResult};
pub use object_name::ObjectName;
pub use table::{
    CheckConstraint, ComputedSpec, DataCompression, ForeignKey, IdentitySpec, IndexColumn,
    IndexKind, ReferentialAction, TableColumn, TableIndex, TableMetadata,
};
