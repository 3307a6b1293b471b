//! Catalog trait definition

use crate::error::DbResult;
use async_trait::async_trait;
use sd_core::{ColumnInfo, DependencyType, ObjectName, ObjectType, TableMetadata};

/// Object families a catalog can enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Table,
    View,
    Function,
    Procedure,
    Trigger,
}

impl ObjectKind {
    /// All kinds, in the order create scripts are collected.
    pub const ALL: [ObjectKind; 5] = [
        ObjectKind::Table,
        ObjectKind::View,
        ObjectKind::Function,
        ObjectKind::Procedure,
        ObjectKind::Trigger,
    ];
}

/// One enumerated catalog object.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogObject {
    pub name: ObjectName,
    pub object_type: ObjectType,
}

impl CatalogObject {
    pub fn new(name: ObjectName, object_type: ObjectType) -> Self {
        Self { name, object_type }
    }
}

/// An object another object depends on, as recorded by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencedObject {
    pub name: ObjectName,
    pub dependency_type: DependencyType,
}

/// Read-only access to a database catalog
///
/// Implementations must be Send + Sync for async operation. Every method
/// takes a fully qualified name; callers apply the default schema first.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Routines whose dependencies are analyzed (stored procedures, or the
    /// closest equivalent the engine has), ordered by schema and name.
    async fn list_routines(&self) -> DbResult<Vec<CatalogObject>>;

    /// Objects of one kind, ordered by schema and name.
    async fn list_objects(&self, kind: ObjectKind) -> DbResult<Vec<CatalogObject>>;

    /// First-level dependencies of `name` that resolve to catalog objects.
    async fn referenced_objects(&self, name: &ObjectName) -> DbResult<Vec<ReferencedObject>>;

    /// Column metadata in ordinal order, with engine-populated columns
    /// classified.
    async fn columns(&self, name: &ObjectName) -> DbResult<Vec<ColumnInfo>>;

    /// Stored definition text of a view, routine or trigger.
    async fn object_definition(&self, name: &ObjectName) -> DbResult<Option<String>>;

    /// Complete table DDL from an engine-side helper, when one is available.
    async fn full_table_ddl(&self, name: &ObjectName) -> DbResult<Option<String>>;

    /// Structured table metadata for DDL reconstruction.
    async fn table_metadata(&self, name: &ObjectName) -> DbResult<TableMetadata>;

    /// Backend identifier for logging
    fn backend_name(&self) -> &'static str;

    /// Schema the engine assigns to unqualified names
    fn default_schema(&self) -> &'static str;
}
