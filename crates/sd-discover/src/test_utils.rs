//! Shared test utilities for sd-discover

use async_trait::async_trait;
use sd_core::{ColumnInfo, DependencyType, ObjectName, ObjectType, TableColumn, TableMetadata};
use sd_db::{Catalog, CatalogObject, DbError, DbResult, ObjectKind, ReferencedObject};
use std::collections::HashMap;

/// In-memory catalog with canned answers.
#[derive(Default)]
pub(crate) struct StaticCatalog {
    pub objects: Vec<CatalogObject>,
    pub dependencies: HashMap<String, Vec<ReferencedObject>>,
    pub columns: HashMap<String, Vec<ColumnInfo>>,
    pub definitions: HashMap<String, String>,
    pub table_ddl: HashMap<String, String>,
    /// Objects whose scripting fails.
    pub broken: Vec<String>,
    /// Objects whose scripting loses the connection.
    pub disconnected: Vec<String>,
}

pub(crate) fn name(qualified: &str) -> ObjectName {
    ObjectName::parse(qualified).unwrap()
}

impl StaticCatalog {
    pub fn object(mut self, qualified: &str, object_type: ObjectType) -> Self {
        self.objects
            .push(CatalogObject::new(name(qualified), object_type));
        self
    }

    pub fn depends(mut self, from: &str, to: &str, dependency_type: DependencyType) -> Self {
        self.dependencies
            .entry(from.to_string())
            .or_default()
            .push(ReferencedObject {
                name: name(to),
                dependency_type,
            });
        self
    }

    pub fn columns(mut self, table: &str, columns: Vec<ColumnInfo>) -> Self {
        self.columns.insert(table.to_string(), columns);
        self
    }

    pub fn definition(mut self, object: &str, sql: &str) -> Self {
        self.definitions.insert(object.to_string(), sql.to_string());
        self
    }

    pub fn broken(mut self, object: &str) -> Self {
        self.broken.push(object.to_string());
        self
    }

    pub fn disconnected(mut self, object: &str) -> Self {
        self.disconnected.push(object.to_string());
        self
    }

    fn of_kind(&self, kind: ObjectKind) -> Vec<CatalogObject> {
        self.objects
            .iter()
            .filter(|o| match kind {
                ObjectKind::Table => o.object_type == ObjectType::Table,
                ObjectKind::View => o.object_type == ObjectType::View,
                ObjectKind::Procedure => o.object_type == ObjectType::Procedure,
                ObjectKind::Trigger => o.object_type == ObjectType::Trigger,
                ObjectKind::Function => matches!(
                    o.object_type,
                    ObjectType::ScalarFunction
                        | ObjectType::InlineTableValuedFunction
                        | ObjectType::TableValuedFunction
                        | ObjectType::Function
                ),
            })
            .cloned()
            .collect()
    }

    fn check(&self, name: &ObjectName) -> DbResult<()> {
        if self.disconnected.contains(&name.to_string()) {
            Err(DbError::ConnectionError("socket closed".to_string()))
        } else if self.broken.contains(&name.to_string()) {
            Err(DbError::ExecutionError(format!("cannot script {name}")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn list_routines(&self) -> DbResult<Vec<CatalogObject>> {
        Ok(self.of_kind(ObjectKind::Procedure))
    }

    async fn list_objects(&self, kind: ObjectKind) -> DbResult<Vec<CatalogObject>> {
        Ok(self.of_kind(kind))
    }

    async fn referenced_objects(&self, name: &ObjectName) -> DbResult<Vec<ReferencedObject>> {
        Ok(self
            .dependencies
            .get(&name.to_string())
            .cloned()
            .unwrap_or_default())
    }

    async fn columns(&self, name: &ObjectName) -> DbResult<Vec<ColumnInfo>> {
        Ok(self.columns.get(&name.to_string()).cloned().unwrap_or_default())
    }

    async fn object_definition(&self, name: &ObjectName) -> DbResult<Option<String>> {
        self.check(name)?;
        Ok(self.definitions.get(&name.to_string()).cloned())
    }

    async fn full_table_ddl(&self, name: &ObjectName) -> DbResult<Option<String>> {
        self.check(name)?;
        Ok(self.table_ddl.get(&name.to_string()).cloned())
    }

    async fn table_metadata(&self, name: &ObjectName) -> DbResult<TableMetadata> {
        self.check(name)?;
        let mut table = TableMetadata::new(name.clone());
        table.columns = self
            .columns
            .get(&name.to_string())
            .map(|cols| {
                cols.iter()
                    .map(|c| {
                        let mut column = TableColumn::new(c.name.clone(), c.data_type.clone());
                        column.is_nullable = c.is_nullable;
                        column
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(table)
    }

    fn backend_name(&self) -> &'static str {
        "static"
    }

    fn default_schema(&self) -> &'static str {
        "dbo"
    }
}
