//! Microsoft SQL Server catalog backend
//!
//! Talks TDS through tiberius over a single connection that every query of a
//! run shares. Catalog queries live in `queries/*.sql` and take the object
//! name as `@P1`, resolved server-side with `OBJECT_ID`.

use crate::error::{DbError, DbResult};
use crate::traits::{Catalog, CatalogObject, ObjectKind, ReferencedObject};
use async_trait::async_trait;
use sd_core::{
    CheckConstraint, ColumnInfo, ComputedSpec, DataCompression, DependencyType, ForeignKey,
    IdentitySpec, IndexColumn, IndexKind, ObjectName, ObjectType, PopulationType,
    ReferentialAction, TableColumn, TableIndex, TableMetadata,
};
use tiberius::{Client, Config, Row, ToSql};
use tokio::net::TcpStream;
use tokio::sync::{Mutex, OnceCell};
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

const DEFAULT_SCHEMA: &str = "dbo";

const PROCEDURES_SQL: &str = include_str!("queries/procedures.sql");
const TABLES_SQL: &str = include_str!("queries/tables.sql");
const VIEWS_SQL: &str = include_str!("queries/views.sql");
const FUNCTIONS_SQL: &str = include_str!("queries/functions.sql");
const TRIGGERS_SQL: &str = include_str!("queries/triggers.sql");
const DEPENDENCIES_SQL: &str = include_str!("queries/dependencies.sql");
const COLUMNS_SQL: &str = include_str!("queries/columns.sql");
const DEFINITION_SQL: &str = include_str!("queries/definition.sql");
const GET_DDL_EXISTS_SQL: &str = include_str!("queries/get_ddl_exists.sql");
const DATABASE_COLLATION_SQL: &str = include_str!("queries/database_collation.sql");
const TABLE_COLUMNS_SQL: &str = include_str!("queries/table_columns.sql");
const CHECK_CONSTRAINTS_SQL: &str = include_str!("queries/check_constraints.sql");
const COLUMN_CHECKS_SQL: &str = include_str!("queries/column_checks.sql");
const INDEXES_SQL: &str = include_str!("queries/indexes.sql");
const INDEX_COLUMNS_SQL: &str = include_str!("queries/index_columns.sql");
const FOREIGN_KEYS_SQL: &str = include_str!("queries/foreign_keys.sql");
const FOREIGN_KEY_COLUMNS_SQL: &str = include_str!("queries/foreign_key_columns.sql");
const TABLE_TRIGGERS_SQL: &str = include_str!("queries/table_triggers.sql");

/// SQL Server catalog backend
pub struct SqlServerCatalog {
    client: Mutex<Client<Compat<TcpStream>>>,
    has_get_ddl: OnceCell<bool>,
}

impl SqlServerCatalog {
    /// Connect using an ADO.NET style connection string.
    pub async fn connect(connection_string: &str) -> DbResult<Self> {
        let config = Config::from_ado_string(connection_string)
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        let tcp = TcpStream::connect(config.get_addr())
            .await
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        tcp.set_nodelay(true)
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;

        let client = Client::connect(config, tcp.compat_write())
            .await
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        log::debug!("Connected to SQL Server");

        Ok(Self {
            client: Mutex::new(client),
            has_get_ddl: OnceCell::new(),
        })
    }

    async fn fetch(&self, sql: &str, params: &[&dyn ToSql]) -> DbResult<Vec<Row>> {
        let mut client = self.client.lock().await;
        let stream = client.query(sql, params).await?;
        Ok(stream.into_first_result().await?)
    }

    async fn fetch_for(&self, sql: &str, name: &ObjectName) -> DbResult<Vec<Row>> {
        let target = name.with_default_schema(DEFAULT_SCHEMA).bracketed();
        self.fetch(sql, &[&target.as_str()]).await
    }

    async fn list(&self, sql: &str, object_type: ObjectType) -> DbResult<Vec<CatalogObject>> {
        self.fetch(sql, &[])
            .await?
            .iter()
            .map(|row| {
                Ok(CatalogObject::new(
                    ObjectName::qualified(text(row, 0)?, text(row, 1)?),
                    object_type,
                ))
            })
            .collect()
    }

    async fn list_functions(&self) -> DbResult<Vec<CatalogObject>> {
        self.fetch(FUNCTIONS_SQL, &[])
            .await?
            .iter()
            .map(|row| {
                Ok(CatalogObject::new(
                    ObjectName::qualified(text(row, 0)?, text(row, 1)?),
                    function_object_type(&text(row, 2)?),
                ))
            })
            .collect()
    }

    async fn get_ddl_available(&self) -> DbResult<bool> {
        let available = self
            .has_get_ddl
            .get_or_try_init(|| async {
                let rows = self.fetch(GET_DDL_EXISTS_SQL, &[]).await?;
                Ok::<_, DbError>(match rows.first() {
                    Some(row) => flag(row, 0)?,
                    None => false,
                })
            })
            .await?;
        Ok(*available)
    }

    async fn database_collation(&self) -> DbResult<Option<String>> {
        let rows = self.fetch(DATABASE_COLLATION_SQL, &[]).await?;
        match rows.first() {
            Some(row) => opt_text(row, 0),
            None => Ok(None),
        }
    }

    async fn table_columns(&self, name: &ObjectName) -> DbResult<Vec<TableColumn>> {
        self.fetch_for(TABLE_COLUMNS_SQL, name)
            .await?
            .iter()
            .map(|row| {
                let mut column = TableColumn::new(text(row, 0)?, text(row, 1)?);
                column.max_length = int(row, 2)?;
                column.precision = int(row, 3)?;
                column.scale = int(row, 4)?;
                column.is_nullable = flag(row, 5)?;
                if flag(row, 6)? {
                    column.identity = Some(IdentitySpec {
                        seed: opt_text(row, 7)?.unwrap_or_else(|| "1".to_string()),
                        increment: opt_text(row, 8)?.unwrap_or_else(|| "1".to_string()),
                    });
                }
                if let Some(definition) = opt_text(row, 9)? {
                    column.computed = Some(ComputedSpec {
                        definition,
                        persisted: flag(row, 10)?,
                    });
                }
                column.is_sparse = flag(row, 11)?;
                column.is_filestream = flag(row, 12)?;
                column.is_rowguidcol = flag(row, 13)?;
                column.default_definition = opt_text(row, 14)?;
                column.collation = opt_text(row, 15)?;
                Ok(column)
            })
            .collect()
    }

    async fn check_constraints(&self, name: &ObjectName) -> DbResult<Vec<CheckConstraint>> {
        self.fetch_for(CHECK_CONSTRAINTS_SQL, name)
            .await?
            .iter()
            .map(|row| {
                Ok(CheckConstraint {
                    name: text(row, 0)?,
                    definition: text(row, 1)?,
                })
            })
            .collect()
    }

    async fn column_check_rows(&self, name: &ObjectName) -> DbResult<Vec<ColumnCheckRow>> {
        self.fetch_for(COLUMN_CHECKS_SQL, name)
            .await?
            .iter()
            .map(|row| {
                Ok(ColumnCheckRow {
                    column: text(row, 0)?,
                    definition: text(row, 1)?,
                })
            })
            .collect()
    }

    async fn index_rows(&self, name: &ObjectName) -> DbResult<Vec<IndexRow>> {
        self.fetch_for(INDEXES_SQL, name)
            .await?
            .iter()
            .map(|row| {
                Ok(IndexRow {
                    index_id: int(row, 0)?,
                    name: opt_text(row, 1)?,
                    kind: IndexKind::from_code(int(row, 2)?),
                    is_primary_key: flag(row, 3)?,
                    is_unique_constraint: flag(row, 4)?,
                    is_unique: flag(row, 5)?,
                    data_space: opt_text(row, 6)?,
                    compression: DataCompression::from_code(int(row, 7)?),
                })
            })
            .collect()
    }

    async fn index_column_rows(&self, name: &ObjectName) -> DbResult<Vec<IndexColumnRow>> {
        self.fetch_for(INDEX_COLUMNS_SQL, name)
            .await?
            .iter()
            .map(|row| {
                Ok(IndexColumnRow {
                    index_id: int(row, 0)?,
                    column: text(row, 1)?,
                    descending: flag(row, 2)?,
                    included: flag(row, 3)?,
                })
            })
            .collect()
    }

    async fn foreign_key_rows(&self, name: &ObjectName) -> DbResult<Vec<ForeignKeyRow>> {
        self.fetch_for(FOREIGN_KEYS_SQL, name)
            .await?
            .iter()
            .map(|row| {
                Ok(ForeignKeyRow {
                    constraint_id: int(row, 0)?,
                    name: text(row, 1)?,
                    referenced_table: ObjectName::qualified(text(row, 2)?, text(row, 3)?),
                    on_update: ReferentialAction::from_code(int(row, 4)?),
                    on_delete: ReferentialAction::from_code(int(row, 5)?),
                    is_not_trusted: flag(row, 6)?,
                    is_not_for_replication: flag(row, 7)?,
                })
            })
            .collect()
    }

    async fn foreign_key_column_rows(
        &self,
        name: &ObjectName,
    ) -> DbResult<Vec<ForeignKeyColumnRow>> {
        self.fetch_for(FOREIGN_KEY_COLUMNS_SQL, name)
            .await?
            .iter()
            .map(|row| {
                Ok(ForeignKeyColumnRow {
                    constraint_id: int(row, 0)?,
                    column: text(row, 1)?,
                    referenced_column: text(row, 2)?,
                })
            })
            .collect()
    }

    async fn table_triggers(&self, name: &ObjectName) -> DbResult<Vec<String>> {
        let rows = self.fetch_for(TABLE_TRIGGERS_SQL, name).await?;
        let mut triggers = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(definition) = opt_text(row, 0)? {
                triggers.push(definition);
            }
        }
        Ok(triggers)
    }
}

/// One `sys.indexes` row, including the heap (index 0).
#[derive(Debug, Clone)]
struct ColumnCheckRow {
    column: String,
    definition: String,
}

#[derive(Debug, Clone)]
struct IndexRow {
    index_id: i32,
    name: Option<String>,
    kind: IndexKind,
    is_primary_key: bool,
    is_unique_constraint: bool,
    is_unique: bool,
    data_space: Option<String>,
    compression: DataCompression,
}

#[derive(Debug, Clone)]
struct IndexColumnRow {
    index_id: i32,
    column: String,
    descending: bool,
    included: bool,
}

#[derive(Debug, Clone)]
struct ForeignKeyRow {
    constraint_id: i32,
    name: String,
    referenced_table: ObjectName,
    on_update: ReferentialAction,
    on_delete: ReferentialAction,
    is_not_trusted: bool,
    is_not_for_replication: bool,
}

#[derive(Debug, Clone)]
struct ForeignKeyColumnRow {
    constraint_id: i32,
    column: String,
    referenced_column: String,
}

/// Hang each column-level check on its column, keeping row order.
fn attach_column_checks(columns: &mut [TableColumn], checks: Vec<ColumnCheckRow>) {
    for check in checks {
        match columns.iter_mut().find(|c| c.name == check.column) {
            Some(column) => column.check_definitions.push(check.definition),
            None => log::debug!("Check on unknown column {} ignored", check.column),
        }
    }
}

/// Fold index and index-column rows into the table's storage settings and
/// its named indexes.
fn assemble_indexes(
    table: &mut TableMetadata,
    indexes: Vec<IndexRow>,
    columns: &[IndexColumnRow],
) {
    for row in indexes {
        if matches!(row.kind, IndexKind::Heap | IndexKind::Clustered) {
            table.data_space = row.data_space.clone();
            table.compression = row.compression;
        }
        let Some(name) = row.name else {
            continue;
        };

        let mut index = TableIndex {
            name,
            kind: row.kind,
            is_primary_key: row.is_primary_key,
            is_unique_constraint: row.is_unique_constraint,
            is_unique: row.is_unique,
            data_space: row.data_space,
            compression: row.compression,
            ..Default::default()
        };
        for column in columns.iter().filter(|c| c.index_id == row.index_id) {
            if column.included {
                index.included_columns.push(column.column.clone());
            } else if column.descending {
                index.key_columns.push(IndexColumn::desc(column.column.clone()));
            } else {
                index.key_columns.push(IndexColumn::asc(column.column.clone()));
            }
        }
        table.indexes.push(index);
    }
}

fn assemble_foreign_keys(
    keys: Vec<ForeignKeyRow>,
    columns: &[ForeignKeyColumnRow],
) -> Vec<ForeignKey> {
    keys.into_iter()
        .map(|key| {
            let (local, referenced): (Vec<String>, Vec<String>) = columns
                .iter()
                .filter(|c| c.constraint_id == key.constraint_id)
                .map(|c| (c.column.clone(), c.referenced_column.clone()))
                .unzip();
            ForeignKey {
                name: key.name,
                columns: local,
                referenced_table: key.referenced_table,
                referenced_columns: referenced,
                on_update: key.on_update,
                on_delete: key.on_delete,
                is_not_trusted: key.is_not_trusted,
                is_not_for_replication: key.is_not_for_replication,
            }
        })
        .collect()
}

/// Map `sys.objects.type_desc` to a dependency type.
fn dependency_type_from_desc(type_desc: &str) -> DependencyType {
    match type_desc {
        "USER_TABLE" => DependencyType::Table,
        "VIEW" => DependencyType::View,
        "SQL_STORED_PROCEDURE" => DependencyType::Procedure,
        "SQL_SCALAR_FUNCTION"
        | "SQL_INLINE_TABLE_VALUED_FUNCTION"
        | "SQL_TABLE_VALUED_FUNCTION" => DependencyType::Function,
        "SQL_TRIGGER" => DependencyType::Trigger,
        _ => DependencyType::Unknown,
    }
}

fn function_object_type(label: &str) -> ObjectType {
    match label {
        "SCALAR_FUNCTION" => ObjectType::ScalarFunction,
        "INLINE_TABLE_VALUED_FUNCTION" => ObjectType::InlineTableValuedFunction,
        "TABLE_VALUED_FUNCTION" => ObjectType::TableValuedFunction,
        _ => ObjectType::Function,
    }
}

fn population_type(label: &str) -> Option<PopulationType> {
    match label {
        "IDENTITY" => Some(PopulationType::Identity),
        "COMPUTED" => Some(PopulationType::Computed),
        "DEFAULT" => Some(PopulationType::Default),
        "ROWVERSION" => Some(PopulationType::Rowversion),
        "ROWGUIDCOL" => Some(PopulationType::Rowguidcol),
        _ => None,
    }
}

fn text(row: &Row, idx: usize) -> DbResult<String> {
    opt_text(row, idx)?.ok_or_else(|| DbError::Internal(format!("column {idx} is NULL")))
}

fn opt_text(row: &Row, idx: usize) -> DbResult<Option<String>> {
    Ok(row.try_get::<&str, _>(idx)?.map(str::to_string))
}

fn int(row: &Row, idx: usize) -> DbResult<i32> {
    Ok(row.try_get::<i32, _>(idx)?.unwrap_or(0))
}

fn flag(row: &Row, idx: usize) -> DbResult<bool> {
    Ok(row.try_get::<bool, _>(idx)?.unwrap_or(false))
}

#[async_trait]
impl Catalog for SqlServerCatalog {
    async fn list_routines(&self) -> DbResult<Vec<CatalogObject>> {
        self.list(PROCEDURES_SQL, ObjectType::Procedure).await
    }

    async fn list_objects(&self, kind: ObjectKind) -> DbResult<Vec<CatalogObject>> {
        match kind {
            ObjectKind::Table => self.list(TABLES_SQL, ObjectType::Table).await,
            ObjectKind::View => self.list(VIEWS_SQL, ObjectType::View).await,
            ObjectKind::Function => self.list_functions().await,
            ObjectKind::Procedure => self.list(PROCEDURES_SQL, ObjectType::Procedure).await,
            ObjectKind::Trigger => self.list(TRIGGERS_SQL, ObjectType::Trigger).await,
        }
    }

    async fn referenced_objects(&self, name: &ObjectName) -> DbResult<Vec<ReferencedObject>> {
        self.fetch_for(DEPENDENCIES_SQL, name)
            .await?
            .iter()
            .map(|row| {
                Ok(ReferencedObject {
                    name: ObjectName::qualified(text(row, 0)?, text(row, 1)?),
                    dependency_type: dependency_type_from_desc(&text(row, 2)?),
                })
            })
            .collect()
    }

    async fn columns(&self, name: &ObjectName) -> DbResult<Vec<ColumnInfo>> {
        self.fetch_for(COLUMNS_SQL, name)
            .await?
            .iter()
            .map(|row| {
                let mut column = ColumnInfo::new(text(row, 0)?, text(row, 1)?);
                column.max_length = int(row, 2)?;
                column.precision = int(row, 3)?;
                column.scale = int(row, 4)?;
                column.is_nullable = flag(row, 5)?;
                if let Some(kind) = opt_text(row, 6)?.as_deref().and_then(population_type) {
                    column = column.populated_by(kind, opt_text(row, 7)?.as_deref());
                }
                Ok(column)
            })
            .collect()
    }

    async fn object_definition(&self, name: &ObjectName) -> DbResult<Option<String>> {
        let rows = self.fetch_for(DEFINITION_SQL, name).await?;
        match rows.first() {
            Some(row) => opt_text(row, 0),
            None => Ok(None),
        }
    }

    async fn full_table_ddl(&self, name: &ObjectName) -> DbResult<Option<String>> {
        if !self.get_ddl_available().await? {
            return Ok(None);
        }
        let target = name.with_default_schema(DEFAULT_SCHEMA).to_string();
        match self.fetch("EXEC sp_GetDDL @P1", &[&target.as_str()]).await {
            Ok(rows) => {
                let mut lines = Vec::with_capacity(rows.len());
                for row in &rows {
                    lines.push(opt_text(row, 0)?.unwrap_or_default());
                }
                Ok(if lines.is_empty() {
                    None
                } else {
                    Some(lines.join("\n"))
                })
            }
            Err(e) => {
                log::debug!("sp_GetDDL failed for {target}, reconstructing instead: {e}");
                Ok(None)
            }
        }
    }

    async fn table_metadata(&self, name: &ObjectName) -> DbResult<TableMetadata> {
        let qualified = name.with_default_schema(DEFAULT_SCHEMA);
        let columns = self.table_columns(&qualified).await?;
        if columns.is_empty() {
            return Err(DbError::NotFound(qualified.to_string()));
        }

        let mut table = TableMetadata::new(qualified.clone());
        table.columns = columns;
        let column_checks = self.column_check_rows(&qualified).await?;
        attach_column_checks(&mut table.columns, column_checks);
        table.database_collation = self.database_collation().await?;
        table.check_constraints = self.check_constraints(&qualified).await?;

        let index_rows = self.index_rows(&qualified).await?;
        let index_columns = self.index_column_rows(&qualified).await?;
        assemble_indexes(&mut table, index_rows, &index_columns);

        let key_rows = self.foreign_key_rows(&qualified).await?;
        let key_columns = self.foreign_key_column_rows(&qualified).await?;
        table.foreign_keys = assemble_foreign_keys(key_rows, &key_columns);

        table.triggers = self.table_triggers(&qualified).await?;
        Ok(table)
    }

    fn backend_name(&self) -> &'static str {
        "sqlserver"
    }

    fn default_schema(&self) -> &'static str {
        DEFAULT_SCHEMA
    }
}

#[cfg(test)]
#[path = "sqlserver_test.rs"]
mod tests;
