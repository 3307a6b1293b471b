//! DuckDB catalog backend
//!
//! DuckDB has no stored procedures, so macros stand in for routines: scalar
//! macros map to scalar functions and table macros to table-valued
//! functions. The engine records no expression dependencies either; first
//! level dependencies are recovered by parsing view and macro bodies.

use crate::error::{DbError, DbResult};
use crate::traits::{Catalog, CatalogObject, ObjectKind, ReferencedObject};
use async_trait::async_trait;
use duckdb::{params, Connection, Row, ToSql};
use sd_core::{
    CheckConstraint, ColumnInfo, DependencyType, ForeignKey, IndexColumn, IndexKind, ObjectName,
    ObjectType, PopulationType, ReferentialAction, TableColumn, TableIndex, TableMetadata,
};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const DEFAULT_SCHEMA: &str = "main";

const MACROS_SQL: &str = "SELECT DISTINCT schema_name, function_name, function_type
     FROM duckdb_functions()
     WHERE function_type IN ('macro', 'table_macro') AND NOT internal
     ORDER BY schema_name, function_name";

const TABLES_SQL: &str = "SELECT schema_name, table_name
     FROM duckdb_tables()
     WHERE NOT internal AND NOT temporary
     ORDER BY schema_name, table_name";

const VIEWS_SQL: &str = "SELECT schema_name, view_name
     FROM duckdb_views()
     WHERE NOT internal AND NOT temporary
     ORDER BY schema_name, view_name";

/// Every user relation and macro, for classifying parsed references.
const RELATION_KIND_SQL: &str = "SELECT kind, schema_name, object_name FROM (
         SELECT 'TABLE' AS kind, schema_name, table_name AS object_name FROM duckdb_tables()
         UNION ALL
         SELECT 'VIEW', schema_name, view_name FROM duckdb_views() WHERE NOT internal
         UNION ALL
         SELECT DISTINCT 'FUNCTION', schema_name, function_name FROM duckdb_functions()
         WHERE function_type IN ('macro', 'table_macro') AND NOT internal
     )
     WHERE lower(schema_name) = lower(?) AND lower(object_name) = lower(?)
     LIMIT 1";

const VIEW_SQL: &str = "SELECT sql FROM duckdb_views()
     WHERE lower(schema_name) = lower(?) AND lower(view_name) = lower(?)";

const MACRO_SQL: &str = "SELECT function_type, macro_definition, array_to_string(parameters, ', ')
     FROM duckdb_functions()
     WHERE function_type IN ('macro', 'table_macro') AND NOT internal
       AND lower(schema_name) = lower(?) AND lower(function_name) = lower(?)
     LIMIT 1";

const TABLE_SQL: &str = "SELECT sql FROM duckdb_tables()
     WHERE lower(schema_name) = lower(?) AND lower(table_name) = lower(?)";

const COLUMNS_SQL: &str = "SELECT column_name,
            data_type,
            CAST(COALESCE(character_maximum_length, 0) AS INTEGER),
            CAST(COALESCE(numeric_precision, 0) AS INTEGER),
            CAST(COALESCE(numeric_scale, 0) AS INTEGER),
            is_nullable,
            column_default
     FROM duckdb_columns()
     WHERE lower(schema_name) = lower(?) AND lower(table_name) = lower(?)
     ORDER BY column_index";

const CONSTRAINTS_SQL: &str = "SELECT constraint_type,
            COALESCE(expression, ''),
            COALESCE(constraint_text, ''),
            array_to_string(constraint_column_names, ',')
     FROM duckdb_constraints()
     WHERE lower(schema_name) = lower(?) AND lower(table_name) = lower(?)
     ORDER BY constraint_index";

/// Macro row: type, body and rendered parameter list.
struct MacroRow {
    function_type: String,
    definition: String,
    parameters: String,
}

impl MacroRow {
    fn object_type(&self) -> ObjectType {
        macro_object_type(&self.function_type)
    }

    fn create_script(&self, name: &ObjectName) -> String {
        let table = if self.object_type() == ObjectType::TableValuedFunction {
            "TABLE "
        } else {
            ""
        };
        format!(
            "CREATE MACRO {}({}) AS {}{}",
            name, self.parameters, table, self.definition
        )
    }
}

fn macro_object_type(function_type: &str) -> ObjectType {
    if function_type == "table_macro" {
        ObjectType::TableValuedFunction
    } else {
        ObjectType::ScalarFunction
    }
}

/// DuckDB catalog backend
pub struct DuckDbCatalog {
    conn: Mutex<Connection>,
}

impl DuckDbCatalog {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a DuckDB database file
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    /// Run setup statements, used to seed catalogs in tests and demos.
    pub fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.lock()?
            .execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn query_rows<T, F>(&self, sql: &str, params: &[&dyn ToSql], f: F) -> DbResult<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> duckdb::Result<T>,
    {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, f)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn list_named(&self, sql: &str, object_type: ObjectType) -> DbResult<Vec<CatalogObject>> {
        self.query_rows(sql, &[], |row| {
            Ok(CatalogObject::new(
                ObjectName::qualified(row.get::<_, String>(0)?, row.get::<_, String>(1)?),
                object_type,
            ))
        })
    }

    fn list_macros(&self) -> DbResult<Vec<CatalogObject>> {
        self.query_rows(MACROS_SQL, &[], |row| {
            Ok(CatalogObject::new(
                ObjectName::qualified(row.get::<_, String>(0)?, row.get::<_, String>(1)?),
                macro_object_type(&row.get::<_, String>(2)?),
            ))
        })
    }

    fn single_text(&self, sql: &str, name: &ObjectName) -> DbResult<Option<String>> {
        let (schema, object) = split(name);
        let rows = self.query_rows(sql, params![schema, object], |row| {
            row.get::<_, Option<String>>(0)
        })?;
        Ok(rows.into_iter().flatten().next())
    }

    fn find_macro(&self, name: &ObjectName) -> DbResult<Option<MacroRow>> {
        let (schema, object) = split(name);
        let rows = self.query_rows(MACRO_SQL, params![schema, object], |row| {
            Ok(MacroRow {
                function_type: row.get(0)?,
                definition: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                parameters: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            })
        })?;
        Ok(rows.into_iter().next())
    }

    /// Body text to scan for relations: the view statement or macro body.
    fn dependency_source(&self, name: &ObjectName) -> DbResult<Option<String>> {
        if let Some(sql) = self.single_text(VIEW_SQL, name)? {
            return Ok(Some(sql));
        }
        Ok(self.find_macro(name)?.map(|m| m.definition))
    }

    fn classify(&self, name: &ObjectName) -> DbResult<Option<ReferencedObject>> {
        let (schema, object) = split(name);
        let rows = self.query_rows(RELATION_KIND_SQL, params![schema, object], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        Ok(rows.into_iter().next().map(|(kind, schema, object)| {
            let dependency_type = match kind.as_str() {
                "TABLE" => DependencyType::Table,
                "VIEW" => DependencyType::View,
                _ => DependencyType::Function,
            };
            ReferencedObject {
                name: ObjectName::qualified(schema, object),
                dependency_type,
            }
        }))
    }

    fn table_columns(&self, name: &ObjectName) -> DbResult<Vec<TableColumn>> {
        let (schema, object) = split(name);
        self.query_rows(COLUMNS_SQL, params![schema, object], |row| {
            let (type_name, _) = split_type(&row.get::<_, String>(1)?);
            let mut column = TableColumn::new(row.get::<_, String>(0)?, type_name);
            column.max_length = row.get(2)?;
            column.precision = row.get(3)?;
            column.scale = row.get(4)?;
            column.is_nullable = row.get(5)?;
            column.default_definition = row.get(6)?;
            Ok(column)
        })
    }
}

fn split(name: &ObjectName) -> (String, String) {
    (
        name.schema().unwrap_or(DEFAULT_SCHEMA).to_string(),
        name.name().to_string(),
    )
}

/// Split `DECIMAL(18,3)` into its base name and modifier list.
fn split_type(data_type: &str) -> (String, Option<String>) {
    match data_type.split_once('(') {
        Some((base, rest)) => (
            base.trim().to_lowercase(),
            Some(rest.trim_end_matches(')').to_string()),
        ),
        None => (data_type.trim().to_lowercase(), None),
    }
}

/// Classify a column from its default expression.
///
/// A `nextval(...)` default draws from a sequence, which is how DuckDB
/// expresses identity columns.
fn population_from_default(default: Option<&str>) -> Option<(PopulationType, Option<&str>)> {
    let default = default?;
    if default.trim_start().to_lowercase().starts_with("nextval(") {
        Some((PopulationType::Identity, None))
    } else {
        Some((PopulationType::Default, Some(default)))
    }
}

/// Parse `... REFERENCES target(col, ...)` out of a constraint's text.
fn parse_references(text: &str) -> Option<(ObjectName, Vec<String>)> {
    let upper = text.to_ascii_uppercase();
    let start = upper.find("REFERENCES")? + "REFERENCES".len();
    let rest = text[start..].trim_start();
    let (target, columns) = match rest.split_once('(') {
        Some((target, columns)) => (target, columns.split(')').next().unwrap_or("")),
        None => (rest, ""),
    };
    let target = ObjectName::parse(target.trim())?;
    let columns = split_list(columns);
    Some((target, columns))
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|c| c.trim().trim_matches('"').to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

#[async_trait]
impl Catalog for DuckDbCatalog {
    async fn list_routines(&self) -> DbResult<Vec<CatalogObject>> {
        self.list_macros()
    }

    async fn list_objects(&self, kind: ObjectKind) -> DbResult<Vec<CatalogObject>> {
        match kind {
            ObjectKind::Table => self.list_named(TABLES_SQL, ObjectType::Table),
            ObjectKind::View => self.list_named(VIEWS_SQL, ObjectType::View),
            ObjectKind::Function => self.list_macros(),
            ObjectKind::Procedure | ObjectKind::Trigger => Ok(Vec::new()),
        }
    }

    async fn referenced_objects(&self, name: &ObjectName) -> DbResult<Vec<ReferencedObject>> {
        let Some(source) = self.dependency_source(name)? else {
            return Err(DbError::NotFound(name.to_string()));
        };
        let relations = match sd_sql::extract_relations(&source) {
            Ok(relations) => relations,
            Err(e) => {
                log::warn!("Could not parse definition of {name}: {e}");
                return Ok(Vec::new());
            }
        };

        let own_key = name.with_default_schema(DEFAULT_SCHEMA).canonical_key();
        let mut referenced = Vec::new();
        for relation in relations {
            let qualified = relation.with_default_schema(DEFAULT_SCHEMA);
            if qualified.canonical_key() == own_key {
                continue;
            }
            match self.classify(&qualified)? {
                Some(object) => referenced.push(object),
                None => log::debug!("{name} references {relation}, which is not in the catalog"),
            }
        }
        Ok(referenced)
    }

    async fn columns(&self, name: &ObjectName) -> DbResult<Vec<ColumnInfo>> {
        let (schema, object) = split(name);
        self.query_rows(COLUMNS_SQL, params![schema, object], |row| {
            let default: Option<String> = row.get(6)?;
            let mut column = ColumnInfo::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?);
            column.max_length = row.get(2)?;
            column.precision = row.get(3)?;
            column.scale = row.get(4)?;
            column.is_nullable = row.get(5)?;
            if let Some((kind, definition)) = population_from_default(default.as_deref()) {
                column = column.populated_by(kind, definition);
            }
            Ok(column)
        })
    }

    async fn object_definition(&self, name: &ObjectName) -> DbResult<Option<String>> {
        if let Some(sql) = self.single_text(VIEW_SQL, name)? {
            return Ok(Some(sql));
        }
        let qualified = name.with_default_schema(DEFAULT_SCHEMA);
        Ok(self
            .find_macro(name)?
            .map(|m| m.create_script(&qualified)))
    }

    async fn full_table_ddl(&self, name: &ObjectName) -> DbResult<Option<String>> {
        self.single_text(TABLE_SQL, name)
    }

    async fn table_metadata(&self, name: &ObjectName) -> DbResult<TableMetadata> {
        let qualified = name.with_default_schema(DEFAULT_SCHEMA);
        let columns = self.table_columns(&qualified)?;
        if columns.is_empty() {
            return Err(DbError::NotFound(qualified.to_string()));
        }

        let (schema, object) = split(&qualified);
        let constraints = self.query_rows(CONSTRAINTS_SQL, params![schema, object], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            ))
        })?;

        let mut table = TableMetadata::new(qualified);
        table.columns = columns;
        for (index, (kind, expression, text, column_names)) in constraints.into_iter().enumerate() {
            let table_name = table.name.name().to_string();
            match kind.as_str() {
                "PRIMARY KEY" => table.indexes.push(TableIndex {
                    name: format!("PK_{table_name}"),
                    kind: IndexKind::Clustered,
                    is_primary_key: true,
                    is_unique: true,
                    key_columns: split_list(&column_names)
                        .into_iter()
                        .map(IndexColumn::asc)
                        .collect(),
                    ..Default::default()
                }),
                "UNIQUE" => table.indexes.push(TableIndex {
                    name: format!("UQ_{table_name}_{index}"),
                    is_unique_constraint: true,
                    is_unique: true,
                    key_columns: split_list(&column_names)
                        .into_iter()
                        .map(IndexColumn::asc)
                        .collect(),
                    ..Default::default()
                }),
                "CHECK" => table.check_constraints.push(CheckConstraint {
                    name: format!("CK_{table_name}_{index}"),
                    definition: format!("({expression})"),
                }),
                "FOREIGN KEY" => match parse_references(&text) {
                    Some((referenced_table, referenced_columns)) => {
                        table.foreign_keys.push(ForeignKey {
                            name: format!("FK_{table_name}_{}", referenced_table.name()),
                            columns: split_list(&column_names),
                            referenced_table: referenced_table
                                .with_default_schema(DEFAULT_SCHEMA),
                            referenced_columns,
                            on_update: ReferentialAction::NoAction,
                            on_delete: ReferentialAction::NoAction,
                            is_not_trusted: false,
                            is_not_for_replication: false,
                        })
                    }
                    None => log::warn!("Unrecognized foreign key on {table_name}: {text}"),
                },
                _ => {}
            }
        }
        Ok(table)
    }

    fn backend_name(&self) -> &'static str {
        "duckdb"
    }

    fn default_schema(&self) -> &'static str {
        DEFAULT_SCHEMA
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
