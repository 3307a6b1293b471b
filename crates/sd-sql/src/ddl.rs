//! `CREATE TABLE` script reconstruction from catalog metadata.
//!
//! Used when the engine offers no helper that returns a table's complete
//! DDL. The output is batch-separated T-SQL: table, then non-constraint
//! indexes, then foreign keys, then enabled triggers, each followed by `GO`.

use sd_core::object_name::bracket;
use sd_core::{
    DataCompression, ForeignKey, IndexColumn, IndexKind, TableColumn, TableIndex, TableMetadata,
};

const HEADER: &str = "SET ANSI_NULLS ON\nGO\nSET QUOTED_IDENTIFIER ON\nGO\n";

/// Name of the default filegroup; placement clauses are omitted for it.
const PRIMARY_DATA_SPACE: &str = "PRIMARY";

/// Render the full create script for `table`.
pub fn render_table_ddl(table: &TableMetadata) -> String {
    let target = table.name.bracketed();
    let mut out = String::from(HEADER);

    out.push_str(&format!("CREATE TABLE {target} (\n"));
    let mut lines: Vec<String> = table
        .columns
        .iter()
        .map(|c| render_column(c, table.database_collation.as_deref()))
        .collect();
    lines.extend(
        table
            .check_constraints
            .iter()
            .map(|c| format!("CONSTRAINT {} CHECK {}", bracket(&c.name), c.definition)),
    );
    lines.extend(
        table
            .indexes
            .iter()
            .filter(|i| i.is_unique_constraint)
            .map(|i| {
                format!(
                    "CONSTRAINT {} UNIQUE {} ({})",
                    bracket(&i.name),
                    clustering(i.kind),
                    key_list(&i.key_columns)
                )
            }),
    );
    lines.extend(
        table
            .indexes
            .iter()
            .filter(|i| i.is_primary_key)
            .map(|i| {
                format!(
                    "CONSTRAINT {} PRIMARY KEY {} ({}){}",
                    bracket(&i.name),
                    clustering(i.kind),
                    key_list(&i.key_columns),
                    placement(i.data_space.as_deref())
                )
            }),
    );
    let body: Vec<String> = lines.iter().map(|l| format!("    {l}")).collect();
    out.push_str(&body.join(",\n"));
    out.push_str("\n)");
    out.push_str(&placement(table.data_space.as_deref()));
    out.push_str(compression(table.compression));
    out.push_str("\nGO\n");

    for index in table.indexes.iter().filter(|i| is_standalone_index(i)) {
        out.push('\n');
        out.push_str(&render_index(&target, index));
        out.push_str("\nGO\n");
    }

    let mut foreign_keys: Vec<&ForeignKey> = table.foreign_keys.iter().collect();
    foreign_keys.sort_by(|a, b| a.name.cmp(&b.name));
    for fk in foreign_keys {
        out.push('\n');
        out.push_str(&render_foreign_key(&target, fk));
        out.push_str("\nGO\n");
    }

    for trigger in &table.triggers {
        out.push('\n');
        out.push_str(trigger.trim_end());
        out.push_str("\nGO\n");
    }

    out
}

fn render_column(column: &TableColumn, database_collation: Option<&str>) -> String {
    let mut def = bracket(&column.name);

    if let Some(computed) = &column.computed {
        def.push_str(" AS ");
        def.push_str(&computed.definition);
        if computed.persisted {
            def.push_str(" PERSISTED");
        }
    } else {
        def.push(' ');
        def.push_str(&render_type(column));
        if let Some(identity) = &column.identity {
            def.push_str(&format!(" IDENTITY({},{})", identity.seed, identity.increment));
        }
    }

    if column.is_sparse {
        def.push_str(" SPARSE");
    }
    if column.is_filestream {
        def.push_str(" FILESTREAM");
    }
    if column.computed.is_none() {
        def.push_str(if column.is_nullable { " NULL" } else { " NOT NULL" });
    }
    if let Some(default) = &column.default_definition {
        def.push_str(" DEFAULT ");
        def.push_str(default);
    }
    if let Some(collation) = &column.collation {
        if Some(collation.as_str()) != database_collation {
            def.push_str(" COLLATE ");
            def.push_str(collation);
        }
    }
    if column.is_rowguidcol {
        def.push_str(" ROWGUIDCOL");
    }
    for check in &column.check_definitions {
        def.push_str(" CHECK ");
        def.push_str(check);
    }
    def
}

/// `[type]` plus its length, precision or scale suffix.
fn render_type(column: &TableColumn) -> String {
    let type_name = column.type_name.to_lowercase();
    let suffix = match type_name.as_str() {
        "char" | "varchar" | "binary" | "varbinary" => Some(length(column.max_length, 1)),
        "nchar" | "nvarchar" => Some(length(column.max_length, 2)),
        "decimal" | "numeric" => Some(format!("{}, {}", column.precision, column.scale)),
        "datetime2" | "time" | "datetimeoffset" => Some(column.scale.to_string()),
        _ => None,
    };
    match suffix {
        Some(s) => format!("{}({s})", bracket(&column.type_name)),
        None => bracket(&column.type_name),
    }
}

/// Declared length from a byte length; `-1` is `MAX`.
fn length(max_length: i32, bytes_per_char: i32) -> String {
    if max_length == -1 {
        "MAX".to_string()
    } else {
        (max_length / bytes_per_char).to_string()
    }
}

fn clustering(kind: IndexKind) -> &'static str {
    if kind == IndexKind::Clustered {
        "CLUSTERED"
    } else {
        "NONCLUSTERED"
    }
}

fn key_list(columns: &[IndexColumn]) -> String {
    columns
        .iter()
        .map(|c| format!("{} {}", bracket(&c.name), if c.descending { "DESC" } else { "ASC" }))
        .collect::<Vec<_>>()
        .join(", ")
}

fn name_list(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| bracket(c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn placement(data_space: Option<&str>) -> String {
    match data_space {
        Some(ds) if ds != PRIMARY_DATA_SPACE => format!(" ON {}", bracket(ds)),
        _ => String::new(),
    }
}

fn compression(compression: DataCompression) -> &'static str {
    match compression {
        DataCompression::None => "",
        DataCompression::Row => " WITH (DATA_COMPRESSION = ROW)",
        DataCompression::Page => " WITH (DATA_COMPRESSION = PAGE)",
    }
}

/// Non-clustered indexes that do not back a constraint.
fn is_standalone_index(index: &TableIndex) -> bool {
    index.kind == IndexKind::NonClustered && !index.is_primary_key && !index.is_unique_constraint
}

fn render_index(target: &str, index: &TableIndex) -> String {
    let mut sql = format!(
        "CREATE {}NONCLUSTERED INDEX {} ON {target} ({})",
        if index.is_unique { "UNIQUE " } else { "" },
        bracket(&index.name),
        key_list(&index.key_columns)
    );
    if !index.included_columns.is_empty() {
        sql.push_str(&format!(" INCLUDE ({})", name_list(&index.included_columns)));
    }
    sql.push_str(&placement(index.data_space.as_deref()));
    sql.push_str(compression(index.compression));
    sql
}

fn render_foreign_key(target: &str, fk: &ForeignKey) -> String {
    let mut sql = format!(
        "ALTER TABLE {target} WITH {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
        if fk.is_not_trusted { "NOCHECK" } else { "CHECK" },
        bracket(&fk.name),
        name_list(&fk.columns),
        fk.referenced_table.bracketed(),
        name_list(&fk.referenced_columns)
    );
    if let Some(action) = fk.on_update.keyword() {
        sql.push_str(&format!(" ON UPDATE {action}"));
    }
    if let Some(action) = fk.on_delete.keyword() {
        sql.push_str(&format!(" ON DELETE {action}"));
    }
    if fk.is_not_for_replication {
        sql.push_str(" NOT FOR REPLICATION");
    }
    sql
}

#[cfg(test)]
#[path = "ddl_test.rs"]
mod tests;
