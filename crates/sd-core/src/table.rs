//! Structured table metadata for DDL reconstruction.
//!
//! Catalog backends fill a [`TableMetadata`] from their system views when the
//! engine cannot hand back a complete `CREATE TABLE` script. The renderer in
//! `sd-sql` turns it back into DDL.

use crate::object_name::ObjectName;

/// Everything needed to regenerate a table's DDL.
#[derive(Debug, Clone, PartialEq)]
pub struct TableMetadata {
    pub name: ObjectName,
    /// Columns in ordinal order.
    pub columns: Vec<TableColumn>,
    /// Table-level check constraints. Column-level checks live on the column.
    pub check_constraints: Vec<CheckConstraint>,
    pub indexes: Vec<TableIndex>,
    pub foreign_keys: Vec<ForeignKey>,
    /// Definitions of enabled triggers attached to the table.
    pub triggers: Vec<String>,
    /// Data space of the heap or clustered index.
    pub data_space: Option<String>,
    pub compression: DataCompression,
    pub database_collation: Option<String>,
}

impl TableMetadata {
    pub fn new(name: ObjectName) -> Self {
        Self {
            name,
            columns: Vec::new(),
            check_constraints: Vec::new(),
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
            triggers: Vec::new(),
            data_space: None,
            compression: DataCompression::None,
            database_collation: None,
        }
    }
}

/// One column definition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableColumn {
    pub name: String,
    pub type_name: String,
    /// Storage length in bytes; `-1` for `(MAX)` types.
    pub max_length: i32,
    pub precision: i32,
    pub scale: i32,
    pub is_nullable: bool,
    pub identity: Option<IdentitySpec>,
    pub computed: Option<ComputedSpec>,
    pub is_sparse: bool,
    pub is_filestream: bool,
    pub is_rowguidcol: bool,
    pub default_definition: Option<String>,
    pub collation: Option<String>,
    /// Column-level check constraints, ordered by constraint name.
    pub check_definitions: Vec<String>,
}

impl TableColumn {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_nullable: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentitySpec {
    pub seed: String,
    pub increment: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComputedSpec {
    pub definition: String,
    pub persisted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckConstraint {
    pub name: String,
    pub definition: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexKind {
    Heap,
    Clustered,
    #[default]
    NonClustered,
    Other,
}

impl IndexKind {
    /// Map a `sys.indexes.type` code.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => IndexKind::Heap,
            1 => IndexKind::Clustered,
            2 => IndexKind::NonClustered,
            _ => IndexKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableIndex {
    pub name: String,
    pub kind: IndexKind,
    pub is_primary_key: bool,
    pub is_unique_constraint: bool,
    pub is_unique: bool,
    /// Key columns in key order.
    pub key_columns: Vec<IndexColumn>,
    pub included_columns: Vec<String>,
    pub data_space: Option<String>,
    pub compression: DataCompression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexColumn {
    pub name: String,
    pub descending: bool,
}

impl IndexColumn {
    pub fn asc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descending: false,
        }
    }

    pub fn desc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descending: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataCompression {
    #[default]
    None,
    Row,
    Page,
}

impl DataCompression {
    /// Map a `sys.partitions.data_compression` code.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => DataCompression::Row,
            2 => DataCompression::Page,
            _ => DataCompression::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub name: String,
    pub columns: Vec<String>,
    pub referenced_table: ObjectName,
    pub referenced_columns: Vec<String>,
    pub on_update: ReferentialAction,
    pub on_delete: ReferentialAction,
    pub is_not_trusted: bool,
    pub is_not_for_replication: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferentialAction {
    #[default]
    NoAction,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    /// Map a `sys.foreign_keys.*_referential_action` code.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => ReferentialAction::Cascade,
            2 => ReferentialAction::SetNull,
            3 => ReferentialAction::SetDefault,
            _ => ReferentialAction::NoAction,
        }
    }

    /// Clause keyword, or `None` for the implicit `NO ACTION`.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            ReferentialAction::NoAction => None,
            ReferentialAction::Cascade => Some("CASCADE"),
            ReferentialAction::SetNull => Some("SET NULL"),
            ReferentialAction::SetDefault => Some("SET DEFAULT"),
        }
    }
}
