//! Dependency records and column metadata.
//!
//! These are the types serialized into the dependency tree consumed by the
//! downstream documentation and test generators, so their JSON field names
//! are part of the external contract.

use crate::object_name::ObjectName;
use serde::{Deserialize, Serialize};

/// Kind of a resolved dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DependencyType {
    Table,
    View,
    Function,
    Procedure,
    Trigger,
    /// Found only by text heuristics, not by the catalog. Advisory.
    Referenced,
    #[default]
    #[serde(other)]
    Unknown,
}

impl DependencyType {
    /// Upper-case label as written to JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyType::Table => "TABLE",
            DependencyType::View => "VIEW",
            DependencyType::Function => "FUNCTION",
            DependencyType::Procedure => "PROCEDURE",
            DependencyType::Trigger => "TRIGGER",
            DependencyType::Referenced => "REFERENCED",
            DependencyType::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for DependencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Object type recorded in the create-script cache.
///
/// Finer grained than [`DependencyType`] for functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectType {
    Table,
    View,
    ScalarFunction,
    InlineTableValuedFunction,
    TableValuedFunction,
    Function,
    Procedure,
    Trigger,
    #[serde(other)]
    Other,
}

impl ObjectType {
    /// Collapse to the dependency classification used in resolved records.
    pub fn dependency_type(self) -> DependencyType {
        match self {
            ObjectType::Table => DependencyType::Table,
            ObjectType::View => DependencyType::View,
            ObjectType::ScalarFunction
            | ObjectType::InlineTableValuedFunction
            | ObjectType::TableValuedFunction
            | ObjectType::Function => DependencyType::Function,
            ObjectType::Procedure => DependencyType::Procedure,
            ObjectType::Trigger => DependencyType::Trigger,
            ObjectType::Other => DependencyType::Unknown,
        }
    }
}

/// Mechanism by which the engine supplies a column's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PopulationType {
    Identity,
    Computed,
    Default,
    Rowversion,
    Rowguidcol,
}

/// Catalog metadata for one column.
///
/// `population_type` and `definition` are captured at discovery time so the
/// resolver can classify columns without a live connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(default)]
    pub data_type: String,
    #[serde(default)]
    pub max_length: i32,
    #[serde(default)]
    pub precision: i32,
    #[serde(default)]
    pub scale: i32,
    #[serde(default)]
    pub is_nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population_type: Option<PopulationType>,
    /// Generating expression for computed and default columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

impl ColumnInfo {
    /// Create an ordinary nullable column of the given type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            max_length: 0,
            precision: 0,
            scale: 0,
            is_nullable: true,
            population_type: None,
            definition: None,
        }
    }

    /// Mark the column as engine-populated.
    pub fn populated_by(mut self, kind: PopulationType, definition: Option<&str>) -> Self {
        self.population_type = Some(kind);
        self.definition = definition.map(str::to_string);
        self
    }
}

/// A column whose value is supplied by the engine, never by a writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoPopulatedColumn {
    pub name: String,
    pub population_type: PopulationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

/// One node of a resolved dependency tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub name: String,
    #[serde(rename = "schemaName")]
    pub schema_name: Option<String>,
    #[serde(rename = "type")]
    pub dependency_type: DependencyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_script: Option<String>,
    #[serde(default)]
    pub has_enforced_dependencies: bool,
    #[serde(default)]
    pub auto_populated_columns: Vec<AutoPopulatedColumn>,
    /// Ordinary, externally settable columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<ColumnInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_dependencies: Option<Vec<DependencyRecord>>,
}

impl DependencyRecord {
    /// Create an unenriched record for `name`.
    pub fn new(name: &ObjectName, dependency_type: DependencyType) -> Self {
        Self {
            name: name.name().to_string(),
            schema_name: name.schema().map(str::to_string),
            dependency_type,
            create_script: None,
            has_enforced_dependencies: false,
            auto_populated_columns: Vec::new(),
            columns: None,
            view_dependencies: None,
        }
    }

    /// Reassemble the object name this record describes.
    pub fn object_name(&self) -> ObjectName {
        match &self.schema_name {
            Some(schema) => ObjectName::qualified(schema.clone(), self.name.clone()),
            None => ObjectName::unqualified(self.name.clone()),
        }
    }
}

#[cfg(test)]
#[path = "dependency_test.rs"]
mod tests;
