//! sd-sql - SQL text layer for sqldeps
//!
//! Everything here works on SQL *text*: pattern-based discovery of object
//! references in routine bodies, foreign-key detection in create scripts,
//! regeneration of `CREATE TABLE` scripts from catalog metadata, comment
//! stripping, and AST-based relation extraction for engines whose catalog
//! does not record expression dependencies.

pub mod comments;
pub mod ddl;
pub mod enforced;
pub mod error;
pub mod references;
pub mod relations;

pub use comments::strip_comments;
pub use ddl::render_table_ddl;
pub use enforced::has_enforced_dependencies;
pub use error::{SqlError, SqlResult};
pub use references::{PatternReferenceExtractor, ReferenceExtractor};
pub use relations::extract_relations;
