//! sd-resolve - Dependency resolution for sqldeps
//!
//! Turns the discovery caches into a recursive dependency tree for one
//! routine. Resolution is synchronous and never touches the database: the
//! caches are loaded once into a [`DependencyStore`] and a single visited
//! set is threaded through the recursion.

pub mod autopop;
pub mod error;
pub mod output;
pub mod resolver;
pub mod store;

pub use autopop::{classify_columns, population_of};
pub use error::{ResolveError, ResolveResult};
pub use output::{dependency_tree_path, format_summary, to_json, write_dependency_tree};
pub use resolver::Resolver;
pub use store::DependencyStore;
