//! Relation extraction from view and macro definitions.
//!
//! DuckDB keeps no expression-dependency catalog, so its backend recovers a
//! view's or macro's first-level dependencies by walking the parsed AST.

use crate::error::{SqlError, SqlResult};
use sd_core::ObjectName;
use sqlparser::ast::{self, Query, Visit, Visitor};
use sqlparser::dialect::DuckDbDialect;
use sqlparser::parser::Parser;
use std::collections::HashSet;
use std::ops::ControlFlow;

/// Collects relation names, skipping references to CTEs.
#[derive(Default)]
struct RelationCollector {
    cte_names: HashSet<String>,
    seen: HashSet<String>,
    relations: Vec<ObjectName>,
}

impl Visitor for RelationCollector {
    type Break = ();

    fn pre_visit_query(&mut self, query: &Query) -> ControlFlow<Self::Break> {
        if let Some(with) = &query.with {
            for cte in &with.cte_tables {
                self.cte_names.insert(cte.alias.name.value.to_lowercase());
            }
        }
        ControlFlow::Continue(())
    }

    fn pre_visit_relation(&mut self, relation: &ast::ObjectName) -> ControlFlow<Self::Break> {
        let parts: Vec<&str> = relation
            .0
            .iter()
            .filter_map(|p| p.as_ident())
            .map(|ident| ident.value.as_str())
            .collect();

        let name = match parts.as_slice() {
            [] => return ControlFlow::Continue(()),
            [only] => {
                if self.cte_names.contains(&only.to_lowercase()) {
                    return ControlFlow::Continue(());
                }
                ObjectName::unqualified(*only)
            }
            [.., schema, name] => ObjectName::qualified(*schema, *name),
        };

        if self.seen.insert(name.canonical_key()) {
            self.relations.push(name);
        }
        ControlFlow::Continue(())
    }
}

/// Extract the tables, views and table functions a definition reads.
///
/// `sql` may be a full statement (`CREATE VIEW ... AS SELECT ...`), a bare
/// query, or a scalar expression; an expression is retried as `SELECT <sql>`.
/// Names are returned once each, in order of first appearance. CTE names are
/// not relations and are skipped.
pub fn extract_relations(sql: &str) -> SqlResult<Vec<ObjectName>> {
    let sql = sql.trim().trim_end_matches(';').trim();
    if sql.is_empty() {
        return Err(SqlError::EmptySql);
    }

    let dialect = DuckDbDialect {};
    let statements = match Parser::parse_sql(&dialect, sql) {
        Ok(statements) => statements,
        Err(first) => Parser::parse_sql(&dialect, &format!("SELECT {sql}"))
            .map_err(|_| SqlError::ParseError(first.to_string()))?,
    };

    let mut collector = RelationCollector::default();
    for statement in &statements {
        let _ = statement.visit(&mut collector);
    }
    Ok(collector.relations)
}

#[cfg(test)]
#[path = "relations_test.rs"]
mod tests;
