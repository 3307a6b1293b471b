use super::*;

fn names(sql: &str) -> Vec<String> {
    extract_relations(sql)
        .unwrap()
        .into_iter()
        .map(|n| n.to_string())
        .collect()
}

#[test]
fn test_view_statement() {
    let refs = names(
        "CREATE VIEW main.active_loans AS SELECT l.id FROM main.loans l JOIN borrowers b ON b.id = l.borrower_id;",
    );
    assert_eq!(refs, vec!["main.loans", "borrowers"]);
}

#[test]
fn test_bare_query() {
    assert_eq!(names("SELECT * FROM payments WHERE amount > 0"), vec!["payments"]);
}

#[test]
fn test_scalar_expression_is_wrapped() {
    let refs = names("(SELECT max(rate) FROM main.rates WHERE tier = t)");
    assert_eq!(refs, vec!["main.rates"]);
}

#[test]
fn test_cte_names_are_not_relations() {
    let refs = names(
        "WITH recent AS (SELECT * FROM main.payments) SELECT * FROM recent JOIN main.loans USING (loan_id)",
    );
    assert_eq!(refs, vec!["main.payments", "main.loans"]);
}

#[test]
fn test_repeated_relation_reported_once() {
    let refs = names("SELECT * FROM t UNION ALL SELECT * FROM T");
    assert_eq!(refs.len(), 1);
}

#[test]
fn test_catalog_prefix_dropped() {
    assert_eq!(names("SELECT * FROM lake.main.loans"), vec!["main.loans"]);
}

#[test]
fn test_expression_without_relations() {
    assert!(names("a + b * 2").is_empty());
}

#[test]
fn test_empty_definition() {
    assert!(matches!(extract_relations("  ;"), Err(SqlError::EmptySql)));
}

#[test]
fn test_unparseable_definition() {
    let err = extract_relations("SELECT FROM WHERE )").unwrap_err();
    assert!(matches!(err, SqlError::ParseError(_)));
}
