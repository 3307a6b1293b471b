use super::*;

fn extract(sql: &str) -> Vec<String> {
    PatternReferenceExtractor
        .extract(sql)
        .into_iter()
        .map(|n| n.to_string())
        .collect()
}

#[test]
fn test_extracts_from_and_join() {
    let refs = extract(
        "SELECT o.Id FROM dbo.Orders o INNER JOIN [dbo].[Customers] c ON c.Id = o.CustomerId",
    );
    assert_eq!(refs, vec!["dbo.Orders", "dbo.Customers"]);
}

#[test]
fn test_extracts_temp_table_target() {
    let refs = extract("SELECT * INTO #TempStaging FROM dbo.Loans");
    assert_eq!(refs, vec!["#TempStaging", "dbo.Loans"]);
}

#[test]
fn test_extracts_insert_and_update_targets() {
    let refs = extract(
        "INSERT INTO dbo.AuditLog (Msg) VALUES ('x');\nUPDATE dbo.Loans SET Status = 1;",
    );
    assert_eq!(refs, vec!["dbo.AuditLog", "dbo.Loans"]);
}

#[test]
fn test_keywords_are_case_insensitive() {
    let refs = extract("select * from sales.Orders join sales.Lines on 1 = 1");
    assert_eq!(refs, vec!["sales.Orders", "sales.Lines"]);
}

#[test]
fn test_subquery_parenthesis_is_not_a_reference() {
    let refs = extract("SELECT * FROM (SELECT 1 AS x) AS t");
    assert!(refs.is_empty());
}

#[test]
fn test_keyword_inside_identifier_is_ignored() {
    let refs = extract("SELECT DateFROM x, UpdatedBy FROM dbo.T");
    assert_eq!(refs, vec!["dbo.T"]);
}

#[test]
fn test_keeps_duplicates_in_order() {
    let refs = extract("DELETE FROM dbo.A; SELECT * FROM dbo.B; SELECT * FROM dbo.A");
    assert_eq!(refs, vec!["dbo.A", "dbo.B", "dbo.A"]);
}

#[test]
fn test_trait_object_usage() {
    let extractor: Box<dyn ReferenceExtractor> = Box::new(PatternReferenceExtractor);
    let refs = extractor.extract("SELECT * FROM [dbo].[Order Details]");
    assert_eq!(refs[0].name(), "Order Details");
}
