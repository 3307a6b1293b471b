//! End-to-end discovery against an in-memory DuckDB catalog.

use sd_core::{CacheFiles, DependencyType, ObjectName, ObjectType, PopulationType};
use sd_db::DuckDbCatalog;
use sd_discover::{discover, extract_routines, ExtractTargets, ObjectFilter};
use tempfile::TempDir;

fn seeded_catalog() -> DuckDbCatalog {
    let db = DuckDbCatalog::in_memory().unwrap();
    db.execute_batch(
        r#"
        CREATE SEQUENCE customer_ids;
        CREATE TABLE customers (
            id INTEGER DEFAULT nextval('customer_ids') PRIMARY KEY,
            name VARCHAR NOT NULL
        );
        CREATE TABLE orders (
            id INTEGER PRIMARY KEY,
            customer_id INTEGER REFERENCES customers(id),
            total DECIMAL(12, 2)
        );
        CREATE VIEW customer_orders AS
            SELECT c.name, o.total FROM customers c JOIN orders o ON o.customer_id = c.id;
        CREATE MACRO top_customers(n) AS TABLE
            SELECT name FROM customer_orders ORDER BY total DESC LIMIT n;
        CREATE SCHEMA tsqlt_fakes;
        CREATE MACRO tsqlt_fakes.fake_orders() AS TABLE SELECT * FROM orders;
        "#,
    )
    .unwrap();
    db
}

#[tokio::test]
async fn test_discover_writes_both_caches() {
    let catalog = seeded_catalog();
    let output = discover(&catalog, &ObjectFilter::new(["tSQLt"]))
        .await
        .unwrap();

    let subjects: Vec<String> = output.procedures.iter().map(|p| p.name.to_string()).collect();
    assert_eq!(subjects, vec!["main.top_customers", "main.customer_orders"]);

    let macro_entry = &output.procedures[0];
    assert_eq!(macro_entry.dependencies.len(), 1);
    assert_eq!(macro_entry.dependencies[0].dependency_type, DependencyType::View);
    assert!(macro_entry.dependencies[0].columns.is_some());

    let view_entry = &output.procedures[1];
    let customers = view_entry
        .dependencies
        .iter()
        .find(|d| d.name == ObjectName::qualified("main", "customers"))
        .unwrap();
    let id = &customers.columns.as_ref().unwrap()[0];
    assert_eq!(id.population_type, Some(PopulationType::Identity));

    let script_types: Vec<ObjectType> = output.scripts.iter().map(|s| s.object_type).collect();
    assert_eq!(
        script_types,
        vec![
            ObjectType::Table,
            ObjectType::Table,
            ObjectType::View,
            ObjectType::TableValuedFunction
        ]
    );
    let orders = output
        .scripts
        .iter()
        .find(|s| s.name == ObjectName::qualified("main", "orders"))
        .unwrap();
    assert!(sd_sql::has_enforced_dependencies(&orders.definition));

    let tmp = TempDir::new().unwrap();
    let cache = CacheFiles::new(tmp.path().join("output/data"));
    output.write(&cache).unwrap();
    assert!(cache.exist());
    assert_eq!(cache.read_procedure_dependencies().unwrap(), output.procedures);
    assert_eq!(cache.read_object_scripts().unwrap(), output.scripts);
}

#[tokio::test]
async fn test_extract_macro_routines() {
    let catalog = seeded_catalog();
    let tmp = TempDir::new().unwrap();
    let targets = ExtractTargets {
        sql_raw_dir: tmp.path().join("sql_raw"),
        analysis_dir: tmp.path().join("analysis"),
    };

    let extracted = extract_routines(&catalog, &ObjectFilter::new(["tSQLt"]), &[], &targets)
        .await
        .unwrap();
    assert_eq!(extracted.len(), 1);

    let body = std::fs::read_to_string(&extracted[0].path).unwrap();
    assert!(body.starts_with("CREATE MACRO main.top_customers(n) AS TABLE"));
    assert!(targets.analysis_dir.join("main.top_customers").is_dir());
}
