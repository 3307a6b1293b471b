use super::*;
use tempfile::TempDir;

fn sample_procedures() -> Vec<ProcedureDependencies> {
    let mut orders = CachedDependency::new(
        ObjectName::qualified("dbo", "Orders"),
        DependencyType::Table,
    );
    orders.columns = Some(vec![ColumnInfo::new("OrderId", "int")]);
    vec![ProcedureDependencies {
        name: ObjectName::qualified("dbo", "GetOrder"),
        dependencies: vec![orders],
    }]
}

#[test]
fn test_write_then_read_caches() {
    let tmp = TempDir::new().unwrap();
    let files = CacheFiles::new(tmp.path().join("output").join("data"));
    let scripts = vec![ObjectScript {
        name: ObjectName::qualified("dbo", "GetOrder"),
        object_type: ObjectType::Procedure,
        definition: "CREATE PROCEDURE dbo.GetOrder AS SELECT 1".to_string(),
    }];

    files.write(&sample_procedures(), &scripts).unwrap();
    assert!(files.exist());

    let procedures = files.read_procedure_dependencies().unwrap();
    assert_eq!(procedures, sample_procedures());
    let read_scripts = files.read_object_scripts().unwrap();
    assert_eq!(read_scripts[0].object_type, ObjectType::Procedure);
}

#[test]
fn test_missing_cache_is_reported() {
    let tmp = TempDir::new().unwrap();
    let files = CacheFiles::new(tmp.path());
    assert!(!files.exist());

    let err = files.read_procedure_dependencies().unwrap_err();
    assert!(matches!(err, CoreError::CacheNotFound { .. }));
    assert!(err.to_string().contains("C003"));
}

#[test]
fn test_malformed_cache_is_reported() {
    let tmp = TempDir::new().unwrap();
    let files = CacheFiles::new(tmp.path());
    std::fs::write(files.object_scripts_path(), "{ not json").unwrap();

    let err = files.read_object_scripts().unwrap_err();
    assert!(matches!(err, CoreError::CacheParse { .. }));
}

#[test]
fn test_reads_original_cache_shape() {
    let json = r#"[
        {
            "name": "dbo.usp_LoadLoans",
            "dependencies": [
                {"name": "dbo.Loans", "type": "TABLE", "columns": [
                    {"name": "LoanId", "data_type": "int", "max_length": 4,
                     "precision": 10, "scale": 0, "is_nullable": false}
                ]},
                {"name": "dbo.fn_Rate", "type": "FUNCTION", "definition": "CREATE FUNCTION dbo.fn_Rate() RETURNS INT AS BEGIN RETURN 1 END"},
                {"name": "dbo.Legacy"}
            ]
        }
    ]"#;
    let tmp = TempDir::new().unwrap();
    let files = CacheFiles::new(tmp.path());
    std::fs::write(files.procedure_dependencies_path(), json).unwrap();

    let procedures = files.read_procedure_dependencies().unwrap();
    let deps = &procedures[0].dependencies;
    assert_eq!(deps.len(), 3);
    assert_eq!(deps[0].columns.as_ref().unwrap()[0].name, "LoanId");
    assert_eq!(deps[1].dependency_type, DependencyType::Function);
    assert!(deps[1].definition.is_some());
    assert_eq!(deps[2].dependency_type, DependencyType::Unknown);
}
