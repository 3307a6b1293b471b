use super::*;

#[test]
fn test_dependency_type_from_desc() {
    assert_eq!(dependency_type_from_desc("USER_TABLE"), DependencyType::Table);
    assert_eq!(dependency_type_from_desc("VIEW"), DependencyType::View);
    assert_eq!(
        dependency_type_from_desc("SQL_STORED_PROCEDURE"),
        DependencyType::Procedure
    );
    assert_eq!(
        dependency_type_from_desc("SQL_INLINE_TABLE_VALUED_FUNCTION"),
        DependencyType::Function
    );
    assert_eq!(dependency_type_from_desc("SQL_TRIGGER"), DependencyType::Trigger);
    assert_eq!(dependency_type_from_desc("SYNONYM"), DependencyType::Unknown);
}

#[test]
fn test_function_object_type() {
    assert_eq!(function_object_type("SCALAR_FUNCTION"), ObjectType::ScalarFunction);
    assert_eq!(
        function_object_type("TABLE_VALUED_FUNCTION"),
        ObjectType::TableValuedFunction
    );
    assert_eq!(function_object_type("CLR"), ObjectType::Function);
}

#[test]
fn test_population_type_labels() {
    assert_eq!(population_type("IDENTITY"), Some(PopulationType::Identity));
    assert_eq!(population_type("ROWGUIDCOL"), Some(PopulationType::Rowguidcol));
    assert_eq!(population_type(""), None);
}

#[test]
fn test_assemble_indexes() {
    let mut table = TableMetadata::new(ObjectName::qualified("dbo", "Loans"));
    let rows = vec![
        IndexRow {
            index_id: 1,
            name: Some("PK_Loans".to_string()),
            kind: IndexKind::Clustered,
            is_primary_key: true,
            is_unique_constraint: false,
            is_unique: true,
            data_space: Some("PRIMARY".to_string()),
            compression: DataCompression::Page,
        },
        IndexRow {
            index_id: 2,
            name: Some("IX_Loans_Status".to_string()),
            kind: IndexKind::NonClustered,
            is_primary_key: false,
            is_unique_constraint: false,
            is_unique: false,
            data_space: Some("FG_INDEX".to_string()),
            compression: DataCompression::None,
        },
    ];
    let columns = vec![
        IndexColumnRow {
            index_id: 1,
            column: "LoanId".to_string(),
            descending: false,
            included: false,
        },
        IndexColumnRow {
            index_id: 2,
            column: "Status".to_string(),
            descending: true,
            included: false,
        },
        IndexColumnRow {
            index_id: 2,
            column: "Amount".to_string(),
            descending: false,
            included: true,
        },
    ];

    assemble_indexes(&mut table, rows, &columns);

    assert_eq!(table.data_space.as_deref(), Some("PRIMARY"));
    assert_eq!(table.compression, DataCompression::Page);
    assert_eq!(table.indexes.len(), 2);
    assert_eq!(table.indexes[0].key_columns, vec![IndexColumn::asc("LoanId")]);
    assert_eq!(table.indexes[1].key_columns, vec![IndexColumn::desc("Status")]);
    assert_eq!(table.indexes[1].included_columns, vec!["Amount"]);
}

#[test]
fn test_heap_sets_storage_without_index() {
    let mut table = TableMetadata::new(ObjectName::qualified("dbo", "Staging"));
    let rows = vec![IndexRow {
        index_id: 0,
        name: None,
        kind: IndexKind::Heap,
        is_primary_key: false,
        is_unique_constraint: false,
        is_unique: false,
        data_space: Some("FG_STAGE".to_string()),
        compression: DataCompression::Row,
    }];
    assemble_indexes(&mut table, rows, &[]);
    assert!(table.indexes.is_empty());
    assert_eq!(table.data_space.as_deref(), Some("FG_STAGE"));
    assert_eq!(table.compression, DataCompression::Row);
}

#[test]
fn test_attach_column_checks_keeps_every_check() {
    let mut columns = vec![TableColumn::new("Id", "int"), TableColumn::new("Rate", "decimal")];
    let check = |column: &str, definition: &str| ColumnCheckRow {
        column: column.to_string(),
        definition: definition.to_string(),
    };
    let rows = vec![
        check("Rate", "([Rate]>=(0))"),
        check("Rate", "([Rate]<=(1))"),
        check("Dropped", "([Dropped]>(0))"),
    ];

    attach_column_checks(&mut columns, rows);
    assert!(columns[0].check_definitions.is_empty());
    assert_eq!(
        columns[1].check_definitions,
        vec!["([Rate]>=(0))", "([Rate]<=(1))"]
    );
}

#[test]
fn test_assemble_foreign_keys() {
    let keys = vec![ForeignKeyRow {
        constraint_id: 7,
        name: "FK_Loans_Borrowers".to_string(),
        referenced_table: ObjectName::qualified("dbo", "Borrowers"),
        on_update: ReferentialAction::NoAction,
        on_delete: ReferentialAction::Cascade,
        is_not_trusted: false,
        is_not_for_replication: true,
    }];
    let columns = vec![
        ForeignKeyColumnRow {
            constraint_id: 7,
            column: "BorrowerId".to_string(),
            referenced_column: "Id".to_string(),
        },
        ForeignKeyColumnRow {
            constraint_id: 8,
            column: "Other".to_string(),
            referenced_column: "Id".to_string(),
        },
    ];

    let fks = assemble_foreign_keys(keys, &columns);
    assert_eq!(fks.len(), 1);
    assert_eq!(fks[0].columns, vec!["BorrowerId"]);
    assert_eq!(fks[0].referenced_columns, vec!["Id"]);
    assert_eq!(fks[0].on_delete, ReferentialAction::Cascade);
    assert!(fks[0].is_not_for_replication);
}

#[test]
fn test_catalog_queries_are_parameterized() {
    for sql in [
        DEPENDENCIES_SQL,
        COLUMNS_SQL,
        DEFINITION_SQL,
        TABLE_COLUMNS_SQL,
        CHECK_CONSTRAINTS_SQL,
        COLUMN_CHECKS_SQL,
        INDEXES_SQL,
        INDEX_COLUMNS_SQL,
        FOREIGN_KEYS_SQL,
        FOREIGN_KEY_COLUMNS_SQL,
        TABLE_TRIGGERS_SQL,
    ] {
        assert!(sql.contains("@P1"), "missing @P1 in:\n{sql}");
    }
}
