use super::*;
use sd_core::{
    CheckConstraint, ComputedSpec, IdentitySpec, ObjectName, ReferentialAction,
};

fn customers() -> TableMetadata {
    let mut table = TableMetadata::new(ObjectName::qualified("dbo", "Customers"));
    table.data_space = Some("PRIMARY".to_string());
    table.database_collation = Some("SQL_Latin1_General_CP1_CI_AS".to_string());

    let mut id = TableColumn::new("Id", "int");
    id.is_nullable = false;
    id.identity = Some(IdentitySpec {
        seed: "1".to_string(),
        increment: "1".to_string(),
    });

    let mut name = TableColumn::new("Name", "nvarchar");
    name.max_length = 200;
    name.is_nullable = false;
    name.collation = Some("SQL_Latin1_General_CP1_CI_AS".to_string());

    let mut created = TableColumn::new("CreatedAt", "datetime2");
    created.scale = 7;
    created.is_nullable = false;
    created.default_definition = Some("(sysutcdatetime())".to_string());

    table.columns = vec![id, name, created];
    table.indexes = vec![TableIndex {
        name: "PK_Customers".to_string(),
        kind: IndexKind::Clustered,
        is_primary_key: true,
        is_unique: true,
        key_columns: vec![IndexColumn::asc("Id")],
        data_space: Some("PRIMARY".to_string()),
        ..Default::default()
    }];
    table
}

#[test]
fn test_render_simple_table() {
    let ddl = render_table_ddl(&customers());
    let expected = [
        "SET ANSI_NULLS ON",
        "GO",
        "SET QUOTED_IDENTIFIER ON",
        "GO",
        "CREATE TABLE [dbo].[Customers] (",
        "    [Id] [int] IDENTITY(1,1) NOT NULL,",
        "    [Name] [nvarchar](100) NOT NULL,",
        "    [CreatedAt] [datetime2](7) NOT NULL DEFAULT (sysutcdatetime()),",
        "    CONSTRAINT [PK_Customers] PRIMARY KEY CLUSTERED ([Id] ASC)",
        ")",
        "GO",
        "",
    ]
    .join("\n");
    assert_eq!(ddl, expected);
}

#[test]
fn test_type_suffixes() {
    let mut varchar_max = TableColumn::new("Notes", "varchar");
    varchar_max.max_length = -1;
    assert_eq!(render_type(&varchar_max), "[varchar](MAX)");

    let mut amount = TableColumn::new("Amount", "decimal");
    amount.precision = 18;
    amount.scale = 2;
    assert_eq!(render_type(&amount), "[decimal](18, 2)");

    let mut hash = TableColumn::new("Hash", "varbinary");
    hash.max_length = 32;
    assert_eq!(render_type(&hash), "[varbinary](32)");

    assert_eq!(render_type(&TableColumn::new("Flag", "bit")), "[bit]");
}

#[test]
fn test_computed_column_omits_type_and_nullability() {
    let mut total = TableColumn::new("Total", "decimal");
    total.computed = Some(ComputedSpec {
        definition: "([Qty]*[Price])".to_string(),
        persisted: true,
    });
    assert_eq!(
        render_column(&total, None),
        "[Total] AS ([Qty]*[Price]) PERSISTED"
    );
}

#[test]
fn test_column_flags_in_order() {
    let mut col = TableColumn::new("RowId", "uniqueidentifier");
    col.is_nullable = false;
    col.default_definition = Some("(newid())".to_string());
    col.collation = Some("Latin1_General_BIN".to_string());
    col.is_rowguidcol = true;
    col.check_definitions = vec!["([RowId]<>'00000000-0000-0000-0000-000000000000')".to_string()];
    assert_eq!(
        render_column(&col, Some("SQL_Latin1_General_CP1_CI_AS")),
        "[RowId] [uniqueidentifier] NOT NULL DEFAULT (newid()) COLLATE Latin1_General_BIN \
ROWGUIDCOL CHECK ([RowId]<>'00000000-0000-0000-0000-000000000000')"
    );
}

#[test]
fn test_column_keeps_every_check() {
    let mut col = TableColumn::new("Rate", "int");
    col.check_definitions = vec!["([Rate]>=(0))".to_string(), "([Rate]<=(100))".to_string()];
    assert_eq!(
        render_column(&col, None),
        "[Rate] [int] NULL CHECK ([Rate]>=(0)) CHECK ([Rate]<=(100))"
    );
}

#[test]
fn test_table_constraints_and_placement() {
    let mut table = TableMetadata::new(ObjectName::qualified("sales", "Orders"));
    table.columns = vec![TableColumn::new("Id", "int"), TableColumn::new("Code", "char")];
    table.columns[1].max_length = 8;
    table.check_constraints = vec![CheckConstraint {
        name: "CK_Orders_Id".to_string(),
        definition: "([Id]>(0))".to_string(),
    }];
    table.indexes = vec![
        TableIndex {
            name: "UQ_Orders_Code".to_string(),
            is_unique_constraint: true,
            is_unique: true,
            key_columns: vec![IndexColumn::desc("Code")],
            ..Default::default()
        },
        TableIndex {
            name: "PK_Orders".to_string(),
            kind: IndexKind::Clustered,
            is_primary_key: true,
            key_columns: vec![IndexColumn::asc("Id")],
            data_space: Some("FG_DATA".to_string()),
            ..Default::default()
        },
    ];
    table.data_space = Some("FG_DATA".to_string());
    table.compression = DataCompression::Page;

    let ddl = render_table_ddl(&table);
    assert!(ddl.contains("    CONSTRAINT [CK_Orders_Id] CHECK ([Id]>(0)),\n"));
    assert!(ddl.contains("    CONSTRAINT [UQ_Orders_Code] UNIQUE NONCLUSTERED ([Code] DESC),\n"));
    assert!(ddl.contains(
        "    CONSTRAINT [PK_Orders] PRIMARY KEY CLUSTERED ([Id] ASC) ON [FG_DATA]\n)"
    ));
    assert!(ddl.contains(") ON [FG_DATA] WITH (DATA_COMPRESSION = PAGE)\nGO\n"));
    // unique-constraint index is not emitted as a standalone index
    assert!(!ddl.contains("CREATE UNIQUE NONCLUSTERED INDEX"));
}

#[test]
fn test_standalone_index() {
    let mut table = customers();
    table.indexes.push(TableIndex {
        name: "IX_Customers_Name".to_string(),
        is_unique: true,
        key_columns: vec![IndexColumn::asc("Name")],
        included_columns: vec!["CreatedAt".to_string()],
        data_space: Some("PRIMARY".to_string()),
        compression: DataCompression::Row,
        ..Default::default()
    });
    let ddl = render_table_ddl(&table);
    assert!(ddl.contains(
        "\nCREATE UNIQUE NONCLUSTERED INDEX [IX_Customers_Name] ON [dbo].[Customers] \
([Name] ASC) INCLUDE ([CreatedAt]) WITH (DATA_COMPRESSION = ROW)\nGO\n"
    ));
}

#[test]
fn test_foreign_keys_sorted_by_name() {
    let mut table = TableMetadata::new(ObjectName::qualified("dbo", "Orders"));
    table.columns = vec![TableColumn::new("CustomerId", "int")];
    let fk = |name: &str, not_trusted: bool| ForeignKey {
        name: name.to_string(),
        columns: vec!["CustomerId".to_string()],
        referenced_table: ObjectName::qualified("dbo", "Customers"),
        referenced_columns: vec!["Id".to_string()],
        on_update: ReferentialAction::NoAction,
        on_delete: ReferentialAction::Cascade,
        is_not_trusted: not_trusted,
        is_not_for_replication: false,
    };
    table.foreign_keys = vec![fk("FK_b", true), fk("FK_a", false)];

    let ddl = render_table_ddl(&table);
    let a = ddl
        .find("ALTER TABLE [dbo].[Orders] WITH CHECK ADD CONSTRAINT [FK_a] FOREIGN KEY ([CustomerId]) \
REFERENCES [dbo].[Customers] ([Id]) ON DELETE CASCADE\nGO\n")
        .unwrap();
    let b = ddl.find("WITH NOCHECK ADD CONSTRAINT [FK_b]").unwrap();
    assert!(a < b);
    assert!(crate::has_enforced_dependencies(&ddl));
}

#[test]
fn test_triggers_appended() {
    let mut table = customers();
    table.triggers = vec!["CREATE TRIGGER dbo.trg_Customers ON dbo.Customers AFTER INSERT AS SELECT 1\n".to_string()];
    let ddl = render_table_ddl(&table);
    assert!(ddl.ends_with(
        "\nCREATE TRIGGER dbo.trg_Customers ON dbo.Customers AFTER INSERT AS SELECT 1\nGO\n"
    ));
}
