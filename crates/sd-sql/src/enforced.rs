//! Foreign-key detection in create scripts.

use regex::RegexSet;
use std::sync::OnceLock;

static FOREIGN_KEY_PATTERNS: OnceLock<RegexSet> = OnceLock::new();

/// Inline and post-hoc (`ALTER TABLE ... ADD`) foreign-key forms.
///
/// Patterns are case-insensitive and, apart from the bare keywords, confined
/// to a single line like the statements DDL reconstruction emits.
fn foreign_key_patterns() -> &'static RegexSet {
    FOREIGN_KEY_PATTERNS.get_or_init(|| {
        RegexSet::new([
            r"(?i)FOREIGN\s+KEY",
            r#"(?i)REFERENCES\s+[\[\]"\w.]+(\s*\(\s*[\[\]"\w]+)?"#,
            r"(?i)CONSTRAINT\s+\S+\s+FOREIGN\s+KEY",
            r"(?i)ALTER\s+TABLE.*ADD\s+.*FOREIGN\s+KEY",
            r"(?i)ALTER\s+TABLE.*ADD\s+CONSTRAINT.*FOREIGN\s+KEY",
            r"(?i)ALTER\s+TABLE.*ADD\s+.*REFERENCES",
            r"(?i)WITH\s+(NO)?CHECK\s+ADD\s+CONSTRAINT.*FOREIGN\s+KEY",
        ])
        .expect("valid regex set")
    })
}

/// Whether `script` declares a foreign key the engine enforces on write.
///
/// Only answers yes or no; the referenced tables are not enumerated.
pub fn has_enforced_dependencies(script: &str) -> bool {
    !script.is_empty() && foreign_key_patterns().is_match(script)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alter_table_add_constraint_foreign_key() {
        let script = "CREATE TABLE [dbo].[Orders] ([Id] [int] NOT NULL)\nGO\n\
            ALTER TABLE [dbo].[Orders] WITH CHECK ADD CONSTRAINT [FK_Orders_Customers] \
            FOREIGN KEY ([CustomerId]) REFERENCES [dbo].[Customers] ([Id])\nGO\n";
        assert!(has_enforced_dependencies(script));
    }

    #[test]
    fn test_inline_references_clause() {
        let script = "CREATE TABLE orders (id INT, customer_id INT REFERENCES customers(id))";
        assert!(has_enforced_dependencies(script));
    }

    #[test]
    fn test_lowercase_constraint() {
        let script = "create table t (a int, constraint fk_t_u foreign key (a) references u (id))";
        assert!(has_enforced_dependencies(script));
    }

    #[test]
    fn test_plain_table_has_no_enforced_dependencies() {
        let script = "CREATE TABLE [dbo].[Customers] (\n    [Id] [int] IDENTITY(1,1) NOT NULL,\n    \
            CONSTRAINT [PK_Customers] PRIMARY KEY CLUSTERED ([Id] ASC)\n)\nGO\n";
        assert!(!has_enforced_dependencies(script));
    }

    #[test]
    fn test_empty_script() {
        assert!(!has_enforced_dependencies(""));
    }

    #[test]
    fn test_view_text_without_keys() {
        let script = "CREATE VIEW dbo.vActiveCustomers AS SELECT Id FROM dbo.Customers WHERE Active = 1";
        assert!(!has_enforced_dependencies(script));
    }
}
