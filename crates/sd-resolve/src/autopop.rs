//! Auto-populated column classification from cached column metadata.

use sd_core::{AutoPopulatedColumn, ColumnInfo, PopulationType};

/// Classification of one column, if the engine supplies its value.
///
/// Discovery records the population type with precedence IDENTITY >
/// COMPUTED > DEFAULT > ROWVERSION > ROWGUIDCOL. Columns cached without one
/// are still recognized as row versions by their type name.
pub fn population_of(column: &ColumnInfo) -> Option<PopulationType> {
    column.population_type.or_else(|| {
        let data_type = column.data_type.to_ascii_lowercase();
        matches!(data_type.as_str(), "timestamp" | "rowversion").then_some(PopulationType::Rowversion)
    })
}

/// Split columns into engine-populated and ordinary settable ones.
///
/// The two lists are disjoint and keep the input order.
pub fn classify_columns(columns: &[ColumnInfo]) -> (Vec<AutoPopulatedColumn>, Vec<ColumnInfo>) {
    let mut auto = Vec::new();
    let mut ordinary = Vec::new();

    for column in columns {
        match population_of(column) {
            Some(population_type) => auto.push(AutoPopulatedColumn {
                name: column.name.clone(),
                population_type,
                definition: match population_type {
                    PopulationType::Computed | PopulationType::Default => column.definition.clone(),
                    _ => None,
                },
            }),
            None => ordinary.push(column.clone()),
        }
    }

    (auto, ordinary)
}
