use serde::Serialize;

use crate::{data::ColumnType, dataset::Table};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldType {
    pub name: String,
    pub field_type: ColumnType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldTypeReport {
    pub fields: Vec<FieldType>,
}

impl FieldTypeReport {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn render_rows(&self) -> Vec<Vec<String>> {
        self.fields
            .iter()
            .map(|field| vec![field.name.clone(), field.field_type.to_string()])
            .collect()
    }
}

/// Lists each column with its type, ordered by type label descending. The
/// sort is stable so equal labels keep column order.
pub fn field_types(table: &Table) -> FieldTypeReport {
    let mut fields = table
        .columns()
        .iter()
        .map(|column| FieldType {
            name: column.name().to_string(),
            field_type: column.column_type(),
        })
        .collect::<Vec<_>>();
    fields.sort_by(|a, b| b.field_type.label().cmp(a.field_type.label()));
    FieldTypeReport { fields }
}
