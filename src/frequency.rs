use std::collections::HashMap;

use itertools::Itertools;
use log::info;
use serde::Serialize;

use crate::{
    data::{Cell, ColumnType},
    dataset::Table,
    error::InsightError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueDistribution {
    pub field: String,
    pub total: usize,
    pub values: Vec<ValueCount>,
}

impl ValueDistribution {
    pub fn pairs(&self) -> Vec<(&str, usize)> {
        self.values
            .iter()
            .map(|item| (item.value.as_str(), item.count))
            .collect()
    }

    pub fn render_rows(&self) -> Vec<Vec<String>> {
        self.values
            .iter()
            .map(|item| {
                let percent = if self.total > 0 {
                    (item.count as f64 / self.total as f64) * 100.0
                } else {
                    0.0
                };
                vec![
                    item.value.clone(),
                    item.count.to_string(),
                    format!("{percent:.2}%"),
                ]
            })
            .collect()
    }
}

/// Outcome of the value distribution view. Tables without text columns have
/// nothing to count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Distribution {
    NotApplicable,
    Counts(ValueDistribution),
}

impl Distribution {
    pub fn counts(&self) -> Option<&ValueDistribution> {
        match self {
            Distribution::Counts(counts) => Some(counts),
            Distribution::NotApplicable => None,
        }
    }
}

/// Counts non-missing values, most frequent first; equal counts keep the
/// order in which values first appear.
pub fn value_counts(cells: &[Cell]) -> Vec<ValueCount> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<ValueCount> = Vec::new();
    for cell in cells.iter().filter(|cell| !cell.is_missing()) {
        let value = cell.as_display();
        match positions.get(&value) {
            Some(&idx) => counts[idx].count += 1,
            None => {
                positions.insert(value.clone(), counts.len());
                counts.push(ValueCount { value, count: 1 });
            }
        }
    }
    counts
        .into_iter()
        .sorted_by(|a, b| b.count.cmp(&a.count))
        .collect()
}

pub fn text_fields(table: &Table) -> Vec<&str> {
    table.text_columns().map(|column| column.name()).collect()
}

/// Computes the distribution for `field`, or for the first text column when
/// no field is chosen.
pub fn value_distribution(
    table: &Table,
    field: Option<&str>,
) -> Result<Distribution, InsightError> {
    let column = match field {
        Some(name) => {
            let column = table
                .column(name)
                .ok_or_else(|| InsightError::UnknownColumn(name.to_string()))?;
            if column.column_type() != ColumnType::Text {
                return Err(InsightError::NotTextColumn {
                    column: name.to_string(),
                    column_type: column.column_type(),
                });
            }
            column
        }
        None => match table.text_columns().next() {
            Some(column) => column,
            None => return Ok(Distribution::NotApplicable),
        },
    };
    let values = value_counts(column.cells());
    info!(
        "Computed {} distinct value(s) for '{}'",
        values.len(),
        column.name()
    );
    Ok(Distribution::Counts(ValueDistribution {
        field: column.name().to_string(),
        total: column.non_null_count(),
        values,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;

    fn text(values: &[&str]) -> Vec<Cell> {
        values
            .iter()
            .map(|v| {
                if v.is_empty() {
                    Cell::Missing
                } else {
                    Cell::Text(v.to_string())
                }
            })
            .collect()
    }

    #[test]
    fn value_counts_sort_by_count_then_first_seen() {
        let counts = value_counts(&text(&["b", "a", "", "a", "c", "b", "a"]));
        let pairs = counts
            .iter()
            .map(|c| (c.value.as_str(), c.count))
            .collect::<Vec<_>>();
        assert_eq!(pairs, vec![("a", 3), ("b", 2), ("c", 1)]);
    }

    #[test]
    fn ties_follow_first_appearance() {
        let counts = value_counts(&text(&["z", "y", "x"]));
        let values = counts.iter().map(|c| c.value.as_str()).collect::<Vec<_>>();
        assert_eq!(values, vec!["z", "y", "x"]);
    }

    #[test]
    fn no_text_columns_is_not_applicable() {
        let table = Table::with_dense_index(vec![Column::new(
            "Id",
            ColumnType::Integer,
            vec![Cell::Integer(1)],
        )])
        .unwrap();
        assert_eq!(
            value_distribution(&table, None).unwrap(),
            Distribution::NotApplicable
        );
        assert_eq!(
            value_distribution(&Table::empty(), None).unwrap(),
            Distribution::NotApplicable
        );
    }

    #[test]
    fn non_text_field_is_rejected() {
        let table = Table::with_dense_index(vec![Column::new(
            "Id",
            ColumnType::Integer,
            vec![Cell::Integer(1)],
        )])
        .unwrap();
        assert_eq!(
            value_distribution(&table, Some("Id")).unwrap_err(),
            InsightError::NotTextColumn {
                column: "Id".into(),
                column_type: ColumnType::Integer
            }
        );
        assert_eq!(
            value_distribution(&table, Some("Nope")).unwrap_err(),
            InsightError::UnknownColumn("Nope".into())
        );
    }

    #[test]
    fn render_rows_include_percent_of_non_missing() {
        let table = Table::with_dense_index(vec![Column::new(
            "Status",
            ColumnType::Text,
            text(&["open", "closed", "open", ""]),
        )])
        .unwrap();
        let distribution = value_distribution(&table, None).unwrap();
        let rows = distribution.counts().unwrap().render_rows();
        assert_eq!(rows[0], vec!["open", "2", "66.67%"]);
        assert_eq!(rows[1], vec!["closed", "1", "33.33%"]);
    }

    #[test]
    fn zero_row_text_column_yields_empty_counts() {
        let table =
            Table::with_dense_index(vec![Column::new("Name", ColumnType::Text, vec![])]).unwrap();
        let distribution = value_distribution(&table, Some("Name")).unwrap();
        let counts = distribution.counts().unwrap();
        assert!(counts.values.is_empty());
        assert_eq!(counts.total, 0);
    }
}
