//! Descriptive statistics for the data summary view.
//!
//! The report is a grid: one column per table column and one labeled row per
//! statistic. The first row always holds per-column null counts. Numeric
//! statistics are rounded to two decimal places; statistics that do not apply
//! to a column's type are left empty.

use std::fmt;

use log::info;
use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};
use serde::{Serialize, Serializer};

use crate::{
    data::Cell,
    dataset::{Column, Table},
    frequency,
};

pub const COUNT_NULL_LABEL: &str = "Count Null";
pub const COUNT_LABEL: &str = "count";
pub const CATEGORICAL_LABELS: [&str; 3] = ["unique", "top", "freq"];
pub const NUMERIC_LABELS: [&str; 7] = ["mean", "std", "min", "25%", "50%", "75%", "max"];
const ROUND_DP: u32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum SummaryCell {
    Empty,
    Count(usize),
    Number(Decimal),
    /// Statistic beyond the range of `Decimal`.
    Float(f64),
    Text(String),
}

impl SummaryCell {
    pub fn is_empty(&self) -> bool {
        matches!(self, SummaryCell::Empty)
    }

    fn rounded(value: Option<f64>) -> Self {
        value
            .filter(|v| v.is_finite())
            .map(|v| match Decimal::from_f64(v) {
                Some(d) => SummaryCell::Number(d.round_dp(ROUND_DP)),
                // Values this large carry no fractional digits to round.
                None => SummaryCell::Float(v),
            })
            .unwrap_or(SummaryCell::Empty)
    }
}

impl fmt::Display for SummaryCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryCell::Empty => Ok(()),
            SummaryCell::Count(count) => write!(f, "{count}"),
            SummaryCell::Number(number) => write!(f, "{}", number.normalize()),
            SummaryCell::Float(value) => write!(f, "{value}"),
            SummaryCell::Text(text) => f.write_str(text),
        }
    }
}

impl Serialize for SummaryCell {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            SummaryCell::Empty => serializer.serialize_str(""),
            SummaryCell::Count(count) => serializer.serialize_u64(*count as u64),
            SummaryCell::Number(number) => match number.to_f64() {
                Some(value) => serializer.serialize_f64(value),
                None => serializer.serialize_str(&number.to_string()),
            },
            SummaryCell::Float(value) => serializer.serialize_f64(*value),
            SummaryCell::Text(text) => serializer.serialize_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub label: String,
    pub cells: Vec<SummaryCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    pub columns: Vec<String>,
    pub rows: Vec<SummaryRow>,
}

impl SummaryReport {
    pub fn row(&self, label: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|row| row.label == label)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.label.as_str()).collect()
    }

    pub fn cell(&self, label: &str, column: &str) -> Option<&SummaryCell> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.row(label)?.cells.get(idx)
    }

    pub fn headers(&self) -> Vec<String> {
        std::iter::once(String::new())
            .chain(self.columns.iter().cloned())
            .collect()
    }

    pub fn render_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                std::iter::once(row.label.clone())
                    .chain(row.cells.iter().map(SummaryCell::to_string))
                    .collect()
            })
            .collect()
    }
}

pub fn summarize(table: &Table) -> SummaryReport {
    let has_categorical = table
        .columns()
        .iter()
        .any(|c| c.column_type().is_categorical());
    let has_numeric = table
        .columns()
        .iter()
        .any(|c| c.column_type().is_numeric());

    let mut labels = vec![COUNT_NULL_LABEL, COUNT_LABEL];
    if has_categorical {
        labels.extend(CATEGORICAL_LABELS);
    }
    if has_numeric || !has_categorical {
        labels.extend(NUMERIC_LABELS);
    }

    let stats = table
        .columns()
        .iter()
        .map(ColumnStats::from_column)
        .collect::<Vec<_>>();
    let rows = labels
        .into_iter()
        .map(|label| SummaryRow {
            label: label.to_string(),
            cells: stats.iter().map(|s| s.cell(label)).collect(),
        })
        .collect::<Vec<_>>();

    info!(
        "Computed summary statistics for {} column(s) over {} row(s)",
        table.column_count(),
        table.row_count()
    );
    SummaryReport {
        columns: table.column_names().into_iter().map(String::from).collect(),
        rows,
    }
}

enum Profile {
    Numeric {
        mean: Option<f64>,
        std: Option<f64>,
        min: Option<f64>,
        quartiles: [Option<f64>; 3],
        max: Option<f64>,
    },
    Categorical {
        unique: usize,
        top: Option<(String, usize)>,
    },
}

struct ColumnStats {
    nulls: usize,
    count: usize,
    profile: Profile,
}

impl ColumnStats {
    fn from_column(column: &Column) -> Self {
        let profile = if column.column_type().is_numeric() {
            let mut values = column
                .cells()
                .iter()
                .filter_map(Cell::as_f64)
                .collect::<Vec<_>>();
            values.sort_by(f64::total_cmp);
            let mean = mean(&values);
            Profile::Numeric {
                mean,
                std: std_dev(&values, mean),
                min: values.first().copied(),
                quartiles: [
                    quantile(&values, 0.25),
                    quantile(&values, 0.5),
                    quantile(&values, 0.75),
                ],
                max: values.last().copied(),
            }
        } else {
            let counts = frequency::value_counts(column.cells());
            Profile::Categorical {
                unique: counts.len(),
                top: counts.into_iter().next().map(|top| (top.value, top.count)),
            }
        };
        Self {
            nulls: column.null_count(),
            count: column.non_null_count(),
            profile,
        }
    }

    fn cell(&self, label: &str) -> SummaryCell {
        match (label, &self.profile) {
            (COUNT_NULL_LABEL, _) => SummaryCell::Count(self.nulls),
            (COUNT_LABEL, _) => SummaryCell::Count(self.count),
            ("unique", Profile::Categorical { unique, .. }) => SummaryCell::Count(*unique),
            ("top", Profile::Categorical { top, .. }) => top
                .as_ref()
                .map(|(value, _)| SummaryCell::Text(value.clone()))
                .unwrap_or(SummaryCell::Empty),
            ("freq", Profile::Categorical { top, .. }) => top
                .as_ref()
                .map(|(_, count)| SummaryCell::Count(*count))
                .unwrap_or(SummaryCell::Empty),
            ("mean", Profile::Numeric { mean, .. }) => SummaryCell::rounded(*mean),
            ("std", Profile::Numeric { std, .. }) => SummaryCell::rounded(*std),
            ("min", Profile::Numeric { min, .. }) => SummaryCell::rounded(*min),
            ("25%", Profile::Numeric { quartiles, .. }) => SummaryCell::rounded(quartiles[0]),
            ("50%", Profile::Numeric { quartiles, .. }) => SummaryCell::rounded(quartiles[1]),
            ("75%", Profile::Numeric { quartiles, .. }) => SummaryCell::rounded(quartiles[2]),
            ("max", Profile::Numeric { max, .. }) => SummaryCell::rounded(*max),
            _ => SummaryCell::Empty,
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
fn std_dev(values: &[f64], mean: Option<f64>) -> Option<f64> {
    let mean = mean?;
    if values.len() < 2 {
        return None;
    }
    let sum_squares = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    Some((sum_squares / (values.len() as f64 - 1.0)).sqrt())
}

/// Linear interpolation between closest ranks of sorted values.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}
