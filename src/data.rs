use std::fmt;

use serde::{Deserialize, Serialize};

/// Tokens that load as a missing cell regardless of column type.
pub const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Closed set of column type tags decided once at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    Text,
    Boolean,
    Missing,
}

impl ColumnType {
    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Text => "text",
            ColumnType::Boolean => "boolean",
            ColumnType::Missing => "missing",
        }
    }

    /// Integer, float and all-missing columns take part in numeric statistics.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ColumnType::Integer | ColumnType::Float | ColumnType::Missing
        )
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self, ColumnType::Text | ColumnType::Boolean)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ColumnType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" => Ok(ColumnType::Integer),
            "float" => Ok(ColumnType::Float),
            "text" | "string" => Ok(ColumnType::Text),
            "boolean" | "bool" => Ok(ColumnType::Boolean),
            "missing" => Ok(ColumnType::Missing),
            other => Err(format!("Unknown column type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
    Missing,
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Integer(i) => Some(*i as f64),
            Cell::Float(f) if !f.is_nan() => Some(*f),
            _ => None,
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            Cell::Integer(i) => i.to_string(),
            Cell::Float(f) => {
                if f.fract() == 0.0 && f.is_finite() {
                    format!("{f:.1}")
                } else {
                    f.to_string()
                }
            }
            Cell::Boolean(b) => b.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Missing => String::new(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

pub fn is_missing_token(value: &str) -> bool {
    let trimmed = value.trim();
    MISSING_MARKERS.contains(&trimmed)
}

pub fn parse_boolean_token(value: &str) -> Option<bool> {
    match value.trim() {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

pub fn parse_integer_token(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

pub fn parse_float_token(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    // Rust accepts "inf"/"NaN" spellings that should stay text or missing.
    if !trimmed.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Converts a raw token into a cell of the decided column type.
pub fn parse_cell(value: &str, ty: ColumnType) -> Cell {
    if is_missing_token(value) {
        return Cell::Missing;
    }
    match ty {
        ColumnType::Integer => parse_integer_token(value)
            .map(Cell::Integer)
            .unwrap_or(Cell::Missing),
        ColumnType::Float => parse_float_token(value)
            .map(Cell::Float)
            .unwrap_or(Cell::Missing),
        ColumnType::Boolean => parse_boolean_token(value)
            .map(Cell::Boolean)
            .unwrap_or(Cell::Missing),
        ColumnType::Text => Cell::Text(value.to_string()),
        ColumnType::Missing => Cell::Missing,
    }
}
