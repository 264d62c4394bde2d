//! Column type inference and typed table assembly.
//!
//! Both loaders reduce their input to a header row plus rows of raw string
//! tokens. This module decides one [`ColumnType`] per column from those tokens
//! and converts every token into a typed [`Cell`].
//!
//! ## Decision order
//!
//! Over the non-missing tokens of a column:
//!
//! 1. none at all → `missing`
//! 2. every token boolean → `boolean`
//! 3. every token an integer → `integer`
//! 4. every token an integer or float → `float`
//! 5. anything else → `text`

use log::debug;

use crate::{
    data::{
        Cell, ColumnType, is_missing_token, parse_boolean_token, parse_cell, parse_float_token,
        parse_integer_token,
    },
    dataset::{Column, Table},
    error::ShapeError,
};

#[derive(Debug, Clone, Default)]
struct TypeCandidate {
    non_missing: usize,
    boolean_matches: usize,
    integer_matches: usize,
    float_matches: usize,
}

impl TypeCandidate {
    fn update(&mut self, value: &str) {
        if is_missing_token(value) {
            return;
        }
        self.non_missing += 1;
        if parse_boolean_token(value).is_some() {
            self.boolean_matches += 1;
        }
        if parse_integer_token(value).is_some() {
            self.integer_matches += 1;
            self.float_matches += 1;
        } else if parse_float_token(value).is_some() {
            self.float_matches += 1;
        }
    }

    fn decide(&self) -> ColumnType {
        if self.non_missing == 0 {
            ColumnType::Missing
        } else if self.boolean_matches == self.non_missing {
            ColumnType::Boolean
        } else if self.integer_matches == self.non_missing {
            ColumnType::Integer
        } else if self.float_matches == self.non_missing {
            ColumnType::Float
        } else {
            ColumnType::Text
        }
    }
}

pub fn infer_column_type<'a, I>(tokens: I) -> ColumnType
where
    I: IntoIterator<Item = &'a str>,
{
    let mut candidate = TypeCandidate::default();
    for token in tokens {
        candidate.update(token);
    }
    candidate.decide()
}

/// Header label used for blank header cells, numbered by column position.
pub fn unnamed_header(position: usize) -> String {
    format!("Unnamed: {position}")
}

pub fn resolve_headers(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .enumerate()
        .map(|(idx, header)| {
            if header.trim().is_empty() {
                unnamed_header(idx)
            } else {
                header
            }
        })
        .collect()
}

/// Assembles a typed table from string rows. Short rows are padded with
/// missing cells; extra trailing fields are ignored.
pub fn build_table(
    headers: Vec<String>,
    rows: &[Vec<String>],
    index: Vec<usize>,
) -> Result<Table, ShapeError> {
    let headers = resolve_headers(headers);
    let mut columns = Vec::with_capacity(headers.len());
    for (col_idx, header) in headers.into_iter().enumerate() {
        let datatype = infer_column_type(rows.iter().map(|row| token_at(row, col_idx)));
        debug!("Column '{header}' inferred as {datatype}");
        let cells = rows
            .iter()
            .map(|row| parse_cell(token_at(row, col_idx), datatype))
            .collect::<Vec<Cell>>();
        columns.push(Column::new(header, datatype, cells));
    }
    Table::try_new(columns, index)
}

fn token_at(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}
