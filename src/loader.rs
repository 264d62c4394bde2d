//! Dataset loading for CSV and Excel uploads.
//!
//! Both paths reduce the source to a header plus rows of string tokens and
//! hand them to [`schema::build_table`] for type inference. Any failure yields
//! a [`LoadError`] and no partial table.

use std::io::Cursor;

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto_from_rs};
use chrono::Timelike;
use encoding_rs::{Encoding, UTF_8};
use log::{debug, info};

use crate::{
    dataset::Table,
    error::LoadError,
    io_utils,
    schema,
    source::{RawSource, SourceKind},
};

/// Highest header-row index a workbook sheet may declare.
pub const MAX_HEADER_ROW: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: io_utils::DEFAULT_CSV_DELIMITER,
            encoding: UTF_8,
        }
    }
}

pub fn load(source: &RawSource, options: &LoadOptions) -> Result<Table, LoadError> {
    let table = match source.kind() {
        SourceKind::Csv => load_csv(source.bytes(), options)?,
        SourceKind::Excel => {
            let sheet = source.sheet().ok_or(LoadError::SheetRequired)?;
            load_excel(source.bytes(), sheet, source.header_row())?
        }
    };
    info!(
        "Loaded {} row(s) across {} column(s) from '{}'",
        table.row_count(),
        table.column_count(),
        source.name()
    );
    Ok(table)
}

pub fn load_csv(bytes: &[u8], options: &LoadOptions) -> Result<Table, LoadError> {
    let text = io_utils::decode_bytes(bytes, options.encoding)?;
    let mut reader = io_utils::open_csv_reader(text.as_bytes(), options.delimiter);
    let headers = reader
        .headers()
        .map_err(|err| LoadError::Malformed(err.to_string()))?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    if headers.is_empty() {
        return Err(LoadError::Empty);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| LoadError::Malformed(err.to_string()))?;
        if record.len() > headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(LoadError::Malformed(format!(
                "Expected {} fields in line {line}, saw {}",
                headers.len(),
                record.len()
            )));
        }
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }
    debug!("Parsed {} CSV record(s)", rows.len());
    let index = (0..rows.len()).collect();
    Ok(schema::build_table(headers, &rows, index)?)
}

/// Lists workbook sheet names in order without reading any cell data.
pub fn sheet_names(bytes: &[u8]) -> Result<Vec<String>, LoadError> {
    Ok(open_workbook(bytes)?.sheet_names())
}

pub fn load_excel(bytes: &[u8], sheet: &str, header_row: usize) -> Result<Table, LoadError> {
    if header_row > MAX_HEADER_ROW {
        return Err(LoadError::HeaderRowTooLarge {
            header_row,
            max: MAX_HEADER_ROW,
        });
    }
    let mut workbook = open_workbook(bytes)?;
    let available = workbook.sheet_names();
    if !available.iter().any(|name| name == sheet) {
        return Err(LoadError::SheetNotFound {
            sheet: sheet.to_string(),
            available,
        });
    }
    let range = workbook
        .worksheet_range(sheet)
        .map_err(|err| LoadError::Workbook(err.to_string()))?;
    let (headers, rows, index) = split_sheet(&range, header_row)?;
    debug!(
        "Sheet '{sheet}' yields {} data row(s) below header row {header_row}",
        rows.len()
    );
    Ok(schema::build_table(headers, &rows, index)?)
}

fn open_workbook(bytes: &[u8]) -> Result<Sheets<Cursor<Vec<u8>>>, LoadError> {
    open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|err| LoadError::Workbook(err.to_string()))
}

type SheetParts = (Vec<String>, Vec<Vec<String>>, Vec<usize>);

/// Splits a sheet into header tokens and data rows. Row numbers are absolute
/// sheet positions so rows above the used range still count.
fn split_sheet(range: &Range<Data>, header_row: usize) -> Result<SheetParts, LoadError> {
    let offset = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let total_rows = if range.is_empty() {
        0
    } else {
        offset + range.height()
    };
    if header_row >= total_rows {
        return Err(LoadError::HeaderRowOutOfRange {
            header_row,
            rows: total_rows,
        });
    }

    let mut headers = vec![String::new(); range.width()];
    let mut rows = Vec::new();
    let mut index = Vec::new();
    for (position, row) in range.rows().enumerate() {
        let absolute = offset + position;
        if absolute < header_row {
            continue;
        }
        let tokens = row.iter().map(cell_token).collect::<Vec<_>>();
        if absolute == header_row {
            headers = tokens;
        } else {
            rows.push(tokens);
            index.push(absolute);
        }
    }
    Ok((headers, rows, index))
}

fn cell_token(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                format!("{f:.0}")
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) if value.time().num_seconds_from_midnight() == 0 => {
                value.format("%Y-%m-%d").to_string()
            }
            Some(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.to_string(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}
