//! Error kinds surfaced to the user as one-line messages.
//!
//! Each error is recovered where it occurs: the session converts it into a
//! message on the rendered frame and keeps running.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::{data::ColumnType, source::SourceKind};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("File '{name}' is not an accepted {kind} file (expected one of: {expected})")]
    UnsupportedExtension {
        name: String,
        kind: SourceKind,
        expected: String,
    },
    #[error("File is {bytes} bytes which exceeds the {limit} byte upload limit")]
    TooLarge { bytes: u64, limit: u64 },
    #[error("Unknown encoding '{0}'")]
    UnknownEncoding(String),
    #[error("Failed to decode text with encoding {0}")]
    Decode(&'static str),
    #[error("No columns to parse from file")]
    Empty,
    #[error("Malformed CSV: {0}")]
    Malformed(String),
    #[error("Unreadable workbook: {0}")]
    Workbook(String),
    #[error("A sheet name is required to read an Excel file")]
    SheetRequired,
    #[error("Worksheet '{sheet}' not found (available: {})", .available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },
    #[error("Header row {header_row} is out of range for a sheet with {rows} row(s)")]
    HeaderRowOutOfRange { header_row: usize, rows: usize },
    #[error("Header row {header_row} exceeds the maximum of {max}")]
    HeaderRowTooLarge { header_row: usize, max: usize },
    #[error("Inconsistent table shape: {0}")]
    Shape(#[from] ShapeError),
}

impl LoadError {
    /// One-line reason shown in place of the affected panel.
    pub fn reason(&self) -> String {
        format!("Error loading file: {self}")
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("column '{column}' has {actual} cell(s) but the table has {expected} row(s)")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Writing visualization output: {0}")]
    Io(#[from] io::Error),
    #[error("Serializing visualization spec: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("{0}")]
    Display(String),
}

impl RenderError {
    pub fn reason(&self) -> String {
        format!("Error occurred: {self}")
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InsightError {
    #[error("Column '{0}' not found")]
    UnknownColumn(String),
    #[error("Column '{column}' is {column_type}; value distribution needs a text column")]
    NotTextColumn {
        column: String,
        column_type: ColumnType,
    },
}
