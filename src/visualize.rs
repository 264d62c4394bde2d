//! Boundary to the interactive charting surface.
//!
//! The session hands the normalized table to a [`Visualizer`] read-only. Any
//! failure comes back as a [`RenderError`] that the caller shows as a single
//! line without ending the session.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::{
    data::{Cell, ColumnType},
    dataset::Table,
    error::RenderError,
    table,
};

pub trait Visualizer {
    fn render(&mut self, table: &Table) -> Result<(), RenderError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ExplorerSize {
    pub mode: String,
    pub width: String,
    pub height: String,
}

impl Default for ExplorerSize {
    fn default() -> Self {
        Self {
            mode: "auto".to_string(),
            width: "auto".to_string(),
            height: "auto".to_string(),
        }
    }
}

/// Chart explorer settings passed through to the charting surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ExplorerSettings {
    pub theme: String,
    pub default_aggregated: bool,
    pub geoms: Vec<String>,
    pub stack: String,
    pub show_actions: bool,
    pub interactive_scale: bool,
    pub sorted: String,
    pub size: ExplorerSize,
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            default_aggregated: true,
            geoms: vec!["auto".to_string()],
            stack: "stack".to_string(),
            show_actions: false,
            interactive_scale: false,
            sorted: "none".to_string(),
            size: ExplorerSize::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Quantitative,
    Nominal,
}

impl From<ColumnType> for SemanticType {
    fn from(value: ColumnType) -> Self {
        match value {
            ColumnType::Integer | ColumnType::Float => SemanticType::Quantitative,
            _ => SemanticType::Nominal,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExplorerField {
    pub name: String,
    pub semantic_type: SemanticType,
    pub analytic_type: &'static str,
}

/// Self-contained document describing the table for the chart explorer.
#[derive(Debug, Clone, Serialize)]
pub struct ExplorerSpec<'a> {
    pub config: &'a ExplorerSettings,
    pub fields: Vec<ExplorerField>,
    pub rows: Vec<Vec<&'a Cell>>,
}

impl<'a> ExplorerSpec<'a> {
    pub fn build(table: &'a Table, config: &'a ExplorerSettings) -> Self {
        let fields = table
            .columns()
            .iter()
            .map(|column| {
                let semantic_type = SemanticType::from(column.column_type());
                ExplorerField {
                    name: column.name().to_string(),
                    semantic_type,
                    analytic_type: match semantic_type {
                        SemanticType::Quantitative => "measure",
                        SemanticType::Nominal => "dimension",
                    },
                }
            })
            .collect();
        let rows = (0..table.row_count())
            .filter_map(|position| table.row(position))
            .collect();
        Self {
            config,
            fields,
            rows,
        }
    }
}

/// Writes an [`ExplorerSpec`] as JSON to the wrapped writer.
pub struct ExplorerExport<W: Write> {
    writer: W,
    settings: ExplorerSettings,
    pretty: bool,
}

impl<W: Write> ExplorerExport<W> {
    pub fn new(writer: W, settings: ExplorerSettings) -> Self {
        Self {
            writer,
            settings,
            pretty: true,
        }
    }

    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Visualizer for ExplorerExport<W> {
    fn render(&mut self, table: &Table) -> Result<(), RenderError> {
        let spec = ExplorerSpec::build(table, &self.settings);
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &spec)?;
        } else {
            serde_json::to_writer(&mut self.writer, &spec)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Prints the leading rows of the table as an aligned text grid.
pub struct PreviewVisualizer<W: Write> {
    writer: W,
    rows: usize,
}

impl<W: Write> PreviewVisualizer<W> {
    pub fn new(writer: W, rows: usize) -> Self {
        Self { writer, rows }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Visualizer for PreviewVisualizer<W> {
    fn render(&mut self, table: &Table) -> Result<(), RenderError> {
        if table.column_count() == 0 {
            return Err(RenderError::Display(
                "Table has no columns to display".to_string(),
            ));
        }
        let headers = table
            .column_names()
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();
        let rows = (0..table.row_count().min(self.rows))
            .filter_map(|position| table.row(position))
            .map(|cells| cells.into_iter().map(Cell::as_display).collect())
            .collect::<Vec<Vec<String>>>();
        write!(self.writer, "{}", table::render_table(&headers, &rows))?;
        Ok(())
    }
}

/// Accepts every table without output; used when charting is switched off.
#[derive(Debug, Default)]
pub struct NullVisualizer;

impl Visualizer for NullVisualizer {
    fn render(&mut self, _table: &Table) -> Result<(), RenderError> {
        Ok(())
    }
}
