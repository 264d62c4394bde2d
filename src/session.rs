//! Per-session state threaded through every interaction handler.
//!
//! Each user interaction mutates the session and then calls
//! [`Session::render`], which re-evaluates load, normalize and the selected
//! insight view in one synchronous pass. A clear request takes effect at the
//! start of the next render.

use std::{mem, rc::Rc};

use log::{info, warn};
use serde::Serialize;

use crate::{
    cache::{CacheStats, LoadCache},
    config::InsightConfig,
    dataset::Table,
    error::LoadError,
    frequency,
    insight::{self, InsightOutput, InsightView},
    loader::{self, LoadOptions, MAX_HEADER_ROW},
    normalize::normalize,
    source::{RawSource, SourceKind},
    table,
    visualize::Visualizer,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearFlag {
    #[default]
    Idle,
    ClearRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableShape {
    pub rows: usize,
    pub columns: usize,
}

/// Everything one render produced. Errors are one-line messages shown in
/// place of the affected panel.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Frame {
    pub upload: Option<String>,
    pub kind: Option<SourceKind>,
    pub sheets: Vec<String>,
    pub sheet: Option<String>,
    pub header_row: Option<usize>,
    pub shape: Option<TableShape>,
    pub text_fields: Vec<String>,
    pub view: InsightView,
    pub insight: Option<InsightOutput>,
    pub errors: Vec<String>,
    #[serde(skip)]
    pub table: Option<Rc<Table>>,
}

impl Frame {
    pub fn has_upload(&self) -> bool {
        self.upload.is_some()
    }

    pub fn to_text(&self) -> String {
        let mut output = String::new();
        match (&self.upload, self.kind) {
            (Some(name), Some(kind)) => {
                output.push_str(&format!("File: {name} ({kind})\n"));
            }
            _ => output.push_str("No file uploaded\n"),
        }
        if !self.sheets.is_empty() {
            output.push_str(&format!("Sheets: {}\n", self.sheets.join(", ")));
        }
        if let (Some(sheet), Some(header_row)) = (&self.sheet, self.header_row) {
            output.push_str(&format!("Sheet: {sheet} (header row {header_row})\n"));
        }
        if let Some(shape) = self.shape {
            output.push_str(&format!(
                "Rows: {}  Columns: {}\n",
                shape.rows, shape.columns
            ));
        }
        for error in &self.errors {
            output.push_str(&format!("error: {error}\n"));
        }
        if let Some(insight) = &self.insight {
            let (headers, rows) = insight.to_rows();
            output.push('\n');
            output.push_str(&table::render_titled(
                insight.view().title(),
                &headers,
                &rows,
            ));
        }
        output
    }
}

pub struct Session {
    config: InsightConfig,
    options: LoadOptions,
    cache: LoadCache,
    flag: ClearFlag,
    upload: Option<RawSource>,
    sheets: Vec<String>,
    view: InsightView,
    field: Option<String>,
    normalized: Option<(Rc<Table>, Rc<Table>)>,
    notices: Vec<String>,
}

impl Session {
    pub fn new(config: InsightConfig) -> Result<Self, LoadError> {
        let options = config.load_options()?;
        Ok(Self {
            cache: LoadCache::new(config.cache_capacity),
            config,
            options,
            flag: ClearFlag::Idle,
            upload: None,
            sheets: Vec::new(),
            view: InsightView::default(),
            field: None,
            normalized: None,
            notices: Vec::new(),
        })
    }

    pub fn flag(&self) -> ClearFlag {
        self.flag
    }

    pub fn view(&self) -> InsightView {
        self.view
    }

    pub fn has_upload(&self) -> bool {
        self.upload.is_some()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Accepts a new upload, replacing any previous one. Workbooks default to
    /// their first sheet with the header on row 0.
    pub fn upload(&mut self, mut source: RawSource) {
        if let Err(err) = source.validate(self.config.max_upload_bytes) {
            self.notice(err.reason());
            return;
        }
        self.sheets.clear();
        if source.kind() == SourceKind::Excel {
            match loader::sheet_names(source.bytes()) {
                Ok(names) => {
                    if source.sheet().is_none() {
                        source.set_sheet(names.first().cloned());
                    }
                    self.sheets = names;
                }
                Err(err) => self.notice(err.reason()),
            }
        }
        info!("Accepted upload '{}' ({} bytes)", source.name(), source.len());
        self.upload = Some(source);
        self.field = None;
    }

    pub fn select_sheet(&mut self, sheet: impl Into<String>) {
        if let Some(source) = self.upload.as_mut() {
            source.set_sheet(Some(sheet.into()));
            self.field = None;
        }
    }

    pub fn select_header_row(&mut self, header_row: usize) {
        if header_row > MAX_HEADER_ROW {
            self.notice(
                LoadError::HeaderRowTooLarge {
                    header_row,
                    max: MAX_HEADER_ROW,
                }
                .reason(),
            );
            return;
        }
        if let Some(source) = self.upload.as_mut() {
            source.set_header_row(header_row);
            self.field = None;
        }
    }

    pub fn select_view(&mut self, view: InsightView) {
        self.view = view;
    }

    pub fn select_field(&mut self, field: Option<String>) {
        self.field = field;
    }

    pub fn request_clear(&mut self) {
        self.flag = ClearFlag::ClearRequested;
    }

    pub fn render(&mut self, visualizer: &mut dyn Visualizer) -> Frame {
        if self.flag == ClearFlag::ClearRequested {
            self.upload = None;
            self.sheets.clear();
            self.field = None;
            self.normalized = None;
            self.cache.clear();
            self.flag = ClearFlag::Idle;
            info!("Cleared uploaded file");
        }

        let mut frame = Frame {
            view: self.view,
            errors: mem::take(&mut self.notices),
            ..Frame::default()
        };
        let Some(source) = self.upload.as_ref() else {
            return frame;
        };
        frame.upload = Some(source.name().to_string());
        frame.kind = Some(source.kind());
        frame.sheets = self.sheets.clone();
        if source.kind() == SourceKind::Excel {
            frame.sheet = source.sheet().map(str::to_string);
            frame.header_row = Some(source.header_row());
        }

        let loaded = match self.cache.load(source, &self.options) {
            Ok(table) => table,
            Err(err) => {
                warn!("{err}");
                frame.errors.push(err.reason());
                return frame;
            }
        };
        let table = self.normalized_for(loaded);
        frame.shape = Some(TableShape {
            rows: table.row_count(),
            columns: table.column_count(),
        });
        frame.text_fields = frequency::text_fields(&table)
            .into_iter()
            .map(String::from)
            .collect();

        match insight::derive(&table, self.view, self.field.as_deref()) {
            Ok(output) => frame.insight = Some(output),
            Err(err) => {
                warn!("{err}");
                frame.errors.push(err.to_string());
            }
        }
        if let Err(err) = visualizer.render(&table) {
            warn!("{err}");
            frame.errors.push(err.reason());
        }
        frame.table = Some(table);
        frame
    }

    fn normalized_for(&mut self, loaded: Rc<Table>) -> Rc<Table> {
        if let Some((raw, normalized)) = &self.normalized
            && Rc::ptr_eq(raw, &loaded)
        {
            return Rc::clone(normalized);
        }
        let normalized = Rc::new(normalize(loaded.as_ref().clone()));
        self.normalized = Some((loaded, Rc::clone(&normalized)));
        normalized
    }

    fn notice(&mut self, message: String) {
        warn!("{message}");
        self.notices.push(message);
    }
}
