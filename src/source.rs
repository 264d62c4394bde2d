use std::{fmt, path::Path};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{error::LoadError, io_utils};

pub const CSV_EXTENSIONS: &[&str] = &["csv", "txt"];
pub const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xls", "xlsm", "xlsb", "ods"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[value(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Csv,
    Excel,
}

impl SourceKind {
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            SourceKind::Csv => CSV_EXTENSIONS,
            SourceKind::Excel => EXCEL_EXTENSIONS,
        }
    }

    /// Guesses the kind from a file name's extension.
    pub fn detect(name: &str) -> Option<SourceKind> {
        let ext = extension_of(name)?;
        [SourceKind::Csv, SourceKind::Excel]
            .into_iter()
            .find(|kind| kind.accepts_extension(&ext))
    }

    fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions()
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(ext))
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Csv => f.write_str("CSV"),
            SourceKind::Excel => f.write_str("Excel"),
        }
    }
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// An uploaded file before parsing, plus the sheet selection for workbooks.
#[derive(Debug, Clone)]
pub struct RawSource {
    name: String,
    bytes: Vec<u8>,
    kind: SourceKind,
    sheet: Option<String>,
    header_row: usize,
}

impl RawSource {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>, kind: SourceKind) -> Self {
        Self {
            name: name.into(),
            bytes,
            kind,
            sheet: None,
            header_row: 0,
        }
    }

    pub fn from_path(path: &Path, kind: SourceKind) -> Result<Self, LoadError> {
        let bytes = io_utils::read_bytes(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self::new(name, bytes, kind))
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>, header_row: usize) -> Self {
        self.sheet = Some(sheet.into());
        self.header_row = header_row;
        self
    }

    pub fn set_sheet(&mut self, sheet: Option<String>) {
        self.sheet = sheet;
    }

    pub fn set_header_row(&mut self, header_row: usize) {
        self.header_row = header_row;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn sheet(&self) -> Option<&str> {
        self.sheet.as_deref()
    }

    pub fn header_row(&self) -> usize {
        self.header_row
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// SHA-256 of the content; two uploads with the same bytes share a digest
    /// whatever their names.
    pub fn digest(&self) -> [u8; 32] {
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&Sha256::digest(&self.bytes));
        digest
    }

    /// Checks the upload against the kind allow-list and the size ceiling.
    pub fn validate(&self, max_bytes: u64) -> Result<(), LoadError> {
        let accepted = extension_of(&self.name)
            .map(|ext| self.kind.accepts_extension(&ext))
            .unwrap_or(false);
        if !accepted {
            return Err(LoadError::UnsupportedExtension {
                name: self.name.clone(),
                kind: self.kind,
                expected: self.kind.extensions().join(", "),
            });
        }
        if self.len() > max_bytes {
            return Err(LoadError::TooLarge {
                bytes: self.len(),
                limit: max_bytes,
            });
        }
        Ok(())
    }
}
