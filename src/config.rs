//! Runtime configuration: defaults, an optional YAML file, then CLI flags.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::{
    cache::DEFAULT_CACHE_CAPACITY, error::LoadError, io_utils, loader::LoadOptions,
    visualize::ExplorerSettings,
};

/// Advisory upload ceiling of 200 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 200 * 1024 * 1024;
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case", deny_unknown_fields)]
pub struct InsightConfig {
    pub max_upload_bytes: u64,
    pub cache_capacity: usize,
    pub preview_rows: usize,
    pub delimiter: Option<char>,
    pub input_encoding: Option<String>,
    pub explorer: ExplorerSettings,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            delimiter: None,
            input_encoding: None,
            explorer: ExplorerSettings::default(),
        }
    }
}

impl InsightConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("Reading config file {path:?}"))?;
        Self::from_yaml(&text).with_context(|| format!("Parsing config file {path:?}"))
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn encoding(&self) -> Result<&'static Encoding, LoadError> {
        io_utils::resolve_encoding(self.input_encoding.as_deref())
    }

    pub fn load_options(&self) -> Result<LoadOptions, LoadError> {
        Ok(LoadOptions {
            delimiter: self
                .delimiter
                .filter(char::is_ascii)
                .map(|c| c as u8)
                .unwrap_or(io_utils::DEFAULT_CSV_DELIMITER),
            encoding: self.encoding()?,
        })
    }
}
