//! I/O utilities for reading uploads, decoding text and opening outputs.
//!
//! All file I/O in eda-insight flows through this module:
//!
//! - **Input**: whole-file reads, with the `-` path routed to stdin.
//! - **Encoding**: input decoding via `encoding_rs`, defaulting to UTF-8.
//! - **CSV readers**: reader construction over in-memory bytes.
//! - **Output**: file or stdout writers for reports and visualization specs.

use std::{
    fs::File,
    io::{self, BufWriter, Read, Write},
    path::Path,
};

use encoding_rs::{Encoding, UTF_8};

use crate::error::LoadError;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn read_bytes(path: &Path) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    if is_dash(path) {
        io::stdin().lock().read_to_end(&mut buffer)?;
    } else {
        File::open(path)?.read_to_end(&mut buffer)?;
    }
    Ok(buffer)
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding, LoadError> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| LoadError::UnknownEncoding(value.to_string()))
    } else {
        Ok(UTF_8)
    }
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String, LoadError> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(LoadError::Decode(encoding.name()))
    } else {
        Ok(text.into_owned())
    }
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

pub fn open_output(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    match path {
        Some(p) if !is_dash(p) => Ok(Box::new(BufWriter::new(File::create(p)?))),
        _ => Ok(Box::new(io::stdout())),
    }
}
