use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{loader::MAX_HEADER_ROW, source::SourceKind};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Explore CSV and Excel files: field types, summaries and value distributions",
    long_about = None
)]
pub struct Cli {
    /// YAML configuration file (upload limit, cache size, explorer settings)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the sheet names of an Excel workbook
    Sheets(SheetsArgs),
    /// Show each field with its inferred data type
    Types(InsightArgs),
    /// Show null counts and descriptive statistics per field
    Summary(InsightArgs),
    /// Show value counts for a text field
    Distribution(DistributionArgs),
    /// Hand the table to the chart explorer (JSON spec or text preview)
    Chart(ChartArgs),
    /// Start an interactive session reading commands from stdin
    Explore(ExploreArgs),
}

#[derive(Debug, Args)]
pub struct SheetsArgs {
    /// Excel workbook to inspect
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Input CSV or Excel file ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// File kind (defaults to the file extension, then CSV)
    #[arg(long, value_enum)]
    pub kind: Option<SourceKind>,
    /// Worksheet to read from an Excel file (defaults to the first sheet)
    #[arg(long)]
    pub sheet: Option<String>,
    /// Row of the worksheet holding the column names (0-100)
    #[arg(long = "header-row", default_value_t = 0, value_parser = parse_header_row)]
    pub header_row: usize,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of a CSV input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Args)]
pub struct InsightArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Output format for the report
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct DistributionArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Text field to count (defaults to the first text field)
    #[arg(short = 'C', long = "field")]
    pub field: Option<String>,
    /// Output format for the report
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum ChartStyle {
    /// Explorer JSON spec with settings, fields and rows
    #[default]
    Json,
    /// Aligned text preview of the leading rows
    Preview,
    /// No chart output
    None,
}

#[derive(Debug, Args)]
pub struct ChartArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Destination file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Chart output style
    #[arg(long, value_enum, default_value = "json")]
    pub style: ChartStyle,
}

#[derive(Debug, Args)]
pub struct ExploreArgs {
    /// File to upload before reading commands
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
    /// Kind of the initial upload (defaults to the file extension)
    #[arg(long, value_enum)]
    pub kind: Option<SourceKind>,
    /// Chart output rendered after every command
    #[arg(long, value_enum, default_value = "none")]
    pub chart: ChartStyle,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of CSV uploads (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

pub fn parse_header_row(value: &str) -> Result<usize, String> {
    let row: usize = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a row number"))?;
    if row > MAX_HEADER_ROW {
        return Err(format!("Header row must be between 0 and {MAX_HEADER_ROW}"));
    }
    Ok(row)
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_row_is_bounded() {
        assert_eq!(parse_header_row("0"), Ok(0));
        assert_eq!(parse_header_row("100"), Ok(100));
        assert!(parse_header_row("101").is_err());
        assert!(parse_header_row("-1").is_err());
    }

    #[test]
    fn delimiter_aliases_resolve() {
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter("semicolon"), Ok(b';'));
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("ab").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
