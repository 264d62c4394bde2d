pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod dataset;
pub mod error;
pub mod explore;
pub mod fields;
pub mod frequency;
pub mod insight;
pub mod io_utils;
pub mod loader;
pub mod normalize;
pub mod schema;
pub mod session;
pub mod source;
pub mod stats;
pub mod table;
pub mod visualize;

use std::{
    env,
    io::{self, Write},
    sync::OnceLock,
};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{ChartStyle, Cli, Commands, OutputFormat, SourceArgs},
    config::InsightConfig,
    dataset::Table,
    insight::{InsightOutput, InsightView},
    session::Session,
    source::{RawSource, SourceKind},
    visualize::{ExplorerExport, NullVisualizer, PreviewVisualizer, Visualizer},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("eda_insight", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = InsightConfig::load_or_default(cli.config.as_deref())?;
    match cli.command {
        Commands::Sheets(args) => handle_sheets(&args),
        Commands::Types(args) => handle_insight(
            &args.source,
            &config,
            InsightView::Types,
            None,
            args.format,
        ),
        Commands::Summary(args) => handle_insight(
            &args.source,
            &config,
            InsightView::Summary,
            None,
            args.format,
        ),
        Commands::Distribution(args) => handle_insight(
            &args.source,
            &config,
            InsightView::Distribution,
            args.field.as_deref(),
            args.format,
        ),
        Commands::Chart(args) => handle_chart(&args, config),
        Commands::Explore(args) => handle_explore(&args, config),
    }
}

fn handle_sheets(args: &cli::SheetsArgs) -> Result<()> {
    let bytes = io_utils::read_bytes(&args.input)
        .with_context(|| format!("Reading workbook {:?}", args.input))?;
    let names = loader::sheet_names(&bytes)
        .with_context(|| format!("Listing sheets of {:?}", args.input))?;
    let mut stdout = io::stdout().lock();
    for name in &names {
        writeln!(stdout, "{name}")?;
    }
    info!("Found {} sheet(s) in {:?}", names.len(), args.input);
    Ok(())
}

fn handle_insight(
    args: &SourceArgs,
    config: &InsightConfig,
    view: InsightView,
    field: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let config = apply_source_overrides(config.clone(), args.delimiter, &args.input_encoding);
    let table = load_normalized(args, &config)?;
    let output = insight::derive(&table, view, field)?;
    print_output(&output, format)
}

fn handle_chart(args: &cli::ChartArgs, config: InsightConfig) -> Result<()> {
    let config = apply_source_overrides(
        config,
        args.source.delimiter,
        &args.source.input_encoding,
    );
    let table = load_normalized(&args.source, &config)?;
    let writer = io_utils::open_output(args.output.as_deref())
        .with_context(|| format!("Opening chart output {:?}", args.output))?;
    let mut visualizer = chart_visualizer(args.style, writer, &config);
    visualizer
        .render(&table)
        .map_err(|err| anyhow!(err.reason()))?;
    info!(
        "Rendered {} row(s) across {} column(s) for the chart explorer",
        table.row_count(),
        table.column_count()
    );
    Ok(())
}

fn handle_explore(args: &cli::ExploreArgs, config: InsightConfig) -> Result<()> {
    let config = apply_source_overrides(config, args.delimiter, &args.input_encoding);
    let mut visualizer = chart_visualizer(args.chart, Box::new(io::stdout()), &config);
    let mut session = Session::new(config)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    if let Some(path) = &args.input {
        let name = path.to_string_lossy();
        let kind = args
            .kind
            .or_else(|| SourceKind::detect(&name))
            .unwrap_or(SourceKind::Csv);
        session.upload(RawSource::from_path(path, kind)?);
        let frame = session.render(visualizer.as_mut());
        write!(stdout, "{}", frame.to_text())?;
    } else {
        writeln!(stdout, "{}", explore::HELP)?;
    }
    explore::run(&mut session, stdin.lock(), &mut stdout, visualizer.as_mut())?;
    let stats = session.cache_stats();
    info!(
        "Session ended with {} cache hit(s) and {} miss(es)",
        stats.hits, stats.misses
    );
    Ok(())
}

fn chart_visualizer(
    style: ChartStyle,
    writer: Box<dyn Write>,
    config: &InsightConfig,
) -> Box<dyn Visualizer> {
    match style {
        ChartStyle::Json => Box::new(ExplorerExport::new(writer, config.explorer.clone())),
        ChartStyle::Preview => Box::new(PreviewVisualizer::new(writer, config.preview_rows)),
        ChartStyle::None => Box::new(NullVisualizer),
    }
}

fn apply_source_overrides(
    mut config: InsightConfig,
    delimiter: Option<u8>,
    encoding: &Option<String>,
) -> InsightConfig {
    if let Some(delimiter) = delimiter {
        config.delimiter = Some(delimiter as char);
    }
    if let Some(label) = encoding {
        config.input_encoding = Some(label.clone());
    }
    config
}

fn load_normalized(args: &SourceArgs, config: &InsightConfig) -> Result<Table> {
    let kind = args
        .kind
        .or_else(|| SourceKind::detect(&args.input.to_string_lossy()))
        .unwrap_or(SourceKind::Csv);
    let mut source = if io_utils::is_dash(&args.input) {
        let bytes = io_utils::read_bytes(&args.input).context("Reading stdin")?;
        RawSource::new(format!("stdin.{}", kind.extensions()[0]), bytes, kind)
    } else {
        RawSource::from_path(&args.input, kind)?
    };
    source.validate(config.max_upload_bytes)?;
    if kind == SourceKind::Excel {
        let sheet = match &args.sheet {
            Some(sheet) => sheet.clone(),
            None => loader::sheet_names(source.bytes())?
                .into_iter()
                .next()
                .ok_or_else(|| anyhow!("Workbook {:?} has no sheets", args.input))?,
        };
        debug!("Reading sheet '{sheet}' with header row {}", args.header_row);
        source = source.with_sheet(sheet, args.header_row);
    }
    let options = config.load_options()?;
    let table = loader::load(&source, &options)
        .with_context(|| format!("Loading {:?}", args.input))?;
    Ok(normalize::normalize(table))
}

fn print_output(output: &InsightOutput, format: OutputFormat) -> Result<()> {
    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Table => {
            let (headers, rows) = output.to_rows();
            write!(
                stdout,
                "{}",
                table::render_titled(output.view().title(), &headers, &rows)
            )?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut stdout, output)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
