//! CLI definition and dispatch.
//!
//! Each subcommand loads the sales snapshot, runs one query (or all of them)
//! and prints the resulting envelope to stdout. Logs go to stderr.

use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::aggregate_result::AggregateResult;
use crate::domain::aggregation::{MonthItemStats, MonthlySales, PopularItem, TopRevenueItem};
use crate::domain::engine::SalesEngine;
use crate::domain::error::SalesError;
use crate::domain::sale_record::YearMonth;
use crate::domain::snapshot::SalesSnapshot;
use crate::ports::config_port::ConfigPort;
use crate::ports::sales_data_port::SalesDataPort;

/// Data file looked up next to the executable when nothing else is configured.
pub const DEFAULT_DATA_PATH: &str = "salesdataTemplate/sales_data.csv";

#[derive(Parser, Debug)]
#[command(name = "salesagg", about = "Sales analytics over point-of-sale CSV data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// INI file with [data] and [output] sections
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Sales CSV file (overrides [data] path)
    #[arg(short, long)]
    pub data: Option<PathBuf>,
    /// Output format (overrides [output] format)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Total revenue over all records
    TotalSales {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Revenue per month
    Monthly {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Best-selling item (by quantity) per month
    PopularItems {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Highest-revenue item per month
    TopRevenueItems {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Order-size statistics for each month's best-selling item
    PopularItemStats {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Run all five queries
    Summary {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Show what was loaded from the data file
    Info {
        #[command(flatten)]
        source: SourceArgs,
    },
}

impl Command {
    pub fn into_parts(self) -> (Query, SourceArgs) {
        match self {
            Command::TotalSales { source } => (Query::TotalSales, source),
            Command::Monthly { source } => (Query::Monthly, source),
            Command::PopularItems { source } => (Query::PopularItems, source),
            Command::TopRevenueItems { source } => (Query::TopRevenueItems, source),
            Command::PopularItemStats { source } => (Query::PopularItemStats, source),
            Command::Summary { source } => (Query::Summary, source),
            Command::Info { source } => (Query::Info, source),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    TotalSales,
    Monthly,
    PopularItems,
    TopRevenueItems,
    PopularItemStats,
    Summary,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_path: PathBuf,
    pub format: OutputFormat,
    pub pretty: bool,
}

pub fn run(cli: Cli) -> ExitCode {
    let (query, source) = cli.command.into_parts();

    let settings = match load_settings(&source) {
        Ok(s) => s,
        Err(e) => {
            log::error!("{e}");
            return (&e).into();
        }
    };

    let adapter = CsvAdapter::new(settings.data_path.clone());
    log::info!("Loading sales data from {}", adapter.describe());
    let engine = SalesEngine::new(SalesSnapshot::load(&adapter));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match execute(query, &engine, &settings, &mut out) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(3),
        Err(e) => {
            log::error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, SalesError> {
    FileConfigAdapter::from_file(path).map_err(|e| SalesError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn load_settings(source: &SourceArgs) -> Result<Settings, SalesError> {
    let config = match &source.config {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            load_config(path)?
        }
        None => FileConfigAdapter::empty(),
    };
    build_settings(source, &config)
}

/// Resolves settings with precedence: command-line flag, config file, default.
pub fn build_settings(source: &SourceArgs, config: &dyn ConfigPort) -> Result<Settings, SalesError> {
    let data_path = match (&source.data, config.get_string("data", "path")) {
        (Some(path), _) => path.clone(),
        (None, Some(path)) => PathBuf::from(path),
        (None, None) => default_data_path(),
    };

    let format = match (source.format, config.get_string("output", "format")) {
        (Some(format), _) => format,
        (None, Some(value)) => {
            <OutputFormat as ValueEnum>::from_str(&value, true).map_err(|_| {
                SalesError::ConfigInvalid {
                    section: "output".into(),
                    key: "format".into(),
                    reason: format!("unknown format '{value}' (expected text or json)"),
                }
            })?
        }
        (None, None) => OutputFormat::default(),
    };

    Ok(Settings {
        data_path,
        format,
        pretty: config.get_bool("output", "pretty", true),
    })
}

/// [`DEFAULT_DATA_PATH`] next to the executable if present, otherwise
/// relative to the working directory.
pub fn default_data_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_DATA_PATH)))
        .filter(|path| path.exists())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH))
}

/// Runs `query` and writes the rendered result to `out`.
///
/// Returns `Ok(false)` when a query produced a failed envelope.
pub fn execute(
    query: Query,
    engine: &SalesEngine,
    settings: &Settings,
    out: &mut dyn Write,
) -> Result<bool, SalesError> {
    match query {
        Query::TotalSales => emit(&engine.total_sales(), settings, out),
        Query::Monthly => emit(&engine.monthly_sales(), settings, out),
        Query::PopularItems => emit(&engine.most_popular_item_each_month(), settings, out),
        Query::TopRevenueItems => emit(&engine.top_revenue_items_each_month(), settings, out),
        Query::PopularItemStats => emit(&engine.popular_item_stats(), settings, out),
        Query::Summary => emit_summary(engine, settings, out),
        Query::Info => emit_info(engine, settings, out),
    }
}

fn emit<T: Serialize + TextRender>(
    result: &AggregateResult<T>,
    settings: &Settings,
    out: &mut dyn Write,
) -> Result<bool, SalesError> {
    match settings.format {
        OutputFormat::Json => write_json(result, settings.pretty, out)?,
        OutputFormat::Text => write_text(result, out)?,
    }
    Ok(result.is_success)
}

#[derive(Serialize)]
struct SummaryReport {
    total_sales: AggregateResult<Decimal>,
    monthly_sales: AggregateResult<Vec<MonthlySales>>,
    popular_items: AggregateResult<Vec<PopularItem>>,
    top_revenue_items: AggregateResult<Vec<TopRevenueItem>>,
    popular_item_stats: AggregateResult<Vec<MonthItemStats>>,
}

fn emit_summary(
    engine: &SalesEngine,
    settings: &Settings,
    out: &mut dyn Write,
) -> Result<bool, SalesError> {
    let report = SummaryReport {
        total_sales: engine.total_sales(),
        monthly_sales: engine.monthly_sales(),
        popular_items: engine.most_popular_item_each_month(),
        top_revenue_items: engine.top_revenue_items_each_month(),
        popular_item_stats: engine.popular_item_stats(),
    };
    let all_ok = report.total_sales.is_success
        && report.monthly_sales.is_success
        && report.popular_items.is_success
        && report.top_revenue_items.is_success
        && report.popular_item_stats.is_success;

    match settings.format {
        OutputFormat::Json => write_json(&report, settings.pretty, out)?,
        OutputFormat::Text => {
            write_text(&report.total_sales, out)?;
            write_text(&report.monthly_sales, out)?;
            write_text(&report.popular_items, out)?;
            write_text(&report.top_revenue_items, out)?;
            write_text(&report.popular_item_stats, out)?;
        }
    }
    Ok(all_ok)
}

#[derive(Serialize)]
struct InfoReport {
    source: String,
    records: usize,
    skipped: usize,
    load_fault: Option<String>,
}

fn emit_info(
    engine: &SalesEngine,
    settings: &Settings,
    out: &mut dyn Write,
) -> Result<bool, SalesError> {
    let snapshot = engine.snapshot();
    let report = InfoReport {
        source: settings.data_path.display().to_string(),
        records: snapshot.len(),
        skipped: snapshot.skipped(),
        load_fault: snapshot.load_fault().map(str::to_string),
    };

    match settings.format {
        OutputFormat::Json => write_json(&report, settings.pretty, out)?,
        OutputFormat::Text => {
            writeln!(out, "source:  {}", report.source)?;
            writeln!(out, "records: {}", report.records)?;
            writeln!(out, "skipped: {}", report.skipped)?;
            if let Some(fault) = &report.load_fault {
                writeln!(out, "fault:   {fault}")?;
            }
        }
    }
    Ok(true)
}

fn write_json<T: Serialize>(value: &T, pretty: bool, out: &mut dyn Write) -> Result<(), SalesError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    writeln!(out, "{json}")?;
    Ok(())
}

fn write_text<T: TextRender>(
    result: &AggregateResult<T>,
    out: &mut dyn Write,
) -> Result<(), SalesError> {
    writeln!(
        out,
        "{} [{}] records={} elapsed={:?}",
        result.status_message, result.status_code, result.total_records, result.response_duration
    )?;
    if let Some(payload) = &result.payload {
        for line in payload.render_lines() {
            writeln!(out, "  {line}")?;
        }
    }
    Ok(())
}

/// Plain-text rendering of a query payload, one line per entry.
pub trait TextRender {
    fn render_lines(&self) -> Vec<String>;
}

impl TextRender for Decimal {
    fn render_lines(&self) -> Vec<String> {
        vec![format!("total_sales: {self}")]
    }
}

impl TextRender for Vec<MonthlySales> {
    fn render_lines(&self) -> Vec<String> {
        self.iter()
            .map(|m| format!("{}  {}", YearMonth::new(m.year, m.month), m.total_sales))
            .collect()
    }
}

impl TextRender for Vec<PopularItem> {
    fn render_lines(&self) -> Vec<String> {
        self.iter()
            .map(|p| {
                format!(
                    "{}  {}  quantity={}",
                    YearMonth::new(p.year, p.month),
                    p.sku,
                    p.total_quantity_sold
                )
            })
            .collect()
    }
}

impl TextRender for Vec<TopRevenueItem> {
    fn render_lines(&self) -> Vec<String> {
        self.iter()
            .map(|t| {
                format!(
                    "{}  {}  revenue={}",
                    YearMonth::new(t.year, t.month),
                    t.sku,
                    t.total_revenue
                )
            })
            .collect()
    }
}

impl TextRender for Vec<MonthItemStats> {
    fn render_lines(&self) -> Vec<String> {
        self.iter()
            .map(|s| match s {
                MonthItemStats::Sales {
                    sku,
                    min_orders,
                    max_orders,
                    avg_orders,
                    order_count,
                    ..
                } => format!(
                    "{}  {}  min={} max={} avg={} orders={}",
                    s.year_month(),
                    sku,
                    min_orders,
                    max_orders,
                    avg_orders.round_dp(2),
                    order_count
                ),
                MonthItemStats::NoSalesData { .. } => {
                    format!("{}  no sales data", s.year_month())
                }
            })
            .collect()
    }
}
