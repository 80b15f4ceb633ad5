//! Converts a CalculiX `.inp` mesh to an I-DEAS Universal `.unv` file.

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Event, Level, Subscriber, info};
use tracing_subscriber::FmtSubscriber;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

#[derive(Parser)]
#[command(name = "inp2unv")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert a CalculiX .inp mesh to a Universal .unv file", long_about = None)]
struct Cli {
    /// INP file name with extension
    input: PathBuf,

    /// Output file (default: input with a .unv extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a JSON conversion report to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

/// `LEVEL: message`, one event per line.
struct LevelPrefix;

impl<S, N> FormatEvent<S, N> for LevelPrefix
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "{}: ", event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn parse_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&cli.log_level))
        .event_format(LevelPrefix)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let output = cli
        .output
        .unwrap_or_else(|| ccx_unv::output_path_for(&cli.input));
    let report = ccx_unv::convert(&cli.input, &output)
        .with_context(|| format!("failed to convert {}", cli.input.display()))?;

    if !report.skipped.is_empty() {
        info!(
            "{} element(s) had no UNV equivalent and were skipped",
            report.skipped.len()
        );
    }
    if let Some(path) = &cli.report {
        report
            .write_json(path)
            .with_context(|| format!("failed to write report {}", path.display()))?;
    }
    Ok(())
}
