use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use inspection_tools::config::ReportConfig;
use inspection_tools::io::excel_write::{export_summary, report_file_name};
use inspection_tools::io::upload::Upload;
use inspection_tools::pipeline::{self, BatchReport};
use inspection_tools::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_env("INSPECTION_LOG")
        .unwrap_or_else(|_| EnvFilter::new("inspection_tools=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| ToolError::Logging(err.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Summarize(args) => execute_summarize(args),
    }
}

fn execute_summarize(args: SummarizeArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::default(),
    };

    let mut uploads = Vec::with_capacity(args.input.len());
    for path in &args.input {
        match Upload::from_path(path) {
            Ok(upload) => uploads.push(upload),
            Err(error) => eprintln!("skipped {}: {error}", path.display()),
        }
    }

    let report = pipeline::summarize(&uploads, &config)?;
    print_report(&report);

    if let Some(path) = &args.json {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)?;
    }

    let date = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let output = args.output_dir.join(report_file_name(date));
    let categories = config.category_set()?;
    if export_summary(&report.summary, &categories, &args.period, &output) {
        println!("report written to {}", output.display());
    } else {
        eprintln!("report could not be written to {}", output.display());
    }

    Ok(())
}

fn print_report(report: &BatchReport) {
    for rejection in &report.rejected {
        eprintln!("rejected {}: {}", rejection.file_name, rejection.error);
    }

    println!(
        "{:<3} {:<40} {:>10} {:>10} {:>13}",
        "No.", "Category", "inspected", "compliant", "smoking room"
    );
    for (index, entry) in report.summary.entries().iter().enumerate() {
        println!(
            "{:<3} {:<40} {:>10} {:>10} {:>13}",
            index + 1,
            entry.category,
            entry.bucket.inspected,
            entry.bucket.compliant,
            entry.bucket.with_smoking_room
        );
    }
    let totals = report.summary.totals();
    println!(
        "{:<3} {:<40} {:>10} {:>10} {:>13}",
        "", "Total", totals.inspected, totals.compliant, totals.with_smoking_room
    );
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Merge inspection spreadsheets into one summary report."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reconcile a batch of inspector spreadsheets.
    Summarize(SummarizeArgs),
}

#[derive(clap::Args)]
struct SummarizeArgs {
    /// Source workbooks, one per inspector.
    #[arg(long, required = true)]
    input: Vec<PathBuf>,

    /// Period label written into the report subtitle.
    #[arg(long)]
    period: String,

    /// Directory receiving `summary_<date>.xlsx`.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Report date, defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Optional JSON configuration overriding the built-in schema.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write the summary and diagnostics as JSON.
    #[arg(long)]
    json: Option<PathBuf>,
}
