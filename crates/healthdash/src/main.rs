//! CLI entry point for the healthcare dashboard.

use anyhow::{Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use healthdash::config::{DATA_PATH_ENV, DEFAULT_DATA_PATH};
use healthdash::{
    Dashboard, DashboardConfig, DashboardError, DashboardReport, DashboardSession,
    ReportGenerator, TerminalSurface,
};
use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Healthcare Data Dashboard",
    long_about = "Summarizes a patient-admission CSV as KPIs, charts and insights.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  HEALTHDASH_DATA    Dataset path used when --data is not given (also read from .env)\n\n\
                  EXAMPLES:\n  \
                  # Full dataset, every gender and condition\n  \
                  healthdash --data data/healthcare_dataset.csv\n\n  \
                  # Only female diabetes patients\n  \
                  healthdash --gender Female --condition Diabetes\n\n  \
                  # Machine-readable output\n  \
                  healthdash --json | jq '.dashboard.kpis'"
)]
struct Args {
    /// Path to the CSV dataset
    ///
    /// Falls back to $HEALTHDASH_DATA, then data/healthcare_dataset.csv
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Gender to include (repeatable). Defaults to every gender
    #[arg(short, long)]
    gender: Vec<String>,

    /// Medical condition to include (repeatable). Defaults to every condition
    #[arg(short, long)]
    condition: Vec<String>,

    /// Select no genders at all
    #[arg(long, conflicts_with = "gender")]
    no_gender: bool,

    /// Select no conditions at all
    #[arg(long, conflicts_with = "condition")]
    no_condition: bool,

    /// Maximum rows kept in memory; larger files are randomly sampled
    #[arg(long, default_value = "2000")]
    max_rows: usize,

    /// Seed for the sampling RNG
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Number of rows in the data preview
    #[arg(long, default_value = "20")]
    preview_rows: usize,

    /// Output directory for reports
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and the dashboard)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of the text dashboard
    ///
    /// Disables all logs; only the dashboard report is written.
    #[arg(long)]
    json: bool,

    /// Write the dashboard as JSON to the output directory
    ///
    /// The report will be saved as <dataset_name>_dashboard.json. Also works
    /// together with --json.
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level, quiet))
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// `RUST_LOG` when set (environment or `.env`), otherwise the CLI level.
fn env_filter(level: &str, quiet: bool) -> EnvFilter {
    let effective_level = if quiet { "warn" } else { level };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load .env before logging so RUST_LOG from the file is honoured
    dotenv().ok();

    init_logging(&args.log_level, args.quiet, args.json);

    match run(&args) {
        Ok(()) => Ok(()),
        Err(e) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&e)?);
            } else {
                error!("Dashboard failed: {}", e);
            }
            Err(anyhow!("Dashboard failed: {}", e))
        }
    }
}

/// Resolve the dataset path: flag, then environment, then the default.
fn data_path(args: &Args) -> PathBuf {
    if let Some(ref path) = args.data {
        return path.clone();
    }
    match env::var(DATA_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path.trim()),
        _ => PathBuf::from(DEFAULT_DATA_PATH),
    }
}

/// `Some` when the user narrowed a filter, `None` to keep every option.
fn selection(values: &[String], none: bool) -> Option<Vec<String>> {
    if none {
        Some(Vec::new())
    } else if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}

fn warn_unknown(label: &str, options: &[String], chosen: &[String]) {
    for value in chosen.iter().filter(|v| !options.contains(*v)) {
        warn!("{}: '{}' does not occur in the dataset", label, value);
    }
}

fn run(args: &Args) -> Result<(), DashboardError> {
    let path = data_path(args);
    let config = DashboardConfig::builder()
        .data_path(&path)
        .max_rows(args.max_rows)
        .sample_seed(args.seed)
        .preview_rows(args.preview_rows)
        .build()?;

    let mut session = DashboardSession::open(config)?;
    for ambiguity in &session.columns().ambiguities {
        info!(
            "Role '{}' bound to '{}'; also matched {:?}",
            ambiguity.role, ambiguity.chosen, ambiguity.ignored
        );
    }

    let controls = session.filter_controls();
    let mut dashboard = None;
    if let Some(genders) = selection(&args.gender, args.no_gender) {
        warn_unknown(&controls[0].label, &controls[0].options, &genders);
        dashboard = Some(session.set_gender_filter(genders)?);
    }
    if let Some(conditions) = selection(&args.condition, args.no_condition) {
        warn_unknown(&controls[1].label, &controls[1].options, &conditions);
        dashboard = Some(session.set_condition_filter(conditions)?);
    }
    let dashboard = match dashboard {
        Some(dashboard) => dashboard,
        None => session.dashboard()?,
    };

    if args.emit_report {
        let generator = ReportGenerator::new(PathBuf::from(&args.output));
        let report_path = generator.write_report_to_file(&dashboard, &extract_file_stem(&path))?;
        info!("Report written to: {}", report_path.display());
    }

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&DashboardReport::new(&dashboard))?
        );
        return Ok(());
    }

    print_dashboard(&dashboard)
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dashboard")
        .to_string()
}

/// Render the dashboard as text on stdout.
fn print_dashboard(dashboard: &Dashboard) -> Result<(), DashboardError> {
    let stdout = io::stdout();
    let mut surface = TerminalSurface::new(stdout.lock());
    dashboard.render_to(&mut surface)?;

    let mut out = surface.into_inner();
    writeln!(out)?;
    writeln!(out, "Use --json for machine-readable output")?;
    writeln!(out, "Use --emit-report to save the dashboard as JSON")?;
    writeln!(out, "{}", "=".repeat(80))?;
    Ok(())
}
