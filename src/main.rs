//! CLI entry point for the covoit report.
//!
//! Loads the journeys and routes tables, applies the status and passenger
//! filters, and prints the "drivers with at least x trips" distribution with
//! the bonus drop. `interactive` keeps the filters between commands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use covoit_report::chart::render_chart;
use covoit_report::dataset::Dataset;
use covoit_report::filters::{DEFAULT_JOURNEYS_STATUS, DEFAULT_MIN_PASSENGERS, DEFAULT_ROUTES_STATUS};
use covoit_report::output::{print_pretty, render_summary, to_json, write_distribution_csv};
use covoit_report::pipeline::DEFAULT_BONUS_THRESHOLD;
use covoit_report::session::{Session, SessionCommand, run_interactive, write_options};
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "covoit_report")]
#[command(about = "Covoit distribution and bonus-drop report for ride-share data", long_about = None)]
struct Cli {
    /// Journeys CSV file
    #[arg(long, global = true, env = "JOURNEYS_CSV", default_value = "data/journeys.csv")]
    journeys: PathBuf,

    /// Routes CSV file
    #[arg(long, global = true, env = "ROUTES_CSV", default_value = "data/routes.csv")]
    routes: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the report once and print it
    Report {
        /// Route statuses to keep (comma separated)
        #[arg(long, num_args = 0.., value_delimiter = ',', default_value = DEFAULT_ROUTES_STATUS)]
        routes_status: Vec<String>,

        /// Journey statuses to keep (comma separated)
        #[arg(long, num_args = 0.., value_delimiter = ',', default_value = DEFAULT_JOURNEYS_STATUS)]
        journeys_status: Vec<String>,

        /// Minimum passengers for a route to count as a covoit (clamped to 1..=5)
        #[arg(short, long, default_value_t = DEFAULT_MIN_PASSENGERS)]
        min_passengers: u32,

        /// Covoit count that earns the bonus
        #[arg(long, default_value_t = DEFAULT_BONUS_THRESHOLD)]
        bonus_threshold: usize,

        /// Write the line chart to this SVG file
        #[arg(long)]
        chart: Option<PathBuf>,

        /// Write the frequency distribution to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print the report as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List the status values found in both tables
    Statuses,
    /// Adjust the filters line by line and re-render after each change
    Interactive {
        /// Rewrite the line chart to this SVG file after each change
        #[arg(long)]
        chart: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let _file_guard = init_tracing()?;

    let cli = Cli::parse();
    let dataset = Dataset::load(&cli.journeys, &cli.routes)?;
    let mut session = Session::new(dataset);

    match cli.command {
        Commands::Report {
            routes_status,
            journeys_status,
            min_passengers,
            bonus_threshold,
            chart,
            csv,
            json,
        } => {
            session.apply(SessionCommand::Routes {
                statuses: routes_status,
            })?;
            session.apply(SessionCommand::Journeys {
                statuses: journeys_status,
            })?;
            session.apply(SessionCommand::MinPassengers {
                value: min_passengers,
            })?;
            session.apply(SessionCommand::Threshold {
                value: bonus_threshold,
            })?;

            let report = session.report();
            print_pretty(&report);

            let mut stdout = std::io::stdout().lock();
            if json {
                writeln!(stdout, "{}", to_json(&report)?)?;
            } else {
                render_summary(&report, &mut stdout)?;
            }

            if let Some(path) = chart {
                render_chart(&path, &report.distribution)?;
                info!(path = %path.display(), "Chart written");
            }

            if let Some(path) = csv {
                write_distribution_csv(&path, &report.distribution)?;
                info!(path = %path.display(), "Distribution CSV written");
            }

            if let Err(e) = report.bonus_drop {
                return Err(e).context("bonus drop could not be computed");
            }
        }
        Commands::Statuses => {
            write_options(session.options(), &mut std::io::stdout().lock())?;
        }
        Commands::Interactive { chart } => {
            info!("Interactive session started, type `help` for commands");
            let stdin = std::io::stdin().lock();
            let mut stdout = std::io::stdout().lock();
            run_interactive(&mut session, stdin, &mut stdout, chart.as_deref())?;
        }
    }

    Ok(())
}

/// Coloured stderr logs plus a JSON rolling log file.
fn init_tracing() -> Result<WorkerGuard> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/covoit_report.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("covoit_report.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}
