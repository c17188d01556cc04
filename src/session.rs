//! Interactive front end: holds the loaded data and the filter state, and
//! re-runs the whole pipeline after every change.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{error, info, warn};

use crate::chart::render_chart;
use crate::dataset::Dataset;
use crate::filters::{FilterError, FilterState, StatusOptions};
use crate::output::render_summary;
use crate::pipeline::{DEFAULT_BONUS_THRESHOLD, Report, compute};

/// One line typed at the interactive prompt.
#[derive(Debug, Parser)]
#[command(no_binary_name = true, name = "session")]
struct PromptLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum SessionCommand {
    /// Select route statuses (no value clears the selection)
    Routes {
        #[arg(value_delimiter = ',')]
        statuses: Vec<String>,
    },
    /// Select journey statuses (no value clears the selection)
    Journeys {
        #[arg(value_delimiter = ',')]
        statuses: Vec<String>,
    },
    /// Minimum passengers for a route to count as a covoit (1 to 5)
    #[command(alias = "min")]
    MinPassengers { value: u32 },
    /// Covoit count that earns the bonus
    Threshold { value: usize },
    /// Render the report again
    Show,
    /// List the selectable status values
    Options,
    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

/// What the caller should do after a command was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Render,
    ListOptions,
    Quit,
}

pub struct Session {
    dataset: Dataset,
    options: StatusOptions,
    filters: FilterState,
    bonus_threshold: usize,
}

impl Session {
    /// Starts a session on the default filters. Status options are derived
    /// here, once per load.
    pub fn new(dataset: Dataset) -> Self {
        let options = StatusOptions::from_dataset(&dataset);
        Self {
            dataset,
            options,
            filters: FilterState::default(),
            bonus_threshold: DEFAULT_BONUS_THRESHOLD,
        }
    }

    pub fn options(&self) -> &StatusOptions {
        &self.options
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn bonus_threshold(&self) -> usize {
        self.bonus_threshold
    }

    pub fn report(&self) -> Report {
        compute(&self.dataset, &self.filters, self.bonus_threshold)
    }

    pub fn apply(&mut self, command: SessionCommand) -> Result<Outcome, FilterError> {
        match command {
            SessionCommand::Routes { statuses } => {
                self.filters.set_routes_status(&self.options, statuses)?;
            }
            SessionCommand::Journeys { statuses } => {
                self.filters.set_journeys_status(&self.options, statuses)?;
            }
            SessionCommand::MinPassengers { value } => self.filters.set_min_passengers(value),
            SessionCommand::Threshold { value } => self.bonus_threshold = value,
            SessionCommand::Show => {}
            SessionCommand::Options => return Ok(Outcome::ListOptions),
            SessionCommand::Quit => return Ok(Outcome::Quit),
        }
        Ok(Outcome::Render)
    }
}

/// Parses a prompt line such as `routes DONE,CANCELLED` or `min-passengers 2`.
pub fn parse_command(line: &str) -> Result<SessionCommand, clap::Error> {
    PromptLine::try_parse_from(line.split_whitespace()).map(|p| p.command)
}

/// Reads commands from `input` until `quit` or end of input. The report is
/// rendered once at start and again after every accepted change.
pub fn run_interactive<R, W>(
    session: &mut Session,
    input: R,
    out: &mut W,
    chart: Option<&Path>,
) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    if let Err(e) = session.filters().validate(session.options()) {
        warn!(error = %e, "Default filters do not match the data");
        writeln!(out, "warning: {e}")?;
    }

    render(session, out, chart)?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let command = match parse_command(line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };

        info!(?command, "Session command");
        match session.apply(command) {
            Ok(Outcome::Render) => render(session, out, chart)?,
            Ok(Outcome::ListOptions) => write_options(session.options(), out)?,
            Ok(Outcome::Quit) => break,
            Err(e) => writeln!(out, "error: {e}")?,
        }
    }

    Ok(())
}

fn render<W: Write>(session: &Session, out: &mut W, chart: Option<&Path>) -> Result<()> {
    let report = session.report();
    let filters = session.filters();

    writeln!(
        out,
        "\n[routes: {}] [journeys: {}] [min passengers: {}] [bonus at: {}]",
        filters.routes_status.join(","),
        filters.journeys_status.join(","),
        filters.min_passengers(),
        session.bonus_threshold()
    )?;
    render_summary(&report, out)?;

    if let Some(path) = chart {
        if let Err(e) = render_chart(path, &report.distribution) {
            error!(error = %e, path = %path.display(), "Chart rendering failed");
            writeln!(out, "error: chart rendering failed: {e:#}")?;
        }
    }

    Ok(())
}

pub fn write_options<W: Write>(options: &StatusOptions, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Route statuses: {}", options.routes.join(", "))?;
    writeln!(out, "Journey statuses: {}", options.journeys.join(", "))
}
