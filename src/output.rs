//! Text, JSON and CSV renderings of a [`Report`].

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::pipeline::{FrequencyRow, Report};

/// Logs the report using Rust's debug pretty-print format.
pub fn print_pretty(report: &Report) {
    debug!("{:#?}", report);
}

/// Writes the human-readable summary: distribution table, trip and driver
/// totals, and the bonus drop (or the reason it could not be computed).
pub fn render_summary<W: Write>(report: &Report, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "### Number of drivers with at least x trips")?;
    render_distribution(&report.distribution, out)?;
    writeln!(out)?;
    writeln!(out, "Trips matching the filters: {}", report.covoit_routes)?;
    writeln!(
        out,
        "Drivers with x trips matching the filters: {}",
        report.drivers
    )?;

    match &report.bonus_drop {
        Ok(drop) => writeln!(
            out,
            "=> Loss of {}% of drivers after reaching the bonus",
            drop.percent()
        )?,
        Err(e) => writeln!(out, "=> Bonus drop unavailable: {e}")?,
    }

    Ok(())
}

fn render_distribution<W: Write>(rows: &[FrequencyRow], out: &mut W) -> std::io::Result<()> {
    if rows.is_empty() {
        return writeln!(out, "(no driver matches the filters)");
    }

    writeln!(out, "{:>10} {:>10} {:>10}", "trips", "drivers", "at least")?;
    for row in rows {
        writeln!(
            out,
            "{:>10} {:>10} {:>10}",
            row.nb_covoits_by_driver, row.nb_driver, row.inverted_cumsum
        )?;
    }
    Ok(())
}

#[derive(Serialize)]
struct ReportEnvelope<'a> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    report: &'a Report,
}

/// Serializes the report as pretty-printed JSON with a generation timestamp.
pub fn to_json(report: &Report) -> Result<String> {
    let envelope = ReportEnvelope {
        generated_at: Utc::now(),
        report,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// Writes the frequency distribution to a CSV file, replacing any previous one.
pub fn write_distribution_csv(path: impl AsRef<Path>, rows: &[FrequencyRow]) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), rows = rows.len(), "Writing distribution CSV");

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
