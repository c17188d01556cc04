//! CSV loader for the journeys and routes tables.
//!
//! Only the columns used by the pipeline are deserialized; any other column in
//! the source files is ignored.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// A single passenger's participation in a route.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Journey {
    pub driver_uid: Option<String>,
    pub status: String,
    pub route_id: Option<String>,
    pub cancel_reason: Option<String>,
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
}

/// A driver-operated trip.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Route {
    pub driver_uid: Option<String>,
    pub status: String,
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
}

/// Both tables, loaded once and never mutated.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub journeys: Vec<Journey>,
    pub routes: Vec<Route>,
}

impl Dataset {
    pub fn new(journeys: Vec<Journey>, routes: Vec<Route>) -> Self {
        Self { journeys, routes }
    }

    /// Loads both CSV files. Any I/O or parse failure is fatal for the caller.
    pub fn load(journeys_path: impl AsRef<Path>, routes_path: impl AsRef<Path>) -> Result<Self> {
        let (journeys_path, routes_path) = (journeys_path.as_ref(), routes_path.as_ref());
        let journeys = load_journeys(journeys_path)?;
        let routes = load_routes(routes_path)?;

        info!(
            journeys_path = %journeys_path.display(),
            routes_path = %routes_path.display(),
            journeys = journeys.len(),
            routes = routes.len(),
            "Datasets loaded"
        );

        Ok(Self { journeys, routes })
    }
}

/// Reads the journeys table from a CSV file.
pub fn load_journeys(path: impl AsRef<Path>) -> Result<Vec<Journey>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("failed to open journeys file '{}'", path.display()))?;
    read_journeys(file).with_context(|| format!("failed to parse journeys file '{}'", path.display()))
}

/// Reads the routes table from a CSV file.
pub fn load_routes(path: impl AsRef<Path>) -> Result<Vec<Route>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("failed to open routes file '{}'", path.display()))?;
    read_routes(file).with_context(|| format!("failed to parse routes file '{}'", path.display()))
}

/// Required header columns; each entry lists the accepted names for one column.
const JOURNEY_COLUMNS: &[&[&str]] = &[
    &["driver_uid"],
    &["status"],
    &["route_id"],
    &["cancel_reason"],
    &["_id", "id"],
];

const ROUTE_COLUMNS: &[&[&str]] = &[&["driver_uid"], &["status"], &["_id", "id"]];

pub fn read_journeys<R: Read>(reader: R) -> Result<Vec<Journey>> {
    read_rows(reader, JOURNEY_COLUMNS)
}

pub fn read_routes<R: Read>(reader: R) -> Result<Vec<Route>> {
    read_rows(reader, ROUTE_COLUMNS)
}

fn read_rows<R, T>(reader: R, required: &[&[&str]]) -> Result<Vec<T>>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
{
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr.headers()?;
    for names in required {
        if !names.iter().any(|name| headers.iter().any(|h| h == *name)) {
            bail!("missing required column '{}'", names.join("' or '"));
        }
    }

    let mut rows = Vec::new();

    for result in rdr.deserialize() {
        let record: T = result?;
        rows.push(record);
    }

    debug!(rows = rows.len(), "CSV rows read");
    Ok(rows)
}

/// Returns the distinct values of a string column, in first-seen order.
pub fn distinct_values<'a, T, F>(rows: &'a [T], column: F) -> Vec<String>
where
    F: Fn(&'a T) -> &'a str,
{
    let mut values: Vec<String> = Vec::new();
    for row in rows {
        let value = column(row);
        if !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }
    values
}
