//! Data types produced by the aggregation pipeline.

use serde::Serialize;

use crate::filters::FilterState;
use crate::pipeline::bonus::{BonusDrop, BonusDropError};

/// A filtered route with the number of filtered journeys that reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteWithPassengers {
    pub id: String,
    pub driver_uid: Option<String>,
    pub status: String,
    pub nb_passengers: usize,
}

/// Number of covoit routes for one driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverCovoitCount {
    pub driver_uid: String,
    pub nb_covoits: usize,
}

/// One row of the frequency distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrequencyRow {
    /// Covoit count shared by the drivers of this row.
    pub nb_covoits_by_driver: usize,
    /// Drivers with exactly `nb_covoits_by_driver` covoits.
    pub nb_driver: usize,
    /// Drivers with at least `nb_covoits_by_driver` covoits.
    pub inverted_cumsum: usize,
}

/// Everything the presentation layer renders for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub filters: FilterState,
    pub distribution: Vec<FrequencyRow>,
    pub covoit_routes: usize,
    pub drivers: usize,
    #[serde(serialize_with = "serialize_bonus")]
    pub bonus_drop: Result<BonusDrop, BonusDropError>,
}

fn serialize_bonus<S>(
    value: &Result<BonusDrop, BonusDropError>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    #[derive(Serialize)]
    enum Outcome<'a> {
        #[serde(rename = "ok")]
        Computed(&'a BonusDrop),
        #[serde(rename = "error")]
        Failed(String),
    }

    match value {
        Ok(drop) => Outcome::Computed(drop).serialize(serializer),
        Err(e) => Outcome::Failed(e.to_string()).serialize(serializer),
    }
}
