use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::dataset::{Dataset, Journey, Route};
use crate::filters::FilterState;
use crate::pipeline::bonus::bonus_drop;
use crate::pipeline::types::{DriverCovoitCount, FrequencyRow, Report, RouteWithPassengers};

/// Runs the whole pipeline for one filter state.
///
/// Pure with respect to its inputs: the same dataset, filters and threshold
/// always give the same report.
pub fn compute(dataset: &Dataset, filters: &FilterState, bonus_threshold: usize) -> Report {
    let journeys = filter_journeys(&dataset.journeys, filters);
    let routes = filter_routes(&dataset.routes, filters);

    let passengers = passengers_by_route(&journeys);
    let with_passengers = routes_with_passengers(&routes, &passengers);
    let covoits = covoit_routes(&with_passengers, filters.min_passengers());
    let by_driver = covoits_by_driver(&covoits);
    let distribution = frequency_distribution(&by_driver);

    let drivers: usize = distribution.iter().map(|row| row.nb_driver).sum();
    let bonus_drop = bonus_drop(&distribution, bonus_threshold);

    debug!(
        journeys = journeys.len(),
        routes = routes.len(),
        covoit_routes = covoits.len(),
        drivers,
        buckets = distribution.len(),
        "Report computed"
    );

    Report {
        filters: filters.clone(),
        distribution,
        covoit_routes: covoits.len(),
        drivers,
        bonus_drop,
    }
}

pub fn filter_journeys<'a>(journeys: &'a [Journey], filters: &FilterState) -> Vec<&'a Journey> {
    journeys
        .iter()
        .filter(|j| filters.journey_selected(&j.status))
        .collect()
}

pub fn filter_routes<'a>(routes: &'a [Route], filters: &FilterState) -> Vec<&'a Route> {
    routes
        .iter()
        .filter(|r| filters.route_selected(&r.status))
        .collect()
}

/// Counts journeys per route id. Journeys without a route are ignored.
pub fn passengers_by_route<'a>(journeys: &[&'a Journey]) -> HashMap<&'a str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for journey in journeys {
        if let Some(route_id) = journey.route_id.as_deref() {
            *counts.entry(route_id).or_default() += 1;
        }
    }
    counts
}

/// Left join of routes with their passenger counts; unmatched routes get 0.
pub fn routes_with_passengers(
    routes: &[&Route],
    passengers: &HashMap<&str, usize>,
) -> Vec<RouteWithPassengers> {
    routes
        .iter()
        .map(|route| RouteWithPassengers {
            id: route.id.clone(),
            driver_uid: route.driver_uid.clone(),
            status: route.status.clone(),
            nb_passengers: passengers.get(route.id.as_str()).copied().unwrap_or(0),
        })
        .collect()
}

pub fn covoit_routes(
    routes: &[RouteWithPassengers],
    min_passengers: u32,
) -> Vec<RouteWithPassengers> {
    routes
        .iter()
        .filter(|r| r.nb_passengers >= min_passengers as usize)
        .cloned()
        .collect()
}

/// Covoit count per driver, sorted by driver id. Driverless routes are skipped.
pub fn covoits_by_driver(covoits: &[RouteWithPassengers]) -> Vec<DriverCovoitCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for route in covoits {
        if let Some(driver) = route.driver_uid.as_deref() {
            *counts.entry(driver).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .map(|(driver_uid, nb_covoits)| DriverCovoitCount {
            driver_uid: driver_uid.to_string(),
            nb_covoits,
        })
        .collect()
}

/// Drivers per covoit count, ascending, with the reverse cumulative sum.
pub fn frequency_distribution(by_driver: &[DriverCovoitCount]) -> Vec<FrequencyRow> {
    let mut buckets: BTreeMap<usize, usize> = BTreeMap::new();
    for driver in by_driver {
        *buckets.entry(driver.nb_covoits).or_default() += 1;
    }

    let mut rows: Vec<FrequencyRow> = buckets
        .into_iter()
        .map(|(nb_covoits_by_driver, nb_driver)| FrequencyRow {
            nb_covoits_by_driver,
            nb_driver,
            inverted_cumsum: 0,
        })
        .collect();

    let mut running = 0;
    for row in rows.iter_mut().rev() {
        running += row.nb_driver;
        row.inverted_cumsum = running;
    }

    rows
}
