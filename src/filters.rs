//! User-adjustable report parameters and the domains they are chosen from.

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::dataset::{Dataset, distinct_values};

pub const DEFAULT_ROUTES_STATUS: &str = "DONE";
pub const DEFAULT_JOURNEYS_STATUS: &str = "VALIDATED";

pub const MIN_PASSENGERS_LOWER: u32 = 1;
pub const MIN_PASSENGERS_UPPER: u32 = 5;
pub const DEFAULT_MIN_PASSENGERS: u32 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown {table} status '{value}' (available: {available})")]
    UnknownStatus {
        table: &'static str,
        value: String,
        available: String,
    },
}

/// Selectable status values, derived once from the loaded data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusOptions {
    pub routes: Vec<String>,
    pub journeys: Vec<String>,
}

impl StatusOptions {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            routes: distinct_values(&dataset.routes, |r| r.status.as_str()),
            journeys: distinct_values(&dataset.journeys, |j| j.status.as_str()),
        }
    }
}

/// Current filter selection.
///
/// `min_passengers` always lies in `MIN_PASSENGERS_LOWER..=MIN_PASSENGERS_UPPER`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub routes_status: Vec<String>,
    pub journeys_status: Vec<String>,
    min_passengers: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            routes_status: vec![DEFAULT_ROUTES_STATUS.to_string()],
            journeys_status: vec![DEFAULT_JOURNEYS_STATUS.to_string()],
            min_passengers: DEFAULT_MIN_PASSENGERS,
        }
    }
}

impl FilterState {
    pub fn min_passengers(&self) -> u32 {
        self.min_passengers
    }

    /// Sets the passenger threshold, clamping it into the slider range.
    pub fn set_min_passengers(&mut self, value: u32) {
        let clamped = value.clamp(MIN_PASSENGERS_LOWER, MIN_PASSENGERS_UPPER);
        if clamped != value {
            warn!(
                requested = value,
                applied = clamped,
                "min_passengers out of range, clamped"
            );
        }
        self.min_passengers = clamped;
    }

    pub fn with_min_passengers(mut self, value: u32) -> Self {
        self.set_min_passengers(value);
        self
    }

    pub fn set_routes_status(
        &mut self,
        options: &StatusOptions,
        selection: Vec<String>,
    ) -> Result<(), FilterError> {
        check_selection("route", &options.routes, &selection)?;
        self.routes_status = dedup(selection);
        Ok(())
    }

    pub fn set_journeys_status(
        &mut self,
        options: &StatusOptions,
        selection: Vec<String>,
    ) -> Result<(), FilterError> {
        check_selection("journey", &options.journeys, &selection)?;
        self.journeys_status = dedup(selection);
        Ok(())
    }

    /// Checks the current selections against `options`. Used for the defaults,
    /// which are not guaranteed to exist in every dataset.
    pub fn validate(&self, options: &StatusOptions) -> Result<(), FilterError> {
        check_selection("route", &options.routes, &self.routes_status)?;
        check_selection("journey", &options.journeys, &self.journeys_status)
    }

    pub fn route_selected(&self, status: &str) -> bool {
        self.routes_status.iter().any(|s| s == status)
    }

    pub fn journey_selected(&self, status: &str) -> bool {
        self.journeys_status.iter().any(|s| s == status)
    }
}

fn check_selection(
    table: &'static str,
    available: &[String],
    selection: &[String],
) -> Result<(), FilterError> {
    match selection.iter().find(|s| !available.contains(*s)) {
        Some(value) => Err(FilterError::UnknownStatus {
            table,
            value: value.clone(),
            available: available.join(", "),
        }),
        None => Ok(()),
    }
}

fn dedup(selection: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(selection.len());
    for value in selection {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> StatusOptions {
        StatusOptions {
            routes: vec!["DONE".into(), "CANCELLED".into()],
            journeys: vec!["VALIDATED".into(), "PENDING".into()],
        }
    }

    #[test]
    fn test_defaults() {
        let state = FilterState::default();

        assert_eq!(state.routes_status, vec!["DONE"]);
        assert_eq!(state.journeys_status, vec!["VALIDATED"]);
        assert_eq!(state.min_passengers(), 1);
        assert!(state.validate(&options()).is_ok());
    }

    #[test]
    fn test_min_passengers_clamped() {
        let mut state = FilterState::default();

        state.set_min_passengers(0);
        assert_eq!(state.min_passengers(), 1);

        state.set_min_passengers(9);
        assert_eq!(state.min_passengers(), 5);

        state.set_min_passengers(3);
        assert_eq!(state.min_passengers(), 3);
    }

    #[test]
    fn test_unknown_status_rejected() {
        let mut state = FilterState::default();
        let err = state
            .set_routes_status(&options(), vec!["DONE".into(), "LOST".into()])
            .unwrap_err();

        assert_eq!(
            err,
            FilterError::UnknownStatus {
                table: "route",
                value: "LOST".into(),
                available: "DONE, CANCELLED".into(),
            }
        );
        assert_eq!(state.routes_status, vec!["DONE"]);
    }

    #[test]
    fn test_empty_selection_allowed() {
        let mut state = FilterState::default();
        state.set_journeys_status(&options(), Vec::new()).unwrap();

        assert!(state.journeys_status.is_empty());
        assert!(!state.journey_selected("VALIDATED"));
    }

    #[test]
    fn test_selection_deduplicated() {
        let mut state = FilterState::default();
        state
            .set_routes_status(&options(), vec!["DONE".into(), "CANCELLED".into(), "DONE".into()])
            .unwrap();

        assert_eq!(state.routes_status, vec!["DONE", "CANCELLED"]);
        assert!(state.route_selected("CANCELLED"));
    }

    #[test]
    fn test_defaults_missing_from_data() {
        let options = StatusOptions {
            routes: vec!["FINISHED".into()],
            journeys: vec!["VALIDATED".into()],
        };
        assert!(FilterState::default().validate(&options).is_err());
    }
}
