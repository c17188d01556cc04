//! Covoit aggregation and bonus-drop computation.
//!
//! Joins filtered routes with their filtered journeys, keeps the routes that
//! carry enough passengers, counts them per driver and turns those counts
//! into a "drivers with at least x covoits" distribution.

pub mod aggregate;
pub mod bonus;
pub mod types;

pub use aggregate::compute;
pub use bonus::{BonusDrop, BonusDropError, DEFAULT_BONUS_THRESHOLD, bonus_drop};
pub use types::{DriverCovoitCount, FrequencyRow, Report, RouteWithPassengers};
