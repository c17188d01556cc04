use serde::Serialize;
use thiserror::Error;

use crate::pipeline::types::FrequencyRow;

/// Covoit count at which a driver earns the loyalty bonus.
pub const DEFAULT_BONUS_THRESHOLD: usize = 10;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BonusDropError {
    #[error("no driver has exactly {0} covoits, bonus drop is undefined")]
    MissingBucket(usize),
    #[error("no driver reached {0} covoits, bonus drop divides by zero")]
    DivisionByZero(usize),
}

/// Share of drivers who reach the bonus threshold but not one trip more.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BonusDrop {
    pub threshold: usize,
    /// Drivers with at least `threshold` covoits.
    pub at_threshold: usize,
    /// Drivers with at least `threshold + 1` covoits.
    pub above_threshold: usize,
    pub drop: f64,
}

impl BonusDrop {
    /// Drop as a whole percentage, truncated.
    pub fn percent(&self) -> u32 {
        (self.drop * 100.0).floor() as u32
    }
}

/// Computes the bonus drop from a distribution sorted by covoit count.
///
/// The threshold row must exist exactly. Past the threshold, a missing
/// `threshold + 1` row means no driver went further, so the count is 0.
pub fn bonus_drop(
    distribution: &[FrequencyRow],
    threshold: usize,
) -> Result<BonusDrop, BonusDropError> {
    let at_threshold = distribution
        .iter()
        .find(|row| row.nb_covoits_by_driver == threshold)
        .map(|row| row.inverted_cumsum)
        .ok_or(BonusDropError::MissingBucket(threshold))?;

    if at_threshold == 0 {
        return Err(BonusDropError::DivisionByZero(threshold));
    }

    let above_threshold = distribution
        .iter()
        .filter(|row| row.nb_covoits_by_driver > threshold)
        .map(|row| row.nb_driver)
        .sum::<usize>();

    Ok(BonusDrop {
        threshold,
        at_threshold,
        above_threshold,
        drop: 1.0 - (above_threshold as f64 / at_threshold as f64),
    })
}
