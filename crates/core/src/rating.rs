//! Running-mean arithmetic for space ratings.
//!
//! The database applies the same formula in a single `UPDATE` so concurrent
//! submissions never lose an increment; [`fold_rating`] is the in-process
//! reference used by tests and by anything that needs to predict the stored
//! value.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lowest accepted rating.
pub const RATING_MIN: i64 = 1;

/// Highest accepted rating.
pub const RATING_MAX: i64 = 5;

/// Fold one rating into a running mean.
///
/// Returns `(new_avg, new_count)`. With `count == 0` the previous average is
/// ignored, so the first rating becomes the average. No rounding is applied.
pub fn fold_rating(avg: f64, count: i64, rating: i64) -> (f64, i64) {
    let prior = if count == 0 { 0.0 } else { avg * count as f64 };
    let new_count = count + 1;
    ((prior + rating as f64) / new_count as f64, new_count)
}

/// How many times a multi-category submission is folded into the aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateMode {
    /// Once per created feedback row. A submission tagged with N categories
    /// increases the count by N.
    #[default]
    PerEntry,
    /// Once per submission regardless of how many rows it fans out into.
    PerSubmission,
}

impl AggregateMode {
    /// Number of aggregate updates for a submission that produced `entries` rows.
    pub fn updates_for(self, entries: usize) -> usize {
        match self {
            AggregateMode::PerEntry => entries,
            AggregateMode::PerSubmission => entries.min(1),
        }
    }
}

impl FromStr for AggregateMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "per_entry" => Ok(AggregateMode::PerEntry),
            "per_submission" => Ok(AggregateMode::PerSubmission),
            other => Err(CoreError::Validation(format!(
                "Unknown aggregate mode '{other}'. Must be one of: per_entry, per_submission"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold_all(ratings: &[i64]) -> (f64, i64) {
        ratings
            .iter()
            .fold((0.0, 0), |(avg, count), &r| fold_rating(avg, count, r))
    }

    #[test]
    fn first_rating_becomes_average() {
        assert_eq!(fold_rating(0.0, 0, 4), (4.0, 1));
    }

    #[test]
    fn stale_average_ignored_when_count_is_zero() {
        assert_eq!(fold_rating(3.2, 0, 5), (5.0, 1));
    }

    #[test]
    fn sequence_matches_arithmetic_mean() {
        let (avg, count) = fold_all(&[4, 2, 5]);
        assert_eq!(count, 3);
        assert!((avg - 11.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn order_does_not_change_result() {
        let (a, _) = fold_all(&[4, 2, 5]);
        let (b, _) = fold_all(&[5, 4, 2]);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn per_entry_counts_every_row() {
        assert_eq!(AggregateMode::PerEntry.updates_for(3), 3);
        assert_eq!(AggregateMode::PerSubmission.updates_for(3), 1);
        assert_eq!(AggregateMode::PerSubmission.updates_for(1), 1);
    }

    #[test]
    fn mode_parses_from_env_values() {
        assert_eq!("per_entry".parse::<AggregateMode>().unwrap(), AggregateMode::PerEntry);
        assert_eq!(
            " per_submission ".parse::<AggregateMode>().unwrap(),
            AggregateMode::PerSubmission
        );
        assert!("sometimes".parse::<AggregateMode>().is_err());
    }
}
