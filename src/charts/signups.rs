//! Monthly signup aggregation
//!
//! Counts two record collections (registered users and prospects) per monthly
//! window. Each window is named after the month it ends in.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::error::ChartResult;
use super::labels::Locale;
use super::types::{Record, WINDOW_COUNT};
use super::window::{clamp_anchor, monthly_windows, sub_months, LabelEdge};

/// How far back a stale signup anchor is moved, in months
const SIGNUP_LOOKBACK_MONTHS: u32 = 7;

/// Per-window counts for two record collections
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignupSeries {
    pub labels: [String; WINDOW_COUNT],
    pub values_a: [u32; WINDOW_COUNT],
    pub values_b: [u32; WINDOW_COUNT],
}

impl SignupSeries {
    /// Total records counted across all windows, per collection
    pub fn totals(&self) -> (u32, u32) {
        (self.values_a.iter().sum(), self.values_b.iter().sum())
    }
}

/// Anchor for the signup chart of an account created at `account_created_at`
///
/// The chart starts one month before the account existed.
pub fn signup_anchor(account_created_at: i64) -> ChartResult<i64> {
    Ok(sub_months(account_created_at, 1)?.timestamp())
}

/// Count records per monthly window relative to the current time
pub fn aggregate(
    anchor: i64,
    records_a: &[Record],
    records_b: &[Record],
    locale: Locale,
) -> ChartResult<SignupSeries> {
    aggregate_at(anchor, Utc::now().timestamp(), records_a, records_b, locale)
}

/// Count records per monthly window with an explicit "now"
///
/// A stale anchor (six months after it are already past) is replaced with
/// `now - 7 months`. Records without a creation instant, or created exactly on a
/// window boundary, are not counted.
pub fn aggregate_at(
    anchor: i64,
    now: i64,
    records_a: &[Record],
    records_b: &[Record],
    locale: Locale,
) -> ChartResult<SignupSeries> {
    let anchor = clamp_anchor(anchor, now, SIGNUP_LOOKBACK_MONTHS)?;
    let windows = monthly_windows(anchor, LabelEdge::End)?;

    let mut values_a = [0u32; WINDOW_COUNT];
    let mut values_b = [0u32; WINDOW_COUNT];

    for window in &windows {
        let count = |records: &[Record]| {
            records
                .iter()
                .filter_map(|r| r.create_at)
                .filter(|t| window.contains_strict(*t))
                .count() as u32
        };

        values_a[window.index] = count(records_a);
        values_b[window.index] = count(records_b);
    }

    let series = SignupSeries {
        labels: windows.map(|w| w.label(locale)),
        values_a,
        values_b,
    };

    tracing::debug!(
        anchor,
        labels = ?series.labels,
        values_a = ?series.values_a,
        values_b = ?series.values_b,
        "Aggregated signups"
    );

    Ok(series)
}
