//! Monthly window derivation
//!
//! Every chart covers [`WINDOW_COUNT`] consecutive calendar months derived from an
//! anchor instant. Month offsets are always taken from the anchor itself, so a day
//! that does not exist in a target month clamps to that month's last day without
//! drifting the later windows (Jan 31 + 1 month = Feb 28, Jan 31 + 2 months = Mar 31).

use chrono::{DateTime, Datelike, Months, Utc};

use super::error::{ChartError, ChartResult};
use super::labels::Locale;
use super::types::WINDOW_COUNT;

/// Which edge of a window names it on the axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelEdge {
    /// Label with the month the window starts in
    Start,
    /// Label with the month the window ends in (one month after the start)
    End,
}

/// A one-month bucket `[start, end)` in epoch seconds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthWindow {
    /// Position in the series (0 = oldest)
    pub index: usize,
    /// Window start in epoch seconds
    pub start: i64,
    /// Window end in epoch seconds
    pub end: i64,
    /// Calendar month (1-12) shown on the axis
    pub label_month: u32,
}

impl MonthWindow {
    /// Strict membership: instants on either boundary are excluded
    pub fn contains_strict(&self, timestamp: i64) -> bool {
        timestamp > self.start && timestamp < self.end
    }

    /// Axis label in the given locale
    pub fn label(&self, locale: Locale) -> String {
        locale.short_month(self.label_month).to_string()
    }
}

/// Convert epoch seconds to a UTC datetime
pub fn to_datetime(timestamp: i64) -> ChartResult<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp, 0).ok_or(ChartError::InvalidTimestamp(timestamp))
}

/// `timestamp + months` calendar months
pub fn add_months(timestamp: i64, months: u32) -> ChartResult<DateTime<Utc>> {
    to_datetime(timestamp)?
        .checked_add_months(Months::new(months))
        .ok_or(ChartError::InvalidTimestamp(timestamp))
}

/// `timestamp - months` calendar months
pub fn sub_months(timestamp: i64, months: u32) -> ChartResult<DateTime<Utc>> {
    to_datetime(timestamp)?
        .checked_sub_months(Months::new(months))
        .ok_or(ChartError::InvalidTimestamp(timestamp))
}

/// Replace a stale anchor
///
/// When the six months following `anchor` end before `now`, the anchor is moved to
/// `now - lookback_months`. Otherwise it is returned unchanged.
pub fn clamp_anchor(anchor: i64, now: i64, lookback_months: u32) -> ChartResult<i64> {
    let horizon = add_months(anchor, WINDOW_COUNT as u32)?.timestamp();
    if horizon < now {
        let clamped = sub_months(now, lookback_months)?.timestamp();
        tracing::debug!(anchor, now, clamped, "Anchor is stale, clamping");
        Ok(clamped)
    } else {
        Ok(anchor)
    }
}

/// Derive the six consecutive windows starting at `anchor`
pub fn monthly_windows(anchor: i64, edge: LabelEdge) -> ChartResult<[MonthWindow; WINDOW_COUNT]> {
    let mut bounds = [0i64; WINDOW_COUNT + 1];
    let mut months = [0u32; WINDOW_COUNT + 1];

    for (i, (bound, month)) in bounds.iter_mut().zip(months.iter_mut()).enumerate() {
        let dt = add_months(anchor, i as u32)?;
        *bound = dt.timestamp();
        *month = dt.month();
    }

    Ok(std::array::from_fn(|i| MonthWindow {
        index: i,
        start: bounds[i],
        end: bounds[i + 1],
        label_month: match edge {
            LabelEdge::Start => months[i],
            LabelEdge::End => months[i + 1],
        },
    }))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Epoch seconds for midnight UTC on the given date
    pub(crate) fn ts(year: i32, month: u32, day: u32) -> i64 {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
            .unwrap()
            .timestamp()
    }

    #[test]
    fn test_windows_are_contiguous() {
        let windows = monthly_windows(ts(2023, 1, 1), LabelEdge::Start).unwrap();

        assert_eq!(windows.len(), WINDOW_COUNT);
        assert_eq!(windows[0].start, ts(2023, 1, 1));
        assert_eq!(windows[5].end, ts(2023, 7, 1));
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert_eq!(pair[0].index + 1, pair[1].index);
        }
    }

    #[test]
    fn test_label_edge() {
        let start = monthly_windows(ts(2023, 1, 1), LabelEdge::Start).unwrap();
        let end = monthly_windows(ts(2023, 1, 1), LabelEdge::End).unwrap();

        assert_eq!(start[0].label_month, 1);
        assert_eq!(end[0].label_month, 2);
        assert_eq!(start[5].label(Locale::En), "Jun");
        assert_eq!(end[5].label(Locale::En), "Jul");
    }

    #[test]
    fn test_end_of_month_does_not_drift() {
        let windows = monthly_windows(ts(2023, 1, 31), LabelEdge::Start).unwrap();

        assert_eq!(windows[0].end, ts(2023, 2, 28));
        assert_eq!(windows[1].end, ts(2023, 3, 31));
        assert_eq!(windows[2].end, ts(2023, 4, 30));
    }

    #[test]
    fn test_contains_strict() {
        let window = MonthWindow {
            index: 0,
            start: 100,
            end: 200,
            label_month: 1,
        };

        assert!(!window.contains_strict(100));
        assert!(window.contains_strict(101));
        assert!(window.contains_strict(199));
        assert!(!window.contains_strict(200));
    }

    #[test]
    fn test_clamp_anchor() {
        let now = ts(2023, 8, 1);

        // Six months after the anchor still reaches now
        assert_eq!(clamp_anchor(ts(2023, 3, 1), now, 7).unwrap(), ts(2023, 3, 1));
        assert_eq!(clamp_anchor(ts(2023, 2, 1), now, 7).unwrap(), ts(2023, 2, 1));

        // Stale anchors move relative to now
        assert_eq!(clamp_anchor(ts(2020, 5, 17), now, 7).unwrap(), ts(2023, 1, 1));
        assert_eq!(clamp_anchor(ts(2020, 5, 17), now, 6).unwrap(), ts(2023, 2, 1));
    }

    #[test]
    fn test_invalid_timestamp() {
        assert!(matches!(
            to_datetime(i64::MAX),
            Err(ChartError::InvalidTimestamp(i64::MAX))
        ));
        assert!(monthly_windows(i64::MAX, LabelEdge::End).is_err());
    }
}
