//! Monthly revenue extraction
//!
//! Flattens the product lists embedded in user records and sums prices per
//! monthly window. Unlike the signup chart, each window is named after the month
//! it starts in.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::error::{ChartError, ChartResult};
use super::labels::Locale;
use super::types::{LineItem, Record, WINDOW_COUNT};
use super::window::{clamp_anchor, monthly_windows, LabelEdge};

/// How far back a stale revenue anchor is moved, in months
const REVENUE_LOOKBACK_MONTHS: u32 = 6;

/// Per-window revenue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RevenueSeries {
    pub labels: [String; WINDOW_COUNT],
    pub values: [f64; WINDOW_COUNT],
}

impl RevenueSeries {
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Sum line-item prices per monthly window relative to the current time
pub fn extract_revenue(anchor: i64, records: &[Record], locale: Locale) -> ChartResult<RevenueSeries> {
    extract_revenue_at(anchor, Utc::now().timestamp(), records, locale)
}

/// Sum line-item prices per monthly window with an explicit "now"
///
/// Only records carrying a product payload take part. A payload that is not a
/// valid line-item list fails the whole call. Windows without purchases are 0.
pub fn extract_revenue_at(
    anchor: i64,
    now: i64,
    records: &[Record],
    locale: Locale,
) -> ChartResult<RevenueSeries> {
    let anchor = clamp_anchor(anchor, now, REVENUE_LOOKBACK_MONTHS)?;
    let windows = monthly_windows(anchor, LabelEdge::Start)?;

    let items = decode_line_items(records)?;

    let mut values = [0.0f64; WINDOW_COUNT];
    for window in &windows {
        values[window.index] = items
            .iter()
            .filter(|item| window.contains_strict(item.t))
            .map(|item| item.p)
            .sum();
    }

    let series = RevenueSeries {
        labels: windows.map(|w| w.label(locale)),
        values,
    };

    tracing::debug!(
        anchor,
        items = items.len(),
        labels = ?series.labels,
        values = ?series.values,
        "Extracted revenue"
    );

    Ok(series)
}

/// Decode and flatten the product payloads of every record that has one
fn decode_line_items(records: &[Record]) -> ChartResult<Vec<LineItem>> {
    let mut items = Vec::new();

    for (idx, record) in records.iter().enumerate() {
        let decoded = record
            .line_items()
            .map_err(|source| ChartError::LineItems { record: idx, source })?;

        if let Some(record_items) = decoded {
            items.extend(record_items);
        }
    }

    Ok(items)
}
