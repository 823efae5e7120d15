//! Dashboard chart builders
//!
//! - **types**: Input records and embedded line items
//! - **window**: Anchor clamping and monthly window derivation
//! - **signups**: Users/prospects counts per month
//! - **revenue**: Line-item revenue per month
//! - **labels**: Localized month names
//! - **options**: Explicit chart surface configuration
//! - **series**: `{labels, datasets}` payloads for the surface
//!
//! # Example
//!
//! ```rust
//! use adminboard::charts::{aggregate_at, Locale, Record, SignupChart};
//!
//! let users = vec![Record::created(1_678_838_400)]; // 2023-03-15
//! let series = aggregate_at(1_672_531_200, 1_690_848_000, &users, &[], Locale::En).unwrap();
//! assert_eq!(series.values_a[2], 1);
//!
//! let chart = SignupChart::from(&series);
//! assert_eq!(chart.users.labels[2], "Apr");
//! ```

pub mod error;
pub mod labels;
pub mod options;
pub mod revenue;
pub mod series;
pub mod signups;
pub mod types;
pub mod window;

pub use error::{ChartError, ChartResult};
pub use labels::Locale;
pub use options::{doughnut_legend, ChartOptions, ChartOverrides, Palette, Theme, TickFormat, TooltipFormat};
pub use revenue::{extract_revenue, extract_revenue_at, RevenueSeries};
pub use series::{ChartData, Dataset, RevenueChart, SignupChart};
pub use signups::{aggregate, aggregate_at, signup_anchor, SignupSeries};
pub use types::{load_records, LineItem, Record, WINDOW_COUNT};
pub use window::{monthly_windows, LabelEdge, MonthWindow};
