//! # Adminboard
//!
//! Data layer of an admin dashboard: monthly chart series built from user,
//! prospect and revenue records, an explicit chart surface configuration, and a
//! headless comments panel bound to a comment store and an auto-refresh hub.
//!
//! ## Modules
//!
//! - [`charts`]: Six-month signup and revenue series, chart options and payloads
//! - [`comments`]: Comment model, input sanitizing, store, refresh hub and widget
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use adminboard::charts::{aggregate, extract_revenue, signup_anchor, Locale, Record, SignupChart};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let users = vec![Record::created(1_700_000_000).products(r#"[{"t": 1700000100, "p": 49.9}]"#)];
//!     let prospects = vec![Record::created(1_700_050_000)];
//!
//!     let anchor = signup_anchor(1_690_000_000)?;
//!     let signups = aggregate(anchor, &users, &prospects, Locale::Es)?;
//!     let revenue = extract_revenue(1_690_000_000, &users, Locale::Es)?;
//!
//!     println!("{}", serde_json::to_string(&SignupChart::from(&signups))?);
//!     println!("Revenue over six months: {}", revenue.total());
//!     Ok(())
//! }
//! ```

pub mod charts;
pub mod comments;
pub mod config;

// Re-export top-level types for convenience
pub use charts::{
    aggregate, aggregate_at, extract_revenue, extract_revenue_at, signup_anchor, ChartError,
    ChartOptions, ChartResult, LineItem, Locale, Record, RevenueChart, RevenueSeries, SignupChart,
    SignupSeries, Theme, WINDOW_COUNT,
};

pub use comments::{
    sort_newest_first, ChannelKey, Comment, CommentError, CommentResult, CommentStore,
    CommentThread, CommentsView, CommentsWidget, MemoryCommentStore, Priority, RefreshHub,
    Subscription, WidgetConfig,
};

pub use config::{ChartsConfig, CommentsConfig, Config, ConfigError, LoggingConfig};
