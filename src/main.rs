//! Adminboard CLI
//!
//! Builds dashboard chart payloads from JSON record files:
//! - Monthly signups (users and prospects)
//! - Monthly revenue
//! - Chart surface options
//! - Default config file

use adminboard::charts::{
    aggregate_at, extract_revenue_at, load_records, signup_anchor, ChartOptions, Locale,
    RevenueChart, SignupChart, Theme,
};
use adminboard::config::{generate_default_config, Config, LoggingConfig};
use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "adminboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Admin dashboard chart series builder")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Month label locale (es, en); overrides the config
    #[arg(long, global = true)]
    pub locale: Option<Locale>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Users and prospects per month
    Signups {
        /// Anchor instant. Supports: "now", ISO 8601, Unix seconds
        #[arg(short, long)]
        anchor: String,
        /// JSON array of user records
        #[arg(short, long)]
        users: PathBuf,
        /// JSON array of prospect records
        #[arg(short, long)]
        prospects: PathBuf,
        /// Reference "now" (default: current time)
        #[arg(long)]
        now: Option<String>,
    },

    /// Signups chart anchored one month before an account was created
    SignupsFromAccount {
        /// Account creation instant
        #[arg(long)]
        account_created: String,
        #[arg(short, long)]
        users: PathBuf,
        #[arg(short, long)]
        prospects: PathBuf,
        #[arg(long)]
        now: Option<String>,
    },

    /// Revenue per month from embedded product lists
    Revenue {
        #[arg(short, long)]
        anchor: String,
        /// JSON array of user records with products
        #[arg(short, long)]
        records: PathBuf,
        #[arg(long)]
        now: Option<String>,
    },

    /// Print chart surface options
    Options {
        /// light or dark (default: from config)
        #[arg(short, long)]
        theme: Option<Theme>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging depends on the config, so a broken default file is reported after init
    let (mut config, default_error) = match &cli.config {
        Some(path) => (Config::load_with_env(path)?, None),
        None => match Config::load_default() {
            Ok(config) => (config, None),
            Err(e) => (Config::from_env(), Some(e)),
        },
    };
    if let Some(locale) = cli.locale {
        config.charts.locale = locale;
    }

    init_tracing(&config.logging)?;
    tracing::debug!("Adminboard v{}", env!("CARGO_PKG_VERSION"));
    if let Some(e) = default_error {
        tracing::warn!("Ignoring config file, using defaults: {}", e);
    }

    let locale = config.charts.locale;

    match cli.command {
        Commands::Signups {
            anchor,
            users,
            prospects,
            now,
        } => {
            let anchor = parse_instant(&anchor)?;
            print_signups(anchor, &users, &prospects, now.as_deref(), locale)?;
        }

        Commands::SignupsFromAccount {
            account_created,
            users,
            prospects,
            now,
        } => {
            let anchor = signup_anchor(parse_instant(&account_created)?)?;
            print_signups(anchor, &users, &prospects, now.as_deref(), locale)?;
        }

        Commands::Revenue {
            anchor,
            records,
            now,
        } => {
            let anchor = parse_instant(&anchor)?;
            let now = resolve_now(now.as_deref())?;
            let records = load_records(&records)?;

            let series = extract_revenue_at(anchor, now, &records, locale)?;
            tracing::info!("Revenue over six months: {:.2}", series.total());

            let output = serde_json::json!({
                "series": series,
                "chart": RevenueChart::from(&series),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Commands::Options { theme } => {
            let options = ChartOptions::new(theme.unwrap_or(config.charts.theme));
            println!("{}", serde_json::to_string_pretty(&options)?);
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Failed to write config to {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn print_signups(
    anchor: i64,
    users: &Path,
    prospects: &Path,
    now: Option<&str>,
    locale: Locale,
) -> anyhow::Result<()> {
    let now = resolve_now(now)?;
    let users = load_records(users)?;
    let prospects = load_records(prospects)?;

    let series = aggregate_at(anchor, now, &users, &prospects, locale)?;
    let (total_users, total_prospects) = series.totals();
    tracing::info!(
        "Signups over six months: {} users, {} prospects",
        total_users,
        total_prospects
    );

    let output = serde_json::json!({
        "series": series,
        "chart": SignupChart::from(&series),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn resolve_now(now: Option<&str>) -> anyhow::Result<i64> {
    match now {
        Some(s) => parse_instant(s),
        None => Ok(Utc::now().timestamp()),
    }
}

/// Parse "now", ISO 8601 or Unix seconds
fn parse_instant(s: &str) -> anyhow::Result<i64> {
    if s == "now" {
        return Ok(Utc::now().timestamp());
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp());
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc().timestamp());
        }
    }
    if let Ok(ts) = s.parse::<i64>() {
        return Ok(ts);
    }
    bail!("Invalid timestamp format: {}", s)
}

fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("adminboard={}", logging.level).into());

    // stdout carries the JSON output, logs go elsewhere
    let writer = match &logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            BoxMakeWriter::new(std::sync::Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(writer))
            .init();
    }

    Ok(())
}
