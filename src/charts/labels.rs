//! Month labels for chart axes

use serde::{Deserialize, Serialize};
use std::str::FromStr;

const MONTHS_ES: [&str; 12] = [
    "ene.", "feb.", "mar.", "abr.", "may.", "jun.", "jul.", "ago.", "sep.", "oct.", "nov.", "dic.",
];

const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Language used for axis labels
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Spanish, the dashboard's native locale
    #[default]
    Es,
    /// English
    En,
}

impl Locale {
    /// Abbreviated name of a calendar month (1 = January)
    ///
    /// Out-of-range months wrap modulo 12.
    pub fn short_month(&self, month: u32) -> &'static str {
        let idx = (month.max(1) as usize - 1) % 12;
        match self {
            Locale::Es => MONTHS_ES[idx],
            Locale::En => MONTHS_EN[idx],
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locale::Es => write!(f, "es"),
            Locale::En => write!(f, "en"),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "es" | "spanish" => Ok(Locale::Es),
            "en" | "english" => Ok(Locale::En),
            other => Err(format!("Unknown locale: {}", other)),
        }
    }
}
