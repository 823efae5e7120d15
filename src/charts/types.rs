//! Input records for the chart builders
//!
//! - `Record`: a user or prospect row as delivered by the backend
//! - `LineItem`: one purchased product embedded in a record's `products` payload

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ChartError, ChartResult};

/// Number of monthly windows every chart covers
pub const WINDOW_COUNT: usize = 6;

/// A user or prospect record
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Record {
    /// Creation instant in epoch seconds; records without one never land in a window
    #[serde(default)]
    pub create_at: Option<i64>,
    /// Serialized JSON list of [`LineItem`]s, `None` for prospects
    #[serde(default)]
    pub products: Option<String>,
}

impl Record {
    /// Create a record with a creation instant and no products
    pub fn created(create_at: i64) -> Self {
        Self {
            create_at: Some(create_at),
            products: None,
        }
    }

    /// Builder: attach a serialized product list
    pub fn products(mut self, products: impl Into<String>) -> Self {
        self.products = Some(products.into());
        self
    }

    /// Builder: serialize and attach line items
    pub fn with_line_items(self, items: &[LineItem]) -> Self {
        // A Vec of plain structs always serializes
        let payload = serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string());
        self.products(payload)
    }

    /// Decode the embedded product list
    ///
    /// Returns `Ok(None)` when the record carries no payload. An empty payload
    /// decodes as an empty list.
    pub fn line_items(&self) -> Result<Option<Vec<LineItem>>, serde_json::Error> {
        match self.products.as_deref() {
            None => Ok(None),
            Some("") => Ok(Some(Vec::new())),
            Some(payload) => serde_json::from_str(payload).map(Some),
        }
    }
}

/// A single purchased product
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Purchase instant in epoch seconds
    pub t: i64,
    /// Price
    pub p: f64,
}

impl LineItem {
    pub fn new(t: i64, p: f64) -> Self {
        Self { t, p }
    }
}

/// Load a JSON array of records from disk
pub fn load_records(path: &Path) -> ChartResult<Vec<Record>> {
    let content = std::fs::read_to_string(path).map_err(|e| ChartError::Io {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    let records: Vec<Record> = serde_json::from_str(&content).map_err(|e| ChartError::Parse {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    tracing::debug!(path = ?path, count = records.len(), "Loaded records");
    Ok(records)
}
