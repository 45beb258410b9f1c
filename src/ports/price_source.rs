//! Price Source Port
//!
//! Trait abstraction over the external daily price provider. A source
//! returns a date-keyed table with at least one closing-price column;
//! it may legitimately return an empty result.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

/// Price source error type
#[derive(Debug, Error)]
pub enum PriceSourceError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("response parsing error: {0}")]
    Parse(String),

    #[error("provider rejected request for {ticker}: {detail}")]
    Rejected { ticker: String, detail: String },
}

/// One daily price row. `adj_close` is present when the provider
/// supplies an adjusted series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
}

/// Date-keyed price table for one ticker over one range.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    pub rows: Vec<PriceRow>,
}

impl PriceTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether any row carries an adjusted close.
    pub fn has_adj_close(&self) -> bool {
        self.rows.iter().any(|r| r.adj_close.is_some())
    }

    /// Whether any row carries a raw close.
    pub fn has_close(&self) -> bool {
        self.rows.iter().any(|r| r.close.is_some())
    }

    /// Select the price column: adjusted close when available, raw
    /// close otherwise. `None` when neither column is present.
    pub fn price_levels(&self) -> Option<Vec<(NaiveDate, f64)>> {
        let use_adj = self.has_adj_close();
        if !use_adj && !self.has_close() {
            return None;
        }
        let levels = self
            .rows
            .iter()
            .filter_map(|r| {
                let price = if use_adj { r.adj_close } else { r.close };
                price.map(|p| (r.date, p))
            })
            .collect();
        Some(levels)
    }
}

/// Price source port trait
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch daily price levels for the ticker over the inclusive
    /// calendar range.
    async fn fetch_daily(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable, PriceSourceError>;
}
