//! Yahoo Finance Price Source
//!
//! Fetches daily OHLC history from the Yahoo Finance v8 chart API and
//! normalizes it into a `PriceTable`. Only the close and adjusted
//! close columns are kept; null entries stay absent rather than being
//! filled.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use reqwest::Client;
use serde::Deserialize;

use crate::ports::price_source::{PriceRow, PriceSource, PriceSourceError, PriceTable};

const CHART_API: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

#[derive(Debug, Clone)]
pub struct YahooPriceSource {
    http: Client,
    base_url: String,
}

impl YahooPriceSource {
    pub fn new() -> Result<Self, PriceSourceError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("volab/0.1")
            .build()
            .map_err(|e| PriceSourceError::Http(e.to_string()))?;
        Ok(Self {
            http,
            base_url: CHART_API.to_string(),
        })
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl PriceSource for YahooPriceSource {
    async fn fetch_daily(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable, PriceSourceError> {
        // period2 is exclusive on the provider side; shift one day so
        // the configured end date stays inclusive.
        let epoch = NaiveDate::default();
        let period1 = (start - epoch).num_days() * 86_400;
        let period2 = ((end + chrono::Duration::days(1)) - epoch).num_days() * 86_400;
        let url = format!(
            "{}/{}?period1={}&period2={}&interval=1d&events=div%2Csplit",
            self.base_url, ticker, period1, period2
        );

        let response: ChartResponse = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| PriceSourceError::Http(e.to_string()))?
            .json()
            .await
            .map_err(|e| PriceSourceError::Parse(e.to_string()))?;

        if let Some(error) = response.chart.error {
            return Err(PriceSourceError::Rejected {
                ticker: ticker.to_string(),
                detail: error.description,
            });
        }

        let Some(result) = response.chart.result.and_then(|mut r| {
            if r.is_empty() {
                None
            } else {
                Some(r.swap_remove(0))
            }
        }) else {
            return Ok(PriceTable::default());
        };

        Ok(normalize_chart(result))
    }
}

fn normalize_chart(result: ChartResult) -> PriceTable {
    let timestamps = result.timestamp.unwrap_or_default();
    let close = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();
    let adj_close = result
        .indicators
        .adjclose
        .and_then(|mut a| if a.is_empty() { None } else { Some(a.swap_remove(0)) })
        .map(|a| a.adjclose)
        .unwrap_or_default();

    let rows = timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let date = DateTime::from_timestamp(ts, 0)?.date_naive();
            Some(PriceRow {
                date,
                close: close.get(i).copied().flatten(),
                adj_close: adj_close.get(i).copied().flatten(),
            })
        })
        .collect();

    PriceTable { rows }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[allow(dead_code)]
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
    adjclose: Option<Vec<AdjCloseBlock>>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseBlock {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        assert!(YahooPriceSource::new().is_ok());
    }

    #[test]
    fn normalizes_full_payload() {
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704153600, 1704240000],
                    "indicators": {
                        "quote": [{"close": [42000.5, null]}],
                        "adjclose": [{"adjclose": [42000.5, 42100.0]}]
                    }
                }],
                "error": null
            }
        }"#;
        let response: ChartResponse = serde_json::from_str(json).unwrap();
        let table = normalize_chart(response.chart.result.unwrap().swap_remove(0));

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].close, Some(42000.5));
        assert_eq!(table.rows[1].close, None);
        assert_eq!(table.rows[1].adj_close, Some(42100.0));
        assert!(table.has_adj_close());
    }

    #[test]
    fn missing_adjclose_block_leaves_column_absent() {
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704153600],
                    "indicators": {"quote": [{"close": [42000.5]}]}
                }],
                "error": null
            }
        }"#;
        let response: ChartResponse = serde_json::from_str(json).unwrap();
        let table = normalize_chart(response.chart.result.unwrap().swap_remove(0));

        assert!(!table.has_adj_close());
        assert!(table.has_close());
    }

    #[test]
    fn provider_error_deserializes() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found"}
            }
        }"#;
        let response: ChartResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.chart.error.unwrap().description,
            "No data found"
        );
    }
}
