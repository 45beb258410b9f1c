//! Recording mocks for the port traits, used by unit and integration
//! tests. Mocks log every call and serve canned responses.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::ports::price_source::{PriceSource, PriceSourceError, PriceTable};
use crate::ports::report_sink::{Figure, ReportSink, ReportSinkError, Table, TableKind};

/// Mock price source that records fetches and allows controlled
/// per-ticker responses.
#[derive(Debug, Default)]
pub struct MockPriceSource {
    calls: Arc<Mutex<Vec<String>>>,
    tables: Arc<Mutex<HashMap<String, PriceTable>>>,
    failures: Arc<Mutex<HashMap<String, String>>>,
}

impl MockPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the table returned for a ticker.
    pub fn with_table(self, ticker: &str, table: PriceTable) -> Self {
        self.tables.lock().unwrap().insert(ticker.to_string(), table);
        self
    }

    /// Builder method to make a ticker fail with an HTTP error.
    pub fn with_failure(self, ticker: &str, detail: &str) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(ticker.to_string(), detail.to_string());
        self
    }

    /// Get all recorded fetch calls.
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceSource for MockPriceSource {
    async fn fetch_daily(
        &self,
        ticker: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<PriceTable, PriceSourceError> {
        self.calls.lock().unwrap().push(ticker.to_string());
        if let Some(detail) = self.failures.lock().unwrap().get(ticker) {
            return Err(PriceSourceError::Http(detail.clone()));
        }
        // Unknown tickers fetch an empty table, like a provider that
        // knows nothing about the symbol.
        Ok(self
            .tables
            .lock()
            .unwrap()
            .get(ticker)
            .cloned()
            .unwrap_or_default())
    }
}

/// Mock report sink that records every artifact it is handed.
#[derive(Debug, Default)]
pub struct MockReportSink {
    tables: Arc<Mutex<Vec<(String, TableKind, Table)>>>,
    figures: Arc<Mutex<Vec<(String, Figure)>>>,
    summaries: Arc<Mutex<Vec<(String, String, String)>>>,
}

impl MockReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tables(&self) -> Vec<(String, TableKind, Table)> {
        self.tables.lock().unwrap().clone()
    }

    pub fn figures(&self) -> Vec<(String, Figure)> {
        self.figures.lock().unwrap().clone()
    }

    pub fn summaries(&self) -> Vec<(String, String, String)> {
        self.summaries.lock().unwrap().clone()
    }

    /// Tables of one kind written for one ticker.
    pub fn tables_for(&self, ticker: &str, kind: TableKind) -> Vec<Table> {
        self.tables
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, k, _)| t == ticker && *k == kind)
            .map(|(_, _, table)| table.clone())
            .collect()
    }
}

impl ReportSink for MockReportSink {
    fn write_table(
        &self,
        ticker: &str,
        kind: TableKind,
        table: &Table,
    ) -> Result<(), ReportSinkError> {
        self.tables
            .lock()
            .unwrap()
            .push((ticker.to_string(), kind, table.clone()));
        Ok(())
    }

    fn write_figure(&self, ticker: &str, figure: &Figure) -> Result<(), ReportSinkError> {
        self.figures
            .lock()
            .unwrap()
            .push((ticker.to_string(), figure.clone()));
        Ok(())
    }

    fn write_model_summary(
        &self,
        ticker: &str,
        model_safe_name: &str,
        summary: &str,
    ) -> Result<(), ReportSinkError> {
        self.summaries.lock().unwrap().push((
            ticker.to_string(),
            model_safe_name.to_string(),
            summary.to_string(),
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::price_source::PriceRow;

    #[tokio::test]
    async fn mock_price_source_records_calls() {
        let table = PriceTable {
            rows: vec![PriceRow {
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                close: Some(100.0),
                adj_close: None,
            }],
        };
        let mock = MockPriceSource::new().with_table("BTC-USD", table);

        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let fetched = mock.fetch_daily("BTC-USD", start, end).await.unwrap();
        assert_eq!(fetched.rows.len(), 1);

        let empty = mock.fetch_daily("DOGE-USD", start, end).await.unwrap();
        assert!(empty.is_empty());

        assert_eq!(mock.get_calls(), vec!["BTC-USD", "DOGE-USD"]);
    }

    #[tokio::test]
    async fn mock_price_source_serves_failures() {
        let mock = MockPriceSource::new().with_failure("BTC-USD", "timeout");
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let err = mock.fetch_daily("BTC-USD", start, end).await.unwrap_err();
        assert!(matches!(err, PriceSourceError::Http(_)));
    }

    #[test]
    fn mock_sink_records_artifacts() {
        let sink = MockReportSink::new();
        let mut table = Table::new(&["Model", "AIC"]);
        table.push_row(vec!["GARCH(1,1)".into(), "-123.4".into()]);

        sink.write_table("BTC-USD", TableKind::ModelComparison, &table)
            .unwrap();
        sink.write_model_summary("BTC-USD", "GARCH11", "summary text")
            .unwrap();

        assert_eq!(sink.tables_for("BTC-USD", TableKind::ModelComparison).len(), 1);
        assert_eq!(sink.summaries().len(), 1);
        assert!(sink.figures().is_empty());
    }
}
