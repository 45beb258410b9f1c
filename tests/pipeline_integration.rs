//! Pipeline Integration Tests
//!
//! End-to-end runs of the analysis pipeline over mock price sources,
//! checking both the recorded artifacts (mock sink) and the on-disk
//! layout (filesystem sink). All tests are deterministic; no network.

use chrono::NaiveDate;

use volab::application::{run_pipeline, PipelineError};
use volab::config::Config;
use volab::domain::volatility::simulate::{simulate_garch, SimulatedGarch};
use volab::ports::mocks::{MockPriceSource, MockReportSink};
use volab::ports::price_source::{PriceRow, PriceTable};
use volab::ports::report_sink::TableKind;

fn config_for(tickers: &[&str]) -> Config {
    let mut config = Config::default();
    config.data.tickers = tickers.iter().map(|t| t.to_string()).collect();
    config
}

/// Daily price table walked from 100.0 by a simulated GARCH(1,1)
/// return path (alpha=0.10, beta=0.85).
fn clustered_price_table(n: usize, seed: u64) -> PriceTable {
    let mut level = 100.0f64;
    let mut rows = vec![PriceRow {
        date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        close: None,
        adj_close: Some(level),
    }];
    for (i, r) in simulate_garch(&SimulatedGarch::crypto_like(), n, seed)
        .into_iter()
        .enumerate()
    {
        level *= r.exp();
        rows.push(PriceRow {
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
                + chrono::Duration::days(i as i64 + 1),
            close: None,
            adj_close: Some(level),
        });
    }
    PriceTable { rows }
}

#[tokio::test]
async fn full_run_commits_every_artifact() {
    let source = MockPriceSource::new().with_table("BTC-USD", clustered_price_table(1000, 42));
    let sink = MockReportSink::new();
    let config = config_for(&["BTC-USD"]);

    let results = run_pipeline(&config, &source, &sink).await;
    assert_eq!(results.len(), 1);
    let report = results[0].1.as_ref().unwrap();

    assert_eq!(report.ticker, "BTC-USD");
    assert_eq!(report.n_returns, 1000);
    assert_eq!(report.comparison.len(), 3);
    assert_eq!(report.stats.count, 1000);

    // Three tables, two figures, one summary per fitted model.
    assert_eq!(sink.tables_for("BTC-USD", TableKind::DescriptiveStats).len(), 1);
    assert_eq!(sink.tables_for("BTC-USD", TableKind::ModelComparison).len(), 1);
    assert_eq!(sink.tables_for("BTC-USD", TableKind::ResidualDiagnostics).len(), 1);
    assert_eq!(sink.figures().len(), 2);
    assert_eq!(sink.summaries().len(), 3);

    // The comparison table is sorted by AIC and the winner heads it.
    let rows = &report.comparison;
    assert!(rows[0].aic <= rows[1].aic && rows[1].aic <= rows[2].aic);
    assert_eq!(report.best_model, rows[0].model);
}

#[tokio::test]
async fn symmetric_garch_data_favors_symmetric_garch() {
    // Data generated without leverage effects: the symmetric model
    // should win or sit within a whisker of the winner on AIC.
    let source = MockPriceSource::new().with_table("SIM-USD", clustered_price_table(1000, 42));
    let sink = MockReportSink::new();
    let config = config_for(&["SIM-USD"]);

    let results = run_pipeline(&config, &source, &sink).await;
    let report = results[0].1.as_ref().unwrap();

    let garch_aic = report
        .comparison
        .iter()
        .find(|r| r.model == "GARCH(1,1)")
        .map(|r| r.aic)
        .unwrap();
    let best_aic = report.comparison[0].aic;
    assert!(garch_aic - best_aic < 4.0, "garch {garch_aic} vs best {best_aic}");
}

#[tokio::test]
async fn winner_diagnostics_are_well_formed() {
    let source = MockPriceSource::new().with_table("BTC-USD", clustered_price_table(800, 7));
    let sink = MockReportSink::new();
    let config = config_for(&["BTC-USD"]);

    let results = run_pipeline(&config, &source, &sink).await;
    let report = results[0].1.as_ref().unwrap();

    assert_eq!(report.diagnostics.resid.lag, 12);
    assert!(report.diagnostics.resid.statistic >= 0.0);
    assert!((0.0..=1.0).contains(&report.diagnostics.resid.p_value));
    assert!((0.0..=1.0).contains(&report.diagnostics.resid_sq.p_value));
}

#[tokio::test]
async fn failing_ticker_is_isolated_from_the_rest() {
    let source = MockPriceSource::new()
        .with_failure("DEAD-USD", "connection refused")
        .with_table("GONE-USD", PriceTable::default())
        .with_table("BTC-USD", clustered_price_table(800, 42));
    let sink = MockReportSink::new();
    let config = config_for(&["DEAD-USD", "GONE-USD", "BTC-USD"]);

    let results = run_pipeline(&config, &source, &sink).await;
    assert_eq!(results.len(), 3);

    assert!(matches!(results[0].1, Err(PipelineError::Source { .. })));
    assert!(matches!(results[1].1, Err(PipelineError::DataUnavailable { .. })));
    assert!(results[2].1.is_ok());

    // Every ticker was attempted, in configuration order.
    assert_eq!(source.get_calls(), vec!["DEAD-USD", "GONE-USD", "BTC-USD"]);
}

#[tokio::test]
async fn missing_price_columns_surface_as_schema_error() {
    let table = PriceTable {
        rows: (0..10)
            .map(|i| PriceRow {
                date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Duration::days(i),
                close: None,
                adj_close: None,
            })
            .collect(),
    };
    let source = MockPriceSource::new().with_table("ODD-USD", table);
    let sink = MockReportSink::new();
    let config = config_for(&["ODD-USD"]);

    let results = run_pipeline(&config, &source, &sink).await;
    assert!(matches!(results[0].1, Err(PipelineError::Schema { .. })));
    assert!(sink.tables().is_empty());
}

#[tokio::test]
async fn filesystem_sink_lays_out_results_directory() {
    use volab::adapters::fs_report::FsReportSink;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("results");
    let source = MockPriceSource::new().with_table("BTC-USD", clustered_price_table(800, 42));
    let sink = FsReportSink::new(&out).unwrap();
    let config = config_for(&["BTC-USD"]);

    let results = run_pipeline(&config, &source, &sink).await;
    let report = results[0].1.as_ref().unwrap();

    assert!(out.join("BTC-USD_descriptive_and_JB.csv").exists());
    assert!(out.join("BTC-USD_model_comparison_AIC_BIC.csv").exists());
    assert!(out.join("BTC-USD_residual_diagnostics_best_model.csv").exists());
    assert!(out.join("figs/BTC-USD_acf_squared.txt").exists());
    assert!(out.join("figs/BTC-USD_cond_vol.txt").exists());
    for safe in ["GARCH11", "EGARCH11", "GJRGARCH11"] {
        assert!(out.join(format!("logs/BTC-USD_{safe}_summary.txt")).exists());
    }

    // The comparison CSV names the winner in its first data row.
    let csv = std::fs::read_to_string(out.join("BTC-USD_model_comparison_AIC_BIC.csv")).unwrap();
    let first_row = csv.lines().nth(1).unwrap();
    assert!(first_row.contains(&report.best_model));
}
