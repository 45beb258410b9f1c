//! Analysis Pipeline
//!
//! Linear one-pass pipeline per ticker: load returns, report
//! descriptive statistics, fit the standard model set, rank by AIC,
//! diagnose the winner's residuals. The driver isolates tickers from
//! each other: one ticker's failure is logged and the next proceeds.
//!
//! Per-step outputs are committed independently, so artifacts written
//! before a failure stay on disk; nothing downstream of the failing
//! step is emitted for that ticker.

use chrono::NaiveDate;
use thiserror::Error;

use crate::config::Config;
use crate::domain::descriptive::DescriptiveStats;
use crate::domain::diagnostics::{acf, DiagnosticsResult, LB_LAG};
use crate::domain::returns::{ReturnSeries, SeriesError};
use crate::domain::selection::{rank_models, select_best, ComparisonRow};
use crate::domain::volatility::{fit_all, FittedModel};
use crate::ports::price_source::{PriceSource, PriceSourceError};
use crate::ports::report_sink::{
    Figure, FigureData, FigureKind, ReportSink, ReportSinkError, Table, TableKind,
};

/// Number of lags shown in the squared-return ACF figure.
const ACF_FIG_LAGS: usize = 20;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no price data for {ticker} between {start} and {end}")]
    DataUnavailable {
        ticker: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("price table for {ticker} is missing an expected column: {detail}")]
    Schema { ticker: String, detail: String },

    #[error("fit failure for {model} on {ticker}: {reason}")]
    FitFailure {
        ticker: String,
        model: String,
        reason: String,
    },

    #[error("price source error for {ticker}: {source}")]
    Source {
        ticker: String,
        #[source]
        source: PriceSourceError,
    },

    #[error(transparent)]
    Sink(#[from] ReportSinkError),
}

/// Everything the pipeline learned about one ticker.
#[derive(Debug)]
pub struct TickerReport {
    pub ticker: String,
    pub n_returns: usize,
    pub stats: DescriptiveStats,
    pub comparison: Vec<ComparisonRow>,
    pub best_model: String,
    pub diagnostics: DiagnosticsResult,
}

/// Run the full per-ticker pipeline, committing artifacts step by
/// step through the sink.
pub async fn run_ticker(
    config: &Config,
    source: &dyn PriceSource,
    sink: &dyn ReportSink,
    ticker: &str,
) -> Result<TickerReport, PipelineError> {
    let start = config.data.start_date;
    let end = config.data.end_date;
    tracing::info!(ticker, %start, %end, "processing ticker");

    // 1. Load and clean the return series.
    let series = load_returns(source, ticker, start, end).await?;
    tracing::info!(ticker, n = series.len(), "derived log returns");

    // 2. Descriptive statistics and normality test.
    let stats = DescriptiveStats::from_series(&series);
    if stats.rejects_normality() {
        tracing::info!(
            ticker,
            jb_stat = stats.jb_stat,
            "Jarque-Bera rejects normality (expected for crypto returns)"
        );
    }
    sink.write_table(ticker, TableKind::DescriptiveStats, &descriptive_table(&stats))?;

    // 3. Squared-return autocorrelation figure.
    let squared: Vec<f64> = series.values().iter().map(|r| r * r).collect();
    sink.write_figure(
        ticker,
        &Figure {
            kind: FigureKind::AcfSquaredReturns,
            title: format!("ACF of Squared Returns - {ticker}"),
            data: FigureData::Bars {
                values: acf(&squared, ACF_FIG_LAGS),
            },
        },
    )?;

    // 4. Fit all three specs; failures are independent and collected.
    let outcomes = fit_all(&series, config.models.distribution);
    let mut fitted: Vec<FittedModel> = Vec::with_capacity(outcomes.len());
    let mut first_failure: Option<PipelineError> = None;
    for (spec, outcome) in outcomes {
        match outcome {
            Ok(model) => {
                sink.write_model_summary(ticker, &spec.safe_name(), &model.summary())?;
                fitted.push(model);
            }
            Err(e) => {
                tracing::error!(ticker, model = %spec, error = %e, "model fit failed");
                if first_failure.is_none() {
                    first_failure = Some(PipelineError::FitFailure {
                        ticker: ticker.to_string(),
                        model: spec.name(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }
    if let Some(failure) = first_failure {
        return Err(failure);
    }

    // 5. Rank by AIC/BIC and elect the winner.
    let comparison = rank_models(&fitted);
    sink.write_table(ticker, TableKind::ModelComparison, &comparison_table(&comparison))?;
    let best = select_best(&fitted).ok_or_else(|| PipelineError::FitFailure {
        ticker: ticker.to_string(),
        model: "model set".to_string(),
        reason: "no fitted models to rank".to_string(),
    })?;
    tracing::info!(ticker, best = %best.name(), aic = best.aic, "selected best model by AIC");

    // 6. Residual diagnostics on the winner only.
    let diagnostics = DiagnosticsResult::from_residuals(&best.std_residuals);
    sink.write_table(
        ticker,
        TableKind::ResidualDiagnostics,
        &diagnostics_table(&diagnostics),
    )?;

    // 7. Conditional-volatility figure for the winner.
    sink.write_figure(
        ticker,
        &Figure {
            kind: FigureKind::ConditionalVolatility,
            title: format!("Conditional Volatility - {ticker} - {}", best.name()),
            data: FigureData::Line {
                dates: series.dates().collect(),
                values: best.conditional_vol.clone(),
            },
        },
    )?;

    Ok(TickerReport {
        ticker: ticker.to_string(),
        n_returns: series.len(),
        stats,
        best_model: best.name(),
        comparison,
        diagnostics,
    })
}

/// Fetch prices and derive the cleaned log-return series.
pub async fn load_returns(
    source: &dyn PriceSource,
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<ReturnSeries, PipelineError> {
    let table = source
        .fetch_daily(ticker, start, end)
        .await
        .map_err(|e| PipelineError::Source {
            ticker: ticker.to_string(),
            source: e,
        })?;

    if table.is_empty() {
        return Err(PipelineError::DataUnavailable {
            ticker: ticker.to_string(),
            start,
            end,
        });
    }

    let levels = table.price_levels().ok_or_else(|| PipelineError::Schema {
        ticker: ticker.to_string(),
        detail: "neither adjusted close nor close present".to_string(),
    })?;

    ReturnSeries::from_prices(ticker, &levels).map_err(|e| match e {
        SeriesError::Empty { ticker } => PipelineError::DataUnavailable {
            ticker,
            start,
            end,
        },
        SeriesError::UnorderedDates { ticker, date } => PipelineError::Schema {
            ticker,
            detail: format!("price dates out of order at {date}"),
        },
    })
}

/// Process every configured ticker in sequence. One ticker's failure
/// is logged and recorded; the next ticker still runs.
pub async fn run_pipeline(
    config: &Config,
    source: &dyn PriceSource,
    sink: &dyn ReportSink,
) -> Vec<(String, Result<TickerReport, PipelineError>)> {
    let mut results = Vec::with_capacity(config.data.tickers.len());
    for ticker in &config.data.tickers {
        let outcome = run_ticker(config, source, sink, ticker).await;
        if let Err(e) = &outcome {
            tracing::error!(ticker, error = %e, "ticker pipeline failed");
        } else {
            tracing::info!(ticker, "ticker pipeline finished");
        }
        results.push((ticker.clone(), outcome));
    }
    results
}

fn descriptive_table(stats: &DescriptiveStats) -> Table {
    let mut table = Table::new(&[
        "count", "mean", "std", "min", "25%", "50%", "75%", "max",
        "skewness", "kurtosis", "JB_stat", "JB_pvalue",
    ]);
    table.push_row(vec![
        stats.count.to_string(),
        format!("{:.6e}", stats.mean),
        format!("{:.6e}", stats.std_dev),
        format!("{:.6e}", stats.min),
        format!("{:.6e}", stats.q25),
        format!("{:.6e}", stats.median),
        format!("{:.6e}", stats.q75),
        format!("{:.6e}", stats.max),
        format!("{:.4}", stats.skewness),
        format!("{:.4}", stats.kurtosis),
        format!("{:.4}", stats.jb_stat),
        format!("{:.6}", stats.jb_pvalue),
    ]);
    table
}

fn comparison_table(rows: &[ComparisonRow]) -> Table {
    let mut table = Table::new(&["Model", "LogLik", "AIC", "BIC"]);
    for row in rows {
        table.push_row(vec![
            row.model.clone(),
            format!("{:.4}", row.log_likelihood),
            format!("{:.4}", row.aic),
            format!("{:.4}", row.bic),
        ]);
    }
    table
}

fn diagnostics_table(diag: &DiagnosticsResult) -> Table {
    let lag = LB_LAG;
    let header = [
        format!("LB({lag})_resid_stat"),
        format!("LB({lag})_resid_p"),
        format!("LB({lag})_resid2_stat"),
        format!("LB({lag})_resid2_p"),
    ];
    let header_refs: Vec<&str> = header.iter().map(String::as_str).collect();
    let mut table = Table::new(&header_refs);
    table.push_row(vec![
        format!("{:.4}", diag.resid.statistic),
        format!("{:.6}", diag.resid.p_value),
        format!("{:.4}", diag.resid_sq.statistic),
        format!("{:.6}", diag.resid_sq.p_value),
    ]);
    table
}
