//! Filesystem Report Sink
//!
//! Persists tables as CSV under the results directory, figures as
//! text charts under `figs/`, and model summaries under `logs/`,
//! mirroring the per-ticker file layout of the research scripts this
//! pipeline replaces.

use std::fs;
use std::path::{Path, PathBuf};

use crate::ports::report_sink::{
    Figure, FigureData, FigureKind, ReportSink, ReportSinkError, Table, TableKind,
};

const CHART_WIDTH: usize = 60;

#[derive(Debug, Clone)]
pub struct FsReportSink {
    out_dir: PathBuf,
    fig_dir: PathBuf,
    log_dir: PathBuf,
}

impl FsReportSink {
    /// Create the sink and its directory layout.
    pub fn new<P: AsRef<Path>>(out_dir: P) -> Result<Self, ReportSinkError> {
        let out_dir = out_dir.as_ref().to_path_buf();
        let fig_dir = out_dir.join("figs");
        let log_dir = out_dir.join("logs");
        fs::create_dir_all(&fig_dir)?;
        fs::create_dir_all(&log_dir)?;
        Ok(Self { out_dir, fig_dir, log_dir })
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

impl ReportSink for FsReportSink {
    fn write_table(
        &self,
        ticker: &str,
        kind: TableKind,
        table: &Table,
    ) -> Result<(), ReportSinkError> {
        let path = self.out_dir.join(format!("{}_{}.csv", ticker, kind.file_stem()));
        let mut content = String::new();
        content.push_str(&csv_line(&table.header));
        for row in &table.rows {
            content.push_str(&csv_line(row));
        }
        fs::write(&path, content)?;
        tracing::info!(path = %path.display(), "saved table");
        Ok(())
    }

    fn write_figure(&self, ticker: &str, figure: &Figure) -> Result<(), ReportSinkError> {
        let stem = match figure.kind {
            FigureKind::AcfSquaredReturns => "acf_squared",
            FigureKind::ConditionalVolatility => "cond_vol",
        };
        let body = match &figure.data {
            FigureData::Bars { values } => render_acf_chart(values, CHART_WIDTH),
            FigureData::Line { dates, values } => render_series_chart(dates, values, CHART_WIDTH),
        };
        let path = self.fig_dir.join(format!("{ticker}_{stem}.txt"));
        let content = format!("{}\n\n{}", figure.title, body);
        fs::write(&path, content)?;
        tracing::info!(path = %path.display(), "saved figure");
        Ok(())
    }

    fn write_model_summary(
        &self,
        ticker: &str,
        model_safe_name: &str,
        summary: &str,
    ) -> Result<(), ReportSinkError> {
        let path = self.log_dir.join(format!("{ticker}_{model_safe_name}_summary.txt"));
        fs::write(&path, summary)?;
        tracing::info!(path = %path.display(), "saved model summary");
        Ok(())
    }
}

fn csv_line(fields: &[String]) -> String {
    let escaped: Vec<String> = fields
        .iter()
        .map(|f| {
            if f.contains(',') || f.contains('"') {
                format!("\"{}\"", f.replace('"', "\"\""))
            } else {
                f.clone()
            }
        })
        .collect();
    format!("{}\n", escaped.join(","))
}

/// Render a lag-labelled autocorrelation bar chart as text.
pub fn render_acf_chart(acf_values: &[f64], max_width: usize) -> String {
    let mut out = String::new();
    let max_val = acf_values
        .iter()
        .map(|v| v.abs())
        .fold(0.0f64, f64::max)
        .max(1.0);

    for (lag, &value) in acf_values.iter().enumerate() {
        let bar_len = ((value.abs() / max_val) * max_width as f64) as usize;
        out.push_str(&format!(
            "{:>4} | {:>7.4} |{}\n",
            lag,
            value,
            "#".repeat(bar_len)
        ));
    }
    out
}

/// Render a conditional-volatility line chart as text: one row per
/// observation bucket with a positioned marker.
pub fn render_series_chart(dates: &[chrono::NaiveDate], values: &[f64], max_width: usize) -> String {
    let mut out = String::new();
    if values.is_empty() {
        return out;
    }
    let max_val = values.iter().copied().fold(f64::MIN, f64::max);
    let min_val = values.iter().copied().fold(f64::MAX, f64::min);
    let span = (max_val - min_val).max(1e-12);

    // Bucket long series so the chart stays readable.
    let bucket = (values.len() / 120).max(1);
    for (i, chunk) in values.chunks(bucket).enumerate() {
        let avg = chunk.iter().sum::<f64>() / chunk.len() as f64;
        let pos = (((avg - min_val) / span) * (max_width - 1) as f64) as usize;
        let label = dates
            .get(i * bucket)
            .map(|d| d.to_string())
            .unwrap_or_default();
        out.push_str(&format!(
            "{label} | {avg:>10.6} |{}*\n",
            " ".repeat(pos)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn writes_csv_table() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsReportSink::new(dir.path().join("results")).unwrap();

        let mut table = Table::new(&["Model", "LogLik", "AIC", "BIC"]);
        table.push_row(vec![
            "GARCH(1,1)".into(),
            "4100.2".into(),
            "-8192.4".into(),
            "-8171.9".into(),
        ]);
        sink.write_table("BTC-USD", TableKind::ModelComparison, &table)
            .unwrap();

        let path = dir
            .path()
            .join("results/BTC-USD_model_comparison_AIC_BIC.csv");
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("Model,LogLik,AIC,BIC\n"));
        assert!(content.contains("GARCH(1,1)"));
    }

    #[test]
    fn quotes_fields_containing_commas() {
        assert_eq!(csv_line(&["GARCH(1,1)".to_string()]), "\"GARCH(1,1)\"\n");
        assert_eq!(csv_line(&["plain".to_string()]), "plain\n");
    }

    #[test]
    fn figure_and_summary_land_in_subdirs() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsReportSink::new(dir.path().join("results")).unwrap();

        let figure = Figure {
            kind: FigureKind::AcfSquaredReturns,
            title: "ACF of Squared Returns - BTC-USD".into(),
            data: FigureData::Bars { values: vec![1.0, 0.3, 0.1] },
        };
        sink.write_figure("BTC-USD", &figure).unwrap();
        sink.write_model_summary("BTC-USD", "GARCH11", "text").unwrap();

        assert!(dir.path().join("results/figs/BTC-USD_acf_squared.txt").exists());
        assert!(dir
            .path()
            .join("results/logs/BTC-USD_GARCH11_summary.txt")
            .exists());
    }

    #[test]
    fn acf_chart_has_one_row_per_lag() {
        let chart = render_acf_chart(&[1.0, 0.5, -0.25], 20);
        assert_eq!(chart.lines().count(), 3);
        assert!(chart.lines().next().unwrap().contains("####"));
    }

    #[test]
    fn series_chart_buckets_long_series() {
        let dates: Vec<NaiveDate> = (0..600)
            .map(|i| NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Duration::days(i))
            .collect();
        let values: Vec<f64> = (0..600).map(|i| 0.01 + (i as f64) * 1e-5).collect();
        let chart = render_series_chart(&dates, &values, 60);
        let lines = chart.lines().count();
        assert!(lines <= 150, "lines={lines}");
        assert!(chart.contains('*'));
    }
}
