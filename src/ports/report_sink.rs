//! Report Sink Port
//!
//! Trait abstraction over the reporting backend. The pipeline emits
//! per-ticker tables, figures, and free-text model summaries; the
//! sink decides how they are rendered and where they land.

use thiserror::Error;

/// Report sink error type
#[derive(Debug, Error)]
pub enum ReportSinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sink rejected artifact {name}: {detail}")]
    Rejected { name: String, detail: String },
}

/// Kinds of per-ticker tables the pipeline produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    DescriptiveStats,
    ModelComparison,
    ResidualDiagnostics,
}

impl TableKind {
    pub fn file_stem(&self) -> &'static str {
        match self {
            TableKind::DescriptiveStats => "descriptive_and_JB",
            TableKind::ModelComparison => "model_comparison_AIC_BIC",
            TableKind::ResidualDiagnostics => "residual_diagnostics_best_model",
        }
    }
}

/// A delimited table: one header row plus formatted data rows.
#[derive(Debug, Clone)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(header: &[&str]) -> Self {
        Self {
            header: header.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

/// Kinds of per-ticker figures the pipeline produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureKind {
    /// Autocorrelation bar chart of squared returns.
    AcfSquaredReturns,
    /// Conditional-volatility line chart for the winning model.
    ConditionalVolatility,
}

/// Chart payload handed to the sink; the sink owns rendering.
#[derive(Debug, Clone)]
pub enum FigureData {
    /// One bar per lag (autocorrelation charts).
    Bars { values: Vec<f64> },
    /// A dated series (conditional-volatility charts).
    Line {
        dates: Vec<chrono::NaiveDate>,
        values: Vec<f64>,
    },
}

/// A figure ready for persistence.
#[derive(Debug, Clone)]
pub struct Figure {
    pub kind: FigureKind,
    pub title: String,
    pub data: FigureData,
}

/// Report sink port trait
pub trait ReportSink: Send + Sync {
    /// Persist one table for a ticker.
    fn write_table(&self, ticker: &str, kind: TableKind, table: &Table)
        -> Result<(), ReportSinkError>;

    /// Persist one figure for a ticker.
    fn write_figure(&self, ticker: &str, figure: &Figure) -> Result<(), ReportSinkError>;

    /// Persist one free-text model summary for a ticker.
    fn write_model_summary(
        &self,
        ticker: &str,
        model_safe_name: &str,
        summary: &str,
    ) -> Result<(), ReportSinkError>;
}
