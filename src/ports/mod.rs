//! Ports Layer - Trait abstractions for external collaborators
//!
//! The pipeline depends on two seams: a price source that serves
//! daily bars and a report sink that persists tables, figures, and
//! model summaries.

pub mod mocks;
pub mod price_source;
pub mod report_sink;

pub use price_source::{PriceRow, PriceSource, PriceSourceError, PriceTable};
pub use report_sink::{
    Figure, FigureData, FigureKind, ReportSink, ReportSinkError, Table, TableKind,
};
