//! Adapters Layer - Concrete implementations of the port traits

pub mod fs_report;
pub mod yahoo;

pub use fs_report::FsReportSink;
pub use yahoo::YahooPriceSource;
