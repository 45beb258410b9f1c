//! Application Layer - Pipeline driver and use cases

pub mod pipeline;

pub use pipeline::{run_pipeline, run_ticker, PipelineError, TickerReport};
