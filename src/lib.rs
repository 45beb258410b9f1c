//! Volab - GARCH-Family Volatility Research Pipeline
//!
//! Fits and compares conditional-volatility models over crypto daily
//! log returns: descriptive statistics, GARCH / EGARCH / GJR-GARCH
//! maximum-likelihood fits, AIC/BIC model selection, and Ljung-Box
//! residual diagnostics, persisted per ticker.
//!
//! # Modules
//!
//! - `domain`: Core math (returns, descriptive stats, volatility models,
//!   selection, diagnostics)
//! - `ports`: Trait abstractions (PriceSource, ReportSink) and mocks
//! - `adapters`: External implementations (Yahoo Finance, filesystem sink)
//! - `config`: Configuration loading and validation
//! - `application`: Per-ticker pipeline and driver

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
