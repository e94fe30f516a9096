//! Trend forecasting for sparse annual financial inclusion indicators.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod logging;
pub mod report;
