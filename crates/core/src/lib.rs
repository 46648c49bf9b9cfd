//! Core types and configuration for the tradecheck system.
//!
//! This crate provides shared types used across all other crates:
//! - Market data types (trades, bars)
//! - Bar interval codes and their durations
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod interval;
pub mod types;

pub use config::{Config, ExchangeConfig, ReconcileConfig};
pub use error::{Error, FetchError, Result};
pub use interval::{list_allowed_intervals, parse_interval, Interval, IntervalUnit};
pub use types::*;
