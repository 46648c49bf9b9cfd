//! Bar/trade reconciliation for the tradecheck system.
//!
//! This crate handles:
//! - Assigning trades to bar windows `(start, end]`
//! - Recomputing OHLCV from a bar's trades and comparing it to the bar
//! - Running the check across a list of bars

pub mod runner;
pub mod validator;
pub mod window;

pub use runner::{reconcile, ReconciliationReport, Reconciler, RejectedBar};
pub use validator::{is_bar_valid, validate_bar, BarCheck, BarMismatch, TradeSummary};
pub use window::{filter_trades_for_bar, is_trade_in_window};
