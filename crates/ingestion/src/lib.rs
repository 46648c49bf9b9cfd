//! Market data ingestion for the tradecheck system.
//!
//! This crate handles:
//! - Decoding exchange candlestick and trade responses
//! - Deriving bar windows from the requested interval
//! - The transport seam the HTTP layer plugs into

pub mod client;
pub mod response;

pub use client::{ExchangeClient, Transport};
pub use response::{
    CandlestickData, CandlestickResponse, CandlestickResult, TradeData, TradesResponse,
    TradesResult,
};
