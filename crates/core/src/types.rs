//! Core data types for the tradecheck system.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Point in time (UTC).
pub type Timestamp = DateTime<Utc>;

/// Price type, exact decimal.
pub type Price = Decimal;

/// Size/quantity type, exact decimal.
pub type Size = Decimal;

/// Aggressor side reported by the exchange.
///
/// Informational only: reconciliation does not look at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub const fn as_str(self) -> &'static str {
        match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        }
    }
}

impl Display for TradeSide {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeSide {
    type Err = Error;

    /// Case-insensitive: the exchange sends both `buy` and `BUY`.
    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_uppercase().as_str() {
            "BUY" => Ok(TradeSide::Buy),
            "SELL" => Ok(TradeSide::Sell),
            _ => Err(Error::data(format!("unknown trade side {value:?}"))),
        }
    }
}

/// A single executed trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Exchange trade id.
    pub id: i64,
    /// Instrument name (e.g., "BTC_USDT").
    pub instrument: String,
    /// Execution time.
    pub timestamp: Timestamp,
    /// Trade price.
    pub price: Price,
    /// Trade quantity.
    pub quantity: Size,
    /// Aggressor side.
    pub side: TradeSide,
}

impl Trade {
    /// Build a trade, rejecting an empty instrument or a non-positive quantity.
    pub fn new(
        id: i64,
        instrument: impl Into<String>,
        timestamp: Timestamp,
        price: Price,
        quantity: Size,
        side: TradeSide,
    ) -> Result<Self> {
        let instrument = instrument.into();
        if instrument.is_empty() {
            return Err(Error::data(format!("trade {id} has no instrument")));
        }
        if quantity <= Decimal::ZERO {
            return Err(Error::data(format!(
                "trade {id} quantity must be positive, got {quantity}"
            )));
        }

        Ok(Self {
            id,
            instrument,
            timestamp,
            price,
            quantity,
            side,
        })
    }
}

/// OHLCV summary of one instrument over the window `(start_time, end_time]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    /// Instrument name.
    pub instrument: String,
    /// Exclusive start of the window.
    pub start_time: Timestamp,
    /// Inclusive end of the window.
    pub end_time: Timestamp,
    /// Open price.
    pub open: Price,
    /// High price.
    pub high: Price,
    /// Low price.
    pub low: Price,
    /// Close price.
    pub close: Price,
    /// Total volume.
    pub volume: Size,
}

impl Bar {
    /// Build a bar from the end time the exchange reports and the width of
    /// the interval it was requested under.
    #[allow(clippy::too_many_arguments)]
    pub fn from_end_time(
        instrument: impl Into<String>,
        end_time: Timestamp,
        width: Duration,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Size,
    ) -> Result<Self> {
        let instrument = instrument.into();
        if instrument.is_empty() {
            return Err(Error::data("bar instrument must not be empty"));
        }
        if width <= Duration::zero() {
            return Err(Error::data(format!("bar width must be positive, got {width}")));
        }
        let start_time = end_time
            .checked_sub_signed(width)
            .ok_or_else(|| Error::data(format!("bar end time {end_time} minus {width} is out of range")))?;

        Ok(Self {
            instrument,
            start_time,
            end_time,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    /// Width of the bar's window.
    #[inline]
    pub fn width(&self) -> Duration {
        self.end_time - self.start_time
    }
}
