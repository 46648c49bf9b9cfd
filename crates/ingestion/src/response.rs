//! Wire format of the exchange's public market data endpoints.
//!
//! Prices and quantities arrive as JSON strings and are decoded straight into
//! [`Decimal`] so nothing passes through a float. Timestamps are epoch
//! milliseconds. Unknown fields are ignored.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use tradecheck_core::{Bar, Result, Trade, TradeSide};

/// Body of `public/get-candlestick`.
#[derive(Debug, Clone, Deserialize)]
pub struct CandlestickResponse {
    pub result: Option<CandlestickResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandlestickResult {
    /// Instrument the exchange answered for.
    pub instrument_name: Option<String>,
    /// Interval code the exchange answered with.
    pub interval: Option<String>,
    #[serde(default)]
    pub data: Vec<CandlestickData>,
}

/// One candlestick. The exchange reports the end of the window only.
#[derive(Debug, Clone, Deserialize)]
pub struct CandlestickData {
    #[serde(rename = "t", with = "chrono::serde::ts_milliseconds")]
    pub end_time: DateTime<Utc>,
    #[serde(rename = "o")]
    pub open: Decimal,
    #[serde(rename = "h")]
    pub high: Decimal,
    #[serde(rename = "l")]
    pub low: Decimal,
    #[serde(rename = "c")]
    pub close: Decimal,
    #[serde(rename = "v")]
    pub volume: Decimal,
}

impl CandlestickData {
    /// Convert into a [`Bar`] whose window ends at `end_time` and spans `width`.
    pub fn into_bar(self, instrument: &str, width: Duration) -> Result<Bar> {
        Bar::from_end_time(
            instrument,
            self.end_time,
            width,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
        )
    }
}

/// Body of `public/get-trades`.
#[derive(Debug, Clone, Deserialize)]
pub struct TradesResponse {
    pub result: Option<TradesResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TradesResult {
    #[serde(default)]
    pub data: Vec<TradeData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TradeData {
    #[serde(rename = "p")]
    pub price: Decimal,
    #[serde(rename = "q")]
    pub quantity: Decimal,
    #[serde(rename = "s")]
    pub side: String,
    #[serde(rename = "d", deserialize_with = "trade_id")]
    pub id: i64,
    #[serde(rename = "t", with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "i")]
    pub instrument_name: String,
}

impl TryFrom<TradeData> for Trade {
    type Error = tradecheck_core::Error;

    fn try_from(data: TradeData) -> Result<Self> {
        let side = data.side.parse::<TradeSide>()?;
        Trade::new(
            data.id,
            data.instrument_name,
            data.timestamp,
            data.price,
            data.quantity,
            side,
        )
    }
}

/// Trade ids show up both as JSON numbers and as numeric strings.
fn trade_id<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}
