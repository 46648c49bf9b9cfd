//! Fetching bars and trades from the exchange.
//!
//! The HTTP layer itself lives outside this crate; it plugs in through
//! [`Transport`]. [`ExchangeClient`] builds request URLs from an explicit
//! [`ExchangeConfig`], decodes the bodies and maps them into domain types.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use tradecheck_core::{Bar, Error, ExchangeConfig, FetchError, Interval, Result, Trade};

use crate::response::{CandlestickResponse, TradesResponse};

/// Issues GET requests on behalf of [`ExchangeClient`].
pub trait Transport {
    /// Fetch the body at `url`. `Ok(None)` means the exchange answered
    /// without a body.
    fn get(&self, url: &str) -> std::result::Result<Option<String>, FetchError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> std::result::Result<Option<String>, FetchError> {
        (**self).get(url)
    }
}

/// Client for the exchange's public market data endpoints.
pub struct ExchangeClient<T> {
    config: ExchangeConfig,
    transport: T,
}

impl<T: Transport> ExchangeClient<T> {
    /// Create a client for the given endpoints.
    pub fn new(config: ExchangeConfig, transport: T) -> Self {
        Self { config, transport }
    }

    fn get_json<R: DeserializeOwned>(&self, url: &str) -> Result<Option<R>> {
        debug!(url, "requesting");
        let body = match self.transport.get(url)? {
            Some(body) if !body.trim().is_empty() => body,
            _ => {
                warn!(url, "empty response, treating as no data");
                return Ok(None);
            }
        };
        let decoded = serde_json::from_str(&body).map_err(FetchError::from)?;
        Ok(Some(decoded))
    }

    /// Fetch the bars of `instrument` at `interval`.
    ///
    /// The interval is parsed before any request goes out. Each bar's start
    /// time is its end time minus the interval width.
    pub fn fetch_bars(&self, instrument: &str, interval: &str) -> Result<Vec<Bar>> {
        if instrument.trim().is_empty() {
            return Err(Error::invalid_request("an instrument name is required"));
        }
        if interval.trim().is_empty() {
            return Err(Error::invalid_request("an interval is required"));
        }
        let width = interval.parse::<Interval>()?.duration();

        let url = self.config.candlestick_url(instrument, interval);
        let Some(result) = self
            .get_json::<CandlestickResponse>(&url)?
            .and_then(|response| response.result)
        else {
            return Ok(Vec::new());
        };

        if let Some(reported) = result.instrument_name.as_deref() {
            if reported != instrument {
                return Err(Error::data(format!(
                    "requested bars for {instrument}, exchange answered for {reported}"
                )));
            }
        }
        if let Some(reported) = result.interval.as_deref() {
            if reported != interval {
                return Err(Error::data(format!(
                    "requested {interval} bars for {instrument}, exchange answered with {reported}"
                )));
            }
        }

        let bars = result
            .data
            .into_iter()
            .map(|candle| candle.into_bar(instrument, width))
            .collect::<Result<Vec<_>>>()?;
        debug!(instrument, interval, count = bars.len(), "decoded bars");
        Ok(bars)
    }

    /// Fetch recent trades, for one instrument or for all of them.
    pub fn fetch_trades(&self, instrument: Option<&str>) -> Result<Vec<Trade>> {
        let url = self.config.trades_url(instrument);
        let Some(result) = self
            .get_json::<TradesResponse>(&url)?
            .and_then(|response| response.result)
        else {
            return Ok(Vec::new());
        };

        let trades = result
            .data
            .into_iter()
            .map(Trade::try_from)
            .collect::<Result<Vec<_>>>()?;
        debug!(?instrument, count = trades.len(), "decoded trades");
        Ok(trades)
    }
}
