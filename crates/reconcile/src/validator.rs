//! Bar consistency checks.
//!
//! A bar is consistent with the trades printed in its window when:
//! - volume is the sum of the trade quantities
//! - open is the price of the first trade
//! - close is the price of the last trade
//! - high is the max trade price
//! - low is the min trade price
//!
//! All comparisons are exact decimal equality. A bar with no trades in its
//! window cannot be checked and counts as invalid, and so does a bar whose
//! trade volume cannot be summed exactly within `Decimal`'s 28 digits.

use std::fmt::{Display, Formatter};

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, trace};

use tradecheck_core::{Bar, Price, Size, Trade};

use crate::window::filter_trades_for_bar;

/// OHLCV recomputed from a time-ordered run of trades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeSummary {
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    /// Sum of quantities. `None` once the sum overflows or would have to be
    /// rounded to fit a `Decimal`.
    pub volume: Option<Size>,
    pub trade_count: usize,
}

impl TradeSummary {
    /// Summarize trades already sorted by timestamp. `None` when there are none.
    pub fn from_trades<'a, I>(trades: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Trade>,
    {
        let mut trades = trades.into_iter();
        let first = trades.next()?;
        let mut summary = Self {
            open: first.price,
            high: first.price,
            low: first.price,
            close: first.price,
            volume: Some(first.quantity),
            trade_count: 1,
        };
        for trade in trades {
            summary.add_trade(trade);
        }
        Some(summary)
    }

    fn add_trade(&mut self, trade: &Trade) {
        self.high = self.high.max(trade.price);
        self.low = self.low.min(trade.price);
        self.close = trade.price;
        self.volume = self.volume.and_then(|volume| exact_add(volume, trade.quantity));
        self.trade_count += 1;
    }
}

/// `a + b`, or `None` if the result overflows or lost digits to rounding.
fn exact_add(a: Decimal, b: Decimal) -> Option<Decimal> {
    let sum = a.checked_add(b)?;
    (sum.scale() >= a.scale().max(b.scale())).then_some(sum)
}

/// Individual consistency checks, in the order they are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarCheck {
    /// No trade fell inside the bar's window.
    NoTrades,
    /// Trade quantities do not sum exactly within `Decimal` precision.
    VolumeOverflow,
    Volume,
    Open,
    Close,
    High,
    Low,
}

impl BarCheck {
    pub const fn as_str(self) -> &'static str {
        match self {
            BarCheck::NoTrades => "no_trades",
            BarCheck::VolumeOverflow => "volume_overflow",
            BarCheck::Volume => "volume",
            BarCheck::Open => "open",
            BarCheck::Close => "close",
            BarCheck::High => "high",
            BarCheck::Low => "low",
        }
    }
}

impl Display for BarCheck {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a bar was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarMismatch {
    /// First check that failed.
    pub check: BarCheck,
    /// Value implied by the trades.
    pub expected: Option<Decimal>,
    /// Value carried by the bar.
    pub reported: Option<Decimal>,
}

impl BarMismatch {
    fn no_trades() -> Self {
        Self {
            check: BarCheck::NoTrades,
            expected: None,
            reported: None,
        }
    }
}

impl Display for BarMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.check, self.expected, self.reported) {
            (BarCheck::NoTrades, _, _) => f.write_str("no trades in bar window"),
            (BarCheck::VolumeOverflow, _, Some(reported)) => write!(
                f,
                "trade volume exceeds decimal precision, bar reports {reported}"
            ),
            (check, Some(expected), Some(reported)) => write!(
                f,
                "{check} mismatch: trades give {expected}, bar reports {reported}"
            ),
            (check, _, _) => write!(f, "{check} mismatch"),
        }
    }
}

/// Check `bar` against the trades in its window.
///
/// Returns the recomputed summary when every check passes, otherwise the
/// first failing check.
pub fn validate_bar(trades: &[Trade], bar: &Bar) -> Result<TradeSummary, BarMismatch> {
    debug!(instrument = %bar.instrument, end_time = %bar.end_time, "analyzing bar");

    let window = filter_trades_for_bar(trades, bar);
    let Some(summary) = TradeSummary::from_trades(window.iter().copied()) else {
        debug!(instrument = %bar.instrument, end_time = %bar.end_time, "no trade found in bar window");
        return Err(BarMismatch::no_trades());
    };

    let Some(volume) = summary.volume else {
        debug!(instrument = %bar.instrument, end_time = %bar.end_time, "trade volume exceeds decimal precision");
        return Err(BarMismatch {
            check: BarCheck::VolumeOverflow,
            expected: None,
            reported: Some(bar.volume),
        });
    };

    let checks = [
        (BarCheck::Volume, volume, bar.volume),
        (BarCheck::Open, summary.open, bar.open),
        (BarCheck::Close, summary.close, bar.close),
        (BarCheck::High, summary.high, bar.high),
        (BarCheck::Low, summary.low, bar.low),
    ];
    for (check, expected, reported) in checks {
        if expected != reported {
            debug!(
                instrument = %bar.instrument,
                end_time = %bar.end_time,
                %check,
                %expected,
                %reported,
                "bar does not match its trades"
            );
            return Err(BarMismatch {
                check,
                expected: Some(expected),
                reported: Some(reported),
            });
        }
    }

    trace!(instrument = %bar.instrument, end_time = %bar.end_time, "bar is consistent");
    Ok(summary)
}

/// Whether `bar` is consistent with the trades in its window.
pub fn is_bar_valid(trades: &[Trade], bar: &Bar) -> bool {
    validate_bar(trades, bar).is_ok()
}
