//! Bar interval codes and their durations.
//!
//! The exchange identifies bar widths with short codes such as `"5m"` or
//! `"1D"`: the trailing character is the unit and the leading digits are the
//! amount. The set of codes is closed; anything outside it is rejected.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of days in an interval month. Not a calendar month.
pub const DAYS_PER_MONTH: i64 = 30;

/// Unit suffix of an interval code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalUnit {
    /// `m`
    Minute,
    /// `h`
    Hour,
    /// `D`
    Day,
    /// `M`, fixed at [`DAYS_PER_MONTH`] days.
    Month,
}

impl IntervalUnit {
    /// Duration of `amount` of this unit.
    pub fn duration(self, amount: i64) -> Duration {
        match self {
            Self::Minute => Duration::minutes(amount),
            Self::Hour => Duration::hours(amount),
            Self::Day => Duration::days(amount),
            Self::Month => Duration::days(amount * DAYS_PER_MONTH),
        }
    }
}

/// Recognized bar intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "6h")]
    SixHours,
    #[serde(rename = "12h")]
    TwelveHours,
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "7D")]
    SevenDays,
    #[serde(rename = "14D")]
    FourteenDays,
    #[serde(rename = "1M")]
    OneMonth,
}

impl Interval {
    /// All intervals, in the order the exchange documents them.
    pub const ALL: [Self; 12] = [
        Self::OneMinute,
        Self::FiveMinutes,
        Self::FifteenMinutes,
        Self::ThirtyMinutes,
        Self::OneHour,
        Self::FourHours,
        Self::SixHours,
        Self::TwelveHours,
        Self::OneDay,
        Self::SevenDays,
        Self::FourteenDays,
        Self::OneMonth,
    ];

    /// Code, amount and unit for each interval.
    const fn entry(self) -> (&'static str, i64, IntervalUnit) {
        match self {
            Self::OneMinute => ("1m", 1, IntervalUnit::Minute),
            Self::FiveMinutes => ("5m", 5, IntervalUnit::Minute),
            Self::FifteenMinutes => ("15m", 15, IntervalUnit::Minute),
            Self::ThirtyMinutes => ("30m", 30, IntervalUnit::Minute),
            Self::OneHour => ("1h", 1, IntervalUnit::Hour),
            Self::FourHours => ("4h", 4, IntervalUnit::Hour),
            Self::SixHours => ("6h", 6, IntervalUnit::Hour),
            Self::TwelveHours => ("12h", 12, IntervalUnit::Hour),
            Self::OneDay => ("1D", 1, IntervalUnit::Day),
            Self::SevenDays => ("7D", 7, IntervalUnit::Day),
            Self::FourteenDays => ("14D", 14, IntervalUnit::Day),
            Self::OneMonth => ("1M", 1, IntervalUnit::Month),
        }
    }

    pub const fn as_str(self) -> &'static str {
        self.entry().0
    }

    pub const fn amount(self) -> i64 {
        self.entry().1
    }

    pub const fn unit(self) -> IntervalUnit {
        self.entry().2
    }

    /// Width of a bar of this interval.
    pub fn duration(self) -> Duration {
        self.unit().duration(self.amount())
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|interval| interval.as_str() == value)
            .ok_or_else(|| Error::invalid_interval(value))
    }
}

/// The recognized interval codes, in order.
pub fn list_allowed_intervals() -> Vec<&'static str> {
    Interval::ALL.iter().map(|interval| interval.as_str()).collect()
}

/// Parse an interval code into the width of its bars.
///
/// Codes are matched exactly: no trimming and no case folding, since `1m`
/// and `1M` are different intervals.
pub fn parse_interval(code: &str) -> Result<Duration> {
    code.parse::<Interval>().map(Interval::duration)
}
