//! PyO3 bindings for tradecheck.
//!
//! Exposes bar reconciliation to Python:
//! - Interval codes and parsing
//! - Trade-to-bar window assignment
//! - Bar validation and reconciliation

use chrono::{DateTime, Duration, Utc};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use tradecheck_core::{
    Bar as RustBar, Error as RustError, ReconcileConfig, Timestamp, Trade as RustTrade,
    TradeSide as RustTradeSide,
};
use tradecheck_reconcile::Reconciler;

fn to_py_err(err: RustError) -> PyErr {
    match err {
        RustError::InvalidInterval { .. } | RustError::InvalidRequest(_) | RustError::Data(_) => {
            PyValueError::new_err(err.to_string())
        }
        _ => PyRuntimeError::new_err(err.to_string()),
    }
}

fn ts_from_ms(ts_ms: i64) -> PyResult<Timestamp> {
    DateTime::<Utc>::from_timestamp_millis(ts_ms)
        .ok_or_else(|| PyValueError::new_err(format!("timestamp {ts_ms} ms is out of range")))
}

// ============================================================================
// Python-exposed Types
// ============================================================================

/// Aggressor side of a trade.
#[pyclass(eq, eq_int)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl From<TradeSide> for RustTradeSide {
    fn from(s: TradeSide) -> Self {
        match s {
            TradeSide::Buy => RustTradeSide::Buy,
            TradeSide::Sell => RustTradeSide::Sell,
        }
    }
}

impl From<RustTradeSide> for TradeSide {
    fn from(s: RustTradeSide) -> Self {
        match s {
            RustTradeSide::Buy => TradeSide::Buy,
            RustTradeSide::Sell => TradeSide::Sell,
        }
    }
}

/// A single executed trade.
#[pyclass]
#[derive(Clone)]
pub struct Trade {
    #[pyo3(get, set)]
    pub id: i64,
    #[pyo3(get, set)]
    pub instrument: String,
    #[pyo3(get, set)]
    pub ts_ms: i64,
    #[pyo3(get, set)]
    pub price: Decimal,
    #[pyo3(get, set)]
    pub quantity: Decimal,
    #[pyo3(get, set)]
    pub side: TradeSide,
}

#[pymethods]
impl Trade {
    #[new]
    fn new(
        id: i64,
        instrument: String,
        ts_ms: i64,
        price: Decimal,
        quantity: Decimal,
        side: TradeSide,
    ) -> Self {
        Trade {
            id,
            instrument,
            ts_ms,
            price,
            quantity,
            side,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Trade(id={}, instrument={}, ts_ms={}, price={}, quantity={})",
            self.id, self.instrument, self.ts_ms, self.price, self.quantity
        )
    }
}

impl Trade {
    fn to_rust(&self) -> PyResult<RustTrade> {
        RustTrade::new(
            self.id,
            self.instrument.clone(),
            ts_from_ms(self.ts_ms)?,
            self.price,
            self.quantity,
            self.side.into(),
        )
        .map_err(to_py_err)
    }
}

impl From<&RustTrade> for Trade {
    fn from(t: &RustTrade) -> Self {
        Trade {
            id: t.id,
            instrument: t.instrument.clone(),
            ts_ms: t.timestamp.timestamp_millis(),
            price: t.price,
            quantity: t.quantity,
            side: t.side.into(),
        }
    }
}

/// OHLCV bar over the window `(start_ms, end_ms]`.
#[pyclass]
#[derive(Clone)]
pub struct Bar {
    #[pyo3(get)]
    pub instrument: String,
    #[pyo3(get)]
    pub start_ms: i64,
    #[pyo3(get)]
    pub end_ms: i64,
    #[pyo3(get)]
    pub open: Decimal,
    #[pyo3(get)]
    pub high: Decimal,
    #[pyo3(get)]
    pub low: Decimal,
    #[pyo3(get)]
    pub close: Decimal,
    #[pyo3(get)]
    pub volume: Decimal,
}

#[pymethods]
impl Bar {
    /// Build a bar from its end time and the interval code it was requested under.
    #[new]
    #[allow(clippy::too_many_arguments)]
    fn new(
        instrument: String,
        end_ms: i64,
        interval: &str,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> PyResult<Self> {
        let width = tradecheck_core::parse_interval(interval).map_err(to_py_err)?;
        let bar = RustBar::from_end_time(
            instrument,
            ts_from_ms(end_ms)?,
            width,
            open,
            high,
            low,
            close,
            volume,
        )
        .map_err(to_py_err)?;
        Ok(Bar::from(&bar))
    }

    fn __repr__(&self) -> String {
        format!(
            "Bar(instrument={}, start_ms={}, end_ms={}, o={}, h={}, l={}, c={}, v={})",
            self.instrument,
            self.start_ms,
            self.end_ms,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume
        )
    }
}

impl Bar {
    fn to_rust(&self) -> PyResult<RustBar> {
        Ok(RustBar {
            instrument: self.instrument.clone(),
            start_time: ts_from_ms(self.start_ms)?,
            end_time: ts_from_ms(self.end_ms)?,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        })
    }
}

impl From<&RustBar> for Bar {
    fn from(b: &RustBar) -> Self {
        Bar {
            instrument: b.instrument.clone(),
            start_ms: b.start_time.timestamp_millis(),
            end_ms: b.end_time.timestamp_millis(),
            open: b.open,
            high: b.high,
            low: b.low,
            close: b.close,
            volume: b.volume,
        }
    }
}

fn trades_to_rust(trades: &[Trade]) -> PyResult<Vec<RustTrade>> {
    trades.iter().map(Trade::to_rust).collect()
}

fn bars_to_rust(bars: &[Bar]) -> PyResult<Vec<RustBar>> {
    bars.iter().map(Bar::to_rust).collect()
}

// ============================================================================
// Python-exposed Functions
// ============================================================================

/// Recognized interval codes, in order.
#[pyfunction]
fn list_allowed_intervals() -> Vec<&'static str> {
    tradecheck_core::list_allowed_intervals()
}

/// Width of a bar for an interval code. Raises ValueError for unknown codes.
#[pyfunction]
#[pyo3(signature = (code=None))]
fn parse_interval(code: Option<&str>) -> PyResult<Duration> {
    tradecheck_core::parse_interval(code.unwrap_or_default()).map_err(to_py_err)
}

/// Whether a trade falls inside a bar's window.
#[pyfunction]
fn is_trade_in_window(trade: &Trade, bar: &Bar) -> PyResult<bool> {
    Ok(tradecheck_reconcile::is_trade_in_window(
        &trade.to_rust()?,
        &bar.to_rust()?,
    ))
}

/// The trades of a bar, sorted by timestamp.
#[pyfunction]
fn filter_trades_for_bar(trades: Vec<Trade>, bar: &Bar) -> PyResult<Vec<Trade>> {
    let trades = trades_to_rust(&trades)?;
    let bar = bar.to_rust()?;
    Ok(tradecheck_reconcile::filter_trades_for_bar(&trades, &bar)
        .into_iter()
        .map(Trade::from)
        .collect())
}

/// Whether a bar is consistent with the trades in its window.
#[pyfunction]
fn is_bar_valid(trades: Vec<Trade>, bar: &Bar) -> PyResult<bool> {
    let trades = trades_to_rust(&trades)?;
    Ok(tradecheck_reconcile::is_bar_valid(&trades, &bar.to_rust()?))
}

/// The bars consistent with their trades, in input order.
#[pyfunction]
#[pyo3(signature = (trades, bars, workers=1))]
fn reconcile(py: Python<'_>, trades: Vec<Trade>, bars: Vec<Bar>, workers: u32) -> PyResult<Vec<Bar>> {
    let trades = trades_to_rust(&trades)?;
    let bars = bars_to_rust(&bars)?;
    let reconciler = Reconciler::new(&ReconcileConfig { workers });
    let report = py
        .allow_threads(|| reconciler.run(&trades, &bars))
        .map_err(to_py_err)?;
    Ok(report.valid.iter().map(Bar::from).collect())
}

/// Install a stderr log subscriber. Returns False if one is already installed.
#[pyfunction]
#[pyo3(signature = (filter="info"))]
fn init_logging(filter: &str) -> PyResult<bool> {
    let filter = EnvFilter::try_new(filter).map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok())
}

// ============================================================================
// Module Definition
// ============================================================================

/// tradecheck - bar/trade reconciliation for Python.
#[pymodule]
fn tradecheck(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Types
    m.add_class::<TradeSide>()?;
    m.add_class::<Trade>()?;
    m.add_class::<Bar>()?;

    // Functions
    m.add_function(wrap_pyfunction!(list_allowed_intervals, m)?)?;
    m.add_function(wrap_pyfunction!(parse_interval, m)?)?;
    m.add_function(wrap_pyfunction!(is_trade_in_window, m)?)?;
    m.add_function(wrap_pyfunction!(filter_trades_for_bar, m)?)?;
    m.add_function(wrap_pyfunction!(is_bar_valid, m)?)?;
    m.add_function(wrap_pyfunction!(reconcile, m)?)?;
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;

    Ok(())
}
