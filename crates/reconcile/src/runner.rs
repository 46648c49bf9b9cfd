//! Reconciliation over a list of bars.
//!
//! Bars are checked independently of one another, so the work can be spread
//! over a rayon pool. Results always come back in input order.

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::Serialize;
use tracing::info;

use tradecheck_core::{Bar, Error, ReconcileConfig, Result, Trade};

use crate::validator::{is_bar_valid, validate_bar, BarMismatch, TradeSummary};

/// A bar that failed reconciliation, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedBar {
    pub bar: Bar,
    pub mismatch: BarMismatch,
}

/// Outcome of a reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    /// Bars consistent with their trades, in input order.
    pub valid: Vec<Bar>,
    /// Bars that failed, in input order.
    pub rejected: Vec<RejectedBar>,
}

impl ReconciliationReport {
    /// Number of bars checked.
    pub fn total(&self) -> usize {
        self.valid.len() + self.rejected.len()
    }

    /// Whether every bar passed.
    pub fn all_valid(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Runs bar validation across a list of bars.
#[derive(Debug, Clone)]
pub struct Reconciler {
    workers: u32,
}

impl Reconciler {
    pub fn new(config: &ReconcileConfig) -> Self {
        Self {
            workers: config.workers,
        }
    }

    /// Validate every bar against `trades`.
    pub fn run(&self, trades: &[Trade], bars: &[Bar]) -> Result<ReconciliationReport> {
        let check = |bar: &Bar| validate_bar(trades, bar);
        let outcomes: Vec<std::result::Result<TradeSummary, BarMismatch>> = match self.workers {
            1 => bars.iter().map(check).collect(),
            0 => bars.par_iter().map(check).collect(),
            workers => {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(workers as usize)
                    .build()
                    .map_err(|e| Error::config(format!("failed to build worker pool: {e}")))?;
                pool.install(|| bars.par_iter().map(check).collect())
            }
        };

        let mut report = ReconciliationReport::default();
        for (bar, outcome) in bars.iter().zip(outcomes) {
            match outcome {
                Ok(_) => report.valid.push(bar.clone()),
                Err(mismatch) => report.rejected.push(RejectedBar {
                    bar: bar.clone(),
                    mismatch,
                }),
            }
        }

        info!(
            bars = bars.len(),
            trades = trades.len(),
            valid = report.valid.len(),
            rejected = report.rejected.len(),
            workers = self.workers,
            "reconciliation finished"
        );
        Ok(report)
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(&ReconcileConfig::default())
    }
}

/// The bars consistent with `trades`, in input order.
pub fn reconcile(trades: &[Trade], bars: &[Bar]) -> Vec<Bar> {
    bars.iter()
        .filter(|bar| is_bar_valid(trades, bar))
        .cloned()
        .collect()
}
