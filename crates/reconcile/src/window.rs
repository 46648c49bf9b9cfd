//! Trade-to-bar window assignment.
//!
//! A bar covers `(start_time, end_time]`: a trade printed exactly on the
//! boundary between two adjacent bars belongs to the earlier one.

use tradecheck_core::{Bar, Trade};

/// Whether `trade` belongs to `bar`'s window.
#[inline]
pub fn is_trade_in_window(trade: &Trade, bar: &Bar) -> bool {
    trade.instrument == bar.instrument
        && trade.timestamp > bar.start_time
        && trade.timestamp <= bar.end_time
}

/// The trades of `bar`, in ascending timestamp order.
///
/// Trades sharing a timestamp keep their input order.
pub fn filter_trades_for_bar<'a>(trades: &'a [Trade], bar: &Bar) -> Vec<&'a Trade> {
    let mut matched: Vec<&Trade> = trades
        .iter()
        .filter(|trade| is_trade_in_window(trade, bar))
        .collect();
    matched.sort_by_key(|trade| trade.timestamp);
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use tradecheck_core::{Timestamp, TradeSide};

    fn at(h: u32, m: u32, s: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2021, 6, 3, h, m, s).unwrap()
    }

    fn make_trade(id: i64, instrument: &str, ts: Timestamp) -> Trade {
        Trade {
            id,
            instrument: instrument.to_string(),
            timestamp: ts,
            price: dec!(1),
            quantity: dec!(1),
            side: TradeSide::Buy,
        }
    }

    fn make_bar(instrument: &str, start: Timestamp, end: Timestamp) -> Bar {
        Bar {
            instrument: instrument.to_string(),
            start_time: start,
            end_time: end,
            open: dec!(1),
            high: dec!(1),
            low: dec!(1),
            close: dec!(1),
            volume: dec!(1),
        }
    }

    #[test]
    fn test_trade_inside_window() {
        let bar = make_bar("INST", at(14, 0, 0), at(14, 30, 0));
        assert!(is_trade_in_window(&make_trade(1, "INST", at(14, 8, 24)), &bar));
    }

    #[test]
    fn test_trade_outside_window() {
        let bar = make_bar("INST", at(14, 0, 0), at(14, 30, 0));
        assert!(!is_trade_in_window(&make_trade(1, "INST", at(15, 8, 24)), &bar));
        assert!(!is_trade_in_window(&make_trade(2, "INST", at(13, 59, 59)), &bar));
    }

    #[test]
    fn test_window_boundaries() {
        let bar = make_bar("INST", at(14, 0, 0), at(14, 30, 0));
        // End is inclusive, start is exclusive.
        assert!(is_trade_in_window(&make_trade(1, "INST", at(14, 30, 0)), &bar));
        assert!(!is_trade_in_window(&make_trade(2, "INST", at(14, 0, 0)), &bar));
    }

    #[test]
    fn test_boundary_trade_goes_to_earlier_bar() {
        let first = make_bar("INST", at(14, 0, 0), at(14, 30, 0));
        let second = make_bar("INST", at(14, 30, 0), at(15, 0, 0));
        let trade = make_trade(1, "INST", at(14, 30, 0));
        assert!(is_trade_in_window(&trade, &first));
        assert!(!is_trade_in_window(&trade, &second));
    }

    #[test]
    fn test_other_instrument_never_matches() {
        let bar = make_bar("INST", at(14, 0, 0), at(14, 30, 0));
        assert!(!is_trade_in_window(&make_trade(1, "OTHER", at(14, 8, 24)), &bar));

        let trades = vec![
            make_trade(1, "OTHER", at(14, 5, 0)),
            make_trade(2, "INST", at(14, 6, 0)),
            make_trade(3, "OTHER", at(14, 7, 0)),
        ];
        let filtered = filter_trades_for_bar(&trades, &bar);
        assert_eq!(filtered.len(), 1);
        assert!(filtered.iter().all(|trade| trade.instrument == "INST"));
    }

    #[test]
    fn test_filter_empty() {
        let bar = make_bar("INST", at(14, 0, 0), at(14, 30, 0));
        let trades = vec![
            make_trade(1, "INST", at(15, 8, 24)),
            make_trade(2, "INST", at(15, 9, 24)),
        ];
        assert!(filter_trades_for_bar(&trades, &bar).is_empty());
    }

    #[test]
    fn test_filter_keeps_only_window() {
        let bar = make_bar("INST", at(14, 0, 0), at(14, 30, 0));
        let trades = vec![
            make_trade(1, "INST", at(14, 8, 24)),
            make_trade(2, "INST", at(15, 9, 24)),
        ];
        let filtered = filter_trades_for_bar(&trades, &bar);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 1);
    }

    #[test]
    fn test_filter_sorts_by_timestamp() {
        let bar = make_bar("INST", at(14, 0, 0), at(14, 30, 0));
        let trades = vec![
            make_trade(1, "INST", at(14, 20, 0)),
            make_trade(2, "INST", at(14, 5, 0)),
            make_trade(3, "INST", at(14, 30, 0)),
            make_trade(4, "INST", at(14, 10, 0)),
        ];
        let ids: Vec<i64> = filter_trades_for_bar(&trades, &bar)
            .iter()
            .map(|trade| trade.id)
            .collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_filter_ties_keep_input_order() {
        let bar = make_bar("INST", at(14, 0, 0), at(14, 30, 0));
        let trades = vec![
            make_trade(7, "INST", at(14, 10, 0)),
            make_trade(3, "INST", at(14, 5, 0)),
            make_trade(5, "INST", at(14, 10, 0)),
        ];
        let ids: Vec<i64> = filter_trades_for_bar(&trades, &bar)
            .iter()
            .map(|trade| trade.id)
            .collect();
        assert_eq!(ids, vec![3, 7, 5]);
    }
}
