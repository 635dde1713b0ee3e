use crate::models::Trade;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Selects the closed trades every performance computation operates on.
pub fn closed_trades(trades: &[Trade]) -> Vec<&Trade> {
    trades.iter().filter(|t| t.is_closed()).collect()
}

/// Closed trades sorted ascending by entry time, the traversal order for
/// every path-dependent computation.
pub fn closed_in_entry_order(trades: &[Trade]) -> Vec<&Trade> {
    let mut closed = closed_trades(trades);
    closed.sort_by(|a, b| {
        a.entry_time
            .partial_cmp(&b.entry_time)
            .unwrap_or(Ordering::Equal)
    });
    closed
}

/// Mean over finite values; empty input resolves to 0 rather than NaN.
pub fn mean(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;

    for value in values.iter().copied() {
        if value.is_finite() {
            sum += value;
            count += 1;
        }
    }

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Monetary rounding (2 decimal places).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rate rounding (1 decimal place).
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Running tally shared by the grouping builders: trade count, win count,
/// summed pnl.
#[derive(Debug, Clone, Copy, Default)]
pub struct PnlTally {
    pub trades: usize,
    pub wins: usize,
    pub pnl: f64,
}

impl PnlTally {
    pub fn add(&mut self, pnl: f64) {
        self.trades += 1;
        if pnl > 0.0 {
            self.wins += 1;
        }
        self.pnl += pnl;
    }

    /// Win percentage, 0 when the bucket is empty.
    pub fn win_rate(&self) -> f64 {
        if self.trades == 0 {
            0.0
        } else {
            self.wins as f64 / self.trades as f64 * 100.0
        }
    }

    pub fn avg_pnl(&self) -> f64 {
        if self.trades == 0 {
            0.0
        } else {
            self.pnl / self.trades as f64
        }
    }
}

/// Short chart label for a timestamp, e.g. "Mar 7".
pub fn day_label(ts: DateTime<Utc>) -> String {
    ts.format("%b %-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, OrderType, Symbol, TradeDraft};
    use chrono::{Duration, TimeZone};

    fn closed_at(hours_ago: i64, pnl_target: f64) -> Trade {
        let exit = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let entry = exit - Duration::hours(hours_ago);
        TradeDraft {
            symbol: Symbol::Eth,
            direction: Direction::Long,
            order_type: OrderType::Market,
            entry_price: 100.0,
            exit_price: Some(100.0 + pnl_target),
            quantity: 1.0,
            entry_time: entry,
            exit_time: Some(exit),
            notes: String::new(),
        }
        .into_trade(format!("t-{hours_ago}"))
    }

    #[test]
    fn entry_order_sorts_ascending() {
        let trades = vec![closed_at(1, 5.0), closed_at(48, -2.0), closed_at(12, 3.0)];
        let ordered = closed_in_entry_order(&trades);
        assert_eq!(ordered.len(), 3);
        assert!(ordered[0].entry_time <= ordered[1].entry_time);
        assert!(ordered[1].entry_time <= ordered[2].entry_time);
    }

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[2.0, 4.0]), 3.0);
    }

    #[test]
    fn tally_tracks_wins_and_rate() {
        let mut tally = PnlTally::default();
        tally.add(10.0);
        tally.add(-4.0);
        tally.add(0.0);
        assert_eq!(tally.trades, 3);
        assert_eq!(tally.wins, 1);
        assert!((tally.pnl - 6.0).abs() < 1e-9);
        assert!((tally.win_rate() - 100.0 / 3.0).abs() < 1e-9);
        assert!((tally.avg_pnl() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn rounding_helpers() {
        assert_eq!(round2(1.239), 1.24);
        assert_eq!(round2(-3.14159), -3.14);
        assert_eq!(round1(66.666), 66.7);
    }
}
