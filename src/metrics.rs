use crate::aggregate::{closed_trades, mean, round1, round2};
use crate::models::Trade;
use serde::Serialize;

/// Portfolio-level scalar statistics. Closed trades only; open positions are
/// excluded from every field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_pnl: f64,
    pub total_pnl_percent: f64,
    pub win_rate: f64,
    pub total_trades: usize,
    pub total_volume: f64,
    pub total_fees: f64,
    /// Mean holding time in hours.
    pub avg_trade_duration: f64,
    pub largest_gain: f64,
    /// Signed (negative) value, not an absolute.
    pub largest_loss: f64,
    pub avg_win: f64,
    /// Signed (negative) value, not an absolute.
    pub avg_loss: f64,
    /// Expected P&L per trade: avgWin·p − |avgLoss|·(1−p).
    pub expectancy: f64,
}

pub fn calculate_metrics(trades: &[Trade]) -> DashboardMetrics {
    let closed = closed_trades(trades);
    if closed.is_empty() {
        return DashboardMetrics::default();
    }

    let mut total_pnl = 0.0;
    let mut total_volume = 0.0;
    let mut total_fees = 0.0;
    let mut win_pnls = Vec::new();
    let mut loss_pnls = Vec::new();
    let mut durations = Vec::new();

    for trade in &closed {
        total_pnl += trade.pnl;
        total_volume += trade.notional();
        total_fees += trade.fees;

        if trade.pnl > 0.0 {
            win_pnls.push(trade.pnl);
        } else if trade.pnl < 0.0 {
            loss_pnls.push(trade.pnl);
        }

        if let Some(hours) = trade.duration_hours() {
            durations.push(hours);
        }
    }

    let total_pnl_percent = if total_volume > 0.0 {
        total_pnl / total_volume * 100.0
    } else {
        0.0
    };
    let win_rate = win_pnls.len() as f64 / closed.len() as f64 * 100.0;

    let largest_gain = win_pnls.iter().copied().fold(0.0_f64, f64::max);
    let largest_loss = loss_pnls.iter().copied().fold(0.0_f64, f64::min);
    let avg_win = mean(&win_pnls);
    let avg_loss = mean(&loss_pnls);

    let p = win_rate / 100.0;
    let expectancy = avg_win * p - avg_loss.abs() * (1.0 - p);

    DashboardMetrics {
        total_pnl: round2(total_pnl),
        total_pnl_percent: round1(total_pnl_percent),
        win_rate: round1(win_rate),
        total_trades: closed.len(),
        total_volume: round2(total_volume),
        total_fees: round2(total_fees),
        avg_trade_duration: round1(mean(&durations)),
        largest_gain: round2(largest_gain),
        largest_loss: round2(largest_loss),
        avg_win: round2(avg_win),
        avg_loss: round2(avg_loss),
        expectancy: round2(expectancy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, OrderType, Symbol, Trade, TradeStatus};
    use chrono::{Duration, TimeZone, Utc};

    fn closed(pnl: f64, entry_price: f64, quantity: f64, hours: i64) -> Trade {
        let entry = Utc.with_ymd_and_hms(2024, 4, 10, 8, 0, 0).unwrap();
        Trade {
            id: format!("t-{pnl}-{hours}"),
            symbol: Symbol::Btc,
            direction: Direction::Long,
            order_type: OrderType::Market,
            entry_price,
            exit_price: Some(entry_price + pnl / quantity),
            quantity,
            pnl,
            fees: 1.0,
            entry_time: entry,
            exit_time: Some(entry + Duration::hours(hours)),
            notes: String::new(),
            status: TradeStatus::Closed,
        }
    }

    fn open_trade() -> Trade {
        Trade {
            id: "open".to_string(),
            symbol: Symbol::Sol,
            direction: Direction::Long,
            order_type: OrderType::Limit,
            entry_price: 100.0,
            exit_price: None,
            quantity: 5.0,
            pnl: 0.0,
            fees: 0.5,
            entry_time: Utc.with_ymd_and_hms(2024, 4, 12, 8, 0, 0).unwrap(),
            exit_time: None,
            notes: String::new(),
            status: TradeStatus::Open,
        }
    }

    #[test]
    fn btc_scenario_matches_expected_totals() {
        // Three closed trades, $1000 notional each, pnl [100, -40, 60].
        let trades = vec![
            closed(100.0, 100.0, 10.0, 4),
            closed(-40.0, 100.0, 10.0, 4),
            closed(60.0, 100.0, 10.0, 4),
        ];
        let metrics = calculate_metrics(&trades);

        assert_eq!(metrics.total_pnl, 120.0);
        assert_eq!(metrics.total_volume, 3000.0);
        assert_eq!(metrics.total_pnl_percent, 4.0);
        assert_eq!(metrics.win_rate, 66.7);
        assert_eq!(metrics.total_trades, 3);
        assert_eq!(metrics.total_fees, 3.0);
        assert_eq!(metrics.largest_gain, 100.0);
        assert_eq!(metrics.largest_loss, -40.0);
        assert_eq!(metrics.avg_win, 80.0);
        assert_eq!(metrics.avg_loss, -40.0);
        assert_eq!(metrics.avg_trade_duration, 4.0);
    }

    #[test]
    fn totals_conserve_across_win_loss_split() {
        let trades = vec![
            closed(25.0, 50.0, 2.0, 1),
            closed(-10.0, 50.0, 2.0, 2),
            closed(0.0, 50.0, 2.0, 3),
            closed(5.0, 50.0, 2.0, 4),
        ];
        let metrics = calculate_metrics(&trades);
        let recomputed: f64 = trades.iter().map(|t| t.pnl).sum();
        assert_eq!(metrics.total_pnl, round2(recomputed));
        assert!(metrics.win_rate >= 0.0 && metrics.win_rate <= 100.0);
    }

    #[test]
    fn open_trades_are_excluded_everywhere() {
        let trades = vec![closed(50.0, 100.0, 1.0, 2), open_trade()];
        let metrics = calculate_metrics(&trades);
        assert_eq!(metrics.total_trades, 1);
        assert_eq!(metrics.total_volume, 100.0);
        assert_eq!(metrics.total_fees, 1.0);
    }

    #[test]
    fn empty_input_yields_all_zero() {
        let metrics = calculate_metrics(&[]);
        assert_eq!(metrics, DashboardMetrics::default());
        assert_eq!(metrics.win_rate, 0.0);
    }

    #[test]
    fn zero_volume_does_not_divide() {
        // Degenerate notional; percent must resolve to 0, not NaN.
        let mut trade = closed(10.0, 100.0, 1.0, 1);
        trade.entry_price = 0.0;
        trade.quantity = 0.0;
        let metrics = calculate_metrics(&[trade]);
        assert_eq!(metrics.total_pnl_percent, 0.0);
    }

    #[test]
    fn expectancy_combines_avg_win_and_loss() {
        let trades = vec![closed(100.0, 100.0, 10.0, 4), closed(-40.0, 100.0, 10.0, 4)];
        let metrics = calculate_metrics(&trades);
        // 50% win rate: 100·0.5 − 40·0.5 = 30.
        assert_eq!(metrics.expectancy, 30.0);
    }
}
