use crate::aggregate::{closed_in_entry_order, round1, round2};
use crate::models::Trade;
use serde::{Serialize, Serializer};
use statrs::statistics::Statistics;

/// Annualization constant: per-trade returns are scaled by the 252-trading-day
/// convention as a proxy.
const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Wire stand-in for an unbounded profit factor. The dashboard renders any
/// value at or above this as infinity.
pub const PROFIT_FACTOR_SENTINEL: f64 = 999.0;

/// Gross profit over gross loss. Zero gross loss with positive profit has no
/// finite ratio; the variant keeps that explicit instead of leaking a magic
/// number through the API.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfitFactor {
    Finite(f64),
    Unbounded,
}

impl ProfitFactor {
    /// Numeric form used at the serialization boundary.
    pub fn display_value(&self) -> f64 {
        match self {
            ProfitFactor::Finite(value) => *value,
            ProfitFactor::Unbounded => PROFIT_FACTOR_SENTINEL,
        }
    }
}

impl Default for ProfitFactor {
    fn default() -> Self {
        ProfitFactor::Finite(0.0)
    }
}

impl Serialize for ProfitFactor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.display_value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakKind {
    Win,
    Loss,
    #[default]
    None,
}

/// Path-dependent portfolio statistics, computed in one forward pass over
/// closed trades in entry order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMetrics {
    pub max_drawdown: f64,
    /// Decline from peak at the maximum-drawdown step, as a percent of that
    /// peak (0 when the peak was not positive).
    pub max_drawdown_percent: f64,
    pub sharpe_ratio: f64,
    pub profit_factor: ProfitFactor,
    pub max_consecutive_wins: u32,
    pub max_consecutive_losses: u32,
    pub current_streak: u32,
    pub current_streak_type: StreakKind,
}

pub fn calculate_risk_metrics(trades: &[Trade]) -> RiskMetrics {
    let closed = closed_in_entry_order(trades);
    if closed.is_empty() {
        return RiskMetrics::default();
    }

    let mut cumulative = 0.0;
    let mut peak = 0.0_f64;
    let mut max_drawdown = 0.0;
    let mut max_drawdown_percent = 0.0;

    let mut gross_profit = 0.0;
    let mut gross_loss = 0.0;

    let mut current_wins = 0u32;
    let mut current_losses = 0u32;
    let mut max_consecutive_wins = 0u32;
    let mut max_consecutive_losses = 0u32;

    let mut pnls = Vec::with_capacity(closed.len());

    for trade in &closed {
        pnls.push(trade.pnl);

        cumulative += trade.pnl;
        peak = peak.max(cumulative);
        let drawdown = peak - cumulative;
        if drawdown > max_drawdown {
            max_drawdown = drawdown;
            max_drawdown_percent = if peak > 0.0 {
                drawdown / peak * 100.0
            } else {
                0.0
            };
        }

        if trade.pnl > 0.0 {
            gross_profit += trade.pnl;
            current_wins += 1;
            current_losses = 0;
            max_consecutive_wins = max_consecutive_wins.max(current_wins);
        } else if trade.pnl < 0.0 {
            gross_loss += trade.pnl.abs();
            current_losses += 1;
            current_wins = 0;
            max_consecutive_losses = max_consecutive_losses.max(current_losses);
        } else {
            // A flat trade breaks both runs without counting as either.
            current_wins = 0;
            current_losses = 0;
        }
    }

    let (current_streak, current_streak_type) = current_streak(&closed);

    RiskMetrics {
        max_drawdown: round2(max_drawdown),
        max_drawdown_percent: round1(max_drawdown_percent),
        sharpe_ratio: round2(sharpe_ratio(&pnls)),
        profit_factor: profit_factor(gross_profit, gross_loss),
        max_consecutive_wins,
        max_consecutive_losses,
        current_streak,
        current_streak_type,
    }
}

/// Per-trade Sharpe: each pnl is one return observation, annualized by √252.
/// Zero variance resolves to 0.
fn sharpe_ratio(pnls: &[f64]) -> f64 {
    if pnls.is_empty() {
        return 0.0;
    }

    let mean = pnls.to_vec().mean();
    let std_dev = pnls.to_vec().population_std_dev();
    if std_dev == 0.0 || !std_dev.is_finite() {
        return 0.0;
    }

    mean / std_dev * TRADING_DAYS_PER_YEAR.sqrt()
}

fn profit_factor(gross_profit: f64, gross_loss: f64) -> ProfitFactor {
    if gross_loss > 0.0 {
        ProfitFactor::Finite(round2(gross_profit / gross_loss))
    } else if gross_profit > 0.0 {
        ProfitFactor::Unbounded
    } else {
        ProfitFactor::Finite(0.0)
    }
}

/// Backward scan from the most recent closed trade: length of the run sharing
/// its sign. A flat newest trade means no active streak.
fn current_streak(closed: &[&Trade]) -> (u32, StreakKind) {
    let mut iter = closed.iter().rev();
    let Some(latest) = iter.next() else {
        return (0, StreakKind::None);
    };

    let kind = if latest.pnl > 0.0 {
        StreakKind::Win
    } else if latest.pnl < 0.0 {
        StreakKind::Loss
    } else {
        return (0, StreakKind::None);
    };

    let mut count = 1u32;
    for trade in iter {
        let same_sign = match kind {
            StreakKind::Win => trade.pnl > 0.0,
            StreakKind::Loss => trade.pnl < 0.0,
            StreakKind::None => false,
        };
        if !same_sign {
            break;
        }
        count += 1;
    }

    (count, kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, OrderType, Symbol, TradeStatus};
    use chrono::{Duration, TimeZone, Utc};

    fn trades_with_pnls(pnls: &[f64]) -> Vec<Trade> {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        pnls.iter()
            .enumerate()
            .map(|(i, &pnl)| {
                let entry = base + Duration::hours(i as i64);
                Trade {
                    id: format!("t{i}"),
                    symbol: Symbol::Sol,
                    direction: Direction::Long,
                    order_type: OrderType::Market,
                    entry_price: 100.0,
                    exit_price: Some(100.0 + pnl),
                    quantity: 1.0,
                    pnl,
                    fees: 0.1,
                    entry_time: entry,
                    exit_time: Some(entry + Duration::minutes(30)),
                    notes: String::new(),
                    status: TradeStatus::Closed,
                }
            })
            .collect()
    }

    #[test]
    fn streaks_match_documented_sequence() {
        let trades = trades_with_pnls(&[10.0, 5.0, -3.0, -2.0, -1.0, 7.0]);
        let risk = calculate_risk_metrics(&trades);

        assert_eq!(risk.max_consecutive_wins, 2);
        assert_eq!(risk.max_consecutive_losses, 3);
        assert_eq!(risk.current_streak, 1);
        assert_eq!(risk.current_streak_type, StreakKind::Win);
    }

    #[test]
    fn sort_happens_internally() {
        let mut trades = trades_with_pnls(&[10.0, 5.0, -3.0, -2.0, -1.0, 7.0]);
        trades.reverse();
        let risk = calculate_risk_metrics(&trades);
        assert_eq!(risk.max_consecutive_losses, 3);
        assert_eq!(risk.current_streak_type, StreakKind::Win);
    }

    #[test]
    fn zero_pnl_breaks_both_streaks() {
        let trades = trades_with_pnls(&[4.0, 4.0, 0.0, 4.0, -1.0, 2.0, 3.0]);
        let risk = calculate_risk_metrics(&trades);
        assert_eq!(risk.max_consecutive_wins, 2);
        assert_eq!(risk.max_consecutive_losses, 1);
        assert_eq!(risk.current_streak, 2);
    }

    #[test]
    fn flat_latest_trade_reports_no_active_streak() {
        let trades = trades_with_pnls(&[5.0, 0.0]);
        let risk = calculate_risk_metrics(&trades);
        assert_eq!(risk.current_streak, 0);
        assert_eq!(risk.current_streak_type, StreakKind::None);
    }

    #[test]
    fn drawdown_tracks_peak_decline() {
        // Cumulative: 10, 6, 0, 8 — worst decline is 10 off a peak of 10.
        let trades = trades_with_pnls(&[10.0, -4.0, -6.0, 8.0]);
        let risk = calculate_risk_metrics(&trades);
        assert_eq!(risk.max_drawdown, 10.0);
        assert_eq!(risk.max_drawdown_percent, 100.0);
    }

    #[test]
    fn monotonic_equity_has_zero_drawdown() {
        let trades = trades_with_pnls(&[1.0, 2.0, 3.0]);
        let risk = calculate_risk_metrics(&trades);
        assert_eq!(risk.max_drawdown, 0.0);
        assert_eq!(risk.max_drawdown_percent, 0.0);
    }

    #[test]
    fn identical_pnls_zero_the_sharpe_ratio() {
        let trades = trades_with_pnls(&[5.0, 5.0, 5.0, 5.0]);
        let risk = calculate_risk_metrics(&trades);
        assert_eq!(risk.sharpe_ratio, 0.0);
    }

    #[test]
    fn sharpe_uses_population_deviation() {
        let trades = trades_with_pnls(&[10.0, -10.0]);
        let risk = calculate_risk_metrics(&trades);
        // Mean 0 ⇒ ratio 0 regardless of deviation.
        assert_eq!(risk.sharpe_ratio, 0.0);

        let trades = trades_with_pnls(&[30.0, 10.0]);
        let risk = calculate_risk_metrics(&trades);
        // Mean 20, population σ 10: 2·√252 ≈ 31.75.
        assert_eq!(risk.sharpe_ratio, round2(2.0 * 252.0_f64.sqrt()));
    }

    #[test]
    fn profit_factor_variants() {
        let all_wins = calculate_risk_metrics(&trades_with_pnls(&[5.0, 3.0]));
        assert_eq!(all_wins.profit_factor, ProfitFactor::Unbounded);
        assert_eq!(all_wins.profit_factor.display_value(), 999.0);

        let mixed = calculate_risk_metrics(&trades_with_pnls(&[30.0, -10.0]));
        assert_eq!(mixed.profit_factor, ProfitFactor::Finite(3.0));

        let empty = calculate_risk_metrics(&trades_with_pnls(&[0.0]));
        assert_eq!(empty.profit_factor, ProfitFactor::Finite(0.0));
    }

    #[test]
    fn empty_input_is_fully_zeroed() {
        let risk = calculate_risk_metrics(&[]);
        assert_eq!(risk.max_drawdown, 0.0);
        assert_eq!(risk.sharpe_ratio, 0.0);
        assert_eq!(risk.current_streak, 0);
        assert_eq!(risk.current_streak_type, StreakKind::None);
        assert_eq!(risk.profit_factor, ProfitFactor::Finite(0.0));
    }

    #[test]
    fn serializes_camel_case_with_sentinel() {
        let trades = trades_with_pnls(&[5.0, 3.0]);
        let json = serde_json::to_value(calculate_risk_metrics(&trades)).unwrap();
        assert_eq!(json["profitFactor"], 999.0);
        assert_eq!(json["currentStreakType"], "win");
        assert!(json.get("maxConsecutiveWins").is_some());
    }
}
