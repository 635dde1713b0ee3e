use crate::aggregate::{closed_trades, round1, round2, PnlTally};
use crate::models::{Direction, OrderType, Symbol, Trade};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolStats {
    pub symbol: String,
    pub trades: usize,
    pub pnl: f64,
    pub win_rate: f64,
}

/// Count, total P&L, and win rate per instrument. Iterates the full
/// [`Symbol::ALL`] set so instruments without trades emit zero rows.
pub fn symbol_distribution(trades: &[Trade]) -> Vec<SymbolStats> {
    let mut tallies: HashMap<Symbol, PnlTally> = HashMap::new();
    for trade in closed_trades(trades) {
        tallies.entry(trade.symbol).or_default().add(trade.pnl);
    }

    Symbol::ALL
        .iter()
        .map(|symbol| {
            let tally = tallies.get(symbol).copied().unwrap_or_default();
            SymbolStats {
                symbol: symbol.as_str().to_string(),
                trades: tally.trades,
                pnl: round2(tally.pnl),
                win_rate: round1(tally.win_rate()),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolWinRate {
    pub symbol: String,
    pub win_rate: f64,
    pub trades: usize,
}

pub fn win_rate_by_symbol(trades: &[Trade]) -> Vec<SymbolWinRate> {
    symbol_distribution(trades)
        .into_iter()
        .map(|stats| SymbolWinRate {
            symbol: stats.symbol,
            win_rate: stats.win_rate,
            trades: stats.trades,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionSlice {
    pub name: String,
    pub value: usize,
}

/// Long vs Short closed-trade counts for the ratio pie.
pub fn direction_ratio(trades: &[Trade]) -> Vec<DirectionSlice> {
    let closed = closed_trades(trades);
    let longs = closed
        .iter()
        .filter(|t| t.direction == Direction::Long)
        .count();

    vec![
        DirectionSlice {
            name: Direction::Long.as_str().to_string(),
            value: longs,
        },
        DirectionSlice {
            name: Direction::Short.as_str().to_string(),
            value: closed.len() - longs,
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTypePoint {
    pub order_type: String,
    pub trades: usize,
    pub pnl: f64,
    pub avg_pnl: f64,
    pub win_rate: f64,
}

/// Performance per order type; all types emitted, including empty ones.
pub fn order_type_performance(trades: &[Trade]) -> Vec<OrderTypePoint> {
    let mut tallies: HashMap<OrderType, PnlTally> = HashMap::new();
    for trade in closed_trades(trades) {
        tallies.entry(trade.order_type).or_default().add(trade.pnl);
    }

    OrderType::ALL
        .iter()
        .map(|order_type| {
            let tally = tallies.get(order_type).copied().unwrap_or_default();
            OrderTypePoint {
                order_type: order_type.as_str().to_string(),
                trades: tally.trades,
                pnl: round2(tally.pnl),
                avg_pnl: round2(tally.avg_pnl()),
                win_rate: round1(tally.win_rate()),
            }
        })
        .collect()
}
