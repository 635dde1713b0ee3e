use crate::aggregate::{closed_in_entry_order, closed_trades, day_label, round2};
use crate::models::{Symbol, Trade};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

// Synthetic decomposition ratios: the journal has no per-trade fee type, so
// the breakdown chart approximates one. Replace with real data if per-trade
// maker/taker/withdrawal amounts ever become available.
pub const MAKER_FEE_RATIO: f64 = 0.60;
pub const TAKER_FEE_RATIO: f64 = 0.35;
pub const WITHDRAWAL_FEE_RATIO: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolFees {
    pub symbol: String,
    pub fees: f64,
}

/// Total fees per instrument; every known symbol emits a row.
pub fn fees_by_symbol(trades: &[Trade]) -> Vec<SymbolFees> {
    let totals = fee_totals(trades);

    Symbol::ALL
        .iter()
        .map(|symbol| SymbolFees {
            symbol: symbol.as_str().to_string(),
            fees: round2(totals.get(symbol).copied().unwrap_or(0.0)),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeComposition {
    pub symbol: String,
    pub maker_fees: f64,
    pub taker_fees: f64,
    pub withdrawal_fees: f64,
    pub total_fees: f64,
}

/// Per-symbol fee totals split into maker/taker/withdrawal components at the
/// fixed 60/35/5 ratios.
pub fn fee_composition(trades: &[Trade]) -> Vec<FeeComposition> {
    let totals = fee_totals(trades);

    Symbol::ALL
        .iter()
        .map(|symbol| {
            let total = totals.get(symbol).copied().unwrap_or(0.0);
            FeeComposition {
                symbol: symbol.as_str().to_string(),
                maker_fees: round2(total * MAKER_FEE_RATIO),
                taker_fees: round2(total * TAKER_FEE_RATIO),
                withdrawal_fees: round2(total * WITHDRAWAL_FEE_RATIO),
                total_fees: round2(total),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CumulativeFeePoint {
    pub date: String,
    pub fees: f64,
    pub full_date: DateTime<Utc>,
}

/// Running fee total per closed trade, chronological.
pub fn cumulative_fees(trades: &[Trade]) -> Vec<CumulativeFeePoint> {
    let mut running = 0.0;
    closed_in_entry_order(trades)
        .iter()
        .map(|trade| {
            running += trade.fees;
            CumulativeFeePoint {
                date: day_label(trade.entry_time),
                fees: round2(running),
                full_date: trade.entry_time,
            }
        })
        .collect()
}

fn fee_totals(trades: &[Trade]) -> HashMap<Symbol, f64> {
    let mut totals: HashMap<Symbol, f64> = HashMap::new();
    for trade in closed_trades(trades) {
        *totals.entry(trade.symbol).or_insert(0.0) += trade.fees;
    }
    totals
}
