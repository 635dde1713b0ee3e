use crate::aggregate::{closed_in_entry_order, day_label, round2};
use crate::models::Trade;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const HISTOGRAM_BINS: usize = 10;

/// Trailing window of the monthly breakdown, current month included.
pub const MONTHLY_BREAKDOWN_MONTHS: u32 = 6;

/// Trailing window of the weekly series.
pub const WEEKLY_PNL_WEEKS: u32 = 12;

/// Trailing window of the per-day heatmap.
pub const DAILY_HEATMAP_DAYS: i64 = 90;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CumulativePnlPoint {
    pub label: String,
    pub cumulative_pnl: f64,
}

/// Running P&L total per closed trade, chronological.
pub fn cumulative_pnl(trades: &[Trade]) -> Vec<CumulativePnlPoint> {
    let mut cumulative = 0.0;
    closed_in_entry_order(trades)
        .iter()
        .map(|trade| {
            cumulative += trade.pnl;
            CumulativePnlPoint {
                label: day_label(trade.entry_time),
                cumulative_pnl: round2(cumulative),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPnlPoint {
    pub date: String,
    pub pnl: f64,
    pub full_date: DateTime<Utc>,
}

/// P&L summed per UTC calendar day, days with trades only, chronological.
pub fn daily_pnl(trades: &[Trade]) -> Vec<DailyPnlPoint> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for trade in closed_in_entry_order(trades) {
        *by_day.entry(trade.entry_time.date_naive()).or_insert(0.0) += trade.pnl;
    }

    by_day
        .into_iter()
        .map(|(day, pnl)| {
            let full_date = day.and_time(NaiveTime::MIN).and_utc();
            DailyPnlPoint {
                date: day_label(full_date),
                pnl: round2(pnl),
                full_date,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawdownPoint {
    pub label: String,
    /// Decline from the running peak, as a percent of that peak.
    pub drawdown: f64,
}

/// Percent-of-peak drawdown per closed trade, for the area chart.
pub fn drawdown_series(trades: &[Trade]) -> Vec<DrawdownPoint> {
    let mut cumulative = 0.0;
    let mut peak = 0.0_f64;
    closed_in_entry_order(trades)
        .iter()
        .map(|trade| {
            cumulative += trade.pnl;
            peak = peak.max(cumulative);
            let drawdown = if peak > 0.0 {
                (peak - cumulative) / peak * 100.0
            } else {
                0.0
            };
            DrawdownPoint {
                label: day_label(trade.entry_time),
                drawdown: round2(drawdown),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPnlPoint {
    pub month: String,
    pub pnl: f64,
    pub trades: usize,
}

/// P&L and trade count for the trailing six calendar months, current month
/// included. Months without trades emit zero rows rather than being omitted.
pub fn monthly_breakdown(trades: &[Trade], now: DateTime<Utc>) -> Vec<MonthlyPnlPoint> {
    let closed = closed_in_entry_order(trades);

    (0..MONTHLY_BREAKDOWN_MONTHS)
        .rev()
        .map(|back| {
            let (year, month) = shift_month(now.year(), now.month(), back);
            let mut pnl = 0.0;
            let mut count = 0usize;
            for trade in &closed {
                if trade.entry_time.year() == year && trade.entry_time.month() == month {
                    pnl += trade.pnl;
                    count += 1;
                }
            }
            MonthlyPnlPoint {
                month: MONTH_LABELS[(month - 1) as usize].to_string(),
                pnl: round2(pnl),
                trades: count,
            }
        })
        .collect()
}

fn shift_month(year: i32, month: u32, back: u32) -> (i32, u32) {
    let total = year * 12 + month as i32 - 1 - back as i32;
    (total.div_euclid(12), (total.rem_euclid(12) + 1) as u32)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPnlPoint {
    pub week: String,
    pub pnl: f64,
}

/// Rolling 12-week P&L, oldest week first, labeled W1..W12.
pub fn weekly_pnl(trades: &[Trade], now: DateTime<Utc>) -> Vec<WeeklyPnlPoint> {
    let closed = closed_in_entry_order(trades);

    (0..WEEKLY_PNL_WEEKS)
        .map(|i| {
            let start = now - Duration::days(i64::from(WEEKLY_PNL_WEEKS - 1 - i) * 7);
            let end = start + Duration::days(7);
            let pnl: f64 = closed
                .iter()
                .filter(|t| t.entry_time >= start && t.entry_time < end)
                .map(|t| t.pnl)
                .sum();
            WeeklyPnlPoint {
                week: format!("W{}", i + 1),
                pnl: round2(pnl),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyHeatmapPoint {
    pub date: DateTime<Utc>,
    pub pnl: f64,
    pub trades: usize,
}

/// One row per trailing UTC day (oldest first), zero-filled, for the
/// calendar heatmap.
pub fn daily_heatmap(trades: &[Trade], now: DateTime<Utc>) -> Vec<DailyHeatmapPoint> {
    let mut by_day: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for trade in closed_in_entry_order(trades) {
        let entry = by_day.entry(trade.entry_time.date_naive()).or_insert((0.0, 0));
        entry.0 += trade.pnl;
        entry.1 += 1;
    }

    (0..DAILY_HEATMAP_DAYS)
        .rev()
        .map(|back| {
            let day = (now - Duration::days(back)).date_naive();
            let (pnl, count) = by_day.get(&day).copied().unwrap_or((0.0, 0));
            DailyHeatmapPoint {
                date: day.and_time(NaiveTime::MIN).and_utc(),
                pnl: round2(pnl),
                trades: count,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlBucket {
    pub range: String,
    pub count: usize,
    pub is_profit: bool,
}

/// Ten equal-width P&L bins between the observed min and max; the last bin's
/// upper bound is inclusive so no trade is dropped. Empty input yields an
/// empty list, not ten zero bins.
pub fn pnl_distribution(trades: &[Trade]) -> Vec<PnlBucket> {
    let closed = closed_in_entry_order(trades);
    if closed.is_empty() {
        return Vec::new();
    }

    let min = closed.iter().map(|t| t.pnl).fold(f64::INFINITY, f64::min);
    let max = closed
        .iter()
        .map(|t| t.pnl)
        .fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / HISTOGRAM_BINS as f64;

    let mut counts = [0usize; HISTOGRAM_BINS];
    for trade in &closed {
        let index = if width > 0.0 {
            (((trade.pnl - min) / width) as usize).min(HISTOGRAM_BINS - 1)
        } else {
            0
        };
        counts[index] += 1;
    }

    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            let low = min + width * i as f64;
            let high = min + width * (i + 1) as f64;
            PnlBucket {
                range: format!("{:.0} to {:.0}", low, high),
                count,
                is_profit: (low + high) / 2.0 >= 0.0,
            }
        })
        .collect()
}
