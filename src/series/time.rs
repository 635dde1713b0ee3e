use crate::aggregate::{closed_trades, round1, round2, PnlTally};
use crate::models::Trade;
use chrono::{Datelike, Timelike};
use serde::Serialize;

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Fixed UTC windows for the major market sessions. Off-hours is the
/// complement of the named four; together they partition all 24 hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradingSession {
    Asian,
    London,
    NyLondonOverlap,
    NewYork,
    OffHours,
}

impl TradingSession {
    pub const ALL: [TradingSession; 5] = [
        TradingSession::Asian,
        TradingSession::London,
        TradingSession::NyLondonOverlap,
        TradingSession::NewYork,
        TradingSession::OffHours,
    ];

    /// Session owning a UTC hour of day.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=7 => TradingSession::Asian,
            8..=12 => TradingSession::London,
            13..=16 => TradingSession::NyLondonOverlap,
            17..=21 => TradingSession::NewYork,
            _ => TradingSession::OffHours,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TradingSession::Asian => "Asian",
            TradingSession::London => "London",
            TradingSession::NyLondonOverlap => "NY/London Overlap",
            TradingSession::NewYork => "New York",
            TradingSession::OffHours => "Off Hours",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyPoint {
    pub hour: u32,
    pub pnl: f64,
    pub trades: usize,
    pub win_rate: f64,
}

/// Performance bucketed by entry hour of day (UTC); all 24 rows emitted.
pub fn hourly_performance(trades: &[Trade]) -> Vec<HourlyPoint> {
    let mut buckets = [PnlTally::default(); 24];
    for trade in closed_trades(trades) {
        buckets[trade.entry_time.hour() as usize].add(trade.pnl);
    }

    buckets
        .iter()
        .enumerate()
        .map(|(hour, tally)| HourlyPoint {
            hour: hour as u32,
            pnl: round2(tally.pnl),
            trades: tally.trades,
            win_rate: round1(tally.win_rate()),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayPoint {
    pub day: String,
    pub pnl: f64,
    pub trades: usize,
    pub win_rate: f64,
}

/// Performance bucketed by entry day of week, Sunday first; all 7 rows.
pub fn weekday_performance(trades: &[Trade]) -> Vec<WeekdayPoint> {
    let mut buckets = [PnlTally::default(); 7];
    for trade in closed_trades(trades) {
        buckets[trade.entry_time.weekday().num_days_from_sunday() as usize].add(trade.pnl);
    }

    buckets
        .iter()
        .enumerate()
        .map(|(day, tally)| WeekdayPoint {
            day: WEEKDAY_LABELS[day].to_string(),
            pnl: round2(tally.pnl),
            trades: tally.trades,
            win_rate: round1(tally.win_rate()),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourDayCell {
    pub hour: u32,
    /// Day of week, 0 = Sunday.
    pub day: u32,
    pub pnl: f64,
    pub trades: usize,
}

/// The full 7×24 hour-of-day × day-of-week matrix, zero-initialized, in
/// day-major order.
pub fn hour_day_matrix(trades: &[Trade]) -> Vec<HourDayCell> {
    let mut cells = [[PnlTally::default(); 24]; 7];
    for trade in closed_trades(trades) {
        let day = trade.entry_time.weekday().num_days_from_sunday() as usize;
        let hour = trade.entry_time.hour() as usize;
        cells[day][hour].add(trade.pnl);
    }

    let mut matrix = Vec::with_capacity(7 * 24);
    for (day, hours) in cells.iter().enumerate() {
        for (hour, tally) in hours.iter().enumerate() {
            matrix.push(HourDayCell {
                hour: hour as u32,
                day: day as u32,
                pnl: round2(tally.pnl),
                trades: tally.trades,
            });
        }
    }
    matrix
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPoint {
    pub session: String,
    pub pnl: f64,
    pub trades: usize,
    pub win_rate: f64,
}

/// Performance bucketed by the trading session owning each entry hour;
/// all five sessions emitted in fixed order.
pub fn session_performance(trades: &[Trade]) -> Vec<SessionPoint> {
    let mut buckets = [PnlTally::default(); 5];
    for trade in closed_trades(trades) {
        let session = TradingSession::from_hour(trade.entry_time.hour());
        let index = TradingSession::ALL
            .iter()
            .position(|s| *s == session)
            .unwrap_or(TradingSession::ALL.len() - 1);
        buckets[index].add(trade.pnl);
    }

    TradingSession::ALL
        .iter()
        .zip(buckets.iter())
        .map(|(session, tally)| SessionPoint {
            session: session.label().to_string(),
            pnl: round2(tally.pnl),
            trades: tally.trades,
            win_rate: round1(tally.win_rate()),
        })
        .collect()
}
