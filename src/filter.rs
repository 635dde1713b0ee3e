use crate::models::{Direction, OrderType, Symbol, Trade};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};

/// Window applied when a custom range is selected without a start date.
/// An explicit, documented default rather than a silent coercion.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    Last7Days,
    Last30Days,
    Last90Days,
    Custom,
}

impl DateRange {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "7d" => Ok(DateRange::Last7Days),
            "30d" => Ok(DateRange::Last30Days),
            "90d" => Ok(DateRange::Last90Days),
            "custom" => Ok(DateRange::Custom),
            other => Err(anyhow!(
                "Date range must be 7d, 30d, 90d or custom (value: {})",
                other
            )),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DateRange::Last7Days => "7d",
            DateRange::Last30Days => "30d",
            DateRange::Last90Days => "90d",
            DateRange::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymbolFilter {
    #[default]
    All,
    Only(Symbol),
}

impl SymbolFilter {
    fn matches(self, trade: &Trade) -> bool {
        match self {
            SymbolFilter::All => true,
            SymbolFilter::Only(symbol) => trade.symbol == symbol,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectionFilter {
    #[default]
    All,
    Only(Direction),
}

impl DirectionFilter {
    fn matches(self, trade: &Trade) -> bool {
        match self {
            DirectionFilter::All => true,
            DirectionFilter::Only(direction) => trade.direction == direction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderTypeFilter {
    #[default]
    All,
    Only(OrderType),
}

impl OrderTypeFilter {
    fn matches(self, trade: &Trade) -> bool {
        match self {
            OrderTypeFilter::All => true,
            OrderTypeFilter::Only(order_type) => trade.order_type == order_type,
        }
    }
}

/// Filter state as the dashboard controls express it. Predicates AND-compose
/// and are order-independent.
#[derive(Debug, Clone)]
pub struct FilterCriteria {
    pub symbol: SymbolFilter,
    pub date_range: DateRange,
    pub custom_start: Option<DateTime<Utc>>,
    pub custom_end: Option<DateTime<Utc>>,
    pub direction: DirectionFilter,
    pub order_type: OrderTypeFilter,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            symbol: SymbolFilter::All,
            date_range: DateRange::Last90Days,
            custom_start: None,
            custom_end: None,
            direction: DirectionFilter::All,
            order_type: OrderTypeFilter::All,
        }
    }
}

impl FilterCriteria {
    fn start_date(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.date_range {
            DateRange::Last7Days => now - Duration::days(7),
            DateRange::Last30Days => now - Duration::days(30),
            DateRange::Last90Days => now - Duration::days(90),
            DateRange::Custom => self
                .custom_start
                .unwrap_or_else(|| now - Duration::days(DEFAULT_LOOKBACK_DAYS)),
        }
    }
}

/// Selects the trades matching every criterion. `now` anchors the relative
/// date windows; the input is never mutated.
pub fn filter_trades(trades: &[Trade], criteria: &FilterCriteria, now: DateTime<Utc>) -> Vec<Trade> {
    let start = criteria.start_date(now);
    let end = match criteria.date_range {
        DateRange::Custom => criteria.custom_end,
        _ => None,
    };

    trades
        .iter()
        .filter(|t| criteria.symbol.matches(t))
        .filter(|t| t.entry_time >= start)
        .filter(|t| end.map_or(true, |limit| t.entry_time <= limit))
        .filter(|t| criteria.direction.matches(t))
        .filter(|t| criteria.order_type.matches(t))
        .cloned()
        .collect()
}

/// Case-insensitive text search over symbol, direction, and note text.
/// An empty query is a passthrough.
pub fn search_trades(trades: &[Trade], query: &str) -> Vec<Trade> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return trades.to_vec();
    }

    trades
        .iter()
        .filter(|t| {
            t.symbol.as_str().to_lowercase().contains(&needle)
                || t.direction.as_str().to_lowercase().contains(&needle)
                || t.notes.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}
