use anyhow::{anyhow, Error};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Flat fee rate applied to entry notional when a trade is recorded (10 bps).
pub const FEE_RATE: f64 = 0.001;

/// Tradable instruments. Adding a variant is a compile-checked change that
/// propagates to every grouping builder via [`Symbol::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    #[serde(rename = "SOL")]
    Sol,
    #[serde(rename = "BTC")]
    Btc,
    #[serde(rename = "ETH")]
    Eth,
    #[serde(rename = "BONK")]
    Bonk,
}

impl Symbol {
    pub const ALL: [Symbol; 4] = [Symbol::Sol, Symbol::Btc, Symbol::Eth, Symbol::Bonk];

    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::Sol => "SOL",
            Symbol::Btc => "BTC",
            Symbol::Eth => "ETH",
            Symbol::Bonk => "BONK",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symbol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SOL" => Ok(Symbol::Sol),
            "BTC" => Ok(Symbol::Btc),
            "ETH" => Ok(Symbol::Eth),
            "BONK" => Ok(Symbol::Bonk),
            other => Err(anyhow!("Unknown symbol '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "Long",
            Direction::Short => "Short",
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "long" => Ok(Direction::Long),
            "short" => Ok(Direction::Short),
            other => Err(anyhow!("Unknown trade direction '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    Market,
    Limit,
    Stop,
}

impl OrderType {
    pub const ALL: [OrderType; 3] = [OrderType::Market, OrderType::Limit, OrderType::Stop];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "Market",
            OrderType::Limit => "Limit",
            OrderType::Stop => "Stop",
        }
    }
}

impl FromStr for OrderType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "market" => Ok(OrderType::Market),
            "limit" => Ok(OrderType::Limit),
            "stop" => Ok(OrderType::Stop),
            other => Err(anyhow!("Unknown order type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeStatus {
    Closed,
    Open,
}

impl TradeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Closed => "Closed",
            TradeStatus::Open => "Open",
        }
    }
}

/// A single journal entry. Field names serialize in camelCase — this is the
/// wire contract the dashboard reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    pub symbol: Symbol,
    pub direction: Direction,
    pub order_type: OrderType,
    pub entry_price: f64,
    pub exit_price: Option<f64>,
    pub quantity: f64,
    /// Realized P&L in quote currency. Fees are already deducted and are
    /// never subtracted again downstream.
    pub pnl: f64,
    pub fees: f64,
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
    pub status: TradeStatus,
}

impl Trade {
    pub fn is_closed(&self) -> bool {
        self.status == TradeStatus::Closed
    }

    /// Entry notional in quote currency.
    pub fn notional(&self) -> f64 {
        self.entry_price * self.quantity
    }

    /// Holding time in hours, when both timestamps are recorded.
    pub fn duration_hours(&self) -> Option<f64> {
        self.exit_time
            .map(|exit| (exit - self.entry_time).num_seconds() as f64 / 3600.0)
    }
}

/// Input for recording a trade. P&L, fees, and status are derived, so every
/// stored trade honors the direction/price sign relation.
#[derive(Debug, Clone)]
pub struct TradeDraft {
    pub symbol: Symbol,
    pub direction: Direction,
    pub order_type: OrderType,
    pub entry_price: f64,
    pub exit_price: Option<f64>,
    pub quantity: f64,
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    pub notes: String,
}

impl TradeDraft {
    pub fn into_trade(self, id: String) -> Trade {
        let pnl = match self.exit_price {
            Some(exit) => match self.direction {
                Direction::Long => (exit - self.entry_price) * self.quantity,
                Direction::Short => (self.entry_price - exit) * self.quantity,
            },
            None => 0.0,
        };
        let status = if self.exit_price.is_some() {
            TradeStatus::Closed
        } else {
            TradeStatus::Open
        };

        Trade {
            id,
            symbol: self.symbol,
            direction: self.direction,
            order_type: self.order_type,
            entry_price: self.entry_price,
            exit_price: self.exit_price,
            quantity: self.quantity,
            pnl,
            fees: self.entry_price * self.quantity * FEE_RATE,
            entry_time: self.entry_time,
            exit_time: self.exit_time,
            notes: self.notes,
            status,
        }
    }
}
