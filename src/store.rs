use crate::models::{Trade, TradeStatus};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access journal file: {0}")]
    Io(#[from] std::io::Error),
    #[error("journal file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid trade record `{id}`: {reason}")]
    InvalidRecord { id: String, reason: String },
}

/// Loads a trade journal from a JSON file and validates every record, so the
/// engine downstream can stay total over well-formed input.
pub fn load_trades(path: &Path) -> Result<Vec<Trade>, StoreError> {
    let raw = fs::read_to_string(path)?;
    let trades: Vec<Trade> = serde_json::from_str(&raw)?;
    for trade in &trades {
        validate(trade)?;
    }
    Ok(trades)
}

/// Writes the journal as pretty-printed JSON, creating parent directories as
/// needed.
pub fn save_trades(path: &Path, trades: &[Trade]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(trades)?;
    fs::write(path, json)?;
    Ok(())
}

fn validate(trade: &Trade) -> Result<(), StoreError> {
    let invalid = |reason: &str| StoreError::InvalidRecord {
        id: trade.id.clone(),
        reason: reason.to_string(),
    };

    if trade.entry_price <= 0.0 {
        return Err(invalid("entry price must be positive"));
    }
    if trade.quantity <= 0.0 {
        return Err(invalid("quantity must be positive"));
    }
    if trade.fees < 0.0 {
        return Err(invalid("fees must not be negative"));
    }
    if trade.status == TradeStatus::Closed {
        if trade.exit_price.is_none() {
            return Err(invalid("closed trade is missing an exit price"));
        }
        if trade.exit_time.is_none() {
            return Err(invalid("closed trade is missing an exit time"));
        }
    }
    if let Some(exit_time) = trade.exit_time {
        if exit_time < trade.entry_time {
            return Err(invalid("exit time precedes entry time"));
        }
    }

    Ok(())
}
