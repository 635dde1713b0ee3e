use crate::mock_data::generate_trades;
use crate::store;
use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use std::path::Path;

pub fn run(output_path: &Path, count: usize, seed: u64) -> Result<()> {
    info!("Generating {} mock trades (seed {})", count, seed);

    let trades = generate_trades(count, seed, Utc::now());
    store::save_trades(output_path, &trades)
        .with_context(|| format!("Failed to write journal to {}", output_path.display()))?;

    info!(
        "Journal with {} trades written to {}",
        trades.len(),
        output_path.display()
    );
    Ok(())
}
