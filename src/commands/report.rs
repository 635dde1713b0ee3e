use crate::filter::{filter_trades, FilterCriteria};
use crate::metrics::calculate_metrics;
use crate::models::Trade;
use crate::risk::calculate_risk_metrics;
use crate::series::{fees, pnl, symbols, time};
use crate::store;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use serde_json::json;
use std::fs;
use std::path::Path;

pub fn run(journal_path: &Path, criteria: &FilterCriteria, json_output: Option<&Path>) -> Result<()> {
    let trades = store::load_trades(journal_path)
        .with_context(|| format!("Failed to load journal from {}", journal_path.display()))?;
    let now = Utc::now();

    let filtered = filter_trades(&trades, criteria, now);
    info!(
        "Loaded {} trades, {} match the active filters",
        trades.len(),
        filtered.len()
    );

    let metrics = calculate_metrics(&filtered);
    info!(
        "P&L {:+.2} over {} closed trades ({}% win rate, volume {:.2}, fees {:.2})",
        metrics.total_pnl,
        metrics.total_trades,
        metrics.win_rate,
        metrics.total_volume,
        metrics.total_fees
    );
    info!(
        "Best {:+.2} / worst {:+.2}, avg win {:+.2} / avg loss {:+.2}, avg duration {:.1}h",
        metrics.largest_gain,
        metrics.largest_loss,
        metrics.avg_win,
        metrics.avg_loss,
        metrics.avg_trade_duration
    );

    let risk = calculate_risk_metrics(&filtered);
    info!(
        "Max drawdown {:.2} ({:.1}%), Sharpe {:.2}, profit factor {:.2}",
        risk.max_drawdown,
        risk.max_drawdown_percent,
        risk.sharpe_ratio,
        risk.profit_factor.display_value()
    );
    info!(
        "Streaks: {} wins / {} losses max, current {} ({:?})",
        risk.max_consecutive_wins,
        risk.max_consecutive_losses,
        risk.current_streak,
        risk.current_streak_type
    );

    if let Some(path) = json_output {
        let payload = dashboard_payload(&filtered, now);
        fs::write(path, serde_json::to_string_pretty(&payload)?)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!("Full chart payload written to {}", path.display());
    }

    Ok(())
}

/// The complete chart-facing payload: every series the dashboard renders,
/// computed from one filtered trade collection.
pub fn dashboard_payload(trades: &[Trade], now: DateTime<Utc>) -> serde_json::Value {
    json!({
        "metrics": calculate_metrics(trades),
        "riskMetrics": calculate_risk_metrics(trades),
        "cumulativePnl": pnl::cumulative_pnl(trades),
        "dailyPnl": pnl::daily_pnl(trades),
        "drawdown": pnl::drawdown_series(trades),
        "monthlyBreakdown": pnl::monthly_breakdown(trades, now),
        "weeklyPnl": pnl::weekly_pnl(trades, now),
        "dailyHeatmap": pnl::daily_heatmap(trades, now),
        "pnlDistribution": pnl::pnl_distribution(trades),
        "symbolDistribution": symbols::symbol_distribution(trades),
        "winRateBySymbol": symbols::win_rate_by_symbol(trades),
        "directionRatio": symbols::direction_ratio(trades),
        "orderTypePerformance": symbols::order_type_performance(trades),
        "hourlyPerformance": time::hourly_performance(trades),
        "weekdayPerformance": time::weekday_performance(trades),
        "hourDayMatrix": time::hour_day_matrix(trades),
        "sessionPerformance": time::session_performance(trades),
        "feesBySymbol": fees::fees_by_symbol(trades),
        "feeComposition": fees::fee_composition(trades),
        "cumulativeFees": fees::cumulative_fees(trades),
    })
}
