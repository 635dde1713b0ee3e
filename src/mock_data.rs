use crate::models::{Direction, OrderType, Symbol, Trade, TradeDraft};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

/// Entry timestamps are spread over this trailing window.
pub const GENERATED_WINDOW_DAYS: i64 = 90;

struct SymbolProfile {
    symbol: Symbol,
    base_price: f64,
    variance: f64,
    price_decimals: u32,
    min_quantity: f64,
    max_quantity: f64,
}

// Per-symbol price levels and position sizes: whole coins for SOL, fractional
// BTC, and large counts for low-value tokens.
static PROFILES: [SymbolProfile; 4] = [
    SymbolProfile {
        symbol: Symbol::Sol,
        base_price: 150.0,
        variance: 50.0,
        price_decimals: 4,
        min_quantity: 10.0,
        max_quantity: 60.0,
    },
    SymbolProfile {
        symbol: Symbol::Btc,
        base_price: 65_000.0,
        variance: 15_000.0,
        price_decimals: 2,
        min_quantity: 0.1,
        max_quantity: 0.6,
    },
    SymbolProfile {
        symbol: Symbol::Eth,
        base_price: 3_500.0,
        variance: 800.0,
        price_decimals: 4,
        min_quantity: 0.5,
        max_quantity: 3.5,
    },
    SymbolProfile {
        symbol: Symbol::Bonk,
        base_price: 0.000032,
        variance: 0.000012,
        price_decimals: 8,
        min_quantity: 1_000_000.0,
        max_quantity: 10_000_000.0,
    },
];

/// Seeded journal generator. The output shape defines the engine's input
/// contract; the distributions themselves are not contractual. Trades are
/// returned newest first, the order the journal view expects.
pub fn generate_trades(count: usize, seed: u64, now: DateTime<Utc>) -> Vec<Trade> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut trades: Vec<Trade> = (0..count).map(|_| random_trade(&mut rng, now)).collect();
    trades.sort_by(|a, b| b.entry_time.cmp(&a.entry_time));
    trades
}

fn random_trade(rng: &mut StdRng, now: DateTime<Utc>) -> Trade {
    let profile = &PROFILES[rng.gen_range(0..PROFILES.len())];
    let direction = if rng.gen_bool(0.5) {
        Direction::Long
    } else {
        Direction::Short
    };
    let order_type = match rng.gen_range(0..3) {
        0 => OrderType::Market,
        1 => OrderType::Limit,
        _ => OrderType::Stop,
    };

    let entry_price = round_to(
        profile.base_price + (rng.gen::<f64>() - 0.5) * profile.variance,
        profile.price_decimals,
    )
    .max(profile.base_price * 0.01);

    // Slight positive drift so generated journals skew profitable.
    let price_change = (rng.gen::<f64>() - 0.4) * (profile.variance * 0.15);
    let exit_price = round_to(entry_price + price_change, profile.price_decimals)
        .max(profile.base_price * 0.01);

    let quantity = round_to(
        rng.gen_range(profile.min_quantity..profile.max_quantity),
        2,
    );

    let minutes_back = rng.gen_range(0..GENERATED_WINDOW_DAYS * 24 * 60);
    let entry_time = now - Duration::minutes(minutes_back);
    let duration_minutes = rng.gen_range(30..(72 * 60));
    let exit_time = entry_time + Duration::minutes(duration_minutes);

    TradeDraft {
        symbol: profile.symbol,
        direction,
        order_type,
        entry_price,
        exit_price: Some(exit_price),
        quantity,
        entry_time,
        exit_time: Some(exit_time),
        notes: String::new(),
    }
    .into_trade(Uuid::new_v4().to_string())
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeStatus;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn generator_is_deterministic_per_seed() {
        let a = generate_trades(20, 7, fixed_now());
        let b = generate_trades(20, 7, fixed_now());
        let pnls_a: Vec<f64> = a.iter().map(|t| t.pnl).collect();
        let pnls_b: Vec<f64> = b.iter().map(|t| t.pnl).collect();
        assert_eq!(pnls_a, pnls_b);

        let c = generate_trades(20, 8, fixed_now());
        let pnls_c: Vec<f64> = c.iter().map(|t| t.pnl).collect();
        assert_ne!(pnls_a, pnls_c);
    }

    #[test]
    fn generated_trades_honor_pnl_sign_relation() {
        for trade in generate_trades(200, 42, fixed_now()) {
            let exit = trade.exit_price.expect("generated trades are closed");
            let expected = match trade.direction {
                Direction::Long => (exit - trade.entry_price) * trade.quantity,
                Direction::Short => (trade.entry_price - exit) * trade.quantity,
            };
            assert!(
                (trade.pnl - expected).abs() < 1e-6,
                "pnl {} inconsistent with direction relation {}",
                trade.pnl,
                expected
            );
        }
    }

    #[test]
    fn generated_trades_are_closed_recent_and_well_formed() {
        let now = fixed_now();
        let trades = generate_trades(100, 3, now);
        assert_eq!(trades.len(), 100);
        for trade in &trades {
            assert_eq!(trade.status, TradeStatus::Closed);
            assert!(trade.entry_price > 0.0);
            assert!(trade.quantity > 0.0);
            assert!(trade.fees >= 0.0);
            assert!(trade.entry_time <= now);
            assert!(trade.entry_time >= now - Duration::days(GENERATED_WINDOW_DAYS));
            assert!(trade.exit_time.expect("closed") >= trade.entry_time);
        }
        // Newest first, the journal display order.
        assert!(trades.windows(2).all(|w| w[0].entry_time >= w[1].entry_time));
    }
}
