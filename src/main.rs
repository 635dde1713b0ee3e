use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use journal_engine::commands::{generate, report};
use journal_engine::filter::{
    DateRange, DirectionFilter, FilterCriteria, OrderTypeFilter, SymbolFilter,
};
use std::path::PathBuf;

const DEFAULT_JOURNAL_FILE: &str = "journal.json";
const DEFAULT_TRADE_COUNT: usize = 58;

#[derive(Parser)]
#[command(name = "journal")]
#[command(about = "Trading journal analytics: metrics, risk and chart series from a trade log")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a mock trade journal for demos and testing
    Generate {
        /// Number of trades to generate
        #[arg(short, long, default_value_t = DEFAULT_TRADE_COUNT)]
        count: usize,
        /// RNG seed; the same seed reproduces the same journal
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Destination journal file
        #[arg(short, long, value_name = "PATH", default_value = DEFAULT_JOURNAL_FILE)]
        output: PathBuf,
    },
    /// Compute dashboard metrics and chart series for a journal
    Report {
        /// Journal file to analyze
        #[arg(value_name = "PATH", default_value = DEFAULT_JOURNAL_FILE)]
        journal: PathBuf,
        /// Instrument filter: ALL, SOL, BTC, ETH or BONK
        #[arg(long, default_value = "ALL")]
        symbol: String,
        /// Date range: 7d, 30d, 90d or custom
        #[arg(long, default_value = "90d")]
        range: String,
        /// Custom range start (YYYY-MM-DD); implies --range custom
        #[arg(long, value_name = "DATE")]
        from: Option<String>,
        /// Custom range end (YYYY-MM-DD); implies --range custom
        #[arg(long, value_name = "DATE")]
        to: Option<String>,
        /// Direction filter: All, Long or Short
        #[arg(long, default_value = "All")]
        direction: String,
        /// Order type filter: All, Market, Limit or Stop
        #[arg(long = "order-type", default_value = "All")]
        order_type: String,
        /// Write the full chart payload as JSON
        #[arg(long, value_name = "PATH")]
        json: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            count,
            seed,
            output,
        } => generate::run(&output, count, seed),
        Commands::Report {
            journal,
            symbol,
            range,
            from,
            to,
            direction,
            order_type,
            json,
        } => {
            let criteria = build_criteria(&symbol, &range, &from, &to, &direction, &order_type)?;
            report::run(&journal, &criteria, json.as_deref())
        }
    }
}

fn build_criteria(
    symbol: &str,
    range: &str,
    from: &Option<String>,
    to: &Option<String>,
    direction: &str,
    order_type: &str,
) -> Result<FilterCriteria> {
    let custom_start = from.as_deref().map(parse_date).transpose()?;
    let custom_end = to.as_deref().map(parse_date).transpose()?;
    let date_range = if custom_start.is_some() || custom_end.is_some() {
        DateRange::Custom
    } else {
        DateRange::parse(range)?
    };

    Ok(FilterCriteria {
        symbol: if symbol.eq_ignore_ascii_case("all") {
            SymbolFilter::All
        } else {
            SymbolFilter::Only(symbol.parse()?)
        },
        date_range,
        custom_start,
        custom_end,
        direction: if direction.eq_ignore_ascii_case("all") {
            DirectionFilter::All
        } else {
            DirectionFilter::Only(direction.parse()?)
        },
        order_type: if order_type.eq_ignore_ascii_case("all") {
            OrderTypeFilter::All
        } else {
            OrderTypeFilter::Only(order_type.parse()?)
        },
    })
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow!("Dates must use YYYY-MM-DD format (value: {})", raw))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}
