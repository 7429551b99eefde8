//! Basket Sizer - Command Line Entry Point
//!
//! Builds, validates, classifies and sizes long/short basket trades from
//! flags or JSON files and prints the result as JSON.

use anyhow::{Context, Result};
use basket_sizer::assets::{class_label, AssetUniverse};
use basket_sizer::basket::{Basket, BasketPreset, WeightingMethod, WeightingPolicy};
use basket_sizer::config::Config;
use basket_sizer::risk::{OpenPosition, RiskSummary, SizingInput};
use basket_sizer::strategy::{TradePlanner, TradeProposal};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, Level};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Basket Sizer CLI
#[derive(Parser)]
#[command(name = "basket-sizer")]
#[command(version, about = "Risk-adjusted sizing for multi-asset long/short basket trades")]
struct Cli {
    /// Config file stem (e.g. `basket_sizer` for basket_sizer.toml)
    #[arg(short, long, global = true, default_value = "basket_sizer")]
    config: String,

    /// Restrict tradeable symbols, comma separated (default: every known symbol)
    #[arg(long, global = true, value_delimiter = ',')]
    tradeable: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a weighted basket from symbols
    Build {
        /// Asset symbols (e.g. BTC ETH SOL)
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Weighting method: equal, volatility, conviction, market_cap
        #[arg(short, long, default_value = "equal")]
        weighting: String,

        /// Per-symbol input for the weighting method, as SYMBOL=VALUE
        #[arg(short, long = "value", value_parser = parse_symbol_value)]
        values: Vec<(String, Decimal)>,
    },

    /// Validate a basket from a JSON file (`[{"symbol": "BTC", "weight": 0.5}, ...]`)
    Validate {
        /// Path to basket JSON file
        file: String,
    },

    /// Classify a long/short pair
    Classify {
        /// Long side symbols, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        long: Vec<String>,

        /// Short side symbols, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        short: Vec<String>,
    },

    /// Size an equal-weighted long/short trade
    Size {
        /// Long side symbols, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        long: Vec<String>,

        /// Short side symbols, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        short: Vec<String>,

        /// Signal confidence (0-10)
        #[arg(long)]
        confidence: Decimal,

        /// Stop loss in percent
        #[arg(long, default_value = "5")]
        stop_loss: Decimal,

        /// Number of currently open positions
        #[arg(long, default_value = "0")]
        open_positions: u32,

        /// Volatility per symbol, as SYMBOL=VALUE
        #[arg(long = "vol", value_parser = parse_symbol_value)]
        vols: Vec<(String, Decimal)>,
    },

    /// Plan a trade proposal from a JSON file
    Plan {
        /// Path to proposal JSON file
        file: String,
    },

    /// Suggest baskets for a strategy preset
    Suggest {
        /// Preset: risk_off, risk_on, tech_vs_crypto, gold_silver_ratio, l1_rotation, balanced
        preset: BasketPreset,

        /// Volatility per symbol, as SYMBOL=VALUE
        #[arg(long = "vol", value_parser = parse_symbol_value)]
        vols: Vec<(String, Decimal)>,
    },

    /// Summarize exposure of open positions from a JSON file
    Summary {
        /// Path to open positions JSON file (`[{"size_usd": 2500, "risk_usd": 125}, ...]`)
        file: String,
    },
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_logging()?;

    let config = Config::load_from(&cli.config)?;
    config.validate()?;
    log_config(&config);

    let mut universe = AssetUniverse::default();
    if !cli.tradeable.is_empty() {
        info!(symbols = ?cli.tradeable, "Restricting tradeable symbols");
        universe = universe.with_tradeable(cli.tradeable.iter().map(|s| s.to_uppercase()));
    }
    let planner = TradePlanner::new(&config, universe.clone());

    match cli.command {
        Commands::Build {
            symbols,
            weighting,
            values,
        } => {
            let method = WeightingMethod::parse_lenient(&weighting);
            let policy = WeightingPolicy::from_method(method, values.into_iter().collect());
            let basket = planner.builder().build(&symbols, &policy);
            let validation = planner.validator().validate(&basket);

            print_json(&serde_json::json!({
                "weighting": method,
                "basket": basket,
                "validation": validation,
            }))
        }
        Commands::Validate { file } => {
            let basket: Basket = read_json(&file)?;
            print_json(&planner.validator().validate(&basket))
        }
        Commands::Classify { long, short } => {
            let long = planner.builder().build(&long, &WeightingPolicy::Equal);
            let short = planner.builder().build(&short, &WeightingPolicy::Equal);
            let category = planner.classifier().classify(&long, &short);

            print_json(&serde_json::json!({
                "category": category,
                "long_classes": class_labels(&universe, &long),
                "short_classes": class_labels(&universe, &short),
            }))
        }
        Commands::Size {
            long,
            short,
            confidence,
            stop_loss,
            open_positions,
            vols,
        } => {
            let input = SizingInput {
                confidence,
                long_basket: planner.builder().build(&long, &WeightingPolicy::Equal),
                short_basket: planner.builder().build(&short, &WeightingPolicy::Equal),
                volatilities: vols.into_iter().collect(),
                open_positions,
                stop_loss_percent: stop_loss,
            };
            print_json(&planner.sizer().size(&input))
        }
        Commands::Plan { file } => {
            let proposal: TradeProposal = read_json(&file)?;
            print_json(&planner.plan(&proposal))
        }
        Commands::Suggest { preset, vols } => {
            let vols: HashMap<String, Decimal> = vols.into_iter().collect();
            let (long, short) = planner.builder().suggest(preset, &vols);
            let category = planner.classifier().classify(&long, &short);

            print_json(&serde_json::json!({
                "preset": preset,
                "category": category,
                "long": long,
                "short": short,
            }))
        }
        Commands::Summary { file } => {
            let positions: Vec<OpenPosition> = read_json(&file)?;
            print_json(&RiskSummary::from_positions(&positions, &config.sizing))
        }
    }
}

/// Parse `SYMBOL=VALUE` pairs for per-symbol inputs.
fn parse_symbol_value(s: &str) -> std::result::Result<(String, Decimal), String> {
    let (symbol, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected SYMBOL=VALUE, got '{}'", s))?;
    let value: Decimal = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid value for {}: {}", symbol, e))?;
    Ok((symbol.trim().to_uppercase(), value))
}

/// Sorted class labels present on one side of a pair.
fn class_labels(universe: &AssetUniverse, basket: &Basket) -> Vec<&'static str> {
    let mut labels: Vec<&'static str> = universe
        .classes_of(basket.symbols())
        .into_iter()
        .map(class_label)
        .collect();
    labels.sort_unstable();
    labels
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T> {
    let raw = std::fs::read_to_string(Path::new(path))
        .with_context(|| format!("Failed to read {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", out);
    Ok(())
}

/// Initialize logging to stderr and an hourly log file; stdout carries JSON output.
fn init_logging() -> Result<()> {
    use tracing_subscriber::fmt::writer::MakeWriterExt;

    // Create logs directory
    std::fs::create_dir_all("logs")?;

    // File appender for detailed logs
    let file_appender = tracing_appender::rolling::hourly("logs", "basket-sizer.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);

    // Leak the guard to keep it alive for the program duration
    Box::leak(Box::new(_guard));

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("basket_sizer=debug".parse()?)
                .add_directive(Level::INFO.into()),
        )
        .with_writer(std::io::stderr.and(file_writer))
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(false)
        .init();

    Ok(())
}

/// Log configuration on startup.
fn log_config(config: &Config) {
    info!("📋 Configuration:");
    info!("   Account Balance: ${}", config.sizing.account_balance);
    info!(
        "   Risk Per Trade: {:.1}%",
        config.sizing.risk_per_trade * dec!(100)
    );
    info!("   Max Open Positions: {}", config.sizing.max_open_positions);
    info!("   Max Leverage: {}x", config.sizing.max_leverage);
    info!(
        "   Max Assets Per Side: {}",
        config.basket.max_assets_per_side
    );
    info!(
        "   Min Weight Per Asset: {:.0}%",
        config.basket.min_weight_per_asset * dec!(100)
    );
    debug!(
        crypto = %config.volatility.crypto_baseline,
        metals = %config.volatility.metals_baseline,
        stocks = %config.volatility.stocks_baseline,
        "Volatility baselines"
    );
}
