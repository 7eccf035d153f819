//! lootbox-combiner CLI.
//!
//! ```text
//!   buy / open / approve / combine / cycle
//!        │
//!        ▼
//!   operations ──▶ fees ──▶ transaction ──▶ node ──▶ events
//!        │
//!   combine: approve ─▶ scan ─▶ group ─▶ [paused? ─▶ combineCards ─▶ sleep]*
//! ```

use alloy::primitives::U256;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use lootbox_combiner::blockchain::{BlockchainClient, Wallet};
use lootbox_combiner::config::load_or_default;
use lootbox_combiner::config::validation::parse_eth_amount;
use lootbox_combiner::observability::{logging, metrics};
use lootbox_combiner::operations::{full_cycle, Acquisition, LootboxTier};
use lootbox_combiner::{buy_card, ensure_authorization, open_tier, run_combine, ChainContext};

#[derive(Parser)]
#[command(name = "lootbox-combiner")]
#[command(about = "Buy, open and combine collectible cards", long_about = None)]
struct Cli {
    /// TOML config file; built-in Fluent testnet defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Buy a card from a marketplace listing
    Buy {
        #[arg(long)]
        listing_id: u64,
        /// Price in ETH, e.g. 0.01
        #[arg(long)]
        price: String,
    },
    /// Open a lootbox
    Open {
        #[arg(long, value_enum, default_value = "bronze")]
        tier: LootboxTier,
    },
    /// Approve the combine contract for the bronze collection
    Approve,
    /// Combine every pair of identical bronze cards
    Combine {
        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Buy (with --listing-id/--price) or open a bronze lootbox, then combine
    Cycle {
        #[arg(long, requires = "price")]
        listing_id: Option<u64>,
        #[arg(long, requires = "listing_id")]
        price: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.observability.log_level);
    tracing::info!("lootbox-combiner v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let wallet = match Wallet::from_env() {
        Ok(wallet) => wallet,
        Err(e) => {
            tracing::error!(error = %e, "Cannot load signer");
            return ExitCode::FAILURE;
        }
    };
    let client = match BlockchainClient::new(config.network.clone(), &wallet).await {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "Cannot create blockchain client");
            return ExitCode::FAILURE;
        }
    };
    let ctx = match ChainContext::from_config(Arc::new(client), &config) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let ok = match cli.command {
        Commands::Buy { listing_id, price } => match parse_eth_amount(&price) {
            Ok(price) => buy_card(&ctx, U256::from(listing_id), price).await,
            Err(e) => {
                tracing::error!(error = %e, "Invalid price");
                false
            }
        },
        Commands::Open { tier } => open_tier(&ctx, tier).await,
        Commands::Approve => ensure_authorization(&ctx).await,
        Commands::Combine { json } => {
            let report = run_combine(&ctx).await;
            if json {
                match serde_json::to_string_pretty(&report) {
                    Ok(text) => println!("{}", text),
                    Err(e) => tracing::error!(error = %e, "Failed to render report"),
                }
            }
            report.success()
        }
        Commands::Cycle { listing_id, price } => {
            let acquisition = match (listing_id, price) {
                (Some(listing_id), Some(price)) => match parse_eth_amount(&price) {
                    Ok(price) => Acquisition::Buy {
                        listing_id: U256::from(listing_id),
                        price,
                    },
                    Err(e) => {
                        tracing::error!(error = %e, "Invalid price");
                        return ExitCode::FAILURE;
                    }
                },
                _ => Acquisition::Open(LootboxTier::Bronze),
            };
            full_cycle(&ctx, acquisition).await
        }
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
