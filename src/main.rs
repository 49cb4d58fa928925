//! Sports-betting arbitrage API entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusBuilder;
use rust_decimal::Decimal;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sports_arb::api::{create_router, AppState};
use sports_arb::arbitrage::{find_opportunities, OpportunityParams};
use sports_arb::config::Config;
use sports_arb::metrics;
use sports_arb::odds::{OddsClient, OddsSource};

/// Sports-betting arbitrage detection API.
#[derive(Parser, Debug)]
#[command(name = "sports-arb")]
#[command(about = "HTTP API that finds guaranteed-profit betting combinations")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port.
    #[arg(short, long, default_value = "8080")]
    port: u16,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API server (default).
    Run {
        /// HTTP server port.
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Scan one sport once and print the opportunities.
    Scan {
        /// Sport key, e.g. "soccer_epl".
        sport: String,

        /// Minimum guaranteed profit percentage.
        #[arg(long, default_value = "0")]
        min_profit: Decimal,

        /// Total stake to split across legs.
        #[arg(long, default_value = "100")]
        total_stake: Decimal,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("sports_arb=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::Scan {
            sport,
            min_profit,
            total_stake,
        }) => cmd_scan(&sport, min_profit, total_stake).await,
        Some(Command::Run { port }) => cmd_run(port).await,
        None => cmd_run(args.port).await,
    }
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("SPORTS ARB API - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Odds API URL: {}", config.odds_api_url);
    println!(
        "  API Key: {}",
        if config.has_api_key() { "present" } else { "MISSING" }
    );
    println!("  Regions: {}", config.odds_regions);
    println!("  Cache TTL: {}s", config.cache_ttl_seconds);
    println!("  Min Profit: {}%", config.min_profit_percentage);
    println!("  Default Total Stake: {}", config.default_total_stake);
    println!("  Port: {}", config.port);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Scan one sport once and print the opportunities.
async fn cmd_scan(sport: &str, min_profit: Decimal, total_stake: Decimal) -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let client = OddsClient::new(&config);

    println!("Fetching odds for {}...", sport);
    let matches = client.fetch_matches(sport).await?;
    println!("Fetched {} matches", matches.len());

    let eligible: Vec<_> = matches
        .into_iter()
        .filter(|m| m.distinct_bookmakers() >= 2)
        .collect();

    let opportunities = find_opportunities(
        &eligible,
        OpportunityParams {
            min_profit,
            total_stake,
        },
    );

    if opportunities.is_empty() {
        println!("No arbitrage opportunities found across {} matches.", eligible.len());
        return Ok(());
    }

    for opp in &opportunities {
        println!("----------------------------------------------------------------------");
        println!("{} ({})", opp.match_name, opp.league);
        println!(
            "  Guaranteed return: {}% ({} on a {} stake)",
            opp.profit_percentage, opp.guaranteed_profit, opp.total_stake
        );
        for leg in &opp.legs {
            println!(
                "  - {} @ {} with {}: stake {} ({}%) -> returns {}",
                leg.outcome,
                leg.odds,
                leg.bookmaker,
                leg.stake_amount,
                leg.stake_percent,
                leg.potential_return
            );
        }
    }
    println!("----------------------------------------------------------------------");
    println!("{} opportunities found", opportunities.len());

    Ok(())
}

/// Run the HTTP API server.
async fn cmd_run(port: u16) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    metrics::init_metrics();
    let prometheus = PrometheusBuilder::new().install_recorder()?;

    info!("Configuration loaded successfully");
    info!("Odds provider: {}", config.odds_api_url);
    info!("Cache TTL: {}s", config.cache_ttl_seconds);

    let odds = Arc::new(OddsClient::new(&config));
    let state = AppState::new(config, odds).with_prometheus(prometheus);
    let router = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolve when SIGINT or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
