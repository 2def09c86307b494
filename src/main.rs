//! Global Odds Hunter
//!
//! Best-price finder across bookmakers for a sport and market.

use clap::{Parser, Subcommand};
use odds_hunter::{
    client::OddsApiClient,
    config::Config,
    error::HunterError,
    hunter::{OddsHunter, SearchOutcome, SearchRequest},
    market::{BetType, MarketSelection, Period},
    monitor::{start_dashboard, DashboardState},
    render::render_event,
    types::Region,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "odds-hunter")]
#[command(about = "Find the best bookmaker price for every outcome of a market")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// API key (overrides config and ODDS_API_KEY)
    #[arg(long)]
    api_key: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List sports currently open for betting
    Sports,
    /// Show remaining and used request quota
    Quota,
    /// Search odds for a sport
    Odds {
        /// Sport key, e.g. basketball_nba
        sport: String,
        /// moneyline, spread or totals
        #[arg(short, long, default_value = "moneyline")]
        bet_type: BetType,
        /// full, h1, h2, q1..q4
        #[arg(short, long, default_value = "full")]
        period: Period,
        /// Comma separated regions (default from config)
        #[arg(short, long, value_delimiter = ',')]
        regions: Vec<Region>,
        /// Only print events with at least one value price
        #[arg(long)]
        value_only: bool,
    },
    /// Serve the dashboard API
    Serve {
        /// Port (default from config)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?;
    if let Some(key) = cli.api_key.filter(|k| !k.trim().is_empty()) {
        config.api.api_key = Some(key);
    }

    let client = OddsApiClient::new(&config.api)?;
    let hunter = OddsHunter::new(Arc::new(client), config.value.clone());

    let result = match cli.command {
        Commands::Sports => show_sports(&hunter, &config).await,
        Commands::Quota => show_quota(&hunter, &config).await,
        Commands::Odds {
            sport,
            bet_type,
            period,
            regions,
            value_only,
        } => {
            let regions = if regions.is_empty() {
                config.api.parsed_regions()?
            } else {
                regions
            };
            let request = SearchRequest::new(
                config.api.api_key.clone().unwrap_or_default(),
                sport,
                MarketSelection::new(bet_type, period),
            )
            .with_regions(regions);
            search(&hunter, &request, value_only).await
        }
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.dashboard.port);
            let regions = config.api.parsed_regions()?;
            let state = Arc::new(DashboardState::new(hunter, config.api.api_key.clone(), regions));
            start_dashboard(state, port).await
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
    Ok(())
}

fn api_key(config: &Config) -> &str {
    config.api.api_key.as_deref().unwrap_or_default()
}

async fn show_sports(hunter: &OddsHunter, config: &Config) -> Result<(), HunterError> {
    let sports = hunter.active_sports(api_key(config)).await?;

    println!("\n🏟️  Active sports ({})\n", sports.len());
    println!("{:<40} {:<20} TITLE", "KEY", "GROUP");
    println!("{}", "-".repeat(80));
    for sport in sports {
        println!("{:<40} {:<20} {}", sport.key, sport.group, sport.title);
    }
    Ok(())
}

async fn show_quota(hunter: &OddsHunter, config: &Config) -> Result<(), HunterError> {
    let quota = hunter.quota(api_key(config)).await?;
    println!("Requests remaining: {}", quota.remaining);
    println!("Requests used:      {}", quota.used);
    if quota.is_exhausted() {
        println!("⚠️  Quota exhausted, searches are disabled");
    }
    Ok(())
}

async fn search(
    hunter: &OddsHunter,
    request: &SearchRequest,
    value_only: bool,
) -> Result<(), HunterError> {
    tracing::info!(
        "Searching {} / {} in {}",
        request.sport,
        request.market,
        Region::join(&request.regions)
    );

    match hunter.search(request).await? {
        SearchOutcome::NoActiveOdds => {
            println!("No active odds for {} / {}", request.sport, request.market);
        }
        SearchOutcome::Found(events) => {
            let mut shown = 0;
            for event in &events {
                if value_only && event.value_outcomes().next().is_none() {
                    continue;
                }
                println!("{}", render_event(event));
                shown += 1;
            }
            println!("{} of {} events shown", shown, events.len());
        }
    }
    Ok(())
}
