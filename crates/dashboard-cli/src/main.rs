//! dashboard-cli: terminal consumer for the prediction dashboard stack.
//!
//! Wires the HTTP client, session store and coordinators together the way
//! a UI shell would, then prints the resulting snapshots.
//!
//! Usage:
//!   cargo run -p dashboard-cli -- board
//!   cargo run -p dashboard-cli -- board --refresh
//!   cargo run -p dashboard-cli -- stocks --sector Technology --search bank
//!   cargo run -p dashboard-cli -- lookup INFY
//!   cargo run -p dashboard-cli -- model
//!   cargo run -p dashboard-cli -- retrain

use std::sync::Arc;

use clap::{Parser, Subcommand};

use dashboard_state::{DatasetCoordinator, DatasetLimits, ModelStatusCoordinator, TickerLookup};
use predict_client::{ClientConfig, PredictApi, PredictClient};
use predict_core::{filter_stocks, Movement, PredictionSummary};
use session_store::{MemoryStore, SessionStore};

#[derive(Parser, Debug)]
#[command(version, about = "Terminal dashboard for the stock prediction backend")]
struct Cli {
    /// Backend base URL; overrides PREDICT_API_URL
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Model readiness, summary stats and the ranked prediction table
    Board {
        /// Force a refresh instead of trusting the cached bundle
        #[arg(long)]
        refresh: bool,
    },

    /// Tracked stocks, optionally narrowed by sector and search text
    Stocks {
        #[arg(long)]
        sector: Option<String>,

        /// Case-insensitive match on ticker or company name
        #[arg(long)]
        search: Option<String>,
    },

    /// Full analysis for one ticker
    Lookup { ticker: String },

    /// Model metadata and operational status
    Model,

    /// Ask the backend to retrain the model
    Retrain,

    /// Ask the backend to reload its feature set
    ReloadFeatures,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "dashboard_cli=info,dashboard_state=info,predict_client=warn".into()
            }),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.base_url {
        Some(url) => ClientConfig::new(url.clone()),
        None => ClientConfig::from_env(),
    };
    let client = PredictClient::new(config);
    tracing::info!("using backend at {}", client.api_url());

    let api: Arc<dyn PredictApi> = Arc::new(client);
    let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::new());

    match cli.command {
        Command::Board { refresh } => board(api, store, refresh).await,
        Command::Stocks { sector, search } => stocks(api, store, sector, search).await,
        Command::Lookup { ticker } => lookup(api, &ticker).await,
        Command::Model => model(api).await?,
        Command::Retrain => {
            let receipt = api.retrain().await?;
            println!("{}: {}", receipt.status, receipt.message);
        }
        Command::ReloadFeatures => {
            let receipt = api.reload_features().await?;
            println!("{}: {}", receipt.status, receipt.message);
        }
    }

    Ok(())
}

async fn board(api: Arc<dyn PredictApi>, store: Arc<dyn SessionStore>, force: bool) {
    let model = ModelStatusCoordinator::new(api.clone(), store.clone());
    let data = DatasetCoordinator::new(api, store, DatasetLimits::default());

    if force {
        tokio::join!(model.check_status(), data.refresh());
    } else {
        tokio::join!(model.ensure_fresh(), data.ensure_fresh());
    }

    let status = model.snapshot();
    println!("Model: {}", status.readiness);
    if let Some(checked) = status.last_checked {
        println!("Last checked: {}", checked.to_rfc3339());
    }

    let snapshot = data.snapshot();
    let summary = PredictionSummary::from_predictions(&snapshot.predictions);
    println!();
    println!(
        "{} predictions ({} up / {} down), average score {:.3}",
        summary.total, summary.bullish, summary.bearish, summary.average_score
    );
    if let Some(updated) = snapshot.last_updated {
        println!("Data as of: {}", updated.to_rfc3339());
    }

    println!();
    for prediction in &snapshot.predictions {
        let direction = match prediction.predicted_movement {
            Movement::Up => "UP  ",
            Movement::Down => "DOWN",
        };
        println!(
            "{:>3}. {:<8} {} {:.3}  {}",
            prediction.rank,
            prediction.ticker,
            direction,
            prediction.ranking_score,
            prediction.sector
        );
    }
}

async fn stocks(
    api: Arc<dyn PredictApi>,
    store: Arc<dyn SessionStore>,
    sector: Option<String>,
    search: Option<String>,
) {
    let data = DatasetCoordinator::new(api, store, DatasetLimits::default());
    data.ensure_fresh().await;

    let snapshot = data.snapshot();
    let matches = filter_stocks(
        &snapshot.stocks,
        sector.as_deref(),
        search.as_deref().unwrap_or(""),
    );

    println!("{} of {} stocks", matches.len(), snapshot.stocks.len());
    for stock in matches {
        let price = stock
            .current_price
            .map(|p| format!("{:.2}", p))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<8} {:<28} {:<18} {}",
            stock.ticker, stock.company_name, stock.sector, price
        );
    }
}

async fn lookup(api: Arc<dyn PredictApi>, ticker: &str) {
    let service = TickerLookup::new(api);
    service.lookup(ticker).await;

    let snapshot = service.snapshot();
    if let Some(message) = snapshot.error {
        println!("{}", message);
        return;
    }

    if let Some(result) = snapshot.result {
        let p = &result.prediction;
        println!("{} ({})", result.ticker, result.sector);
        println!(
            "Rank {}/{}  {}  {:.1}% confidence ({})",
            p.rank, p.total_stocks, p.direction, p.confidence_percentage, p.confidence_level
        );
        println!(
            "Expected return: {:.2}%  quality: {}  up probability: {:.1}%",
            p.expected_return_percentage, p.quality, p.up_probability
        );
        let suggestion = &result.trading_suggestion;
        println!(
            "Suggestion: {} (allocation {}, risk {})",
            suggestion.action, suggestion.suggested_allocation, suggestion.risk_level
        );
        for scenario in &result.investment_scenarios {
            println!(
                "  invest {:.0} -> expected value {:.2} (profit {:+.2})",
                scenario.investment, scenario.expected_value, scenario.expected_profit
            );
        }
    }
}

async fn model(api: Arc<dyn PredictApi>) -> anyhow::Result<()> {
    let (info, status) = tokio::try_join!(api.get_model_info(), api.get_model_status())?;

    println!("{} v{} ({})", info.model_name, info.version, info.architecture);
    println!(
        "Accuracy {:.1}%  stocks {}  features {}",
        info.accuracy * 100.0,
        info.total_stocks,
        info.features_count
    );
    println!("Last trained: {}", info.last_trained);
    println!();
    println!("Status: {} - {}", status.status, status.message);
    println!("Last prediction: {}", status.last_prediction);

    Ok(())
}
