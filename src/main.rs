use std::process::ExitCode;
use std::sync::Arc;

use exchange_pairs::application::services::export_pipeline::ExportPipeline;
use exchange_pairs::config::ExportConfig;
use exchange_pairs::domain::errors::PipelineError;
use exchange_pairs::infrastructure::binance_client::BinanceClient;
use exchange_pairs::infrastructure::http_client::{HttpClient, HttpFetch};
use exchange_pairs::infrastructure::okex_client::OkexClient;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before the filter reads RUST_LOG
    let dotenv = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "exchange_pairs=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = dotenv {
        warn!("Could not load .env file ({}), using process environment", e);
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), PipelineError> {
    let config = ExportConfig::from_env()?;
    info!("Output file: {}", config.output_path.display());

    let http: Arc<dyn HttpFetch> = Arc::new(HttpClient::new(&config)?);
    let pipeline = ExportPipeline::new(
        Arc::new(BinanceClient::new(http.clone())),
        Arc::new(OkexClient::new(http)),
        config.output_path.clone(),
    );

    let report = pipeline.run().await?;
    info!(
        "Wrote {} Binance trades, {} OKEx tickers and {} unmatched symbols to {}",
        report.binance_trades,
        report.okex_tickers,
        report.diff_entries,
        report.output_path.display()
    );
    Ok(())
}
