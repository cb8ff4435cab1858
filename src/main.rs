use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

mod config;
mod dashboard;
mod predictor;

use config::Config;
use dashboard::AppState;
use predictor::{LogisticModel, Predictor, WinModel};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    // The model is loaded once and shared read-only; without it there is
    // nothing to serve.
    let model = match LogisticModel::load(&config.model_path) {
        Ok(model) => model,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };
    info!("Loaded win model '{}' from {}", model.name(), config.model_path);

    let state = AppState {
        predictor: Predictor::new(Arc::new(model)),
    };
    let app = dashboard::router(state);

    let addr: SocketAddr = config.dashboard_addr.parse()?;
    info!("Prediction form listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
