//! HostForge Commerce service binary.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hostforge_commerce::config::Config;
use hostforge_commerce::domain::payment::SimulatedGateway;
use hostforge_commerce::routes;
use hostforge_commerce::state::AppState;
use hostforge_commerce::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store = PgStore::connect(&config.database_url).await?;
    store.run_migrations().await?;

    let nats = match &config.nats_url {
        Some(url) => match async_nats::connect(url).await {
            Ok(client) => Some(client),
            Err(err) => {
                tracing::warn!(%err, "NATS unavailable, events disabled");
                None
            }
        },
        None => None,
    };

    let gateway = SimulatedGateway {
        success_rate: config.payment_success_rate,
        delay: Duration::from_millis(config.payment_delay_ms),
    };

    let state = AppState::new(
        Arc::new(store),
        Arc::new(gateway),
        nats,
        config.currency.clone(),
    );
    let app = routes::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("hostforge-commerce listening on {addr}");
    axum::serve(tokio::net::TcpListener::bind(&addr).await?, app).await?;
    Ok(())
}
