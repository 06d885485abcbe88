use std::net::{IpAddr, SocketAddr};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_api::{app, config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,storefront_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let addr = SocketAddr::from((config.host.parse::<IpAddr>()?, config.port));
    match &config.storage_dir {
        Some(dir) => tracing::info!(dir = %dir.display(), "using file storage"),
        None => tracing::info!("using in-memory storage"),
    }
    tracing::info!(
        checkout_delay_ms = %config.checkout_delay.as_millis(),
        seed_demo_data = config.seed_demo_data,
        "storefront configured"
    );

    let state = AppState::from_config(config)?;
    let router = app(state);

    tracing::info!("listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
