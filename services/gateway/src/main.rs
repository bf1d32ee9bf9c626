use gateway::config::GatewayConfig;
use gateway::router::create_router;
use gateway::state::AppState;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("starting exchange simulator gateway");

    let config = GatewayConfig::from_env()?;
    config.liquidity.validate()?;

    let state = AppState::new(&config.liquidity);

    // Periodic quote refresh for every active symbol
    if config.liquidity.enabled {
        let engine = state.engine.clone();
        let interval_ms = config.liquidity.refresh_interval_ms;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
            loop {
                interval.tick().await;
                let refreshed = engine.lock().await.refresh_liquidity().await;
                if refreshed > 0 {
                    tracing::debug!(refreshed, "refreshed maker quotes");
                }
            }
        });
    }

    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    tracing::info!("listening on {}", config.listen_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
