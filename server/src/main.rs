use anyhow::Result;
use fasting_server::{config::Config, serve, store, AppState};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // `.env` values win over the inherited environment.
    dotenvy::dotenv_override().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fasting_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let database = store::connect(&config.database_url).await?;
    info!("record store is ready");

    let listener = serve::bind_with_retry(config.host, config.port).await?;
    let result = serve::serve(listener, AppState::new(&database)).await;

    database.close().await;
    result?;
    Ok(())
}
