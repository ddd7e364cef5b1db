use anyhow::Result;
use tracing_subscriber::EnvFilter;

use flowdesk::config::Config;
use flowdesk::db::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("flowdesk=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let state = AppState::from_config(&config)?;
    let app = flowdesk::app(state);

    let listener = tokio::net::TcpListener::bind(config.addr()).await?;
    tracing::info!("listening on {}", config.addr());
    axum::serve(listener, app).await?;
    Ok(())
}
