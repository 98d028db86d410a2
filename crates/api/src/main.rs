use anyhow::Context;

use forum_api::app::{AuthServices, build_app};
use forum_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    forum_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!(mode = config.auth.name(), "starting forum api");

    let services = AuthServices::from_mode(&config.auth)
        .await
        .context("failed to initialize authority")?;
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(config.http_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.http_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
