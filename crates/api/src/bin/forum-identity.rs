//! Identity RPC service: owns the signing secret and the identity store for
//! deployments that run the forum API in remote mode.

use std::sync::Arc;

use anyhow::Context;

use forum_api::app::identity_service;
use forum_api::app::services::build_local_authority;
use forum_api::config::IdentityConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    forum_observability::init();

    let config = IdentityConfig::from_env().context("invalid configuration")?;
    let authority = build_local_authority(&config.local).context("failed to initialize authority")?;
    let app = identity_service::router(Arc::new(authority));

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    tracing::info!("identity service listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
