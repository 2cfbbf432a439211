use anyhow::Context;

use personnel_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    personnel_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    let app = personnel_api::app::build_app(&config.store)
        .await
        .context("failed to open employee store")?;

    let listener = tokio::net::TcpListener::bind(config.http_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.http_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
