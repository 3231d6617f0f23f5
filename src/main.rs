use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use recommendation_api::{
    api::{create_router, AppState},
    config::Config,
    store::CsvDataSource,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    let source = Arc::new(CsvDataSource::from_config(&config));
    let state = AppState::new(config.clone(), source);

    // Load eagerly; requests retry the load if this fails
    match state.engine().await {
        Ok(engine) => tracing::info!(items = engine.catalog().len(), "Model loaded"),
        Err(e) => tracing::warn!(error = %e, "Starting without a loaded model"),
    }

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
