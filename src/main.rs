use std::sync::Arc;

use cinemood_api::{
    config::Config,
    routes::{create_router, AppState},
    services::{MetadataProvider, TmdbClient},
    storage::{FileListRepository, ListRepository, MemoryListRepository},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinemood_api=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    let provider = Arc::new(TmdbClient::new(&config)?);
    tracing::info!(
        provider = provider.name(),
        api_url = %config.tmdb_api_url,
        timeout_secs = config.request_timeout_secs,
        "Metadata provider ready"
    );
    let repository: Arc<dyn ListRepository> = match &config.list_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Using file-backed saved list");
            Arc::new(FileListRepository::new(path.clone()))
        }
        None => Arc::new(MemoryListRepository::default()),
    };

    let state = Arc::new(AppState::new(provider, repository));
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
