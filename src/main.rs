use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cinematch_api::{
    api::{create_router, AppState},
    config::Config,
    db::{create_pool, create_redis_client, run_migrations, Cache, PgStore},
    services::{
        catalog::{CachedCatalog, CatalogBackend, TmdbClient},
        classifier::{Classifier, HuggingFaceClassifier},
        ConceptMapper, RetryPolicy,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cinematch_api=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let pool = create_pool(&config.database_url)
        .await
        .context("Failed to connect to Postgres")?;
    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;
    let store = Arc::new(PgStore::new(pool));

    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client);

    let tmdb = TmdbClient::new(config.tmdb_api_key.clone(), config.tmdb_api_url.clone())?;
    let backend: Arc<dyn CatalogBackend> = Arc::new(CachedCatalog::new(tmdb, cache));

    let classifier: Option<Arc<dyn Classifier>> = match config.classifier_token() {
        Some(token) => Some(Arc::new(HuggingFaceClassifier::new(
            token.to_string(),
            config.classifier_url.clone(),
        )?)),
        None => {
            tracing::warn!("HUGGINGFACE_API_TOKEN not set, image analysis disabled");
            None
        }
    };

    let mapper = ConceptMapper::embedded()?;
    tracing::info!(concepts = mapper.len(), "Concept map loaded");

    let state = AppState::new(
        backend,
        classifier,
        mapper,
        store.clone(),
        store,
        RetryPolicy::default(),
    );
    let app = create_router(state, config.max_upload_bytes);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache_writer.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
